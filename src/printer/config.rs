//! # Printer Configuration
//!
//! This module defines hardware specifications for supported cat thermal
//! printers, plus the default print parameters a job starts from.
//!
//! ## Supported Printers
//!
//! | Model | Width (dots) | Resolution |
//! |-------|--------------|------------|
//! | GB01  | 384          | 203 DPI    |
//! | GB02  | 384          | 203 DPI    |
//! | GT01  | 384          | 203 DPI    |
//!
//! The whole family shares one 384-dot print head; the models differ in
//! casing and advertised name, not in protocol or geometry.
//!
//! ## Usage
//!
//! ```
//! use gatito::printer::PrinterConfig;
//!
//! let config = PrinterConfig::GB01;
//! println!("Print width: {} dots ({} bytes)",
//!          config.width_dots,
//!          config.width_bytes);
//! ```

/// # Printer Configuration
///
/// Defines the hardware characteristics of a cat thermal printer and the
/// default print parameters.
///
/// ## Physical Properties
///
/// - **width_dots**: Printable width in dots (pixels); fixed per model
/// - **width_bytes**: Width in bytes (width_dots / 8); one packed raster line
/// - **dpi**: Resolution in dots per inch
///
/// ## Print Parameters
///
/// - **draw_speed**: Feed speed while thermally printing ink
/// - **feed_speed**: Elevated speed used to skip blank paper
/// - **energy**: Thermal intensity (dot darkness), set once per job
/// - **finish_feed**: Trailing feed ensuring content clears the tear bar
///
/// Speed values are device units where *smaller is faster*; the firmware
/// interprets them as a per-line step delay.
#[derive(Debug, Clone, Copy)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: &'static str,

    /// Printable width in dots (pixels)
    pub width_dots: u16,

    /// Print width in bytes (width_dots / 8)
    pub width_bytes: u16,

    /// Resolution in dots per inch
    pub dpi: u16,

    /// Default draw speed (used while printing ink)
    pub draw_speed: u8,

    /// Fast transport speed (used to skip blank lines and apply offsets)
    pub feed_speed: u8,

    /// Default thermal energy
    pub energy: u16,

    /// Default trailing feed after the last drawn line
    pub finish_feed: u16,
}

impl PrinterConfig {
    /// # GB01 Configuration
    ///
    /// The original "cat printer": 384 dots across 48mm of thermal paper.
    ///
    /// | Property | Value |
    /// |----------|-------|
    /// | Paper width | 57mm |
    /// | Print width | 48mm (384 dots) |
    /// | Resolution | 203 DPI |
    /// | Interface | BLE (write without response) |
    pub const GB01: Self = Self {
        name: "GB01",
        width_dots: 384,
        width_bytes: 48,
        dpi: 203,
        draw_speed: 32,
        feed_speed: 8,
        energy: 12000,
        finish_feed: 100,
    };

    /// GB02 — same head and protocol as GB01, different shell.
    pub const GB02: Self = Self { name: "GB02", ..Self::GB01 };

    /// GT01 — same head and protocol as GB01, different shell.
    pub const GT01: Self = Self { name: "GT01", ..Self::GB01 };

    /// Calculate dots per millimeter
    #[inline]
    pub fn dots_per_mm(&self) -> f32 {
        self.dpi as f32 / 25.4
    }

    /// Calculate print width in millimeters
    #[inline]
    pub fn width_mm(&self) -> f32 {
        self.width_dots as f32 / self.dots_per_mm()
    }

    /// Convert millimeters to dots (line counts for feed/retract)
    #[inline]
    pub fn mm_to_dots(&self, mm: f32) -> u16 {
        (mm * self.dots_per_mm()).round() as u16
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::GB01
    }
}

// ============================================================================
// TESTS
// ============================================================================
