//! # Gatito - Cat Thermal Printer Driver
//!
//! Gatito is a Rust library for printing on GB01/GB02/GT01-family "cat"
//! thermal printers over their low-bandwidth wireless serial channel.
//! It provides:
//!
//! - **Raster packing**: dithered pixel buffers → packed 1bpp lines in
//!   head polarity
//! - **Blank-run compression**: runs of blank lines become fast feeds
//! - **Protocol implementation**: framed command builders with CRC-8
//! - **Session state machine**: ordered command issuance with guaranteed
//!   transport teardown
//! - **Transport**: Bluetooth RFCOMM (Linux) plus a mock for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use gatito::printer::PrinterConfig;
//! use gatito::raster::RasterBitmap;
//! use gatito::session::{ContentLayer, PrintJob, PrintOptions, PrinterSession};
//! use gatito::transport::RfcommTransport;
//!
//! let config = PrinterConfig::GB01;
//!
//! // Bitmaps come pre-dithered from the composing layer.
//! let bitmap = RasterBitmap::from_luma(384, 240, vec![0xFF; 384 * 240])?;
//! let job = PrintJob::new(vec![
//!     ContentLayer::text(bitmap.clone()),
//!     ContentLayer::image(bitmap).with_offset(16),
//! ])?;
//!
//! // The session owns the connection for exactly one job.
//! let transport = RfcommTransport::open("/dev/rfcomm0")?;
//! let mut session = PrinterSession::new(transport, config)?;
//! session.print(&job, &PrintOptions::from_config(&config))?;
//!
//! # Ok::<(), gatito::GatitoError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`raster`] | Bitmap packing and blank-run compression |
//! | [`protocol`] | Command codec and notification decoding |
//! | [`session`] | Print jobs and the session state machine |
//! | [`transport`] | Communication backends |
//! | [`printer`] | Printer configurations |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Currently tested with the GB01. GB02 and GT01 share the head geometry
//! and protocol and should work unchanged; other cat-printer variants
//! may need different command magic.
//!
//! ## Scope
//!
//! This crate is the protocol core only: it consumes already-rendered,
//! already-dithered bitmaps and produces the command stream. Composing,
//! dithering, history, and UI belong to the caller.

pub mod error;
pub mod printer;
pub mod protocol;
pub mod raster;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use error::GatitoError;
pub use printer::PrinterConfig;
pub use raster::{PackedLine, RasterBitmap};
pub use session::{PrintJob, PrintOptions, PrinterSession};
pub use transport::Transport;
