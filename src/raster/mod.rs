//! # Raster Layer
//!
//! This module turns pixel buffers into the packed monochrome raster lines
//! the printer draws, and compresses runs of blank lines into fast feeds.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────────────┐
//! │ RasterBitmap │ ──► │ PackedLine  │ ──► │ BlankRunCompressor  │
//! │ (dithered)   │     │ (1bpp rows) │     │ (draw / feed steps) │
//! └──────────────┘     └─────────────┘     └─────────────────────┘
//! ```
//!
//! Dithering happens upstream; this layer consumes the already-dithered
//! buffer where every pixel is either full white (0xFF) or full black (0x00).
//!
//! ## Modules
//!
//! - [`bitmap`]: [`RasterBitmap`], [`PackedLine`] and the line packer
//! - [`blank`]: [`BlankRunCompressor`] and [`DrawStep`]

pub mod bitmap;
pub mod blank;

pub use bitmap::{PackedLine, RasterBitmap};
pub use blank::{BlankRunCompressor, DrawStep};
