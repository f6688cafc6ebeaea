//! # Blank-Run Compression
//!
//! Blank raster lines cost print time proportional to line count at full
//! thermal-draw speed but are visually worthless. This module collapses
//! maximal runs of all-zero lines into a single fast-feed decision so the
//! session can drain them at transport speed instead of drawing them.
//!
//! ## Shape
//!
//! [`BlankRunCompressor`] is a plain value carried through the draw loop —
//! a running counter, nothing ambient. Lines go in via
//! [`push`](BlankRunCompressor::push) in source order; inked lines come
//! back out as [`DrawStep`]s annotated with the number of blank lines that
//! preceded them. Compression never reorders lines.
//!
//! The counter deliberately survives layer boundaries: when two layers are
//! contiguous their adjoining blank runs merge into one feed. The session
//! flushes the counter with [`take_pending`](BlankRunCompressor::take_pending)
//! before applying an explicit layer offset (the offset implies its own
//! feed or retract) and folds any end-of-job residue into the finish feed.
//!
//! ## Example
//!
//! ```
//! use gatito::raster::{BlankRunCompressor, PackedLine};
//!
//! let blank = PackedLine::from_bytes(vec![0x00]);
//! let inked = PackedLine::from_bytes(vec![0x10]);
//!
//! let mut compressor = BlankRunCompressor::new();
//! assert!(compressor.push(blank.clone()).is_none());
//! assert!(compressor.push(blank).is_none());
//!
//! let step = compressor.push(inked).unwrap();
//! assert_eq!(step.blank_before, 2);
//! assert_eq!(compressor.take_pending(), 0);
//! ```

use super::bitmap::PackedLine;

/// An inked line ready to draw, with the length of the blank run that
/// immediately preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawStep {
    /// Blank lines to skip (at fast feed speed) before drawing.
    pub blank_before: u32,
    /// The line to draw.
    pub line: PackedLine,
}

/// Collapses runs of blank lines into feed decisions. See the module docs.
#[derive(Debug, Default)]
pub struct BlankRunCompressor {
    pending: u32,
}

impl BlankRunCompressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line through the compressor.
    ///
    /// Returns `None` for a blank line (absorbed into the pending run) and
    /// `Some(DrawStep)` for an inked line, carrying the accumulated run.
    pub fn push(&mut self, line: PackedLine) -> Option<DrawStep> {
        if line.is_blank() {
            self.pending += 1;
            return None;
        }
        let blank_before = std::mem::take(&mut self.pending);
        Some(DrawStep { blank_before, line })
    }

    /// Blank lines accumulated since the last inked line.
    #[inline]
    pub fn pending(&self) -> u32 {
        self.pending
    }

    /// Take and reset the pending blank count.
    ///
    /// Called by the session before an explicit layer offset, and at end
    /// of job to fold the residue into the finish feed.
    pub fn take_pending(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}

// ============================================================================
// TESTS
// ============================================================================
