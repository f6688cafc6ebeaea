//! # Bitmap Packing
//!
//! This module converts dithered pixel buffers into packed 1-bit-per-pixel
//! raster lines in the polarity the print head expects.
//!
//! ## Bit Layout
//!
//! Each packed line is exactly `width / 8` bytes. Bit `d` of byte `p`
//! carries column `p * 8 + d` — LSB-first within each byte.
//!
//! ## Polarity
//!
//! The upstream dither produces luminance bytes where 0xFF is white paper
//! and 0x00 is ink. After accumulating one bit per column the packer
//! inverts the byte (bitwise NOT), so a **set bit means ink**: an
//! all-white row packs to an all-zero line, which is what the blank-run
//! compressor looks for.
//!
//! ## Example
//!
//! ```
//! use gatito::raster::RasterBitmap;
//!
//! // 8x2: one black row, one white row
//! let luma = [vec![0x00; 8], vec![0xFF; 8]].concat();
//! let bitmap = RasterBitmap::from_luma(8, 2, luma)?;
//!
//! let lines: Vec<_> = bitmap.lines().collect();
//! assert_eq!(lines[0].as_bytes(), &[0xFF]); // ink
//! assert_eq!(lines[1].as_bytes(), &[0x00]); // blank
//! # Ok::<(), gatito::GatitoError>(())
//! ```

use image::{GrayImage, RgbaImage};

use crate::error::GatitoError;

/// One packed raster line: `width / 8` bytes, set bit = ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedLine {
    bytes: Vec<u8>,
}

impl PackedLine {
    /// Wrap raw packed bytes. Used by tests and the codec round-trip;
    /// the packer is the normal producer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// The packed bytes, ready for a draw command payload.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Line width in bytes (the pitch).
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if no column in this line carries ink.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }

    /// Whether the given column fires a dot.
    ///
    /// ## Example
    ///
    /// ```
    /// use gatito::raster::PackedLine;
    ///
    /// let line = PackedLine::from_bytes(vec![0b0000_0101]);
    /// assert!(line.ink(0));
    /// assert!(!line.ink(1));
    /// assert!(line.ink(2));
    /// ```
    #[inline]
    pub fn ink(&self, column: usize) -> bool {
        self.bytes[column / 8] & (1 << (column % 8)) != 0
    }
}

/// # Raster Bitmap
///
/// A dithered monochrome image ready for packing: `width` pixels across
/// (multiple of 8), `height` rows, one luminance byte per pixel.
///
/// Produced once per content layer before printing begins and read-only
/// during the print pass; [`lines`](Self::lines) can be called any number
/// of times and always yields the same sequence.
#[derive(Debug, Clone)]
pub struct RasterBitmap {
    width: u32,
    height: u32,
    luma: Vec<u8>,
}

impl RasterBitmap {
    /// Build from a raw luminance buffer (row-major, one byte per pixel).
    ///
    /// ## Errors
    ///
    /// - `InvalidDimension` if `width` is not a multiple of 8
    /// - `InvalidDimension` if the buffer length is not `width * height`
    pub fn from_luma(width: u32, height: u32, luma: Vec<u8>) -> Result<Self, GatitoError> {
        if width == 0 || width % 8 != 0 {
            return Err(GatitoError::InvalidDimension(format!(
                "width {} is not a positive multiple of 8",
                width
            )));
        }
        if luma.len() != (width * height) as usize {
            return Err(GatitoError::InvalidDimension(format!(
                "buffer length {} does not match {}x{}",
                luma.len(),
                width,
                height
            )));
        }
        Ok(Self { width, height, luma })
    }

    /// Build from an 8-bit grayscale image.
    pub fn from_gray(img: &GrayImage) -> Result<Self, GatitoError> {
        Self::from_luma(img.width(), img.height(), img.as_raw().clone())
    }

    /// Build from an RGBA image.
    ///
    /// Takes the low byte of each 32-bit pixel (the red channel), matching
    /// the upstream dither convention where dithered pixels are either
    /// 0x00000000 or 0xFFFFFFFF.
    pub fn from_rgba(img: &RgbaImage) -> Result<Self, GatitoError> {
        let luma = img.pixels().map(|p| p.0[0]).collect();
        Self::from_luma(img.width(), img.height(), luma)
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed line width in bytes.
    #[inline]
    pub fn pitch(&self) -> usize {
        (self.width / 8) as usize
    }

    /// Iterate over packed raster lines, one per image row.
    ///
    /// The iterator is lazy and restartable: it borrows the bitmap and
    /// holds no state beyond the current row, so a second call regenerates
    /// the identical sequence. A zero-height bitmap yields nothing, which
    /// is a valid no-op input to the draw loop.
    pub fn lines(&self) -> Lines<'_> {
        Lines { bitmap: self, row: 0 }
    }

    /// Pack a single row.
    ///
    /// Accumulates bit `d` of each pixel's luminance byte into bit `d` of
    /// the output byte, then inverts. On dithered input (0x00 / 0xFF) this
    /// is a threshold: white becomes a 0 bit, ink a 1 bit.
    fn pack_row(&self, row: u32) -> PackedLine {
        let pitch = self.pitch();
        let base = (row * self.width) as usize;
        let mut bytes = vec![0u8; pitch];
        for (p, byte) in bytes.iter_mut().enumerate() {
            let mut acc = 0u8;
            for d in 0..8 {
                acc |= self.luma[base + p * 8 + d] & (1 << d);
            }
            *byte = !acc;
        }
        PackedLine { bytes }
    }
}

/// Lazy iterator over a bitmap's packed lines. See [`RasterBitmap::lines`].
pub struct Lines<'a> {
    bitmap: &'a RasterBitmap,
    row: u32,
}

impl Iterator for Lines<'_> {
    type Item = PackedLine;

    fn next(&mut self) -> Option<PackedLine> {
        if self.row >= self.bitmap.height {
            return None;
        }
        let line = self.bitmap.pack_row(self.row);
        self.row += 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.bitmap.height - self.row) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Lines<'_> {}

// ============================================================================
// TESTS
// ============================================================================
