//! # Print Jobs
//!
//! A [`PrintJob`] is the caller's side of a print: an ordered list of
//! [`ContentLayer`]s, each carrying an already-rendered bitmap and an
//! optional vertical offset. The job is built completely before any
//! command is sent — there is no mid-flight mutation.

use crate::error::GatitoError;
use crate::raster::RasterBitmap;

/// What produced a layer's bitmap. Resolved at render time; the print
/// pass never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    /// Rasterized text.
    Text,
    /// A dithered image.
    Image,
}

/// One ordered entry of a print job.
///
/// `offset` is a signed line count applied before the layer draws:
/// positive feeds the paper forward, negative retracts it. The bitmap is
/// immutable once the layer is queued; ownership belongs to the job.
#[derive(Debug, Clone)]
pub struct ContentLayer {
    pub kind: LayerKind,
    pub offset: i32,
    pub bitmap: RasterBitmap,
}

impl ContentLayer {
    /// A text layer with no offset.
    pub fn text(bitmap: RasterBitmap) -> Self {
        Self { kind: LayerKind::Text, offset: 0, bitmap }
    }

    /// An image layer with no offset.
    pub fn image(bitmap: RasterBitmap) -> Self {
        Self { kind: LayerKind::Image, offset: 0, bitmap }
    }

    /// Set the vertical offset (lines; negative retracts).
    pub fn with_offset(mut self, offset: i32) -> Self {
        self.offset = offset;
        self
    }
}

/// An ordered, immutable sequence of content layers sharing one raster
/// width.
///
/// ## Example
///
/// ```
/// use gatito::raster::RasterBitmap;
/// use gatito::session::{ContentLayer, PrintJob};
///
/// let bitmap = RasterBitmap::from_luma(384, 2, vec![0xFF; 768])?;
/// let job = PrintJob::new(vec![
///     ContentLayer::text(bitmap.clone()),
///     ContentLayer::image(bitmap).with_offset(16),
/// ])?;
///
/// assert_eq!(job.width(), Some(384));
/// assert_eq!(job.total_feed(), 2 + 2 + 16);
/// # Ok::<(), gatito::GatitoError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrintJob {
    layers: Vec<ContentLayer>,
}

impl PrintJob {
    /// Build a job from ordered layers.
    ///
    /// ## Errors
    ///
    /// `InvalidDimension` if the layers do not all share one raster
    /// width — the device has a single fixed resolution per job.
    pub fn new(layers: Vec<ContentLayer>) -> Result<Self, GatitoError> {
        if let Some(first) = layers.first() {
            let width = first.bitmap.width();
            if let Some(layer) = layers.iter().find(|l| l.bitmap.width() != width) {
                return Err(GatitoError::InvalidDimension(format!(
                    "mixed widths in one job: {} and {}",
                    width,
                    layer.bitmap.width()
                )));
            }
        }
        Ok(Self { layers })
    }

    /// The layers, in print order.
    pub fn layers(&self) -> &[ContentLayer] {
        &self.layers
    }

    /// Raster width shared by every layer; `None` for an empty job.
    pub fn width(&self) -> Option<u32> {
        self.layers.first().map(|l| l.bitmap.width())
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total paper the job needs: layer heights plus positive offsets
    /// (retracts reuse paper that is already out, so they do not add).
    pub fn total_feed(&self) -> u32 {
        self.layers
            .iter()
            .map(|l| l.bitmap.height() + l.offset.max(0) as u32)
            .sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
