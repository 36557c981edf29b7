//! Page content as seen by the extraction pipeline.
//!
//! [`DocumentSource`] is the boundary to the document decoder. The pipeline
//! only ever talks to this trait, so any decoder that can list tokens, image
//! boxes and vector primitives and rasterize a region can drive it.

use image::RgbaImage;

use crate::error::ProcessingResult;
use crate::extraction::geometry::BoundingBox;

/// A word on the page with its box
#[derive(Debug, Clone, PartialEq)]
pub struct TextToken {
    pub text: String,
    pub bounds: BoundingBox,
}

impl TextToken {
    pub fn new(text: impl Into<String>, bounds: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// Shape class of a vector path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Line,
    Rect,
    Curve,
}

/// A vector drawing primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorPrimitive {
    pub bounds: BoundingBox,
    pub kind: PrimitiveKind,
}

/// Everything the pipeline needs from one page
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: usize,
    /// Page width in points
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Words in content order
    pub tokens: Vec<TextToken>,
    /// Placement boxes of raster images
    pub images: Vec<BoundingBox>,
    /// Vector paths in content order
    pub primitives: Vec<VectorPrimitive>,
}

/// A decoded document that can be walked page by page.
///
/// Page indices are 0-based; [`PageContent::number`] is 1-based.
pub trait DocumentSource {
    /// Stable identifier used to name the output folder and record set
    fn document_id(&self) -> &str;

    fn page_count(&self) -> usize;

    /// Tokens, image boxes and vector primitives of one page.
    fn page(&self, index: usize) -> ProcessingResult<PageContent>;

    /// Plain text of one page in reading order.
    fn page_text(&self, index: usize) -> ProcessingResult<String>;

    /// Rasterize `region` of page `index` at `dpi`.
    fn render_region(
        &mut self,
        index: usize,
        region: &BoundingBox,
        dpi: f64,
    ) -> ProcessingResult<RgbaImage>;

    /// SHA-256 of the underlying file, when there is one.
    fn content_hash(&self) -> Option<&str> {
        None
    }
}
