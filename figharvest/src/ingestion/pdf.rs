//! PDF decoding with pdfium.
//!
//! [`PdfiumSource`] reads words, image placements and vector paths from each
//! page and rasterizes regions for the extraction pipeline. pdfium works in
//! bottom-left page space; everything leaving this module is top-left.

pub mod primitives;
pub mod region_render;
pub mod text;

use std::path::Path;

use image::RgbaImage;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

use crate::config::TextConfig;
use crate::error::{HarvestError, ProcessingError, ProcessingResult};
use crate::extraction::geometry::BoundingBox;

use super::hash::file_sha256;
use super::source::{DocumentSource, PageContent, PrimitiveKind, TextToken, VectorPrimitive};
use primitives::{PathShape, classify_path};
use region_render::{PageRenderCache, crop_region, page_pixels};
use text::assemble_words;

/// Create a new Pdfium instance (dynamically linked).
///
/// Searches for libpdfium in:
/// 1. Current directory (./libpdfium.so)
/// 2. vendor/pdfium/lib/
/// 3. System library paths
pub fn create_pdfium() -> Result<Pdfium, HarvestError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "./vendor/pdfium/lib/",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| HarvestError::PdfEngine {
            message: format!(
                "failed to load the PDFium library; place libpdfium next to the binary, \
                 in vendor/pdfium/lib/, or on the system library path: {:?}",
                e
            ),
        })?;

    Ok(Pdfium::new(bindings))
}

/// A PDF file opened with pdfium
pub struct PdfiumSource<'a> {
    id: String,
    document: PdfDocument<'a>,
    sha256: Option<String>,
    text: TextConfig,
    renders: PageRenderCache,
}

impl<'a> PdfiumSource<'a> {
    /// Open `path`; the document id is the file stem.
    pub fn open(pdfium: &'a Pdfium, path: &Path, text: &TextConfig) -> ProcessingResult<Self> {
        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| ProcessingError::DocumentLoad {
                path: path.display().to_string(),
                source: Box::new(std::io::Error::other(format!("{}", e))),
            })?;

        let id = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();

        let sha256 = match file_sha256(path) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to hash source file");
                None
            }
        };

        debug!(
            path = %path.display(),
            pages = document.pages().len(),
            "Opened PDF"
        );

        Ok(Self {
            id,
            document,
            sha256,
            text: text.clone(),
            renders: PageRenderCache::default(),
        })
    }
}

fn load_page<'a>(document: &PdfDocument<'a>, index: usize) -> ProcessingResult<PdfPage<'a>> {
    let page_index = u16::try_from(index)
        .map_err(|_| ProcessingError::page_read(index + 1, "page index out of range"))?;
    document
        .pages()
        .get(page_index)
        .map_err(|e| ProcessingError::page_read(index + 1, format!("{}", e)))
}

/// Convert a bottom-left pdfium rectangle to a top-left box.
fn to_top_left(rect: &PdfRect, page_height: f64) -> BoundingBox {
    BoundingBox::new(
        rect.left().value as f64,
        page_height - rect.top().value as f64,
        rect.right().value as f64,
        page_height - rect.bottom().value as f64,
    )
}

fn page_tokens(
    page: &PdfPage,
    page_height: f64,
    config: &TextConfig,
) -> Result<Vec<TextToken>, PdfiumError> {
    let text = page.text()?;
    let chars = text.chars();
    let positioned = chars.iter().filter_map(|ch| {
        let c = ch.unicode_char()?;
        let bounds = ch.tight_bounds().ok()?;
        Some((c, to_top_left(&bounds, page_height)))
    });
    Ok(assemble_words(positioned, config))
}

fn path_shape(path: &PdfPagePathObject) -> PathShape {
    let mut shape = PathShape::default();
    let segments = path.segments();
    for segment in segments.iter() {
        shape.points += 1;
        match segment.segment_type() {
            PdfPathSegmentType::LineTo => shape.straight_edges += 1,
            PdfPathSegmentType::BezierTo => shape.bezier_edges += 1,
            _ => {}
        }
        if segment.is_close() {
            shape.closed = true;
        }
    }
    shape
}

/// Image placements and vector primitives of a page, in content order.
///
/// Form XObjects are not descended into (their children report form-space
/// bounds); each one counts as a single rectangle clipped to the page.
fn page_graphics(
    page: &PdfPage,
    page_width: f64,
    page_height: f64,
) -> (Vec<BoundingBox>, Vec<VectorPrimitive>) {
    let mut images = Vec::new();
    let mut primitives = Vec::new();

    for object in page.objects().iter() {
        let Ok(quad_points) = object.bounds() else {
            continue;
        };
        let bounds = to_top_left(&quad_points.to_rect(), page_height);

        match &object {
            PdfPageObject::Image(_) => images.push(bounds),
            PdfPageObject::Path(path) => primitives.push(VectorPrimitive {
                bounds,
                kind: classify_path(&path_shape(path), &bounds),
            }),
            PdfPageObject::XObjectForm(_) => {
                if let Some(clipped) = bounds.clip_to_page(page_width, page_height) {
                    primitives.push(VectorPrimitive {
                        bounds: clipped,
                        kind: PrimitiveKind::Rect,
                    });
                }
            }
            _ => {}
        }
    }

    (images, primitives)
}

fn render_page(document: &PdfDocument, index: usize, dpi: f64) -> ProcessingResult<RgbaImage> {
    let page = load_page(document, index)?;
    let (width, height) = page_pixels(
        page.width().value as f64,
        page.height().value as f64,
        dpi,
    );

    let config = PdfRenderConfig::new()
        .set_target_width(width as i32)
        .set_target_height(height as i32);
    let bitmap = page
        .render_with_config(&config)
        .map_err(|e| ProcessingError::render(index + 1, format!("{}", e)))?;

    debug!(page = index + 1, width, height, dpi, "Rendered page");

    Ok(bitmap.as_image().to_rgba8())
}

impl DocumentSource for PdfiumSource<'_> {
    fn document_id(&self) -> &str {
        &self.id
    }

    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> ProcessingResult<PageContent> {
        let page = load_page(&self.document, index)?;
        let width = page.width().value as f64;
        let height = page.height().value as f64;

        let tokens = page_tokens(&page, height, &self.text)
            .map_err(|e| ProcessingError::page_read(index + 1, format!("{}", e)))?;
        let (images, primitives) = page_graphics(&page, width, height);

        Ok(PageContent {
            number: index + 1,
            width,
            height,
            tokens,
            images,
            primitives,
        })
    }

    fn page_text(&self, index: usize) -> ProcessingResult<String> {
        let page = load_page(&self.document, index)?;
        let text = page
            .text()
            .map_err(|e| ProcessingError::page_read(index + 1, format!("{}", e)))?;
        Ok(text.all())
    }

    fn render_region(
        &mut self,
        index: usize,
        region: &BoundingBox,
        dpi: f64,
    ) -> ProcessingResult<RgbaImage> {
        let document = &self.document;
        let page_image = self
            .renders
            .get_or_render(index, dpi, || render_page(document, index, dpi))?;
        Ok(crop_region(page_image, region, dpi))
    }

    fn content_hash(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_top_left_flips_vertical_axis() {
        let rect = PdfRect::new_from_values(700.0, 100.0, 750.0, 300.0);
        let b = to_top_left(&rect, 792.0);
        assert_eq!(b, BoundingBox::new(100.0, 42.0, 300.0, 92.0));
    }
}
