//! In-memory document source for tests.
//!
//! Pages are described directly as [`PageContent`]; rendering produces a
//! deterministic blocky noise image whose pattern depends only on the
//! region's size, so equal-sized regions render identically.

use image::{Rgba, RgbaImage};

use crate::error::{ProcessingError, ProcessingResult};
use crate::extraction::geometry::BoundingBox;

use super::source::{DocumentSource, PageContent};

/// One synthetic page
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub content: PageContent,
    pub text: String,
    /// Regions overlapping one of these render plain white
    pub blank_regions: Vec<BoundingBox>,
    /// `page()` fails for this page
    pub unreadable: bool,
    /// Regions overlapping one of these fail to render
    pub broken_regions: Vec<BoundingBox>,
}

impl MemoryPage {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            content: PageContent {
                width,
                height,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

pub struct MemorySource {
    id: String,
    pages: Vec<MemoryPage>,
    hash: Option<String>,
}

impl MemorySource {
    pub fn new(id: &str, mut pages: Vec<MemoryPage>) -> Self {
        for (i, page) in pages.iter_mut().enumerate() {
            page.content.number = i + 1;
        }
        Self {
            id: id.to_string(),
            pages,
            hash: None,
        }
    }

    pub fn with_hash(mut self, hash: &str) -> Self {
        self.hash = Some(hash.to_string());
        self
    }

    fn get(&self, index: usize) -> ProcessingResult<&MemoryPage> {
        self.pages
            .get(index)
            .ok_or_else(|| ProcessingError::page_read(index + 1, "page out of range"))
    }
}

impl DocumentSource for MemorySource {
    fn document_id(&self) -> &str {
        &self.id
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&self, index: usize) -> ProcessingResult<PageContent> {
        let page = self.get(index)?;
        if page.unreadable {
            return Err(ProcessingError::page_read(index + 1, "corrupt content stream"));
        }
        Ok(page.content.clone())
    }

    fn page_text(&self, index: usize) -> ProcessingResult<String> {
        Ok(self.get(index)?.text.clone())
    }

    fn render_region(
        &mut self,
        index: usize,
        region: &BoundingBox,
        dpi: f64,
    ) -> ProcessingResult<RgbaImage> {
        let page = self.get(index)?;
        if page
            .broken_regions
            .iter()
            .any(|b| b.intersection_area(region) > 0.0)
        {
            return Err(ProcessingError::render(index + 1, "renderer crashed"));
        }

        let scale = dpi / 72.0;
        let width = (region.width() * scale).round().max(1.0) as u32;
        let height = (region.height() * scale).round().max(1.0) as u32;

        let blank = page
            .blank_regions
            .iter()
            .any(|b| b.intersection_area(region) > 0.0);
        let seed = (region.width() as u64) * 10_000 + region.height() as u64;

        if blank {
            return Ok(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])));
        }
        Ok(noise_blocks(seed, width, height))
    }

    fn content_hash(&self) -> Option<&str> {
        self.hash.as_deref()
    }
}

/// 16x16 grid of pseudo-random gray levels stretched over the image.
pub fn noise_blocks(seed: u64, width: u32, height: u32) -> RgbaImage {
    let mut state = seed.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut grid = [0u8; 256];
    for cell in grid.iter_mut() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        *cell = (state >> 56) as u8;
    }
    RgbaImage::from_fn(width, height, |x, y| {
        let gx = (x * 16 / width.max(1)).min(15);
        let gy = (y * 16 / height.max(1)).min(15);
        let v = grid[(gy * 16 + gx) as usize];
        Rgba([v, v, v, 255])
    })
}
