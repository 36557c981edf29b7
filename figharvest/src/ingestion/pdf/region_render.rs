//! Region rasterization from a cached full-page render.

use image::RgbaImage;

use crate::extraction::geometry::BoundingBox;

/// Pixel rectangle `(left, top, width, height)` of `region` on a page
/// rendered at `dpi`, clamped to a `page_px` sized bitmap.
pub fn region_pixels(region: &BoundingBox, dpi: f64, page_px: (u32, u32)) -> (u32, u32, u32, u32) {
    let scale = dpi / 72.0;
    let to_px = |v: f64, limit: u32| ((v * scale).round().max(0.0) as u32).min(limit);

    let left = to_px(region.x0, page_px.0);
    let top = to_px(region.y0, page_px.1);
    let right = to_px(region.x1, page_px.0);
    let bottom = to_px(region.y1, page_px.1);

    (
        left,
        top,
        right.saturating_sub(left).max(1).min(page_px.0.saturating_sub(left).max(1)),
        bottom.saturating_sub(top).max(1).min(page_px.1.saturating_sub(top).max(1)),
    )
}

/// Full-page pixel size at `dpi`.
pub fn page_pixels(width_pts: f64, height_pts: f64, dpi: f64) -> (u32, u32) {
    let scale = dpi / 72.0;
    (
        ((width_pts * scale).round() as u32).max(1),
        ((height_pts * scale).round() as u32).max(1),
    )
}

/// The most recent full-page render, reused while crops come from the same
/// page at the same resolution.
#[derive(Default)]
pub struct PageRenderCache {
    cached: Option<((usize, u64), RgbaImage)>,
}

impl PageRenderCache {
    /// Cached render of `page` at `dpi`, producing it with `render` on a miss.
    pub fn get_or_render<E>(
        &mut self,
        page: usize,
        dpi: f64,
        render: impl FnOnce() -> Result<RgbaImage, E>,
    ) -> Result<&RgbaImage, E> {
        let key = (page, dpi.to_bits());
        let (_, image) = match self.cached.take() {
            Some(hit) if hit.0 == key => self.cached.insert(hit),
            _ => self.cached.insert((key, render()?)),
        };
        Ok(image)
    }
}

/// Crop `region` out of a full-page render.
pub fn crop_region(page_image: &RgbaImage, region: &BoundingBox, dpi: f64) -> RgbaImage {
    let (left, top, width, height) = region_pixels(region, dpi, page_image.dimensions());
    image::imageops::crop_imm(page_image, left, top, width, height).to_image()
}
