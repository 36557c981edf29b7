//! Plain-text block rejection.
//!
//! Vector clusters and merged boxes sometimes land on ordinary paragraphs
//! (ruled text boxes, highlighted blocks). A region that is mostly covered
//! by words and renders with few edges is treated as body text, unless its
//! vector statistics clearly describe a chart or bar chart.

use image::{GrayImage, RgbaImage};
use imageproc::filter::filter3x3;

use crate::config::ClassifierConfig;
use crate::ingestion::source::TextToken;

use super::geometry::BoundingBox;
use super::graphics::PrimitiveCounts;

/// 3x3 Laplacian edge kernel (PIL's FIND_EDGES)
const FIND_EDGES_KERNEL: [i32; 9] = [-1, -1, -1, -1, 8, -1, -1, -1, -1];

/// Measurements the plain-text decision is based on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentScores {
    /// Word area inside the region over region area, capped at 1
    pub text_ratio: f64,
    /// Mean edge strength of the rendered region in [0, 1]
    pub edge_density: f64,
}

/// Fraction of `region` covered by tokens lying entirely inside it.
pub fn text_coverage(tokens: &[TextToken], region: &BoundingBox) -> f64 {
    let area = region.area().max(1.0);
    let text_area: f64 = tokens
        .iter()
        .filter(|t| region.contains(&t.bounds))
        .map(|t| t.bounds.area())
        .sum();
    (text_area / area).min(1.0)
}

/// Mean edge intensity of an image, normalized to [0, 1].
pub fn edge_density(image: &RgbaImage) -> f64 {
    let pixel_count = image.width() as u64 * image.height() as u64;
    if pixel_count == 0 {
        return 0.0;
    }

    let gray = image::imageops::grayscale(image);
    let edges = find_edges(&gray);
    let total: f64 = edges.pixels().map(|p| p.0[0] as f64).sum();

    total / (pixel_count as f64 * 255.0)
}

/// Laplacian edge image clamped to 0..=255.
///
/// The outermost rows and columns keep their gray values, as PIL's 3x3
/// filters leave the border untouched.
fn find_edges(gray: &GrayImage) -> GrayImage {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return gray.clone();
    }

    let mut edges: GrayImage = filter3x3::<_, i32, u8>(gray, &FIND_EDGES_KERNEL);
    for x in 0..width {
        edges.put_pixel(x, 0, *gray.get_pixel(x, 0));
        edges.put_pixel(x, height - 1, *gray.get_pixel(x, height - 1));
    }
    for y in 1..height - 1 {
        edges.put_pixel(0, y, *gray.get_pixel(0, y));
        edges.put_pixel(width - 1, y, *gray.get_pixel(width - 1, y));
    }
    edges
}

/// Measure a rendered candidate.
pub fn score_content(tokens: &[TextToken], region: &BoundingBox, image: &RgbaImage) -> ContentScores {
    ContentScores {
        text_ratio: text_coverage(tokens, region),
        edge_density: edge_density(image),
    }
}

/// Whether the scores describe body text rather than a graphic.
///
/// Strong vector evidence (enough lines/curves, or enough rectangles in the
/// nearby cluster) overrides the text-likeness test.
pub fn looks_like_plain_text(
    scores: &ContentScores,
    cluster_hint: Option<&PrimitiveCounts>,
    config: &ClassifierConfig,
) -> bool {
    if let Some(counts) = cluster_hint
        && (counts.is_likely_chart(config) || counts.is_likely_bar_chart(config))
    {
        return false;
    }
    scores.text_ratio > config.text_ratio_threshold
        && scores.edge_density < config.edge_density_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn word(x0: f64, y0: f64, x1: f64, y1: f64) -> TextToken {
        TextToken::new("word", BoundingBox::new(x0, y0, x1, y1))
    }

    #[test]
    fn test_text_coverage_counts_only_contained_tokens() {
        let region = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let tokens = vec![
            word(0.0, 0.0, 50.0, 10.0),   // 500
            word(0.0, 20.0, 100.0, 30.0), // 1000
            word(90.0, 50.0, 120.0, 60.0), // overhangs, ignored
        ];
        assert!((text_coverage(&tokens, &region) - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_text_coverage_capped() {
        let region = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let tokens = vec![word(0.0, 0.0, 10.0, 10.0), word(0.0, 0.0, 10.0, 10.0)];
        assert_eq!(text_coverage(&tokens, &region), 1.0);
    }

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_flat_image_only_border_contributes() {
        let black = RgbaImage::from_pixel(40, 40, BLACK);
        assert_eq!(edge_density(&black), 0.0);

        // 156 border pixels keep their value; the interior has no edges.
        let white = RgbaImage::from_pixel(40, 40, WHITE);
        assert!((edge_density(&white) - 156.0 / 1600.0).abs() < 1e-12);
    }

    #[test]
    fn test_find_edges_laplacian_response() {
        // A dark dot lights up its 8 neighbours (8*255 - 7*255) and clamps
        // to 0 itself; the 36 border pixels stay white.
        let mut dot = RgbaImage::from_pixel(10, 10, WHITE);
        dot.put_pixel(5, 5, BLACK);
        let gray = image::imageops::grayscale(&dot);
        let edges = find_edges(&gray);
        assert_eq!(edges.get_pixel(5, 5).0[0], 0);
        assert_eq!(edges.get_pixel(4, 4).0[0], 255);
        assert_eq!(edges.get_pixel(6, 5).0[0], 255);
        assert_eq!(edges.get_pixel(2, 2).0[0], 0);
        assert!((edge_density(&dot) - 44.0 / 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_edge_density_stripes() {
        let stripes = RgbaImage::from_fn(40, 40, |x, _| if (x / 2) % 2 == 0 { BLACK } else { WHITE });
        let density = edge_density(&stripes);
        assert!(density > 0.4, "density was {}", density);
        assert!(density <= 1.0);
    }

    #[test]
    fn test_dense_text_with_few_edges_is_plain_text() {
        let config = ClassifierConfig::default();
        let scores = ContentScores {
            text_ratio: 0.7,
            edge_density: 0.05,
        };
        assert!(looks_like_plain_text(&scores, None, &config));

        let sparse = ContentScores {
            text_ratio: 0.2,
            edge_density: 0.05,
        };
        assert!(!looks_like_plain_text(&sparse, None, &config));

        let edgy = ContentScores {
            text_ratio: 0.7,
            edge_density: 0.3,
        };
        assert!(!looks_like_plain_text(&edgy, None, &config));
    }

    #[test]
    fn test_vector_evidence_overrides_rejection() {
        let config = ClassifierConfig::default();
        let scores = ContentScores {
            text_ratio: 0.9,
            edge_density: 0.01,
        };
        let chart = PrimitiveCounts {
            lines: 4,
            rects: 0,
            curves: 2,
        };
        let bars = PrimitiveCounts {
            lines: 0,
            rects: 3,
            curves: 0,
        };
        let weak = PrimitiveCounts {
            lines: 3,
            rects: 2,
            curves: 1,
        };
        assert!(!looks_like_plain_text(&scores, Some(&chart), &config));
        assert!(!looks_like_plain_text(&scores, Some(&bars), &config));
        assert!(looks_like_plain_text(&scores, Some(&weak), &config));
    }
}
