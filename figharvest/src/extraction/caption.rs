//! Caption search around a candidate region.
//!
//! Four rectangles are searched: below, above, right of and left of the
//! region. Each side yields at most one contiguous text block, read outward
//! from the region edge. Blocks are scored (label bonus, distance penalty,
//! length penalty) and the best one becomes the caption.

use crate::config::CaptionConfig;
use crate::ingestion::source::TextToken;

use super::geometry::BoundingBox;
use super::labels::{CaptionLabel, has_label, parse_label, truncate_caption};

/// Which side of the region a caption was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bottom,
    Top,
    Right,
    Left,
}

impl Side {
    /// Search order; earlier sides win score ties.
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Top, Side::Right, Side::Left];
}

/// Text block found on one side of a region
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionCandidate {
    pub side: Side,
    pub text: String,
    /// Gap between the region and the block
    pub distance: f64,
}

/// The chosen caption of a region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Caption {
    /// Caption text cut after its first sentence; empty when nothing qualified
    pub text: String,
    pub side: Option<Side>,
    pub distance: f64,
    pub label: Option<CaptionLabel>,
}

impl Caption {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Search rectangles for each side of `region`, clamped to the page.
///
/// Vertical searches reach `3 * margin` and keep the region's width; lateral
/// searches reach `3 * margin` and extend one margin above and below.
pub fn search_regions(
    region: &BoundingBox,
    page_width: f64,
    page_height: f64,
    config: &CaptionConfig,
) -> [(Side, BoundingBox); 4] {
    let m = config.search_margin;
    let BoundingBox { x0, y0, x1, y1 } = *region;
    [
        (
            Side::Bottom,
            BoundingBox {
                x0,
                y0: y1,
                x1,
                y1: page_height.min(y1 + 3.0 * m),
            },
        ),
        (
            Side::Top,
            BoundingBox {
                x0,
                y0: (y0 - 3.0 * m).max(0.0),
                x1,
                y1: y0,
            },
        ),
        (
            Side::Right,
            BoundingBox {
                x0: x1,
                y0: (y0 - m).max(0.0),
                x1: page_width.min(x1 + 3.0 * m),
                y1: page_height.min(y1 + m),
            },
        ),
        (
            Side::Left,
            BoundingBox {
                x0: (x0 - 3.0 * m).max(0.0),
                y0: (y0 - m).max(0.0),
                x1: x0,
                y1: page_height.min(y1 + m),
            },
        ),
    ]
}

/// Find the best caption for `region` among the page tokens.
pub fn locate_caption(
    tokens: &[TextToken],
    region: &BoundingBox,
    page_width: f64,
    page_height: f64,
    config: &CaptionConfig,
) -> Caption {
    let candidates: Vec<CaptionCandidate> = search_regions(region, page_width, page_height, config)
        .iter()
        .filter_map(|(side, rect)| side_candidate(tokens, region, *side, rect, config))
        .collect();

    match pick_best_caption(&candidates, config) {
        Some(best) => {
            let text = truncate_caption(&best.text);
            let label = parse_label(&text);
            Caption {
                text,
                side: Some(best.side),
                distance: best.distance,
                label,
            }
        }
        None => Caption::default(),
    }
}

/// Score of a caption candidate; higher is better.
pub fn score_caption(candidate: &CaptionCandidate, config: &CaptionConfig) -> f64 {
    let label_bonus = if has_label(&candidate.text) {
        config.label_bonus
    } else {
        0.0
    };
    let length = candidate.text.chars().count();
    let length_penalty =
        length.saturating_sub(config.length_soft_limit) as f64 * config.length_penalty;
    label_bonus - candidate.distance * config.distance_weight - length_penalty
}

/// Highest scoring candidate; the earliest one wins ties.
pub fn pick_best_caption<'a>(
    candidates: &'a [CaptionCandidate],
    config: &CaptionConfig,
) -> Option<&'a CaptionCandidate> {
    let mut best: Option<(&CaptionCandidate, f64)> = None;
    for candidate in candidates {
        let score = score_caption(candidate, config);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn side_candidate(
    tokens: &[TextToken],
    region: &BoundingBox,
    side: Side,
    rect: &BoundingBox,
    config: &CaptionConfig,
) -> Option<CaptionCandidate> {
    let inside: Vec<&TextToken> = tokens.iter().filter(|t| rect.contains(&t.bounds)).collect();
    if inside.is_empty() {
        return None;
    }

    let block = first_block(inside, side, config.line_gap_stop);
    let text = join_linewise(&block, config.word_join_gap);
    if text.chars().count() < config.min_length {
        return None;
    }

    let block_bounds = block
        .iter()
        .map(|t| t.bounds)
        .reduce(|a, b| a.union(&b))?;

    Some(CaptionCandidate {
        side,
        text,
        distance: region.gap_distance(&block_bounds),
    })
}

/// Tokens of the first contiguous block, read outward from the region edge.
///
/// Reading stops at the first token separated from the block by more than
/// `line_gap_stop` along the search axis.
fn first_block(mut tokens: Vec<&TextToken>, side: Side, line_gap_stop: f64) -> Vec<&TextToken> {
    match side {
        Side::Bottom => tokens.sort_by(|a, b| {
            a.bounds
                .y0
                .total_cmp(&b.bounds.y0)
                .then(a.bounds.x0.total_cmp(&b.bounds.x0))
        }),
        Side::Top => tokens.sort_by(|a, b| {
            b.bounds
                .y1
                .total_cmp(&a.bounds.y1)
                .then(a.bounds.x0.total_cmp(&b.bounds.x0))
        }),
        Side::Right => tokens.sort_by(|a, b| {
            a.bounds
                .x0
                .total_cmp(&b.bounds.x0)
                .then(a.bounds.y0.total_cmp(&b.bounds.y0))
        }),
        Side::Left => tokens.sort_by(|a, b| {
            b.bounds
                .x1
                .total_cmp(&a.bounds.x1)
                .then(a.bounds.y0.total_cmp(&b.bounds.y0))
        }),
    }

    let mut block: Vec<&TextToken> = Vec::new();
    let mut far_edge = 0.0;
    for token in tokens {
        let b = &token.bounds;
        if !block.is_empty() {
            let gap = match side {
                Side::Bottom => b.y0 - far_edge,
                Side::Top => far_edge - b.y1,
                Side::Right => b.x0 - far_edge,
                Side::Left => far_edge - b.x1,
            };
            if gap > line_gap_stop {
                break;
            }
        }
        far_edge = match (side, block.is_empty()) {
            (Side::Bottom, true) => b.y1,
            (Side::Bottom, false) => f64::max(far_edge, b.y1),
            (Side::Top, true) => b.y0,
            (Side::Top, false) => f64::min(far_edge, b.y0),
            (Side::Right, true) => b.x1,
            (Side::Right, false) => f64::max(far_edge, b.x1),
            (Side::Left, true) => b.x0,
            (Side::Left, false) => f64::min(far_edge, b.x0),
        };
        block.push(token);
    }
    block
}

/// Join tokens into reading order: lines top to bottom, words left to right.
///
/// Tokens whose tops differ by at most `word_join_gap` share a line.
pub fn join_linewise(tokens: &[&TextToken], word_join_gap: f64) -> String {
    let mut sorted: Vec<&TextToken> = tokens.to_vec();
    sorted.sort_by(|a, b| {
        a.bounds
            .y0
            .total_cmp(&b.bounds.y0)
            .then(a.bounds.x0.total_cmp(&b.bounds.x0))
    });

    let mut lines: Vec<Vec<&TextToken>> = Vec::new();
    let mut line_top = f64::NEG_INFINITY;
    for token in sorted {
        match lines.last_mut() {
            Some(line) if (token.bounds.y0 - line_top).abs() <= word_join_gap => line.push(token),
            _ => {
                line_top = token.bounds.y0;
                lines.push(vec![token]);
            }
        }
    }

    lines
        .iter_mut()
        .map(|line| {
            line.sort_by(|a, b| a.bounds.x0.total_cmp(&b.bounds.x0));
            line.iter()
                .map(|t| t.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
