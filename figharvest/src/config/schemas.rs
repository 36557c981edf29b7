//! Configuration section structs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Input and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory scanned for `*.pdf` when no files are given on the command line
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Root directory for per-document output folders
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Rasterization and size filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Resolution used to rasterize candidate regions
    #[serde(default = "default_dpi")]
    pub dpi: f64,

    /// Minimum rendered width in pixels
    #[serde(default = "default_min_image_width")]
    pub min_width: u32,

    /// Minimum rendered height in pixels
    #[serde(default = "default_min_image_height")]
    pub min_height: u32,
}

/// Word assembly from page characters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_word_x_tolerance")]
    pub word_x_tolerance: f64,

    #[serde(default = "default_word_y_tolerance")]
    pub word_y_tolerance: f64,
}

/// Vector primitive clustering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// Primitives closer than this join the same cluster
    #[serde(default = "default_merge_distance")]
    pub merge_distance: f64,

    /// Clusters narrower than this are not graphics
    #[serde(default = "default_min_graphic_width")]
    pub min_width: f64,

    /// Clusters shorter than this are not graphics
    #[serde(default = "default_min_graphic_height")]
    pub min_height: f64,
}

/// Raster/vector candidate merging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f64,

    /// Boxes with an edge gap below this are merged regardless of overlap
    #[serde(default = "default_proximity_threshold")]
    pub proximity_threshold: f64,
}

/// Caption search and scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionConfig {
    #[serde(default = "default_search_margin")]
    pub search_margin: f64,

    /// Gap between consecutive caption lines that ends the caption block
    #[serde(default = "default_line_gap_stop")]
    pub line_gap_stop: f64,

    /// Tokens whose baselines differ by at most this are on the same line
    #[serde(default = "default_word_join_gap")]
    pub word_join_gap: f64,

    /// Minimum caption length in characters
    #[serde(default = "default_caption_min_length")]
    pub min_length: usize,

    #[serde(default = "default_label_bonus")]
    pub label_bonus: f64,

    #[serde(default = "default_distance_weight")]
    pub distance_weight: f64,

    #[serde(default = "default_length_soft_limit")]
    pub length_soft_limit: usize,

    #[serde(default = "default_length_penalty")]
    pub length_penalty: f64,
}

/// Plain-text block rejection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_text_ratio_threshold")]
    pub text_ratio_threshold: f64,

    #[serde(default = "default_edge_density_threshold")]
    pub edge_density_threshold: f64,

    /// Lines + curves at or above this mark a chart
    #[serde(default = "default_chart_line_min")]
    pub chart_line_min: usize,

    /// Rectangles at or above this mark a bar chart
    #[serde(default = "default_bar_rect_min")]
    pub bar_rect_min: usize,

    #[serde(default = "default_grid_line_min")]
    pub grid_line_min: usize,

    #[serde(default = "default_grid_rect_min")]
    pub grid_rect_min: usize,

    /// Maximum gap between a candidate and the cluster whose statistics it borrows
    #[serde(default = "default_hint_distance")]
    pub hint_distance: f64,
}

/// Perceptual hash function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// DCT-preprocessed mean hash
    Phash,
    /// Average hash
    Ahash,
    /// Difference (gradient) hash
    Dhash,
    Blockhash,
}

/// Which accepted hashes a new image is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupScope {
    AllKept,
    LastKept,
}

/// Near-duplicate rejection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: HashAlgorithm,

    /// Hash grid edge; the fingerprint has `hash_size * hash_size` bits
    #[serde(default = "default_hash_size")]
    pub hash_size: u32,

    /// Hamming distance at or below which two images are duplicates
    #[serde(default = "default_hash_threshold")]
    pub hash_threshold: u32,

    #[serde(default = "default_dedup_scope")]
    pub scope: DedupScope,
}

/// Reference sentence windowing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    #[serde(default = "default_window_before")]
    pub window_before: usize,

    #[serde(default = "default_window_after")]
    pub window_after: usize,

    #[serde(default = "default_min_window")]
    pub min_window: usize,
}

impl Default for PathsConfig {
    fn default() -> Self {
        default_paths()
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        default_render()
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        default_text()
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        default_graphics()
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        default_merge()
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        default_caption()
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        default_classifier()
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        default_dedup()
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        default_context()
    }
}
