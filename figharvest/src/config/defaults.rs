//! Default value functions for Settings.

use std::path::PathBuf;

use super::schemas::{
    CaptionConfig, ClassifierConfig, ContextConfig, DedupConfig, DedupScope, GraphicsConfig,
    HashAlgorithm, MergeConfig, PathsConfig, RenderConfig, TextConfig,
};

// ==================== Top-level Section Defaults ====================

pub(crate) fn default_paths() -> PathsConfig {
    PathsConfig {
        input_dir: default_input_dir(),
        output_dir: default_output_dir(),
    }
}

pub(crate) fn default_render() -> RenderConfig {
    RenderConfig {
        dpi: default_dpi(),
        min_width: default_min_image_width(),
        min_height: default_min_image_height(),
    }
}

pub(crate) fn default_text() -> TextConfig {
    TextConfig {
        word_x_tolerance: default_word_x_tolerance(),
        word_y_tolerance: default_word_y_tolerance(),
    }
}

pub(crate) fn default_graphics() -> GraphicsConfig {
    GraphicsConfig {
        merge_distance: default_merge_distance(),
        min_width: default_min_graphic_width(),
        min_height: default_min_graphic_height(),
    }
}

pub(crate) fn default_merge() -> MergeConfig {
    MergeConfig {
        iou_threshold: default_iou_threshold(),
        proximity_threshold: default_proximity_threshold(),
    }
}

pub(crate) fn default_caption() -> CaptionConfig {
    CaptionConfig {
        search_margin: default_search_margin(),
        line_gap_stop: default_line_gap_stop(),
        word_join_gap: default_word_join_gap(),
        min_length: default_caption_min_length(),
        label_bonus: default_label_bonus(),
        distance_weight: default_distance_weight(),
        length_soft_limit: default_length_soft_limit(),
        length_penalty: default_length_penalty(),
    }
}

pub(crate) fn default_classifier() -> ClassifierConfig {
    ClassifierConfig {
        text_ratio_threshold: default_text_ratio_threshold(),
        edge_density_threshold: default_edge_density_threshold(),
        chart_line_min: default_chart_line_min(),
        bar_rect_min: default_bar_rect_min(),
        grid_line_min: default_grid_line_min(),
        grid_rect_min: default_grid_rect_min(),
        hint_distance: default_hint_distance(),
    }
}

pub(crate) fn default_dedup() -> DedupConfig {
    DedupConfig {
        hash_algorithm: default_hash_algorithm(),
        hash_size: default_hash_size(),
        hash_threshold: default_hash_threshold(),
        scope: default_dedup_scope(),
    }
}

pub(crate) fn default_context() -> ContextConfig {
    ContextConfig {
        window_before: default_window_before(),
        window_after: default_window_after(),
        min_window: default_min_window(),
    }
}

// ==================== Paths ====================

pub(crate) fn default_input_dir() -> PathBuf {
    PathBuf::from("pdf")
}

pub(crate) fn default_output_dir() -> PathBuf {
    PathBuf::from("raw_img")
}

// ==================== Render ====================

pub(crate) fn default_dpi() -> f64 {
    180.0
}

pub(crate) fn default_min_image_width() -> u32 {
    200
}

pub(crate) fn default_min_image_height() -> u32 {
    100
}

// ==================== Text ====================

pub(crate) fn default_word_x_tolerance() -> f64 {
    1.0
}

pub(crate) fn default_word_y_tolerance() -> f64 {
    2.0
}

// ==================== Graphics ====================

pub(crate) fn default_merge_distance() -> f64 {
    12.0
}

pub(crate) fn default_min_graphic_width() -> f64 {
    120.0
}

pub(crate) fn default_min_graphic_height() -> f64 {
    80.0
}

// ==================== Merge ====================

pub(crate) fn default_iou_threshold() -> f64 {
    0.3
}

pub(crate) fn default_proximity_threshold() -> f64 {
    10.0
}

// ==================== Caption ====================

pub(crate) fn default_search_margin() -> f64 {
    30.0
}

pub(crate) fn default_line_gap_stop() -> f64 {
    18.0
}

pub(crate) fn default_word_join_gap() -> f64 {
    6.0
}

pub(crate) fn default_caption_min_length() -> usize {
    8
}

pub(crate) fn default_label_bonus() -> f64 {
    10.0
}

pub(crate) fn default_distance_weight() -> f64 {
    0.01
}

pub(crate) fn default_length_soft_limit() -> usize {
    260
}

pub(crate) fn default_length_penalty() -> f64 {
    0.002
}

// ==================== Classifier ====================

pub(crate) fn default_text_ratio_threshold() -> f64 {
    0.55
}

pub(crate) fn default_edge_density_threshold() -> f64 {
    0.10
}

pub(crate) fn default_chart_line_min() -> usize {
    6
}

pub(crate) fn default_bar_rect_min() -> usize {
    3
}

pub(crate) fn default_grid_line_min() -> usize {
    3
}

pub(crate) fn default_grid_rect_min() -> usize {
    3
}

pub(crate) fn default_hint_distance() -> f64 {
    5.0
}

// ==================== Dedup ====================

pub(crate) fn default_hash_algorithm() -> HashAlgorithm {
    HashAlgorithm::Phash
}

pub(crate) fn default_hash_size() -> u32 {
    8 // 8x8 = 64-bit fingerprint
}

pub(crate) fn default_hash_threshold() -> u32 {
    5
}

pub(crate) fn default_dedup_scope() -> DedupScope {
    DedupScope::AllKept
}

// ==================== Context ====================

pub(crate) fn default_window_before() -> usize {
    2
}

pub(crate) fn default_window_after() -> usize {
    3
}

pub(crate) fn default_min_window() -> usize {
    5
}
