//! Extraction settings.
//!
//! One immutable [`Settings`] value is loaded at startup and passed by
//! reference into every stage. Values come from serde defaults, then an
//! optional config file, then `FIGHARVEST__*` environment variables.

mod defaults;
mod loader;
mod schemas;

use serde::{Deserialize, Serialize};

use crate::error::{HarvestError, HarvestResult};

pub use loader::load_settings;
pub use schemas::{
    CaptionConfig, ClassifierConfig, ContextConfig, DedupConfig, DedupScope, GraphicsConfig,
    HashAlgorithm, MergeConfig, PathsConfig, RenderConfig, TextConfig,
};

use defaults::{
    default_caption, default_classifier, default_context, default_dedup, default_graphics,
    default_merge, default_paths, default_render, default_text,
};

/// Complete configuration for a harvest run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_paths")]
    pub paths: PathsConfig,

    #[serde(default = "default_render")]
    pub render: RenderConfig,

    #[serde(default = "default_text")]
    pub text: TextConfig,

    #[serde(default = "default_graphics")]
    pub graphics: GraphicsConfig,

    #[serde(default = "default_merge")]
    pub merge: MergeConfig,

    #[serde(default = "default_caption")]
    pub caption: CaptionConfig,

    #[serde(default = "default_classifier")]
    pub classifier: ClassifierConfig,

    #[serde(default = "default_dedup")]
    pub dedup: DedupConfig,

    #[serde(default = "default_context")]
    pub context: ContextConfig,
}

impl Settings {
    /// Reject values that would make a stage meaningless.
    pub fn validate(&self) -> HarvestResult<()> {
        fn invalid(message: &str) -> HarvestResult<()> {
            Err(HarvestError::Config {
                message: message.to_string(),
            })
        }

        if !(self.render.dpi.is_finite() && self.render.dpi > 0.0) {
            return invalid("render.dpi must be a positive number");
        }
        if self.dedup.hash_size == 0 {
            return invalid("dedup.hash_size must be at least 1");
        }
        if !(self.merge.iou_threshold > 0.0 && self.merge.iou_threshold <= 1.0) {
            return invalid("merge.iou_threshold must be in (0, 1]");
        }

        let distances = [
            ("merge.proximity_threshold", self.merge.proximity_threshold),
            ("graphics.merge_distance", self.graphics.merge_distance),
            ("graphics.min_width", self.graphics.min_width),
            ("graphics.min_height", self.graphics.min_height),
            ("caption.search_margin", self.caption.search_margin),
            ("caption.line_gap_stop", self.caption.line_gap_stop),
            ("caption.word_join_gap", self.caption.word_join_gap),
            ("classifier.hint_distance", self.classifier.hint_distance),
            ("text.word_x_tolerance", self.text.word_x_tolerance),
            ("text.word_y_tolerance", self.text.word_y_tolerance),
        ];
        for (key, value) in distances {
            if !(value.is_finite() && value >= 0.0) {
                return Err(HarvestError::Config {
                    message: format!("{} must be a non-negative number", key),
                });
            }
        }

        Ok(())
    }
}
