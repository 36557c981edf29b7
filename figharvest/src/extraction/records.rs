//! Output records.

use serde::{Deserialize, Serialize};

/// One accepted figure or table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRecord {
    /// Label as written ("Fig. 3"), or a fallback id
    pub figure_id: String,
    /// Uppercase label used for cross-referencing ("FIG. 3", "表 2")
    pub origin_id: String,
    /// 1-based page number
    pub page: usize,
    /// Caption text, empty when none was found
    pub caption: String,
    /// Path of the rendered PNG
    pub image_path: String,
    pub width: u32,
    pub height: u32,
    /// Hex perceptual fingerprint
    pub phash: String,
    /// Body-text windows that reference this figure
    #[serde(default)]
    pub contexts: Vec<String>,
}

/// Everything extracted from one source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureDocument {
    pub paper_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sha256: Option<String>,
    pub figures: Vec<FigureRecord>,
}

/// Per-document counters, logged when a document finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub pages: usize,
    pub candidates: usize,
    pub accepted: usize,
    pub too_small: usize,
    pub plain_text: usize,
    pub duplicates: usize,
    pub clipped_away: usize,
    pub failed_candidates: usize,
    pub failed_pages: usize,
}

impl DocumentSummary {
    /// Candidates that did not become records.
    pub fn rejected(&self) -> usize {
        self.too_small + self.plain_text + self.duplicates + self.clipped_away + self.failed_candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FigureRecord {
        FigureRecord {
            figure_id: "Figure 1".to_string(),
            origin_id: "FIGURE 1".to_string(),
            page: 1,
            caption: "Figure 1. System overview.".to_string(),
            image_path: "raw_img/paper/paper_p1_FIGURE 1.png".to_string(),
            width: 500,
            height: 375,
            phash: "ffe0c08080c0e0ff".to_string(),
            contexts: Vec::new(),
        }
    }

    #[test]
    fn test_document_json_shape() {
        let doc = FigureDocument {
            paper_id: "paper".to_string(),
            source_sha256: None,
            figures: vec![record()],
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("source_sha256").is_none());
        assert_eq!(value["paper_id"], "paper");
        let figure = &value["figures"][0];
        for key in [
            "figure_id",
            "origin_id",
            "page",
            "caption",
            "image_path",
            "width",
            "height",
            "phash",
            "contexts",
        ] {
            assert!(figure.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(figure["contexts"], serde_json::json!([]));
    }

    #[test]
    fn test_document_roundtrip_with_hash() {
        let doc = FigureDocument {
            paper_id: "paper".to_string(),
            source_sha256: Some("ab".repeat(32)),
            figures: vec![record()],
        };
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: FigureDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_summary_rejected() {
        let summary = DocumentSummary {
            candidates: 9,
            accepted: 3,
            too_small: 2,
            plain_text: 1,
            duplicates: 1,
            clipped_away: 1,
            failed_candidates: 1,
            ..Default::default()
        };
        assert_eq!(summary.rejected(), 6);
        assert_eq!(summary.accepted + summary.rejected(), summary.candidates);
    }
}
