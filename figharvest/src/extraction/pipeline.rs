//! Per-document extraction pipeline.
//!
//! Pages are processed in order, candidates within a page in order. Each
//! candidate is clipped, rendered, size-filtered, captioned, checked for
//! plain text and for near-duplicates, then written. Context windows are
//! attached once all pages are done.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{debug, info, trace, warn};

use crate::config::Settings;
use crate::error::{ProcessingResult, format_error_chain};
use crate::ingestion::source::{DocumentSource, PageContent};

use super::candidates::merge_candidates;
use super::caption::{Caption, locate_caption};
use super::classifier::{looks_like_plain_text, score_content};
use super::context::ContextIndex;
use super::dedup::{HashLedger, PerceptualHasher};
use super::geometry::BoundingBox;
use super::graphics::{GraphicCluster, GraphicKind, cluster_primitives, nearby_cluster_counts};
use super::labels::{figure_id, synthetic_origin_id};
use super::output::FigureWriter;
use super::records::{DocumentSummary, FigureDocument, FigureRecord};

/// What happened to one candidate region
#[derive(Debug)]
enum CandidateOutcome {
    Accepted(Box<FigureRecord>),
    ClippedAway,
    TooSmall { width: u32, height: u32 },
    PlainText,
    Duplicate,
}

/// Result of processing one document
#[derive(Debug)]
pub struct DocumentOutcome {
    pub document: FigureDocument,
    pub summary: DocumentSummary,
    /// Where the JSON was written
    pub json_path: PathBuf,
}

/// Runs the extraction pipeline with one immutable configuration.
///
/// The hasher is shared between documents; the hash ledger is not.
pub struct FigureHarvester<'a> {
    settings: &'a Settings,
    hasher: PerceptualHasher,
}

impl<'a> FigureHarvester<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            hasher: PerceptualHasher::new(&settings.dedup),
        }
    }

    /// Extract every figure of `source` into `output_root/{document_id}/`.
    ///
    /// Page and candidate failures are logged and skipped; only failing to
    /// create the output folder or write the JSON aborts the document.
    pub fn process_document(
        &self,
        source: &mut dyn DocumentSource,
        output_root: &Path,
    ) -> ProcessingResult<DocumentOutcome> {
        let paper_id = source.document_id().to_string();
        let page_count = source.page_count();
        info!(document = %paper_id, pages = page_count, "Processing document");

        let mut run = DocumentRun {
            settings: self.settings,
            hasher: &self.hasher,
            ledger: HashLedger::new(&self.settings.dedup),
            writer: FigureWriter::create(output_root, &paper_id)?,
            summary: DocumentSummary {
                pages: page_count,
                ..Default::default()
            },
            records: Vec::new(),
        };

        for index in 0..page_count {
            match source.page(index) {
                Ok(page) => run.process_page(source, index, &page),
                Err(e) => {
                    warn!(
                        document = %paper_id,
                        page = index + 1,
                        error = %format_error_chain(&e),
                        "Skipping unreadable page"
                    );
                    run.summary.failed_pages += 1;
                }
            }
        }

        let full_text = document_text(source);
        let index = ContextIndex::new(&full_text);
        debug!(
            document = %paper_id,
            sentences = index.sentence_count(),
            "Indexed body text"
        );
        for record in &mut run.records {
            record.contexts =
                index.contexts_for(&record.origin_id, &record.caption, &self.settings.context);
        }

        let document = FigureDocument {
            paper_id: paper_id.clone(),
            source_sha256: source.content_hash().map(str::to_string),
            figures: run.records,
        };
        let json_path = run.writer.write_document(&document)?;
        let summary = run.summary;

        info!(
            document = %paper_id,
            pages = summary.pages,
            candidates = summary.candidates,
            accepted = summary.accepted,
            too_small = summary.too_small,
            plain_text = summary.plain_text,
            duplicates = summary.duplicates,
            clipped_away = summary.clipped_away,
            failed_candidates = summary.failed_candidates,
            failed_pages = summary.failed_pages,
            rejected = summary.rejected(),
            output = %json_path.display(),
            "Finished document"
        );

        Ok(DocumentOutcome {
            document,
            summary,
            json_path,
        })
    }
}

/// Full text of a document, pages joined by newlines.
///
/// Pages whose text cannot be read contribute an empty string.
fn document_text(source: &dyn DocumentSource) -> String {
    (0..source.page_count())
        .map(|index| {
            source.page_text(index).unwrap_or_else(|e| {
                warn!(
                    page = index + 1,
                    error = %format_error_chain(&e),
                    "Failed to read page text"
                );
                String::new()
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Mutable state of one document's run
struct DocumentRun<'a> {
    settings: &'a Settings,
    hasher: &'a PerceptualHasher,
    ledger: HashLedger,
    writer: FigureWriter,
    summary: DocumentSummary,
    records: Vec<FigureRecord>,
}

impl DocumentRun<'_> {
    fn process_page(&mut self, source: &mut dyn DocumentSource, index: usize, page: &PageContent) {
        let clusters = cluster_primitives(&page.primitives, &self.settings.graphics);
        let candidates = merge_candidates(
            page.images
                .iter()
                .copied()
                .chain(clusters.iter().map(|c| c.bounds)),
            &self.settings.merge,
        );

        trace!(
            page = page.number,
            tokens = page.tokens.len(),
            images = page.images.len(),
            primitives = page.primitives.len(),
            clusters = clusters.len(),
            candidates = candidates.len(),
            "Collected page candidates"
        );

        for (i, bbox) in candidates.iter().enumerate() {
            let candidate = i + 1;
            self.summary.candidates += 1;

            match self.process_candidate(source, index, page, &clusters, bbox, candidate) {
                Ok(CandidateOutcome::Accepted(record)) => {
                    self.summary.accepted += 1;
                    self.records.push(*record);
                }
                Ok(CandidateOutcome::ClippedAway) => {
                    debug!(page = page.number, candidate, "Skipping candidate outside page");
                    self.summary.clipped_away += 1;
                }
                Ok(CandidateOutcome::TooSmall { width, height }) => {
                    debug!(page = page.number, candidate, width, height, "Skipping small image");
                    self.summary.too_small += 1;
                }
                Ok(CandidateOutcome::PlainText) => {
                    self.summary.plain_text += 1;
                }
                Ok(CandidateOutcome::Duplicate) => {
                    self.summary.duplicates += 1;
                }
                Err(e) => {
                    warn!(
                        page = page.number,
                        candidate,
                        error = %format_error_chain(&e),
                        "Failed to extract candidate"
                    );
                    self.summary.failed_candidates += 1;
                }
            }
        }
    }

    fn process_candidate(
        &mut self,
        source: &mut dyn DocumentSource,
        index: usize,
        page: &PageContent,
        clusters: &[GraphicCluster],
        bbox: &BoundingBox,
        candidate: usize,
    ) -> ProcessingResult<CandidateOutcome> {
        let Some(region) = bbox.clip_to_page(page.width, page.height) else {
            return Ok(CandidateOutcome::ClippedAway);
        };

        let render = &self.settings.render;
        let image = source.render_region(index, &region, render.dpi)?;
        if image.width() < render.min_width || image.height() < render.min_height {
            return Ok(CandidateOutcome::TooSmall {
                width: image.width(),
                height: image.height(),
            });
        }

        let caption = locate_caption(
            &page.tokens,
            &region,
            page.width,
            page.height,
            &self.settings.caption,
        );
        let origin_id = caption
            .label
            .as_ref()
            .map(|label| label.origin_id())
            .unwrap_or_else(|| synthetic_origin_id(page.number, candidate));

        let classifier = &self.settings.classifier;
        let hint = nearby_cluster_counts(&region, clusters, classifier.hint_distance);
        let scores = score_content(&page.tokens, &region, &image);
        if looks_like_plain_text(&scores, hint.as_ref(), classifier) {
            debug!(
                page = page.number,
                origin_id = %origin_id,
                text_ratio = scores.text_ratio,
                edge_density = scores.edge_density,
                "Skipping plain text block"
            );
            return Ok(CandidateOutcome::PlainText);
        }

        let fingerprint = self.hasher.fingerprint(&image)?;
        if self.ledger.is_duplicate(&fingerprint) {
            debug!(
                page = page.number,
                origin_id = %origin_id,
                hash = %fingerprint.to_hex(),
                "Skipping near-duplicate image"
            );
            return Ok(CandidateOutcome::Duplicate);
        }

        let image_path = self.save_image(&image, &caption, &origin_id, page.number, candidate)?;
        let phash = fingerprint.to_hex();
        self.ledger.admit(fingerprint);

        let kind = hint
            .map(|counts| counts.kind(classifier))
            .unwrap_or(GraphicKind::Unknown);
        debug!(
            page = page.number,
            origin_id = %origin_id,
            kind = ?kind,
            width = image.width(),
            height = image.height(),
            "Accepted figure"
        );

        Ok(CandidateOutcome::Accepted(Box::new(FigureRecord {
            figure_id: figure_id(&caption.text, caption.label.as_ref(), page.number, candidate),
            origin_id,
            page: page.number,
            caption: caption.text,
            image_path: image_path.display().to_string(),
            width: image.width(),
            height: image.height(),
            phash,
            contexts: Vec::new(),
        })))
    }

    fn save_image(
        &mut self,
        image: &RgbaImage,
        caption: &Caption,
        origin_id: &str,
        page: usize,
        candidate: usize,
    ) -> ProcessingResult<PathBuf> {
        let label = caption
            .label
            .as_ref()
            .map(|label| label.normalized())
            .unwrap_or_else(|| origin_id.to_string());
        let name = self.writer.image_name(page, &label, candidate);
        self.writer.save_png(image, &name)
    }
}
