//! Running the pipeline over many documents.
//!
//! Documents are processed one after another. A document that cannot be
//! opened or written is logged and counted; the batch always continues.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{HarvestError, HarvestResult, ProcessingResult, format_error_chain};
use crate::ingestion::source::DocumentSource;

use super::pipeline::FigureHarvester;

/// Totals over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    pub failed: usize,
    pub figures: usize,
}

/// All `*.pdf` files directly inside `input_dir`, sorted by name.
pub fn discover_documents(input_dir: &Path) -> HarvestResult<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|e| HarvestError::InvalidInput {
        message: format!("cannot read input directory {}: {}", input_dir.display(), e),
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    paths.sort();

    Ok(paths)
}

/// Process every path, opening each with `open`.
pub fn run_batch<'a, F>(paths: &[PathBuf], settings: &Settings, mut open: F) -> BatchReport
where
    F: FnMut(&Path) -> ProcessingResult<Box<dyn DocumentSource + 'a>>,
{
    let harvester = FigureHarvester::new(settings);
    let mut report = BatchReport::default();

    for path in paths {
        let result = open(path).and_then(|mut source| {
            harvester.process_document(source.as_mut(), &settings.paths.output_dir)
        });

        match result {
            Ok(outcome) => {
                report.processed += 1;
                report.figures += outcome.document.figures.len();
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %format_error_chain(&e),
                    "Skipping document"
                );
                report.failed += 1;
            }
        }
    }

    info!(
        processed = report.processed,
        failed = report.failed,
        figures = report.figures,
        "Batch complete"
    );

    report
}
