use std::path::PathBuf;

use clap::Parser;
use tracing::info;

mod config;
mod error;
mod extraction;
mod ingestion;

use crate::config::{Settings, load_settings};
use crate::error::HarvestResult;
use crate::extraction::{discover_documents, run_batch};
use crate::ingestion::{DocumentSource, PdfiumSource, create_pdfium};

/// Extract figures and tables from PDF papers
#[derive(Debug, Parser)]
#[command(name = "figharvest", version, about)]
struct Args {
    /// PDF files to process (default: every *.pdf in the input directory)
    files: Vec<PathBuf>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory scanned for PDFs when no files are given
    #[arg(long, value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// Root directory for per-document output folders
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Rendering resolution for extracted figures
    #[arg(long)]
    dpi: Option<f64>,

    /// Debug-level logging for figharvest
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    init_logging(args.verbose, args.json_logs);

    info!("Starting figharvest v{}", env!("CARGO_PKG_VERSION"));

    let settings = resolve_settings(&args)?;
    info!(
        input_dir = %settings.paths.input_dir.display(),
        output_dir = %settings.paths.output_dir.display(),
        dpi = settings.render.dpi,
        "Configuration loaded"
    );

    let pdfium = create_pdfium()?;

    let paths = if args.files.is_empty() {
        discover_documents(&settings.paths.input_dir)?
    } else {
        args.files.clone()
    };
    info!(documents = paths.len(), "Processing documents");

    run_batch(&paths, &settings, |path| {
        PdfiumSource::open(&pdfium, path, &settings.text)
            .map(|source| Box::new(source) as Box<dyn DocumentSource>)
    });

    Ok(())
}

/// Load settings and apply command line overrides on top.
fn resolve_settings(args: &Args) -> HarvestResult<Settings> {
    let mut settings = load_settings(args.config.as_deref())?;

    if let Some(dir) = &args.input_dir {
        settings.paths.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        settings.paths.output_dir = dir.clone();
    }
    if let Some(dpi) = args.dpi {
        settings.render.dpi = dpi;
    }

    settings.validate()?;
    Ok(settings)
}

fn init_logging(verbose: bool, json: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // Use RUST_LOG if set, otherwise default to info level for our crate
    let default_directive = if verbose {
        "figharvest=debug"
    } else {
        "figharvest=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        let format = fmt::format()
            .with_target(true)
            .with_thread_ids(true)
            .compact();
        registry.with(fmt::layer().event_format(format)).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_settings() {
        let args = Args::parse_from([
            "figharvest",
            "--output-dir",
            "out",
            "--dpi",
            "300",
            "a.pdf",
            "b.pdf",
        ]);
        assert_eq!(args.files, vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")]);

        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.paths.output_dir, PathBuf::from("out"));
        assert_eq!(settings.render.dpi, 300.0);
    }

    #[test]
    fn test_invalid_dpi_override_rejected() {
        let args = Args::parse_from(["figharvest", "--dpi=-10"]);
        assert!(resolve_settings(&args).is_err());
    }
}
