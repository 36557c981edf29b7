use thiserror::Error;

/// Main error type for a harvest run
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Document processing failed")]
    Processing(#[from] ProcessingError),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("PDF engine unavailable: {message}")]
    PdfEngine { message: String },
}

/// Document processing errors
///
/// These are scoped: a `PageRead` costs one page, a `Render` or `ImageEncode`
/// costs one candidate, a `DocumentLoad` costs one document. None of them stop
/// the batch.
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Failed to load document {path}")]
    DocumentLoad {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to read content from page {page}")]
    PageRead {
        page: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to render region on page {page}")]
    Render {
        page: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to encode image {path}")]
    ImageEncode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to fingerprint image: {message}")]
    Fingerprint { message: String },

    #[error("IO error")]
    Io(#[source] std::io::Error),

    #[error("Failed to serialize figure records")]
    Serialization(#[source] serde_json::Error),
}

impl ProcessingError {
    /// Wrap an arbitrary engine failure as a page read error.
    pub fn page_read(page: usize, message: impl Into<String>) -> Self {
        ProcessingError::PageRead {
            page,
            source: Box::new(std::io::Error::other(message.into())),
        }
    }

    /// Wrap an arbitrary engine failure as a render error.
    pub fn render(page: usize, message: impl Into<String>) -> Self {
        ProcessingError::Render {
            page,
            source: Box::new(std::io::Error::other(message.into())),
        }
    }
}

/// Result type alias for harvest operations
pub type HarvestResult<T> = Result<T, HarvestError>;

/// Result type alias for document processing operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

/// Render an error and its `source()` chain as `outer: inner: root`.
pub fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}
