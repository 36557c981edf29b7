//! Document decoding.
//!
//! [`source::DocumentSource`] is what the extraction pipeline consumes;
//! [`pdf::PdfiumSource`] implements it for PDF files.

pub mod hash;
#[cfg(test)]
pub mod memory;
pub mod pdf;
pub mod source;

pub use pdf::{PdfiumSource, create_pdfium};
pub use source::DocumentSource;
