//! Figure and table extraction.
//!
//! Stages, in pipeline order: vector clustering ([`graphics`]), candidate
//! merging ([`candidates`]), caption search ([`caption`]), plain-text
//! rejection ([`classifier`]), near-duplicate rejection ([`dedup`]) and the
//! body-text context pass ([`context`]). [`pipeline`] sequences them for one
//! document and [`batch`] runs many documents.

pub mod batch;
pub mod candidates;
pub mod caption;
pub mod classifier;
pub mod context;
pub mod dedup;
pub mod geometry;
pub mod graphics;
pub mod labels;
pub mod output;
pub mod pipeline;
pub mod records;

pub use batch::{discover_documents, run_batch};
