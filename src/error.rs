//! Error types for the PDF reorder library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF reorder library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// An input exists but could not be parsed as a PDF
    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: lopdf::Error,
    },

    /// The merged document could not be written
    #[error("Cannot write {}: {source}", .path.display())]
    Unwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid PDF (no pages)
    #[error("PDF has no pages: {}", .0.display())]
    EmptyPdf(PathBuf),

    /// Nothing to merge
    #[error("No input files provided")]
    NoInputs,

    /// Thumbnail rendering failed
    #[error("Cannot render preview of {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    /// The pdfium library could not be loaded
    #[error("pdfium library unavailable: {0}")]
    PdfiumUnavailable(String),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No PDF files found matching pattern: {0}")]
    NoFilesMatched(String),
}
