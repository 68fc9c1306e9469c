//! PDF Reorder Library
//!
//! Pick PDF files, arrange them as thumbnails in a grid and merge them into
//! one document in grid order. This library provides:
//! - The ordered board behind the thumbnail grid, with drag-and-drop swaps
//! - First-page previews through pdfium, with a lopdf outline fallback
//! - Merging PDFs in order with lopdf
//! - Output file naming
//! - The main window state, independent of the GUI toolkit
//!
//! # Example
//!
//! ```no_run
//! use pdf_reorder::board::{Board, Point};
//! use pdf_reorder::pdf::run_merge;
//! use pdf_reorder::thumbnail::OutlineRenderer;
//! use std::path::Path;
//!
//! let mut board = Board::default();
//! let intro = board.add_item(Path::new("intro.pdf"), &OutlineRenderer).unwrap();
//! board.add_item(Path::new("advanced.pdf"), &OutlineRenderer).unwrap();
//!
//! // Drag the intro onto the second cell
//! board.drop_item(intro, Point::new(180.0, 70.0));
//!
//! let report = run_merge(&board.ordered_paths(), Path::new("merged.pdf"));
//! println!("{}", report.message);
//! ```

pub mod app;
pub mod board;
pub mod error;
pub mod naming;
pub mod pdf;
pub mod session;
pub mod thumbnail;

// Re-export commonly used items
pub use error::{Error, Result};
