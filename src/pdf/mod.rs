//! PDF merging module

pub mod merge;

// Re-export commonly used items
pub use merge::{merge_pdfs, run_merge, MergeOptions, MergeReport, MergeSummary};
