//! PDF merging functionality using lopdf

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use lopdf::{Document, Object, ObjectId, Dictionary};
use crate::error::{Error, Result};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Options for merging PDFs
#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Input PDF file paths in the order they should be merged
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path
    pub output_path: PathBuf,
}

/// What a successful merge produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub output_path: PathBuf,
    pub input_count: usize,
    pub page_count: usize,
}

/// Outcome of [`run_merge`], ready to show to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub success: bool,
    pub message: String,
}

/// Merge multiple PDF files into a single PDF
///
/// Every page of every input is appended in list order. Based on the lopdf
/// merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// A failure while writing may leave a partial file at the output path.
///
/// # Example
///
/// ```no_run
/// use pdf_reorder::pdf::{MergeOptions, merge_pdfs};
/// use std::path::PathBuf;
///
/// let options = MergeOptions {
///     input_paths: vec![
///         PathBuf::from("1. first.pdf"),
///         PathBuf::from("2. second.pdf"),
///     ],
///     output_path: PathBuf::from("merged.pdf"),
/// };
///
/// merge_pdfs(&options).expect("Failed to merge");
/// ```
pub fn merge_pdfs(options: &MergeOptions) -> Result<MergeSummary> {
    if options.input_paths.is_empty() {
        return Err(Error::NoInputs);
    }

    // Validate all input files exist before loading anything
    for path in &options.input_paths {
        if !path.exists() {
            return Err(Error::FileNotFound(path.clone()));
        }
    }

    let mut documents: Vec<Document> = Vec::new();
    for path in &options.input_paths {
        let doc = Document::load(path).map_err(|source| Error::Unreadable {
            path: path.clone(),
            source,
        })?;

        if doc.get_pages().is_empty() {
            return Err(Error::EmptyPdf(path.clone()));
        }

        documents.push(doc);
    }

    log::info!("Merging {} PDF files", documents.len());

    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // Pages lose their old tree, so pull inherited attributes down first
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &pages {
            flatten_inherited(&mut doc, page_id);
        }
        page_ids.extend(pages);

        objects.extend(doc.objects);
    }

    let mut merged_doc = Document::with_version("1.5");
    merged_doc.objects.extend(objects);

    // new_object_id() must hand out ids above everything just added
    merged_doc.max_id = max_id - 1;

    let pages_id = merged_doc.new_object_id();

    let kids: Vec<Object> = page_ids
        .iter()
        .map(|&id| Object::Reference(id))
        .collect();

    let mut pages_object = Dictionary::new();
    pages_object.set("Type", Object::Name(b"Pages".to_vec()));
    pages_object.set("Count", Object::Integer(page_ids.len() as i64));
    pages_object.set("Kids", Object::Array(kids));

    let catalog_id = merged_doc.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged_doc.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged_doc.objects.insert(pages_id, Object::Dictionary(pages_object));
    merged_doc.trailer.set("Root", Object::Reference(catalog_id));

    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = merged_doc.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    // Drop the inputs' old catalogs and page tree nodes
    merged_doc.prune_objects();
    merged_doc.compress();
    merged_doc
        .save(&options.output_path)
        .map_err(|source| Error::Unwritable {
            path: options.output_path.clone(),
            source,
        })?;

    log::info!(
        "Merged {} pages to {}",
        page_ids.len(),
        options.output_path.display()
    );

    Ok(MergeSummary {
        output_path: options.output_path.clone(),
        input_count: options.input_paths.len(),
        page_count: page_ids.len(),
    })
}

/// Copy attributes the page inherits from its ancestors onto the page itself
fn flatten_inherited(doc: &mut Document, page_id: ObjectId) {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();

    if let Ok(page) = doc.get_dictionary(page_id) {
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        // Bounded so a cyclic Parent chain cannot hang the merge
        for _ in 0..32 {
            let Some(parent_id) = parent else { break };
            let Ok(node) = doc.get_dictionary(parent_id) else { break };
            for key in INHERITABLE {
                let missing = !page.has(key) && !inherited.iter().any(|(k, _)| *k == key);
                if missing {
                    if let Ok(value) = node.get(key) {
                        inherited.push((key, value.clone()));
                    }
                }
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
    }

    if inherited.is_empty() {
        return;
    }
    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
        for (key, value) in inherited {
            page.set(key.to_vec(), value);
        }
    }
}

/// Merge `input_paths` into `output_path`, reporting success or failure as text
///
/// Never fails; the error's message becomes the report message.
pub fn run_merge(input_paths: &[PathBuf], output_path: &Path) -> MergeReport {
    let options = MergeOptions {
        input_paths: input_paths.to_vec(),
        output_path: output_path.to_path_buf(),
    };

    match merge_pdfs(&options) {
        Ok(summary) => MergeReport {
            success: true,
            message: format!("Merged PDF saved as {}", summary.output_path.display()),
        },
        Err(e) => {
            log::warn!("Merge into {} failed: {}", output_path.display(), e);
            MergeReport {
                success: false,
                message: e.to_string(),
            }
        }
    }
}
