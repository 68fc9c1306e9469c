//! First-page previews for the board
//!
//! Rasterization is delegated to pdfium through [`PdfiumRenderer`]. When the
//! pdfium library cannot be bound, [`OutlineRenderer`] draws a blank page
//! silhouette sized from the page's MediaBox instead, which still rejects
//! files lopdf cannot read.

use std::path::{Path, PathBuf};

use lopdf::{Document, Object, ObjectId};
use pdfium_render::prelude::*;

use crate::error::{Error, Result};

/// Longest edge of a rendered preview, in pixels
pub const PREVIEW_EDGE: u32 = 100;

/// Names longer than this are truncated for display
const NAME_LIMIT: usize = 15;
/// Characters kept from a truncated name
const NAME_KEEP: usize = 12;

/// A decoded RGBA8 bitmap of one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl Thumbnail {
    /// Create a thumbnail filled with one color
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut rgba = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            rgba.extend_from_slice(&color);
        }
        Self { width, height, rgba }
    }

    /// Size as `[width, height]`, the shape egui textures expect
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Renders a single page of a PDF into a bitmap
pub trait PageRenderer {
    /// Render page `page_index` (zero-based) so that neither edge exceeds `max_edge`
    fn render_page(&self, path: &Path, page_index: u16, max_edge: u32) -> Result<Thumbnail>;

    /// Render the first page at the standard preview size
    fn render_first_page(&self, path: &Path) -> Result<Thumbnail> {
        self.render_page(path, 0, PREVIEW_EDGE)
    }
}

/// Label shown under a thumbnail
///
/// File names longer than 15 characters are cut to their first 12 followed
/// by `...`.
pub fn display_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if name.chars().count() <= NAME_LIMIT {
        name
    } else {
        let mut short: String = name.chars().take(NAME_KEEP).collect();
        short.push_str("...");
        short
    }
}

fn render_error(path: &Path, message: impl ToString) -> Error {
    Error::Render {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Page renderer backed by the pdfium library
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind to pdfium, trying `library_dir` first when given and then the system library
    pub fn bind(library_dir: Option<&Path>) -> Result<Self> {
        let bindings = match library_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                .or_else(|_| Pdfium::bind_to_system_library()),
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| Error::PdfiumUnavailable(e.to_string()))?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRenderer for PdfiumRenderer {
    fn render_page(&self, path: &Path, page_index: u16, max_edge: u32) -> Result<Thumbnail> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| render_error(path, e))?;

        let page = document
            .pages()
            .get(page_index.into())
            .map_err(|e| render_error(path, e))?;

        let edge = max_edge as i32;
        let config = PdfRenderConfig::new()
            .set_target_width(edge)
            .set_maximum_height(edge);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| render_error(path, e))?;

        Ok(Thumbnail {
            width: bitmap.width() as u32,
            height: bitmap.height() as u32,
            rgba: bitmap.as_rgba_bytes(),
        })
    }
}

/// Fallback renderer that draws a page outline instead of page content
#[derive(Debug, Default, Clone, Copy)]
pub struct OutlineRenderer;

const PAPER: [u8; 4] = [255, 255, 255, 255];
const EDGE: [u8; 4] = [160, 160, 160, 255];

impl PageRenderer for OutlineRenderer {
    fn render_page(&self, path: &Path, page_index: u16, max_edge: u32) -> Result<Thumbnail> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let doc = Document::load(path).map_err(|source| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let page_number = u32::from(page_index) + 1;
        let page_id = doc
            .get_pages()
            .get(&page_number)
            .copied()
            .ok_or_else(|| render_error(path, format!("no page {}", page_number)))?;

        // US Letter when the page tree carries no usable MediaBox
        let (page_width, page_height) = media_box(&doc, page_id).unwrap_or((612.0, 792.0));
        let (width, height) = fit(page_width, page_height, max_edge.max(1));

        let mut thumb = Thumbnail::solid(width, height, PAPER);
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    let at = ((y * width + x) * 4) as usize;
                    thumb.rgba[at..at + 4].copy_from_slice(&EDGE);
                }
            }
        }
        Ok(thumb)
    }
}

/// Scale a page size so its longest edge equals `max_edge`
fn fit(width: f32, height: f32, max_edge: u32) -> (u32, u32) {
    let edge = max_edge as f32;
    if width >= height {
        let h = (edge * height / width).round().max(1.0);
        (max_edge, h as u32)
    } else {
        let w = (edge * width / height).round().max(1.0);
        (w as u32, max_edge)
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Page width and height from the MediaBox, following inherited values up the tree
fn media_box(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let mut current = Some(page_id);
    // Bounded walk; a malformed tree could loop through Parent
    for _ in 0..32 {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Ok(Object::Array(values)) = dict.get(b"MediaBox") {
            let values: Vec<f32> = values.iter().filter_map(number).collect();
            if values.len() == 4 {
                let width = (values[2] - values[0]).abs();
                let height = (values[3] - values[1]).abs();
                if width > 0.0 && height > 0.0 {
                    return Some((width, height));
                }
            }
            return None;
        }
        current = match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => Some(*id),
            _ => None,
        };
    }
    None
}

/// Paths from `paths` whose extension is `.pdf`, compared case-insensitively
pub fn pdf_paths(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|p| {
            p.extension()
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_short_names_unchanged() {
        assert_eq!(display_name(Path::new("/tmp/report.pdf")), "report.pdf");
        // Exactly 15 characters stays whole
        assert_eq!(display_name(Path::new("abcdefghijk.pdf")), "abcdefghijk.pdf");
    }

    #[test]
    fn test_display_name_truncates_long_names() {
        assert_eq!(
            display_name(Path::new("quarterly-report-2024.pdf")),
            "quarterly-re..."
        );
        // 16 characters is over the limit
        assert_eq!(display_name(Path::new("abcdefghijkl.pdf")), "abcdefghijkl...");
    }

    #[test]
    fn test_display_name_counts_characters_not_bytes() {
        assert_eq!(display_name(Path::new("übersicht.pdf")), "übersicht.pdf");
        assert_eq!(
            display_name(Path::new("ééééééééééééééé.pdf")),
            "éééééééééééé..."
        );
    }

    #[test]
    fn test_fit_keeps_aspect_ratio() {
        assert_eq!(fit(612.0, 792.0, 100), (77, 100));
        assert_eq!(fit(792.0, 612.0, 100), (100, 77));
        assert_eq!(fit(500.0, 500.0, 100), (100, 100));
    }

    #[test]
    fn test_solid_thumbnail_size() {
        let thumb = Thumbnail::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(thumb.rgba.len(), 24);
        assert_eq!(thumb.size(), [3, 2]);
        assert_eq!(&thumb.rgba[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_outline_renderer_missing_file() {
        let result = OutlineRenderer.render_first_page(Path::new("nonexistent.pdf"));
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_pdf_paths_filters_extensions() {
        let paths = pdf_paths(vec![
            PathBuf::from("a.pdf"),
            PathBuf::from("b.PDF"),
            PathBuf::from("notes.txt"),
            PathBuf::from("noext"),
        ]);
        assert_eq!(paths, vec![PathBuf::from("a.pdf"), PathBuf::from("b.PDF")]);
    }
}
