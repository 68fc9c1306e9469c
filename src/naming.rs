//! Output file naming

use std::path::Path;

/// Stem used when the output name is generated
pub const AUTO_NAME_STEM: &str = "Merged_Output";

const EXTENSION: &str = ".pdf";

/// Append `.pdf` to `name` unless it already ends with it
pub fn normalize_output_name(name: &str) -> String {
    if name.ends_with(EXTENSION) {
        name.to_string()
    } else {
        format!("{}{}", name, EXTENSION)
    }
}

/// First free generated name in `dir`
///
/// Tries `Merged_Output.pdf`, then `Merged_Output_001.pdf`,
/// `Merged_Output_002.pdf` and so on.
pub fn auto_output_name(dir: &Path) -> String {
    let first = format!("{}{}", AUTO_NAME_STEM, EXTENSION);
    if !dir.join(&first).exists() {
        return first;
    }

    let mut counter: u32 = 1;
    loop {
        let candidate = format!("{}_{:03}{}", AUTO_NAME_STEM, counter, EXTENSION);
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_appends_extension() {
        assert_eq!(normalize_output_name("result"), "result.pdf");
        assert_eq!(normalize_output_name("result.pdf"), "result.pdf");
        assert_eq!(normalize_output_name("archive.tar"), "archive.tar.pdf");
    }

    #[test]
    fn test_auto_name_in_empty_dir() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        assert_eq!(auto_output_name(dir.path()), "Merged_Output.pdf");
    }

    #[test]
    fn test_auto_name_skips_existing() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("Merged_Output.pdf"), b"").unwrap();
        assert_eq!(auto_output_name(dir.path()), "Merged_Output_001.pdf");

        fs::write(dir.path().join("Merged_Output_001.pdf"), b"").unwrap();
        assert_eq!(auto_output_name(dir.path()), "Merged_Output_002.pdf");
    }

    #[test]
    fn test_auto_name_fills_first_gap() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(dir.path().join("Merged_Output.pdf"), b"").unwrap();
        fs::write(dir.path().join("Merged_Output_002.pdf"), b"").unwrap();
        assert_eq!(auto_output_name(dir.path()), "Merged_Output_001.pdf");
    }
}
