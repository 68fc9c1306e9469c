//! Main window state, independent of the GUI toolkit
//!
//! The front-end forwards button presses here and shows whatever [`Notice`]
//! comes back. Keeping this free of egui types lets the merge flow be tested
//! directly.

use std::path::{Path, PathBuf};

use crate::board::Board;
use crate::naming::{auto_output_name, normalize_output_name};
use crate::pdf::run_merge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A blocking message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Warning, title, message)
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, title, message)
    }

    fn new(kind: NoticeKind, title: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

/// Result of pressing "Merge PDFs"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeFeedback {
    pub notice: Notice,
    /// Folder to reveal in the file manager after a successful merge
    pub reveal: Option<PathBuf>,
}

impl MergeFeedback {
    fn aborted(notice: Notice) -> Self {
        Self {
            notice,
            reveal: None,
        }
    }
}

/// Board plus the output controls of the main window
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    output_name: String,
    auto_name: bool,
    output_dir: PathBuf,
    progress: f32,
}

impl Session {
    /// Relative output names resolve against `output_dir`
    pub fn new(board: Board, output_dir: PathBuf) -> Self {
        Self {
            board,
            output_name: String::new(),
            auto_name: false,
            output_dir,
            progress: 0.0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Mutable access for the text field; locked while auto-naming
    pub fn output_name_mut(&mut self) -> Option<&mut String> {
        if self.auto_name {
            None
        } else {
            Some(&mut self.output_name)
        }
    }

    pub fn set_output_name(&mut self, name: impl Into<String>) {
        if !self.auto_name {
            self.output_name = name.into();
        }
    }

    pub fn auto_name(&self) -> bool {
        self.auto_name
    }

    /// Turning auto-naming on fills in a free name, turning it off clears the field
    pub fn set_auto_name(&mut self, enabled: bool) {
        self.auto_name = enabled;
        if enabled {
            self.output_name = auto_output_name(&self.output_dir);
        } else {
            self.output_name.clear();
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fraction shown by the progress bar, filled once a merge has finished
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Path the next merge writes to, `None` while the name is blank
    ///
    /// The name is used as typed; only the `.pdf` suffix is added.
    pub fn resolved_output(&self) -> Option<PathBuf> {
        if self.output_name.trim().is_empty() {
            return None;
        }
        Some(self.output_dir.join(normalize_output_name(&self.output_name)))
    }

    /// Remove every PDF from the board
    pub fn clear(&mut self) {
        self.board.clear();
    }

    /// Merge the board's PDFs into the named output file
    pub fn merge(&mut self) -> MergeFeedback {
        let inputs = self.board.ordered_paths();
        if inputs.is_empty() {
            return MergeFeedback::aborted(Notice::warning("Warning", "No PDF files selected."));
        }

        let Some(output) = self.resolved_output() else {
            return MergeFeedback::aborted(Notice::warning(
                "Warning",
                "Output file name not specified.",
            ));
        };
        let report = run_merge(&inputs, &output);

        if !report.success {
            self.progress = 0.0;
            return MergeFeedback::aborted(Notice::error(
                "Error",
                format!("Failed to merge PDFs: {}", report.message),
            ));
        }

        self.progress = 1.0;
        if self.auto_name {
            self.output_name = auto_output_name(&self.output_dir);
        }

        let folder = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        MergeFeedback {
            notice: Notice::info("Success", report.message),
            reveal: Some(folder),
        }
    }
}

/// Open `dir` in the platform file manager
///
/// Failures are logged only.
pub fn reveal_folder(dir: &Path) {
    if let Err(e) = open::that_detached(dir) {
        log::warn!("Could not open folder {}: {}", dir.display(), e);
    }
}
