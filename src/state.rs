use std::path::{Path, PathBuf};

/// File/model state of the currently loaded threat model
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ModelState {
    pub file_directory: PathBuf,
    pub file_path: Option<PathBuf>,
    pub is_open: bool,
}

impl ModelState {
    pub fn new() -> Self {
        Self {
            file_directory: PathBuf::new(),
            file_path: None,
            is_open: false,
        }
    }

    /// Path as the renderer sees it, empty when nothing is associated yet
    pub fn file_path_display(&self) -> String {
        self.file_path
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Remember the directory of a path that was just opened or saved
    pub fn remember_directory(&mut self, path: &Path) {
        if let Some(parent) = path.parent() {
            self.file_directory = parent.to_path_buf();
        }
    }

    /// Forget the associated file. The last-used directory is kept.
    pub fn reset(&mut self) {
        self.file_path = None;
        self.is_open = false;
    }
}
