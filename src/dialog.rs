use std::future::Future;
use std::path::PathBuf;

use tauri::AppHandle;
use tauri_plugin_dialog::{DialogExt, FilePath, FileDialogBuilder};
use thiserror::Error;
use tokio::sync::oneshot;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl DialogFilter {
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// "Threat Model" filter followed by "All Files"
    pub fn threat_model(extensions: &[String]) -> Vec<DialogFilter> {
        vec![
            DialogFilter {
                name: "Threat Model".to_string(),
                extensions: extensions.to_vec(),
            },
            DialogFilter::new("All Files", &["*"]),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenDialogOptions {
    pub title: String,
    pub filters: Vec<DialogFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDialogOptions {
    pub title: String,
    pub default_path: PathBuf,
    pub filters: Vec<DialogFilter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Cancelled,
    Selected(PathBuf),
}

#[derive(Debug, Error)]
pub enum DialogError {
    #[error("dialog closed without a response")]
    Closed,
    #[error("dialog returned an unusable path: {0}")]
    InvalidPath(String),
}

/// Platform open/save dialogs
pub trait FileDialog: Send + Sync {
    fn show_open(
        &self,
        options: OpenDialogOptions,
    ) -> impl Future<Output = Result<DialogOutcome, DialogError>> + Send;

    fn show_save(
        &self,
        options: SaveDialogOptions,
    ) -> impl Future<Output = Result<DialogOutcome, DialogError>> + Send;
}

// ============================================================================
// Tauri dialogs
// ============================================================================

pub struct TauriFileDialog {
    app_handle: AppHandle,
}

impl TauriFileDialog {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn builder(&self, title: &str, filters: &[DialogFilter]) -> FileDialogBuilder<tauri::Wry> {
        let mut builder = self.app_handle.dialog().file().set_title(title);
        for filter in filters {
            let extensions: Vec<&str> = filter.extensions.iter().map(String::as_str).collect();
            builder = builder.add_filter(filter.name.clone(), &extensions);
        }
        builder
    }
}

/// Wait for the dialog callback to hand over its result
async fn picked(rx: oneshot::Receiver<Option<FilePath>>) -> Result<DialogOutcome, DialogError> {
    let picked = rx.await.map_err(|_| DialogError::Closed)?;
    match picked {
        None => Ok(DialogOutcome::Cancelled),
        Some(file_path) => {
            let display = file_path.to_string();
            file_path
                .into_path()
                .map(DialogOutcome::Selected)
                .map_err(|_| DialogError::InvalidPath(display))
        }
    }
}

impl FileDialog for TauriFileDialog {
    fn show_open(
        &self,
        options: OpenDialogOptions,
    ) -> impl Future<Output = Result<DialogOutcome, DialogError>> + Send {
        let (tx, rx) = oneshot::channel();
        self.builder(&options.title, &options.filters)
            .pick_file(move |file_path| {
                let _ = tx.send(file_path);
            });
        picked(rx)
    }

    fn show_save(
        &self,
        options: SaveDialogOptions,
    ) -> impl Future<Output = Result<DialogOutcome, DialogError>> + Send {
        let (tx, rx) = oneshot::channel();
        let mut builder = self.builder(&options.title, &options.filters);
        if let Some(directory) = options.default_path.parent() {
            if !directory.as_os_str().is_empty() {
                builder = builder.set_directory(directory);
            }
        }
        if let Some(file_name) = options.default_path.file_name() {
            builder = builder.set_file_name(file_name.to_string_lossy());
        }
        builder.save_file(move |file_path| {
            let _ = tx.send(file_path);
        });
        picked(rx)
    }
}
