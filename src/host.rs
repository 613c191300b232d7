use serde::Serialize;
use tauri::{AppHandle, Emitter};
use tauri_plugin_opener::OpenerExt;

/// Label of the window that hosts the diagram editor
pub const MAIN_WINDOW: &str = "main";

pub const CLOSE_MODEL_EVENT: &str = "close-model";
pub const OPEN_MODEL_EVENT: &str = "open-model";
pub const SAVE_MODEL_EVENT: &str = "save-model";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenModelPayload {
    pub file_name: String,
    pub contents: String,
}

/// Notifications sent to the renderer
pub trait Renderer: Send + Sync {
    /// The model at `file_path` is being closed
    fn close_model(&self, file_path: &str);

    /// A model was read from disk. Only the file name is shared, never the full path.
    fn open_model(&self, file_name: &str, contents: &str);

    /// Ask the renderer to send its model back through `model_saved`
    fn request_save(&self);
}

/// Opens URLs in the user's browser
pub trait ExternalLinks: Send + Sync {
    fn open_url(&self, url: &str) -> Result<(), String>;
}

// ============================================================================
// Tauri host
// ============================================================================

pub struct TauriRenderer {
    app_handle: AppHandle,
}

impl TauriRenderer {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }

    fn send<S: Serialize + Clone>(&self, event: &str, payload: S) {
        if let Err(e) = self.app_handle.emit_to(MAIN_WINDOW, event, payload) {
            log::error!("Failed to emit {} event: {}", event, e);
        }
    }
}

impl Renderer for TauriRenderer {
    fn close_model(&self, file_path: &str) {
        self.send(CLOSE_MODEL_EVENT, file_path.to_string());
    }

    fn open_model(&self, file_name: &str, contents: &str) {
        self.send(
            OPEN_MODEL_EVENT,
            OpenModelPayload {
                file_name: file_name.to_string(),
                contents: contents.to_string(),
            },
        );
    }

    fn request_save(&self) {
        self.send(SAVE_MODEL_EVENT, ());
    }
}

pub struct TauriLinks {
    app_handle: AppHandle,
}

impl TauriLinks {
    pub fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl ExternalLinks for TauriLinks {
    fn open_url(&self, url: &str) -> Result<(), String> {
        self.app_handle
            .opener()
            .open_url(url, None::<&str>)
            .map_err(|e| e.to_string())
    }
}
