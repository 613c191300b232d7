//! Open/save/close coordination for the threat model file.
//!
//! The controller owns the [`ModelState`] and is the only thing that mutates
//! it. Dialog and I/O operations share a single-flight guard, so a second
//! request made while one is still awaiting the user or the disk is turned
//! away with [`Outcome::Busy`] instead of racing on `file_path`.
//!
//! `close`, `model_closed` and `model_opened` never wait, so they are not
//! turned away. Each of them starts a new generation instead, and an
//! operation that was pending across one of them finishes with
//! [`Outcome::Closed`] without touching the state or the disk.

use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use serde_json::Value;

use crate::config::DesktopConfig;
use crate::dialog::{DialogFilter, DialogOutcome, FileDialog, OpenDialogOptions, SaveDialogOptions};
use crate::error::LifecycleError;
use crate::host::Renderer;
use crate::locale::{Locale, LocaleContext, Messages, UnknownLocale};
use crate::recent::RecentDocuments;
use crate::state::ModelState;
use crate::storage::ModelStorage;

/// Result of a lifecycle operation. Failures have already been logged.
#[derive(Debug)]
pub enum Outcome {
    Opened(PathBuf),
    Saved(PathBuf),
    /// The renderer was asked for the model data
    SaveRequested,
    Cancelled,
    NotOpen,
    Busy,
    /// The model was closed or replaced while the operation was pending
    Closed,
    Failed(LifecycleError),
}

/// Settings the controller needs from [`DesktopConfig`]
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub default_file_name: String,
    pub model_extensions: Vec<String>,
}

impl From<&DesktopConfig> for LifecycleSettings {
    fn from(config: &DesktopConfig) -> Self {
        Self {
            default_file_name: config.default_file_name.clone(),
            model_extensions: config.model_extensions.clone(),
        }
    }
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self::from(&DesktopConfig::default())
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

/// A guarded operation and the generation it started in
struct Pending<'a> {
    _busy: BusyGuard<'a>,
    generation: u64,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ============================================================================
// Controller
// ============================================================================

pub struct ModelLifecycle<D, S, R, N> {
    state: Mutex<ModelState>,
    busy: AtomicBool,
    /// Bumped under the state lock whenever the model is closed or replaced
    generation: AtomicU64,
    locale: LocaleContext,
    settings: LifecycleSettings,
    dialog: D,
    storage: S,
    recent: R,
    renderer: N,
}

impl<D, S, R, N> ModelLifecycle<D, S, R, N>
where
    D: FileDialog,
    S: ModelStorage,
    R: RecentDocuments,
    N: Renderer,
{
    pub fn new(
        dialog: D,
        storage: S,
        recent: R,
        renderer: N,
        locale: Locale,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            state: Mutex::new(ModelState::new()),
            busy: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            locale: LocaleContext::new(locale),
            settings,
            dialog,
            storage,
            recent,
            renderer,
        }
    }

    /// Copy of the current model state
    pub fn state(&self) -> ModelState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn locale(&self) -> Locale {
        self.locale.current()
    }

    pub fn messages(&self) -> &'static Messages {
        self.locale.messages()
    }

    pub fn set_locale(&self, code: &str) -> Result<Locale, UnknownLocale> {
        self.locale.set_locale(code)
    }

    pub fn recent_documents(&self) -> &R {
        &self.recent
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut ModelState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    /// Replace the model outside of any pending operation
    fn start_generation(&self, f: impl FnOnce(&mut ModelState)) {
        self.with_state(|state| {
            self.generation.fetch_add(1, Ordering::AcqRel);
            f(state)
        });
    }

    /// Apply `f` only if no close or replacement happened since `generation`
    fn with_current_state<T>(
        &self,
        generation: u64,
        f: impl FnOnce(&mut ModelState) -> T,
    ) -> Option<T> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if self.generation.load(Ordering::Acquire) != generation {
            log::debug!("Model was closed while an operation was pending, dropping its result");
            return None;
        }
        Some(f(&mut state))
    }

    fn begin(&self, operation: &str) -> Option<Pending<'_>> {
        let Some(busy) = BusyGuard::acquire(&self.busy) else {
            log::warn!("Ignoring {} request, another model operation is in progress", operation);
            return None;
        };
        let generation = self.with_state(|_| self.generation.load(Ordering::Acquire));
        Some(Pending {
            _busy: busy,
            generation,
        })
    }

    fn filters(&self) -> Vec<DialogFilter> {
        DialogFilter::threat_model(&self.settings.model_extensions)
    }

    // ========================================================================
    // Menu operations
    // ========================================================================

    /// Show the open dialog and read the chosen model
    pub async fn open(&self) -> Outcome {
        let Some(pending) = self.begin("open") else {
            return Outcome::Busy;
        };
        let messages = self.messages();

        if self.state().is_open {
            // TODO: ask the renderer whether the open model has unsaved changes
            log::debug!("Checking that the existing file is not modified");
        }

        let options = OpenDialogOptions {
            title: messages.desktop.file.open.to_string(),
            filters: self.filters(),
        };
        match self.dialog.show_open(options).await {
            Ok(DialogOutcome::Selected(path)) => {
                log::debug!("{}: {}", messages.desktop.file.open, path.display());
                let current = self.with_current_state(pending.generation, |state| {
                    state.file_path = Some(path.clone());
                });
                if current.is_none() {
                    return Outcome::Closed;
                }
                self.read_model(path, pending.generation).await
            }
            Ok(DialogOutcome::Cancelled) => {
                log::debug!("{} canceled", messages.desktop.file.open);
                Outcome::Cancelled
            }
            Err(e) => {
                log::warn!("{}: {}", messages.threatmodel.errors.open, e);
                self.with_current_state(pending.generation, |state| state.is_open = false);
                Outcome::Failed(e.into())
            }
        }
    }

    /// Open a path picked from the recent documents menu
    pub async fn open_path(&self, path: PathBuf) -> Outcome {
        let Some(pending) = self.begin("open") else {
            return Outcome::Busy;
        };
        log::debug!("{}: {}", self.messages().desktop.file.open, path.display());
        self.with_state(|state| state.file_path = Some(path.clone()));
        self.read_model(path, pending.generation).await
    }

    /// Write the model to its current file
    pub async fn save(&self, model_data: Option<Value>) -> Outcome {
        let Some(pending) = self.begin("save") else {
            return Outcome::Busy;
        };
        self.save_current(model_data, pending.generation).await
    }

    /// Ask for a new location, then write the model there
    pub async fn save_as(&self, model_data: Option<Value>, file_name: Option<String>) -> Outcome {
        let Some(pending) = self.begin("save as") else {
            return Outcome::Busy;
        };
        self.save_to_new_location(model_data, file_name, pending.generation)
            .await
    }

    /// Tell the renderer the model is closing, then forget it
    pub fn close(&self) {
        let file_path = self.state().file_path_display();
        log::debug!("{}: {}", self.messages().desktop.file.close, file_path);
        self.renderer.close_model(&file_path);
        self.model_closed();
    }

    // ========================================================================
    // Renderer requests
    // ========================================================================

    /// The renderer wants its model saved. The first save of a model the
    /// renderer created goes through the save dialog.
    pub async fn model_saved(&self, model_data: Value, file_name: Option<String>) -> Outcome {
        let Some(pending) = self.begin("save") else {
            return Outcome::Busy;
        };
        if self.state().file_path.is_none() {
            self.save_to_new_location(Some(model_data), file_name, pending.generation)
                .await
        } else {
            self.save_current(Some(model_data), pending.generation).await
        }
    }

    pub fn model_closed(&self) {
        self.start_generation(ModelState::reset);
    }

    /// The renderer created a model. Its path stays empty until the first save.
    pub fn model_opened(&self) {
        self.start_generation(|state| {
            state.file_path = None;
            state.is_open = true;
        });
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn read_model(&self, path: PathBuf, generation: u64) -> Outcome {
        let messages = self.messages();
        let contents = self.storage.read(&path).await.and_then(|bytes| {
            String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
        });
        match contents {
            Ok(contents) => {
                log::debug!("Read {} bytes from {}", contents.len(), path.display());
                let current = self.with_current_state(generation, |state| {
                    state.is_open = true;
                    state.remember_directory(&path);
                });
                if current.is_none() {
                    return Outcome::Closed;
                }
                self.recent.add_recent(&path);
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                self.renderer.open_model(&file_name, &contents);
                Outcome::Opened(path)
            }
            Err(source) => {
                log::warn!("{}: {}", messages.threatmodel.errors.open, source);
                self.with_current_state(generation, |state| state.is_open = false);
                Outcome::Failed(LifecycleError::Read { path, source })
            }
        }
    }

    async fn save_current(&self, model_data: Option<Value>, generation: u64) -> Outcome {
        let state = self.state();
        if !state.is_open {
            log::debug!("{}: empty file", self.messages().desktop.file.save);
            return Outcome::NotOpen;
        }
        match state.file_path {
            Some(path) => self.write_or_request(path, model_data).await,
            None => self.save_to_new_location(model_data, None, generation).await,
        }
    }

    async fn save_to_new_location(
        &self,
        model_data: Option<Value>,
        file_name: Option<String>,
        generation: u64,
    ) -> Outcome {
        let messages = self.messages();
        let file_name = file_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.settings.default_file_name.clone());
        let options = SaveDialogOptions {
            title: messages.desktop.file.save_as.to_string(),
            default_path: self.state().file_directory.join(file_name),
            filters: self.filters(),
        };

        match self.dialog.show_save(options).await {
            Ok(DialogOutcome::Selected(path)) => {
                log::debug!("{}: {}", messages.desktop.file.save_as, path.display());
                let current = self.with_current_state(generation, |state| {
                    state.file_path = Some(path.clone());
                    state.is_open = true;
                    state.remember_directory(&path);
                });
                if current.is_none() {
                    return Outcome::Closed;
                }
                self.recent.add_recent(&path);
                self.write_or_request(path, model_data).await
            }
            Ok(DialogOutcome::Cancelled) => {
                log::debug!("{} canceled", messages.desktop.file.save_as);
                Outcome::Cancelled
            }
            Err(e) => {
                log::error!(
                    "{}: {}: {}",
                    messages.desktop.file.save_as,
                    messages.threatmodel.errors.save,
                    e
                );
                self.with_current_state(generation, |state| state.is_open = false);
                Outcome::Failed(e.into())
            }
        }
    }

    async fn write_or_request(&self, path: PathBuf, model_data: Option<Value>) -> Outcome {
        match model_data {
            Some(model_data) => self.write_model(path, &model_data).await,
            None => {
                log::debug!("Requesting model data from the renderer for {}", path.display());
                self.renderer.request_save();
                Outcome::SaveRequested
            }
        }
    }

    async fn write_model(&self, path: PathBuf, model_data: &Value) -> Outcome {
        let messages = self.messages();
        let contents = match serde_json::to_string_pretty(model_data) {
            Ok(contents) => contents,
            Err(e) => {
                log::error!("{}: {}", messages.threatmodel.errors.save, e);
                return Outcome::Failed(e.into());
            }
        };
        match self.storage.write(&path, contents).await {
            Ok(()) => {
                log::debug!("{}: {}", messages.threatmodel.saved, path.display());
                Outcome::Saved(path)
            }
            Err(source) => {
                log::error!("{}: {}", messages.threatmodel.errors.save, source);
                Outcome::Failed(LifecycleError::Write { path, source })
            }
        }
    }
}
