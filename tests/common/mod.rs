//! Test harness and in-memory doubles for lifecycle integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use threat_dragon_lib::{
    DialogError, DialogOutcome, ExternalLinks, FileDialog, LifecycleSettings, Locale,
    ModelLifecycle, ModelStorage, OpenDialogOptions, RecentStore, Renderer, SaveDialogOptions,
};
use tokio::sync::Notify;

// ============================================================================
// Dialog
// ============================================================================

/// Answers dialogs from a queue. An empty queue means the user cancelled.
#[derive(Clone, Default)]
pub struct ScriptedDialog {
    open_responses: Arc<Mutex<VecDeque<Result<DialogOutcome, DialogError>>>>,
    save_responses: Arc<Mutex<VecDeque<Result<DialogOutcome, DialogError>>>>,
    pub open_calls: Arc<Mutex<Vec<OpenDialogOptions>>>,
    pub save_calls: Arc<Mutex<Vec<SaveDialogOptions>>>,
    hold: Arc<AtomicBool>,
    pub entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl ScriptedDialog {
    pub fn select_on_open(&self, path: &str) {
        self.open_responses
            .lock()
            .unwrap()
            .push_back(Ok(DialogOutcome::Selected(PathBuf::from(path))));
    }

    pub fn fail_on_open(&self) {
        self.open_responses
            .lock()
            .unwrap()
            .push_back(Err(DialogError::Closed));
    }

    pub fn select_on_save(&self, path: &str) {
        self.save_responses
            .lock()
            .unwrap()
            .push_back(Ok(DialogOutcome::Selected(PathBuf::from(path))));
    }

    pub fn fail_on_save(&self) {
        self.save_responses
            .lock()
            .unwrap()
            .push_back(Err(DialogError::Closed));
    }

    /// Keep dialogs open until `release` is notified
    pub fn hold_until_released(&self) {
        self.hold.store(true, Ordering::SeqCst);
    }

    /// Let a held dialog answer and stop holding new ones
    pub fn release(&self) {
        self.hold.store(false, Ordering::SeqCst);
        self.release.notify_one();
    }

    pub fn open_count(&self) -> usize {
        self.open_calls.lock().unwrap().len()
    }

    pub fn save_count(&self) -> usize {
        self.save_calls.lock().unwrap().len()
    }

    async fn wait(&self) {
        self.entered.notify_one();
        if self.hold.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
    }
}

impl FileDialog for ScriptedDialog {
    async fn show_open(&self, options: OpenDialogOptions) -> Result<DialogOutcome, DialogError> {
        self.open_calls.lock().unwrap().push(options);
        self.wait().await;
        let response = self.open_responses.lock().unwrap().pop_front();
        response.unwrap_or(Ok(DialogOutcome::Cancelled))
    }

    async fn show_save(&self, options: SaveDialogOptions) -> Result<DialogOutcome, DialogError> {
        self.save_calls.lock().unwrap().push(options);
        self.wait().await;
        let response = self.save_responses.lock().unwrap().pop_front();
        response.unwrap_or(Ok(DialogOutcome::Cancelled))
    }
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    pub writes: Arc<Mutex<Vec<(PathBuf, String)>>>,
    fail_writes: Arc<AtomicBool>,
    hold_reads: Arc<AtomicBool>,
    pub read_entered: Arc<Notify>,
    read_release: Arc<Notify>,
}

impl MemoryStorage {
    pub fn insert(&self, path: &str, contents: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), contents.as_bytes().to_vec());
    }

    pub fn insert_bytes(&self, path: &str, contents: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), contents.to_vec());
    }

    /// Keep reads pending until `release_reads` is called
    pub fn hold_reads(&self) {
        self.hold_reads.store(true, Ordering::SeqCst);
    }

    pub fn release_reads(&self) {
        self.hold_reads.store(false, Ordering::SeqCst);
        self.read_release.notify_one();
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }

    pub fn last_write(&self) -> Option<(PathBuf, String)> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl ModelStorage for MemoryStorage {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.read_entered.notify_one();
        if self.hold_reads.load(Ordering::SeqCst) {
            self.read_release.notified().await;
        }
        let files = self.files.lock().unwrap();
        files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    async fn write(&self, path: &Path, contents: String) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.writes
            .lock()
            .unwrap()
            .push((path.to_path_buf(), contents.clone()));
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.into_bytes());
        Ok(())
    }
}

// ============================================================================
// Renderer and links
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererEvent {
    Close(String),
    Open { file_name: String, contents: String },
    SaveRequested,
}

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub events: Arc<Mutex<Vec<RendererEvent>>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<RendererEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn close_model(&self, file_path: &str) {
        self.events
            .lock()
            .unwrap()
            .push(RendererEvent::Close(file_path.to_string()));
    }

    fn open_model(&self, file_name: &str, contents: &str) {
        self.events.lock().unwrap().push(RendererEvent::Open {
            file_name: file_name.to_string(),
            contents: contents.to_string(),
        });
    }

    fn request_save(&self) {
        self.events.lock().unwrap().push(RendererEvent::SaveRequested);
    }
}

#[derive(Clone, Default)]
pub struct RecordingLinks {
    pub opened: Arc<Mutex<Vec<String>>>,
    pub fail: Arc<AtomicBool>,
}

impl ExternalLinks for RecordingLinks {
    fn open_url(&self, url: &str) -> Result<(), String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("no browser".to_string());
        }
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

// ============================================================================
// Harness
// ============================================================================

pub type TestLifecycle =
    ModelLifecycle<ScriptedDialog, MemoryStorage, RecentStore, RecordingRenderer>;

pub struct TestHarness {
    pub dialog: ScriptedDialog,
    pub storage: MemoryStorage,
    pub renderer: RecordingRenderer,
    pub links: RecordingLinks,
    pub lifecycle: TestLifecycle,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_locale(Locale::En)
    }

    pub fn with_locale(locale: Locale) -> Self {
        let dialog = ScriptedDialog::default();
        let storage = MemoryStorage::default();
        let renderer = RecordingRenderer::default();
        let lifecycle = ModelLifecycle::new(
            dialog.clone(),
            storage.clone(),
            RecentStore::load(None, 10),
            renderer.clone(),
            locale,
            LifecycleSettings::default(),
        );
        Self {
            dialog,
            storage,
            renderer,
            links: RecordingLinks::default(),
            lifecycle,
        }
    }

    /// Harness with `path` opened through the open dialog
    pub async fn with_open_model(path: &str, contents: &str) -> Self {
        let harness = Self::new();
        harness.storage.insert(path, contents);
        harness.dialog.select_on_open(path);
        let _ = harness.lifecycle.open().await;
        harness
    }

    pub fn recent(&self) -> Vec<PathBuf> {
        use threat_dragon_lib::RecentDocuments;
        self.lifecycle.recent_documents().recent()
    }
}
