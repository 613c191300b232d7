use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::Context;

/// Recently used model paths
pub trait RecentDocuments: Send + Sync {
    fn add_recent(&self, path: &Path);

    fn clear_recent(&self);

    /// Most recent first
    fn recent(&self) -> Vec<PathBuf>;
}

// ============================================================================
// Bounded list
// ============================================================================

/// Bounded list of paths, newest at the front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentList {
    capacity: usize,
    entries: VecDeque<PathBuf>,
}

impl RecentList {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn with_entries(capacity: usize, entries: Vec<PathBuf>) -> Self {
        let mut list = Self::new(capacity);
        list.entries = entries.into_iter().take(list.capacity).collect();
        list
    }

    /// Insert a path, or promote it if it is already listed
    pub fn add(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.entries.retain(|existing| existing != &path);
        self.entries.push_front(path);
        self.entries.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.iter()
    }
}

// ============================================================================
// Persisted store
// ============================================================================

/// Recent list kept in `recent.json` under the config directory.
///
/// The list lock is only held to update memory. Snapshots are written after
/// it is released, and a snapshot older than the last one written is dropped.
pub struct RecentStore {
    list: Mutex<RecentList>,
    file: Option<PathBuf>,
    revision: AtomicU64,
    written: Mutex<u64>,
}

impl RecentStore {
    /// Load the list from `file`, starting empty if it is missing or unreadable
    pub fn load(file: Option<PathBuf>, capacity: usize) -> Self {
        let entries = match file.as_deref() {
            Some(path) if path.exists() => match read_entries(path) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Discarding recent documents list: {:#}", e);
                    Vec::new()
                }
            },
            _ => Vec::new(),
        };
        Self {
            list: Mutex::new(RecentList::with_entries(capacity, entries)),
            file,
            revision: AtomicU64::new(0),
            written: Mutex::new(0),
        }
    }

    fn update(&self, f: impl FnOnce(&mut RecentList)) {
        let (snapshot, revision) = {
            let mut list = self.list.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut list);
            let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
            (list.iter().cloned().collect::<Vec<_>>(), revision)
        };
        self.persist(&snapshot, revision);
    }

    fn persist(&self, entries: &[PathBuf], revision: u64) {
        let Some(path) = self.file.as_deref() else {
            return;
        };
        let mut written = self.written.lock().unwrap_or_else(|e| e.into_inner());
        if *written > revision {
            return;
        }
        match write_entries(path, entries) {
            Ok(()) => *written = revision,
            Err(e) => log::warn!("Failed to persist recent documents: {:#}", e),
        }
    }
}

fn read_entries(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_entries(path: &Path, entries: &[PathBuf]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

impl RecentDocuments for RecentStore {
    fn add_recent(&self, path: &Path) {
        self.update(|list| list.add(path));
    }

    fn clear_recent(&self) {
        self.update(RecentList::clear);
    }

    fn recent(&self) -> Vec<PathBuf> {
        let list = self.list.lock().unwrap_or_else(|e| e.into_inner());
        list.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &RecentList) -> Vec<&str> {
        list.iter().map(|p| p.to_str().unwrap()).collect()
    }

    #[test]
    fn add_promotes_and_limits_capacity() {
        let mut recent = RecentList::new(3);
        recent.add("a.json");
        recent.add("b.json");
        recent.add("c.json");
        recent.add("b.json");
        assert_eq!(names(&recent), vec!["b.json", "c.json", "a.json"]);

        recent.add("d.json");
        assert_eq!(names(&recent), vec!["d.json", "b.json", "c.json"]);
    }

    #[test]
    fn zero_capacity_still_keeps_one() {
        let mut recent = RecentList::new(0);
        recent.add("a.json");
        recent.add("b.json");
        assert_eq!(names(&recent), vec!["b.json"]);
    }

    #[test]
    fn store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nested").join("recent.json");

        let store = RecentStore::load(Some(file.clone()), 5);
        store.add_recent(Path::new("/models/one.json"));
        store.add_recent(Path::new("/models/two.json"));

        let reloaded = RecentStore::load(Some(file), 5);
        assert_eq!(
            reloaded.recent(),
            vec![
                PathBuf::from("/models/two.json"),
                PathBuf::from("/models/one.json")
            ]
        );
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("recent.json");
        fs::write(&file, "not json").unwrap();

        let store = RecentStore::load(Some(file), 5);
        assert!(store.recent().is_empty());
    }

    #[test]
    fn concurrent_updates_persist_the_final_list() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("recent.json");
        let store = RecentStore::load(Some(file.clone()), 50);

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let store = &store;
                scope.spawn(move || {
                    for n in 0..10 {
                        store.add_recent(Path::new(&format!("/models/{worker}-{n}.json")));
                    }
                });
            }
        });

        assert_eq!(store.recent().len(), 40);
        assert_eq!(RecentStore::load(Some(file), 50).recent(), store.recent());
    }

    #[test]
    fn list_is_readable_while_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("recent.json");
        let store = RecentStore::load(Some(file), 5);
        store.add_recent(Path::new("/models/one.json"));

        let _writing = store.written.lock().unwrap();
        assert_eq!(store.recent(), vec![PathBuf::from("/models/one.json")]);
    }

    #[test]
    fn clear_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("recent.json");

        let store = RecentStore::load(Some(file.clone()), 5);
        store.add_recent(Path::new("/models/one.json"));
        store.clear_recent();

        assert!(RecentStore::load(Some(file), 5).recent().is_empty());
    }
}
