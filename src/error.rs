use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dialog::DialogError;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("dialog failed: {0}")]
    Dialog(#[from] DialogError),
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize model: {0}")]
    Serialize(#[from] serde_json::Error),
}
