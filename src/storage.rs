use std::future::Future;
use std::io;
use std::path::Path;

/// Reads and writes the model document
pub trait ModelStorage: Send + Sync {
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<Vec<u8>>> + Send;

    fn write(&self, path: &Path, contents: String) -> impl Future<Output = io::Result<()>> + Send;
}

/// Model documents on the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsModelStorage;

impl ModelStorage for FsModelStorage {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write(&self, path: &Path, contents: String) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }
}
