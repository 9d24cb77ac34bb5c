use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use tokio::fs;

/// Low-level whole-file operations the durable store depends on.
///
/// `write` replaces the full content. The only guarantee callers rely on is
/// that a `read` after a successful `write` returns exactly what was written.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;
    async fn read(&self, path: &Path) -> io::Result<String>;
    async fn write(&self, path: &Path, content: &str) -> io::Result<()>;
}

/// Filesystem-backed storage.
#[derive(Clone, Debug, Default)]
pub struct FsStorage;

#[async_trait]
impl FileStorage for FsStorage {
    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.map(|m| m.is_file()).unwrap_or(false)
    }

    async fn read(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path).await
    }

    /// Plain overwrite: no temp file and no rename, so a crash mid-write can
    /// leave a truncated document behind.
    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(path, content).await
    }
}

/// In-process storage for tests and for substituting the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<HashMap<PathBuf, String>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, e.g. with corrupt content.
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.insert(path.into(), content.into());
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.get(path).cloned()
    }

    /// Make every subsequent `write` fail until switched off again.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Same for `read`; `exists` keeps answering truthfully.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn exists(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.contains_key(path)
    }

    async fn read(&self, path: &Path) -> io::Result<String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "simulated read failure"));
        }
        self.contents(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display())))
    }

    async fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write failure"));
        }
        self.insert(path.to_path_buf(), content);
        Ok(())
    }
}
