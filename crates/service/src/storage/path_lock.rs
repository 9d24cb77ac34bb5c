//! Process-wide registry of per-resource locks.
//!
//! Every durable store wrapping the same file shares one lock; stores over
//! different files never contend.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, Weak},
};

use once_cell::sync::Lazy;
use tokio::sync::Mutex as AsyncMutex;

pub type ResourceLock = Arc<AsyncMutex<()>>;

static PATH_LOCKS: Lazy<Mutex<HashMap<PathBuf, Weak<AsyncMutex<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Lexically absolutize a path so `a.json` and `./a.json` map to one key.
/// Symlinks are not resolved: the file may not exist yet.
pub fn resource_key(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    absolute.components().collect()
}

/// Lock shared by everyone addressing `path`.
pub fn lock_for(path: &Path) -> ResourceLock {
    let key = resource_key(path);
    let mut locks = PATH_LOCKS.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(existing) = locks.get(&key).and_then(Weak::upgrade) {
        return existing;
    }
    locks.retain(|_, weak| weak.strong_count() > 0);
    let lock = Arc::new(AsyncMutex::new(()));
    locks.insert(key, Arc::downgrade(&lock));
    lock
}
