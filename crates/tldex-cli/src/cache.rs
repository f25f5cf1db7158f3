//! Shared on-disk rule-list cache with cross-process advisory locking.
//!
//! Two processes refreshing the same cache path must not interleave their
//! writes, so a sidecar `.lock` file carries an exclusive advisory lock.
//! This is best-effort coordination between cooperating processes; in-memory
//! correctness never depends on it.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tldex_core::RuleStore;

fn lock_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".lock");
    PathBuf::from(os)
}

fn acquire(path: &Path) -> io::Result<File> {
    let lock = OpenOptions::new()
        .create(true)
        .write(true)
        .open(lock_path(path))?;
    lock.lock_exclusive()?;
    Ok(lock)
}

/// Load rules into the store from a shared cache file under the lock.
pub fn load_locked(store: &RuleStore, path: &Path) -> Result<(), tldex_core::Error> {
    let lock = acquire(path).map_err(tldex_core::Error::Io)?;
    let result = store.load_from_path(path);
    let _ = lock.unlock();
    result
}

/// Write fresh list text to the shared cache file under the lock.
pub fn store_locked(path: &Path, text: &str) -> io::Result<()> {
    let lock = acquire(path)?;
    let result = fs::write(path, text);
    let _ = lock.unlock();
    result
}
