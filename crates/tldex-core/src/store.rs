//! The process-wide rule store.
//!
//! A `RuleStore` owns the only mutable shared state in the crate: the active
//! rule trie. Loads build a brand-new trie and swap it in wholesale under a
//! brief write lock, so concurrent readers always observe either the old or
//! the new trie, never a partial one. A separate mutex serializes the
//! build-then-swap sequence itself.
//!
//! Callers who want a shared default wire one up at process start and pass
//! it (or inject it) into the parsers; there is no hidden global.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::rules::RuleTrie;

/// Where the active rule set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    Path(PathBuf),
    Inline,
    Remote(String),
}

/// Metadata describing the active rule set.
#[derive(Debug, Clone, Default)]
pub struct StoreMeta {
    pub source: Option<RuleSource>,
    pub loaded_at: Option<SystemTime>,
    pub rule_count: usize,
}

struct State {
    trie: Arc<RuleTrie>,
    meta: StoreMeta,
}

/// Holds the active rule trie and its load lifecycle.
pub struct RuleStore {
    state: RwLock<State>,
    load_guard: Mutex<()>,
    remote_url: String,
    degraded_warned: AtomicBool,
}

impl RuleStore {
    /// Default remote location of the rule list.
    pub const DEFAULT_REMOTE_URL: &'static str =
        "https://publicsuffix.org/list/public_suffix_list.dat";

    /// Create an empty, unloaded store. Every parse against it falls back
    /// to the implicit single-label suffix rule until a load succeeds.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                trie: Arc::new(RuleTrie::empty()),
                meta: StoreMeta::default(),
            }),
            load_guard: Mutex::new(()),
            remote_url: Self::DEFAULT_REMOTE_URL.to_string(),
            degraded_warned: AtomicBool::new(false),
        }
    }

    /// Override the remote list URL handed to `update`'s fetch collaborator.
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into();
        self
    }

    /// The URL handed to the fetch collaborator by [`RuleStore::update`].
    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    /// True iff at least one load has completed successfully.
    pub fn is_loaded(&self) -> bool {
        self.state.read().unwrap().meta.loaded_at.is_some()
    }

    /// Metadata for the active rule set.
    pub fn meta(&self) -> StoreMeta {
        self.state.read().unwrap().meta.clone()
    }

    /// Snapshot of the active trie for lock-free reading.
    pub fn snapshot(&self) -> Arc<RuleTrie> {
        Arc::clone(&self.state.read().unwrap().trie)
    }

    /// Snapshot for a parse operation. Warns once per store when serving
    /// lookups without a loaded list, so callers can surface it while
    /// results stay usable.
    pub(crate) fn lookup_snapshot(&self) -> Arc<RuleTrie> {
        let state = self.state.read().unwrap();
        if state.meta.loaded_at.is_none() && !self.degraded_warned.swap(true, Ordering::Relaxed) {
            log::warn!(
                "public suffix list not loaded; falling back to single-label suffixes"
            );
        }
        Arc::clone(&state.trie)
    }

    /// Parse rule-list text and atomically replace the active trie.
    ///
    /// Fails with [`Error::Format`] when the text contains no parsable rule;
    /// the previous trie stays active in that case.
    pub fn load_from_string(&self, text: &str) -> Result<()> {
        self.install(text, RuleSource::Inline)
    }

    /// Read rule-list text from a file and load it.
    ///
    /// Fails with [`Error::Io`] when the path is unreadable; callers may
    /// treat that as recoverable and continue in degraded mode.
    pub fn load_from_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        self.install(&text, RuleSource::Path(path.to_path_buf()))
    }

    /// Fetch fresh list text via the injected collaborator and load it.
    ///
    /// The collaborator receives the configured remote URL. Its failure is
    /// propagated unchanged (wrapped only in the transparent
    /// [`Error::Fetch`]) so callers can distinguish a fetch failure from a
    /// malformed list.
    pub fn update<F, E>(&self, fetch: F) -> Result<()>
    where
        F: FnOnce(&str) -> std::result::Result<String, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let text = fetch(&self.remote_url).map_err(|e| Error::Fetch(e.into()))?;
        self.install(&text, RuleSource::Remote(self.remote_url.clone()))
    }

    fn install(&self, text: &str, source: RuleSource) -> Result<()> {
        // Serialize build-then-swap; readers keep the old trie meanwhile.
        let _guard = self.load_guard.lock().unwrap();
        let trie = RuleTrie::parse(text)?;
        let rule_count = trie.rule_count();
        log::debug!("loaded {rule_count} rules from {source:?}");

        let mut state = self.state.write().unwrap();
        state.trie = Arc::new(trie);
        state.meta = StoreMeta {
            source: Some(source),
            loaded_at: Some(SystemTime::now()),
            rule_count,
        };
        Ok(())
    }
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_starts_unloaded() {
        let store = RuleStore::new();
        assert!(!store.is_loaded());
        assert_eq!(store.meta().rule_count, 0);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_load_from_string() {
        let store = RuleStore::new();
        store.load_from_string("com\nco.uk\n").unwrap();
        assert!(store.is_loaded());
        let meta = store.meta();
        assert_eq!(meta.rule_count, 2);
        assert_eq!(meta.source, Some(RuleSource::Inline));
        assert!(meta.loaded_at.is_some());
    }

    #[test]
    fn test_load_replaces_not_merges() {
        use crate::matcher::{match_suffix, MatchKind};

        let store = RuleStore::new();
        store.load_from_string("uk\nco.uk\n").unwrap();
        let labels = ["example", "co", "uk"];
        assert_eq!(match_suffix(&store.snapshot(), &labels).len, 2);

        store.load_from_string("com\n").unwrap();
        assert_eq!(store.meta().rule_count, 1);
        // No residual co.uk rule: back to the implicit single-label fallback.
        let m = match_suffix(&store.snapshot(), &labels);
        assert_eq!(m.len, 1);
        assert_eq!(m.kind, MatchKind::Default);
    }

    #[test]
    fn test_failed_load_keeps_previous_trie() {
        let store = RuleStore::new();
        store.load_from_string("com\n").unwrap();
        assert!(matches!(
            store.load_from_string("// nothing\n"),
            Err(Error::Format)
        ));
        assert!(store.is_loaded());
        assert_eq!(store.meta().rule_count, 1);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "com\nco.uk").unwrap();
        let store = RuleStore::new();
        store.load_from_path(file.path()).unwrap();
        assert_eq!(store.meta().rule_count, 2);
        assert!(matches!(store.meta().source, Some(RuleSource::Path(_))));
    }

    #[test]
    fn test_load_from_missing_path_is_io_error() {
        let store = RuleStore::new();
        let err = store
            .load_from_path("/nonexistent/public_suffix_list.dat")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_update_loads_fetched_text() {
        let store = RuleStore::new().with_remote_url("https://lists.example/psl.dat");
        store
            .update(|url| {
                assert_eq!(url, "https://lists.example/psl.dat");
                Ok::<_, std::io::Error>("com\n".to_string())
            })
            .unwrap();
        assert!(store.is_loaded());
        assert_eq!(
            store.meta().source,
            Some(RuleSource::Remote("https://lists.example/psl.dat".into()))
        );
    }

    #[test]
    fn test_update_propagates_fetch_failure() {
        let store = RuleStore::new();
        let err = store
            .update(|_| {
                Err::<String, _>(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))
            })
            .unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
        assert_eq!(err.to_string(), "connection refused");
        assert!(!store.is_loaded());
    }

    #[test]
    fn test_concurrent_readers_during_reload() {
        let store = Arc::new(RuleStore::new());
        store.load_from_string("com\n").unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let trie = store.snapshot();
                        // Never a half-built trie: count is 1 or 2.
                        let n = trie.rule_count();
                        assert!(n == 1 || n == 2, "unexpected rule count {n}");
                    }
                })
            })
            .collect();

        for _ in 0..50 {
            store.load_from_string("com\nnet\n").unwrap();
            store.load_from_string("org\n").unwrap();
        }
        // Leave a two-rule set active; readers may still be mid-loop.
        store.load_from_string("com\nnet\n").unwrap();

        for handle in readers {
            handle.join().unwrap();
        }
    }
}
