//! Session-scoped key/value storage port.
//!
//! The intro plays once per session: a flag is written after the first
//! full run and checked on mount. The storage backend is abstracted so
//! hosts can bind their own persistence while tests use [`MemorySession`].

use rustc_hash::FxHashMap;

/// Flag written once the intro has completed a full run.
pub const PRELOADER_PLAYED_KEY: &str = "preloaderPlayed";

/// Session-scoped string storage.
///
/// Implementations may be unavailable or fail silently (a browser session
/// store in a privacy mode, for example), so `get` simply returns `None`
/// and `set` is best-effort.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySession {
    values: FxHashMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already carries the played flag, for tests that
    /// exercise the skip path.
    pub fn with_played_flag() -> Self {
        let mut store = Self::new();
        store.set(PRELOADER_PLAYED_KEY, "true");
        store
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_values() {
        let mut store = MemorySession::new();
        assert_eq!(store.get(PRELOADER_PLAYED_KEY), None);
        store.set(PRELOADER_PLAYED_KEY, "true");
        assert_eq!(store.get(PRELOADER_PLAYED_KEY).as_deref(), Some("true"));
        store.remove(PRELOADER_PLAYED_KEY);
        assert_eq!(store.get(PRELOADER_PLAYED_KEY), None);
    }

    #[test]
    fn preseeded_store_carries_flag() {
        let store = MemorySession::with_played_flag();
        assert_eq!(store.get(PRELOADER_PLAYED_KEY).as_deref(), Some("true"));
    }
}
