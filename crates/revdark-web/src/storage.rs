use revdark_engine::ProgressStore;
use web_sys::Storage;

/// Local-storage key marking the tutorial as seen.
pub const TUTORIAL_KEY: &str = "tut_revdark";

/// Tutorial progress kept in the browser's local storage.
///
/// Without local storage (private windows, sandboxed frames) the flag lives
/// only for the page's lifetime.
pub struct LocalStore {
    storage: Option<Storage>,
    fallback: bool,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("local storage unavailable; tutorial progress will not persist");
        }
        Self {
            storage,
            fallback: false,
        }
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressStore for LocalStore {
    fn tutorial_seen(&self) -> bool {
        match &self.storage {
            Some(storage) => matches!(storage.get_item(TUTORIAL_KEY), Ok(Some(v)) if !v.is_empty()),
            None => self.fallback,
        }
    }

    fn set_tutorial_seen(&mut self, seen: bool) {
        self.fallback = seen;
        let Some(storage) = &self.storage else {
            return;
        };
        let result = if seen {
            storage.set_item(TUTORIAL_KEY, "true")
        } else {
            storage.remove_item(TUTORIAL_KEY)
        };
        if let Err(e) = result {
            log::error!("could not store tutorial flag: {:?}", e);
        }
    }
}
