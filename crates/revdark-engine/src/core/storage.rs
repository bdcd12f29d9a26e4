/// Persistent player progress. Hosts back this with whatever storage they
/// have (browser local storage, a file); tests use [`MemoryStore`].
pub trait ProgressStore {
    fn tutorial_seen(&self) -> bool;
    fn set_tutorial_seen(&mut self, seen: bool);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryStore {
    tutorial_seen: bool,
}

impl MemoryStore {
    pub fn new(tutorial_seen: bool) -> Self {
        Self { tutorial_seen }
    }
}

impl ProgressStore for MemoryStore {
    fn tutorial_seen(&self) -> bool {
        self.tutorial_seen
    }

    fn set_tutorial_seen(&mut self, seen: bool) {
        self.tutorial_seen = seen;
    }
}
