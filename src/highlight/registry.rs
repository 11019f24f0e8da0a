use crate::highlight::Highlighter;
use std::collections::HashMap;

/// Named highlighters owned by an editor session.
#[derive(Default)]
pub struct HighlighterRegistry {
    highlighters: HashMap<String, Box<dyn Highlighter>>,
}

impl HighlighterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `highlighter` under `name`, returning any it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        highlighter: Box<dyn Highlighter>,
    ) -> Option<Box<dyn Highlighter>> {
        self.highlighters.insert(name.into(), highlighter)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn Highlighter>> {
        self.highlighters.remove(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Highlighter + 'static)> {
        self.highlighters.get_mut(name).map(|h| &mut **h)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.highlighters.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.highlighters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for HighlighterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlighterRegistry")
            .field("names", &self.names())
            .finish()
    }
}
