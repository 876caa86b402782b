//! Tab selection
//!
//! A view with several mutually exclusive datasets keeps the selected one in a
//! `TabSelector`. Selection is a direct assignment with no guards; the selected
//! tab doubles as the dependency key of the view's `ResourceView`.

use crate::state::resource::ResourceSpec;

/// A fixed set of sub-views
pub trait Tab: Copy + Eq + Default + std::fmt::Debug + Send + Sync + 'static {
    /// Every tab, in display order
    fn all() -> &'static [Self];

    /// Stable key, used as the fetch dependency key
    fn key(&self) -> &'static str;

    /// Resources this tab fetches when selected
    fn resources(&self) -> Vec<ResourceSpec>;

    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|tab| tab.key() == key)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabSelector<T: Tab> {
    current: T,
}

impl<T: Tab> TabSelector<T> {
    pub fn new() -> Self {
        Self { current: T::default() }
    }

    pub fn current(&self) -> T {
        self.current
    }

    /// Select `tab`, returning whether the selection changed
    pub fn select(&mut self, tab: T) -> bool {
        if self.current == tab {
            return false;
        }
        self.current = tab;
        true
    }

    pub fn is_selected(&self, tab: T) -> bool {
        self.current == tab
    }
}
