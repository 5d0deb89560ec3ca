//! Registry of admitted indicators.
//!
//! Append-only and ordered by admission. Names are case-sensitive and unique;
//! only the admission pipeline adds entries.

use crate::domain::indicator::Indicator;

#[derive(Default)]
pub struct PluginRegistry {
    entries: Vec<Box<dyn Indicator>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, indicator: Box<dyn Indicator>) {
        self.entries.push(indicator);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Indicator> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .map(|entry| entry.as_ref())
    }

    /// Admitted indicators in admission order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Indicator> {
        self.entries.iter().map(|entry| entry.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|entry| entry.name()).collect()
    }
}
