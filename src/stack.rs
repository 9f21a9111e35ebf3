//! # Application Stack
//!
//! Navigation history, most recent entry first. An application may appear
//! several times; each occurrence records whether it was closeable when it was
//! pushed.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::application::{ApplicationHandle, ApplicationName};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub app_name: ApplicationName,
    pub is_closeable: bool,
}

impl StackEntry {
    pub fn new(app_name: impl Into<ApplicationName>) -> Self {
        Self {
            app_name: app_name.into(),
            is_closeable: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationStack {
    entries: VecDeque<StackEntry>,
}

impl ApplicationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: StackEntry) {
        self.entries.push_front(entry);
    }

    /// Remove the front entry; no-op on an empty stack.
    pub fn pop(&mut self) -> Option<StackEntry> {
        self.entries.pop_front()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn front(&self) -> Option<&StackEntry> {
        self.entries.front()
    }

    pub fn front_mut(&mut self) -> Option<&mut StackEntry> {
        self.entries.front_mut()
    }

    pub fn get(&self, index: usize) -> Option<&StackEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.app_name == name)
    }

    pub fn occurrences<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a StackEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.app_name == name)
    }

    /// Remove the first (most recent) occurrence of `name`.
    pub fn erase_first_of(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|entry| entry.app_name == name) {
            Some(position) => {
                self.entries.remove(position);
                true
            }
            None => false,
        }
    }

    /// Resident application names, de-duplicated, most recent first.
    pub fn unique(&self) -> Vec<ApplicationName> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| seen.insert(entry.app_name.as_str()))
            .map(|entry| entry.app_name.clone())
            .collect()
    }

    /// Manifest closeability AND-ed with every occurrence's recorded flag.
    pub fn is_application_closeable(&self, handle: &ApplicationHandle) -> bool {
        handle.closeable() && self.occurrences(handle.name()).all(|entry| entry.is_closeable)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackEntry> {
        self.entries.iter()
    }
}
