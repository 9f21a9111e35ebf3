//! # Applications Registry
//!
//! The fixed set of applications known to the manager, built once from the
//! launcher list. Unknown names are a normal outcome: lookups return `None`
//! and callers reject the request.

use std::collections::HashMap;

use super::{ApplicationHandle, ApplicationLauncher, ApplicationState};
use crate::actions::ActionId;
use crate::error::{AppManagerError, AppManagerResult};

#[derive(Debug, Clone, Default)]
pub struct ApplicationsRegistry {
    handles: Vec<ApplicationHandle>,
    index: HashMap<String, usize>,
}

impl ApplicationsRegistry {
    pub fn new(launchers: impl IntoIterator<Item = ApplicationLauncher>) -> AppManagerResult<Self> {
        let mut registry = Self::default();
        for launcher in launchers {
            let name = launcher.name().to_string();
            if registry.index.contains_key(&name) {
                return Err(AppManagerError::DuplicateApplication(name));
            }
            registry.index.insert(name, registry.handles.len());
            registry.handles.push(ApplicationHandle::new(launcher));
        }
        Ok(registry)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ApplicationHandle> {
        self.index.get(name).map(|&i| &self.handles[i])
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut ApplicationHandle> {
        let i = *self.index.get(name)?;
        self.handles.get_mut(i)
    }

    /// Every application whose manifest declares `action`.
    pub fn find_by_action(&self, action: &ActionId) -> Vec<&ApplicationHandle> {
        self.handles
            .iter()
            .filter(|handle| handle.handles(action))
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApplicationHandle> {
        self.handles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ApplicationHandle> {
        self.handles.iter_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.handles.iter().map(|h| h.name().to_string()).collect()
    }

    pub fn in_state(&self, state: ApplicationState) -> Vec<&ApplicationHandle> {
        self.handles.iter().filter(|h| h.state() == state).collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
