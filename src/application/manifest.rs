use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::actions::ActionId;

/// Per-action delivery flag declared in a manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFlag {
    /// Delivered once the application holds focus.
    Enabled,
    /// Delivered even while the application stays in the background.
    AcceptWhenInBackground,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AutoLockPolicy {
    /// The application reports whether its current window blocks locking.
    #[default]
    DetermineByWindow,
    PreventPermanently,
}

/// Static declaration of what an application can handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationManifest {
    actions: HashMap<ActionId, ActionFlag>,
    auto_lock_policy: AutoLockPolicy,
}

impl ApplicationManifest {
    pub fn new(actions: impl IntoIterator<Item = ActionId>) -> Self {
        Self {
            actions: actions
                .into_iter()
                .map(|action| (action, ActionFlag::Enabled))
                .collect(),
            auto_lock_policy: AutoLockPolicy::default(),
        }
    }

    pub fn with_action(mut self, action: ActionId, flag: ActionFlag) -> Self {
        self.actions.insert(action, flag);
        self
    }

    pub fn with_auto_lock_policy(mut self, policy: AutoLockPolicy) -> Self {
        self.auto_lock_policy = policy;
        self
    }

    pub fn contains(&self, action: &ActionId) -> bool {
        self.actions.contains_key(action)
    }

    pub fn action_flag(&self, action: &ActionId) -> Option<ActionFlag> {
        self.actions.get(action).copied()
    }

    pub fn auto_lock_policy(&self) -> AutoLockPolicy {
        self.auto_lock_policy
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionId> {
        self.actions.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_lookup() {
        let manifest = ApplicationManifest::new([ActionId::Launch])
            .with_action(ActionId::custom("call"), ActionFlag::AcceptWhenInBackground)
            .with_auto_lock_policy(AutoLockPolicy::PreventPermanently);

        assert!(manifest.contains(&ActionId::Launch));
        assert!(!manifest.contains(&ActionId::Home));
        assert_eq!(
            manifest.action_flag(&ActionId::custom("call")),
            Some(ActionFlag::AcceptWhenInBackground)
        );
        assert_eq!(manifest.action_flag(&ActionId::Launch), Some(ActionFlag::Enabled));
        assert_eq!(manifest.auto_lock_policy(), AutoLockPolicy::PreventPermanently);
        assert_eq!(manifest.actions().count(), 2);
    }
}
