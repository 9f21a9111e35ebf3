use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use uuid::Uuid;

use super::ActionId;
use crate::application::{ApplicationName, Payload};

/// Result of classifying a queued action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionProcessStatus {
    /// Dispatched; the entry is now in flight until `finished()`.
    Accepted,
    /// Removed from the queue for good.
    Dropped,
    /// Left queued for a later scan.
    Skipped,
}

impl fmt::Display for ActionProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Dropped => write!(f, "dropped"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// One queued action request.
#[derive(Debug, Clone)]
pub struct ActionEntry {
    pub id: Uuid,
    pub action: ActionId,
    pub payload: Option<Payload>,
    /// Preset by the requester for launches and status broadcasts, otherwise
    /// resolved when the entry is classified.
    pub target: Option<ApplicationName>,
    /// Keep the focused application resident while the target comes up.
    pub keep_focused_in_background: bool,
    pub created_at: Instant,
}

impl ActionEntry {
    pub fn new(action: ActionId, payload: Option<Payload>) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            payload,
            target: None,
            keep_focused_in_background: false,
            created_at: Instant::now(),
        }
    }

    pub fn with_target(mut self, target: impl Into<ApplicationName>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn keeping_focused_in_background(mut self, keep: bool) -> Self {
        self.keep_focused_in_background = keep;
        self
    }

    pub fn set_target(&mut self, target: impl Into<ApplicationName>) {
        self.target = Some(target.into());
    }

    pub fn targets(&self, name: &str) -> bool {
        self.target.as_deref() == Some(name)
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expiry_is_strictly_after_ttl() {
        let ttl = Duration::from_secs(30);
        let entry = ActionEntry::new(ActionId::Home, None);

        assert!(!entry.is_expired(Instant::now(), ttl));
        tokio::time::advance(ttl).await;
        assert!(!entry.is_expired(Instant::now(), ttl));
        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(entry.is_expired(Instant::now(), ttl));
    }

    #[test]
    fn test_target_helpers() {
        let mut entry = ActionEntry::new(ActionId::Launch, None).with_target("ApplicationClock");
        assert!(entry.targets("ApplicationClock"));
        assert!(!entry.targets("ApplicationSettings"));

        entry.set_target("ApplicationSettings");
        assert!(entry.targets("ApplicationSettings"));
        assert!(!entry.keep_focused_in_background);
    }
}
