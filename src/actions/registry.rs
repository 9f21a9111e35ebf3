//! # Actions Registry
//!
//! FIFO queue of pending action requests with at most one entry in flight.
//! Entries are classified by an [`ActionHandler`] when the queue is scanned;
//! stale entries are purged lazily during scans, never by a timer.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{ActionEntry, ActionProcessStatus};
use crate::logging::log_action_operation;

/// Classifies queued actions on behalf of the registry.
pub trait ActionHandler {
    fn handle_action(&mut self, entry: &mut ActionEntry) -> ActionProcessStatus;
}

#[derive(Debug)]
pub struct ActionsRegistry {
    queue: VecDeque<ActionEntry>,
    in_flight: Option<Uuid>,
    ttl: Duration,
}

impl ActionsRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            in_flight: None,
            ttl,
        }
    }

    /// Append an entry and, when idle, try to dispatch immediately.
    pub fn enqueue(&mut self, entry: ActionEntry, handler: &mut dyn ActionHandler) {
        log_action_operation(
            "enqueue",
            &entry.action.to_string(),
            entry.target.as_deref(),
            "queued",
            None,
        );
        self.queue.push_back(entry);
        if self.in_flight.is_none() {
            self.advance(handler);
        }
    }

    /// The in-flight entry has been handled by its target.
    ///
    /// Calling this with nothing in flight is a contract violation: it panics
    /// in debug builds and is logged and ignored otherwise.
    pub fn finished(&mut self, handler: &mut dyn ActionHandler) {
        debug_assert!(
            self.in_flight.is_some(),
            "finished() called with no action in flight"
        );
        let Some(id) = self.in_flight.take() else {
            error!("Action finished while no action is in flight");
            return;
        };

        if let Some(position) = self.queue.iter().position(|entry| entry.id == id) {
            if let Some(entry) = self.queue.remove(position) {
                log_action_operation(
                    "finished",
                    &entry.action.to_string(),
                    entry.target.as_deref(),
                    "finished",
                    None,
                );
            }
        }

        self.purge_expired(Instant::now());
        self.advance(handler);
    }

    /// Re-scan the queue if nothing is in flight.
    pub fn resume(&mut self, handler: &mut dyn ActionHandler) {
        if self.in_flight.is_none() && !self.queue.is_empty() {
            self.advance(handler);
        }
    }

    pub fn has_pending_action(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending_action(&self) -> Option<&ActionEntry> {
        let id = self.in_flight?;
        self.queue.iter().find(|entry| entry.id == id)
    }

    pub fn pending_action_mut(&mut self) -> Option<&mut ActionEntry> {
        let id = self.in_flight?;
        self.queue.iter_mut().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionEntry> {
        self.queue.iter()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        let before = self.queue.len();
        self.queue.retain(|entry| !entry.is_expired(now, ttl));
        let purged = before - self.queue.len();
        if purged > 0 {
            debug!(purged = purged, "Purged expired actions");
        }
    }

    fn advance(&mut self, handler: &mut dyn ActionHandler) {
        let now = Instant::now();
        let mut index = 0;

        while index < self.queue.len() {
            if self.queue[index].is_expired(now, self.ttl) {
                if let Some(entry) = self.queue.remove(index) {
                    info!(action = %entry.action, "Discarding expired action");
                }
                continue;
            }

            let status = handler.handle_action(&mut self.queue[index]);
            let entry = &self.queue[index];
            log_action_operation(
                "classify",
                &entry.action.to_string(),
                entry.target.as_deref(),
                &status.to_string(),
                None,
            );

            match status {
                ActionProcessStatus::Accepted => {
                    self.in_flight = Some(entry.id);
                    return;
                }
                ActionProcessStatus::Dropped => {
                    self.queue.remove(index);
                }
                ActionProcessStatus::Skipped => {
                    index += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::ActionId;

    /// Replays scripted statuses and remembers what it was asked about.
    struct ScriptedHandler {
        script: Vec<ActionProcessStatus>,
        seen: Vec<ActionId>,
    }

    impl ScriptedHandler {
        fn new(script: Vec<ActionProcessStatus>) -> Self {
            Self {
                script,
                seen: Vec::new(),
            }
        }
    }

    impl ActionHandler for ScriptedHandler {
        fn handle_action(&mut self, entry: &mut ActionEntry) -> ActionProcessStatus {
            self.seen.push(entry.action.clone());
            if self.script.is_empty() {
                ActionProcessStatus::Skipped
            } else {
                self.script.remove(0)
            }
        }
    }

    fn entry(name: &str) -> ActionEntry {
        ActionEntry::new(ActionId::custom(name), None)
    }

    #[test]
    fn test_accepted_entry_stays_queued_and_in_flight() {
        let mut registry = ActionsRegistry::new(Duration::from_secs(30));
        let mut handler = ScriptedHandler::new(vec![ActionProcessStatus::Accepted]);

        registry.enqueue(entry("a"), &mut handler);

        assert!(registry.has_pending_action());
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.pending_action().map(|e| e.action.clone()),
            Some(ActionId::custom("a"))
        );
    }

    #[test]
    fn test_enqueue_while_in_flight_does_not_dispatch() {
        let mut registry = ActionsRegistry::new(Duration::from_secs(30));
        let mut handler = ScriptedHandler::new(vec![ActionProcessStatus::Accepted]);

        registry.enqueue(entry("a"), &mut handler);
        registry.enqueue(entry("b"), &mut handler);

        assert_eq!(handler.seen, vec![ActionId::custom("a")]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_dropped_and_skipped_entries() {
        let mut registry = ActionsRegistry::new(Duration::from_secs(30));
        let mut handler = ScriptedHandler::new(vec![ActionProcessStatus::Skipped]);
        registry.enqueue(entry("skip"), &mut handler);
        assert_eq!(registry.len(), 1);
        assert!(!registry.has_pending_action());

        // Rescan: first entry skipped again, new one dropped.
        let mut handler = ScriptedHandler::new(vec![
            ActionProcessStatus::Skipped,
            ActionProcessStatus::Dropped,
        ]);
        registry.enqueue(entry("drop"), &mut handler);
        assert_eq!(
            handler.seen,
            vec![ActionId::custom("skip"), ActionId::custom("drop")]
        );
        assert_eq!(registry.len(), 1);
        assert!(!registry.has_pending_action());
    }

    #[test]
    fn test_finished_removes_entry_and_advances() {
        let mut registry = ActionsRegistry::new(Duration::from_secs(30));
        let mut handler = ScriptedHandler::new(vec![
            ActionProcessStatus::Accepted,
            ActionProcessStatus::Accepted,
        ]);

        registry.enqueue(entry("a"), &mut handler);
        registry.enqueue(entry("b"), &mut handler);
        registry.finished(&mut handler);

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.pending_action().map(|e| e.action.clone()),
            Some(ActionId::custom("b"))
        );

        registry.finished(&mut handler);
        assert!(registry.is_empty());
        assert!(!registry.has_pending_action());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no action in flight")]
    fn test_finished_without_in_flight_panics_in_debug() {
        let mut registry = ActionsRegistry::new(Duration::from_secs(30));
        let mut handler = ScriptedHandler::new(vec![]);
        registry.finished(&mut handler);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entries_are_never_dispatched() {
        let mut registry = ActionsRegistry::new(Duration::from_secs(30));
        let mut handler = ScriptedHandler::new(vec![ActionProcessStatus::Skipped]);
        registry.enqueue(entry("stale"), &mut handler);

        tokio::time::advance(Duration::from_secs(31)).await;

        let mut handler = ScriptedHandler::new(vec![ActionProcessStatus::Accepted]);
        registry.resume(&mut handler);

        assert!(handler.seen.is_empty());
        assert!(registry.is_empty());
        assert!(!registry.has_pending_action());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_purges_expired_entries() {
        let mut registry = ActionsRegistry::new(Duration::from_secs(30));
        let mut handler = ScriptedHandler::new(vec![ActionProcessStatus::Accepted]);
        registry.enqueue(entry("a"), &mut handler);
        registry.enqueue(entry("queued"), &mut handler);

        tokio::time::advance(Duration::from_secs(45)).await;
        let mut handler = ScriptedHandler::new(vec![ActionProcessStatus::Accepted]);
        registry.finished(&mut handler);

        assert!(registry.is_empty());
        assert!(handler.seen.is_empty());
    }
}
