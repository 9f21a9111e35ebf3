use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::orchestration::messages::{ApplicationMessage, ManagerNotification};
use crate::orchestration::runtime::{RuntimeCommand, ServiceRuntime, StartMode, StatusIndicators};

/// Service runtime that records every request instead of acting on it.
///
/// Clones share the same log, so a test can keep one clone while the manager
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingRuntime {
    log: Arc<Mutex<Vec<RuntimeCommand>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    kept_alive: Arc<Mutex<HashSet<String>>>,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_application` fail for `name`.
    pub fn fail_creation_of(&self, name: &str) {
        self.failing.lock().insert(name.to_string());
    }

    /// Make `destroy_application` report `name` as still running.
    pub fn keep_alive_on_destroy(&self, name: &str) {
        self.kept_alive.lock().insert(name.to_string());
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }

    pub fn log(&self) -> Vec<RuntimeCommand> {
        self.log.lock().clone()
    }

    pub fn created(&self) -> Vec<String> {
        self.collect(|command| match command {
            RuntimeCommand::CreateApplication { name, .. } => Some(name.clone()),
            _ => None,
        })
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.collect(|command| match command {
            RuntimeCommand::DestroyApplication { name } => Some(name.clone()),
            _ => None,
        })
    }

    pub fn suspended(&self) -> Vec<String> {
        self.collect(|command| match command {
            RuntimeCommand::SuspendService { name } => Some(name.clone()),
            _ => None,
        })
    }

    pub fn resumed(&self) -> Vec<String> {
        self.collect(|command| match command {
            RuntimeCommand::ResumeService { name } => Some(name.clone()),
            _ => None,
        })
    }

    /// Messages delivered to `target`, oldest first.
    pub fn sent_to(&self, target: &str) -> Vec<ApplicationMessage> {
        self.collect(|command| match command {
            RuntimeCommand::Send {
                target: to,
                message,
            } if to == target => Some(message.clone()),
            _ => None,
        })
    }

    pub fn published(&self) -> Vec<ManagerNotification> {
        self.collect(|command| match command {
            RuntimeCommand::Publish { notification } => Some(notification.clone()),
            _ => None,
        })
    }

    fn collect<T>(&self, select: impl Fn(&RuntimeCommand) -> Option<T>) -> Vec<T> {
        self.log.lock().iter().filter_map(select).collect()
    }

    fn record(&self, command: RuntimeCommand) {
        self.log.lock().push(command);
    }
}

impl ServiceRuntime for RecordingRuntime {
    fn create_application(
        &mut self,
        name: &str,
        mode: StartMode,
        indicators: &StatusIndicators,
    ) -> bool {
        self.record(RuntimeCommand::CreateApplication {
            name: name.to_string(),
            mode,
            indicators: *indicators,
        });
        !self.failing.lock().contains(name)
    }

    fn destroy_application(&mut self, name: &str) -> bool {
        self.record(RuntimeCommand::DestroyApplication {
            name: name.to_string(),
        });
        !self.kept_alive.lock().contains(name)
    }

    fn suspend_service(&mut self, name: &str) -> bool {
        self.record(RuntimeCommand::SuspendService {
            name: name.to_string(),
        });
        true
    }

    fn resume_service(&mut self, name: &str) -> bool {
        self.record(RuntimeCommand::ResumeService {
            name: name.to_string(),
        });
        true
    }

    fn send(&mut self, target: &str, message: ApplicationMessage) {
        self.record(RuntimeCommand::Send {
            target: target.to_string(),
            message,
        });
    }

    fn publish(&mut self, notification: ManagerNotification) {
        self.record(RuntimeCommand::Publish { notification });
    }
}
