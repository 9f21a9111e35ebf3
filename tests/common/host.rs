//! Simulated applications that answer every manager request the way a
//! well-behaved application would.

use std::collections::HashSet;

use appmgr_core::orchestration::{
    ApplicationManager, ApplicationMessage, InitStatus, ManagerMessage, RuntimeCommand, StartMode,
};
use appmgr_core::test_helpers::RecordingRuntime;

/// Upper bound on replies per `settle`, so a livelock fails the test instead
/// of hanging it.
const MAX_REPLIES: usize = 500;

pub struct CooperativeHost {
    runtime: RecordingRuntime,
    cursor: usize,
    broken: HashSet<String>,
}

impl CooperativeHost {
    pub fn new(runtime: RecordingRuntime) -> Self {
        Self {
            runtime,
            cursor: 0,
            broken: HashSet::new(),
        }
    }

    /// From now on the service for `name` cannot be created.
    pub fn break_application(&mut self, name: &str) {
        self.runtime.fail_creation_of(name);
        self.broken.insert(name.to_string());
    }

    /// Answer runtime requests until the manager stops producing new ones.
    /// Returns the number of replies delivered.
    pub fn settle(&mut self, manager: &mut ApplicationManager) -> usize {
        let mut replies = 0;
        loop {
            let log = self.runtime.log();
            if self.cursor >= log.len() {
                return replies;
            }
            let command = log[self.cursor].clone();
            self.cursor += 1;

            if let Some(reply) = self.reply_to(&command) {
                manager.handle(reply);
                replies += 1;
                assert!(replies < MAX_REPLIES, "manager did not settle");
            }
        }
    }

    fn reply_to(&self, command: &RuntimeCommand) -> Option<ManagerMessage> {
        match command {
            RuntimeCommand::CreateApplication { name, .. } if self.broken.contains(name) => None,
            RuntimeCommand::CreateApplication { name, mode, .. } => {
                Some(ManagerMessage::ApplicationInitialised {
                    sender: name.clone(),
                    status: InitStatus::Success,
                    start_in_background: *mode == StartMode::Background,
                })
            }
            RuntimeCommand::Send { target, message } => match message {
                ApplicationMessage::SwitchApplication { .. } | ApplicationMessage::LostFocus => {
                    Some(ManagerMessage::switch_confirmation(target.clone()))
                }
                ApplicationMessage::Close => {
                    Some(ManagerMessage::close_confirmation(target.clone()))
                }
                ApplicationMessage::Action { .. } => Some(ManagerMessage::ActionHandled {
                    sender: target.clone(),
                }),
                ApplicationMessage::SwitchBack { .. } | ApplicationMessage::Rebuild => None,
            },
            _ => None,
        }
    }
}
