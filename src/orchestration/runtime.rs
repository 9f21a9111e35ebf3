//! # Service Runtime
//!
//! The manager's only way of affecting the outside world. Implementations
//! create and destroy application services, suspend and resume system
//! services, and deliver messages and notifications.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;

use super::messages::{ApplicationMessage, ManagerNotification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartMode {
    Foreground,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhoneMode {
    #[default]
    Connected,
    DoNotDisturb,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BluetoothMode {
    #[default]
    Disabled,
    Enabled,
    Connected,
}

/// Status bar state handed to every application when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusIndicators {
    pub phone_mode: PhoneMode,
    pub bluetooth_mode: BluetoothMode,
    pub alarm_clock_active: bool,
}

pub trait ServiceRuntime: Send {
    /// Create the service backing `name`. Returns false if it could not be created.
    fn create_application(
        &mut self,
        name: &str,
        mode: StartMode,
        indicators: &StatusIndicators,
    ) -> bool;

    /// Destroy the service backing `name`. Returns false if it is still running.
    fn destroy_application(&mut self, name: &str) -> bool;

    fn suspend_service(&mut self, name: &str) -> bool;

    fn resume_service(&mut self, name: &str) -> bool;

    /// Unicast to one application.
    fn send(&mut self, target: &str, message: ApplicationMessage);

    /// Multicast to everyone subscribed to manager notifications.
    fn publish(&mut self, notification: ManagerNotification);
}

/// Everything a [`ChannelRuntime`] forwards to its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeCommand {
    CreateApplication {
        name: String,
        mode: StartMode,
        indicators: StatusIndicators,
    },
    DestroyApplication {
        name: String,
    },
    SuspendService {
        name: String,
    },
    ResumeService {
        name: String,
    },
    Send {
        target: String,
        message: ApplicationMessage,
    },
    Publish {
        notification: ManagerNotification,
    },
}

/// Runtime that hands every request to the embedding host over a channel.
///
/// Creation and destruction are reported successful as long as the host is
/// still listening.
#[derive(Debug, Clone)]
pub struct ChannelRuntime {
    sender: mpsc::UnboundedSender<RuntimeCommand>,
}

impl ChannelRuntime {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RuntimeCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    fn forward(&self, command: RuntimeCommand) -> bool {
        match self.sender.send(command) {
            Ok(()) => true,
            Err(error) => {
                warn!(command = ?error.0, "Runtime host is gone, dropping command");
                false
            }
        }
    }
}

impl ServiceRuntime for ChannelRuntime {
    fn create_application(
        &mut self,
        name: &str,
        mode: StartMode,
        indicators: &StatusIndicators,
    ) -> bool {
        self.forward(RuntimeCommand::CreateApplication {
            name: name.to_string(),
            mode,
            indicators: *indicators,
        })
    }

    fn destroy_application(&mut self, name: &str) -> bool {
        self.forward(RuntimeCommand::DestroyApplication {
            name: name.to_string(),
        })
    }

    fn suspend_service(&mut self, name: &str) -> bool {
        self.forward(RuntimeCommand::SuspendService {
            name: name.to_string(),
        })
    }

    fn resume_service(&mut self, name: &str) -> bool {
        self.forward(RuntimeCommand::ResumeService {
            name: name.to_string(),
        })
    }

    fn send(&mut self, target: &str, message: ApplicationMessage) {
        self.forward(RuntimeCommand::Send {
            target: target.to_string(),
            message,
        });
    }

    fn publish(&mut self, notification: ManagerNotification) {
        self.forward(RuntimeCommand::Publish { notification });
    }
}
