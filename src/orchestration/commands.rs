//! # Manager Commands
//!
//! Envelope types accepted by the manager actor's mailbox. Every command that
//! expects an answer carries its own oneshot responder.

use tokio::sync::oneshot;

use super::manager::ManagerSnapshot;
use super::messages::{ManagerMessage, ManagerResponse};
use crate::error::AppManagerResult;

/// Type alias for command response channels
pub type CommandResponder<T> = oneshot::Sender<AppManagerResult<T>>;

#[derive(Debug)]
pub enum ManagerCommand {
    /// Fire-and-forget delivery of a protocol message.
    Deliver { message: ManagerMessage },
    /// Deliver a message and wait for the manager's response.
    Request {
        message: ManagerMessage,
        resp: CommandResponder<ManagerResponse>,
    },
    Snapshot {
        resp: CommandResponder<ManagerSnapshot>,
    },
    /// Stop the actor loop after the commands already queued.
    Shutdown,
}

impl ManagerCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deliver { message } | Self::Request { message, .. } => message.kind(),
            Self::Snapshot { .. } => "snapshot",
            Self::Shutdown => "shutdown",
        }
    }
}
