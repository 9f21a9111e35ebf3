//! # Application Manager Actor
//!
//! Runs an [`ApplicationManager`] on its own task. The manager itself is
//! synchronous; the actor owns it, drains the mailbox one command at a time
//! and turns the auto-lock deadline into `AutoLockTimerExpired` messages.
//!
//! ```rust,ignore
//! let (mut actor, handle) = ApplicationManagerActor::new(manager);
//! let task = actor.start()?;
//!
//! handle.send(ManagerMessage::StartAllowed { startup: StartupType::Regular }).await?;
//! let snapshot = handle.snapshot().await?;
//!
//! handle.shutdown().await?;
//! let manager = task.await?;
//! ```

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::channels::{ChannelFactory, ManagerCommandReceiver, ManagerCommandSender};
use super::commands::ManagerCommand;
use super::manager::{ApplicationManager, ManagerSnapshot};
use super::messages::{ManagerMessage, ManagerResponse};
use crate::error::{AppManagerError, AppManagerResult};

#[derive(Debug)]
pub struct ApplicationManagerActor {
    manager: Option<ApplicationManager>,
    command_rx: Option<ManagerCommandReceiver>,
}

impl ApplicationManagerActor {
    pub fn new(manager: ApplicationManager) -> (Self, ApplicationManagerHandle) {
        let buffer_size = manager.config().mailbox_buffer_size;
        let (command_tx, command_rx) = ChannelFactory::manager_command_channel(buffer_size);

        info!(buffer_size = buffer_size, "Creating ApplicationManagerActor");

        let actor = Self {
            manager: Some(manager),
            command_rx: Some(command_rx),
        };
        (actor, ApplicationManagerHandle { sender: command_tx })
    }

    /// Start the command loop. The join handle yields the manager back once
    /// the loop stops.
    pub fn start(&mut self) -> AppManagerResult<JoinHandle<ApplicationManager>> {
        let manager = self
            .manager
            .take()
            .ok_or_else(|| AppManagerError::Internal("Manager actor already started".to_string()))?;
        let command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| AppManagerError::Internal("Manager actor already started".to_string()))?;

        Ok(tokio::spawn(run_command_loop(manager, command_rx)))
    }
}

async fn run_command_loop(
    mut manager: ApplicationManager,
    mut command_rx: ManagerCommandReceiver,
) -> ApplicationManager {
    info!("Application manager started");

    loop {
        let deadline = manager.auto_lock_deadline();
        tokio::select! {
            biased;

            command = command_rx.recv() => match command {
                Some(ManagerCommand::Shutdown) => {
                    info!("Shutdown requested");
                    break;
                }
                Some(command) => process_command(&mut manager, command),
                None => {
                    info!("All manager handles dropped");
                    break;
                }
            },
            () = wait_for(deadline) => {
                debug!("Auto-lock timer expired");
                manager.handle(ManagerMessage::AutoLockTimerExpired);
            }
        }
    }

    info!("Application manager stopped");
    manager
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn process_command(manager: &mut ApplicationManager, command: ManagerCommand) {
    let kind = command.kind();
    match command {
        ManagerCommand::Deliver { message } => {
            let response = manager.handle(message);
            if !response.is_success() {
                debug!(message = kind, "Message not handled");
            }
        }
        ManagerCommand::Request { message, resp } => {
            let response = manager.handle(message);
            if resp.send(Ok(response)).is_err() {
                warn!(message = kind, "Requester went away before the response was sent");
            }
        }
        ManagerCommand::Snapshot { resp } => {
            if resp.send(Ok(manager.snapshot())).is_err() {
                warn!("Requester went away before the snapshot was sent");
            }
        }
        ManagerCommand::Shutdown => {}
    }
}

/// Cloneable client side of the manager actor.
#[derive(Debug, Clone)]
pub struct ApplicationManagerHandle {
    sender: ManagerCommandSender,
}

impl ApplicationManagerHandle {
    /// Deliver a message without waiting for it to be processed.
    pub async fn send(&self, message: ManagerMessage) -> AppManagerResult<()> {
        self.sender
            .send(ManagerCommand::Deliver { message })
            .await
            .map_err(|_| AppManagerError::channel_closed("deliver"))
    }

    pub async fn request(&self, message: ManagerMessage) -> AppManagerResult<ManagerResponse> {
        let (resp, response) = oneshot::channel();
        self.sender
            .send(ManagerCommand::Request { message, resp })
            .await
            .map_err(|_| AppManagerError::channel_closed("request"))?;
        response
            .await
            .map_err(|_| AppManagerError::channel_closed("request response"))?
    }

    pub async fn snapshot(&self) -> AppManagerResult<ManagerSnapshot> {
        let (resp, response) = oneshot::channel();
        self.sender
            .send(ManagerCommand::Snapshot { resp })
            .await
            .map_err(|_| AppManagerError::channel_closed("snapshot"))?;
        response
            .await
            .map_err(|_| AppManagerError::channel_closed("snapshot response"))?
    }

    pub async fn shutdown(&self) -> AppManagerResult<()> {
        self.sender
            .send(ManagerCommand::Shutdown)
            .await
            .map_err(|_| AppManagerError::channel_closed("shutdown"))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
