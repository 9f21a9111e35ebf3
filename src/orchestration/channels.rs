//! # Manager Channels
//!
//! NewType wrappers around the manager actor's mailbox so the sending and
//! receiving halves cannot be confused with other channels.
//!
//! ```rust
//! use appmgr_core::orchestration::{ChannelFactory, ManagerCommand};
//!
//! # tokio_test::block_on(async {
//! let (tx, mut rx) = ChannelFactory::manager_command_channel(8);
//! tx.send(ManagerCommand::Shutdown).await.unwrap();
//! assert!(matches!(rx.recv().await, Some(ManagerCommand::Shutdown)));
//! # });
//! ```

use tokio::sync::mpsc;

use super::commands::ManagerCommand;

/// Sending half of the manager mailbox.
#[derive(Debug, Clone)]
pub struct ManagerCommandSender(pub(crate) mpsc::Sender<ManagerCommand>);

/// Receiving half of the manager mailbox, owned by the actor.
#[derive(Debug)]
pub struct ManagerCommandReceiver(pub(crate) mpsc::Receiver<ManagerCommand>);

impl ManagerCommandSender {
    pub async fn send(
        &self,
        command: ManagerCommand,
    ) -> Result<(), mpsc::error::SendError<ManagerCommand>> {
        self.0.send(command).await
    }

    #[allow(clippy::result_large_err)] // TrySendError hands the command back
    pub fn try_send(
        &self,
        command: ManagerCommand,
    ) -> Result<(), mpsc::error::TrySendError<ManagerCommand>> {
        self.0.try_send(command)
    }

    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }

    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }
}

impl ManagerCommandReceiver {
    pub async fn recv(&mut self) -> Option<ManagerCommand> {
        self.0.recv().await
    }

    pub fn try_recv(&mut self) -> Result<ManagerCommand, mpsc::error::TryRecvError> {
        self.0.try_recv()
    }

    pub fn close(&mut self) {
        self.0.close()
    }
}

pub struct ChannelFactory;

impl ChannelFactory {
    pub fn manager_command_channel(
        buffer_size: usize,
    ) -> (ManagerCommandSender, ManagerCommandReceiver) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (ManagerCommandSender(tx), ManagerCommandReceiver(rx))
    }
}
