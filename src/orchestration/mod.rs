//! # Orchestration
//!
//! The application manager and everything it talks to: the message protocol,
//! the service runtime it drives, the settings it persists, and the actor
//! that runs it on a tokio task.

pub mod actor;
pub mod auto_lock;
pub mod channels;
pub mod commands;
pub mod manager;
pub mod messages;
pub mod runtime;
pub mod settings;
pub mod state;

pub use actor::{ApplicationManagerActor, ApplicationManagerHandle};
pub use auto_lock::{AutoLockTimer, PhoneLockState};
pub use channels::{ChannelFactory, ManagerCommandReceiver, ManagerCommandSender};
pub use commands::{CommandResponder, ManagerCommand};
pub use manager::{ApplicationManager, ManagerSnapshot};
pub use messages::{
    ActionRequest, ApplicationMessage, CloseReason, InitStatus, ManagerMessage, ManagerNotification,
    ManagerResponse, PowerMode, StartupType,
};
pub use runtime::{
    BluetoothMode, ChannelRuntime, PhoneMode, RuntimeCommand, ServiceRuntime, StartMode,
    StatusIndicators,
};
pub use settings::{InMemorySettings, SettingsStore};
pub use state::OrchestratorState;
