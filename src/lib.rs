#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # AppMgr Core
//!
//! Application lifecycle orchestration for a single-screen embedded device.
//!
//! ## Overview
//!
//! Exactly one application holds the screen at a time. The manager decides
//! which one, negotiates hand-overs with the application losing focus, keeps a
//! navigation history for "back", and routes cross-application actions (open
//! the home screen, show a popup, deliver an SMS) to whichever application
//! declared it can handle them.
//!
//! ## Architecture
//!
//! The manager is a synchronous state machine that processes one
//! [`ManagerMessage`] at a time. It never blocks: every hand-over is a
//! request/confirmation exchange, and while one is in progress the manager
//! sits in an awaiting state and refuses new switches. Actions that cannot be
//! served yet stay queued and are re-examined once the manager is idle.
//!
//! Side effects go through a [`ServiceRuntime`], so the same manager runs under
//! a host that forwards everything over a channel ([`ChannelRuntime`]) or
//! under a recording double in tests.
//!
//! ## Module Organization
//!
//! - [`application`] - manifests, launchers, per-application handles and the registry
//! - [`stack`] - navigation history
//! - [`actions`] - action identifiers and the pending-action queue
//! - [`orchestration`] - the manager, its message protocol and the actor running it
//! - [`config`] - layered TOML/environment configuration
//! - [`logging`] - structured logging setup
//! - [`error`] - structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use appmgr_core::application::{ApplicationLauncher, ApplicationManifest};
//! use appmgr_core::actions::ActionId;
//! use appmgr_core::config::ConfigManager;
//! use appmgr_core::orchestration::{
//!     ApplicationManager, ApplicationManagerActor, ChannelRuntime, InMemorySettings,
//!     ManagerMessage, StartupType,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! appmgr_core::logging::init_structured_logging();
//!
//! let config = ConfigManager::load()?.config().clone();
//! let launchers = vec![
//!     ApplicationLauncher::new(
//!         "ApplicationDesktop",
//!         ApplicationManifest::new([ActionId::Launch]),
//!     ),
//!     ApplicationLauncher::new("ApplicationClock", ApplicationManifest::new([ActionId::Launch])),
//! ];
//! let (runtime, _host_rx) = ChannelRuntime::new();
//!
//! let manager = ApplicationManager::new(
//!     config,
//!     launchers,
//!     Box::new(runtime),
//!     Arc::new(InMemorySettings::new()),
//! )?;
//! let (mut actor, handle) = ApplicationManagerActor::new(manager);
//! actor.start()?;
//!
//! handle
//!     .send(ManagerMessage::StartAllowed {
//!         startup: StartupType::Regular,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit, integration and property tests
//! ```
//!
//! [`ManagerMessage`]: orchestration::ManagerMessage
//! [`ServiceRuntime`]: orchestration::ServiceRuntime
//! [`ChannelRuntime`]: orchestration::ChannelRuntime

pub mod actions;
pub mod application;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod orchestration;
pub mod stack;
pub mod test_helpers;

pub use actions::{ActionEntry, ActionId, ActionsRegistry};
pub use application::{
    ApplicationHandle, ApplicationLauncher, ApplicationManifest, ApplicationState,
};
pub use config::{AppManagerConfig, ConfigManager};
pub use error::{AppManagerError, AppManagerResult};
pub use orchestration::{
    ApplicationManager, ApplicationManagerActor, ApplicationManagerHandle, ManagerMessage,
    ManagerResponse, OrchestratorState,
};
pub use stack::ApplicationStack;
