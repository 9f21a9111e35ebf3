use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ActionFlag, ApplicationLauncher, ApplicationManifest, AutoLockPolicy, Payload};
use crate::actions::ActionId;
use crate::orchestration::runtime::{ServiceRuntime, StartMode, StatusIndicators};

/// Lifecycle state of a managed application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    /// Never started
    #[default]
    None,
    /// Closed after having run
    Deactivated,
    /// Service created, waiting for its initialisation report
    Initializing,
    /// Initialised, waiting to confirm it took focus
    Activating,
    ActiveForeground,
    ActiveBackground,
}

impl ApplicationState {
    pub fn started(&self) -> bool {
        !matches!(self, Self::None | Self::Deactivated)
    }

    pub fn is_starting(&self) -> bool {
        matches!(self, Self::Initializing | Self::Activating)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::ActiveForeground | Self::ActiveBackground)
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Initializing => write!(f, "initializing"),
            Self::Activating => write!(f, "activating"),
            Self::ActiveForeground => write!(f, "active_foreground"),
            Self::ActiveBackground => write!(f, "active_background"),
        }
    }
}

/// Why an application is being brought to the foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StartupReason {
    #[default]
    Launch,
    OnAction,
}

/// Runtime bookkeeping for one registered application.
#[derive(Debug, Clone)]
pub struct ApplicationHandle {
    launcher: ApplicationLauncher,
    state: ApplicationState,
    pub pending_payload: Option<Payload>,
    pub pending_window: String,
    pub startup_reason: StartupReason,
    /// Forbids closing despite manifest closeability.
    pub block_closing: bool,
    /// Last report from the application's current window.
    pub window_prevents_auto_lock: bool,
}

impl ApplicationHandle {
    pub fn new(launcher: ApplicationLauncher) -> Self {
        Self {
            launcher,
            state: ApplicationState::None,
            pending_payload: None,
            pending_window: String::new(),
            startup_reason: StartupReason::Launch,
            block_closing: false,
            window_prevents_auto_lock: false,
        }
    }

    pub fn name(&self) -> &str {
        self.launcher.name()
    }

    pub fn state(&self) -> ApplicationState {
        self.state
    }

    pub fn set_state(&mut self, state: ApplicationState) {
        if self.state != state {
            tracing::debug!(
                application = %self.name(),
                from = %self.state,
                to = %state,
                "Application state change"
            );
        }
        self.state = state;
    }

    pub fn manifest(&self) -> &ApplicationManifest {
        self.launcher.manifest()
    }

    pub fn handles(&self, action: &ActionId) -> bool {
        self.manifest().contains(action)
    }

    pub fn action_flag(&self, action: &ActionId) -> Option<ActionFlag> {
        self.manifest().action_flag(action)
    }

    pub fn started(&self) -> bool {
        self.state.started()
    }

    pub fn is_starting(&self) -> bool {
        self.state.is_starting()
    }

    /// Manifest closeability, unless closing is currently blocked.
    pub fn closeable(&self) -> bool {
        self.launcher.is_closeable() && !self.block_closing
    }

    pub fn prevents_auto_locking(&self) -> bool {
        match self.manifest().auto_lock_policy() {
            AutoLockPolicy::PreventPermanently => true,
            AutoLockPolicy::DetermineByWindow => self.window_prevents_auto_lock,
        }
    }

    pub fn take_pending_payload(&mut self) -> Option<Payload> {
        self.pending_payload.take()
    }

    pub fn run(&mut self, runtime: &mut dyn ServiceRuntime, indicators: &StatusIndicators) -> bool {
        self.start(runtime, StartMode::Foreground, indicators)
    }

    pub fn run_in_background(
        &mut self,
        runtime: &mut dyn ServiceRuntime,
        indicators: &StatusIndicators,
    ) -> bool {
        self.start(runtime, StartMode::Background, indicators)
    }

    fn start(
        &mut self,
        runtime: &mut dyn ServiceRuntime,
        mode: StartMode,
        indicators: &StatusIndicators,
    ) -> bool {
        self.set_state(ApplicationState::Initializing);
        let created = self.launcher.run(runtime, mode, indicators);
        if !created {
            tracing::error!(
                application = %self.name(),
                mode = ?mode,
                "Failed to create application service"
            );
            self.set_state(ApplicationState::Deactivated);
        }
        created
    }

    /// Tear the service down. Returns whether the runtime confirmed it stopped;
    /// the handle is deactivated either way.
    pub fn close(&mut self, runtime: &mut dyn ServiceRuntime) -> bool {
        let stopped = runtime.destroy_application(self.name());
        self.set_state(ApplicationState::Deactivated);
        self.pending_payload = None;
        self.pending_window.clear();
        self.block_closing = false;
        stopped
    }
}
