//! # Application Manager
//!
//! The orchestrator. Owns the applications registry, the navigation stack and
//! the action queue, and processes one [`ManagerMessage`] at a time.
//!
//! The protocol handlers are split by concern:
//!
//! - [`switching`] - switch / switch-back, focus and close confirmations
//! - [`actions`] - action classification and delivery
//! - [`lifecycle`] - initialisation, closing, languages, power modes, startup
//! - [`auto_lock`] - inactivity timer and phone lock
//!
//! State lives in two parts so the action queue can call back into the rest
//! of the manager while it is being scanned: `ManagerCore` holds everything
//! but the queue and acts as the queue's [`ActionHandler`].
//!
//! [`ActionHandler`]: crate::actions::ActionHandler

mod actions;
mod auto_lock;
mod lifecycle;
mod switching;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info};

use super::auto_lock::{AutoLockTimer, PhoneLockState};
use super::messages::{ManagerMessage, ManagerResponse};
use super::runtime::{ServiceRuntime, StatusIndicators};
use super::settings::SettingsStore;
use super::state::OrchestratorState;
use crate::actions::{ActionEntry, ActionsRegistry};
use crate::application::{
    ApplicationHandle, ApplicationLauncher, ApplicationName, ApplicationState, ApplicationsRegistry,
};
use crate::config::AppManagerConfig;
use crate::constants::settings as keys;
use crate::error::{AppManagerError, AppManagerResult};
use crate::stack::ApplicationStack;

/// Everything the manager owns except the action queue.
struct ManagerCore {
    config: AppManagerConfig,
    applications: ApplicationsRegistry,
    stack: ApplicationStack,
    state: OrchestratorState,
    runtime: Box<dyn ServiceRuntime>,
    settings: Arc<dyn SettingsStore>,
    display_language: String,
    input_language: String,
    indicators: StatusIndicators,
    lock: PhoneLockState,
    auto_lock_timer: AutoLockTimer,
}

pub struct ApplicationManager {
    core: ManagerCore,
    actions: ActionsRegistry,
}

/// Point-in-time view of the manager, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSnapshot {
    pub state: OrchestratorState,
    pub stack: Vec<ApplicationName>,
    pub focused: Option<ApplicationName>,
    pub applications: Vec<(ApplicationName, ApplicationState)>,
    pub queued_actions: usize,
    pub action_in_flight: bool,
    pub phone_locked: bool,
}

impl fmt::Debug for ApplicationManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationManager")
            .field("state", &self.core.state)
            .field("stack", &self.core.stack)
            .field("applications", &self.core.applications.len())
            .field("queued_actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

impl ApplicationManager {
    pub fn new(
        config: AppManagerConfig,
        launchers: impl IntoIterator<Item = ApplicationLauncher>,
        runtime: Box<dyn ServiceRuntime>,
        settings: Arc<dyn SettingsStore>,
    ) -> AppManagerResult<Self> {
        config.validate()?;
        let applications = ApplicationsRegistry::new(launchers)?;

        if !applications.contains(&config.root_application) {
            return Err(AppManagerError::unknown_application(&config.root_application));
        }
        if let Some(onboarding) = &config.onboarding_application {
            if !applications.contains(onboarding) {
                return Err(AppManagerError::unknown_application(onboarding));
            }
        }

        let display_language = settings
            .get(keys::DISPLAY_LANGUAGE)
            .unwrap_or_else(|| config.default_display_language.clone());
        let input_language = settings
            .get(keys::INPUT_LANGUAGE)
            .unwrap_or_else(|| config.default_input_language.clone());
        let auto_lock_interval = settings
            .get_u64(keys::AUTO_LOCK_TIME_SECONDS)
            .filter(|seconds| *seconds > 0)
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.auto_lock.timeout());

        info!(
            applications = applications.len(),
            root = %config.root_application,
            display_language = %display_language,
            auto_lock = config.auto_lock.enabled,
            "Application manager created"
        );

        let actions = ActionsRegistry::new(config.action_ttl());
        Ok(Self {
            core: ManagerCore {
                config,
                applications,
                stack: ApplicationStack::new(),
                state: OrchestratorState::Running,
                runtime,
                settings,
                display_language,
                input_language,
                indicators: StatusIndicators::default(),
                lock: PhoneLockState::default(),
                auto_lock_timer: AutoLockTimer::new(auto_lock_interval),
            },
            actions,
        })
    }

    /// Process one message to completion.
    pub fn handle(&mut self, message: ManagerMessage) -> ManagerResponse {
        debug!(
            message = message.kind(),
            state = %self.core.state,
            "Handling manager message"
        );

        let response = match message {
            ManagerMessage::SwitchRequest {
                sender,
                target,
                window,
                payload,
            } => {
                let handled = self.core.handle_switch_request(&sender, &target, window, payload);
                ManagerResponse::handled(handled)
            }
            ManagerMessage::SwitchBackRequest { sender, payload } => {
                ManagerResponse::handled(self.core.handle_switch_back(&sender, payload))
            }
            ManagerMessage::SwitchConfirmation { sender } => {
                ManagerResponse::handled(self.handle_switch_confirmation(&sender))
            }
            ManagerMessage::CloseConfirmation { sender } => {
                ManagerResponse::handled(self.core.handle_close_confirmation(&sender))
            }
            ManagerMessage::FinalizingClose { sender } => {
                ManagerResponse::handled(self.core.handle_finalizing_close(&sender))
            }
            ManagerMessage::ApplicationInitialised {
                sender,
                status,
                start_in_background,
            } => {
                let handled = self.handle_init_application(&sender, status, start_in_background);
                ManagerResponse::handled(handled)
            }
            ManagerMessage::ActionRequest(request) => {
                self.enqueue_action(request.into_entry());
                ManagerResponse::handled(true)
            }
            ManagerMessage::ActionHandled { sender } => {
                ManagerResponse::handled(self.handle_action_handled(&sender))
            }
            ManagerMessage::FinishRequest { sender } => {
                ManagerResponse::handled(self.core.handle_finish_request(&sender))
            }
            ManagerMessage::DisplayLanguageChangeRequest { language } => {
                self.core.handle_display_language_change(&language);
                self.display_language_response()
            }
            ManagerMessage::InputLanguageChangeRequest { language } => {
                ManagerResponse::handled(self.core.handle_input_language_change(&language))
            }
            ManagerMessage::GetDisplayLanguage => self.display_language_response(),
            ManagerMessage::PowerSaveModeInit => {
                ManagerResponse::handled(self.core.handle_power_save_mode_init())
            }
            ManagerMessage::PowerModeChanged { mode } => {
                ManagerResponse::handled(self.core.handle_power_mode_changed(mode))
            }
            ManagerMessage::ApplicationStatusRequest { name } => {
                self.core.application_status(&name)
            }
            ManagerMessage::ApplicationCloseRequest { name } => {
                ManagerResponse::handled(self.core.handle_application_close_request(&name))
            }
            ManagerMessage::CloseApplications => {
                ManagerResponse::handled(self.core.close_applications())
            }
            ManagerMessage::SystemCloseRequest { reason } => {
                ManagerResponse::handled(self.handle_system_close(reason))
            }
            ManagerMessage::StartAllowed { startup } => {
                ManagerResponse::handled(self.handle_start(startup))
            }
            ManagerMessage::FinalizeOnboarding => {
                ManagerResponse::handled(self.handle_onboarding_finalize())
            }
            ManagerMessage::PhoneModeChanged { mode } => {
                ManagerResponse::handled(self.handle_phone_mode_changed(mode))
            }
            ManagerMessage::BluetoothModeChanged { mode } => {
                ManagerResponse::handled(self.handle_bluetooth_mode_changed(mode))
            }
            ManagerMessage::AlarmClockStatusChanged { active } => {
                ManagerResponse::handled(self.handle_alarm_clock_status_changed(active))
            }
            ManagerMessage::UserActivity => {
                ManagerResponse::handled(self.core.handle_user_activity())
            }
            ManagerMessage::SetAutoLockTimeout { timeout } => {
                ManagerResponse::handled(self.core.handle_set_auto_lock_timeout(timeout))
            }
            ManagerMessage::GetAutoLockTimeout => ManagerResponse::AutoLockTimeout {
                timeout: self.core.auto_lock_timer.interval(),
            },
            ManagerMessage::AutoLockTimerExpired => {
                ManagerResponse::handled(self.handle_auto_lock_expired())
            }
            ManagerMessage::LockPhone => ManagerResponse::handled(self.handle_lock_phone()),
            ManagerMessage::UnlockPhone => ManagerResponse::handled(self.handle_unlock_phone()),
            ManagerMessage::TetheringChanged { enabled } => {
                ManagerResponse::handled(self.core.handle_tethering_changed(enabled))
            }
            ManagerMessage::WindowAutoLockChanged { sender, prevents } => {
                let handled = self.core.handle_window_auto_lock_changed(&sender, prevents);
                ManagerResponse::handled(handled)
            }
        };

        // Actions skipped during a negotiation get another chance once idle.
        if self.core.state.is_running() {
            self.release_stalled_action();
            self.actions.resume(&mut self.core);
        }

        response
    }

    pub fn enqueue_action(&mut self, entry: ActionEntry) {
        self.actions.enqueue(entry, &mut self.core);
    }

    fn display_language_response(&self) -> ManagerResponse {
        ManagerResponse::DisplayLanguage {
            language: self.core.display_language.clone(),
        }
    }

    pub fn state(&self) -> OrchestratorState {
        self.core.state
    }

    pub fn config(&self) -> &AppManagerConfig {
        &self.core.config
    }

    pub fn stack(&self) -> &ApplicationStack {
        &self.core.stack
    }

    pub fn applications(&self) -> &ApplicationsRegistry {
        &self.core.applications
    }

    pub fn application(&self, name: &str) -> Option<&ApplicationHandle> {
        self.core.applications.find_by_name(name)
    }

    pub fn actions(&self) -> &ActionsRegistry {
        &self.actions
    }

    pub fn focused_application(&self) -> Option<&ApplicationHandle> {
        self.core.focused_application()
    }

    pub fn display_language(&self) -> &str {
        &self.core.display_language
    }

    pub fn input_language(&self) -> &str {
        &self.core.input_language
    }

    pub fn status_indicators(&self) -> StatusIndicators {
        self.core.indicators
    }

    pub fn is_phone_locked(&self) -> bool {
        self.core.lock.locked
    }

    /// When the inactivity timer fires next, if auto-lock is armed.
    pub fn auto_lock_deadline(&self) -> Option<Instant> {
        if self.core.config.auto_lock.enabled {
            self.core.auto_lock_timer.deadline()
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        ManagerSnapshot {
            state: self.core.state,
            stack: self.core.stack.iter().map(|entry| entry.app_name.clone()).collect(),
            focused: self.core.focused_name(),
            applications: self
                .core
                .applications
                .iter()
                .map(|app| (app.name().to_string(), app.state()))
                .collect(),
            queued_actions: self.actions.len(),
            action_in_flight: self.actions.has_pending_action(),
            phone_locked: self.core.lock.locked,
        }
    }
}

impl ManagerCore {
    fn set_state(&mut self, state: OrchestratorState) {
        if self.state != state {
            debug!(from = %self.state, to = %state, "Orchestrator state change");
        }
        self.state = state;
    }

    fn application_mut(&mut self, name: &str) -> Option<&mut ApplicationHandle> {
        self.applications.find_by_name_mut(name)
    }
}
