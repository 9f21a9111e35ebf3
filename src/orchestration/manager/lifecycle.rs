//! Initialisation, closing, languages, power modes and system startup.

use serde_json::json;
use tracing::{error, info, warn};

use super::{ApplicationManager, ManagerCore};
use crate::actions::{ActionEntry, ActionId};
use crate::application::ApplicationState;
use crate::constants::{settings as keys, windows};
use crate::orchestration::messages::{
    ApplicationMessage, CloseReason, InitStatus, ManagerNotification, ManagerResponse, PowerMode,
    StartupType,
};
use crate::orchestration::runtime::{BluetoothMode, PhoneMode};
use crate::orchestration::state::OrchestratorState;

impl ManagerCore {
    /// Close `name` right away, without any negotiation.
    pub(super) fn close_application(&mut self, name: &str) -> bool {
        let Some(app) = self.applications.find_by_name_mut(name) else {
            return false;
        };
        if app.close(self.runtime.as_mut()) {
            info!(application = %name, "Application closed");
            true
        } else {
            error!(fatal = true, application = %name, "Application is still running");
            false
        }
    }

    /// The sender leaves the navigation history; whatever is no longer
    /// reachable from it gets closed.
    pub(super) fn handle_finish_request(&mut self, sender: &str) -> bool {
        if !self.stack.erase_first_of(sender) {
            warn!(sender = %sender, "Finish request from an application that is not on the stack");
            return false;
        }
        self.close_no_longer_needed_applications();
        true
    }

    fn close_no_longer_needed_applications(&mut self) {
        let unneeded: Vec<String> = self
            .applications
            .iter()
            .filter(|app| app.started() && !self.stack.contains(app.name()))
            .filter(|app| self.stack.is_application_closeable(app))
            .map(|app| app.name().to_string())
            .collect();
        for name in unneeded {
            self.close_application(&name);
        }
    }

    pub(super) fn close_applications(&mut self) -> bool {
        let started: Vec<String> = self
            .applications
            .iter()
            .filter(|app| app.started())
            .map(|app| app.name().to_string())
            .collect();
        info!(count = started.len(), "Closing all applications");

        let mut all_closed = true;
        for name in started {
            all_closed &= self.close_application(&name);
        }
        all_closed
    }

    pub(super) fn handle_application_close_request(&mut self, name: &str) -> bool {
        if !self.applications.contains(name) {
            error!(application = %name, "Close request for unknown application");
            return false;
        }
        self.close_application(name)
    }

    pub(super) fn handle_display_language_change(&mut self, language: &str) -> bool {
        if self.display_language == language {
            warn!(language = %language, "Display language is already set");
            return false;
        }

        info!(from = %self.display_language, to = %language, "Display language changed");
        self.display_language = language.to_string();
        self.settings.set(keys::DISPLAY_LANGUAGE, language);

        for name in self.stack.unique() {
            let active = self
                .applications
                .find_by_name(&name)
                .map(|app| app.state().is_active())
                .unwrap_or(false);
            if active {
                self.runtime.send(&name, ApplicationMessage::Rebuild);
            }
        }
        self.runtime.publish(ManagerNotification::DisplayLanguageChanged {
            language: language.to_string(),
        });
        true
    }

    pub(super) fn handle_input_language_change(&mut self, language: &str) -> bool {
        if self.input_language == language {
            warn!(language = %language, "Input language is already set");
            return false;
        }

        info!(from = %self.input_language, to = %language, "Input language changed");
        self.input_language = language.to_string();
        self.settings.set(keys::INPUT_LANGUAGE, language);
        true
    }

    pub(super) fn handle_power_save_mode_init(&mut self) -> bool {
        info!("Entering power save mode");
        self.suspend_dependent_services()
    }

    pub(super) fn handle_power_mode_changed(&mut self, mode: PowerMode) -> bool {
        info!(mode = ?mode, "Power mode changed");
        match mode {
            PowerMode::Active => self.resume_dependent_services(),
            PowerMode::SuspendToRam | PowerMode::SuspendToNvm => self.suspend_dependent_services(),
        }
    }

    fn suspend_dependent_services(&mut self) -> bool {
        let mut all = true;
        for service in &self.config.dependent_services {
            if !self.runtime.suspend_service(service) {
                warn!(service = %service, "Failed to suspend service");
                all = false;
            }
        }
        all
    }

    fn resume_dependent_services(&mut self) -> bool {
        let mut all = true;
        for service in self.config.dependent_services.iter().rev() {
            if !self.runtime.resume_service(service) {
                warn!(service = %service, "Failed to resume service");
                all = false;
            }
        }
        all
    }

    pub(super) fn application_status(&self, name: &str) -> ManagerResponse {
        ManagerResponse::ApplicationStatus {
            name: name.to_string(),
            is_running: self
                .applications
                .find_by_name(name)
                .map(|app| app.started())
                .unwrap_or(false),
        }
    }
}

impl ApplicationManager {
    pub(super) fn handle_init_application(
        &mut self,
        sender: &str,
        status: InitStatus,
        start_in_background: bool,
    ) -> bool {
        if !self.core.applications.contains(sender) {
            error!(sender = %sender, "Failed to register application: No such application.");
            return false;
        }
        info!(
            sender = %sender,
            status = ?status,
            background = start_in_background,
            "Application initialised"
        );

        match status {
            InitStatus::Success => self.on_init_success(sender, start_in_background),
            InitStatus::Failure => self.on_init_failure(sender),
        }

        let is_running = self
            .core
            .applications
            .find_by_name(sender)
            .map(|app| app.started())
            .unwrap_or(false);
        self.core.runtime.publish(ManagerNotification::ApplicationStatus {
            name: sender.to_string(),
            is_running,
        });
        true
    }

    fn on_init_success(&mut self, sender: &str, start_in_background: bool) {
        let launching = self.core.launching_name();
        let Some(app) = self.core.applications.find_by_name_mut(sender) else {
            return;
        };

        if launching.as_deref() != Some(sender) {
            app.set_state(ApplicationState::ActiveBackground);
            return;
        }

        if start_in_background {
            app.set_state(ApplicationState::ActiveBackground);
            self.core.set_state(OrchestratorState::Running);
            return;
        }

        app.set_state(ApplicationState::Activating);
        let message = ApplicationMessage::SwitchApplication {
            window: app.pending_window.clone(),
            payload: app.take_pending_payload(),
            reason: app.startup_reason,
        };
        self.core.runtime.send(sender, message);
        self.core.set_state(OrchestratorState::AwaitingFocusConfirmation);
    }

    fn on_init_failure(&mut self, sender: &str) {
        error!(sender = %sender, "Application failed to initialise");
        if let Some(app) = self.core.application_mut(sender) {
            app.set_state(ApplicationState::Deactivated);
        }

        let is_front = self
            .core
            .stack
            .front()
            .map(|entry| entry.app_name == sender)
            .unwrap_or(false);
        if is_front {
            self.core.set_state(OrchestratorState::Running);
            if !self.core.handle_switch_back(sender, None) {
                self.core.stack.erase_first_of(sender);
            }
        } else {
            self.core.stack.erase_first_of(sender);
        }

        let targets_sender = self
            .actions
            .pending_action()
            .map(|entry| entry.targets(sender))
            .unwrap_or(false);
        if targets_sender {
            self.actions.finished(&mut self.core);
        }
    }

    pub(super) fn handle_start(&mut self, startup: StartupType) -> bool {
        info!(startup = ?startup, "Applications allowed to start");
        let root = self.core.config.root_application.clone();

        match startup {
            StartupType::Regular => {
                self.start_background_applications();
                if self.core.config.auto_lock.enabled {
                    self.core.auto_lock_timer.start();
                }
                self.enqueue_action(ActionEntry::new(ActionId::Home, None));
                true
            }
            StartupType::LowBattery => {
                let window = windows::DEAD_BATTERY.to_string();
                self.core.switch_application(&root, window, None, true);
                true
            }
            StartupType::LowBatteryCharging => {
                let window = windows::CHARGING_BATTERY.to_string();
                self.core.switch_application(&root, window, None, true);
                true
            }
        }
    }

    fn start_background_applications(&mut self) {
        let indicators = self.core.indicators;
        let names = self.core.config.background_applications.clone();
        for name in names {
            let Some(app) = self.core.applications.find_by_name_mut(&name) else {
                warn!(application = %name, "Background application is not registered");
                continue;
            };
            if app.started() {
                warn!(application = %name, "Background application is already running");
                continue;
            }
            app.run_in_background(self.core.runtime.as_mut(), &indicators);
        }
    }

    pub(super) fn handle_system_close(&mut self, reason: CloseReason) -> bool {
        info!(reason = ?reason, "System close requested");
        self.enqueue_action(ActionEntry::new(reason.exit_action(), None));
        true
    }

    pub(super) fn handle_onboarding_finalize(&mut self) -> bool {
        info!("Onboarding finalized");
        self.core.settings.set(keys::ONBOARDING_DONE, "1");
        self.enqueue_action(ActionEntry::new(ActionId::Home, None));
        true
    }

    pub(super) fn handle_phone_mode_changed(&mut self, mode: PhoneMode) -> bool {
        self.core.indicators.phone_mode = mode;
        let payload = json!({ "phone_mode": mode });
        self.broadcast_status(ActionId::PhoneModeChanged, &payload);
        self.enqueue_action(ActionEntry::new(ActionId::ShowPopup, Some(payload)));
        true
    }

    pub(super) fn handle_bluetooth_mode_changed(&mut self, mode: BluetoothMode) -> bool {
        self.core.indicators.bluetooth_mode = mode;
        self.broadcast_status(ActionId::BluetoothModeChanged, &json!({ "bluetooth_mode": mode }));
        true
    }

    pub(super) fn handle_alarm_clock_status_changed(&mut self, active: bool) -> bool {
        self.core.indicators.alarm_clock_active = active;
        self.broadcast_status(
            ActionId::AlarmClockStatusChanged,
            &json!({ "alarm_clock_active": active }),
        );
        true
    }

    /// One status action per resident application that handles it.
    fn broadcast_status(&mut self, action: ActionId, payload: &serde_json::Value) {
        let targets: Vec<String> = self
            .core
            .stack
            .unique()
            .into_iter()
            .filter(|name| {
                self.core
                    .applications
                    .find_by_name(name)
                    .map(|app| app.handles(&action))
                    .unwrap_or(false)
            })
            .collect();
        for target in targets {
            let entry = ActionEntry::new(action.clone(), Some(payload.clone())).with_target(target);
            self.enqueue_action(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::actions::ActionId;
    use crate::application::ApplicationState;
    use crate::constants::{services, settings as keys};
    use crate::orchestration::messages::{
        ApplicationMessage, CloseReason, InitStatus, ManagerMessage, ManagerNotification,
        ManagerResponse, PowerMode, StartupType,
    };
    use crate::orchestration::runtime::{PhoneMode, RuntimeCommand};
    use crate::orchestration::settings::{InMemorySettings, SettingsStore};
    use crate::orchestration::state::OrchestratorState;
    use crate::test_helpers::{
        manager_with, manager_with_settings, standard_launchers, test_config, RecordingRuntime,
    };

    fn focused(manager: &mut crate::orchestration::ApplicationManager, app: &str) {
        manager.handle(ManagerMessage::switch("test", app, None, None));
        manager.handle(ManagerMessage::initialised(app));
        manager.handle(ManagerMessage::switch_confirmation(app));
    }

    #[test]
    fn test_init_failure_returns_to_previous_application() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());
        focused(&mut manager, "ApplicationCall");
        manager.handle(ManagerMessage::switch("test", "ApplicationSettings", None, None));
        manager.handle(ManagerMessage::switch_confirmation("ApplicationCall"));
        runtime.clear();

        manager.handle(ManagerMessage::ApplicationInitialised {
            sender: "ApplicationSettings".to_string(),
            status: InitStatus::Failure,
            start_in_background: false,
        });

        assert_eq!(
            manager.application("ApplicationSettings").map(|app| app.state()),
            Some(ApplicationState::Deactivated)
        );
        assert_eq!(manager.stack().len(), 1);
        assert_eq!(manager.state(), OrchestratorState::AwaitingFocusConfirmation);
        assert!(matches!(
            runtime.sent_to("ApplicationCall").as_slice(),
            [ApplicationMessage::SwitchApplication { .. }]
        ));
        assert!(runtime.published().contains(&ManagerNotification::ApplicationStatus {
            name: "ApplicationSettings".to_string(),
            is_running: false,
        }));
    }

    #[test]
    fn test_init_failure_of_only_application_empties_stack() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());
        manager.handle(ManagerMessage::switch("test", "ApplicationClock", None, None));

        manager.handle(ManagerMessage::ApplicationInitialised {
            sender: "ApplicationClock".to_string(),
            status: InitStatus::Failure,
            start_in_background: false,
        });

        assert!(manager.stack().is_empty());
        assert_eq!(manager.state(), OrchestratorState::Running);
    }

    #[test]
    fn test_finish_request_closes_unreachable_applications() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());
        focused(&mut manager, "ApplicationCall");
        manager.handle(ManagerMessage::switch("test", "ApplicationClock", None, None));
        manager.handle(ManagerMessage::switch_confirmation("ApplicationCall"));
        manager.handle(ManagerMessage::initialised("ApplicationClock"));
        manager.handle(ManagerMessage::switch_confirmation("ApplicationClock"));

        let response = manager.handle(ManagerMessage::FinishRequest {
            sender: "ApplicationClock".to_string(),
        });

        assert!(response.is_success());
        assert_eq!(manager.stack().len(), 1);
        assert_eq!(runtime.destroyed(), vec!["ApplicationClock".to_string()]);
        // Non-closeable applications stay resident even off the stack.
        assert!(manager.application("ApplicationCall").map(|app| app.started()).unwrap_or(false));
    }

    #[test]
    fn test_display_language_change_rebuilds_active_applications() {
        let runtime = RecordingRuntime::new();
        let settings = InMemorySettings::new();
        let mut manager = manager_with_settings(
            test_config(),
            standard_launchers(),
            runtime.clone(),
            settings.clone(),
        );
        focused(&mut manager, "ApplicationClock");
        runtime.clear();

        let response = manager.handle(ManagerMessage::DisplayLanguageChangeRequest {
            language: "Deutsch".to_string(),
        });

        assert_eq!(
            response,
            ManagerResponse::DisplayLanguage {
                language: "Deutsch".to_string()
            }
        );
        assert_eq!(settings.get(keys::DISPLAY_LANGUAGE).as_deref(), Some("Deutsch"));
        assert_eq!(runtime.sent_to("ApplicationClock"), vec![ApplicationMessage::Rebuild]);

        runtime.clear();
        manager.handle(ManagerMessage::DisplayLanguageChangeRequest {
            language: "Deutsch".to_string(),
        });
        assert!(runtime.log().is_empty());
    }

    #[test]
    fn test_input_language_change() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime);
        assert!(manager
            .handle(ManagerMessage::InputLanguageChangeRequest {
                language: "Polski".to_string()
            })
            .is_success());
        assert_eq!(manager.input_language(), "Polski");
        assert!(!manager
            .handle(ManagerMessage::InputLanguageChangeRequest {
                language: "Polski".to_string()
            })
            .is_success());
    }

    #[test]
    fn test_power_modes_suspend_and_resume_in_order() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());

        manager.handle(ManagerMessage::PowerSaveModeInit);
        assert_eq!(
            runtime.suspended(),
            vec![services::GUI.to_string(), services::EINK.to_string()]
        );

        manager.handle(ManagerMessage::PowerModeChanged { mode: PowerMode::Active });
        assert_eq!(
            runtime.resumed(),
            vec![services::EINK.to_string(), services::GUI.to_string()]
        );
    }

    #[test]
    fn test_application_status() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime);
        focused(&mut manager, "ApplicationClock");

        assert_eq!(
            manager.handle(ManagerMessage::ApplicationStatusRequest {
                name: "ApplicationClock".to_string()
            }),
            ManagerResponse::ApplicationStatus {
                name: "ApplicationClock".to_string(),
                is_running: true
            }
        );
        assert_eq!(
            manager.handle(ManagerMessage::ApplicationStatusRequest {
                name: "ApplicationMissing".to_string()
            }),
            ManagerResponse::ApplicationStatus {
                name: "ApplicationMissing".to_string(),
                is_running: false
            }
        );
    }

    #[test]
    fn test_close_applications_destroys_every_started_application() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());
        focused(&mut manager, "ApplicationCall");

        assert!(manager.handle(ManagerMessage::CloseApplications).is_success());
        assert_eq!(runtime.destroyed(), vec!["ApplicationCall".to_string()]);
        assert!(manager.applications().iter().all(|app| !app.started()));
    }

    #[test]
    fn test_regular_start_launches_background_applications_and_home() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());

        manager.handle(ManagerMessage::StartAllowed {
            startup: StartupType::Regular,
        });

        assert!(runtime.log().contains(&RuntimeCommand::CreateApplication {
            name: "ApplicationAlarm".to_string(),
            mode: crate::orchestration::runtime::StartMode::Background,
            indicators: Default::default(),
        }));
        assert!(runtime.created().contains(&"ApplicationDesktop".to_string()));
        assert!(manager.actions().is_empty());
    }

    #[test]
    fn test_low_battery_start_shows_battery_window() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());
        manager.handle(ManagerMessage::StartAllowed {
            startup: StartupType::LowBattery,
        });
        manager.handle(ManagerMessage::initialised("ApplicationDesktop"));

        assert!(matches!(
            runtime.sent_to("ApplicationDesktop").as_slice(),
            [ApplicationMessage::SwitchApplication { window, .. }] if window == "DeadBatteryWindow"
        ));
    }

    #[test]
    fn test_system_close_enqueues_exit_action() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());
        focused(&mut manager, "ApplicationDesktop");
        runtime.clear();

        manager.handle(ManagerMessage::SystemCloseRequest {
            reason: CloseReason::Reboot,
        });

        assert!(matches!(
            runtime.sent_to("ApplicationDesktop").as_slice(),
            [ApplicationMessage::Action { action: ActionId::DisplayLogoAtExit, .. }]
        ));
    }

    #[test]
    fn test_phone_mode_change_broadcasts_to_resident_handlers() {
        let runtime = RecordingRuntime::new();
        let mut manager = manager_with(standard_launchers(), runtime.clone());
        focused(&mut manager, "ApplicationDesktop");
        runtime.clear();

        manager.handle(ManagerMessage::PhoneModeChanged {
            mode: PhoneMode::Offline,
        });

        assert_eq!(manager.status_indicators().phone_mode, PhoneMode::Offline);
        assert!(matches!(
            runtime.sent_to("ApplicationDesktop").as_slice(),
            [ApplicationMessage::Action { action: ActionId::PhoneModeChanged, .. }]
        ));

        manager.handle(ManagerMessage::ActionHandled {
            sender: "ApplicationDesktop".to_string(),
        });
        assert!(matches!(
            runtime.sent_to("ApplicationDesktop").last(),
            Some(ApplicationMessage::Action { action: ActionId::ShowPopup, .. })
        ));
    }

    #[test]
    fn test_onboarding_finalize_marks_setting() {
        let runtime = RecordingRuntime::new();
        let settings = InMemorySettings::new();
        let mut config = test_config();
        config.onboarding_application = Some("ApplicationOnboarding".to_string());
        let mut manager =
            manager_with_settings(config, standard_launchers(), runtime.clone(), settings.clone());

        manager.handle(ManagerMessage::FinalizeOnboarding);

        assert!(settings.get_bool(keys::ONBOARDING_DONE));
        assert_eq!(runtime.created(), vec!["ApplicationDesktop".to_string()]);
    }
}
