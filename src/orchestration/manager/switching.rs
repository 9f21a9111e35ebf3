//! Switch, switch-back and the confirmations that complete them.

use tracing::{debug, error, info, warn};

use super::{ApplicationManager, ManagerCore};
use crate::application::{
    ApplicationHandle, ApplicationName, ApplicationState, Payload, StartupReason,
};
use crate::constants::windows;
use crate::logging::log_switch_operation;
use crate::orchestration::messages::{ApplicationMessage, ManagerNotification};
use crate::orchestration::state::OrchestratorState;
use crate::stack::StackEntry;

/// What a switch attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SwitchOutcome {
    /// Unknown target; nothing changed.
    Rejected,
    /// Nothing held focus, the target was started straight away.
    StartedDirectly,
    /// The target already held focus and only changed window.
    WindowSwitched,
    /// The focused application was asked to close or lose focus.
    Negotiating,
}

impl ManagerCore {
    /// First application on the stack that is in the foreground.
    pub(super) fn focused_application(&self) -> Option<&ApplicationHandle> {
        self.stack
            .iter()
            .filter_map(|entry| self.applications.find_by_name(&entry.app_name))
            .find(|app| app.state() == ApplicationState::ActiveForeground)
    }

    pub(super) fn focused_name(&self) -> Option<ApplicationName> {
        self.focused_application().map(|app| app.name().to_string())
    }

    /// The stack top, while it has not yet taken focus.
    pub(super) fn launching_name(&self) -> Option<ApplicationName> {
        let front = self.stack.front()?;
        let app = self.applications.find_by_name(&front.app_name)?;
        (app.state() != ApplicationState::ActiveForeground).then(|| app.name().to_string())
    }

    fn previous_name(&self) -> Option<ApplicationName> {
        self.stack.get(1).map(|entry| entry.app_name.clone())
    }

    pub(super) fn is_application_closeable(&self, name: &str) -> bool {
        self.applications
            .find_by_name(name)
            .map(|app| self.stack.is_application_closeable(app))
            .unwrap_or(false)
    }

    pub(super) fn handle_switch_request(
        &mut self,
        sender: &str,
        target: &str,
        window: Option<String>,
        payload: Option<Payload>,
    ) -> bool {
        if !self.state.is_running() {
            warn!(
                sender = %sender,
                target = %target,
                state = %self.state,
                "Switch request rejected while a switch is in progress"
            );
            return false;
        }

        let window = window.unwrap_or_else(|| windows::MAIN.to_string());
        self.switch_application(target, window, payload, true) != SwitchOutcome::Rejected
    }

    /// Core of the switch protocol, shared by switch requests and actions.
    ///
    /// `close_focused` records whether the currently focused application may
    /// be closed, or must merely lose focus.
    pub(super) fn switch_application(
        &mut self,
        target: &str,
        window: String,
        payload: Option<Payload>,
        close_focused: bool,
    ) -> SwitchOutcome {
        if !self.applications.contains(target) {
            error!(target = %target, "Failed to switch to application: No such application.");
            return SwitchOutcome::Rejected;
        }

        let Some(focused) = self.focused_name() else {
            info!(
                target = %target,
                "No focused application at the moment. Starting new application..."
            );
            self.push_target(target, window, payload);
            self.start_application(target);
            return SwitchOutcome::StartedDirectly;
        };

        log_switch_operation(
            "switch",
            target,
            Some(&window),
            &self.state.to_string(),
            Some(&format!("from {focused}")),
        );

        if focused == target {
            if let Some(app) = self.application_mut(target) {
                app.pending_window = window.clone();
            }
            self.runtime.send(
                target,
                ApplicationMessage::SwitchApplication {
                    window,
                    payload,
                    reason: StartupReason::Launch,
                },
            );
            return SwitchOutcome::WindowSwitched;
        }

        if let Some(front) = self.stack.front_mut() {
            front.is_closeable = close_focused;
        }
        self.push_target(target, window, payload);
        self.request_application_close(&focused);
        SwitchOutcome::Negotiating
    }

    fn push_target(&mut self, target: &str, window: String, payload: Option<Payload>) {
        let starting_on_top = self.launching_name().as_deref() == Some(target)
            && self
                .applications
                .find_by_name(target)
                .is_some_and(|app| app.is_starting());
        if starting_on_top {
            debug!(target = %target, "Application is already starting on top of the stack");
        } else {
            if target == self.config.root_application {
                self.stack.clear();
            }
            self.stack.push(StackEntry::new(target));
        }
        if let Some(app) = self.application_mut(target) {
            app.pending_payload = payload;
            app.pending_window = window;
        }
    }

    fn request_application_close(&mut self, name: &str) {
        if self.is_application_closeable(name) {
            info!(application = %name, "Closing application");
            self.set_state(OrchestratorState::AwaitingCloseConfirmation);
            self.runtime.send(name, ApplicationMessage::Close);
        } else {
            info!(application = %name, "Application is about to lose focus.");
            self.set_state(OrchestratorState::AwaitingLostFocusConfirmation);
            self.runtime.send(name, ApplicationMessage::LostFocus);
        }
    }

    /// Bring `name` up: resident applications are switched to, others are
    /// created. Returns false if nothing was done.
    pub(super) fn start_application(&mut self, name: &str) -> bool {
        let indicators = self.indicators;
        let Some(app) = self.applications.find_by_name_mut(name) else {
            warn!(application = %name, "Cannot start unknown application");
            return false;
        };

        match app.state() {
            ApplicationState::ActiveBackground | ApplicationState::ActiveForeground => {
                info!(
                    application = %name,
                    window = %app.pending_window,
                    "Switching focus to application"
                );
                let message = ApplicationMessage::SwitchApplication {
                    window: app.pending_window.clone(),
                    payload: app.take_pending_payload(),
                    reason: app.startup_reason,
                };
                self.runtime.send(name, message);
                self.set_state(OrchestratorState::AwaitingFocusConfirmation);
                true
            }
            state if state.is_starting() => {
                info!(application = %name, "Application is starting already...");
                false
            }
            _ => {
                info!(application = %name, "Starting application");
                app.run(self.runtime.as_mut(), &indicators)
            }
        }
    }

    /// Start the launching application and wait for it to take focus, or go
    /// back to idle if it could not be started.
    fn start_launching(&mut self, name: &str) {
        self.start_application(name);
        let pending = self
            .applications
            .find_by_name(name)
            .map(|app| app.started())
            .unwrap_or(false);
        if pending {
            self.set_state(OrchestratorState::AwaitingFocusConfirmation);
        } else {
            self.set_state(OrchestratorState::Running);
        }
    }

    pub(super) fn handle_switch_back(&mut self, sender: &str, payload: Option<Payload>) -> bool {
        if !self.state.is_running() {
            warn!(
                sender = %sender,
                state = %self.state,
                "Switch back rejected while a switch is in progress"
            );
            return false;
        }

        let Some(previous) = self.previous_name() else {
            warn!("Failed to switch to the previous application: No such application.");
            return false;
        };

        let Some(focused) = self.focused_name() else {
            info!(
                previous = %previous,
                "No focused application at the moment. Starting previous application..."
            );
            self.switch_to_previous(&previous, payload);
            self.start_application(&previous);
            return true;
        };

        log_switch_operation(
            "switch_back",
            &previous,
            None,
            &self.state.to_string(),
            Some(&format!("from {focused}")),
        );

        if previous == focused {
            self.stack.pop();
            self.runtime
                .send(&focused, ApplicationMessage::SwitchBack { payload });
            return true;
        }

        self.switch_to_previous(&previous, payload);
        self.request_application_close(&focused);
        true
    }

    fn switch_to_previous(&mut self, previous: &str, payload: Option<Payload>) {
        self.stack.pop();
        if let Some(app) = self.application_mut(previous) {
            app.pending_payload = payload;
        }
    }

    /// Focus confirmation from the stack top.
    pub(super) fn confirm_focus(&mut self, sender: &str) -> bool {
        if self.stack.front().map(|entry| entry.app_name.as_str()) != Some(sender) {
            warn!(
                sender = %sender,
                state = %self.state,
                "Ignoring switch confirmation from an application that is not being switched to"
            );
            return false;
        }

        for other in self.applications.iter_mut() {
            if other.name() != sender && other.state() == ApplicationState::ActiveForeground {
                other.set_state(ApplicationState::ActiveBackground);
            }
        }
        if let Some(app) = self.application_mut(sender) {
            app.set_state(ApplicationState::ActiveForeground);
            app.block_closing = false;
        }

        self.set_state(OrchestratorState::Running);
        self.runtime.publish(ManagerNotification::FocusChanged {
            application: sender.to_string(),
        });
        log_switch_operation("focus", sender, None, &self.state.to_string(), None);
        true
    }

    /// The previously focused application moved to the background.
    pub(super) fn confirm_lost_focus(&mut self, sender: &str) -> bool {
        let Some(launching) = self.launching_name() else {
            debug!(sender = %sender, "Lost focus confirmed but no application is launching");
            return false;
        };

        info!(
            sender = %sender,
            launching = %launching,
            "Lost focus confirmed. Starting launching application."
        );
        if let Some(app) = self.application_mut(sender) {
            app.set_state(ApplicationState::ActiveBackground);
            app.pending_window.clear();
        }
        self.start_launching(&launching);
        true
    }

    pub(super) fn handle_close_confirmation(&mut self, sender: &str) -> bool {
        let Some(app) = self.applications.find_by_name(sender) else {
            error!(sender = %sender, "Failed to handle close confirmation: No such application.");
            return false;
        };
        if !app.started() {
            debug!(
                sender = %sender,
                "Ignoring close confirmation from an application that is not running"
            );
            return false;
        }

        if self.is_application_closeable(sender) {
            self.close_application(sender);
        } else if let Some(app) = self.application_mut(sender) {
            app.set_state(ApplicationState::ActiveBackground);
        }

        if self.state == OrchestratorState::AwaitingCloseConfirmation {
            match self.launching_name() {
                Some(launching) => self.start_launching(&launching),
                None => self.set_state(OrchestratorState::Running),
            }
        }
        true
    }

    /// The closing application is flushing its last requests; the launching
    /// application can start in parallel.
    pub(super) fn handle_finalizing_close(&mut self, sender: &str) -> bool {
        if !self.applications.contains(sender) {
            error!(sender = %sender, "Finalizing close from unknown application");
            return false;
        }
        debug!(sender = %sender, "Waiting to close application - finalizing requests");

        if self.state == OrchestratorState::AwaitingCloseConfirmation {
            if let Some(launching) = self.launching_name() {
                self.start_application(&launching);
            }
        }
        true
    }
}

impl ApplicationManager {
    pub(super) fn handle_switch_confirmation(&mut self, sender: &str) -> bool {
        let Some(app) = self.core.applications.find_by_name(sender) else {
            error!(sender = %sender, "Failed to switch to application. No such application.");
            return false;
        };
        info!(sender = %sender, app_state = %app.state(), "Switch confirmed");

        match self.core.state {
            OrchestratorState::Running | OrchestratorState::AwaitingFocusConfirmation => {
                if !self.core.confirm_focus(sender) {
                    return false;
                }
                self.on_launch_finished(sender);
                true
            }
            OrchestratorState::AwaitingLostFocusConfirmation => {
                self.core.confirm_lost_focus(sender)
            }
            OrchestratorState::AwaitingCloseConfirmation => {
                debug!(
                    sender = %sender,
                    "Ignoring switch confirmation while awaiting close confirmation"
                );
                false
            }
        }
    }
}
