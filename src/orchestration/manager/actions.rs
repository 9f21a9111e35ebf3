//! Action classification and delivery.

use tracing::{debug, error, info, warn};

use super::switching::SwitchOutcome;
use super::{ApplicationManager, ManagerCore};
use crate::actions::{ActionEntry, ActionFamily, ActionHandler, ActionId, ActionProcessStatus};
use crate::application::{ActionFlag, ApplicationName, ApplicationState, StartupReason};
use crate::constants::{settings as keys, windows};
use crate::orchestration::messages::ApplicationMessage;

impl ActionHandler for ManagerCore {
    fn handle_action(&mut self, entry: &mut ActionEntry) -> ActionProcessStatus {
        match entry.action.family() {
            ActionFamily::Navigation => self.handle_navigation_action(entry),
            ActionFamily::FocusedApplication => self.handle_focused_application_action(entry),
            ActionFamily::ActiveApplications => self.handle_active_applications_action(entry),
            ActionFamily::Custom => self.handle_custom_action(entry),
        }
    }
}

impl ManagerCore {
    /// Onboarding runs in place of the root application until it is done.
    pub(super) fn resolve_home_application(&self) -> ApplicationName {
        match &self.config.onboarding_application {
            Some(onboarding) if !self.settings.get_bool(keys::ONBOARDING_DONE) => {
                onboarding.clone()
            }
            _ => self.config.root_application.clone(),
        }
    }

    fn handle_navigation_action(&mut self, entry: &mut ActionEntry) -> ActionProcessStatus {
        if !self.state.is_running() {
            return ActionProcessStatus::Skipped;
        }

        let (target, window) = match entry.action {
            ActionId::Home => {
                let window = if self.lock.locked {
                    self.config.lock_window.clone()
                } else {
                    self.config.home_window.clone()
                };
                (self.resolve_home_application(), window)
            }
            _ => {
                let Some(target) = entry.target.clone() else {
                    error!(action = %entry.action, "Launch action without a target application");
                    return ActionProcessStatus::Dropped;
                };
                let handles = self
                    .applications
                    .find_by_name(&target)
                    .map(|app| app.handles(&entry.action))
                    .unwrap_or(false);
                if !handles {
                    error!(
                        action = %entry.action,
                        target = %target,
                        "Launch failed: no such application or it does not accept launches"
                    );
                    return ActionProcessStatus::Dropped;
                }
                if let Some(app) = self.application_mut(&target) {
                    app.startup_reason = StartupReason::Launch;
                }
                (target, windows::MAIN.to_string())
            }
        };

        entry.set_target(target.clone());
        // Only a negotiated switch ends in a focus confirmation for the target.
        match self.switch_application(&target, window, entry.payload.clone(), true) {
            SwitchOutcome::Negotiating => ActionProcessStatus::Accepted,
            SwitchOutcome::StartedDirectly
            | SwitchOutcome::WindowSwitched
            | SwitchOutcome::Rejected => ActionProcessStatus::Dropped,
        }
    }

    fn handle_focused_application_action(
        &mut self,
        entry: &mut ActionEntry,
    ) -> ActionProcessStatus {
        let Some(focused) = self.focused_name() else {
            return ActionProcessStatus::Skipped;
        };
        entry.set_target(focused.clone());
        self.deliver_action(&focused, entry);
        ActionProcessStatus::Accepted
    }

    fn handle_active_applications_action(
        &mut self,
        entry: &mut ActionEntry,
    ) -> ActionProcessStatus {
        let Some(target) = entry.target.clone() else {
            warn!(action = %entry.action, "Status action without a target application");
            return ActionProcessStatus::Dropped;
        };
        let Some(app) = self.applications.find_by_name(&target) else {
            return ActionProcessStatus::Dropped;
        };
        if !app.handles(&entry.action) {
            return ActionProcessStatus::Dropped;
        }
        if app.state().is_active() {
            self.deliver_action(&target, entry);
            return ActionProcessStatus::Accepted;
        }
        ActionProcessStatus::Skipped
    }

    fn handle_custom_action(&mut self, entry: &mut ActionEntry) -> ActionProcessStatus {
        let handlers = self.applications.find_by_action(&entry.action);
        let target = match handlers.as_slice() {
            [] => {
                error!(action = %entry.action, "No application handles the action");
                return ActionProcessStatus::Dropped;
            }
            [app] => (app.name().to_string(), app.state(), app.action_flag(&entry.action)),
            _ => {
                error!(
                    fatal = true,
                    action = %entry.action,
                    handlers = handlers.len(),
                    "More than one application handles the action"
                );
                return ActionProcessStatus::Dropped;
            }
        };
        let (target, state, flag) = target;
        entry.set_target(target.clone());

        match state {
            ApplicationState::ActiveForeground => {
                self.deliver_action(&target, entry);
                return ActionProcessStatus::Accepted;
            }
            ApplicationState::ActiveBackground
                if flag == Some(ActionFlag::AcceptWhenInBackground) =>
            {
                self.deliver_action(&target, entry);
                return ActionProcessStatus::Accepted;
            }
            _ => {}
        }

        if !self.state.is_running() {
            return ActionProcessStatus::Skipped;
        }

        if entry.keep_focused_in_background {
            if let Some(focused) = self.focused_name() {
                if let Some(app) = self.application_mut(&focused) {
                    app.block_closing = true;
                }
            }
        }

        let Some(app) = self.application_mut(&target) else {
            return ActionProcessStatus::Dropped;
        };
        app.startup_reason = StartupReason::OnAction;
        let window = if app.pending_window.is_empty() {
            windows::MAIN.to_string()
        } else {
            app.pending_window.clone()
        };
        let payload = app.take_pending_payload();

        info!(
            action = %entry.action,
            target = %target,
            "Switching to the application handling the action"
        );
        // A directly started target is picked up by a later scan, once it
        // holds focus.
        let close_focused = !entry.keep_focused_in_background;
        match self.switch_application(&target, window, payload, close_focused) {
            SwitchOutcome::Negotiating => ActionProcessStatus::Accepted,
            SwitchOutcome::StartedDirectly
            | SwitchOutcome::WindowSwitched
            | SwitchOutcome::Rejected => ActionProcessStatus::Skipped,
        }
    }

    /// The in-flight action cannot complete once its target is gone.
    pub(super) fn in_flight_target_stopped(&self, entry: &ActionEntry) -> bool {
        match &entry.target {
            Some(target) => !self
                .applications
                .find_by_name(target)
                .map(|app| app.started())
                .unwrap_or(false),
            None => false,
        }
    }

    fn deliver_action(&mut self, target: &str, entry: &mut ActionEntry) {
        debug!(action = %entry.action, target = %target, "Delivering action");
        self.runtime.send(
            target,
            ApplicationMessage::Action {
                action: entry.action.clone(),
                payload: entry.payload.take(),
            },
        );
    }
}

impl ApplicationManager {
    /// The application `name` took focus; complete whatever action brought
    /// it there.
    pub(super) fn on_launch_finished(&mut self, name: &str) {
        if let Some(app) = self.core.application_mut(name) {
            app.startup_reason = StartupReason::Launch;
        }

        let Some(entry) = self.actions.pending_action_mut() else {
            return;
        };
        if !entry.targets(name) {
            return;
        }
        if entry.action.is_navigation() {
            self.actions.finished(&mut self.core);
            return;
        }
        self.core.deliver_action(name, entry);
    }

    /// Finish an in-flight action whose target stopped before handling it.
    pub(super) fn release_stalled_action(&mut self) {
        let Some(entry) = self.actions.pending_action() else {
            return;
        };
        if self.core.in_flight_target_stopped(entry) {
            warn!(
                action = %entry.action,
                target = ?entry.target,
                "Target stopped before handling the action"
            );
            self.actions.finished(&mut self.core);
        }
    }

    pub(super) fn handle_action_handled(&mut self, sender: &str) -> bool {
        match self.actions.pending_action() {
            None => {
                warn!(sender = %sender, "Action handled while no action is in flight");
                false
            }
            Some(entry) => {
                debug!(sender = %sender, action = %entry.action, "Action handled");
                self.actions.finished(&mut self.core);
                true
            }
        }
    }
}
