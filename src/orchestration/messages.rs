//! # Manager Message Protocol
//!
//! Inbound messages processed by the manager, the responses it returns, and
//! the outbound messages it sends to applications and subscribers.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::runtime::{BluetoothMode, PhoneMode};
use crate::actions::{ActionEntry, ActionId};
use crate::application::{ApplicationName, Payload, StartupReason};

/// Delivered to a single application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApplicationMessage {
    /// Take focus and show `window`.
    SwitchApplication {
        window: String,
        payload: Option<Payload>,
        reason: StartupReason,
    },
    /// Return to the previous window.
    SwitchBack { payload: Option<Payload> },
    LostFocus,
    Close,
    /// Rebuild all windows, e.g. after a language change.
    Rebuild,
    Action {
        action: ActionId,
        payload: Option<Payload>,
    },
}

/// Multicast to subscribers of manager notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagerNotification {
    FocusChanged { application: ApplicationName },
    ApplicationStatus { name: ApplicationName, is_running: bool },
    DisplayLanguageChanged { language: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupType {
    Regular,
    LowBattery,
    LowBatteryCharging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    RegularPowerDown,
    Reboot,
    FactoryReset,
    SystemBrownout,
    LowBattery,
}

impl CloseReason {
    /// Action shown to the user while the system goes down.
    pub fn exit_action(&self) -> ActionId {
        match self {
            Self::SystemBrownout | Self::LowBattery => ActionId::SystemBrownout,
            Self::RegularPowerDown | Self::Reboot | Self::FactoryReset => {
                ActionId::DisplayLogoAtExit
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    Active,
    SuspendToRam,
    SuspendToNvm,
}

/// An action to be routed by the manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub sender: ApplicationName,
    pub action: ActionId,
    pub payload: Option<Payload>,
    /// Required for [`ActionId::Launch`] and status broadcasts.
    pub target: Option<ApplicationName>,
    /// Keep the currently focused application resident instead of closing it.
    pub keep_focused_in_background: bool,
}

impl ActionRequest {
    pub fn new(sender: impl Into<ApplicationName>, action: ActionId) -> Self {
        Self {
            sender: sender.into(),
            action,
            payload: None,
            target: None,
            keep_focused_in_background: false,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_target(mut self, target: impl Into<ApplicationName>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn keep_focused_in_background(mut self) -> Self {
        self.keep_focused_in_background = true;
        self
    }

    pub fn into_entry(self) -> ActionEntry {
        let entry = ActionEntry::new(self.action, self.payload)
            .keeping_focused_in_background(self.keep_focused_in_background);
        match self.target {
            Some(target) => entry.with_target(target),
            None => entry,
        }
    }
}

/// Everything the manager's mailbox accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagerMessage {
    SwitchRequest {
        sender: ApplicationName,
        target: ApplicationName,
        window: Option<String>,
        payload: Option<Payload>,
    },
    SwitchBackRequest {
        sender: ApplicationName,
        payload: Option<Payload>,
    },
    SwitchConfirmation {
        sender: ApplicationName,
    },
    CloseConfirmation {
        sender: ApplicationName,
    },
    /// The closing application is flushing its last requests.
    FinalizingClose {
        sender: ApplicationName,
    },
    ApplicationInitialised {
        sender: ApplicationName,
        status: InitStatus,
        start_in_background: bool,
    },
    ActionRequest(ActionRequest),
    /// The in-flight action was handled by its target.
    ActionHandled {
        sender: ApplicationName,
    },
    /// The sender removes itself from the navigation history.
    FinishRequest {
        sender: ApplicationName,
    },
    DisplayLanguageChangeRequest {
        language: String,
    },
    InputLanguageChangeRequest {
        language: String,
    },
    GetDisplayLanguage,
    PowerSaveModeInit,
    PowerModeChanged {
        mode: PowerMode,
    },
    ApplicationStatusRequest {
        name: ApplicationName,
    },
    ApplicationCloseRequest {
        name: ApplicationName,
    },
    /// Shutdown: close every started application.
    CloseApplications,
    SystemCloseRequest {
        reason: CloseReason,
    },
    StartAllowed {
        startup: StartupType,
    },
    FinalizeOnboarding,
    PhoneModeChanged {
        mode: PhoneMode,
    },
    BluetoothModeChanged {
        mode: BluetoothMode,
    },
    AlarmClockStatusChanged {
        active: bool,
    },
    /// User input; postpones auto-lock.
    UserActivity,
    SetAutoLockTimeout {
        timeout: Duration,
    },
    GetAutoLockTimeout,
    AutoLockTimerExpired,
    LockPhone,
    UnlockPhone,
    TetheringChanged {
        enabled: bool,
    },
    WindowAutoLockChanged {
        sender: ApplicationName,
        prevents: bool,
    },
}

impl ManagerMessage {
    pub fn switch(
        sender: impl Into<ApplicationName>,
        target: impl Into<ApplicationName>,
        window: Option<&str>,
        payload: Option<Payload>,
    ) -> Self {
        Self::SwitchRequest {
            sender: sender.into(),
            target: target.into(),
            window: window.map(str::to_string),
            payload,
        }
    }

    pub fn switch_confirmation(sender: impl Into<ApplicationName>) -> Self {
        Self::SwitchConfirmation { sender: sender.into() }
    }

    pub fn close_confirmation(sender: impl Into<ApplicationName>) -> Self {
        Self::CloseConfirmation { sender: sender.into() }
    }

    pub fn initialised(sender: impl Into<ApplicationName>) -> Self {
        Self::ApplicationInitialised {
            sender: sender.into(),
            status: InitStatus::Success,
            start_in_background: false,
        }
    }

    /// Message name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SwitchRequest { .. } => "switch_request",
            Self::SwitchBackRequest { .. } => "switch_back_request",
            Self::SwitchConfirmation { .. } => "switch_confirmation",
            Self::CloseConfirmation { .. } => "close_confirmation",
            Self::FinalizingClose { .. } => "finalizing_close",
            Self::ApplicationInitialised { .. } => "application_initialised",
            Self::ActionRequest(_) => "action_request",
            Self::ActionHandled { .. } => "action_handled",
            Self::FinishRequest { .. } => "finish_request",
            Self::DisplayLanguageChangeRequest { .. } => "display_language_change_request",
            Self::InputLanguageChangeRequest { .. } => "input_language_change_request",
            Self::GetDisplayLanguage => "get_display_language",
            Self::PowerSaveModeInit => "power_save_mode_init",
            Self::PowerModeChanged { .. } => "power_mode_changed",
            Self::ApplicationStatusRequest { .. } => "application_status_request",
            Self::ApplicationCloseRequest { .. } => "application_close_request",
            Self::CloseApplications => "close_applications",
            Self::SystemCloseRequest { .. } => "system_close_request",
            Self::StartAllowed { .. } => "start_allowed",
            Self::FinalizeOnboarding => "finalize_onboarding",
            Self::PhoneModeChanged { .. } => "phone_mode_changed",
            Self::BluetoothModeChanged { .. } => "bluetooth_mode_changed",
            Self::AlarmClockStatusChanged { .. } => "alarm_clock_status_changed",
            Self::UserActivity => "user_activity",
            Self::SetAutoLockTimeout { .. } => "set_auto_lock_timeout",
            Self::GetAutoLockTimeout => "get_auto_lock_timeout",
            Self::AutoLockTimerExpired => "auto_lock_timer_expired",
            Self::LockPhone => "lock_phone",
            Self::UnlockPhone => "unlock_phone",
            Self::TetheringChanged { .. } => "tethering_changed",
            Self::WindowAutoLockChanged { .. } => "window_auto_lock_changed",
        }
    }
}

/// Reply to a processed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManagerResponse {
    Handled { success: bool },
    ApplicationStatus { name: ApplicationName, is_running: bool },
    DisplayLanguage { language: String },
    AutoLockTimeout { timeout: Duration },
}

impl ManagerResponse {
    pub fn handled(success: bool) -> Self {
        Self::Handled { success }
    }

    pub fn is_success(&self) -> bool {
        match self {
            Self::Handled { success } => *success,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_close_reason_exit_action() {
        assert_eq!(CloseReason::LowBattery.exit_action(), ActionId::SystemBrownout);
        assert_eq!(CloseReason::SystemBrownout.exit_action(), ActionId::SystemBrownout);
        assert_eq!(CloseReason::Reboot.exit_action(), ActionId::DisplayLogoAtExit);
        assert_eq!(CloseReason::FactoryReset.exit_action(), ActionId::DisplayLogoAtExit);
    }

    #[test]
    fn test_action_request_into_entry() {
        let entry = ActionRequest::new("ApplicationDesktop", ActionId::Launch)
            .with_target("ApplicationClock")
            .with_payload(json!({"alarm": 7}))
            .keep_focused_in_background()
            .into_entry();

        assert_eq!(entry.action, ActionId::Launch);
        assert!(entry.targets("ApplicationClock"));
        assert!(entry.keep_focused_in_background);
        assert_eq!(entry.payload, Some(json!({"alarm": 7})));
    }

    #[test]
    fn test_message_wire_shape() {
        let message = ManagerMessage::switch(
            "ApplicationDesktop",
            "ApplicationClock",
            Some("MainWindow"),
            None,
        );
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["type"], "switch_request");
        assert_eq!(value["target"], "ApplicationClock");
        assert_eq!(message.kind(), "switch_request");

        let back: ManagerMessage = serde_json::from_value(value).unwrap();
        assert_eq!(back, message);
    }

    #[test]
    fn test_response_success() {
        assert!(ManagerResponse::handled(true).is_success());
        assert!(!ManagerResponse::handled(false).is_success());
        assert!(ManagerResponse::DisplayLanguage {
            language: "Polski".to_string()
        }
        .is_success());
    }
}
