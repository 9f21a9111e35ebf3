use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a cross-application request routed by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    /// Navigate to the home application.
    Home,
    /// Launch a named application.
    Launch,
    ShowPopup,
    AbortPopup,
    NotificationsChanged,
    PhoneModeChanged,
    BluetoothModeChanged,
    AlarmClockStatusChanged,
    DisplayLogoAtExit,
    SystemBrownout,
    /// Resolved through application manifests.
    Custom(String),
}

/// How the manager resolves the target of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionFamily {
    /// Resolves a target and re-enters the switch protocol.
    Navigation,
    /// Delivered to whichever application holds focus.
    FocusedApplication,
    /// Delivered to a preset target, but only while it is active.
    ActiveApplications,
    /// Resolved via manifest lookup.
    Custom,
}

impl ActionId {
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    pub fn family(&self) -> ActionFamily {
        match self {
            Self::Home | Self::Launch => ActionFamily::Navigation,
            Self::ShowPopup | Self::AbortPopup | Self::NotificationsChanged => {
                ActionFamily::FocusedApplication
            }
            Self::PhoneModeChanged | Self::BluetoothModeChanged | Self::AlarmClockStatusChanged => {
                ActionFamily::ActiveApplications
            }
            Self::DisplayLogoAtExit | Self::SystemBrownout | Self::Custom(_) => {
                ActionFamily::Custom
            }
        }
    }

    pub fn is_navigation(&self) -> bool {
        self.family() == ActionFamily::Navigation
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "home"),
            Self::Launch => write!(f, "launch"),
            Self::ShowPopup => write!(f, "show_popup"),
            Self::AbortPopup => write!(f, "abort_popup"),
            Self::NotificationsChanged => write!(f, "notifications_changed"),
            Self::PhoneModeChanged => write!(f, "phone_mode_changed"),
            Self::BluetoothModeChanged => write!(f, "bluetooth_mode_changed"),
            Self::AlarmClockStatusChanged => write!(f, "alarm_clock_status_changed"),
            Self::DisplayLogoAtExit => write!(f, "display_logo_at_exit"),
            Self::SystemBrownout => write!(f, "system_brownout"),
            Self::Custom(name) => write!(f, "custom:{name}"),
        }
    }
}

impl std::str::FromStr for ActionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Self::Home),
            "launch" => Ok(Self::Launch),
            "show_popup" => Ok(Self::ShowPopup),
            "abort_popup" => Ok(Self::AbortPopup),
            "notifications_changed" => Ok(Self::NotificationsChanged),
            "phone_mode_changed" => Ok(Self::PhoneModeChanged),
            "bluetooth_mode_changed" => Ok(Self::BluetoothModeChanged),
            "alarm_clock_status_changed" => Ok(Self::AlarmClockStatusChanged),
            "display_logo_at_exit" => Ok(Self::DisplayLogoAtExit),
            "system_brownout" => Ok(Self::SystemBrownout),
            other => match other.strip_prefix("custom:") {
                Some(name) if !name.is_empty() => Ok(Self::Custom(name.to_string())),
                _ => Err(format!("Invalid action id: {s}")),
            },
        }
    }
}
