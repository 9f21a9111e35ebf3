//! # System Constants
//!
//! Well-known names shared between the manager, its configuration and the
//! applications it drives.

use std::time::Duration;

/// Time after which a queued action is considered stale.
pub const DEFAULT_ACTION_TTL: Duration = Duration::from_secs(30);

pub const DEFAULT_MAILBOX_BUFFER_SIZE: usize = 256;

pub const DEFAULT_AUTO_LOCK_TIMEOUT: Duration = Duration::from_secs(30);

/// Window names understood by every application.
pub mod windows {
    pub const MAIN: &str = "MainWindow";
    pub const LOCK: &str = "PhoneLockedWindow";
    pub const DEAD_BATTERY: &str = "DeadBatteryWindow";
    pub const CHARGING_BATTERY: &str = "ChargingBatteryWindow";
}

/// Services put to sleep while the device is in power-save mode, in
/// suspend order. They are resumed in reverse order.
pub mod services {
    pub const GUI: &str = "ServiceGUI";
    pub const EINK: &str = "ServiceEink";
}

/// Keys written to and read from the settings store.
pub mod settings {
    pub const DISPLAY_LANGUAGE: &str = "display_language";
    pub const INPUT_LANGUAGE: &str = "input_language";
    pub const AUTO_LOCK_TIME_SECONDS: &str = "auto_lock_time_seconds";
    pub const ONBOARDING_DONE: &str = "onboarding_done";
}

pub mod defaults {
    pub const ROOT_APPLICATION: &str = "ApplicationDesktop";
    pub const DISPLAY_LANGUAGE: &str = "English";
    pub const INPUT_LANGUAGE: &str = "English";
}
