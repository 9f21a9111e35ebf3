use std::sync::Arc;

use super::RecordingRuntime;
use crate::actions::ActionId;
use crate::application::{ActionFlag, ApplicationLauncher, ApplicationManifest, AutoLockPolicy};
use crate::config::AppManagerConfig;
use crate::orchestration::manager::ApplicationManager;
use crate::orchestration::settings::InMemorySettings;

/// A small phone: a desktop, a few closeable applications, a resident call
/// application and a background alarm service.
pub fn standard_launchers() -> Vec<ApplicationLauncher> {
    vec![
        ApplicationLauncher::new(
            "ApplicationDesktop",
            ApplicationManifest::new([
                ActionId::Launch,
                ActionId::PhoneModeChanged,
                ActionId::BluetoothModeChanged,
                ActionId::AlarmClockStatusChanged,
                ActionId::DisplayLogoAtExit,
                ActionId::SystemBrownout,
            ]),
        ),
        ApplicationLauncher::new(
            "ApplicationClock",
            ApplicationManifest::new([ActionId::Launch, ActionId::AlarmClockStatusChanged]),
        ),
        ApplicationLauncher::new(
            "ApplicationSettings",
            ApplicationManifest::new([
                ActionId::Launch,
                ActionId::PhoneModeChanged,
                ActionId::BluetoothModeChanged,
            ]),
        ),
        ApplicationLauncher::new(
            "ApplicationMessages",
            ApplicationManifest::new([ActionId::Launch, ActionId::custom("ShowSms")]),
        ),
        ApplicationLauncher::new(
            "ApplicationCall",
            ApplicationManifest::new([ActionId::custom("IncomingCall")])
                .with_auto_lock_policy(AutoLockPolicy::PreventPermanently),
        )
        .non_closeable(),
        ApplicationLauncher::new(
            "ApplicationAlarm",
            ApplicationManifest::default()
                .with_action(ActionId::custom("AlarmRing"), ActionFlag::AcceptWhenInBackground),
        ),
        ApplicationLauncher::new("ApplicationOnboarding", ApplicationManifest::default()),
    ]
}

pub fn test_config() -> AppManagerConfig {
    AppManagerConfig {
        background_applications: vec!["ApplicationAlarm".to_string()],
        ..AppManagerConfig::default()
    }
}

pub fn manager_with(
    launchers: Vec<ApplicationLauncher>,
    runtime: RecordingRuntime,
) -> ApplicationManager {
    manager_with_settings(test_config(), launchers, runtime, InMemorySettings::new())
}

pub fn manager_with_settings(
    config: AppManagerConfig,
    launchers: Vec<ApplicationLauncher>,
    runtime: RecordingRuntime,
    settings: InMemorySettings,
) -> ApplicationManager {
    ApplicationManager::new(config, launchers, Box::new(runtime), Arc::new(settings))
        .expect("test manager configuration is valid")
}
