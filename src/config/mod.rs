//! # Configuration
//!
//! Static configuration of the application manager: which application is the
//! navigation root, which ones boot in the background, the services suspended
//! in power-save mode, action expiry and auto-lock behaviour.
//!
//! Every field has a default so a missing or partial `appmgr.toml` still yields
//! a usable configuration; [`AppManagerConfig::validate`] rejects values the
//! orchestrator cannot work with.

pub mod error;
pub mod loader;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{self, defaults, services, windows};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppManagerConfig {
    /// Navigating here clears the navigation history.
    pub root_application: String,
    /// Shown instead of the root until onboarding is finalized.
    pub onboarding_application: Option<String>,
    pub home_window: String,
    pub lock_window: String,
    pub action_ttl_seconds: u64,
    pub mailbox_buffer_size: usize,
    /// Started in background mode once the system allows applications to start.
    pub background_applications: Vec<String>,
    /// Suspended in order on power-save, resumed in reverse order.
    pub dependent_services: Vec<String>,
    pub default_display_language: String,
    pub default_input_language: String,
    pub auto_lock: AutoLockConfig,
}

impl Default for AppManagerConfig {
    fn default() -> Self {
        Self {
            root_application: defaults::ROOT_APPLICATION.to_string(),
            onboarding_application: None,
            home_window: windows::MAIN.to_string(),
            lock_window: windows::LOCK.to_string(),
            action_ttl_seconds: constants::DEFAULT_ACTION_TTL.as_secs(),
            mailbox_buffer_size: constants::DEFAULT_MAILBOX_BUFFER_SIZE,
            background_applications: Vec::new(),
            dependent_services: vec![services::GUI.to_string(), services::EINK.to_string()],
            default_display_language: defaults::DISPLAY_LANGUAGE.to_string(),
            default_input_language: defaults::INPUT_LANGUAGE.to_string(),
            auto_lock: AutoLockConfig::default(),
        }
    }
}

impl AppManagerConfig {
    pub fn action_ttl(&self) -> Duration {
        Duration::from_secs(self.action_ttl_seconds)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.root_application.trim().is_empty() {
            return Err(ConfigurationError::missing_field(
                "root_application",
                "application manager configuration",
            ));
        }

        if self.action_ttl_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "action_ttl_seconds",
                "0",
                "queued actions would expire immediately",
            ));
        }

        if self.mailbox_buffer_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "mailbox_buffer_size",
                "0",
                "mailbox needs room for at least one message",
            ));
        }

        if self.home_window.trim().is_empty() {
            return Err(ConfigurationError::missing_field(
                "home_window",
                "application manager configuration",
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.background_applications {
            if !seen.insert(name.as_str()) {
                return Err(ConfigurationError::invalid_value(
                    "background_applications",
                    name.clone(),
                    "application listed more than once",
                ));
            }
        }

        self.auto_lock.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoLockConfig {
    pub enabled: bool,
    pub timeout_seconds: u64,
}

impl Default for AutoLockConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_seconds: constants::DEFAULT_AUTO_LOCK_TIMEOUT.as_secs(),
        }
    }
}

impl AutoLockConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.timeout_seconds == 0 {
            return Err(ConfigurationError::invalid_value(
                "auto_lock.timeout_seconds",
                "0",
                "auto-lock enabled with a zero timeout",
            ));
        }
        Ok(())
    }
}
