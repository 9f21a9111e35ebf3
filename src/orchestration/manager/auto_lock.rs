//! Inactivity timer and phone lock.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, error, info, warn};

use super::{ApplicationManager, ManagerCore};
use crate::actions::{ActionEntry, ActionId};
use crate::constants::settings as keys;

impl ManagerCore {
    fn auto_lock_armable(&self) -> bool {
        self.config.auto_lock.enabled && !self.lock.locked
    }

    pub(super) fn handle_user_activity(&mut self) -> bool {
        if !self.auto_lock_armable() {
            return false;
        }
        self.auto_lock_timer.start();
        true
    }

    pub(super) fn handle_set_auto_lock_timeout(&mut self, timeout: Duration) -> bool {
        if timeout.is_zero() {
            error!("Auto-lock timeout must be greater than zero");
            return false;
        }

        info!(timeout_seconds = timeout.as_secs(), "Auto-lock timeout changed");
        self.settings
            .set(keys::AUTO_LOCK_TIME_SECONDS, &timeout.as_secs().to_string());
        if self.auto_lock_armable() {
            self.auto_lock_timer.restart(timeout);
        } else {
            self.auto_lock_timer.set_interval(timeout);
        }
        true
    }

    pub(super) fn handle_tethering_changed(&mut self, enabled: bool) -> bool {
        debug!(enabled = enabled, "Tethering changed");
        self.lock.tethering = enabled;
        if !enabled && self.auto_lock_armable() {
            self.auto_lock_timer.start();
        }
        true
    }

    pub(super) fn handle_window_auto_lock_changed(&mut self, sender: &str, prevents: bool) -> bool {
        let Some(app) = self.application_mut(sender) else {
            warn!(sender = %sender, "Auto-lock change from unknown application");
            return false;
        };
        app.window_prevents_auto_lock = prevents;
        true
    }

    /// Whether the foreground application (if any) lets the phone lock.
    fn focused_allows_locking(&self) -> bool {
        self.focused_application()
            .map(|app| !app.prevents_auto_locking())
            .unwrap_or(false)
    }
}

impl ApplicationManager {
    pub(super) fn handle_auto_lock_expired(&mut self) -> bool {
        if self.core.lock.locked || !self.core.config.auto_lock.enabled {
            self.core.auto_lock_timer.stop();
            return false;
        }

        if !self.core.focused_allows_locking() {
            debug!("Auto-lock postponed by the focused application");
            self.core.auto_lock_timer.start();
            return false;
        }
        if self.core.lock.tethering {
            debug!("Auto-lock postponed while tethering");
            self.core.auto_lock_timer.start();
            return false;
        }

        info!("Locking phone after inactivity");
        self.handle_lock_phone()
    }

    pub(super) fn handle_lock_phone(&mut self) -> bool {
        if self.core.lock.locked {
            debug!("Phone is already locked");
            return false;
        }
        self.core.lock.locked = true;
        self.core.auto_lock_timer.stop();

        let popup = json!({ "popup": self.core.config.lock_window });
        self.enqueue_action(ActionEntry::new(ActionId::ShowPopup, Some(popup)));
        true
    }

    pub(super) fn handle_unlock_phone(&mut self) -> bool {
        if !self.core.lock.locked {
            debug!("Phone is not locked");
            return false;
        }
        info!("Phone unlocked");
        self.core.lock.locked = false;
        if self.core.config.auto_lock.enabled {
            self.core.auto_lock_timer.start();
        }

        let popup = json!({ "popup": self.core.config.lock_window });
        self.enqueue_action(ActionEntry::new(ActionId::AbortPopup, Some(popup)));
        true
    }
}
