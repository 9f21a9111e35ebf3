use super::{ApplicationManifest, ApplicationName};
use crate::orchestration::runtime::{ServiceRuntime, StartMode, StatusIndicators};

/// Knows how to bring up one application's underlying service.
#[derive(Debug, Clone)]
pub struct ApplicationLauncher {
    name: ApplicationName,
    manifest: ApplicationManifest,
    closeable: bool,
}

impl ApplicationLauncher {
    pub fn new(name: impl Into<ApplicationName>, manifest: ApplicationManifest) -> Self {
        Self {
            name: name.into(),
            manifest,
            closeable: true,
        }
    }

    /// Applications that must stay resident once started, e.g. calls.
    pub fn non_closeable(mut self) -> Self {
        self.closeable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manifest(&self) -> &ApplicationManifest {
        &self.manifest
    }

    pub fn is_closeable(&self) -> bool {
        self.closeable
    }

    pub fn run(
        &self,
        runtime: &mut dyn ServiceRuntime,
        mode: StartMode,
        indicators: &StatusIndicators,
    ) -> bool {
        runtime.create_application(&self.name, mode, indicators)
    }
}
