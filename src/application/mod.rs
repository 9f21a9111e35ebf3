//! # Applications
//!
//! Static application declarations (manifests and launchers) and the runtime
//! handles the manager keeps for each of them.

pub mod handle;
pub mod launcher;
pub mod manifest;
pub mod registry;

pub use handle::{ApplicationHandle, ApplicationState, StartupReason};
pub use launcher::ApplicationLauncher;
pub use manifest::{ActionFlag, ApplicationManifest, AutoLockPolicy};
pub use registry::ApplicationsRegistry;

pub type ApplicationName = String;

/// Opaque hand-off data passed along with switches and actions.
pub type Payload = serde_json::Value;
