// Test Helpers Module - Shared Testing Infrastructure
//
// Test doubles and fixtures used by the unit tests inside the crate and by the
// integration tests under tests/.

pub mod fixtures;
pub mod recording_runtime;

pub use fixtures::{manager_with, manager_with_settings, standard_launchers, test_config};
pub use recording_runtime::RecordingRuntime;
