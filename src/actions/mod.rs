//! # Actions
//!
//! Cross-application action requests: identifiers, queued entries and the
//! registry that dispatches them one at a time.

pub mod action;
pub mod entry;
pub mod registry;

pub use action::{ActionFamily, ActionId};
pub use entry::{ActionEntry, ActionProcessStatus};
pub use registry::{ActionHandler, ActionsRegistry};
