//! # Error Types
//!
//! Crate-level error handling for the application manager. Message handlers
//! never let these cross the mailbox boundary: they are logged and turned into
//! a negative response at the point where they occur.

use thiserror::Error;

use crate::config::ConfigurationError;

#[derive(Error, Debug)]
pub enum AppManagerError {
    #[error("Unknown application: {0}")]
    UnknownApplication(String),

    #[error("Duplicate application registered: {0}")]
    DuplicateApplication(String),

    #[error("Manager channel closed: {0}")]
    ChannelClosed(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppManagerError {
    pub fn unknown_application(name: impl Into<String>) -> Self {
        Self::UnknownApplication(name.into())
    }

    pub fn channel_closed(context: impl Into<String>) -> Self {
        Self::ChannelClosed(context.into())
    }
}

pub type AppManagerResult<T> = anyhow::Result<T, AppManagerError>;
