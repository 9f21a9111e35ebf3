//! Errors raised while loading or validating the manager configuration.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A configuration source exists but could not be parsed
    #[error("Cannot read configuration source '{source_name}': {error}")]
    UnreadableSource { source_name: String, error: String },

    #[error("Malformed configuration: {error}")]
    Malformed { error: String },

    #[error("Configuration field '{field}' is required ({context})")]
    MissingField { field: String, context: String },

    #[error("Configuration field '{field}' has invalid value '{value}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },

    /// An explicitly requested configuration directory does not exist
    #[error("Configuration directory {directory} for environment '{environment}' does not exist")]
    MissingDirectory { environment: String, directory: String },
}

impl ConfigurationError {
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub fn invalid_value(
        field: impl Into<String>,
        value: impl ToString,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            context: context.into(),
        }
    }

    pub fn missing_directory(environment: &str, directory: &Path) -> Self {
        Self::MissingDirectory {
            environment: environment.to_string(),
            directory: directory.display().to_string(),
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(error: config::ConfigError) -> Self {
        match error {
            config::ConfigError::NotFound(field) => {
                Self::missing_field(field, "not present in any source")
            }
            config::ConfigError::FileParse { uri, cause } => Self::UnreadableSource {
                source_name: uri.unwrap_or_else(|| "<unnamed>".to_string()),
                error: cause.to_string(),
            },
            other => Self::Malformed {
                error: other.to_string(),
            },
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigurationError>;
