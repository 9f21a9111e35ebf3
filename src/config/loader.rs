//! Configuration Loader
//!
//! Environment-aware configuration loading. Sources are layered, later ones
//! winning:
//!
//! 1. built-in defaults
//! 2. `appmgr.toml` in the configuration directory
//! 3. `appmgr.<environment>.toml` in the same directory
//! 4. `APPMGR__*` environment variables (`__` separates nested keys, e.g.
//!    `APPMGR__AUTO_LOCK__ENABLED=true`)

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File, FileFormat};
use tracing::{debug, info};

use super::error::{ConfigResult, ConfigurationError};
use super::AppManagerConfig;

const BASE_FILE_STEM: &str = "appmgr";
const ENV_PREFIX: &str = "APPMGR";

pub struct ConfigManager {
    config: AppManagerConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_overrides(config_dir, environment, None)
    }

    /// Same as [`Self::load_from_directory_with_env`] but reads environment
    /// overrides from `overrides` instead of the process environment when given.
    pub fn load_with_overrides(
        config_dir: Option<PathBuf>,
        environment: &str,
        overrides: Option<HashMap<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        if !config_directory.is_dir() && config_directory != Self::default_config_directory() {
            return Err(ConfigurationError::missing_directory(environment, &config_directory));
        }

        let config = Self::build_config(&config_directory, environment, overrides)?;
        config.validate()?;

        info!(
            environment = %environment,
            root_application = %config.root_application,
            auto_lock = config.auto_lock.enabled,
            background_applications = config.background_applications.len(),
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Wrap an already-built configuration, validating it first.
    pub fn from_config(
        config: AppManagerConfig,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        config.validate()?;
        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory: Self::default_config_directory(),
        }))
    }

    pub fn config(&self) -> &AppManagerConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Detect current environment from environment variables
    pub fn detect_environment() -> String {
        crate::logging::get_environment()
    }

    fn default_config_directory() -> PathBuf {
        std::env::var("APPMGR_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"))
    }

    fn build_config(
        directory: &Path,
        environment: &str,
        overrides: Option<HashMap<String, String>>,
    ) -> ConfigResult<AppManagerConfig> {
        let base = directory.join(format!("{BASE_FILE_STEM}.toml"));
        let overlay = directory.join(format!("{BASE_FILE_STEM}.{environment}.toml"));

        debug!(
            base = %base.display(),
            base_exists = base.exists(),
            overlay = %overlay.display(),
            overlay_exists = overlay.exists(),
            "Resolving configuration sources"
        );

        let mut env_source = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true);
        if let Some(map) = overrides {
            env_source = env_source.source(Some(map));
        }

        let layered = Config::builder()
            .add_source(File::from(base.as_path()).format(FileFormat::Toml).required(false))
            .add_source(File::from(overlay.as_path()).format(FileFormat::Toml).required(false))
            .add_source(env_source)
            .build()?;

        Ok(layered.try_deserialize::<AppManagerConfig>()?)
    }
}
