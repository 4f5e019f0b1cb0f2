//! # veld-config
//!
//! Layered configuration loading for Veld using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VELD_*` prefix, `__` as separator)
//! 2. Project-level `.veld/config.toml`
//! 3. User-level `~/.config/veld/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `VELD_FORM__GUARD_RESUBMIT` -> `form.guard_resubmit`,
//! `VELD_FORM__REVALIDATE` -> `form.revalidate`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use veld_config::VeldConfig;
//!
//! let config = VeldConfig::load().expect("config");
//! if config.form.guard_resubmit {
//!     println!("submits are serialized");
//! }
//! ```

mod error;
mod form;

pub use error::ConfigError;
pub use form::{FormOptions, RevalidatePolicy};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct VeldConfig {
    #[serde(default)]
    pub form: FormOptions,
}

impl VeldConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.form.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".veld/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("VELD_").split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("veld").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = VeldConfig::default();
        assert_eq!(config.form, FormOptions::default());
    }

    #[test]
    fn figment_builds_without_files() {
        let config = VeldConfig::from_figment(&VeldConfig::figment()).expect("should extract defaults");
        assert_eq!(config.form.error_separator, ". ");
    }
}
