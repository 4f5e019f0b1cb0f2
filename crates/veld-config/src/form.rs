//! Form controller options.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_error_separator() -> String {
    ". ".to_string()
}

/// How a change event decides whether to publish a new error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevalidatePolicy {
    /// Replace only when the number of invalid fields changed. Cheap, but a
    /// field whose message changed while the count stayed the same keeps
    /// showing the old message.
    #[default]
    FieldCount,
    /// Replace whenever the new map differs from the current one.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FormOptions {
    /// Separator between the messages of one field in its error label.
    #[serde(default = "default_error_separator")]
    pub error_separator: String,

    /// Error-map replacement policy while revalidating on change.
    #[serde(default)]
    pub revalidate: RevalidatePolicy,

    /// Ignore submit events while a submit is in flight.
    #[serde(default)]
    pub guard_resubmit: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            error_separator: default_error_separator(),
            revalidate: RevalidatePolicy::default(),
            guard_resubmit: false,
        }
    }
}

impl FormOptions {
    /// Options with both hardenings enabled: exact error-map comparison and
    /// at most one submit in flight.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            revalidate: RevalidatePolicy::Exact,
            guard_resubmit: true,
            ..Self::default()
        }
    }

    /// Check values figment cannot check by type alone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty error separator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.error_separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "form.error_separator".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let options = FormOptions::default();
        assert_eq!(options.error_separator, ". ");
        assert_eq!(options.revalidate, RevalidatePolicy::FieldCount);
        assert!(!options.guard_resubmit);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn strict_enables_hardenings() {
        let options = FormOptions::strict();
        assert_eq!(options.revalidate, RevalidatePolicy::Exact);
        assert!(options.guard_resubmit);
        assert_eq!(options.error_separator, ". ");
    }

    #[test]
    fn empty_separator_is_rejected() {
        let options = FormOptions {
            error_separator: String::new(),
            ..FormOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
