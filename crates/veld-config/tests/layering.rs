//! Integration tests for TOML and environment layering.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use veld_config::{ConfigError, RevalidatePolicy, VeldConfig};

#[test]
fn loads_form_options_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[form]
error_separator = " / "
revalidate = "exact"
guard_resubmit = true
"#,
        )?;

        let figment = Figment::from(Serialized::defaults(VeldConfig::default()))
            .merge(Toml::file("config.toml"));
        let config = VeldConfig::from_figment(&figment).expect("config loads");

        assert_eq!(config.form.error_separator, " / ");
        assert_eq!(config.form.revalidate, RevalidatePolicy::Exact);
        assert!(config.form.guard_resubmit);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".veld")?;
        jail.create_file(".veld/config.toml", "[form]\nrevalidate = \"exact\"\n")?;

        let config = VeldConfig::load().expect("config loads");
        assert_eq!(config.form.revalidate, RevalidatePolicy::Exact);
        assert!(!config.form.guard_resubmit);
        Ok(())
    });
}

#[test]
fn env_beats_toml() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[form]\nguard_resubmit = false\n")?;
        jail.set_env("VELD_FORM__GUARD_RESUBMIT", "true");

        let figment = Figment::from(Serialized::defaults(VeldConfig::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("VELD_").split("__"));
        let config = VeldConfig::from_figment(&figment).expect("config loads");

        assert!(config.form.guard_resubmit);
        Ok(())
    });
}

#[test]
fn partial_section_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("VELD_FORM__REVALIDATE", "exact");

        let config = VeldConfig::load().expect("config loads");
        assert_eq!(config.form.revalidate, RevalidatePolicy::Exact);
        assert_eq!(config.form.error_separator, ". ");
        Ok(())
    });
}

#[test]
fn empty_separator_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[form]\nerror_separator = \"\"\n")?;

        let figment = Figment::from(Serialized::defaults(VeldConfig::default()))
            .merge(Toml::file("config.toml"));
        let result = VeldConfig::from_figment(&figment);

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}

#[test]
fn unknown_policy_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.set_env("VELD_FORM__REVALIDATE", "sometimes");

        let result = VeldConfig::load();
        assert!(matches!(result, Err(ConfigError::Figment(_))));
        Ok(())
    });
}
