//! Gateway settings.
//!
//! Loaded from a TOML file (default `benegate.toml`) with environment
//! overrides, e.g. `BENEGATE__ACCESS__WINDOW_MONTHS=13`. Every field has a
//! default so an empty file (or no file at all) yields a working
//! configuration.

use crate::ConfigError;
use crate::feature_flags::FeatureFlags;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub access: AccessSettings,
    #[serde(default)]
    pub messages: MessageSettings,
    /// Initial feature flags; runtime toggles layer on top of these.
    #[serde(default)]
    pub feature_flags: FeatureFlags,
}

impl Settings {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any value is out of range or a
    /// message template is missing its `{name}` placeholder.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access.window_months == 0 {
            return Err(ConfigError::validation("access.window_months must be > 0"));
        }
        if !self.messages.application_inactive.contains("{name}") {
            return Err(ConfigError::validation(
                "messages.application_inactive must contain {name}",
            ));
        }
        if !self.messages.research_study_ended.contains("{name}") {
            return Err(ConfigError::validation(
                "messages.research_study_ended must contain {name}",
            ));
        }
        Ok(())
    }
}

/// Data-access window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessSettings {
    /// Grant lifetime for THIRTEEN_MONTH applications, in calendar months.
    #[serde(default = "default_window_months")]
    pub window_months: u32,
}

fn default_window_months() -> u32 {
    13
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self {
            window_months: default_window_months(),
        }
    }
}

/// Operator-facing denial message templates. `{name}` is replaced with the
/// application name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSettings {
    #[serde(default = "default_application_inactive")]
    pub application_inactive: String,
    #[serde(default = "default_research_study_ended")]
    pub research_study_ended: String,
}

fn default_application_inactive() -> String {
    "The application {name} is temporarily inactive. If you are the application owner, \
     please contact the API support team."
        .to_string()
}

fn default_research_study_ended() -> String {
    "The application {name} is a research study that has ended. If you are the application \
     owner, please contact the API support team."
        .to_string()
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            application_inactive: default_application_inactive(),
            research_study_ended: default_research_study_ended(),
        }
    }
}

impl MessageSettings {
    pub fn application_inactive_message(&self, app_name: &str) -> String {
        self.application_inactive.replace("{name}", app_name)
    }

    pub fn research_study_ended_message(&self, app_name: &str) -> String {
        self.research_study_ended.replace("{name}", app_name)
    }
}

/// Load settings from an optional TOML file plus environment overrides.
///
/// A missing file is not an error; defaults and environment variables still
/// apply. An explicit `path` that does not exist is skipped the same way.
///
/// # Errors
///
/// Returns `ConfigError::Parse` if the file or environment values cannot be
/// deserialized, and `ConfigError::Validation` if the merged settings fail
/// [`Settings::validate`].
pub fn load_settings(path: Option<&str>) -> Result<Settings, ConfigError> {
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    let mut builder = Config::builder();
    let pathbuf = PathBuf::from(path.unwrap_or("benegate.toml"));
    if pathbuf.exists() {
        builder = builder.add_source(File::from(pathbuf));
    }
    // Environment variable overrides, e.g., BENEGATE__ACCESS__WINDOW_MONTHS=13
    builder = builder.add_source(
        Environment::with_prefix("BENEGATE")
            .try_parsing(true)
            .separator("__"),
    );

    let cfg = builder
        .build()
        .map_err(|e| ConfigError::parse(format!("config build error: {e}")))?;
    let settings: Settings = cfg
        .try_deserialize()
        .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.access.window_months, 13);
        assert!(settings.messages.application_inactive.contains("{name}"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_message_rendering() {
        let settings = Settings::default();
        let rendered = settings
            .messages
            .application_inactive_message("TestApp v1");
        assert!(rendered.contains("TestApp v1"));
        assert!(!rendered.contains("{name}"));

        let rendered = settings.messages.research_study_ended_message("StudyApp");
        assert!(rendered.contains("StudyApp"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.access.window_months = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.messages.application_inactive = "inactive".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[access]
window_months = 6

[feature_flags.limit_data_access]
name = "limit_data_access"
enabled = true
type = "boolean"
"#
        )
        .unwrap();

        let settings = load_settings(file.path().to_str()).unwrap();
        assert_eq!(settings.access.window_months, 6);
        assert!(
            settings
                .feature_flags
                .is_active("limit_data_access", time::OffsetDateTime::now_utc())
        );
        // Unspecified sections keep their defaults
        assert!(settings.messages.application_inactive.contains("{name}"));
    }

    #[test]
    fn test_load_with_missing_file_uses_defaults() {
        let settings = load_settings(Some("/nonexistent/benegate.toml")).unwrap();
        assert_eq!(settings.access.window_months, 13);
    }
}
