//! Logging configuration and the desensitization switch.
//!
//! Output targets (files with size-based rotation, the console) belong to the
//! host framework; their settings are carried here so a whole configuration
//! document can be read in one place. Only the `layout` of each appender is
//! consumed by this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    layout::{LayoutConfig, DEFAULT_PATTERN, DESENSITIZATION_LAYOUT, PATTERN_LAYOUT},
};

/// Environment variable that switches desensitization on at startup.
pub const DESENSITIZATION_FLAG_ENV: &str = "desensitizationFlag";

/// Whether output targets use the desensitizing layout or the plain pattern layout.
///
/// Read once at startup and passed to whatever builds the logging setup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DesensitizationSwitch {
    enabled: bool,
}

impl DesensitizationSwitch {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Reads [`DESENSITIZATION_FLAG_ENV`]; any non-empty value turns it on.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var_os(DESENSITIZATION_FLAG_ENV).as_deref())
    }

    /// Interprets a raw flag value the way [`DesensitizationSwitch::from_env`] does.
    #[must_use]
    pub fn from_flag(flag: Option<&std::ffi::OsStr>) -> Self {
        Self::new(flag.is_some_and(|value| !value.is_empty()))
    }

    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Registry name of the layout this switch selects.
    pub fn layout_type(self) -> &'static str {
        if self.enabled {
            DESENSITIZATION_LAYOUT
        } else {
            PATTERN_LAYOUT
        }
    }
}

/// One output target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppenderConfig {
    /// Target kind, e.g. `"file"` or `"console"`.
    #[serde(rename = "type")]
    pub appender_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Rotation threshold in bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_log_size: Option<u64>,
    /// Rotated files to retain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backups: Option<u32>,
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Which appenders a category writes to, and from which level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub appenders: Vec<String>,
    pub level: String,
}

/// A complete logging configuration document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub appenders: BTreeMap<String, AppenderConfig>,
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryConfig>,
}

impl LoggingConfig {
    /// Parses a JSON configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The stock setup: a rotating `info.log` file and the console, both
    /// masking `password`, with the layout chosen by `switch`.
    pub fn default_for(switch: DesensitizationSwitch) -> Self {
        let layout = LayoutConfig {
            layout_type: switch.layout_type().to_string(),
            pattern: Some(DEFAULT_PATTERN.to_string()),
            sensitive_fields: vec!["password".to_string()],
            ..LayoutConfig::default()
        };

        let mut appenders = BTreeMap::new();
        appenders.insert(
            "app".to_string(),
            AppenderConfig {
                appender_type: "file".to_string(),
                filename: Some("info.log".to_string()),
                max_log_size: Some(50_485_760),
                backups: Some(3),
                layout: layout.clone(),
            },
        );
        appenders.insert(
            "console".to_string(),
            AppenderConfig {
                appender_type: "console".to_string(),
                filename: None,
                max_log_size: None,
                backups: None,
                layout,
            },
        );

        let mut categories = BTreeMap::new();
        categories.insert(
            "default".to_string(),
            CategoryConfig {
                appenders: vec!["app".to_string(), "console".to_string()],
                level: "info".to_string(),
            },
        );

        Self {
            appenders,
            categories,
        }
    }

    /// Points every appender's layout at the one `switch` selects.
    #[must_use]
    pub fn apply_switch(mut self, switch: DesensitizationSwitch) -> Self {
        for appender in self.appenders.values_mut() {
            appender.layout.layout_type = switch.layout_type().to_string();
        }
        self
    }
}
