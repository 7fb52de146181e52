//! Layouts: turning a [`LogEvent`] into its final line.
//!
//! - **`desensitization`**: serializes payloads and masks sensitive fields.
//! - **`pattern`**: the plain format-string layout, with no masking.
//!
//! Both are built from the same [`LayoutConfig`], which is what a logging
//! configuration supplies per output target.

mod desensitization;
mod pattern;

use std::panic::{RefUnwindSafe, UnwindSafe};

use serde::{Deserialize, Serialize};

use crate::{error::Result, event::LogEvent, mask::MaskPolicy, mask::DEFAULT_MASK_CHAR};

pub use desensitization::{desensitize, DesensitizationLayout, PREFIX_TIME_FORMAT};
pub use pattern::{PatternLayout, DEFAULT_PATTERN};

/// Registry name of [`DesensitizationLayout`].
pub const DESENSITIZATION_LAYOUT: &str = "desensitization";
/// Registry name of [`PatternLayout`].
pub const PATTERN_LAYOUT: &str = "pattern";

/// A formatting strategy that converts one log event into text.
///
/// Implementations must not append a trailing newline unless their own format
/// asks for one; line termination belongs to the writer. Layouts are shared
/// across threads and must stay usable after a panic elsewhere, which is what
/// `slog` requires of a root drain.
pub trait Layout: Send + Sync + RefUnwindSafe + UnwindSafe {
    /// Renders `event`.
    fn format(&self, event: &LogEvent) -> String;
}

impl<F> Layout for F
where
    F: Fn(&LogEvent) -> String + Send + Sync + RefUnwindSafe + UnwindSafe,
{
    fn format(&self, event: &LogEvent) -> String {
        self(event)
    }
}

/// Layout options as they appear in a logging configuration.
///
/// Immutable once a layout has been built from it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Registry name of the layout to build.
    #[serde(rename = "type", default = "default_layout_type")]
    pub layout_type: String,
    /// Character used to fill masked positions.
    #[serde(default = "default_mask")]
    pub mask: char,
    /// Field names whose values are masked.
    #[serde(default)]
    pub sensitive_fields: Vec<String>,
    /// Format string for the pattern layout. Ignored by the desensitization layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Leading characters left visible in masked values.
    #[serde(default = "default_keep")]
    pub keep_prefix: usize,
    /// Trailing characters left visible in masked values.
    #[serde(default = "default_keep")]
    pub keep_suffix: usize,
}

fn default_layout_type() -> String {
    DESENSITIZATION_LAYOUT.to_string()
}

fn default_mask() -> char {
    DEFAULT_MASK_CHAR
}

fn default_keep() -> usize {
    1
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            layout_type: default_layout_type(),
            mask: default_mask(),
            sensitive_fields: Vec::new(),
            pattern: None,
            keep_prefix: default_keep(),
            keep_suffix: default_keep(),
        }
    }
}

impl LayoutConfig {
    /// A desensitization layout masking `fields` with the default mask.
    #[must_use]
    pub fn desensitization<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sensitive_fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A pattern layout using `pattern`.
    #[must_use]
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            layout_type: PATTERN_LAYOUT.to_string(),
            pattern: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask(mut self, mask: char) -> Self {
        self.mask = mask;
        self
    }

    /// The masking rule described by this configuration.
    pub fn mask_policy(&self) -> MaskPolicy {
        MaskPolicy::both(self.keep_prefix, self.keep_suffix).with_mask_char(self.mask)
    }
}

/// Builds the desensitizing render function for `config`.
///
/// Configuration problems (invalid field names) are reported here, once, so
/// the returned closure cannot fail.
pub fn make_layout(
    config: &LayoutConfig,
) -> Result<impl Fn(&LogEvent) -> String + Send + Sync + RefUnwindSafe + UnwindSafe> {
    let layout = DesensitizationLayout::new(config)?;
    Ok(move |event: &LogEvent| layout.format(event))
}
