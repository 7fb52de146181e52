//! The desensitizing layout.
//!
//! Rendering runs in three steps: serialize every payload item, mask the
//! sensitive values found in the joined text, then prepend the line prefix.

use crate::{
    error::Result,
    event::LogEvent,
    mask::MaskPolicy,
    scanner::FieldScanner,
};

use super::{Layout, LayoutConfig};

/// `chrono` format of the timestamp at the start of each line.
pub const PREFIX_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Masks configured sensitive fields and renders
/// `"<YYYY-MM-DD HH:mm:ss> [<pid>] <LEVEL> [<category>] - <content>"`.
///
/// The layout is stateless between calls and can be shared across threads.
#[derive(Clone, Debug)]
pub struct DesensitizationLayout {
    scanner: FieldScanner,
    policy: MaskPolicy,
}

impl DesensitizationLayout {
    /// Builds the layout, compiling the field scanner once.
    pub fn new(config: &LayoutConfig) -> Result<Self> {
        Ok(Self {
            scanner: FieldScanner::new(&config.sensitive_fields)?,
            policy: config.mask_policy(),
        })
    }

    fn prefix(event: &LogEvent) -> String {
        format!(
            "{} [{}] {} [{}] - ",
            event.start_time.format(PREFIX_TIME_FORMAT),
            event.pid,
            event.level,
            event.category_name
        )
    }
}

impl Layout for DesensitizationLayout {
    fn format(&self, event: &LogEvent) -> String {
        let content = desensitize(&event.content(), &self.scanner, &self.policy);
        let mut line = Self::prefix(event);
        line.push_str(&content);
        line
    }
}

/// Masks every sensitive value `scanner` finds in `content`.
///
/// Each match replaces the *first* occurrence of its raw value text in the
/// progressively rewritten content, in match order. When the same text also
/// appears earlier for an unrelated reason, that earlier occurrence is the one
/// masked.
pub fn desensitize(content: &str, scanner: &FieldScanner, policy: &MaskPolicy) -> String {
    let mut output = content.to_string();
    for found in scanner.scan(content, policy) {
        output = output.replacen(found.raw_value, &found.masked_value, 1);
    }
    output
}
