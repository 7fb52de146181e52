//! Masking rule for individual values.
//!
//! Masking is a pure string transformation. It does not look for values, pick
//! fields, or decide what is sensitive; the scanner does that.

use serde_json::Value as JsonValue;

/// Default character used to fill masked positions.
pub const DEFAULT_MASK_CHAR: char = '*';

/// Keeps boundary characters visible and masks the rest.
///
/// The policy operates on Unicode scalar values, so the masked output always
/// has the same number of characters as the input. When the visible spans
/// cover the whole value, every character is masked instead; with the default
/// spans of one character each this fully masks values of length two or less.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaskPolicy {
    /// Number of leading characters to keep visible.
    visible_prefix: usize,
    /// Number of trailing characters to keep visible.
    visible_suffix: usize,
    /// Symbol used to mask.
    mask_char: char,
}

impl Default for MaskPolicy {
    fn default() -> Self {
        Self::both(1, 1)
    }
}

impl MaskPolicy {
    /// Keeps `visible_prefix` leading and `visible_suffix` trailing characters.
    #[must_use]
    pub fn both(visible_prefix: usize, visible_suffix: usize) -> Self {
        Self {
            visible_prefix,
            visible_suffix,
            mask_char: DEFAULT_MASK_CHAR,
        }
    }

    /// Uses a specific masking character.
    #[must_use]
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// The character used to fill masked positions.
    pub fn mask_char(&self) -> char {
        self.mask_char
    }

    /// Applies the policy to a string value.
    ///
    /// Empty strings are returned as-is.
    pub fn apply_to(&self, value: &str) -> String {
        let mut chars: Vec<char> = value.chars().collect();
        let total = chars.len();

        // Short values have nothing left to hide behind the boundaries.
        if self.visible_prefix.saturating_add(self.visible_suffix) >= total {
            chars.fill(self.mask_char);
            return chars.into_iter().collect();
        }

        for ch in &mut chars[self.visible_prefix..(total - self.visible_suffix)] {
            *ch = self.mask_char;
        }
        chars.into_iter().collect()
    }
}

/// Masks a JSON value under `policy`.
///
/// Strings and numbers are masked through their text form and come back as
/// strings. Every other variant is returned unchanged: pass-through is the
/// rule for values that have no scalar text, not an error.
#[must_use]
pub fn mask_value(value: &JsonValue, policy: &MaskPolicy) -> JsonValue {
    match value {
        JsonValue::String(text) => JsonValue::String(policy.apply_to(text)),
        JsonValue::Number(number) => JsonValue::String(policy.apply_to(&number.to_string())),
        JsonValue::Null | JsonValue::Bool(_) | JsonValue::Array(_) | JsonValue::Object(_) => {
            value.clone()
        }
    }
}

/// Masks `value` keeping its first and last character, filling with `mask_char`.
#[must_use]
pub fn mask(value: &JsonValue, mask_char: char) -> JsonValue {
    mask_value(value, &MaskPolicy::default().with_mask_char(mask_char))
}
