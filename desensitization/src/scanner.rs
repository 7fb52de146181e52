//! Sensitive-field detection over serialized text.
//!
//! The scanner looks for `"<field>": <value>` pairs in JSON-like text. It is a
//! textual approximation: escaped quotes inside string values and nested
//! structures under a sensitive key are not understood.

use regex::Regex;

use crate::{
    error::{Error, Result},
    mask::MaskPolicy,
};

/// One occurrence of a sensitive field found in scanned text.
///
/// `raw_value` is the literal captured substring, without escape decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SensitiveFieldMatch<'t> {
    /// The field name that matched.
    pub field: &'t str,
    /// The value text as it appears in the scanned input.
    pub raw_value: &'t str,
    /// `raw_value` after masking.
    pub masked_value: String,
}

/// Finds configured sensitive fields in serialized payloads.
///
/// The search pattern is compiled once. A scanner built from an empty field
/// list has no pattern and never matches.
#[derive(Clone, Debug)]
pub struct FieldScanner {
    pattern: Option<Regex>,
}

impl FieldScanner {
    /// Builds a scanner for `fields`.
    ///
    /// Field names are escaped before they enter the pattern, so characters
    /// such as `(` or `.` match literally. Names that can never appear as an
    /// unescaped JSON key (empty, or containing `"`) are rejected.
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut alternatives = Vec::new();
        for field in fields {
            let field = field.as_ref();
            validate_field_name(field)?;
            alternatives.push(regex::escape(field));
        }
        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = format!(
            r#""({})"\s*:\s*(?:"([^"]+)"|([0-9]+))"#,
            alternatives.join("|")
        );
        let pattern = Regex::new(&source).map_err(|_| Error::InvalidFieldName {
            name: alternatives.join(","),
            reason: "field list does not compile into a search pattern",
        })?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Returns `true` when the scanner has no fields to look for.
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Scans `text` left to right and returns every match in order.
    ///
    /// Matches do not overlap. Repeated field/value pairs yield repeated
    /// entries.
    pub fn scan<'t>(&self, text: &'t str, policy: &MaskPolicy) -> Vec<SensitiveFieldMatch<'t>> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .captures_iter(text)
            .filter_map(|captures| {
                let field = captures.get(1)?.as_str();
                // Quoted and numeric captures are exclusive alternatives.
                let raw_value = captures.get(2).or_else(|| captures.get(3))?.as_str();
                Some(SensitiveFieldMatch {
                    field,
                    raw_value,
                    masked_value: policy.apply_to(raw_value),
                })
            })
            .collect()
    }
}

fn validate_field_name(field: &str) -> Result<()> {
    if field.is_empty() {
        return Err(Error::InvalidFieldName {
            name: field.to_string(),
            reason: "field names must not be empty",
        });
    }
    if field.contains('"') {
        return Err(Error::InvalidFieldName {
            name: field.to_string(),
            reason: "field names must not contain double quotes",
        });
    }
    Ok(())
}

/// Scans `text` for `fields`, masking captured values with `mask_char`.
///
/// Builds a throwaway [`FieldScanner`]; layouts keep a compiled one instead.
pub fn scan<'t, S>(
    text: &'t str,
    fields: &[S],
    mask_char: char,
) -> Result<Vec<SensitiveFieldMatch<'t>>>
where
    S: AsRef<str>,
{
    let scanner = FieldScanner::new(fields)?;
    Ok(scanner.scan(text, &MaskPolicy::default().with_mask_char(mask_char)))
}

#[cfg(test)]
mod tests {
    use super::{scan, FieldScanner, SensitiveFieldMatch};
    use crate::{mask::MaskPolicy, Error};

    #[test]
    fn finds_single_string_field() {
        let matches = scan(r#"{"password":"a123456","user":"bob"}"#, &["password"], '*').unwrap();
        assert_eq!(
            matches,
            vec![SensitiveFieldMatch {
                field: "password",
                raw_value: "a123456",
                masked_value: "a*****6".to_string(),
            }]
        );
    }

    #[test]
    fn numeric_values_are_captured() {
        let matches = scan(r#"{"pin": 123456}"#, &["pin"], '*').unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].raw_value, "123456");
        assert_eq!(matches[0].masked_value, "1****6");
    }

    #[test]
    fn whitespace_around_colon_is_allowed() {
        let matches = scan("\"token\" :\t \"abcdef\"", &["token"], '#').unwrap();
        assert_eq!(matches[0].masked_value, "a####f");
    }

    #[test]
    fn matches_keep_order_and_duplicates() {
        let text = r#"{"a":"111","b":"222"} {"a":"111"}"#;
        let matches = scan(text, &["b", "a"], '*').unwrap();
        let found: Vec<_> = matches.iter().map(|m| (m.field, m.raw_value)).collect();
        assert_eq!(found, vec![("a", "111"), ("b", "222"), ("a", "111")]);
    }

    #[test]
    fn field_names_are_case_sensitive() {
        let matches = scan(r#"{"Password":"secret"}"#, &["password"], '*').unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_and_non_scalar_values_do_not_match() {
        let text = r#"{"password":"","secret":{"x":"y"},"pin":-12,"flag":true}"#;
        let matches = scan(text, &["password", "secret", "pin", "flag"], '*').unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn empty_field_list_matches_nothing() {
        let scanner = FieldScanner::new(Vec::<String>::new()).unwrap();
        assert!(scanner.is_empty());
        assert!(scanner
            .scan(r#"{"password":"abc"}"#, &MaskPolicy::default())
            .is_empty());
    }

    #[test]
    fn special_characters_in_field_names_match_literally() {
        let text = r#"{"pass(word)":"abcd","a.b":"xyz9"}"#;
        let matches = scan(text, &["pass(word)", "a.b"], '*').unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].masked_value, "a**d");

        // The dot must not act as a wildcard.
        let matches = scan(r#"{"aXb":"xyz9"}"#, &["a.b"], '*').unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn invalid_field_names_are_rejected() {
        assert!(matches!(
            FieldScanner::new([""]),
            Err(Error::InvalidFieldName { .. })
        ));
        assert!(matches!(
            FieldScanner::new(["pass\"word"]),
            Err(Error::InvalidFieldName { .. })
        ));
    }
}
