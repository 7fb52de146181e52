//! The plain pattern layout.
//!
//! Used when desensitization is switched off. It understands the subset of
//! log4js-style conversion specifiers that logging configurations in this
//! family use, and rejects anything else when the layout is built.

use chrono::format::{Item, StrftimeItems};

use crate::{
    error::{Error, Result},
    event::LogEvent,
};

use super::{Layout, LayoutConfig};

/// Pattern used when a pattern layout is configured without one.
pub const DEFAULT_PATTERN: &str = "%d{yyyy-MM-dd hh:mm:ss,SSS} [%z] %-5p [%c] - %m%n";

const ISO8601: &str = "yyyy-MM-ddThh:mm:ss.SSS";

/// Widest padding a specifier may ask for.
const MAX_WIDTH: usize = 1024;

/// log4js date tokens and their `chrono` equivalents, longest first.
const DATE_TOKENS: [(&str, &str); 9] = [
    ("yyyy", "%Y"),
    ("yy", "%y"),
    ("MM", "%m"),
    ("dd", "%d"),
    ("hh", "%H"),
    ("mm", "%M"),
    ("ss", "%S"),
    ("SSS", "%3f"),
    ("O", "%z"),
];

/// Renders events through a format string, without masking.
///
/// | specifier | output |
/// |-----------|--------|
/// | `%d`, `%d{fmt}` | start time (`ISO8601`, `ABSOLUTE`, `DATE`, or `yyyy MM dd hh mm ss SSS O` tokens) |
/// | `%z` | process id |
/// | `%p` | level |
/// | `%c` | category |
/// | `%m` | payload items joined by a space |
/// | `%n` | newline |
/// | `%%` | a literal `%` |
///
/// Any specifier may carry a width (`%5p` pads on the left, `%-5p` on the right).
#[derive(Clone, Debug)]
pub struct PatternLayout {
    segments: Vec<Segment>,
}

#[derive(Clone, Debug)]
enum Segment {
    Literal(String),
    Field { field: Field, padding: Padding },
}

#[derive(Clone, Debug)]
enum Field {
    Date(Vec<Item<'static>>),
    Pid,
    Level,
    Category,
    Message,
    Newline,
}

#[derive(Clone, Copy, Debug, Default)]
struct Padding {
    width: usize,
    left_align: bool,
}

impl Padding {
    fn apply(self, text: String, out: &mut String) {
        let len = text.chars().count();
        if len >= self.width {
            out.push_str(&text);
            return;
        }
        let fill = " ".repeat(self.width - len);
        if self.left_align {
            out.push_str(&text);
            out.push_str(&fill);
        } else {
            out.push_str(&fill);
            out.push_str(&text);
        }
    }
}

impl PatternLayout {
    /// Parses `pattern`.
    pub fn new(pattern: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch != '%' {
                literal.push(ch);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }

            let mut padding = Padding::default();
            if chars.peek() == Some(&'-') {
                chars.next();
                padding.left_align = true;
            }
            while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
                chars.next();
                padding.width = padding
                    .width
                    .checked_mul(10)
                    .and_then(|width| width.checked_add(digit as usize))
                    .filter(|width| *width <= MAX_WIDTH)
                    .ok_or_else(|| invalid(format!("width exceeds {MAX_WIDTH}")))?;
            }

            let field = match chars.next() {
                Some('d') => {
                    let format = if chars.peek() == Some(&'{') {
                        chars.next();
                        let mut format = String::new();
                        loop {
                            match chars.next() {
                                Some('}') => break,
                                Some(c) => format.push(c),
                                None => return Err(invalid("unterminated %d{...}".to_string())),
                            }
                        }
                        format
                    } else {
                        "ISO8601".to_string()
                    };
                    Field::Date(date_items(&format).map_err(invalid)?)
                }
                Some('z') => Field::Pid,
                Some('p') => Field::Level,
                Some('c') => Field::Category,
                Some('m') => Field::Message,
                Some('n') => Field::Newline,
                Some(other) => return Err(invalid(format!("unsupported specifier %{other}"))),
                None => return Err(invalid("dangling %".to_string())),
            };

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field { field, padding });
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Builds the layout from `config.pattern`, or [`DEFAULT_PATTERN`] when unset.
    pub fn from_config(config: &LayoutConfig) -> Result<Self> {
        Self::new(config.pattern.as_deref().unwrap_or(DEFAULT_PATTERN))
    }
}

impl Layout for PatternLayout {
    fn format(&self, event: &LogEvent) -> String {
        let mut line = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => line.push_str(text),
                Segment::Field { field, padding } => {
                    let text = match field {
                        Field::Date(items) => {
                            event.start_time.format_with_items(items.iter()).to_string()
                        }
                        Field::Pid => event.pid.to_string(),
                        Field::Level => event.level.level_str().to_string(),
                        Field::Category => event.category_name.clone(),
                        Field::Message => event.content(),
                        Field::Newline => "\n".to_string(),
                    };
                    padding.apply(text, &mut line);
                }
            }
        }
        line
    }
}

/// Translates a log4js date format (or named format) into `chrono` items.
fn date_items(format: &str) -> std::result::Result<Vec<Item<'static>>, String> {
    let format = match format {
        "ISO8601" => ISO8601,
        "ISO8601_WITH_TZ_OFFSET" => "yyyy-MM-ddThh:mm:ss.SSSO",
        "ABSOLUTE" => "hh:mm:ss.SSS",
        "DATE" => "dd MM yyyy hh:mm:ss.SSS",
        custom => custom,
    };

    let mut strftime = String::new();
    let mut rest = format;
    'outer: while let Some(ch) = rest.chars().next() {
        for (token, spec) in DATE_TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                strftime.push_str(spec);
                rest = after;
                continue 'outer;
            }
        }
        if ch == '%' {
            strftime.push_str("%%");
        } else {
            strftime.push(ch);
        }
        rest = &rest[ch.len_utf8()..];
    }

    StrftimeItems::new(&strftime)
        .parse_to_owned()
        .map_err(|err| format!("invalid date format {format:?}: {err}"))
}
