//! Structured JSON logger.
//!
//! - One log line = one event
//! - `event` first, then `severity`, then fields in alphabetical order, so
//!   identical events produce identical lines
//! - Synchronous, unbuffered: the line is written with a single call

use std::fmt::Write as _;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operations
    Info,
    /// Rejected input or recoverable issues
    Warn,
    /// Operation failures
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

/// Emits one event line to stdout.
pub fn emit(severity: Severity, event: &str, fields: &[(&str, &str)]) {
    let line = render(severity, event, fields);
    let mut out = io::stdout();
    let _ = out.write_all(line.as_bytes());
}

/// Renders an event as a single JSON line, newline-terminated.
pub fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut line = String::with_capacity(128);
    line.push('{');
    push_pair(&mut line, "event", event);
    line.push(',');
    push_pair(&mut line, "severity", severity.as_str());

    let mut sorted: Vec<(&str, &str)> = fields.to_vec();
    sorted.sort_by_key(|&(key, _)| key);
    for (key, value) in sorted {
        line.push(',');
        push_pair(&mut line, key, value);
    }

    line.push('}');
    line.push('\n');
    line
}

fn push_pair(line: &mut String, key: &str, value: &str) {
    push_quoted(line, key);
    line.push(':');
    push_quoted(line, value);
}

fn push_quoted(line: &mut String, raw: &str) {
    line.push('"');
    for c in raw.chars() {
        match c {
            '"' => line.push_str("\\\""),
            '\\' => line.push_str("\\\\"),
            '\n' => line.push_str("\\n"),
            '\r' => line.push_str("\\r"),
            '\t' => line.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(line, "\\u{:04x}", c as u32);
            }
            c => line.push(c),
        }
    }
    line.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_valid_json() {
        let line = render(
            Severity::Info,
            "record_added",
            &[("id", "42"), ("store", "contacts")],
        );
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["event"], "record_added");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["id"], "42");
        assert_eq!(parsed["store"], "contacts");
    }

    #[test]
    fn field_order_is_deterministic() {
        let a = render(Severity::Warn, "e", &[("b", "2"), ("a", "1")]);
        let b = render(Severity::Warn, "e", &[("a", "1"), ("b", "2")]);
        assert_eq!(a, b);
        assert!(a.find("\"a\"").unwrap() < a.find("\"b\"").unwrap());
    }

    #[test]
    fn escapes_quotes_and_control_characters() {
        let line = render(Severity::Error, "oops", &[("detail", "a\"b\nc\u{1}")]);
        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["detail"], "a\"b\nc\u{1}");
    }

    #[test]
    fn line_ends_with_newline() {
        assert!(render(Severity::Info, "e", &[]).ends_with('\n'));
    }
}
