//! Number and time formatting for the HTML dashboard.

use time::UtcDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const SCALES: [(f64, &str); 3] = [(1_000_000_000.0, "B"), (1_000_000.0, "M"), (1_000.0, "K")];

/// Compact count: one decimal and a `K`/`M`/`B` suffix from a thousand up,
/// the plain integer below that.
pub fn compact(n: u64) -> String {
    let value = n as f64;
    SCALES
        .iter()
        .find(|(scale, _)| value >= *scale)
        .map(|(scale, suffix)| format!("{:.1}{suffix}", value / scale))
        .unwrap_or_else(|| n.to_string())
}

/// A ratio as a percentage with two decimals.
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// `"3.5h ago"`, or `"just now"` within the first six minutes.
pub fn hours_ago(hours: f64) -> String {
    if hours < 0.1 { "just now".to_string() } else { format!("{hours:.1}h ago") }
}

const TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day] [hour]:[minute] UTC");

/// Human timestamp for page headings, e.g. `2025-06-01 12:00 UTC`.
pub fn timestamp(at: UtcDateTime) -> String {
    // Every component exists on a UtcDateTime, so formatting can't fail.
    at.format(TIMESTAMP).unwrap_or_default()
}

/// Custom [`upon`] formatters for templates.
pub(crate) mod addons {
    use std::fmt::Write;

    use upon::{Engine, Value, fmt as upon_fmt};

    fn compact_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::Integer(n) if *n >= 0 => f.write_str(&super::compact(n.unsigned_abs()))?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    fn percent_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::Float(ratio) => f.write_str(&super::percent(*ratio))?,
            Value::Integer(ratio) => f.write_str(&super::percent(*ratio as f64))?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.set_default_formatter(&upon_fmt::escape_html);
        engine.add_formatter("compact", compact_formatter);
        engine.add_formatter("percent", percent_formatter);
    }
}
