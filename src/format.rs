//! Timestamp formatting for table cells.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

pub const DEFAULT_DATE_FORMAT: &str = "YYYY-MM-DD HH:mm:ss";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Render `time` with a dayjs-style `pattern`.
///
/// Supported tokens: `YYYY`, `MM`, `DD`, `HH`, `mm`, `ss`, `SSS`. Text in
/// square brackets is copied verbatim, as is anything that is not a token.
/// RFC 3339 timestamps keep their own offset. Input that does not parse is
/// returned unchanged.
pub fn format_date(time: &str, pattern: &str) -> String {
    match parse_timestamp(time) {
        Some(parsed) => render(&parsed, pattern),
        None => time.to_string(),
    }
}

fn parse_timestamp(time: &str) -> Option<NaiveDateTime> {
    let time = time.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(time) {
        return Some(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(time, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(time, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn render(dt: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        let token = ["YYYY", "SSS", "MM", "DD", "HH", "mm", "ss"]
            .into_iter()
            .find(|token| rest.starts_with(token));

        match token {
            Some(token) => {
                let value = match token {
                    "YYYY" => format!("{:04}", dt.year()),
                    "SSS" => format!("{:03}", dt.nanosecond() / 1_000_000),
                    "MM" => format!("{:02}", dt.month()),
                    "DD" => format!("{:02}", dt.day()),
                    "HH" => format!("{:02}", dt.hour()),
                    "mm" => format!("{:02}", dt.minute()),
                    _ => format!("{:02}", dt.second()),
                };
                out.push_str(&value);
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rfc3339_with_default_pattern() {
        assert_eq!(
            format_date("2024-03-05T07:08:09+02:00", DEFAULT_DATE_FORMAT),
            "2024-03-05 07:08:09"
        );
    }

    #[test]
    fn formats_naive_timestamps() {
        assert_eq!(
            format_date("2024-12-31 23:59:58.250", "DD/MM/YYYY HH:mm:ss.SSS"),
            "31/12/2024 23:59:58.250"
        );
        assert_eq!(format_date("2024-01-02", "YYYY.MM.DD"), "2024.01.02");
    }

    #[test]
    fn bracketed_text_is_literal() {
        assert_eq!(
            format_date("2024-01-02T03:04:05Z", "[at] HH:mm [on] DD"),
            "at 03:04 on 02"
        );
    }

    #[test]
    fn unparseable_input_is_returned_as_is() {
        assert_eq!(format_date("yesterday", DEFAULT_DATE_FORMAT), "yesterday");
        assert_eq!(format_date("", DEFAULT_DATE_FORMAT), "");
    }
}
