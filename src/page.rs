use chrono::{DateTime, Utc};

use crate::board::RepoStatus;

#[derive(Debug, Clone)]
pub struct Style {
    /// css length used as min-width of a tile
    pub min_width: String,
}

const UNITS: [(i64, &str); 5] = [
    (86400 * 30, "month"),
    (86400, "day"),
    (3600, "hour"),
    (60, "minute"),
    (1, "second"),
];

pub fn render(statuses: &[RepoStatus], style: &Style, now: DateTime<Utc>) -> String {
    let mut page = String::new();
    page.push_str("<html><head>");
    page.push_str("<style>");
    page.push_str("body { background-color: black; color: white; }");
    page.push_str("a { color: white; text-decoration: none; }");
    page.push_str(&format!(
        "div {{ margin: 5px; padding: 15px; float: left; min-width: {} }}",
        escape(&style.min_width)
    ));
    page.push_str(".success { background-color: #259225; }");
    page.push_str(".unknown { background-color: #9d9d9d; }");
    page.push_str(".failure { background-color: #eb0000; }");
    page.push_str("</style>");
    page.push_str("</head><body>");
    for status in statuses {
        page.push_str(&tile(status, now));
    }
    page.push_str("</body></html>");
    page
}

fn tile(status: &RepoStatus, now: DateTime<Utc>) -> String {
    format!(
        r#"<a href="{url}" target="_blank"><div class="{class}"><p>{name}</p><p>{since}</p><p>{time}</p></div></a>"#,
        url = escape(&status.url),
        class = escape(&status.status),
        name = escape(&status.name),
        since = time_since(&status.time, now),
        time = escape(&status.time),
    )
}

/// Human readable age of an RFC 3339 timestamp, e.g. `3 hours ago`
pub fn time_since(timestamp: &str, now: DateTime<Utc>) -> String {
    if timestamp.is_empty() {
        return String::new();
    }
    let time = match DateTime::parse_from_rfc3339(timestamp) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            log::debug!("invalid timestamp '{timestamp}': {e}");
            return String::new();
        }
    };
    // timestamps from the future count as just now
    let elapsed = (now - time).num_seconds().max(0);
    let (seconds, unit) = UNITS
        .iter()
        .copied()
        .find(|(seconds, _)| elapsed >= *seconds)
        .unwrap_or((1, "second"));
    let count = elapsed / seconds;
    let plural = if count > 1 { "s" } else { "" };
    format!("{count} {unit}{plural} ago")
}

pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
