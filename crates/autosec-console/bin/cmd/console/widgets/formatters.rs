use autosec_console::Severity;
use ratatui::style::{Color, Modifier, Style};
use regex::Regex;
use std::sync::LazyLock;

static RE_LEADING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\[[^\]]*\]\s*)?\[(?P<tag>[A-Z]+)\]").unwrap());

pub(crate) fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color::Rgb(0xff, 0x00, 0x55),
        Severity::High | Severity::Error => Color::Rgb(0xff, 0x98, 0x00),
        Severity::Medium | Severity::Warning => Color::Rgb(0xff, 0xeb, 0x3b),
        Severity::Success => Color::Rgb(0x00, 0xff, 0x88),
        Severity::Low | Severity::Info => Color::Rgb(0x00, 0xb8, 0xff),
    }
}

/// Style for a feed line.
///
/// Entries recorded as plain info are re-classified by their leading
/// `[TAG]`; a bracketed timestamp before the tag is skipped, so
/// `[12:00:01] [CRITICAL] x` is classified by `CRITICAL`.
pub(crate) fn line_style(text: &str, severity: Severity) -> Style {
    let severity = if severity == Severity::Info {
        tag_severity(text).unwrap_or(severity)
    } else {
        severity
    };

    let style = Style::default().fg(severity_color(severity));
    if severity.is_threat() {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn tag_severity(text: &str) -> Option<Severity> {
    let tag = RE_LEADING_TAG.captures(text)?.name("tag")?;
    Some(match tag.as_str() {
        "THREAT" | "ACTION" => Severity::Critical,
        other => Severity::parse_lenient(other),
    })
}

pub(crate) fn status_color(status: &str) -> Color {
    match status {
        "Active" | "Connected" => Color::Green,
        "Disconnected" => Color::Red,
        _ => Color::DarkGray,
    }
}

pub(crate) fn truncate_message(msg: &str, max_len: usize) -> String {
    if msg.chars().count() <= max_len {
        msg.to_string()
    } else {
        let truncated: String = msg.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
