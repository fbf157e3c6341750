use crate::coverage::CoverageStatus;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::ROCKET, text.style(theme().header));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().ok));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(theme().partial));
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header));
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted).to_string()
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim), value);
}

/// Coloured status word for report tables
pub fn status_badge(status: CoverageStatus) -> String {
    let icon = match status {
        CoverageStatus::Ok => Icons::CHECK,
        CoverageStatus::Partial => Icons::PARTIAL,
        CoverageStatus::Void => Icons::VOID,
    };
    format!("{} {}", icon, status.style(theme().status(status)))
}
