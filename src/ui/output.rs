//! Human-facing terminal lines. Errors and warnings go to stderr and are
//! never silenced; everything else respects `BOOKMARKS_QUIET`.

use crate::output::is_quiet;
use crate::ui::{err_theme, theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::DATABASE, text.style(theme().header.clone()));
}

pub fn status(icon: &str, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}: {}", icon, label.style(theme().dim.clone()), value);
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn summary_row(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("  {} {}", label.style(theme().dim.clone()), value);
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(err_theme().error.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(err_theme().warn.clone()));
}

/// Guidance line printed under an error, e.g. how to fix configuration
pub fn hint(text: &str) {
    eprintln!("   {}", text.style(err_theme().dim.clone()));
}
