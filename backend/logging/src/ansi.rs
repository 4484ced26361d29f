//! ANSI color helpers used by the pretty handler and [`crate::ColorLogger`].

use crate::level::Severity;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";

/// Escape sequence for a severity.
pub fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Debug => MAGENTA,
        Severity::Info => BLUE,
        Severity::Warn => YELLOW,
        Severity::Error => RED,
    }
}

/// Whole-line accent for a logger configured at `severity`.
pub fn accent_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Debug => CYAN,
        Severity::Info => GREEN,
        Severity::Warn => YELLOW,
        Severity::Error => RED,
    }
}

/// Wrap `text` in `color` and a trailing reset.
pub fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{RESET}")
}

/// Whether the environment allows colored output (`NO_COLOR` unset).
pub fn color_allowed() -> bool {
    std::env::var_os("NO_COLOR").map_or(true, |v| v.is_empty())
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}
