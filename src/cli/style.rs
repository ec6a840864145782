//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when stdout is
//! not a terminal, so styles are applied unconditionally here.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

pub const CHECK: &str = "✓";
pub const CROSS: &str = "✗";
pub const ARROW: &str = "→";

/// Semantic styles for anything printable
pub trait Stylize: Display + Sized {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().bold().to_string()
    }
}

impl<T: Display> Stylize for T {}

pub fn check() -> String {
    CHECK.success()
}

pub fn cross() -> String {
    CROSS.error()
}

pub fn arrow() -> String {
    ARROW.muted()
}

pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
