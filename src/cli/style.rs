//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips colors when the terminal
//! does not support them.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark
pub const CHECK: &str = "✓";

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// Bold text
    fn emphasis(&self) -> String {
        format!("{}", self.bold())
    }

    /// Dimmed text
    fn muted(&self) -> String {
        format!("{}", self.dimmed())
    }

    /// Highlighted values
    fn accent(&self) -> String {
        format!("{}", self.cyan())
    }

    /// Success messages
    fn success(&self) -> String {
        format!("{}", self.green())
    }

    /// Warnings
    fn warn(&self) -> String {
        format!("{}", self.yellow())
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// List arrow
pub fn arrow() -> String {
    "→".muted()
}
