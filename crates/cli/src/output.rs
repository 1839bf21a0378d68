//! CLI output formatting utilities.
//!
//! Colored, symbol-prefixed status lines for user-facing output. Script
//! and engine diagnostics go through `tracing`; these helpers are for
//! the command layer's own messages.

use owo_colors::{OwoColorize, Stream};

pub mod symbols {
    pub const SUCCESS: &str = "✓";
    pub const WARNING: &str = "⚠";
    pub const INFO: &str = "•";
}

pub fn print_success(message: &str) {
    println!(
        "{} {}",
        symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
        message
    );
}

pub fn print_info(message: &str) {
    println!(
        "{} {}",
        symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
        message
    );
}

pub fn print_warning(message: &str) {
    eprintln!(
        "{} {}",
        symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
        message.if_supports_color(Stream::Stderr, |s| s.yellow())
    );
}
