//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use reservation_lib::Lifecycle;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color days left before expiry
pub fn color_time_left(days: i64) -> String {
    let formatted = days.to_string();
    if days < 30 {
        formatted.red().to_string()
    } else if days < 90 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}

/// Color derived lifecycle
pub fn color_lifecycle(lifecycle: Lifecycle) -> String {
    match lifecycle {
        Lifecycle::Active => "active".green().to_string(),
        Lifecycle::Retired => "retired".dimmed().to_string(),
    }
}

/// Format an optional value, falling back to a dash
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
