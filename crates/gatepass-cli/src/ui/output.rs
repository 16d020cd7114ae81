//! Formatted output utilities.

use console::{Style, style};

/// Print a success message with checkmark.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an error message with X.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().bold(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("{} {}", style("⚠").yellow().bold(), msg);
}

/// Print an info message.
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a section title.
pub fn header(msg: &str) {
    println!("\n{}", style(msg).bold().underlined());
}

/// Print a key-value pair.
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).bold(), value);
}

/// Probe result display.
pub fn health_check(name: &str, status: HealthStatus, detail: Option<&str>) {
    let (icon, label, status_style) = match status {
        HealthStatus::Ok => (style("✓").green(), "OK", Style::new().green()),
        HealthStatus::Warning => (style("⚠").yellow(), "WARNING", Style::new().yellow()),
        HealthStatus::Error => (style("✗").red(), "ERROR", Style::new().red()),
    };

    print!("  {icon} {name}: {}", status_style.apply_to(label));
    if let Some(d) = detail {
        print!(" - {}", style(d).dim());
    }
    println!();
}

/// Probe status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Reachable and healthy.
    Ok,
    /// Reachable but degraded.
    Warning,
    /// Unreachable.
    Error,
}
