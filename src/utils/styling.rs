//! Terminal styling utilities

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

use crate::pipeline::FilterCriteria;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static FILTER: Emoji<'_, '_> = Emoji("🔎 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    let banner = r#"
     ▄▄▄        ▄▄▄▄▄ ▄▄▄▄▄ ▄      ▄▄▄▄▄ ▄    ▄  ▄▄▄▄
    █   █      █      █     █      █     █▀▄  █ █
    █▀▀▀█ ▀▀▀▀ █  ▀█▀ █▀▀▀  █      █▀▀▀  █  ▀▄█  ▀▀▀▄
    █   █       ▀▀▀▀  ▀▀▀▀▀ ▀▀▀▀▀▀ ▀▀▀▀▀ ▀    ▀ ▀▀▀▀
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {}",
        style("Eldercare survey analytics").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, criteria: &FilterCriteria, report: &Path) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!("    │ {:<53}│", style("⚙️  Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {}Input:  {:<41}│", FOLDER, truncate_path(input, 40));
    println!("    │  {}Report: {:<41}│", SAVE, truncate_path(report, 40));
    println!("    ├{}┤", line);

    let active: Vec<String> = criteria
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(dim, values)| format!("{}={}", dim.key(), values.join("|")))
        .collect();
    if active.is_empty() {
        println!("    │  {}Filters: {:<40}│", FILTER, style("none").dim());
    } else {
        for entry in active {
            println!("    │  {}Filter: {:<41}│", FILTER, truncate_string(&entry, 40));
        }
    }
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("agelens analysis complete!").green().bold()
    );
    println!();
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "      {}",
        style(format!("({:.2}s)", elapsed.as_secs_f64())).dim()
    );
}

/// Print a styled count message
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    if let Some(detail) = detail {
        println!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(detail).dim()
        );
    } else {
        println!("      Found {} {}", style(count).yellow().bold(), description);
    }
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

/// Keep the tail of `s` within `max_len` characters
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(len - max_len + 3).collect();
        format!("...{}", tail)
    }
}
