//! Terminal styling utilities for console output

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::Flags;

// Emoji icons with fallbacks for terminals that don't support them
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static EYES: Emoji<'_, '_> = Emoji("👀 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static PAGE: Emoji<'_, '_> = Emoji("📄 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static BRUSH: Emoji<'_, '_> = Emoji("🎨 ", "");

/// Print the application banner with ASCII art
pub fn print_banner(version: &str) {
    let banner = r#"
    ███╗   ███╗██████╗  ██████╗  ██████╗██╗  ██╗
    ████╗ ████║██╔══██╗██╔═══██╗██╔════╝╚██╗██╔╝
    ██╔████╔██║██║  ██║██║   ██║██║      ╚███╔╝
    ██║╚██╔╝██║██║  ██║██║   ██║██║      ██╔██╗
    ██║ ╚═╝ ██║██████╔╝╚██████╔╝╚██████╗██╔╝ ██╗
    ╚═╝     ╚═╝╚═════╝  ╚═════╝  ╚═════╝╚═╝  ╚═╝
    "#;

    println!();
    println!("{}", style(banner).cyan().bold());
    println!(
        "    {} {}",
        style("¶").magenta().bold(),
        style("Markdown to Word, one step at a time").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, flags: &Flags) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);
    let output = flags
        .output
        .as_ref()
        .map(|p| truncate_path(p, 38))
        .unwrap_or_else(|| "next to input".to_string());
    let style_file = flags
        .style
        .as_ref()
        .map(|p| truncate_path(p, 38))
        .unwrap_or_else(|| "none".to_string());

    let mut switches = Vec::new();
    if flags.toc() {
        switches.push("toc".to_string());
    }
    if flags.rtl() {
        switches.push("rtl".to_string());
    }
    if let Some(align) = flags.align {
        switches.push(align.as_str().to_lowercase());
    }
    if flags.watch() {
        switches.push("watch".to_string());
    }
    if flags.open() {
        switches.push("open".to_string());
    }
    let switches = if switches.is_empty() {
        "none".to_string()
    } else {
        switches.join(", ")
    };

    println!("    ┌{}┐", line);
    println!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(box_width - 20)
    );
    println!("    ├{}┤", line);
    println!("    │  {} Input:  {:<39}│", FOLDER, truncate_path(input, 38));
    println!("    │  {} Output: {:<39}│", SAVE, output);
    println!("    │  {} Style:  {:<39}│", BRUSH, style_file);
    println!("    ├{}┤", line);
    println!(
        "    │  {} Type:     {:<37}│",
        PAGE,
        style(flags.document_type.unwrap_or_default()).yellow()
    );
    println!(
        "    │  {} Options:  {:<37}│",
        PAGE,
        style(truncate_string(&switches, 36)).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a non-fatal warning
pub fn print_warning(message: &str) {
    println!("    {} {}", WARN, style(message).yellow());
}

/// Print a fatal error to stderr
pub fn print_error(message: &str) {
    eprintln!("    {} {}", style("✗").red().bold(), style(message).red());
}

/// Print the final completion message
pub fn print_completion(output: &Path) {
    println!();
    println!(
        "    {} {} {}",
        ROCKET,
        style("Document written to").green().bold(),
        style(output.display()).cyan()
    );
    println!();
}

/// Print a watch-mode line prefixed with the local time
pub fn print_watch_line(message: &str) {
    println!("    {}", format_watch_line(&chrono::Local::now(), message));
}

/// Watch-mode line with an `HH:MM:SS` timestamp
pub fn format_watch_line<Tz>(now: &chrono::DateTime<Tz>, message: &str) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{} {}{}",
        style(format!("[{}]", now.format("%H:%M:%S"))).dim(),
        EYES,
        message
    )
}

// Helper functions

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - max_len + 3).collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_string_keeps_tail() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("a/very/long/path.md", 10), "...path.md");
    }

    #[test]
    fn test_truncate_string_multibyte() {
        let s = "ééééééééééé.md";
        let out = truncate_string(s, 8);
        assert!(out.starts_with("..."));
        assert_eq!(out.chars().count(), 8);
    }

    #[test]
    fn test_watch_line_has_timestamp() {
        console::set_colors_enabled(false);
        let at = chrono::Utc.with_ymd_and_hms(2024, 5, 1, 9, 3, 7).unwrap();
        let line = format_watch_line(&at, "rebuilt notes.docx");
        assert!(line.starts_with("[09:03:07]"));
        assert!(line.ends_with("rebuilt notes.docx"));
    }
}
