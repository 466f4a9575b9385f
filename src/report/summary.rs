//! Conversion summary report generation

use std::path::PathBuf;
use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{ConversionReport, DocumentType};

/// What a finished conversion produced, ready for display
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub document_type: DocumentType,
    pub toc_inserted: bool,
    /// Number of style keys handed to the converter; `None` when no style was sent
    pub style_keys: Option<usize>,
    pub bytes_written: usize,
    pub elapsed: Duration,
    pub warnings: Vec<String>,
}

impl ConversionSummary {
    pub fn from_report(report: &ConversionReport) -> Self {
        Self {
            input: report.input.clone(),
            output: report.output.clone(),
            document_type: report.options.document_type,
            toc_inserted: report.toc_inserted,
            style_keys: report.options.style.as_ref().map(|s| s.len()),
            bytes_written: report.bytes_written,
            elapsed: report.elapsed,
            warnings: report.warnings.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Build the summary table
    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Input"),
            Cell::new(self.input.display()),
        ]);
        table.add_row(vec![
            Cell::new("💾 Output"),
            Cell::new(self.output.display())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("📄 Type"),
            Cell::new(self.document_type),
        ]);
        table.add_row(vec![
            Cell::new("📑 Table of Contents"),
            Cell::new(if self.toc_inserted { "Inserted" } else { "No" }),
        ]);
        table.add_row(vec![
            Cell::new("🎨 Style"),
            match self.style_keys {
                Some(n) => Cell::new(format!("{} keys", n)).fg(Color::Cyan),
                None => Cell::new("Converter defaults"),
            },
        ]);
        table.add_row(vec![
            Cell::new("📦 Size"),
            Cell::new(format_bytes(self.bytes_written)),
        ]);
        table.add_row(vec![
            Cell::new("⏱️  Elapsed"),
            Cell::new(format!("{:.2?}", self.elapsed)),
        ]);

        if !self.warnings.is_empty() {
            table.add_row(vec![
                Cell::new("⚠️  Warnings"),
                Cell::new(self.warnings.len()).fg(Color::Yellow),
            ]);
        }

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("CONVERSION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        for line in self.table().to_string().lines() {
            println!("    {}", line);
        }

        if !self.warnings.is_empty() {
            println!();
            for warning in &self.warnings {
                println!("      {} {}", style("•").yellow(), warning);
            }
        }
    }

    /// One line for `--compact` output
    pub fn compact_line(&self) -> String {
        format!(
            "{} -> {} ({}, {})",
            self.input.display(),
            self.output.display(),
            self.document_type,
            format_bytes(self.bytes_written)
        )
    }
}

fn format_bytes(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
