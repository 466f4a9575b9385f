//! Conversion flags shared by the CLI, the wizard and the pipeline

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Kind of document the converter should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Document,
    Report,
}

impl DocumentType {
    pub const ALL: [DocumentType; 2] = [DocumentType::Document, DocumentType::Report];
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Document => write!(f, "document"),
            DocumentType::Report => write!(f, "report"),
        }
    }
}

/// Paragraph alignment passed through to the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
#[value(rename_all = "UPPERCASE")]
pub enum Alignment {
    Left,
    Right,
    Center,
    Justified,
}

impl Alignment {
    pub const ALL: [Alignment; 4] = [
        Alignment::Left,
        Alignment::Right,
        Alignment::Center,
        Alignment::Justified,
    ];

    /// Style value as the converter expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "LEFT",
            Alignment::Right => "RIGHT",
            Alignment::Center => "CENTER",
            Alignment::Justified => "JUSTIFIED",
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-chosen conversion parameters for one run.
///
/// Every field is optional; `None` means "use the default", never "off".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    pub output: Option<PathBuf>,
    pub document_type: Option<DocumentType>,
    pub toc: Option<bool>,
    pub rtl: Option<bool>,
    pub align: Option<Alignment>,
    pub style: Option<PathBuf>,
    pub open: Option<bool>,
    pub watch: Option<bool>,
    pub verbose: Option<bool>,
    pub compact: Option<bool>,
}

impl Flags {
    pub fn toc(&self) -> bool {
        self.toc.unwrap_or(false)
    }

    pub fn rtl(&self) -> bool {
        self.rtl.unwrap_or(false)
    }

    pub fn open(&self) -> bool {
        self.open.unwrap_or(false)
    }

    pub fn watch(&self) -> bool {
        self.watch.unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }

    pub fn compact(&self) -> bool {
        self.compact.unwrap_or(false)
    }
}
