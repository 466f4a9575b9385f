//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{Alignment, DocumentType, Flags};

/// mdocx - Convert Markdown files into Word documents
#[derive(Parser, Debug)]
#[command(name = "mdocx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Markdown file to convert.
    /// When omitted, the interactive wizard starts instead.
    pub input: Option<PathBuf>,

    /// Output file or directory.
    /// Defaults to the input directory with a .docx extension (e.g., notes.md → notes.docx).
    /// A trailing '/' or an existing directory places <input name>.docx inside it.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Document type: "document" (default) or "report"
    #[arg(short = 't', long = "type", value_enum)]
    pub document_type: Option<DocumentType>,

    /// Insert a table of contents at the top of the document
    #[arg(long)]
    pub toc: bool,

    /// Right-to-left text direction
    #[arg(long)]
    pub rtl: bool,

    /// Paragraph alignment: LEFT, RIGHT, CENTER or JUSTIFIED
    #[arg(short, long, value_enum, ignore_case = true)]
    pub align: Option<Alignment>,

    /// JSON file with style overrides (font sizes, spacing, alignment)
    #[arg(short, long)]
    pub style: Option<PathBuf>,

    /// Open the document with the default application after converting
    #[arg(long)]
    pub open: bool,

    /// Reconvert whenever the input file changes
    #[arg(short, long)]
    pub watch: bool,

    /// Print diagnostics, including dropped style entries
    #[arg(short, long)]
    pub verbose: bool,

    /// Single-line output instead of the banner and summary table
    #[arg(long)]
    pub compact: bool,

    /// Start the interactive wizard even when an input file is given
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    /// Whether this invocation should go through the wizard
    pub fn wants_wizard(&self) -> bool {
        self.interactive || self.input.is_none()
    }

    /// Conversion flags from the command line. Switches that were not given stay `None`.
    pub fn flags(&self) -> Flags {
        Flags {
            output: self.output.clone(),
            document_type: self.document_type,
            toc: self.toc.then_some(true),
            rtl: self.rtl.then_some(true),
            align: self.align,
            style: self.style.clone(),
            open: self.open.then_some(true),
            watch: self.watch.then_some(true),
            verbose: self.verbose.then_some(true),
            compact: self.compact.then_some(true),
        }
    }
}
