//! Conversion pipeline: markdown file in, document file out
//!
//! Phases run strictly in order and the first failure stops the run:
//! validate → read → prepare options → convert → resolve output → persist →
//! post-actions. Post-action failures are collected as warnings and never
//! undo a completed write.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::config::{load_project_config, load_style_file, ProjectConfig};
use super::converter::{ConversionOptions, DocumentConverter};
use super::docx::DocxConverter;
use super::error::{ConversionError, PostActionError};
use super::flags::{DocumentType, Flags};
use super::output::resolve_output_path;
use super::style::{default_style_layer, merge_layers, sanitize, MergedStyle, RejectedEntry};
use super::toc::insert_toc_if_requested;

/// Current phase of a conversion, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    Reading,
    PreparingOptions,
    Converting,
    Writing,
    Done,
    Watching,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Validating => "Validating input...",
            Phase::Reading => "Reading markdown...",
            Phase::PreparingOptions => "Preparing options...",
            Phase::Converting => "Converting document...",
            Phase::Writing => "Writing output file...",
            Phase::Done => "Done",
            Phase::Watching => "Watching for changes...",
            Phase::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Opens a produced document with the platform's default handler
pub trait FileOpener {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// `FileOpener` backed by the `open` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl FileOpener for SystemOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        open::that(path)
    }
}

/// Markdown and options ready for the converter
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedConversion {
    pub markdown: String,
    pub options: ConversionOptions,
    pub custom_style: bool,
    pub rejected: Vec<RejectedEntry>,
}

/// Outcome of a successful conversion
#[derive(Debug)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bytes_written: usize,
    pub options: ConversionOptions,
    pub toc_inserted: bool,
    pub elapsed: Duration,
    /// Non-fatal post-action failures
    pub warnings: Vec<PostActionError>,
}

/// Runs conversions against one converter and one project directory
pub struct ConversionPipeline<C = DocxConverter> {
    converter: C,
    opener: Box<dyn FileOpener>,
    project_dir: PathBuf,
}

impl ConversionPipeline<DocxConverter> {
    /// Pipeline with the built-in `.docx` converter and the system opener
    pub fn with_defaults(project_dir: impl Into<PathBuf>) -> Self {
        Self::new(DocxConverter, project_dir)
    }
}

impl<C: DocumentConverter> ConversionPipeline<C> {
    pub fn new(converter: C, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            converter,
            opener: Box::new(SystemOpener),
            project_dir: project_dir.into(),
        }
    }

    /// Replace the opener used for the `open` post-action
    pub fn with_opener(mut self, opener: impl FileOpener + 'static) -> Self {
        self.opener = Box::new(opener);
        self
    }

    /// Convert `input` according to `flags`, reporting each phase to `on_status`.
    pub fn convert(
        &self,
        input: &Path,
        flags: &Flags,
        on_status: &mut dyn FnMut(Phase),
    ) -> Result<ConversionReport, ConversionError> {
        match self.run_phases(input, flags, on_status) {
            Ok(report) => {
                on_status(Phase::Done);
                Ok(report)
            }
            Err(e) => {
                on_status(Phase::Error);
                Err(e)
            }
        }
    }

    fn run_phases(
        &self,
        input: &Path,
        flags: &Flags,
        on_status: &mut dyn FnMut(Phase),
    ) -> Result<ConversionReport, ConversionError> {
        let start = Instant::now();

        on_status(Phase::Validating);
        validate_input(input)?;

        on_status(Phase::Reading);
        let markdown = std::fs::read_to_string(input).map_err(|e| ConversionError::ReadError {
            path: input.to_path_buf(),
            source: e,
        })?;
        debug!(path = %input.display(), bytes = markdown.len(), "read markdown");

        on_status(Phase::PreparingOptions);
        let prepared = self.prepare(&markdown, flags)?;
        if flags.verbose() {
            for entry in &prepared.rejected {
                warn!(key = %entry.key, value = %entry.value, reason = ?entry.reason, "dropped style entry");
            }
        }

        on_status(Phase::Converting);
        let bytes = self
            .converter
            .convert(&prepared.markdown, &prepared.options)
            .map_err(|source| ConversionError::ConversionFailed { source })?;
        debug!(bytes = bytes.len(), "converter finished");

        let desired = flags.output.as_deref();
        let desired_is_dir = desired.map(|p| p.is_dir()).unwrap_or(false);
        let output = resolve_output_path(input, desired, desired_is_dir);

        on_status(Phase::Writing);
        persist_artifact(&output, &bytes)?;
        debug!(path = %output.display(), "artifact written");

        let mut warnings = Vec::new();
        if flags.open() {
            if let Err(e) = self.opener.open(&output) {
                warnings.push(PostActionError::OpenActionFailed {
                    path: output.clone(),
                    message: e.to_string(),
                });
            }
        }

        Ok(ConversionReport {
            input: input.to_path_buf(),
            toc_inserted: prepared.markdown.len() != markdown.len(),
            output,
            bytes_written: bytes.len(),
            options: prepared.options,
            elapsed: start.elapsed(),
            warnings,
        })
    }

    /// Load config sources and build the converter input for `markdown`.
    pub fn prepare(&self, markdown: &str, flags: &Flags) -> Result<PreparedConversion, ConversionError> {
        let config = load_project_config(&self.project_dir)?.unwrap_or_default();
        let style_file = match &flags.style {
            Some(path) => load_style_file(path)?,
            None => None,
        };

        Ok(prepare_conversion(markdown, flags, &config, style_file.as_ref()))
    }
}

/// Combine the markdown, flags and loaded config sources into converter input.
pub fn prepare_conversion(
    markdown: &str,
    flags: &Flags,
    config: &ProjectConfig,
    style_file: Option<&Map<String, Value>>,
) -> PreparedConversion {
    let custom_style = config.style.is_some()
        || style_file.is_some()
        || flags.align.is_some()
        || flags.rtl();

    let (style, rejected) = assemble_style(config.style.as_ref(), style_file, flags, custom_style);

    let document_type = flags
        .document_type
        .or(config.document_type)
        .unwrap_or(DocumentType::Document);

    PreparedConversion {
        markdown: insert_toc_if_requested(markdown, flags.toc()),
        options: ConversionOptions {
            document_type,
            style,
        },
        custom_style,
        rejected,
    }
}

/// Layer defaults → config style → style file → flag overrides, then sanitize once.
fn assemble_style(
    config_style: Option<&Map<String, Value>>,
    file_style: Option<&Map<String, Value>>,
    flags: &Flags,
    custom_style: bool,
) -> (Option<MergedStyle>, Vec<RejectedEntry>) {
    let empty = Map::new();
    let defaults = if custom_style {
        default_style_layer()
    } else {
        Map::new()
    };

    let mut overrides = Map::new();
    if let Some(align) = flags.align {
        overrides.insert("paragraphAlignment".to_string(), Value::from(align.as_str()));
    }
    if flags.rtl() {
        overrides.insert("direction".to_string(), Value::from("RTL"));
    }

    let merged = merge_layers([
        &defaults,
        config_style.unwrap_or(&empty),
        file_style.unwrap_or(&empty),
        &overrides,
    ]);
    let sanitized = sanitize(&merged);

    let style = if sanitized.style.is_empty() && !custom_style {
        None
    } else {
        Some(sanitized.style)
    };
    (style, sanitized.rejected)
}

fn validate_input(input: &Path) -> Result<(), ConversionError> {
    match std::fs::metadata(input) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(ConversionError::InputNotFound {
            path: input.to_path_buf(),
        }),
    }
}

/// Write `bytes` to `path` through a temp file in the same directory.
///
/// The target only ever holds a complete artifact: if any step fails the
/// temp file is removed and `path` is left as it was.
pub fn persist_artifact(path: &Path, bytes: &[u8]) -> Result<(), ConversionError> {
    let write_error = |source: io::Error| ConversionError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // An existing artifact keeps its mode across rebuilds
    let existing = std::fs::metadata(path)
        .ok()
        .filter(|meta| meta.is_file())
        .map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".mdocx-").suffix(".tmp");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Same mode a plain create gets; the kernel applies the umask
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder.tempfile_in(dir).map_err(write_error)?;
    if let Some(permissions) = existing {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(write_error)?;
    }
    tmp.write_all(bytes).map_err(write_error)?;
    tmp.flush().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    Ok(())
}
