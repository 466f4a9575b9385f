//! Shared test utilities and fixtures
#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use mdocx::pipeline::{ConversionOptions, ConverterError, DocumentConverter, FileOpener};
use tempfile::TempDir;

/// Write `contents` to `name` inside `dir` and return the full path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Temp project directory holding `doc.md` with a heading and one paragraph
pub fn project_with_markdown() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = write_file(dir.path(), "doc.md", "# Title\n\nBody");
    (dir, input)
}

/// Names of the entries in `dir`, sorted
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// One call received by `RecordingConverter`
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterCall {
    pub markdown: String,
    pub options: ConversionOptions,
}

/// Converter that records its input and returns fixed bytes
#[derive(Clone, Default)]
pub struct RecordingConverter {
    pub calls: Arc<Mutex<Vec<ConverterCall>>>,
}

impl RecordingConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ConverterCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last(&self) -> ConverterCall {
        self.calls().last().cloned().expect("converter was never called")
    }
}

pub const FAKE_DOCUMENT: &[u8] = b"PK-fake-document";

impl DocumentConverter for RecordingConverter {
    fn convert(
        &self,
        markdown: &str,
        options: &ConversionOptions,
    ) -> Result<Vec<u8>, ConverterError> {
        self.calls.lock().unwrap().push(ConverterCall {
            markdown: markdown.to_string(),
            options: options.clone(),
        });
        Ok(FAKE_DOCUMENT.to_vec())
    }
}

/// Converter that always fails
pub struct FailingConverter;

impl DocumentConverter for FailingConverter {
    fn convert(&self, _: &str, _: &ConversionOptions) -> Result<Vec<u8>, ConverterError> {
        Err("unsupported markdown".into())
    }
}

/// Opener that records the paths it was asked to open
#[derive(Clone, Default)]
pub struct RecordingOpener {
    pub opened: Arc<Mutex<Vec<PathBuf>>>,
}

impl FileOpener for RecordingOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        self.opened.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

/// Opener that always fails
pub struct FailingOpener;

impl FileOpener for FailingOpener {
    fn open(&self, _: &Path) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Other, "no handler for .docx"))
    }
}
