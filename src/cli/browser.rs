//! Markdown file browser model for the wizard's welcome step
//!
//! Holds no terminal state. The wizard feeds it keys and draws `visible()`
//! inside its own step box.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// How far PageUp/PageDown jump
pub const PAGE: usize = 10;

/// One row in the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserEntry {
    /// `..`, leading to the enclosing directory
    Parent(PathBuf),
    Dir(PathBuf),
    Markdown(PathBuf),
}

impl BrowserEntry {
    pub fn path(&self) -> &Path {
        match self {
            BrowserEntry::Parent(p) | BrowserEntry::Dir(p) | BrowserEntry::Markdown(p) => p,
        }
    }

    /// Text shown in the list; directories end in `/`
    pub fn label(&self) -> String {
        match self {
            BrowserEntry::Parent(_) => "..".to_string(),
            BrowserEntry::Dir(p) => format!("{}/", file_name(p)),
            BrowserEntry::Markdown(p) => file_name(p),
        }
    }

    pub fn is_dir(&self) -> bool {
        !matches!(self, BrowserEntry::Markdown(_))
    }

    fn rank(&self) -> u8 {
        match self {
            BrowserEntry::Parent(_) => 0,
            BrowserEntry::Dir(_) => 1,
            BrowserEntry::Markdown(_) => 2,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Directory listing plus a type-to-filter query and a cursor over the
/// entries that match it
#[derive(Debug, Clone)]
pub struct FileBrowser {
    dir: PathBuf,
    entries: Vec<BrowserEntry>,
    query: String,
    cursor: usize,
}

impl FileBrowser {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let entries = scan_directory(&dir);
        Self {
            dir,
            entries,
            query: String::new(),
            cursor: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Index into `visible()`
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Entries matching the query. `..` is only offered while no query is
    /// typed.
    pub fn visible(&self) -> Vec<&BrowserEntry> {
        if self.query.is_empty() {
            return self.entries.iter().collect();
        }
        let needle = self.query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                !matches!(e, BrowserEntry::Parent(_)) && e.label().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Move the cursor by `delta`, clamped to the visible entries
    pub fn move_cursor(&mut self, delta: isize) {
        let last = self.visible().len().saturating_sub(1);
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    pub fn jump_to_end(&mut self) {
        self.cursor = self.visible().len().saturating_sub(1);
    }

    pub fn push_query(&mut self, c: char) {
        self.query.push(c);
        self.cursor = 0;
    }

    /// Drop the last query character. With an empty query this climbs to
    /// the parent directory instead.
    pub fn backspace(&mut self) {
        if self.query.pop().is_some() {
            self.cursor = 0;
        } else if let Some(parent) = self.dir.parent().map(Path::to_path_buf) {
            self.enter(parent);
        }
    }

    /// Clear the query; false when there was nothing to clear
    pub fn clear_query(&mut self) -> bool {
        if self.query.is_empty() {
            return false;
        }
        self.query.clear();
        self.cursor = 0;
        true
    }

    /// Act on the highlighted entry: directories are entered, a markdown
    /// file is returned as the pick
    pub fn activate(&mut self) -> Option<PathBuf> {
        let target = self.visible().get(self.cursor).map(|e| (*e).clone())?;
        match target {
            BrowserEntry::Markdown(path) => Some(path),
            BrowserEntry::Parent(path) | BrowserEntry::Dir(path) => {
                self.enter(path);
                None
            }
        }
    }

    fn enter(&mut self, dir: PathBuf) {
        *self = Self::open(dir);
    }
}

/// Read `dir` into browser rows: `..`, subdirectories, then markdown files,
/// each group sorted case-insensitively. Dotfiles and unreadable entries
/// are left out.
pub fn scan_directory(dir: &Path) -> Vec<BrowserEntry> {
    let mut rows: Vec<BrowserEntry> = std::fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|e| {
            let path = e.path();
            if path.is_dir() {
                Some(BrowserEntry::Dir(path))
            } else if is_markdown_file(&path) {
                Some(BrowserEntry::Markdown(path))
            } else {
                None
            }
        })
        .collect();

    if let Some(parent) = dir.parent() {
        rows.push(BrowserEntry::Parent(parent.to_path_buf()));
    }

    rows.sort_by(|a, b| match a.rank().cmp(&b.rank()) {
        Ordering::Equal => a.label().to_lowercase().cmp(&b.label().to_lowercase()),
        other => other,
    });
    rows
}

/// `.md`, `.markdown` and `.mdown`, in any case
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ["md", "markdown", "mdown"].iter().any(|m| e.eq_ignore_ascii_case(m)))
        .unwrap_or(false)
}
