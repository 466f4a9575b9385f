//! Output path resolution for converted documents

use std::path::{Path, PathBuf};

/// Extension of every produced artifact
pub const DOCUMENT_EXTENSION: &str = "docx";

/// Compute where the artifact for `input` should be written.
///
/// * No desired output: next to the input, same stem, `.docx` extension.
/// * Desired output ends with a separator, or the caller found it to be an
///   existing directory: `<desired>/<stem>.docx`.
/// * Anything else is used verbatim. Parent directories are not created.
///
/// The filesystem check for `desired_is_existing_dir` is left to the caller.
pub fn resolve_output_path(
    input: &Path,
    desired: Option<&Path>,
    desired_is_existing_dir: bool,
) -> PathBuf {
    let file_name = artifact_file_name(input);

    match desired {
        None => {
            let parent = input.parent().unwrap_or_else(|| Path::new(""));
            parent.join(file_name)
        }
        Some(dir) if desired_is_existing_dir || has_trailing_separator(dir) => {
            dir.join(file_name)
        }
        Some(path) => path.to_path_buf(),
    }
}

/// `<stem>.docx` for the given input path
fn artifact_file_name(input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!("{}.{}", stem, DOCUMENT_EXTENSION)
}

/// Whether the path was written as a directory reference (`build/`)
pub fn has_trailing_separator(path: &Path) -> bool {
    let raw = path.as_os_str().to_string_lossy();
    raw.ends_with('/') || raw.ends_with(std::path::MAIN_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_separator_detection() {
        assert!(has_trailing_separator(Path::new("build/")));
        assert!(!has_trailing_separator(Path::new("build")));
        assert!(!has_trailing_separator(Path::new("out/final.docx")));
    }

    #[test]
    fn test_input_without_extension() {
        let out = resolve_output_path(Path::new("notes/README"), None, false);
        assert_eq!(out, PathBuf::from("notes/README.docx"));
    }

    #[test]
    fn test_bare_file_name_stays_relative() {
        let out = resolve_output_path(Path::new("doc.md"), None, false);
        assert_eq!(out, PathBuf::from("doc.docx"));
    }
}
