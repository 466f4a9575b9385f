//! Integration tests for the conversion pipeline
//!
//! These run the real pipeline against temp directories, with a recording
//! converter standing in for the document generator.

mod common;

use std::fs;
use std::path::PathBuf;

use common::*;
use mdocx::pipeline::style::DEFAULT_NUMERIC_STYLE;
use mdocx::pipeline::{
    persist_artifact, Alignment, ConversionError, ConversionOptions, ConversionPipeline,
    DocumentType, Flags, Phase, PostActionError, Session, StyleValue, PROJECT_CONFIG_FILE,
};
use tempfile::TempDir;

fn pipeline_in(dir: &TempDir, converter: &RecordingConverter) -> ConversionPipeline<RecordingConverter> {
    ConversionPipeline::new(converter.clone(), dir.path())
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[test]
fn test_toc_report_end_to_end() {
    let (dir, input) = project_with_markdown();
    let converter = RecordingConverter::new();
    let pipeline = pipeline_in(&dir, &converter);

    let flags = Flags {
        toc: Some(true),
        document_type: Some(DocumentType::Report),
        ..Default::default()
    };

    let mut phases = Vec::new();
    let report = pipeline
        .convert(&input, &flags, &mut |p| phases.push(p))
        .expect("conversion should succeed");

    let call = converter.last();
    assert_eq!(call.markdown, "\n[TOC]\n\n# Title\n\nBody");
    assert_eq!(
        call.options,
        ConversionOptions {
            document_type: DocumentType::Report,
            style: None,
        }
    );

    assert_eq!(report.output, dir.path().join("doc.docx"));
    assert_eq!(fs::read(&report.output).unwrap(), FAKE_DOCUMENT);
    assert_eq!(report.bytes_written, FAKE_DOCUMENT.len());
    assert!(report.toc_inserted);
    assert!(report.warnings.is_empty());

    assert_eq!(
        phases,
        vec![
            Phase::Validating,
            Phase::Reading,
            Phase::PreparingOptions,
            Phase::Converting,
            Phase::Writing,
            Phase::Done,
        ]
    );
}

#[test]
fn test_plain_conversion_sends_no_style() {
    let (dir, input) = project_with_markdown();
    let converter = RecordingConverter::new();

    pipeline_in(&dir, &converter)
        .convert(&input, &Flags::default(), &mut |_| {})
        .unwrap();

    let call = converter.last();
    assert_eq!(call.markdown, "# Title\n\nBody");
    assert_eq!(call.options.document_type, DocumentType::Document);
    assert!(call.options.style.is_none());
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_missing_input_stops_before_converting() {
    let dir = TempDir::new().unwrap();
    let converter = RecordingConverter::new();
    let mut phases = Vec::new();

    let err = pipeline_in(&dir, &converter)
        .convert(&dir.path().join("nope.md"), &Flags::default(), &mut |p| {
            phases.push(p)
        })
        .unwrap_err();

    assert!(matches!(err, ConversionError::InputNotFound { .. }));
    assert_eq!(phases, vec![Phase::Validating, Phase::Error]);
    assert!(converter.calls().is_empty());
}

#[test]
fn test_directory_input_is_not_found() {
    let dir = TempDir::new().unwrap();
    let converter = RecordingConverter::new();

    let err = pipeline_in(&dir, &converter)
        .convert(dir.path(), &Flags::default(), &mut |_| {})
        .unwrap_err();

    assert!(matches!(err, ConversionError::InputNotFound { .. }));
}

#[test]
fn test_converter_failure_leaves_no_artifact() {
    let (dir, input) = project_with_markdown();
    let pipeline = ConversionPipeline::new(FailingConverter, dir.path());

    let err = pipeline
        .convert(&input, &Flags::default(), &mut |_| {})
        .unwrap_err();

    assert!(matches!(err, ConversionError::ConversionFailed { .. }));
    assert_eq!(err.phase(), "converting");
    assert_eq!(dir_entries(dir.path()), vec!["doc.md"]);
}

#[test]
fn test_malformed_project_config_is_parse_error() {
    let (dir, input) = project_with_markdown();
    write_file(dir.path(), PROJECT_CONFIG_FILE, "{ not json");
    let converter = RecordingConverter::new();

    let err = pipeline_in(&dir, &converter)
        .convert(&input, &Flags::default(), &mut |_| {})
        .unwrap_err();

    assert!(matches!(err, ConversionError::ConfigParseError { .. }));
    assert!(converter.calls().is_empty());
}

#[test]
fn test_style_file_must_be_an_object() {
    let (dir, input) = project_with_markdown();
    let style = write_file(dir.path(), "style.json", "[1, 2, 3]");
    let converter = RecordingConverter::new();

    let flags = Flags {
        style: Some(style),
        ..Default::default()
    };
    let err = pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap_err();

    match err {
        ConversionError::ConfigParseError { message, .. } => {
            assert!(message.contains("expected a JSON object"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_missing_parent_directory_is_write_error() {
    let (dir, input) = project_with_markdown();
    let converter = RecordingConverter::new();

    let flags = Flags {
        output: Some(dir.path().join("missing").join("out.docx")),
        ..Default::default()
    };
    let err = pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap_err();

    assert!(matches!(err, ConversionError::WriteError { .. }));
    assert_eq!(dir_entries(dir.path()), vec!["doc.md"]);
}

#[test]
fn test_persist_onto_directory_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("taken.docx");
    fs::create_dir(&target).unwrap();

    let err = persist_artifact(&target, b"bytes").unwrap_err();

    assert!(matches!(err, ConversionError::WriteError { .. }));
    assert!(target.is_dir());
    assert_eq!(dir_entries(dir.path()), vec!["taken.docx"]);
}

#[test]
fn test_persist_replaces_existing_file() {
    let dir = TempDir::new().unwrap();
    let target = write_file(dir.path(), "doc.docx", "old");

    persist_artifact(&target, b"new").unwrap();

    assert_eq!(fs::read(&target).unwrap(), b"new");
    assert_eq!(dir_entries(dir.path()), vec!["doc.docx"]);
}

#[cfg(unix)]
fn file_mode(path: &std::path::Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).unwrap().permissions().mode() & 0o777
}

#[cfg(unix)]
#[test]
fn test_new_artifact_gets_regular_file_mode() {
    let dir = TempDir::new().unwrap();
    let plain = dir.path().join("plain.bin");
    fs::write(&plain, b"x").unwrap();
    let target = dir.path().join("doc.docx");

    persist_artifact(&target, b"x").unwrap();

    assert_eq!(file_mode(&target), file_mode(&plain));
}

#[cfg(unix)]
#[test]
fn test_rebuild_keeps_existing_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let target = write_file(dir.path(), "doc.docx", "old");
    fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

    persist_artifact(&target, b"new").unwrap();
    persist_artifact(&target, b"newer").unwrap();

    assert_eq!(file_mode(&target), 0o640);
    assert_eq!(fs::read(&target).unwrap(), b"newer");
}

// ============================================================================
// Output placement
// ============================================================================

#[test]
fn test_output_into_existing_directory() {
    let (dir, input) = project_with_markdown();
    let build = dir.path().join("build");
    fs::create_dir(&build).unwrap();
    let converter = RecordingConverter::new();

    let flags = Flags {
        output: Some(build.clone()),
        ..Default::default()
    };
    let report = pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap();

    assert_eq!(report.output, build.join("doc.docx"));
    assert!(report.output.is_file());
}

#[test]
fn test_explicit_output_file_used_verbatim() {
    let (dir, input) = project_with_markdown();
    let converter = RecordingConverter::new();
    let target = dir.path().join("final.docx");

    let flags = Flags {
        output: Some(target.clone()),
        ..Default::default()
    };
    let report = pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap();

    assert_eq!(report.output, target);
}

// ============================================================================
// Style assembly
// ============================================================================

#[test]
fn test_align_alone_gets_full_defaults() {
    let (dir, input) = project_with_markdown();
    let converter = RecordingConverter::new();

    let flags = Flags {
        align: Some(Alignment::Center),
        ..Default::default()
    };
    pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap();

    let style = converter.last().options.style.expect("style should be sent");
    assert_eq!(style.len(), DEFAULT_NUMERIC_STYLE.len() + 1);
    for (key, value) in DEFAULT_NUMERIC_STYLE {
        assert_eq!(style.get(*key), Some(&StyleValue::Number(*value)), "{key}");
    }
    assert_eq!(
        style.get("paragraphAlignment"),
        Some(&StyleValue::Text("CENTER".to_string()))
    );
}

#[test]
fn test_rtl_sets_direction() {
    let (dir, input) = project_with_markdown();
    let converter = RecordingConverter::new();

    let flags = Flags {
        rtl: Some(true),
        ..Default::default()
    };
    pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap();

    let style = converter.last().options.style.unwrap();
    assert_eq!(style.get("direction").and_then(|v| v.as_str()), Some("RTL"));
}

#[test]
fn test_source_precedence() {
    let (dir, input) = project_with_markdown();
    write_file(
        dir.path(),
        PROJECT_CONFIG_FILE,
        r#"{
            "documentType": "report",
            "style": { "paragraphSize": 30, "heading1Size": 40, "paragraphAlignment": "RIGHT" }
        }"#,
    );
    let style_file = write_file(
        dir.path(),
        "style.json",
        r#"{ "paragraphSize": "26", "tocHeading1Bold": true, "bogus": 1 }"#,
    );
    let converter = RecordingConverter::new();

    let flags = Flags {
        document_type: Some(DocumentType::Document),
        align: Some(Alignment::Left),
        style: Some(style_file),
        ..Default::default()
    };
    pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap();

    let options = converter.last().options;
    assert_eq!(options.document_type, DocumentType::Document);

    let style = options.style.unwrap();
    assert_eq!(style.get("paragraphSize"), Some(&StyleValue::Number(26.0)));
    assert_eq!(style.get("heading1Size"), Some(&StyleValue::Number(40.0)));
    assert_eq!(style.get("titleSize"), Some(&StyleValue::Number(32.0)));
    assert_eq!(style.get("tocHeading1Bold"), Some(&StyleValue::Bool(true)));
    assert_eq!(
        style.get("paragraphAlignment").and_then(|v| v.as_str()),
        Some("LEFT")
    );
    assert!(!style.contains_key("bogus"));
}

#[test]
fn test_config_document_type_used_without_flag() {
    let (dir, input) = project_with_markdown();
    write_file(dir.path(), PROJECT_CONFIG_FILE, r#"{ "documentType": "report" }"#);
    let converter = RecordingConverter::new();

    pipeline_in(&dir, &converter)
        .convert(&input, &Flags::default(), &mut |_| {})
        .unwrap();

    let options = converter.last().options;
    assert_eq!(options.document_type, DocumentType::Report);
    assert!(options.style.is_none());
}

#[test]
fn test_config_document_type_ignores_case() {
    let (dir, input) = project_with_markdown();
    write_file(dir.path(), PROJECT_CONFIG_FILE, r#"{ "documentType": "Report" }"#);
    let converter = RecordingConverter::new();

    pipeline_in(&dir, &converter)
        .convert(&input, &Flags::default(), &mut |_| {})
        .unwrap();

    assert_eq!(converter.last().options.document_type, DocumentType::Report);
}

#[test]
fn test_missing_style_file_is_ignored() {
    let (dir, input) = project_with_markdown();
    let converter = RecordingConverter::new();

    let flags = Flags {
        style: Some(dir.path().join("absent.json")),
        ..Default::default()
    };
    pipeline_in(&dir, &converter)
        .convert(&input, &flags, &mut |_| {})
        .unwrap();

    assert!(converter.last().options.style.is_none());
}

#[test]
fn test_prepare_reports_rejected_entries() {
    let (dir, _) = project_with_markdown();
    let style_file = write_file(
        dir.path(),
        "style.json",
        r#"{ "heading2Size": "big", "unknownKey": true }"#,
    );
    let converter = RecordingConverter::new();

    let flags = Flags {
        style: Some(style_file),
        ..Default::default()
    };
    let prepared = pipeline_in(&dir, &converter)
        .prepare("text", &flags)
        .unwrap();

    assert!(prepared.custom_style);
    let mut keys: Vec<&str> = prepared.rejected.iter().map(|r| r.key.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["heading2Size", "unknownKey"]);

    // Sanitizing runs after merging, so a bad override removes the key entirely
    let style = prepared.options.style.unwrap();
    assert!(!style.contains_key("heading2Size"));
    assert_eq!(style.get("heading1Size"), Some(&StyleValue::Number(32.0)));
}

// ============================================================================
// Post-actions
// ============================================================================

#[test]
fn test_open_failure_is_a_warning() {
    let (dir, input) = project_with_markdown();
    let pipeline =
        ConversionPipeline::new(RecordingConverter::new(), dir.path()).with_opener(FailingOpener);

    let flags = Flags {
        open: Some(true),
        ..Default::default()
    };
    let report = pipeline.convert(&input, &flags, &mut |_| {}).unwrap();

    assert!(report.output.is_file());
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        report.warnings[0],
        PostActionError::OpenActionFailed { .. }
    ));
}

#[test]
fn test_open_receives_output_path() {
    let (dir, input) = project_with_markdown();
    let opener = RecordingOpener::default();
    let pipeline = ConversionPipeline::new(RecordingConverter::new(), dir.path())
        .with_opener(opener.clone());

    let flags = Flags {
        open: Some(true),
        ..Default::default()
    };
    let report = pipeline.convert(&input, &flags, &mut |_| {}).unwrap();

    let opened: Vec<PathBuf> = opener.opened.lock().unwrap().clone();
    assert_eq!(opened, vec![report.output]);
}

#[test]
fn test_session_installs_watch_and_stops_twice() {
    let (dir, input) = project_with_markdown();
    let mut session = Session::new(ConversionPipeline::new(RecordingConverter::new(), dir.path()));

    let flags = Flags {
        watch: Some(true),
        ..Default::default()
    };
    let mut phases = Vec::new();
    let report = session.run(&input, &flags, &mut |p| phases.push(p)).unwrap();

    assert!(report.warnings.is_empty());
    assert_eq!(phases.last(), Some(&Phase::Watching));
    assert!(session.watcher().is_active());
    assert_eq!(session.watcher().watched_path(), Some(input.as_path()));

    session.stop();
    session.stop();
    assert!(!session.watcher().is_active());
}

#[test]
fn test_session_without_watch_stays_idle() {
    let (dir, input) = project_with_markdown();
    let mut session = Session::new(ConversionPipeline::new(RecordingConverter::new(), dir.path()));

    session.run(&input, &Flags::default(), &mut |_| {}).unwrap();

    assert!(!session.watcher().is_active());
}

#[test]
fn test_real_docx_converter_writes_zip() {
    let (dir, input) = project_with_markdown();
    let pipeline = ConversionPipeline::with_defaults(dir.path());

    let report = pipeline
        .convert(&input, &Flags::default(), &mut |_| {})
        .unwrap();

    let bytes = fs::read(&report.output).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
