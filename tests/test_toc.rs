//! Tests for table-of-contents marker insertion

use mdocx::pipeline::{insert_toc_if_requested, TOC_MARKER};
use rand::Rng;

fn random_markdown(rng: &mut impl Rng) -> String {
    let pieces = ["# Heading", "Some text", "- item", "> quote", "", "[TOC]", "`code`"];
    let lines = rng.gen_range(0..12);
    (0..lines)
        .map(|_| pieces[rng.gen_range(0..pieces.len())])
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_insertion_is_idempotent_on_random_documents() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let text = random_markdown(&mut rng);
        let once = insert_toc_if_requested(&text, true);
        let twice = insert_toc_if_requested(&once, true);
        assert_eq!(once, twice, "input: {text:?}");
        if text.contains(TOC_MARKER) {
            assert_eq!(once, text);
        } else {
            assert_eq!(once.matches(TOC_MARKER).count(), 1);
        }
    }
}

#[test]
fn test_marker_appears_exactly_once_when_absent() {
    let out = insert_toc_if_requested("# Title\n\nBody", true);
    assert_eq!(out.matches(TOC_MARKER).count(), 1);
    assert!(out.ends_with("# Title\n\nBody"));
}

#[test]
fn test_existing_marker_is_left_alone() {
    let text = "Intro\n\n[TOC]\n\n# Title";
    assert_eq!(insert_toc_if_requested(text, true), text);
}

#[test]
fn test_empty_document_gets_marker() {
    assert_eq!(insert_toc_if_requested("", true), "\n[TOC]\n\n");
}

#[test]
fn test_not_requested_never_changes_text() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let text = random_markdown(&mut rng);
        assert_eq!(insert_toc_if_requested(&text, false), text);
    }
}
