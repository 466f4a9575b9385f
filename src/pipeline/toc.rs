//! Table-of-contents marker insertion

/// Literal marker the converter replaces with a table of contents
pub const TOC_MARKER: &str = "[TOC]";

/// Prepend the TOC marker when requested and not already present.
///
/// Applying this twice gives the same text as applying it once.
pub fn insert_toc_if_requested(markdown: &str, requested: bool) -> String {
    if !requested || markdown.contains(TOC_MARKER) {
        return markdown.to_string();
    }
    format!("\n{}\n\n{}", TOC_MARKER, markdown)
}
