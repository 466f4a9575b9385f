//! Minimal WordprocessingML packager
//!
//! Produces a valid `.docx` zip container from markdown-ish text. Only the
//! block structure is recognised (headings, quotes, list items, fenced code,
//! paragraphs and the `[TOC]` marker); inline markup is written as-is.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::converter::{ConversionOptions, DocumentConverter};
use super::error::ConverterError;
use super::flags::DocumentType;
use super::style::{MergedStyle, DEFAULT_NUMERIC_STYLE};
use super::toc::TOC_MARKER;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_CLOSE: &str = "<w:sectPr/></w:body></w:document>";

/// Built-in converter writing a single-part `.docx` package
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxConverter;

impl DocumentConverter for DocxConverter {
    fn convert(&self, markdown: &str, options: &ConversionOptions) -> Result<Vec<u8>, ConverterError> {
        let body = render_body(&parse_blocks(markdown), options);

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let file_options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        writer.start_file("[Content_Types].xml", file_options)?;
        writer.write_all(CONTENT_TYPES.as_bytes())?;
        writer.start_file("_rels/.rels", file_options)?;
        writer.write_all(ROOT_RELS.as_bytes())?;
        writer.start_file("word/document.xml", file_options)?;
        writer.write_all(DOCUMENT_OPEN.as_bytes())?;
        writer.write_all(body.as_bytes())?;
        writer.write_all(DOCUMENT_CLOSE.as_bytes())?;

        Ok(writer.finish()?.into_inner())
    }
}

/// Block-level structure recognised by the packager
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Toc,
    Heading(u8, String),
    Paragraph(String),
    Quote(String),
    ListItem(String),
    Code(String),
}

/// Split text into blocks, one per paragraph/heading/list item/code line.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_code = false;

    let flush = |paragraph: &mut Vec<&str>, blocks: &mut Vec<Block>| {
        if !paragraph.is_empty() {
            blocks.push(Block::Paragraph(paragraph.join(" ")));
            paragraph.clear();
        }
    };

    for line in markdown.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            flush(&mut paragraph, &mut blocks);
            in_code = !in_code;
            continue;
        }
        if in_code {
            blocks.push(Block::Code(line.to_string()));
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut paragraph, &mut blocks);
        } else if trimmed == TOC_MARKER {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Toc);
        } else if let Some((level, text)) = heading(trimmed) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Heading(level, text.to_string()));
        } else if let Some(text) = trimmed.strip_prefix('>') {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::Quote(text.trim().to_string()));
        } else if let Some(text) = list_item(trimmed) {
            flush(&mut paragraph, &mut blocks);
            blocks.push(Block::ListItem(text.to_string()));
        } else {
            paragraph.push(trimmed);
        }
    }
    flush(&mut paragraph, &mut blocks);

    blocks
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(' ') {
        return None;
    }
    // Level 6 shares the level 5 styling
    Some((hashes.min(5) as u8, rest.trim()))
}

fn list_item(line: &str) -> Option<&str> {
    for bullet in ["- ", "* ", "+ "] {
        if let Some(text) = line.strip_prefix(bullet) {
            return Some(text.trim());
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(text) = line[digits..].strip_prefix(". ") {
            return Some(text.trim());
        }
    }
    None
}

/// Style lookups with the packager's own fallbacks
struct Styler<'a> {
    style: Option<&'a MergedStyle>,
}

impl Styler<'_> {
    fn number(&self, key: &str) -> f64 {
        self.style
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_f64())
            .or_else(|| {
                DEFAULT_NUMERIC_STYLE
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, v)| *v)
            })
            .unwrap_or(24.0)
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.style.and_then(|s| s.get(key)).and_then(|v| v.as_str())
    }

    fn rtl(&self) -> bool {
        self.text("direction")
            .map(|d| d.eq_ignore_ascii_case("RTL"))
            .unwrap_or(false)
    }

    /// `w:jc` value; unknown alignments are ignored
    fn justification(&self, keys: &[&str]) -> Option<&'static str> {
        let value = keys.iter().find_map(|k| self.text(k))?;
        match value.to_ascii_uppercase().as_str() {
            "LEFT" => Some("left"),
            "RIGHT" => Some("right"),
            "CENTER" => Some("center"),
            "JUSTIFIED" => Some("both"),
            _ => None,
        }
    }
}

#[derive(Default)]
struct Para<'a> {
    text: &'a str,
    size: f64,
    bold: bool,
    italic: bool,
    mono: bool,
    jc: Option<&'static str>,
    outline: Option<u8>,
}

fn render_body(blocks: &[Block], options: &ConversionOptions) -> String {
    let styler = Styler {
        style: options.style.as_ref(),
    };
    let rtl = styler.rtl();
    let spacing = styler.number("paragraphSpacing");
    let line = styler.number("lineSpacing");
    let mut xml = String::new();
    let mut title_pending = options.document_type == DocumentType::Report;

    for block in blocks {
        let para = match block {
            Block::Toc => {
                xml.push_str(&toc_field(styler.number("tocFontSize")));
                continue;
            }
            Block::Heading(_, text) if title_pending => {
                title_pending = false;
                xml.push_str(&paragraph(
                    &Para {
                        text,
                        size: styler.number("titleSize"),
                        bold: true,
                        jc: Some("center"),
                        ..Default::default()
                    },
                    rtl,
                    spacing,
                    line,
                ));
                xml.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
                continue;
            }
            Block::Heading(level, text) => Para {
                text,
                size: styler.number(&format!("heading{}Size", level)),
                bold: true,
                jc: styler.justification(&[
                    format!("heading{}Alignment", level).as_str(),
                    "headingAlignment",
                ]),
                outline: Some(level - 1),
                ..Default::default()
            },
            Block::Paragraph(text) => Para {
                text,
                size: styler.number("paragraphSize"),
                jc: styler.justification(&["paragraphAlignment"]),
                ..Default::default()
            },
            Block::Quote(text) => Para {
                text,
                size: styler.number("blockquoteSize"),
                italic: true,
                jc: styler.justification(&["blockquoteAlignment"]),
                ..Default::default()
            },
            Block::ListItem(text) => {
                let bullet = format!("\u{2022} {}", text);
                xml.push_str(&paragraph(
                    &Para {
                        text: &bullet,
                        size: styler.number("listItemSize"),
                        jc: styler.justification(&["paragraphAlignment"]),
                        ..Default::default()
                    },
                    rtl,
                    spacing,
                    line,
                ));
                continue;
            }
            Block::Code(text) => Para {
                text,
                size: styler.number("codeBlockSize"),
                mono: true,
                ..Default::default()
            },
        };
        xml.push_str(&paragraph(&para, rtl, spacing, line));
    }

    xml
}

fn paragraph(p: &Para<'_>, rtl: bool, spacing: f64, line: f64) -> String {
    let mut ppr = String::new();
    if rtl {
        ppr.push_str("<w:bidi/>");
    }
    ppr.push_str(&format!(
        r#"<w:spacing w:after="{}" w:line="{}" w:lineRule="auto"/>"#,
        spacing.round() as i64,
        (line * 240.0).round() as i64
    ));
    if let Some(jc) = p.jc {
        ppr.push_str(&format!(r#"<w:jc w:val="{}"/>"#, jc));
    }
    if let Some(level) = p.outline {
        ppr.push_str(&format!(r#"<w:outlineLvl w:val="{}"/>"#, level));
    }

    let mut rpr = String::new();
    if p.mono {
        rpr.push_str(r#"<w:rFonts w:ascii="Courier New" w:hAnsi="Courier New"/>"#);
    }
    if p.bold {
        rpr.push_str("<w:b/>");
    }
    if p.italic {
        rpr.push_str("<w:i/>");
    }
    rpr.push_str(&format!(r#"<w:sz w:val="{}"/>"#, p.size.round() as i64));
    if rtl {
        rpr.push_str("<w:rtl/>");
    }

    format!(
        r#"<w:p><w:pPr>{}</w:pPr><w:r><w:rPr>{}</w:rPr><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        ppr,
        rpr,
        escape_xml(p.text)
    )
}

fn toc_field(size: f64) -> String {
    format!(
        concat!(
            r#"<w:p><w:r><w:fldChar w:fldCharType="begin"/></w:r>"#,
            r#"<w:r><w:instrText xml:space="preserve"> TOC \o "1-5" \h \z \u </w:instrText></w:r>"#,
            r#"<w:r><w:fldChar w:fldCharType="separate"/></w:r>"#,
            r#"<w:r><w:rPr><w:sz w:val="{}"/></w:rPr><w:t>Table of Contents</w:t></w:r>"#,
            r#"<w:r><w:fldChar w:fldCharType="end"/></w:r></w:p>"#
        ),
        size.round() as i64
    )
}

/// Escape text for inclusion in XML character data
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::style::StyleValue;
    use std::io::Read;

    fn document_xml(bytes: Vec<u8>) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_parse_blocks() {
        let blocks = parse_blocks("\n[TOC]\n\n# Title\n\nline one\nline two\n\n- item\n> quoted\n```\nlet x = 1;\n```");
        assert_eq!(
            blocks,
            vec![
                Block::Toc,
                Block::Heading(1, "Title".to_string()),
                Block::Paragraph("line one line two".to_string()),
                Block::ListItem("item".to_string()),
                Block::Quote("quoted".to_string()),
                Block::Code("let x = 1;".to_string()),
            ]
        );
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        assert_eq!(
            parse_blocks("#hashtag"),
            vec![Block::Paragraph("#hashtag".to_string())]
        );
    }

    #[test]
    fn test_package_contains_document_part() {
        let bytes = DocxConverter
            .convert("# Hello & <bye>", &ConversionOptions::default())
            .unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let names: Vec<_> = archive.file_names().map(|n| n.to_string()).collect();
        assert!(names.contains(&"[Content_Types].xml".to_string()));
        assert!(names.contains(&"_rels/.rels".to_string()));

        let xml = document_xml(bytes);
        assert!(xml.contains("Hello &amp; &lt;bye&gt;"));
        assert!(xml.contains(r#"<w:outlineLvl w:val="0"/>"#));
    }

    #[test]
    fn test_style_alignment_and_direction() {
        let mut style = MergedStyle::new();
        style.insert("paragraphAlignment".to_string(), StyleValue::Text("CENTER".to_string()));
        style.insert("direction".to_string(), StyleValue::Text("RTL".to_string()));
        style.insert("paragraphSize".to_string(), StyleValue::Number(30.0));
        let options = ConversionOptions {
            document_type: DocumentType::Document,
            style: Some(style),
        };

        let xml = document_xml(DocxConverter.convert("Body", &options).unwrap());
        assert!(xml.contains(r#"<w:jc w:val="center"/>"#));
        assert!(xml.contains("<w:bidi/>"));
        assert!(xml.contains(r#"<w:sz w:val="30"/>"#));
    }

    #[test]
    fn test_report_promotes_first_heading_to_title() {
        let options = ConversionOptions {
            document_type: DocumentType::Report,
            style: None,
        };
        let xml = document_xml(DocxConverter.convert("# Annual\n\n## Intro", &options).unwrap());
        assert!(xml.contains(r#"<w:br w:type="page"/>"#));
        assert!(xml.contains(r#"<w:outlineLvl w:val="1"/>"#));
        assert!(!xml.contains(r#"<w:outlineLvl w:val="0"/>"#));
    }

    #[test]
    fn test_toc_field() {
        let xml = document_xml(
            DocxConverter
                .convert("[TOC]\n\n# A", &ConversionOptions::default())
                .unwrap(),
        );
        assert!(xml.contains(r#"TOC \o "1-5""#));
    }
}
