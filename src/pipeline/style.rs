//! Style sanitization and layering
//!
//! Style values arrive from JSON files and from user flags, so nothing is
//! trusted: every entry is checked against a closed catalogue of keys, each
//! key belonging to exactly one value class. Sources are merged key-by-key in
//! precedence order first and sanitized once at the end.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Numeric keys: font sizes and spacing on the converter's point/twip scale
pub const NUMERIC_KEYS: &[&str] = &[
    "titleSize",
    "headingSpacing",
    "paragraphSpacing",
    "lineSpacing",
    "heading1Size",
    "heading2Size",
    "heading3Size",
    "heading4Size",
    "heading5Size",
    "paragraphSize",
    "listItemSize",
    "codeBlockSize",
    "blockquoteSize",
    "tocFontSize",
];

/// Boolean keys: bold/italic toggles for table-of-contents levels 1-5
pub const BOOLEAN_KEYS: &[&str] = &[
    "tocHeading1Bold",
    "tocHeading2Bold",
    "tocHeading3Bold",
    "tocHeading4Bold",
    "tocHeading5Bold",
    "tocHeading1Italic",
    "tocHeading2Italic",
    "tocHeading3Italic",
    "tocHeading4Italic",
    "tocHeading5Italic",
];

/// String keys: alignment and direction fields
pub const STRING_KEYS: &[&str] = &[
    "paragraphAlignment",
    "headingAlignment",
    "heading1Alignment",
    "heading2Alignment",
    "heading3Alignment",
    "heading4Alignment",
    "heading5Alignment",
    "blockquoteAlignment",
    "direction",
];

/// Built-in numeric defaults, applied only when custom styling is requested
pub const DEFAULT_NUMERIC_STYLE: &[(&str, f64)] = &[
    ("titleSize", 32.0),
    ("headingSpacing", 240.0),
    ("paragraphSpacing", 240.0),
    ("lineSpacing", 1.15),
    ("heading1Size", 32.0),
    ("heading2Size", 28.0),
    ("heading3Size", 24.0),
    ("heading4Size", 20.0),
    ("heading5Size", 18.0),
    ("paragraphSize", 24.0),
    ("listItemSize", 24.0),
    ("codeBlockSize", 20.0),
    ("blockquoteSize", 24.0),
    ("tocFontSize", 22.0),
];

/// Value class of a schema key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleClass {
    Numeric,
    Boolean,
    Text,
}

/// Look up the class of a style key. `None` means the key is not allowed.
pub fn classify(key: &str) -> Option<StyleClass> {
    if NUMERIC_KEYS.contains(&key) {
        Some(StyleClass::Numeric)
    } else if BOOLEAN_KEYS.contains(&key) {
        Some(StyleClass::Boolean)
    } else if STRING_KEYS.contains(&key) {
        Some(StyleClass::Text)
    } else {
        None
    }
}

/// A single sanitized style value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl StyleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value matches the class its key declares
    pub fn matches(&self, class: StyleClass) -> bool {
        matches!(
            (self, class),
            (StyleValue::Number(_), StyleClass::Numeric)
                | (StyleValue::Bool(_), StyleClass::Boolean)
                | (StyleValue::Text(_), StyleClass::Text)
        )
    }
}

/// Schema-valid, type-correct style entries, keyed by style name
pub type MergedStyle = BTreeMap<String, StyleValue>;

/// Why an entry was left out of the sanitized style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnknownKey,
    NotANumber,
    NotABoolean,
    EmptyOrNotAString,
}

/// An entry dropped during sanitization
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    pub key: String,
    pub value: Value,
    pub reason: RejectReason,
}

/// Output of `sanitize`: the kept entries plus the dropped ones for diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sanitized {
    pub style: MergedStyle,
    pub rejected: Vec<RejectedEntry>,
}

/// Filter a merged style map down to the entries the schema allows.
///
/// Numeric keys accept finite numbers and strings that parse to a finite
/// number; boolean keys accept only JSON booleans; string keys accept any
/// non-empty string. Everything else is dropped.
pub fn sanitize(merged: &Map<String, Value>) -> Sanitized {
    let mut out = Sanitized::default();

    for (key, value) in merged {
        let accepted = match classify(key) {
            None => Err(RejectReason::UnknownKey),
            Some(StyleClass::Numeric) => coerce_number(value)
                .map(StyleValue::Number)
                .ok_or(RejectReason::NotANumber),
            Some(StyleClass::Boolean) => value
                .as_bool()
                .map(StyleValue::Bool)
                .ok_or(RejectReason::NotABoolean),
            Some(StyleClass::Text) => match value.as_str() {
                Some(s) if !s.is_empty() => Ok(StyleValue::Text(s.to_string())),
                _ => Err(RejectReason::EmptyOrNotAString),
            },
        };

        match accepted {
            Ok(v) => {
                out.style.insert(key.clone(), v);
            }
            Err(reason) => out.rejected.push(RejectedEntry {
                key: key.clone(),
                value: value.clone(),
                reason,
            }),
        }
    }

    out
}

fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// The built-in numeric defaults as a JSON map, ready to be layered
pub fn default_style_layer() -> Map<String, Value> {
    DEFAULT_NUMERIC_STYLE
        .iter()
        .filter_map(|(k, v)| serde_json::Number::from_f64(*v).map(|n| (k.to_string(), Value::Number(n))))
        .collect()
}

/// Merge style layers left to right; later layers override earlier ones per key.
pub fn merge_layers<'a, I>(layers: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for layer in layers {
        for (k, v) in layer {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}
