//! Seam between the pipeline and the document generator

use serde::Serialize;

use super::error::ConverterError;
use super::flags::DocumentType;
use super::style::MergedStyle;

/// Options handed to the converter alongside the markdown text
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    pub document_type: DocumentType,
    /// `None` lets the converter apply its own defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<MergedStyle>,
}

/// Turns markdown into the bytes of a document package.
///
/// Called once per conversion; the pipeline never retries a failure.
pub trait DocumentConverter {
    fn convert(&self, markdown: &str, options: &ConversionOptions) -> Result<Vec<u8>, ConverterError>;
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for &T {
    fn convert(&self, markdown: &str, options: &ConversionOptions) -> Result<Vec<u8>, ConverterError> {
        (**self).convert(markdown, options)
    }
}

impl<T: DocumentConverter + ?Sized> DocumentConverter for Box<T> {
    fn convert(&self, markdown: &str, options: &ConversionOptions) -> Result<Vec<u8>, ConverterError> {
        (**self).convert(markdown, options)
    }
}
