// Layout-aware text extraction using pdftotext
//
// pdftotext is called once for the whole document with the -layout flag,
// which keeps multi-column pages and tables readable:
// pdftotext -layout -enc UTF-8 [pdf_path] -

use super::extraction_router::{ExtractionMethod, TextExtractor};
use super::poppler::pdftotext_layout;
use super::source::SourceDocument;
use crate::types::Result;

#[derive(Debug, Clone)]
pub struct LayoutExtractor {
    pdftotext: String,
}

impl LayoutExtractor {
    pub fn new(pdftotext: &str) -> Self {
        Self {
            pdftotext: pdftotext.to_string(),
        }
    }
}

impl TextExtractor for LayoutExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Layout
    }

    fn extract(&self, source: &SourceDocument) -> Result<Vec<String>> {
        source.with_path(|path| pdftotext_layout(&self.pdftotext, path))
    }
}
