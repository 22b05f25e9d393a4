// Direct content-stream text extraction - pure Rust via lopdf
use lopdf::Document;

use super::extraction_router::{ExtractionMethod, TextExtractor};
use super::source::SourceDocument;
use crate::types::Result;

/// Load a PDF from memory using lopdf
pub fn load_pdf(bytes: &[u8]) -> Result<Document> {
    Ok(Document::load_mem(bytes)?)
}

pub fn get_page_count(bytes: &[u8]) -> Result<usize> {
    Ok(load_pdf(bytes)?.get_pages().len())
}

/// Fastest strategy; only useful for text-native PDFs.
#[derive(Debug, Default)]
pub struct DirectExtractor;

impl DirectExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DirectExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Direct
    }

    fn extract(&self, source: &SourceDocument) -> Result<Vec<String>> {
        let document = load_pdf(source.bytes())?;
        let pages = document.get_pages();
        let mut texts = Vec::with_capacity(pages.len());

        // get_pages is keyed by 1-based page number, already in order
        for page_number in pages.keys() {
            let text = document.extract_text(&[*page_number])?;
            log::debug!("lopdf page {}: {} chars", page_number, text.len());
            texts.push(text);
        }
        Ok(texts)
    }
}
