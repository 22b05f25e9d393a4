// Cost-ordered extraction cascade
//
// Strategies run cheapest first: direct content-stream text (lopdf), then
// layout-aware text (pdftotext -layout), then OCR (pdftoppm + tesseract) when
// enabled. The first result that passes the sufficiency check wins. When none
// does, the last attempted result is returned so callers always get something.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use super::direct::DirectExtractor;
use super::layout::LayoutExtractor;
use super::ocr_engine::OcrExtractor;
use super::source::SourceDocument;
use super::sufficiency::is_sufficient;
use crate::config::Config;
use crate::types::{DonorscanError, Result};

/// Extraction strategies, in cascade priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExtractionMethod {
    Direct,
    Layout,
    Ocr,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionMethod::Direct => "DIRECT",
            ExtractionMethod::Layout => "LAYOUT",
            ExtractionMethod::Ocr => "OCR",
        };
        f.write_str(name)
    }
}

/// Text produced by one strategy for a whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub full_text: String,
    pub pages: Vec<String>,
    pub strategy_used: ExtractionMethod,
    pub is_scanned: bool,
}

impl ExtractionResult {
    pub fn from_pages(pages: Vec<String>, method: ExtractionMethod) -> Self {
        let full_text = join_pages(&pages);
        Self {
            full_text,
            pages,
            strategy_used: method,
            is_scanned: method == ExtractionMethod::Ocr,
        }
    }

    /// Stand-in for a strategy that failed.
    pub fn empty(method: ExtractionMethod) -> Self {
        Self::from_pages(Vec::new(), method)
    }

    pub fn char_count(&self) -> usize {
        self.full_text.chars().count()
    }
}

/// Concatenate page texts, each preceded by a `=== Page N ===` marker.
pub fn join_pages(pages: &[String]) -> String {
    let mut full_text = String::new();
    for (i, page) in pages.iter().enumerate() {
        full_text.push_str(&format!("\n\n=== Page {} ===\n\n", i + 1));
        full_text.push_str(page);
    }
    full_text
}

/// One way of turning a PDF into per-page text.
pub trait TextExtractor: Send + Sync {
    fn method(&self) -> ExtractionMethod;

    /// Page texts in physical page order.
    fn extract(&self, source: &SourceDocument) -> Result<Vec<String>>;
}

pub struct ExtractionCascade {
    strategies: Vec<Box<dyn TextExtractor>>,
}

impl ExtractionCascade {
    pub fn new(config: &Config) -> Self {
        Self::with_strategies(vec![
            Box::new(DirectExtractor::new()),
            Box::new(LayoutExtractor::new(&config.tools.pdftotext)),
            Box::new(OcrExtractor::new(config)),
        ])
    }

    /// Strategies are reordered by priority; ties keep their given order.
    pub fn with_strategies(mut strategies: Vec<Box<dyn TextExtractor>>) -> Self {
        strategies.sort_by_key(|strategy| strategy.method());
        Self { strategies }
    }

    pub fn methods(&self) -> Vec<ExtractionMethod> {
        self.strategies.iter().map(|s| s.method()).collect()
    }

    pub fn extract(&self, source: &SourceDocument, ocr_enabled: bool) -> Result<ExtractionResult> {
        let mut failures = Vec::new();
        let mut attempted = 0;
        let mut last = None;

        for strategy in &self.strategies {
            let method = strategy.method();
            if method == ExtractionMethod::Ocr && !ocr_enabled {
                log::debug!("Skipping OCR for {}: disabled", source.filename());
                continue;
            }
            attempted += 1;

            let start = Instant::now();
            let result = match strategy.extract(source) {
                Ok(pages) => {
                    let result = ExtractionResult::from_pages(pages, method);
                    log::info!(
                        "{} extracted {} characters from {} pages in {}ms",
                        method,
                        result.char_count(),
                        result.pages.len(),
                        start.elapsed().as_millis()
                    );
                    result
                }
                Err(err) => {
                    log::warn!("Error extracting text with {}: {}", method, err);
                    failures.push(format!("{method}: {err}"));
                    ExtractionResult::empty(method)
                }
            };

            if is_sufficient(&result.full_text) {
                log::info!("Using {} extraction for {}", method, source.filename());
                return Ok(result);
            }
            last = Some(result);
        }

        match last {
            Some(_) if failures.len() == attempted => {
                Err(DonorscanError::AllStrategiesFailed(failures))
            }
            Some(result) => {
                log::warn!(
                    "No strategy produced sufficient text for {}; keeping {} result",
                    source.filename(),
                    result.strategy_used
                );
                Ok(result)
            }
            None => Err(DonorscanError::AllStrategiesFailed(vec![
                "no extraction strategy available".to_string(),
            ])),
        }
    }
}
