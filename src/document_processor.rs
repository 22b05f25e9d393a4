// End-to-end pipeline: extract, find tables, classify, structure, assemble
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::donation::{is_donation_report, structure, DonationData};
use crate::pdf_extraction::{
    ExtractionCascade, ExtractionMethod, ExtractionResult, SourceDocument, TableExtractor,
    TableRecord,
};
use crate::types::{DonorscanError, Result};

/// Everything known about one processed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub filename: String,
    pub filesize: u64,
    pub full_text: String,
    pub pages: Vec<String>,
    pub strategy_used: ExtractionMethod,
    pub is_scanned: bool,
    pub tables: Vec<TableRecord>,
    pub is_donation_report: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donation_data: Option<DonationData>,
}

/// Collects the pipeline outputs; only filename and filesize are mandatory.
#[derive(Debug, Clone, Default)]
pub struct ResultAssembler {
    filename: Option<String>,
    filesize: Option<u64>,
    extraction: Option<ExtractionResult>,
    tables: Vec<TableRecord>,
    donation_data: Option<DonationData>,
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn filesize(mut self, filesize: u64) -> Self {
        self.filesize = Some(filesize);
        self
    }

    pub fn extraction(mut self, extraction: ExtractionResult) -> Self {
        self.extraction = Some(extraction);
        self
    }

    pub fn tables(mut self, tables: Vec<TableRecord>) -> Self {
        self.tables = tables;
        self
    }

    /// `Some` marks the document as a donation report.
    pub fn donation_data(mut self, donation_data: Option<DonationData>) -> Self {
        self.donation_data = donation_data;
        self
    }

    pub fn assemble(&self) -> Result<ProcessingResult> {
        let filename = self
            .filename
            .clone()
            .ok_or(DonorscanError::MissingField("filename"))?;
        let filesize = self.filesize.ok_or(DonorscanError::MissingField("filesize"))?;
        let extraction = self
            .extraction
            .clone()
            .unwrap_or_else(|| ExtractionResult::empty(ExtractionMethod::Direct));

        Ok(ProcessingResult {
            filename,
            filesize,
            full_text: extraction.full_text,
            pages: extraction.pages,
            strategy_used: extraction.strategy_used,
            is_scanned: extraction.is_scanned,
            tables: self.tables.clone(),
            is_donation_report: self.donation_data.is_some(),
            donation_data: self.donation_data.clone(),
        })
    }
}

pub struct DocumentProcessor {
    cascade: ExtractionCascade,
    table_extractor: TableExtractor,
}

impl DocumentProcessor {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(ExtractionCascade::new(config), TableExtractor::new(config))
    }

    pub fn with_parts(cascade: ExtractionCascade, table_extractor: TableExtractor) -> Self {
        Self {
            cascade,
            table_extractor,
        }
    }

    pub fn process_pdf(&self, path: &Path, ocr_enabled: bool) -> Result<ProcessingResult> {
        log::info!("Processing PDF: {}", path.display());
        let source = SourceDocument::from_path(path)?;
        self.process(&source, ocr_enabled)
    }

    pub fn process(&self, source: &SourceDocument, ocr_enabled: bool) -> Result<ProcessingResult> {
        let start = Instant::now();
        let extraction = self.cascade.extract(source, ocr_enabled)?;
        let tables = self.table_extractor.extract_tables(source);

        let donation_data = if is_donation_report(&extraction.full_text) {
            let data = structure(&extraction.full_text, &tables);
            log::info!(
                "{} looks like a donation report: {} donors, total {:?}",
                source.filename(),
                data.donors.len(),
                data.total_amount
            );
            Some(data)
        } else {
            None
        };

        let result = ResultAssembler::new()
            .filename(source.filename())
            .filesize(source.filesize())
            .extraction(extraction)
            .tables(tables)
            .donation_data(donation_data)
            .assemble()?;

        log::info!(
            "Processed {} in {}ms using {}",
            result.filename,
            start.elapsed().as_millis(),
            result.strategy_used
        );
        Ok(result)
    }
}

pub fn save_results(path: &Path, result: &ProcessingResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    log::info!("Results saved to {}", path.display());
    Ok(())
}

pub fn load_results(path: &Path) -> Result<ProcessingResult> {
    if !path.is_file() {
        return Err(DonorscanError::MissingInput(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
