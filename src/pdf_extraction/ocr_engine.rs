// OCR strategy: rasterize with pdftoppm, recognize with tesseract
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use super::extraction_router::{ExtractionMethod, TextExtractor};
use super::poppler::run_tool;
use super::source::SourceDocument;
use crate::config::Config;
use crate::types::{DonorscanError, Result};

#[derive(Debug, Clone)]
pub struct OcrExtractor {
    pdftoppm: String,
    tesseract: String,
    dpi: u32,
    lang: String,
}

impl OcrExtractor {
    pub fn new(config: &Config) -> Self {
        Self {
            pdftoppm: config.tools.pdftoppm.clone(),
            tesseract: config.tools.tesseract.clone(),
            dpi: config.ocr.dpi,
            lang: config.ocr.lang.clone(),
        }
    }

    /// Both tools answer a version probe.
    pub fn is_available(&self) -> bool {
        let pdftoppm = run_tool(&self.pdftoppm, ["-v"]).is_ok();
        let tesseract = run_tool(&self.tesseract, ["--version"]).is_ok();
        if !pdftoppm {
            log::debug!("{} not found - install poppler-utils for OCR support", self.pdftoppm);
        }
        if !tesseract {
            log::debug!("{} not found - install tesseract-ocr for OCR support", self.tesseract);
        }
        pdftoppm && tesseract
    }

    fn rasterize(&self, pdf_path: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = out_dir.join("page");
        let dpi = self.dpi.to_string();
        run_tool(
            &self.pdftoppm,
            [
                OsStr::new("-png"),
                OsStr::new("-r"),
                OsStr::new(&dpi),
                pdf_path.as_os_str(),
                prefix.as_os_str(),
            ],
        )?;

        // pdftoppm zero-pads page numbers, so name order is page order
        let mut images: Vec<PathBuf> = fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        images.sort();
        Ok(images)
    }

    fn recognize(&self, image: &Path) -> Result<String> {
        let output = run_tool(
            &self.tesseract,
            [
                image.as_os_str(),
                OsStr::new("stdout"),
                OsStr::new("-l"),
                OsStr::new(&self.lang),
            ],
        )?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl TextExtractor for OcrExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Ocr
    }

    fn extract(&self, source: &SourceDocument) -> Result<Vec<String>> {
        let work_dir = tempfile::tempdir()?;
        let images = source.with_path(|path| self.rasterize(path, work_dir.path()))?;
        if images.is_empty() {
            return Err(DonorscanError::strategy(
                ExtractionMethod::Ocr,
                "pdftoppm produced no images",
            ));
        }

        log::info!(
            "Running OCR on {} pages of {} (dpi={}, lang={})",
            images.len(),
            source.filename(),
            self.dpi,
            self.lang
        );

        let mut pages = Vec::with_capacity(images.len());
        for (i, image) in images.iter().enumerate() {
            let text = self.recognize(image)?;
            log::debug!("OCR page {}: {} chars", i + 1, text.len());
            pages.push(text);
        }
        Ok(pages)
    }
}
