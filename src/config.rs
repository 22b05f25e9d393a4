// Configuration for donorscan
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::Result;

pub const CONFIG_FILE_NAME: &str = "donorscan.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub ocr_enabled: bool,
    #[serde(default)]
    pub tools: ToolsConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// External poppler/tesseract commands, resolved through `PATH` unless absolute.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_pdftotext")]
    pub pdftotext: String,
    #[serde(default = "default_pdftoppm")]
    pub pdftoppm: String,
    #[serde(default = "default_tesseract")]
    pub tesseract: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OcrConfig {
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_true() -> bool { true }
fn default_pdftotext() -> String { "pdftotext".to_string() }
fn default_pdftoppm() -> String { "pdftoppm".to_string() }
fn default_tesseract() -> String { "tesseract".to_string() }
fn default_dpi() -> u32 { 300 }
fn default_lang() -> String { "eng".to_string() }
fn default_max_text_chars() -> usize { 8000 }
fn default_temperature() -> f32 { 0.1 }
fn default_max_output_tokens() -> u32 { 2048 }

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            pdftotext: default_pdftotext(),
            pdftoppm: default_pdftoppm(),
            tesseract: default_tesseract(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            lang: default_lang(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            tools: ToolsConfig::default(),
            ocr: OcrConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Config {
    /// Loads `./donorscan.toml`, then the user config file, then falls back to
    /// defaults. Environment overrides are applied last in every case.
    pub fn load() -> Result<Self> {
        let candidates = [Some(PathBuf::from(CONFIG_FILE_NAME)), user_config_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                log::debug!("Loading config from {}", path.display());
                return Self::from_file(&path);
            }
        }
        Ok(Self::default().with_env_overrides())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::from_toml(&content)?.with_env_overrides())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(cmd) = env::var("DONORSCAN_PDFTOTEXT") {
            self.tools.pdftotext = cmd;
        }
        if let Ok(cmd) = env::var("DONORSCAN_PDFTOPPM") {
            self.tools.pdftoppm = cmd;
        }
        if let Ok(cmd) = env::var("DONORSCAN_TESSERACT") {
            self.tools.tesseract = cmd;
        }
        if let Ok(lang) = env::var("DONORSCAN_OCR_LANG") {
            self.ocr.lang = lang;
        }
        self
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("donorscan").join("config.toml"))
}
