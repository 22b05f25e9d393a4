// Core error type for donorscan
use std::path::PathBuf;

use crate::pdf_extraction::ExtractionMethod;

#[derive(Debug, thiserror::Error)]
pub enum DonorscanError {
    #[error("PDF file not found: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("{method} extraction failed: {reason}")]
    Strategy {
        method: ExtractionMethod,
        reason: String,
    },

    #[error("All extraction strategies failed: {}", .0.join("; "))]
    AllStrategiesFailed(Vec<String>),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("External tool `{tool}` failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Completion service error: {0}")]
    Completion(String),
}

impl DonorscanError {
    pub fn strategy(method: ExtractionMethod, reason: impl Into<String>) -> Self {
        Self::Strategy {
            method,
            reason: reason.into(),
        }
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DonorscanError>;
