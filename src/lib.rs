// donorscan: PDF text extraction with donation-report mining
pub mod chat;
pub mod config;
pub mod document_processor;
pub mod donation;
pub mod jobs;
pub mod pdf_extraction;
pub mod types;

pub use config::Config;
pub use document_processor::{
    load_results, save_results, DocumentProcessor, ProcessingResult, ResultAssembler,
};
pub use jobs::{JobRecord, JobRegistry, JobStatus};
pub use types::{DonorscanError, Result};
