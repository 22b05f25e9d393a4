// donorscan CLI: process a PDF to JSON, or build a chat prompt from saved results
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use donorscan::chat::build_chat_context;
use donorscan::pdf_extraction::OcrExtractor;
use donorscan::{load_results, save_results, Config, DocumentProcessor, ProcessingResult};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract text, tables and donation data from a PDF
    Process {
        pdf_file: PathBuf,
        /// Output JSON file (defaults to <pdf stem>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long)]
        no_ocr: bool,
        /// Path to the tesseract executable
        #[arg(long)]
        tesseract: Option<String>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the question-answering prompt for previously saved results
    Prompt {
        results: PathBuf,
        question: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Process {
            pdf_file,
            output,
            no_ocr,
            tesseract,
            config,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(tesseract) = tesseract {
                config.tools.tesseract = tesseract;
            }
            let ocr_enabled = config.ocr_enabled && !no_ocr;
            if ocr_enabled && !OcrExtractor::new(&config).is_available() {
                log::warn!("OCR tools not found; scanned pages will come back empty");
            }

            let processor = DocumentProcessor::new(&config);
            let result = processor
                .process_pdf(&pdf_file, ocr_enabled)
                .with_context(|| format!("failed to process {}", pdf_file.display()))?;

            let output = output.unwrap_or_else(|| default_output(&pdf_file));
            save_results(&output, &result)?;
            print_summary(&result, &output);
        }
        Command::Prompt {
            results,
            question,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let result = load_results(&results)
                .with_context(|| format!("failed to load {}", results.display()))?;
            println!(
                "{}",
                build_chat_context(&result, &question, config.chat.max_text_chars)
            );
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => Config::load()?,
    };
    Ok(config)
}

fn default_output(pdf_file: &Path) -> PathBuf {
    let stem = pdf_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    PathBuf::from(format!("{stem}.json"))
}

fn print_summary(result: &ProcessingResult, output: &Path) {
    println!("\nProcessing complete:");
    println!("- Filename: {}", result.filename);
    println!("- Pages: {}", result.pages.len());
    println!("- Extraction method: {}", result.strategy_used);
    println!("- Characters: {}", result.full_text.chars().count());
    println!("- Scanned: {}", result.is_scanned);
    println!("- Tables found: {}", result.tables.len());
    println!("- Donation report: {}", result.is_donation_report);

    if let Some(data) = &result.donation_data {
        println!("\nDonation report details:");
        println!("- Title: {}", data.title);
        if !data.date_range.is_empty() {
            println!("- Period: {}", data.date_range);
        }
        println!("- Total amount: {}", data.total_amount);
        println!("- Donors found: {}", data.donors.len());
    }
    println!("\nResults saved to {}", output.display());
}
