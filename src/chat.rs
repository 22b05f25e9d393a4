// Question answering over a processed document; the model sits behind CompletionService
use crate::config::ChatConfig;
use crate::document_processor::ProcessingResult;
use crate::types::Result;

const MAX_LISTED_DONATIONS: usize = 5;
const MAX_LISTED_TABLES: usize = 2;
const MAX_LISTED_ROWS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Opaque text-in/text-out model.
pub trait CompletionService {
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

pub fn ask(
    service: &dyn CompletionService,
    result: &ProcessingResult,
    question: &str,
    config: &ChatConfig,
) -> Result<String> {
    let request = CompletionRequest {
        prompt: build_chat_context(result, question, config.max_text_chars),
        temperature: config.temperature,
        max_output_tokens: config.max_output_tokens,
    };
    log::debug!("Sending {} char prompt about {}", request.prompt.len(), result.filename);
    service.complete(&request)
}

pub fn build_chat_context(result: &ProcessingResult, question: &str, max_text_chars: usize) -> String {
    let mut context = format!(
        "You are an assistant that specializes in analyzing PDF documents.\n\
         I have uploaded a PDF document and extracted its content. Please answer my question based ONLY on the information contained in this PDF.\n\
         If the answer is not in the document, please say so clearly.\n\
         \n\
         Here is some information about the document:\n\
         - Filename: {}\n\
         - Extraction method: {}\n",
        result.filename, result.strategy_used
    );

    if let (true, Some(data)) = (result.is_donation_report, &result.donation_data) {
        let total = if data.total_amount.is_empty() {
            "Not specified"
        } else {
            data.total_amount.as_str()
        };
        context.push_str(&format!(
            "\nThis is a donation report with the following details:\n\
             - Title: {}\n\
             - Total Amount: {}\n\
             - Number of donors: {}\n",
            data.title,
            total,
            data.donors.len()
        ));
        if !data.date_range.is_empty() {
            context.push_str(&format!("- Reporting period: {}\n", data.date_range));
        }

        if !data.donations.is_empty() {
            context.push_str("\nDonor information:\n");
            for donation in data.donations.iter().take(MAX_LISTED_DONATIONS) {
                let date = if donation.date.is_empty() {
                    "Unknown date"
                } else {
                    donation.date.as_str()
                };
                context.push_str(&format!("- {}: {} ({})\n", donation.donor, donation.amount, date));
            }
            if data.donations.len() > MAX_LISTED_DONATIONS {
                context.push_str(&format!(
                    "...and {} more donors\n",
                    data.donations.len() - MAX_LISTED_DONATIONS
                ));
            }
        }
    }

    let text = truncate_chars(&result.full_text, max_text_chars);
    context.push_str("\nExtracted text from the document:\n");
    context.push_str(text);
    if text.len() < result.full_text.len() {
        context.push_str("...[text truncated due to length]");
    }
    context.push('\n');

    if !result.tables.is_empty() {
        context.push_str(&format!("\nThe document contains {} tables.\n", result.tables.len()));
        for (i, table) in result.tables.iter().take(MAX_LISTED_TABLES).enumerate() {
            context.push_str(&format!("\nTable {} (Page {}):\n", i + 1, table.page));
            context.push_str(&format!("Headers: {}\n", table.headers.join(" | ")));
            for (j, row) in table.rows.iter().take(MAX_LISTED_ROWS).enumerate() {
                let values: Vec<&str> = row.values().map(String::as_str).collect();
                context.push_str(&format!("Row {}: {}\n", j + 1, values.join(" | ")));
            }
            if table.rows.len() > MAX_LISTED_ROWS {
                context.push_str(&format!(
                    "...and {} more rows\n",
                    table.rows.len() - MAX_LISTED_ROWS
                ));
            }
        }
    }

    context.push_str(&format!("\nMy question is: {}\n", question));
    context
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
