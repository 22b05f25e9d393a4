// Mining donation-report fields from text and tables
//
// Every heuristic is a pure function over its input and comes back empty
// rather than failing. Donor records come from tables when any table yields
// one, otherwise from "Name: $amount" runs anywhere in the text, never from both.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::pdf_extraction::TableRecord;

pub const DEFAULT_TITLE: &str = "Donation Report";

/// Thousands-separated amounts first so "1,234.56" is taken whole; the second
/// branch keeps unseparated amounts such as "1500.00" intact.
const AMOUNT: &str = r"\d{1,3}(?:,\d{3})+(?:\.\d{2})?|\d+(?:\.\d{2})?";

const DATE: &str = r"(?:\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+\d{1,2},\s*\d{4})";

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|\n)([^\n]*donation[^\n]*report[^\n]*)").unwrap());

static TOTAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)total.*?(?:amount|donation|cash).*?[$£€]?\s*({AMOUNT})"
    ))
    .unwrap()
});

static DATE_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)({DATE})\s*(?:-|–|\bto\b|\bthrough\b)\s*({DATE})"
    ))
    .unwrap()
});

// Names never span lines.
static DONOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"([A-Za-z][A-Za-z \t]*?)[ \t]*[:\-][ \t]*[$£€]?({AMOUNT})"
    ))
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationRecord {
    pub donor: String,
    /// As printed, e.g. "1,250.00"
    pub amount: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationData {
    pub title: String,
    #[serde(default)]
    pub date_range: String,
    pub total_amount: String,
    pub donors: Vec<String>,
    pub donations: Vec<DonationRecord>,
}

pub fn structure(text: &str, tables: &[TableRecord]) -> DonationData {
    let mut donations = donations_from_tables(tables);
    if donations.is_empty() {
        donations = donations_from_text(text);
    }
    let donors = donations.iter().map(|d| d.donor.clone()).collect();

    DonationData {
        title: extract_title(text).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        date_range: extract_date_range(text).unwrap_or_default(),
        total_amount: extract_total_amount(text).unwrap_or_default(),
        donors,
        donations,
    }
}

/// First line mentioning "donation" and then "report".
pub fn extract_title(text: &str) -> Option<String> {
    TITLE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// Number after the first "total … amount/donation/cash" phrase. Earlier
/// subtotals win over a later grand total.
pub fn extract_total_amount(text: &str) -> Option<String> {
    TOTAL_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

pub fn extract_date_range(text: &str) -> Option<String> {
    DATE_RANGE_RE
        .captures(text)
        .map(|caps| format!("{} - {}", &caps[1], &caps[2]))
}

/// Rows of every table that has both a donor-like and an amount-like header.
pub fn donations_from_tables(tables: &[TableRecord]) -> Vec<DonationRecord> {
    let mut donations = Vec::new();

    for table in tables {
        let lower: Vec<String> = table.headers.iter().map(|h| h.to_lowercase()).collect();
        let find = |keys: &[&str]| lower.iter().position(|h| keys.iter().any(|k| h.contains(k)));

        let (Some(donor_idx), Some(amount_idx)) =
            (find(&["donor", "name"]), find(&["amount", "total", "donation"]))
        else {
            continue;
        };
        let date_idx = find(&["date"]);
        log::debug!(
            "Table {} on page {} looks like a donation table",
            table.table_index,
            table.page
        );

        for row in &table.rows {
            let cell = |idx: usize| row.get(&table.headers[idx]).cloned().unwrap_or_default();
            let donor = cell(donor_idx);
            let amount = cell(amount_idx);
            if donor.is_empty() || amount.is_empty() {
                continue;
            }
            donations.push(DonationRecord {
                donor,
                amount,
                date: date_idx.map(cell).unwrap_or_default(),
            });
        }
    }
    donations
}

/// Runs shaped like `Name: $100.00` or `Name - 100.00`, in lists or prose.
/// Names are letters and spaces only, unique, and not a total label.
pub fn donations_from_text(text: &str) -> Vec<DonationRecord> {
    let mut donations: Vec<DonationRecord> = Vec::new();

    for caps in DONOR_RE.captures_iter(text) {
        let donor = caps[1].trim();
        if donor.is_empty()
            || donor.chars().any(|c| c.is_ascii_digit())
            || is_total_label(donor)
            || donations.iter().any(|d| d.donor == donor)
        {
            continue;
        }
        donations.push(DonationRecord {
            donor: donor.to_string(),
            amount: caps[2].to_string(),
            date: String::new(),
        });
    }
    donations
}

/// "Total", "Total Amount", "Subtotal", "Grand total ...", but not
/// "Totally Green Foundation".
fn is_total_label(name: &str) -> bool {
    let lower = name.to_lowercase();
    let first = lower.split_whitespace().next().unwrap_or_default();
    matches!(first, "total" | "subtotal" | "totals") || lower.starts_with("grand total")
}
