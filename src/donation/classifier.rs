// Cheap donation-report detection
//
// Either signal alone is enough: a few distinct keywords, or many money amounts.
use once_cell::sync::Lazy;
use regex::Regex;

pub const DONATION_KEYWORDS: [&str; 10] = [
    "donation",
    "donor",
    "contribute",
    "giving",
    "fundraising",
    "cash",
    "online",
    "crypto",
    "total",
    "amount",
];

pub const MIN_KEYWORDS: usize = 3;
pub const MIN_MONEY_MATCHES: usize = 5;

static MONEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+(?:\.\d{2})?|\d+(?:\.\d{2})?\s*(?:USD|dollars)").unwrap());

pub fn is_donation_report(text: &str) -> bool {
    keyword_hits(text) >= MIN_KEYWORDS || money_matches(text) >= MIN_MONEY_MATCHES
}

/// Distinct keywords present, case-insensitive.
pub fn keyword_hits(text: &str) -> usize {
    let lower = text.to_lowercase();
    DONATION_KEYWORDS
        .iter()
        .filter(|keyword| lower.contains(*keyword))
        .count()
}

pub fn money_matches(text: &str) -> usize {
    MONEY_RE.find_iter(text).count()
}
