// tests/pipeline_test.rs
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use donorscan::pdf_extraction::{
    ExtractionCascade, ExtractionMethod, RawTable, SourceDocument, TableDetector, TableExtractor,
    TextExtractor,
};
use donorscan::{DocumentProcessor, DonorscanError, ProcessingResult, Result};
use rstest::rstest;

const DONATION_TEXT: &str = "Annual Donation Report
Friends of the Library raised funds through online giving and cash collections this year.
Total Amount: $1,234.56
John Smith: $100.00
Jane Doe - $250.00
Thank you to every donor who made this possible through their generous contributions to our community programs.
";

const MINUTES_TEXT: &str = "Library Committee Minutes
The committee met on Tuesday to review the draft plan for the new library wing.
Members discussed the schedule, the proposal from the architect, parking access and the lighting design.
A follow up meeting will review revised drawings next month before the board votes on the final plan.
";

struct Scripted {
    method: ExtractionMethod,
    pages: Option<Vec<&'static str>>,
    calls: Arc<AtomicUsize>,
}

impl TextExtractor for Scripted {
    fn method(&self) -> ExtractionMethod {
        self.method
    }

    fn extract(&self, _source: &SourceDocument) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.pages {
            Some(pages) => Ok(pages.iter().map(|p| p.to_string()).collect()),
            None => Err(DonorscanError::tool("mock", "cannot read document")),
        }
    }
}

struct FixedTables(Vec<Vec<RawTable>>);

impl TableDetector for FixedTables {
    fn detect(&self, _source: &SourceDocument) -> Result<Vec<Vec<RawTable>>> {
        Ok(self.0.clone())
    }
}

struct Harness {
    processor: DocumentProcessor,
    calls: [Arc<AtomicUsize>; 3],
}

impl Harness {
    fn new(
        direct: Option<Vec<&'static str>>,
        layout: Option<Vec<&'static str>>,
        ocr: Option<Vec<&'static str>>,
        tables: Vec<Vec<RawTable>>,
    ) -> Self {
        let calls = [
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
            Arc::new(AtomicUsize::new(0)),
        ];
        let strategies: Vec<Box<dyn TextExtractor>> = vec![
            // deliberately out of order
            Box::new(Scripted {
                method: ExtractionMethod::Ocr,
                pages: ocr,
                calls: Arc::clone(&calls[2]),
            }),
            Box::new(Scripted {
                method: ExtractionMethod::Direct,
                pages: direct,
                calls: Arc::clone(&calls[0]),
            }),
            Box::new(Scripted {
                method: ExtractionMethod::Layout,
                pages: layout,
                calls: Arc::clone(&calls[1]),
            }),
        ];
        let processor = DocumentProcessor::with_parts(
            ExtractionCascade::with_strategies(strategies),
            TableExtractor::with_detector(Box::new(FixedTables(tables))),
        );
        Self { processor, calls }
    }

    fn run(&self, ocr_enabled: bool) -> Result<ProcessingResult> {
        let source = SourceDocument::from_bytes("report.pdf", vec![0u8; 4096]);
        self.processor.process(&source, ocr_enabled)
    }

    fn calls(&self) -> [usize; 3] {
        [
            self.calls[0].load(Ordering::SeqCst),
            self.calls[1].load(Ordering::SeqCst),
            self.calls[2].load(Ordering::SeqCst),
        ]
    }
}

fn cell(s: &str) -> Option<String> {
    Some(s.to_string())
}

#[test]
fn test_layout_fallback_produces_donation_report() {
    let harness = Harness::new(
        Some(vec!["Scanned page"]),
        Some(vec![DONATION_TEXT]),
        Some(vec!["never used"]),
        Vec::new(),
    );
    let result = harness.run(true).unwrap();

    assert_eq!(harness.calls(), [1, 1, 0]);
    assert_eq!(result.filename, "report.pdf");
    assert_eq!(result.filesize, 4096);
    assert_eq!(result.strategy_used, ExtractionMethod::Layout);
    assert!(!result.is_scanned);
    assert!(result.full_text.starts_with("\n\n=== Page 1 ===\n\nAnnual Donation Report"));

    assert!(result.is_donation_report);
    let data = result.donation_data.unwrap();
    assert_eq!(data.title, "Annual Donation Report");
    assert_eq!(data.total_amount, "1,234.56");
    assert_eq!(data.donors, vec!["John Smith", "Jane Doe"]);
    assert_eq!(data.donations[1].amount, "250.00");
}

#[test]
fn test_table_donors_take_precedence() {
    let table = vec![
        vec![cell(" Donor Name "), cell("Amount"), cell("Date"), None],
        vec![cell("Acme Corp"), cell("5,000.00"), cell("2024-03-01"), None],
        vec![cell("Bea Lin"), cell("75.00"), None, None],
    ];
    let harness = Harness::new(Some(vec![DONATION_TEXT]), None, None, vec![vec![], vec![table]]);
    let result = harness.run(false).unwrap();

    assert_eq!(harness.calls(), [1, 0, 0]);
    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].page, 2);
    assert_eq!(result.tables[0].headers, vec!["Donor Name", "Amount", "Date"]);

    let data = result.donation_data.unwrap();
    assert_eq!(data.donors, vec!["Acme Corp", "Bea Lin"]);
    assert_eq!(data.donations[0].date, "2024-03-01");
    assert_eq!(data.donations[1].date, "");
    assert_eq!(data.total_amount, "1,234.56");
}

#[test]
fn test_plain_document_has_no_donation_data() {
    let harness = Harness::new(Some(vec![MINUTES_TEXT]), None, None, Vec::new());
    let result = harness.run(true).unwrap();

    assert_eq!(result.strategy_used, ExtractionMethod::Direct);
    assert!(!result.is_donation_report);
    assert!(result.donation_data.is_none());

    let json = serde_json::to_value(&result).unwrap();
    assert!(json.get("donation_data").is_none());
    assert_eq!(json["is_donation_report"], false);
}

#[rstest]
#[case(false, [1, 1, 0], ExtractionMethod::Layout, false)]
#[case(true, [1, 1, 1], ExtractionMethod::Ocr, true)]
fn test_scanned_document(
    #[case] ocr_enabled: bool,
    #[case] expected_calls: [usize; 3],
    #[case] expected_method: ExtractionMethod,
    #[case] expected_scanned: bool,
) {
    let harness = Harness::new(
        Some(vec![]),
        Some(vec![""]),
        Some(vec![DONATION_TEXT, "page two"]),
        Vec::new(),
    );
    let result = harness.run(ocr_enabled).unwrap();

    assert_eq!(harness.calls(), expected_calls);
    assert_eq!(result.strategy_used, expected_method);
    assert_eq!(result.is_scanned, expected_scanned);
}

#[test]
fn test_every_strategy_failing_is_an_error() {
    let harness = Harness::new(None, None, None, Vec::new());
    let err = harness.run(true).unwrap_err();

    assert_eq!(harness.calls(), [1, 1, 1]);
    match err {
        DonorscanError::AllStrategiesFailed(reasons) => assert_eq!(reasons.len(), 3),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_partial_failure_keeps_last_result() {
    let harness = Harness::new(None, Some(vec!["tiny"]), None, Vec::new());
    let result = harness.run(true).unwrap();

    // OCR failed after LAYOUT returned something, so its empty stand-in is last
    assert_eq!(result.strategy_used, ExtractionMethod::Ocr);
    assert_eq!(result.full_text, "");
}

#[test]
fn test_results_survive_json_round_trip() {
    let table = vec![
        vec![cell("Name"), cell("Amount")],
        vec![cell("Acme Corp"), cell("10.00")],
    ];
    let harness = Harness::new(Some(vec![DONATION_TEXT]), None, None, vec![vec![table]]);
    let result = harness.run(false).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    donorscan::save_results(&path, &result).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["tables"][0]["table_number"], 1);
    assert_eq!(raw["tables"][0]["rows"][0]["Name"], "Acme Corp");
    assert_eq!(raw["donation_data"]["donors"][0], "Acme Corp");

    assert_eq!(donorscan::load_results(&path).unwrap(), result);
}
