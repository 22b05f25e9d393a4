// Table detection and normalization
//
// Tables are found in the layout-preserving text of each page: consecutive
// lines that split into two or more cells at wide whitespace gutters form a
// region, the first line being the header row. Data cells are aligned to the
// header column they overlap most, so gaps inside a row stay as empty cells.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::poppler::pdftotext_layout;
use super::source::SourceDocument;
use crate::config::Config;
use crate::types::Result;

/// Rows of cells as found on the page; `None` marks a missing cell.
pub type RawTable = Vec<Vec<Option<String>>>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    /// 1-based page number
    pub page: u32,
    /// 1-based position of the table on its page
    #[serde(rename = "table_number")]
    pub table_index: u32,
    pub headers: Vec<String>,
    pub rows: Vec<IndexMap<String, String>>,
}

/// Source of raw, per-page tables.
pub trait TableDetector: Send + Sync {
    fn detect(&self, source: &SourceDocument) -> Result<Vec<Vec<RawTable>>>;
}

#[derive(Debug, Clone)]
pub struct LayoutTableDetector {
    pdftotext: String,
}

impl LayoutTableDetector {
    pub fn new(pdftotext: &str) -> Self {
        Self {
            pdftotext: pdftotext.to_string(),
        }
    }
}

impl TableDetector for LayoutTableDetector {
    fn detect(&self, source: &SourceDocument) -> Result<Vec<Vec<RawTable>>> {
        let pages = source.with_path(|path| pdftotext_layout(&self.pdftotext, path))?;
        Ok(pages.iter().map(|page| detect_page_tables(page)).collect())
    }
}

pub struct TableExtractor {
    detector: Box<dyn TableDetector>,
}

impl TableExtractor {
    pub fn new(config: &Config) -> Self {
        Self::with_detector(Box::new(LayoutTableDetector::new(&config.tools.pdftotext)))
    }

    pub fn with_detector(detector: Box<dyn TableDetector>) -> Self {
        Self { detector }
    }

    /// Never fails: detection errors are logged and yield no tables.
    pub fn extract_tables(&self, source: &SourceDocument) -> Vec<TableRecord> {
        let pages = match self.detector.detect(source) {
            Ok(pages) => pages,
            Err(err) => {
                log::warn!("Error extracting tables from {}: {}", source.filename(), err);
                return Vec::new();
            }
        };

        let mut tables = Vec::new();
        for (page_index, page_tables) in pages.iter().enumerate() {
            for (table_index, raw) in page_tables.iter().enumerate() {
                if let Some(table) =
                    normalize_table(page_index as u32 + 1, table_index as u32 + 1, raw)
                {
                    tables.push(table);
                }
            }
        }
        log::info!("Extracted {} tables from {}", tables.len(), source.filename());
        tables
    }
}

/// Turn a raw table into header-keyed rows. Needs a header row plus at least
/// one data row.
pub fn normalize_table(page: u32, table_index: u32, raw: &RawTable) -> Option<TableRecord> {
    if raw.len() < 2 {
        return None;
    }

    let headers: Vec<String> = raw[0]
        .iter()
        .filter_map(|cell| cell.as_deref())
        .filter(|cell| !cell.is_empty())
        .map(|cell| cell.trim().to_string())
        .collect();

    let rows = raw[1..]
        .iter()
        .map(|row| {
            let mut mapped = IndexMap::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                let value = cell.as_deref().map(str::trim).unwrap_or_default();
                mapped.insert(header.clone(), value.to_string());
            }
            mapped
        })
        .collect();

    Some(TableRecord {
        page,
        table_index,
        headers,
        rows,
    })
}

/// A cell of layout text: start/end are char columns.
#[derive(Debug, Clone, PartialEq)]
struct Cell {
    start: usize,
    end: usize,
    text: String,
}

/// Find table regions in one page of `pdftotext -layout` output.
pub fn detect_page_tables(page_text: &str) -> Vec<RawTable> {
    let mut tables = Vec::new();
    let mut region: Vec<Vec<Cell>> = Vec::new();

    for line in page_text.lines() {
        let cells = split_cells(line);
        if cells.len() >= 2 {
            region.push(cells);
        } else {
            flush_region(&mut region, &mut tables);
        }
    }
    flush_region(&mut region, &mut tables);
    tables
}

fn flush_region(region: &mut Vec<Vec<Cell>>, tables: &mut Vec<RawTable>) {
    if region.len() >= 2 {
        tables.push(align_region(region));
    }
    region.clear();
}

fn align_region(region: &[Vec<Cell>]) -> RawTable {
    let header = &region[0];
    let mut table: RawTable = vec![header.iter().map(|c| Some(c.text.clone())).collect()];

    for cells in &region[1..] {
        let mut row: Vec<Option<String>> = vec![None; header.len()];
        for cell in cells {
            let column = nearest_column(header, cell);
            row[column] = Some(match row[column].take() {
                Some(existing) => format!("{} {}", existing, cell.text),
                None => cell.text.clone(),
            });
        }
        table.push(row);
    }
    table
}

fn nearest_column(header: &[Cell], cell: &Cell) -> usize {
    let overlap = |h: &Cell| cell.end.min(h.end) as isize - cell.start.max(h.start) as isize;
    let center = |start: usize, end: usize| (start + end) as isize;

    let best_overlap = header
        .iter()
        .enumerate()
        .map(|(i, h)| (i, overlap(h)))
        .filter(|(_, o)| *o > 0)
        .max_by_key(|(_, o)| *o);
    if let Some((i, _)) = best_overlap {
        return i;
    }

    header
        .iter()
        .enumerate()
        .min_by_key(|(_, h)| (center(h.start, h.end) - center(cell.start, cell.end)).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Split at runs of two or more spaces, or at any tab.
fn split_cells(line: &str) -> Vec<Cell> {
    let chars: Vec<char> = line.trim_end().chars().collect();
    let mut cells = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i;
        while end < chars.len() {
            if chars[end].is_whitespace() {
                let gap = chars[end..].iter().take_while(|c| c.is_whitespace()).count();
                if gap >= 2 || chars[end] == '\t' {
                    break;
                }
                end += gap;
            } else {
                end += 1;
            }
        }
        cells.push(Cell {
            start,
            end,
            text: chars[start..end].iter().collect(),
        });
        i = end;
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DonorscanError;

    fn raw(rows: &[&[Option<&str>]]) -> RawTable {
        rows.iter()
            .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
            .collect()
    }

    #[test]
    fn test_normalize_requires_data_row() {
        let table = raw(&[&[Some("Name"), Some("Amount")]]);
        assert!(normalize_table(1, 1, &table).is_none());
    }

    #[test]
    fn test_normalize_headers_and_cells() {
        let table = raw(&[
            &[Some(" Name "), None, Some(""), Some("Amount"), Some("  ")],
            &[Some(" Alice "), Some("100"), Some("x"), None, Some("extra"), Some("dropped")],
            &[Some("Bob")],
        ]);
        let record = normalize_table(2, 3, &table).unwrap();

        assert_eq!(record.page, 2);
        assert_eq!(record.table_index, 3);
        assert_eq!(record.headers, vec!["Name", "Amount", ""]);

        // Cells align with the surviving headers by position
        let first = &record.rows[0];
        assert_eq!(first.len(), 3);
        assert_eq!(first["Name"], "Alice");
        assert_eq!(first["Amount"], "100");
        assert_eq!(first[""], "x");

        let second = &record.rows[1];
        assert_eq!(second.len(), 1);
        assert_eq!(second["Name"], "Bob");
        assert!(second.get("Amount").is_none());
    }

    #[test]
    fn test_duplicate_headers_keep_last_value() {
        let table = raw(&[
            &[Some("Amount"), Some("Amount")],
            &[Some("10"), Some("20")],
        ]);
        let record = normalize_table(1, 1, &table).unwrap();
        assert_eq!(record.headers, vec!["Amount", "Amount"]);
        assert_eq!(record.rows[0].len(), 1);
        assert_eq!(record.rows[0]["Amount"], "20");
    }

    #[test]
    fn test_split_cells() {
        let cells = split_cells("John Smith      $1,200.00   2024-03-01");
        let texts: Vec<&str> = cells.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["John Smith", "$1,200.00", "2024-03-01"]);
        assert_eq!(cells[0].start, 0);
        assert_eq!(cells[1].start, 16);
    }

    #[test]
    fn test_detect_page_tables() {
        let page = "\
Annual Donation Report

Name            Amount      Date
Alice           100         2024-01-01
Bob             200

Thank you to all our supporters.
";
        let tables = detect_page_tables(page);
        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0],
            raw(&[
                &[Some("Name"), Some("Amount"), Some("Date")],
                &[Some("Alice"), Some("100"), Some("2024-01-01")],
                &[Some("Bob"), Some("200"), None],
            ])
        );
    }

    #[test]
    fn test_right_aligned_amounts_find_their_column() {
        let page = "\
Donor Name          Donation
Maria Lopez           250.00
Community Trust     1,500.00
";
        let tables = detect_page_tables(page);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0][1], vec![Some("Maria Lopez".to_string()), Some("250.00".to_string())]);
        assert_eq!(tables[0][2][1].as_deref(), Some("1,500.00"));
    }

    #[test]
    fn test_prose_has_no_tables() {
        let page = "This is ordinary prose.\nIt has single spaces only.\n";
        assert!(detect_page_tables(page).is_empty());
    }

    struct FixedDetector(Vec<Vec<RawTable>>);

    impl TableDetector for FixedDetector {
        fn detect(&self, _source: &SourceDocument) -> Result<Vec<Vec<RawTable>>> {
            Ok(self.0.clone())
        }
    }

    struct FailingDetector;

    impl TableDetector for FailingDetector {
        fn detect(&self, _source: &SourceDocument) -> Result<Vec<Vec<RawTable>>> {
            Err(DonorscanError::tool("pdftotext", "crashed"))
        }
    }

    #[test]
    fn test_numbering_is_per_page() {
        let two_rows = raw(&[&[Some("A"), Some("B")], &[Some("1"), Some("2")]]);
        let one_row = raw(&[&[Some("A"), Some("B")]]);
        let detector = FixedDetector(vec![
            vec![two_rows.clone(), one_row, two_rows.clone()],
            vec![],
            vec![two_rows],
        ]);
        let source = SourceDocument::from_bytes("t.pdf", Vec::new());

        let tables = TableExtractor::with_detector(Box::new(detector)).extract_tables(&source);
        let positions: Vec<(u32, u32)> = tables.iter().map(|t| (t.page, t.table_index)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 3), (3, 1)]);
    }

    #[test]
    fn test_detector_failure_yields_no_tables() {
        let source = SourceDocument::from_bytes("t.pdf", Vec::new());
        let tables = TableExtractor::with_detector(Box::new(FailingDetector)).extract_tables(&source);
        assert!(tables.is_empty());
    }

    #[test]
    fn test_serializes_table_number() {
        let table = raw(&[&[Some("Name")], &[Some("Ann")]]);
        let record = normalize_table(1, 1, &table).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["table_number"], 1);
        assert_eq!(json["rows"][0]["Name"], "Ann");
    }
}
