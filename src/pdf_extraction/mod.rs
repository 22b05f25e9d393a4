// PDF extraction module
pub mod direct;
pub mod extraction_router;
pub mod layout;
pub mod ocr_engine;
pub mod poppler;
pub mod source;
pub mod sufficiency;
pub mod tables;

pub use direct::{get_page_count, DirectExtractor};
pub use extraction_router::{
    join_pages, ExtractionCascade, ExtractionMethod, ExtractionResult, TextExtractor,
};
pub use layout::LayoutExtractor;
pub use ocr_engine::OcrExtractor;
pub use source::SourceDocument;
pub use sufficiency::is_sufficient;
pub use tables::{
    detect_page_tables, normalize_table, LayoutTableDetector, RawTable, TableDetector,
    TableExtractor, TableRecord,
};
