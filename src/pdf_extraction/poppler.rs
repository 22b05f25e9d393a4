// Thin wrappers around the poppler-utils / tesseract command line tools
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use crate::types::{DonorscanError, Result};

/// Run an external tool and fail on a non-zero exit status.
pub fn run_tool<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| DonorscanError::tool(program, format!("failed to start: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DonorscanError::tool(
            program,
            format!("exited with {}: {}", output.status, stderr.trim()),
        ));
    }
    Ok(output)
}

/// `pdftotext -layout <pdf> -`, split into pages.
pub fn pdftotext_layout(pdftotext: &str, pdf_path: &Path) -> Result<Vec<String>> {
    let output = run_tool(
        pdftotext,
        [
            OsStr::new("-layout"),
            OsStr::new("-enc"),
            OsStr::new("UTF-8"),
            pdf_path.as_os_str(),
            OsStr::new("-"),
        ],
    )?;
    Ok(split_pages(&String::from_utf8_lossy(&output.stdout)))
}

/// pdftotext ends every page with a form feed, including the last one.
pub fn split_pages(output: &str) -> Vec<String> {
    let mut pages: Vec<String> = output.split('\x0c').map(str::to_string).collect();
    if pages.len() > 1 && pages.last().is_some_and(|last| last.trim().is_empty()) {
        pages.pop();
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_drops_trailing_form_feed() {
        let pages = split_pages("page one\n\x0cpage two\n\x0c");
        assert_eq!(pages, vec!["page one\n".to_string(), "page two\n".to_string()]);
    }

    #[test]
    fn test_split_pages_keeps_blank_middle_pages() {
        let pages = split_pages("one\x0c\x0cthree\x0c");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1], "");
    }

    #[test]
    fn test_missing_tool_is_tool_error() {
        let err = run_tool("donorscan-no-such-tool", ["--version"]).unwrap_err();
        assert!(matches!(err, DonorscanError::Tool { .. }));
    }
}
