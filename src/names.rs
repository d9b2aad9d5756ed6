//! Readers that turn an uploaded name-list file into the ordered list of
//! output names the splitter expects.

use crate::error::{Result, SplitError};
use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use clap::ValueEnum;
use rmcp::schemars;
use serde::Deserialize;
use std::io::Cursor;
use std::path::Path;

const FILENAME_COLUMN: &str = "filename";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NameListFormat {
    /// Plain text, one name per line
    Lines,
    /// Spreadsheet with a `filename` column
    Table,
}

impl NameListFormat {
    /// Pick a format from a file extension (`txt` or `xlsx`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("txt") => Ok(NameListFormat::Lines),
            Some("xlsx") => Ok(NameListFormat::Table),
            _ => Err(SplitError::UnsupportedNameListFormat(format!(
                "{} is neither a .txt nor an .xlsx file",
                path.display()
            ))),
        }
    }

    pub fn read(self, bytes: &[u8]) -> Result<Vec<String>> {
        match self {
            NameListFormat::Lines => Ok(names_from_lines(bytes)),
            NameListFormat::Table => names_from_xlsx(bytes),
        }
    }
}

/// Every non-blank line, trimmed. Invalid UTF-8 is replaced, not rejected.
pub fn names_from_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn names_from_xlsx(bytes: &[u8]) -> Result<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).map_err(|e| {
        SplitError::UnsupportedNameListFormat(format!("cannot read workbook: {}", e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            SplitError::UnsupportedNameListFormat("workbook has no worksheets".to_string())
        })?
        .map_err(|e| {
            SplitError::UnsupportedNameListFormat(format!("cannot read worksheet: {}", e))
        })?;

    names_from_range(&range)
}

/// Read the `filename` column of a sheet whose first row is the header.
pub fn names_from_range(range: &Range<Data>) -> Result<Vec<String>> {
    let mut rows = range.rows();
    let header = rows.next().unwrap_or_default();

    let column = header
        .iter()
        .position(|cell| cell.to_string().trim() == FILENAME_COLUMN)
        .ok_or_else(|| {
            SplitError::UnsupportedNameListFormat(format!(
                "table must contain a column named '{}'",
                FILENAME_COLUMN
            ))
        })?;

    Ok(rows
        .filter_map(|row| row.get(column))
        .map(|cell| cell.to_string().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect())
}
