//! CDX response parsing.
//!
//! A JSON response is an array whose first element is the header row. Data
//! rows carry `original, timestamp, statuscode, mimetype`; when a resume key
//! was requested the server appends an empty row and a one-cell row holding
//! the key. The continuation cursor is read from the last cell of the last
//! row.

use crate::error::Result;
use serde_json::Value;
use std::fmt;

/// Minimum number of cells in a data row
pub const MIN_ROW_CELLS: usize = 4;

/// Placeholder the index may send instead of a real key
const NULL_CURSOR: &str = "null";

/// One capture record from the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRow {
    pub original_url: String,
    pub mime_type: String,
}

/// Opaque continuation token for the next page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(String);

impl Cursor {
    /// Interpret a response cell as a cursor.
    ///
    /// Empty cells and the literal `"null"` mean there are no more pages.
    pub fn from_cell(cell: &str) -> Option<Self> {
        if cell.is_empty() || cell == NULL_CURSOR {
            None
        } else {
            Some(Self(cell.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rows and continuation cursor of one response page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivePage {
    pub rows: Vec<ArchiveRow>,
    pub cursor: Option<Cursor>,
}

/// Outcome of parsing one response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageParse {
    Page(ArchivePage),
    /// Empty body, non-array JSON, or a header with no rows
    End,
}

/// Parse a raw CDX response body.
///
/// Only invalid JSON is an error, including a body of nothing but whitespace.
/// A zero-length body or a short response means the index has no more data,
/// and malformed rows are skipped.
pub fn parse_page(body: &str) -> Result<PageParse> {
    if body.is_empty() {
        return Ok(PageParse::End);
    }

    let root: Value = serde_json::from_str(body)?;
    let rows = match root.as_array() {
        Some(rows) if rows.len() >= 2 => rows,
        _ => return Ok(PageParse::End),
    };

    let page = ArchivePage {
        rows: rows[1..].iter().filter_map(parse_row).collect(),
        cursor: rows.last().and_then(cursor_cell).and_then(Cursor::from_cell),
    };

    Ok(PageParse::Page(page))
}

fn parse_row(row: &Value) -> Option<ArchiveRow> {
    let cells = row.as_array().filter(|cells| cells.len() >= MIN_ROW_CELLS)?;
    let original_url = cells[0].as_str()?;
    let mime_type = cells[3].as_str().unwrap_or_default();

    Some(ArchiveRow {
        original_url: original_url.to_string(),
        mime_type: mime_type.to_string(),
    })
}

fn cursor_cell(row: &Value) -> Option<&str> {
    row.as_array()?.last()?.as_str()
}
