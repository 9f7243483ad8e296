//! Spreadsheet loading
//!
//! Reads every worksheet of an xlsx/xlsm/xls/ods workbook into plain string
//! tables so that the descriptive parser never deals with cell types.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use thiserror::Error;
use tracing::debug;

/// Workbook could not be opened or a sheet could not be read
#[derive(Error, Debug)]
#[error("cannot read workbook {path}: {source}")]
pub struct WorkbookError {
    pub path: PathBuf,
    #[source]
    pub source: calamine::Error,
}

/// One worksheet as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    /// Spreadsheet row number (1-based) of `rows[0]`
    pub first_row: usize,
    /// Cells as text, empty cells as `""`
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            first_row: 1,
            rows,
        }
    }

    /// Spreadsheet row number of `rows[index]`
    pub fn row_number(&self, index: usize) -> usize {
        self.first_row + index
    }
}

/// Load all worksheets in workbook order
pub fn read_workbook(path: &Path) -> Result<Vec<Sheet>, WorkbookError> {
    let wrap = |source| WorkbookError {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(wrap)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name).map_err(wrap)?;
        let first_row = range
            .start()
            .map(|(row, _)| row as usize + 1)
            .unwrap_or(1);
        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        debug!("Read sheet '{}' ({} rows)", name, rows.len());
        sheets.push(Sheet {
            name,
            first_row,
            rows,
        });
    }

    Ok(sheets)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
