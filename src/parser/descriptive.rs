//! Descriptive metadata parser
//!
//! Every worksheet is a table whose first row is the header. Two layouts are
//! accepted:
//!
//! - Column layout: each following non-blank row is one named record; the
//!   `name` column identifies it and the remaining columns are Dublin Core
//!   elements.
//! - Element/value layout: the header has `dc_element` and `dc_value`
//!   columns. The whole sheet is one record named after the sheet, and each
//!   row holds one element and its value. Rows with a blank element or value
//!   are skipped; an element may repeat.
//!
//! Element names are matched after trimming and lower-casing, with an optional
//! `dc:` or `dc_` prefix, so `Title`, `dc:title` and `DC_TITLE` all mean `title`.
//!
//! Each record is also rendered into an RDF/Dublin Core fragment that templates
//! embed verbatim.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::entities::{is_dublin_core_element, DescriptiveRecord};
use crate::domain::value_objects::ContentDigest;
use crate::infrastructure::workbook::{read_workbook, Sheet, WorkbookError};
use crate::template::escaping::xml_text;

/// Column holding the record name
pub const NAME_COLUMN: &str = "name";

/// Element column of the element/value layout
pub const ELEMENT_COLUMN: &str = "dc_element";

/// Value column of the element/value layout
pub const VALUE_COLUMN: &str = "dc_value";

const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Descriptive source failures, located by sheet and row
#[derive(Error, Debug)]
pub enum DescriptiveError {
    /// Header outside the Dublin Core vocabulary
    #[error("unknown field '{header}' in sheet '{sheet}' of {file}")]
    UnknownField {
        header: String,
        sheet: String,
        file: PathBuf,
    },

    /// Two headers map to the same element
    #[error("field '{field}' appears twice in sheet '{sheet}' of {file}")]
    DuplicateField {
        field: String,
        sheet: String,
        file: PathBuf,
    },

    /// Data row without a name (or sheet without a name column)
    #[error("record without a name in sheet '{sheet}' row {row} of {file}")]
    MissingName {
        sheet: String,
        row: usize,
        file: PathBuf,
    },

    /// Record name already used
    #[error("duplicate record name '{name}' in sheet '{sheet}' row {row} of {file}")]
    DuplicateName {
        name: String,
        sheet: String,
        row: usize,
        file: PathBuf,
    },

    #[error(transparent)]
    Workbook(#[from] WorkbookError),
}

/// Read and parse a descriptive workbook
pub fn parse_workbook(path: &Path) -> Result<Vec<DescriptiveRecord>, DescriptiveError> {
    let sheets = read_workbook(path)?;
    parse_sheets(&sheets, path)
}

/// Parse already-loaded tables; `file` is used in error messages only
pub fn parse_sheets(sheets: &[Sheet], file: &Path) -> Result<Vec<DescriptiveRecord>, DescriptiveError> {
    let mut records = Vec::new();
    let mut names: HashSet<String> = HashSet::new();

    for sheet in sheets {
        let Some((header, data)) = sheet.rows.split_first() else {
            continue;
        };

        let sheet_records = match element_value_columns(header, sheet, file)? {
            Some((element, value)) => vec![parse_element_sheet(data, element, value, sheet, file)?],
            None => parse_column_sheet(header, data, sheet, file)?,
        };

        for (row_number, record) in sheet_records {
            if !names.insert(record.name().to_string()) {
                return Err(DescriptiveError::DuplicateName {
                    name: record.name().to_string(),
                    sheet: sheet.name.clone(),
                    row: row_number,
                    file: file.to_path_buf(),
                });
            }

            debug!(
                "Descriptive record '{}' with {} fields",
                record.name(),
                record.fields().len()
            );
            records.push(record);
        }
    }

    Ok(records)
}

/// One record per non-blank row, with the spreadsheet row it came from
fn parse_column_sheet(
    header: &[String],
    data: &[Vec<String>],
    sheet: &Sheet,
    file: &Path,
) -> Result<Vec<(usize, DescriptiveRecord)>, DescriptiveError> {
    let columns = header_columns(header, sheet, file)?;
    let mut records = Vec::new();

    for (offset, row) in data.iter().enumerate() {
        let row_number = sheet.row_number(offset + 1);
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        records.push((row_number, parse_row(row, &columns, sheet, row_number, file)?));
    }

    Ok(records)
}

/// Positions of the element and value columns, if the header uses that layout
///
/// Any other non-empty header in such a sheet is an unknown field.
fn element_value_columns(
    header: &[String],
    sheet: &Sheet,
    file: &Path,
) -> Result<Option<(usize, usize)>, DescriptiveError> {
    let position = |wanted: &str| {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    };
    let (Some(element), Some(value)) = (position(ELEMENT_COLUMN), position(VALUE_COLUMN)) else {
        return Ok(None);
    };

    if let Some(extra) = header
        .iter()
        .enumerate()
        .find(|(i, h)| *i != element && *i != value && !h.trim().is_empty())
    {
        return Err(DescriptiveError::UnknownField {
            header: extra.1.trim().to_string(),
            sheet: sheet.name.clone(),
            file: file.to_path_buf(),
        });
    }
    Ok(Some((element, value)))
}

/// The whole sheet as one record named after the sheet
fn parse_element_sheet(
    data: &[Vec<String>],
    element_column: usize,
    value_column: usize,
    sheet: &Sheet,
    file: &Path,
) -> Result<(usize, DescriptiveRecord), DescriptiveError> {
    let name = sheet.name.trim();
    if name.is_empty() {
        return Err(DescriptiveError::MissingName {
            sheet: sheet.name.clone(),
            row: sheet.row_number(0),
            file: file.to_path_buf(),
        });
    }

    let cell = |row: &[String], i: usize| row.get(i).map(|c| c.trim().to_string()).unwrap_or_default();
    let mut fields = Vec::new();

    for (offset, row) in data.iter().enumerate() {
        let (raw, value) = (cell(row, element_column), cell(row, value_column));
        if raw.is_empty() || value.is_empty() {
            debug!(
                "Skipping row {} of sheet '{}': blank element or value",
                sheet.row_number(offset + 1),
                sheet.name
            );
            continue;
        }
        let element = normalize_header(&raw);
        if !is_dublin_core_element(&element) {
            return Err(DescriptiveError::UnknownField {
                header: raw,
                sheet: sheet.name.clone(),
                file: file.to_path_buf(),
            });
        }
        fields.push((element, value));
    }

    let xml = rdf_fragment(name, &fields);
    Ok((
        sheet.row_number(0),
        DescriptiveRecord::new(name.to_string(), fields, xml),
    ))
}

/// What a header column maps to
#[derive(Debug, Clone, PartialEq, Eq)]
enum Column {
    Name,
    Element(String),
    Ignored,
}

fn header_columns(header: &[String], sheet: &Sheet, file: &Path) -> Result<Vec<Column>, DescriptiveError> {
    let mut columns = Vec::with_capacity(header.len());
    let mut seen: HashSet<String> = HashSet::new();

    for raw in header {
        let field = normalize_header(raw);
        let column = if field.is_empty() {
            Column::Ignored
        } else if field == NAME_COLUMN {
            Column::Name
        } else if is_dublin_core_element(&field) {
            Column::Element(field.clone())
        } else {
            return Err(DescriptiveError::UnknownField {
                header: raw.trim().to_string(),
                sheet: sheet.name.clone(),
                file: file.to_path_buf(),
            });
        };

        if column != Column::Ignored && !seen.insert(field.clone()) {
            return Err(DescriptiveError::DuplicateField {
                field,
                sheet: sheet.name.clone(),
                file: file.to_path_buf(),
            });
        }
        columns.push(column);
    }

    Ok(columns)
}

fn parse_row(
    row: &[String],
    columns: &[Column],
    sheet: &Sheet,
    row_number: usize,
    file: &Path,
) -> Result<DescriptiveRecord, DescriptiveError> {
    let mut name = None;
    let mut fields = Vec::new();

    for (column, cell) in columns.iter().zip(row) {
        let value = cell.trim();
        if value.is_empty() {
            continue;
        }
        match column {
            Column::Name => name = Some(value.to_string()),
            Column::Element(element) => fields.push((element.clone(), value.to_string())),
            Column::Ignored => {}
        }
    }

    let name = name.ok_or_else(|| DescriptiveError::MissingName {
        sheet: sheet.name.clone(),
        row: row_number,
        file: file.to_path_buf(),
    })?;

    let xml = rdf_fragment(&name, &fields);
    Ok(DescriptiveRecord::new(name, fields, xml))
}

/// `Title`, `dc:title`, ` DC_TITLE ` -> `title`
pub fn normalize_header(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    lower
        .strip_prefix("dc:")
        .or_else(|| lower.strip_prefix("dc_"))
        .unwrap_or(&lower)
        .trim()
        .to_string()
}

/// Serialize one record as RDF/Dublin Core
///
/// The description id is `_` plus the first seven hex digits of the SHA-256 of
/// the name and fields, so the same record always gets the same id.
pub fn rdf_fragment(name: &str, fields: &[(String, String)]) -> String {
    let mut seed = String::from(name);
    for (element, value) in fields {
        seed.push('\n');
        seed.push_str(element);
        seed.push('=');
        seed.push_str(value);
    }
    let id = ContentDigest::from_bytes(seed.as_bytes());

    let mut xml = format!(
        "<rdf:RDF xmlns:rdf=\"{}\" xmlns:dc=\"{}\">\n  <rdf:Description rdf:ID=\"_{}\">\n",
        RDF_NAMESPACE,
        DC_NAMESPACE,
        id.short(7)
    );
    for (element, value) in fields {
        xml.push_str(&format!(
            "    <dc:{0}>{1}</dc:{0}>\n",
            element,
            xml_text(value)
        ));
    }
    xml.push_str("  </rdf:Description>\n</rdf:RDF>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::wellformed::check_well_formed;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn parse(sheets: &[Sheet]) -> Result<Vec<DescriptiveRecord>, DescriptiveError> {
        parse_sheets(sheets, Path::new("meta.xlsx"))
    }

    #[test]
    fn rows_become_records_in_order() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![
                row(&["name", "Title", "dc:creator", "DC_DATE"]),
                row(&["acct001", "Mailbox of J. Doe", "State Archives", "2018"]),
                row(&["", "", "", ""]),
                row(&["acct002", "Second", "", ""]),
            ],
        );

        let records = parse(&[sheet]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "acct001");
        assert_eq!(records[0].field("title"), Some("Mailbox of J. Doe"));
        assert_eq!(records[0].field("creator"), Some("State Archives"));
        assert_eq!(records[0].field("date"), Some("2018"));
        assert_eq!(records[1].name(), "acct002");
        assert_eq!(records[1].fields().len(), 1);
    }

    #[test]
    fn unknown_header_is_named_in_error() {
        let sheet = Sheet::new("Sheet1", vec![row(&["name", "Author"]), row(&["a", "b"])]);
        let err = parse(&[sheet]).unwrap_err();
        assert!(matches!(err, DescriptiveError::UnknownField { ref header, .. } if header == "Author"));
        assert!(err.to_string().contains("'Author'"));
    }

    #[test]
    fn unknown_header_fails_even_without_data_rows() {
        let sheet = Sheet::new("Sheet1", vec![row(&["name", "notes"])]);
        assert!(parse(&[sheet]).is_err());
    }

    #[test]
    fn empty_name_cell_is_missing_name_with_row() {
        let sheet = Sheet::new(
            "Sheet1",
            vec![row(&["name", "title"]), row(&["a", "x"]), row(&["  ", "y"])],
        );
        let err = parse(&[sheet]).unwrap_err();
        match err {
            DescriptiveError::MissingName { row, sheet, .. } => {
                assert_eq!(row, 3);
                assert_eq!(sheet, "Sheet1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sheet_without_name_column_is_missing_name() {
        let sheet = Sheet::new("Sheet1", vec![row(&["title"]), row(&["x"])]);
        assert!(matches!(
            parse(&[sheet]).unwrap_err(),
            DescriptiveError::MissingName { row: 2, .. }
        ));
    }

    #[test]
    fn duplicate_names_across_sheets_fail() {
        let a = Sheet::new("A", vec![row(&["name"]), row(&["acct001"])]);
        let b = Sheet::new("B", vec![row(&["name"]), row(&["acct001"])]);
        assert!(matches!(
            parse(&[a, b]).unwrap_err(),
            DescriptiveError::DuplicateName { ref sheet, .. } if sheet == "B"
        ));
    }

    #[test]
    fn duplicate_field_columns_fail() {
        let sheet = Sheet::new("S", vec![row(&["name", "title", "dc:title"])]);
        assert!(matches!(
            parse(&[sheet]).unwrap_err(),
            DescriptiveError::DuplicateField { ref field, .. } if field == "title"
        ));
    }

    #[test]
    fn empty_headers_and_sheets_are_ignored() {
        let empty = Sheet::new("Empty", Vec::new());
        let sheet = Sheet::new("S", vec![row(&["name", "", "title"]), row(&["a", "junk", "t"])]);
        let records = parse(&[empty, sheet]).unwrap();
        assert_eq!(records[0].fields(), &[("title".to_string(), "t".to_string())]);
    }

    #[test]
    fn element_value_sheet_is_one_record_named_after_sheet() {
        let sheet = Sheet::new(
            "acct001_rdf",
            vec![
                row(&["dc_element", "dc_value"]),
                row(&["title", "Mailbox"]),
                row(&["creator", "State Archives"]),
                row(&["", "orphan value"]),
                row(&["dc:creator", "J. Doe"]),
            ],
        );

        let records = parse(&[sheet]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "acct001_rdf");
        assert_eq!(
            records[0].fields(),
            &[
                ("title".to_string(), "Mailbox".to_string()),
                ("creator".to_string(), "State Archives".to_string()),
                ("creator".to_string(), "J. Doe".to_string()),
            ]
        );
        assert!(records[0].xml().contains("<dc:title>Mailbox</dc:title>"));
    }

    #[test]
    fn element_value_sheet_rejects_unknown_element() {
        let sheet = Sheet::new(
            "acct001_rdf",
            vec![row(&["dc_element", "dc_value"]), row(&["author", "x"])],
        );
        let err = parse(&[sheet]).unwrap_err();
        assert!(matches!(err, DescriptiveError::UnknownField { ref header, .. } if header == "author"));
    }

    #[test]
    fn element_value_sheet_rejects_extra_columns() {
        let sheet = Sheet::new("rdf", vec![row(&["dc_element", "dc_value", "notes"])]);
        assert!(matches!(
            parse(&[sheet]).unwrap_err(),
            DescriptiveError::UnknownField { ref header, .. } if header == "notes"
        ));
    }

    #[test]
    fn both_layouts_share_one_name_space() {
        let columns = Sheet::new("Sheet1", vec![row(&["name", "title"]), row(&["acct001", "a"])]);
        let pairs = Sheet::new("acct001", vec![row(&["dc_element", "dc_value"]), row(&["title", "b"])]);
        assert!(matches!(
            parse(&[columns, pairs]).unwrap_err(),
            DescriptiveError::DuplicateName { ref sheet, .. } if sheet == "acct001"
        ));
    }

    #[test]
    fn fragment_is_escaped_and_well_formed() {
        let xml = rdf_fragment(
            "acct001",
            &[("title".to_string(), "R&D <mail>\u{1}".to_string())],
        );
        assert!(xml.contains("<dc:title>R&amp;D &lt;mail&gt;</dc:title>"));
        assert_eq!(check_well_formed(&xml), Ok(()));
    }

    #[test]
    fn fragment_id_is_deterministic() {
        let fields = vec![("title".to_string(), "x".to_string())];
        let a = rdf_fragment("acct001", &fields);
        let b = rdf_fragment("acct001", &fields);
        let c = rdf_fragment("acct002", &fields);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.contains("rdf:ID=\"_"));
    }

    #[test]
    fn normalize_header_forms() {
        assert_eq!(normalize_header(" Title "), "title");
        assert_eq!(normalize_header("dc:Creator"), "creator");
        assert_eq!(normalize_header("DC_DATE"), "date");
        assert_eq!(normalize_header("Name"), "name");
    }
}
