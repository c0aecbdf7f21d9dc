use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::core::record::{Record, Value};
use crate::output::{ExportError, Headers};

/// Name of the single worksheet in exported workbooks
pub const SHEET_NAME: &str = "Sheet 1";

/// Write rows to a single-sheet workbook.
///
/// Row 1 holds the titles. Cell types follow the value: numbers become
/// numeric cells, text becomes string cells and missing values stay blank.
///
/// # Errors
///
/// Returns `ExportError::Xlsx` if a cell cannot be written or the workbook
/// cannot be saved.
pub fn write_file(path: &Path, headers: &Headers, rows: &[Record]) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in headers.titles().enumerate() {
        worksheet.write_string(0, column_index(col)?, title)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_index = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, id) in headers.ids().enumerate() {
            if let Some(value) = row.get(id) {
                write_cell(worksheet, row_index, column_index(col)?, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn column_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<(), XlsxError> {
    match value {
        Value::Number(n) => {
            sheet.write_number(row, col, *n)?;
        }
        Value::Text(s) => {
            sheet.write_string(row, col, s)?;
        }
        Value::Missing => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing;

    #[test]
    fn test_written_workbook_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let headers = Headers::identity(["Aptamer", "S1", "S2"]);
        let rows = vec![
            Record::new()
                .with("Aptamer", "ACGT")
                .with("S1", 3.0)
                .with("S2", "12"),
            Record::new().with("Aptamer", "TTTT").with("S1", 8.0),
        ];
        write_file(&path, &headers, &rows).unwrap();

        let dataset = parsing::xlsx::read_file(&path).unwrap();
        assert_eq!(dataset.fields, vec!["Aptamer", "S1", "S2"]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records[0].get("S1"), Some(&Value::Number(3.0)));
        assert_eq!(dataset.records[0].get("S2"), Some(&Value::from("12")));
        // Blank cells read back as empty text
        assert_eq!(dataset.records[1].get("S2"), Some(&Value::Text(String::new())));
    }
}
