use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use tracing::debug;

use crate::core::record::{Dataset, Record, Value};
use crate::parsing::ReadError;

/// Read the first worksheet of a workbook.
///
/// The first row is the header. Cells inside the used range that hold nothing
/// read as empty text, numeric cells as numbers.
///
/// # Errors
///
/// Returns `ReadError::Xlsx` if the workbook cannot be opened or parsed, or
/// `ReadError::EmptyWorkbook` if it has no worksheets.
pub fn read_file(path: &Path) -> Result<Dataset, ReadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ReadError::EmptyWorkbook)??;

    let mut rows = range.rows();
    let fields: Vec<String> = match rows.next() {
        Some(header) => header.iter().map(|c| cell_value(c).to_string()).collect(),
        None => return Ok(Dataset::default()),
    };

    let records: Vec<Record> = rows
        .map(|row| {
            fields
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let value = row.get(i).map_or(Value::Text(String::new()), cell_value);
                    (name.clone(), value)
                })
                .collect()
        })
        .collect();

    debug!(
        "Read {} rows with {} fields from {}",
        records.len(),
        fields.len(),
        path.display()
    );
    Ok(Dataset::new(fields, records))
}

#[allow(clippy::cast_precision_loss)] // Integer cells are enrichment counts
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Number(*i as f64),
        Data::Float(f) => Value::Number(*f),
        Data::String(s) => Value::Text(s.clone()),
        Data::Empty => Value::Text(String::new()),
        other => Value::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(cell_value(&Data::Int(4)), Value::Number(4.0));
        assert_eq!(cell_value(&Data::Float(2.5)), Value::Number(2.5));
        assert_eq!(
            cell_value(&Data::String("ACGT".into())),
            Value::from("ACGT")
        );
        assert_eq!(cell_value(&Data::Empty), Value::Text(String::new()));
    }

    #[test]
    fn test_missing_workbook_is_an_error() {
        let result = read_file(Path::new("/definitely/missing/book.xlsx"));
        assert!(result.is_err());
    }
}
