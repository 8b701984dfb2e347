use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Worksheet name used when exporting a single sheet
pub const EXPORT_SHEET_NAME: &str = "Sheet1";

fn workbook_error(e: impl std::fmt::Display) -> SheetError {
    SheetError::Workbook(e.to_string())
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Turn a worksheet range into a grid anchored at column A.
///
/// calamine trims leading empty columns from a range; they are put back so
/// that column letters match the spreadsheet's own.
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let lead = range.start().map_or(0, |(_, col)| col as usize);
    range
        .rows()
        .map(|row| {
            std::iter::repeat(CellValue::Null)
                .take(lead)
                .chain(row.iter().map(data_to_cell_value))
                .collect()
        })
        .collect()
}

fn read_sheet<RS: Read + Seek>(workbook: &mut Sheets<RS>, name: Option<&str>) -> Result<Sheet> {
    let names = workbook.sheet_names();
    let sheet_name = match name {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| SheetError::SheetNotFound {
                name: wanted.to_string(),
            })?,
        None => match names.first() {
            Some(first) => first.clone(),
            None => {
                tracing::warn!("workbook has no worksheets");
                return Ok(Sheet::default());
            }
        },
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(workbook_error)?;
    tracing::debug!(sheet = %sheet_name, size = ?range.get_size(), "read worksheet range");

    Ok(Sheet::from_grid(&sheet_name, range_to_grid(&range)))
}

impl Sheet {
    /// Load the first worksheet of a workbook (xlsx, xlsm, xlsb, xls, ods)
    pub fn from_workbook_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref()).map_err(workbook_error)?;
        read_sheet(&mut workbook, None)
    }

    /// Load a named worksheet from a workbook file
    pub fn from_workbook_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        let mut workbook = open_workbook_auto(path.as_ref()).map_err(workbook_error)?;
        read_sheet(&mut workbook, Some(sheet_name))
    }

    /// Load the first worksheet of a workbook held in memory
    pub fn from_workbook_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_workbook_bytes_sheet(bytes, None)
    }

    /// Load a worksheet from an in-memory workbook, the first one when `sheet_name` is `None`
    pub fn from_workbook_bytes_sheet(bytes: Vec<u8>, sheet_name: Option<&str>) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(workbook_error)?;
        read_sheet(&mut workbook, sheet_name)
    }

    /// Save the sheet to an Excel file: header row, then data rows
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref()).map_err(workbook_error)?;
        Ok(())
    }

    /// Encode the sheet as xlsx bytes
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        workbook.save_to_buffer().map_err(workbook_error)
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(EXPORT_SHEET_NAME)
            .map_err(workbook_error)?;
        self.write_to_worksheet(worksheet)?;
        Ok(workbook)
    }

    fn write_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        let bold = Format::new().set_bold();

        for (col_idx, header) in self.headers().iter().enumerate() {
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;
            worksheet
                .write_string_with_format(0, col_num, header, &bold)
                .map_err(workbook_error)?;
        }

        for (row_idx, row) in self.rows().iter().enumerate() {
            let row_num = u32::try_from(row_idx + 1)
                .map_err(|_| SheetError::Workbook("Row index overflow".to_string()))?;

            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = u16::try_from(col_idx)
                    .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;

                match cell {
                    CellValue::Null => {}
                    CellValue::Bool(b) => {
                        worksheet
                            .write_boolean(row_num, col_num, *b)
                            .map_err(workbook_error)?;
                    }
                    CellValue::Int(i) => {
                        // Excel stores all numbers as f64, so integers > 2^53 may lose precision
                        worksheet
                            .write_number(row_num, col_num, *i as f64)
                            .map_err(workbook_error)?;
                    }
                    CellValue::Float(f) => {
                        worksheet
                            .write_number(row_num, col_num, *f)
                            .map_err(workbook_error)?;
                    }
                    CellValue::String(s) => {
                        worksheet
                            .write_string(row_num, col_num, s)
                            .map_err(workbook_error)?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Worksheet names in a workbook file, in workbook order
pub fn workbook_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let workbook = open_workbook_auto(path.as_ref()).map_err(workbook_error)?;
    Ok(workbook.sheet_names())
}

/// Worksheet names in an in-memory workbook
pub fn workbook_sheet_names_from_bytes(bytes: Vec<u8>) -> Result<Vec<String>> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(workbook_error)?;
    Ok(workbook.sheet_names())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn people() -> Sheet {
        Sheet::from_data(vec![
            vec![CellValue::from("Name"), CellValue::from("Age"), CellValue::from("Active")],
            vec![CellValue::from("Alice"), CellValue::Int(30), CellValue::Bool(true)],
            vec![CellValue::from("Bob"), CellValue::Null, CellValue::Bool(false)],
        ])
    }

    #[test]
    fn test_xlsx_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.xlsx");

        people().save_as_xlsx(&path).unwrap();
        let loaded = Sheet::from_workbook_path(&path).unwrap();

        assert_eq!(loaded.name(), EXPORT_SHEET_NAME);
        assert_eq!(loaded.headers(), &["Name", "Age", "Active"]);
        assert_eq!(loaded.row_count(), 2);
        // Int becomes Float in Excel
        assert!(
            matches!(loaded.cell(0, 1).unwrap(), CellValue::Float(f) if (*f - 30.0).abs() < 0.01)
        );
        assert!(loaded.cell(1, 1).unwrap().is_null());
        assert_eq!(loaded.cell(1, 2).unwrap(), &CellValue::Bool(false));
    }

    #[test]
    fn test_xlsx_from_bytes() {
        let bytes = people().to_xlsx_bytes().unwrap();
        let loaded = Sheet::from_workbook_bytes(bytes).unwrap();
        assert_eq!(loaded.row_count(), 2);
        assert_eq!(loaded.cell(0, 0).unwrap(), &CellValue::from("Alice"));

        let bytes = people().to_xlsx_bytes().unwrap();
        assert_eq!(workbook_sheet_names_from_bytes(bytes).unwrap(), vec![EXPORT_SHEET_NAME]);
    }

    #[test]
    fn test_named_sheet_and_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("multi.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("First").unwrap();
        let second = workbook.add_worksheet().set_name("Second").unwrap();
        second.write_string(0, 0, "key").unwrap();
        second.write_number(1, 0, 7.0).unwrap();
        workbook.save(&path).unwrap();

        assert_eq!(workbook_sheet_names(&path).unwrap(), vec!["First", "Second"]);

        let sheet = Sheet::from_workbook_sheet(&path, "Second").unwrap();
        assert_eq!(sheet.name(), "Second");
        assert_eq!(sheet.headers(), &["key"]);

        let missing = Sheet::from_workbook_sheet(&path, "Third");
        assert!(matches!(missing, Err(SheetError::SheetNotFound { .. })));
    }

    #[test]
    fn test_leading_columns_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offset.xlsx");

        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(0, 2, "C-header").unwrap();
        ws.write_number(1, 2, 1.0).unwrap();
        workbook.save(&path).unwrap();

        let sheet = Sheet::from_workbook_path(&path).unwrap();
        assert_eq!(sheet.headers(), &["__EMPTY", "__EMPTY_1", "C-header"]);
    }

    #[test]
    fn test_missing_file() {
        assert!(Sheet::from_workbook_path("/non/existent/book.xlsx").is_err());
    }
}
