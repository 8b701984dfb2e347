//! Sheet model for sheetsift
//!
//! Loads the first worksheet of a spreadsheet (or a CSV / HTML table) into a
//! header-keyed [`Sheet`], filters its rows on null / non-null checks across
//! columns addressed by spreadsheet letters, and renders the result as HTML.
//!
//! # Examples
//!
//! ## Filtering rows
//!
//! ```
//! use sheetsift_sheet::{parse_column_list, CellValue, Combinator, Condition, RowFilter, Sheet};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec![CellValue::from("Name"), CellValue::from("Email"), CellValue::from("Phone")],
//!     vec![CellValue::from("Alice"), CellValue::Null, CellValue::Null],
//!     vec![CellValue::from("Bob"), CellValue::from("bob@example.com"), CellValue::Null],
//! ]);
//!
//! let filter = RowFilter::new(
//!     parse_column_list("B,C").unwrap(),
//!     Combinator::All,
//!     Condition::IsNull,
//! );
//! let missing_contact = sheet.filtered(&filter).unwrap();
//!
//! assert_eq!(missing_contact.row_count(), 1);
//! assert_eq!(missing_contact.cell(0, 0).unwrap(), &CellValue::from("Alice"));
//! ```
//!
//! ## Rendering
//!
//! ```
//! use sheetsift_sheet::{render_table, Sheet};
//!
//! let sheet = Sheet::from_data(vec![vec!["a"], vec!["1"]]);
//! assert!(render_table(&sheet).contains("<th>a</th>"));
//! ```
//!
//! ## Loading from a workbook
//!
//! ```no_run
//! use sheetsift_sheet::Sheet;
//!
//! let sheet = Sheet::load("report.xlsx").unwrap();
//! ```

mod cell;
mod column;
mod csv;
mod error;
mod filter;
mod html;
mod load;
mod sheet;
mod xlsx;

pub use cell::{CellValue, NULL_DISPLAY};
pub use column::{column_index, column_letters, parse_column_list, ColumnRef};
pub use csv::CsvOptions;
pub use error::{Result, SheetError};
pub use filter::{Combinator, Condition, FilterOutcome, RowFilter};
pub use html::{escape_html, render_document, render_table, NO_DATA_HTML};
pub use load::SourceKind;
pub use sheet::Sheet;
pub use xlsx::{workbook_sheet_names, workbook_sheet_names_from_bytes, EXPORT_SHEET_NAME};
