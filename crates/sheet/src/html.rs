//! HTML table rendering and import
//!
//! Rendering mirrors what a browser shows for the table view: a header row of
//! `<th>` cells, one `<tr>` per data row, and `NULL` for empty cells. Text is
//! escaped, so cell content never turns into markup.
//!
//! Import reads the first `<table>` of a document back into a [`Sheet`]. Cells
//! reading `NULL` load as nulls, which makes a rendered view loadable again.

use crate::cell::{CellValue, NULL_DISPLAY};
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use scraper::{ElementRef, Html, Selector};
use std::fmt::Write as _;
use std::path::Path;

/// Markup shown in place of a table when there are no rows.
pub const NO_DATA_HTML: &str = "<p>No data available</p>";

const STYLESHEET: &str = "\
body { font-family: sans-serif; margin: 1.5rem; }
table { border-collapse: collapse; }
th, td { border: 1px solid #999; padding: 4px 8px; text-align: left; }
th { background: #e6e6e6; }
.caption { color: #555; margin-bottom: 0.75rem; }
";

/// Escape text for use in element content and attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Render a sheet as an HTML `<table>` fragment.
///
/// A sheet without data rows renders [`NO_DATA_HTML`] instead.
#[must_use]
pub fn render_table(sheet: &Sheet) -> String {
    if sheet.is_empty() {
        return NO_DATA_HTML.to_string();
    }

    let mut html = String::from("<table>\n<tr>");
    for header in sheet.headers() {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr>\n");

    for row in sheet.rows() {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(&cell.display_text()));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</table>");
    html
}

/// Render a complete HTML page around the table view
#[must_use]
pub fn render_document(sheet: &Sheet, title: &str) -> String {
    let title = escape_html(title);
    let caption = format!(
        "{} · {} rows × {} columns",
        escape_html(sheet.name()),
        sheet.row_count(),
        sheet.width()
    );

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n{STYLESHEET}</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <div class=\"caption\">{caption}</div>\n<div id=\"sheet-content\">\n{table}\n</div>\n\
         </body>\n</html>\n",
        table = render_table(sheet),
    )
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SheetError::Parse(format!("bad selector '{css}': {e:?}")))
}

/// Parse rendered cell text back into a value
fn parse_cell_text(text: &str) -> CellValue {
    if text == NULL_DISPLAY {
        CellValue::Null
    } else {
        CellValue::parse(text)
    }
}

fn table_to_grid(table: ElementRef<'_>) -> Result<Vec<Vec<CellValue>>> {
    let row_selector = selector("tr")?;
    let cell_selector = selector("th, td")?;

    let mut grid = Vec::new();
    for row in table.select(&row_selector) {
        let mut cells = Vec::new();
        for cell in row.select(&cell_selector) {
            let text = cell.text().collect::<String>().trim().to_string();
            let value = if cell.value().name() == "th" {
                CellValue::String(text)
            } else {
                parse_cell_text(&text)
            };

            let colspan = cell
                .value()
                .attr("colspan")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(1)
                .max(1);
            cells.extend(std::iter::repeat(value).take(colspan));
        }
        grid.push(cells);
    }
    Ok(grid)
}

impl Sheet {
    /// Load the first `<table>` of an HTML document
    pub fn from_html_str(html_content: &str) -> Result<Self> {
        let document = Html::parse_document(html_content);
        let table_selector = selector("table")?;
        let table = document
            .select(&table_selector)
            .next()
            .ok_or_else(|| SheetError::Parse("No table found in HTML".to_string()))?;

        Ok(Sheet::from_grid("Sheet1", table_to_grid(table)?))
    }

    /// Load the first `<table>` of an HTML file
    pub fn from_html_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut sheet = Self::from_html_str(&contents)?;
        if let Some(stem) = path.as_ref().file_stem().and_then(|s| s.to_str()) {
            sheet.set_name(stem);
        }
        Ok(sheet)
    }

    /// Render this sheet as an HTML table fragment
    #[must_use]
    pub fn to_html_table(&self) -> String {
        render_table(self)
    }
}
