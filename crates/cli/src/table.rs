//! Plain-text table for terminal output.

use sheetsift_sheet::Sheet;

/// Widest column printed, in characters
const MAX_COLUMN_WIDTH: usize = 32;

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

/// Format a sheet as aligned columns with a header rule
pub fn format_text_table(sheet: &Sheet) -> String {
    if sheet.width() == 0 {
        return "(no columns)".to_string();
    }

    let body: Vec<Vec<String>> = sheet
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| cell.display_text()).collect())
        .collect();

    let widths: Vec<usize> = sheet
        .headers()
        .iter()
        .enumerate()
        .map(|(col, header)| {
            body.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .clamp(1, MAX_COLUMN_WIDTH)
        })
        .collect();

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", clip(cell, w)))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![
        line(sheet.headers()),
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    ];
    if body.is_empty() {
        out.push("(no matching rows)".to_string());
    } else {
        out.extend(body.iter().map(|row| line(row.as_slice())));
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheetsift_sheet::CellValue;

    #[test]
    fn test_format_text_table() {
        let sheet = Sheet::from_data(vec![
            vec![CellValue::from("Name"), CellValue::from("Phone")],
            vec![CellValue::from("Ann"), CellValue::Null],
            vec![CellValue::from("Bartholomew"), CellValue::from("555")],
        ]);

        let expected = "\
Name        | Phone
------------+------
Ann         | NULL
Bartholomew | 555";
        assert_eq!(format_text_table(&sheet), expected);
    }

    #[test]
    fn test_empty_result() {
        let sheet = Sheet::new("s", vec!["a".to_string()]);
        assert!(format_text_table(&sheet).ends_with("(no matching rows)"));
        assert_eq!(format_text_table(&Sheet::default()), "(no columns)");
    }

    #[test]
    fn test_long_cells_clipped() {
        let sheet = Sheet::from_data(vec![vec!["h".to_string()], vec!["x".repeat(50)]]);
        let text = format_text_table(&sheet);
        let last = text.lines().last().unwrap();
        assert_eq!(last.chars().count(), MAX_COLUMN_WIDTH);
        assert!(last.ends_with('~'));
    }
}
