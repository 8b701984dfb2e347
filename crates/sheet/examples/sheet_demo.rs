//! Demo of loading, filtering and rendering a sheet
//!
//! Run with: cargo run --example sheet_demo -p sheetsift-sheet

use sheetsift_sheet::{parse_column_list, CellValue, Combinator, Condition, RowFilter, Sheet};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Sheet Filter Demo ===\n");

    let temp_dir = env::temp_dir();

    let sheet = Sheet::from_data(vec![
        vec![
            CellValue::from("Name"),
            CellValue::from("Email"),
            CellValue::from("Phone"),
        ],
        vec![CellValue::from("Alice"), CellValue::Null, CellValue::Null],
        vec![
            CellValue::from("Bob"),
            CellValue::from("bob@example.com"),
            CellValue::Null,
        ],
        vec![
            CellValue::from("Carol"),
            CellValue::from("carol@example.com"),
            CellValue::from("555-0100"),
        ],
    ]);
    println!(
        "Created sheet with {} rows, {} columns",
        sheet.row_count(),
        sheet.width()
    );

    // Round-trip through a workbook so the load path is exercised
    let xlsx_path = temp_dir.join("sheet_demo.xlsx");
    sheet.save_as_xlsx(&xlsx_path)?;
    let loaded = Sheet::load(&xlsx_path)?;
    println!("Loaded '{}' from {}", loaded.name(), xlsx_path.display());

    let columns = parse_column_list("B,C")?;
    for (combinator, condition) in [
        (Combinator::All, Condition::IsNull),
        (Combinator::Any, Condition::IsNull),
        (Combinator::All, Condition::IsNotNull),
        (Combinator::Any, Condition::IsNotNull),
    ] {
        let filter = RowFilter::new(columns.clone(), combinator, condition);
        let (result, outcome) = filter.apply(&loaded)?;
        let names: Vec<String> = result
            .rows()
            .iter()
            .map(|row| row[0].display_text())
            .collect();
        println!(
            "{filter}: {} of {} rows -> {names:?}",
            outcome.matched, outcome.total
        );
    }

    let html_path = temp_dir.join("sheet_demo.html");
    std::fs::write(&html_path, loaded.to_html_table())?;
    println!("\nWrote table to {}", html_path.display());

    let _ = std::fs::remove_file(&xlsx_path);
    let _ = std::fs::remove_file(&html_path);

    println!("\n=== Demo Complete ===");
    Ok(())
}
