use rust_xlsxwriter::Workbook;
use sheetsift_sheet::{
    parse_column_list, render_table, CellValue, ColumnRef, Combinator, Condition, RowFilter,
    Sheet, SheetError,
};
use tempfile::tempdir;

/// Contacts workbook with gaps in the Email (B) and Phone (C) columns.
fn write_contacts(path: &std::path::Path) {
    let mut workbook = Workbook::new();
    let ws = workbook.add_worksheet().set_name("Contacts").unwrap();

    ws.write_string(0, 0, "Name").unwrap();
    ws.write_string(0, 1, "Email").unwrap();
    ws.write_string(0, 2, "Phone").unwrap();

    // Ann: both present
    ws.write_string(1, 0, "Ann").unwrap();
    ws.write_string(1, 1, "ann@example.com").unwrap();
    ws.write_number(1, 2, 5551234.0).unwrap();
    // Ben: email only
    ws.write_string(2, 0, "Ben").unwrap();
    ws.write_string(2, 1, "ben@example.com").unwrap();
    // Cal: neither
    ws.write_string(3, 0, "Cal").unwrap();
    // row 5 left blank on purpose
    // Dee: phone only
    ws.write_string(5, 0, "Dee").unwrap();
    ws.write_number(5, 2, 5550000.0).unwrap();

    workbook.add_worksheet().set_name("Other").unwrap();
    workbook.save(path).unwrap();
}

fn names(sheet: &Sheet) -> Vec<String> {
    sheet.rows().iter().map(|row| row[0].as_str()).collect()
}

fn filter(cols: &str, combinator: Combinator, condition: Condition) -> RowFilter {
    RowFilter::new(parse_column_list(cols).unwrap(), combinator, condition)
}

#[test]
fn test_load_first_sheet_as_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contacts.xlsx");
    write_contacts(&path);

    let sheet = Sheet::load(&path).unwrap();
    assert_eq!(sheet.name(), "Contacts");
    assert_eq!(sheet.headers(), &["Name", "Email", "Phone"]);
    // the blank row is dropped
    assert_eq!(names(&sheet), vec!["Ann", "Ben", "Cal", "Dee"]);
    assert!(sheet.cell(1, 2).unwrap().is_null());
}

#[test]
fn test_each_combinator_and_condition() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contacts.xlsx");
    write_contacts(&path);
    let sheet = Sheet::load(&path).unwrap();

    let all_null = sheet.filtered(&filter("B,C", Combinator::All, Condition::IsNull)).unwrap();
    assert_eq!(names(&all_null), vec!["Cal"]);

    let all_present = sheet
        .filtered(&filter("b,c", Combinator::All, Condition::IsNotNull))
        .unwrap();
    assert_eq!(names(&all_present), vec!["Ann"]);

    let any_null = sheet.filtered(&filter("B,C", Combinator::Any, Condition::IsNull)).unwrap();
    assert_eq!(names(&any_null), vec!["Ben", "Cal", "Dee"]);

    let any_present = sheet
        .filtered(&filter("B,C", Combinator::Any, Condition::IsNotNull))
        .unwrap();
    assert_eq!(names(&any_present), vec!["Ann", "Ben", "Dee"]);
}

#[test]
fn test_filters_do_not_stack() {
    let sheet = Sheet::from_csv_str("k,v\na,1\nb,\nc,3\n").unwrap();

    let nulls = sheet.filtered(&filter("B", Combinator::All, Condition::IsNull)).unwrap();
    assert_eq!(nulls.row_count(), 1);

    // applied to the source again, not to the previous result
    let present = sheet
        .filtered(&filter("B", Combinator::All, Condition::IsNotNull))
        .unwrap();
    assert_eq!(present.row_count(), 2);
    assert_eq!(sheet.row_count(), 3);
}

#[test]
fn test_outcome_counts_and_primary() {
    let sheet = Sheet::from_csv_str("k,v\na,1\nb,\n").unwrap();
    let f = filter("B", Combinator::Any, Condition::IsNull).with_primary(ColumnRef::at(0));

    let (result, outcome) = f.apply(&sheet).unwrap();
    assert_eq!(outcome.matched, 1);
    assert_eq!(outcome.total, 2);
    assert_eq!(result.headers(), sheet.headers());
}

#[test]
fn test_out_of_range_columns_rejected() {
    let sheet = Sheet::from_csv_str("k,v\na,1\n").unwrap();

    let wide = filter("B,Z", Combinator::All, Condition::IsNull);
    assert!(matches!(
        sheet.filtered(&wide),
        Err(SheetError::ColumnOutOfRange { ref letters, count: 2 }) if letters == "Z"
    ));

    let bad_primary =
        filter("A", Combinator::All, Condition::IsNull).with_primary(ColumnRef::at(5));
    assert!(sheet.filtered(&bad_primary).is_err());
}

#[test]
fn test_filtered_view_renders_nulls() {
    let sheet = Sheet::from_csv_str("k,v\na,1\nb,\n").unwrap();
    let nulls = sheet.filtered(&filter("B", Combinator::All, Condition::IsNull)).unwrap();

    let html = render_table(&nulls);
    assert!(html.contains("<td>b</td><td>NULL</td>"));
    assert!(!html.contains("<td>a</td>"));

    let none = sheet
        .filtered(&filter("A,B", Combinator::All, Condition::IsNull))
        .unwrap();
    assert_eq!(render_table(&none), "<p>No data available</p>");
}

#[test]
fn test_two_letter_columns() {
    let mut header: Vec<CellValue> = (0..28).map(|i| CellValue::from(format!("c{i}"))).collect();
    header[27] = CellValue::from("last");
    let mut row: Vec<CellValue> = (0..28).map(|i| CellValue::Int(i)).collect();
    row[27] = CellValue::Null;

    let sheet = Sheet::from_grid("Wide", vec![header, row]);
    let ab = ColumnRef::parse("AB").unwrap();
    assert_eq!(sheet.header(ab).unwrap(), "last");

    let result = sheet.filtered(&filter("AB", Combinator::All, Condition::IsNull)).unwrap();
    assert_eq!(result.row_count(), 1);
}
