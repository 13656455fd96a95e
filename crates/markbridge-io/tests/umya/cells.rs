// Integration tests for the umya backend; run with `--features umya`.
use markbridge_io::{CellData, CellValue, NumberFormat, SpreadsheetReader, SpreadsheetWriter, UmyaAdapter};
use markbridge_testkit::build_workbook;

#[test]
fn umya_reads_header_row_values() {
    let fx = build_workbook(|book| {
        let ws = book.get_sheet_by_name_mut("Sheet1").unwrap();
        ws.get_cell_mut((1, 2)).set_value_string("StudentID");
        ws.get_cell_mut((3, 2)).set_value_string("Mark");
        ws.get_cell_mut((2, 3)).set_value_number(12);
    });

    let mut adapter = UmyaAdapter::open_path(fx.path()).unwrap();
    let row = adapter.read_row("Sheet1", 2).unwrap();
    assert_eq!(row.len(), 2);
    assert_eq!(
        row.get(&1).and_then(|c| c.value.clone()),
        Some(CellValue::Text("StudentID".into()))
    );
    assert_eq!(
        row.get(&3).and_then(|c| c.value.clone()),
        Some(CellValue::Text("Mark".into()))
    );
    assert_eq!(
        adapter.read_cell("Sheet1", 3, 2).unwrap().and_then(|c| c.value),
        Some(CellValue::Number(12.0))
    );
    assert_eq!(adapter.sheet_bounds("Sheet1"), Some((3, 3)));
}

#[test]
fn umya_lists_sheets_in_order() {
    let fx = build_workbook(|book| {
        book.new_sheet("Tab 1 BB Export").unwrap();
        book.new_sheet("Tab 3 OneUni Export").unwrap();
    });
    let adapter = UmyaAdapter::open_path(fx.path()).unwrap();
    assert_eq!(
        adapter.sheet_names().unwrap(),
        vec![
            "Sheet1".to_string(),
            "Tab 1 BB Export".into(),
            "Tab 3 OneUni Export".into()
        ]
    );
    assert!(adapter.has_sheet("Tab 1 BB Export").unwrap());
    assert!(!adapter.has_sheet("tab 1 bb export").unwrap());
}

#[test]
fn umya_text_format_marker_round_trips() {
    let fx = build_workbook(|_| {});
    let mut adapter = UmyaAdapter::open_path(fx.path()).unwrap();
    adapter
        .write_cell("Sheet1", 1, 1, CellData::text("00123"))
        .unwrap();
    adapter
        .write_cell("Sheet1", 1, 2, CellData::from_value(70i64))
        .unwrap();
    adapter.save().unwrap();

    let mut reopened = UmyaAdapter::open_path(fx.path()).unwrap();
    let id = reopened.read_cell("Sheet1", 1, 1).unwrap().unwrap();
    assert_eq!(id.value, Some(CellValue::Text("00123".into())));
    assert_eq!(id.format, Some(NumberFormat::Text));
    let mark = reopened.read_cell("Sheet1", 1, 2).unwrap().unwrap();
    assert_eq!(mark.value, Some(CellValue::Number(70.0)));
}

#[test]
fn umya_missing_sheet_is_an_error() {
    let fx = build_workbook(|_| {});
    let mut adapter = UmyaAdapter::open_path(fx.path()).unwrap();
    let err = adapter.read_row("Nope", 1).unwrap_err();
    assert_eq!(err.to_string(), "worksheet 'Nope' not found");
    assert!(adapter.sheet_bounds("Nope").is_none());

    // Sheet names are exact; a case slip must not create or panic.
    let err = adapter
        .write_cell("sheet1", 1, 1, CellData::from_value("x"))
        .unwrap_err();
    assert_eq!(err.to_string(), "worksheet 'sheet1' not found");
    assert!(adapter.read_cell("sheet1", 1, 1).is_err());
    assert_eq!(adapter.sheet_names().unwrap(), vec!["Sheet1".to_string()]);
}
