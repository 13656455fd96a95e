use markbridge_io::{CellData, CellValue, SpreadsheetReader, SpreadsheetWriter, UmyaAdapter};
use markbridge_testkit::{build_workbook, scratch_path};

#[test]
fn umya_save_as_leaves_template_untouched() {
    let template = build_workbook(|book| {
        let ws = book.get_sheet_by_name_mut("Sheet1").unwrap();
        ws.get_cell_mut((1, 1)).set_value_string("keep");
    });
    let out = scratch_path("out.xlsx");

    let mut adapter = UmyaAdapter::open_path(template.path()).unwrap();
    adapter
        .write_cell("Sheet1", 1, 1, CellData::from_value("changed"))
        .unwrap();
    adapter.save_as(out.path()).unwrap();

    let mut original = UmyaAdapter::open_path(template.path()).unwrap();
    assert_eq!(
        original.read_cell("Sheet1", 1, 1).unwrap().and_then(|c| c.value),
        Some(CellValue::Text("keep".into()))
    );
    let mut saved = UmyaAdapter::open_path(out.path()).unwrap();
    assert_eq!(
        saved.read_cell("Sheet1", 1, 1).unwrap().and_then(|c| c.value),
        Some(CellValue::Text("changed".into()))
    );
}

#[test]
fn umya_in_memory_book_needs_a_path_for_in_place_save() {
    let mut adapter = UmyaAdapter::new();
    adapter
        .write_cell("Sheet1", 1, 1, CellData::from_value(1.0))
        .unwrap();
    let err = adapter.save().unwrap_err();
    assert!(err.to_string().contains("no original path"));

    let bytes = adapter.save_to_bytes().unwrap();
    assert!(bytes.len() > 100, "Expected non-trivial XLSX byte output");
}

#[test]
fn umya_clear_cell_blanks_value() {
    let fx = build_workbook(|book| {
        let ws = book.get_sheet_by_name_mut("Sheet1").unwrap();
        ws.get_cell_mut((2, 4)).set_value_string("stale");
    });
    let mut adapter = UmyaAdapter::open_path(fx.path()).unwrap();
    adapter.clear_cell("Sheet1", 4, 2).unwrap();
    adapter.save().unwrap();

    let mut reopened = UmyaAdapter::open_path(fx.path()).unwrap();
    assert!(
        reopened
            .read_cell("Sheet1", 4, 2)
            .unwrap()
            .is_none_or(|c| c.is_blank())
    );
}
