use markbridge_export::{ExportError, KeyedPair, PairsTarget, export_pairs_to_workbook};
use markbridge_testkit::{build_workbook, read_cell_text, scratch_path};

const SHEET: &str = "Tab 1 BB Export";

fn template() -> markbridge_testkit::Fixture {
    build_workbook(|book| {
        let ws = book.get_sheet_by_name_mut("Sheet1").unwrap();
        ws.set_name(SHEET);
        for r in 1..=3 {
            ws.get_cell_mut((1, r)).set_value_string("stale");
            ws.get_cell_mut((2, r)).set_value_number(1);
            ws.get_cell_mut((3, r)).set_value_string("keep");
        }
    })
}

fn target(template: &std::path::Path) -> PairsTarget {
    PairsTarget {
        template: template.to_path_buf(),
        output: template.with_file_name("out.xlsx"),
        sheet: SHEET.to_string(),
        ..PairsTarget::default()
    }
}

#[test]
fn pairs_go_to_output_and_template_is_untouched() {
    let tpl = template();
    let t = target(tpl.path());
    let pairs: Vec<_> = [("0012", "70.0"), ("A2", "ABS")]
        .into_iter()
        .filter_map(|(id, v)| KeyedPair::new(id, v))
        .collect();

    let report = export_pairs_to_workbook(&t, &pairs).unwrap();
    assert_eq!(report.output.as_deref(), Some(t.output.as_path()));
    assert_eq!(report.rows_cleared, 3);

    assert_eq!(read_cell_text(&t.output, SHEET, 1, 1), "0012");
    assert_eq!(read_cell_text(&t.output, SHEET, 2, 1), "70");
    assert_eq!(read_cell_text(&t.output, SHEET, 2, 2), "ABS");
    assert_eq!(read_cell_text(&t.output, SHEET, 1, 3), "");
    assert_eq!(read_cell_text(&t.output, SHEET, 3, 3), "keep");

    let book = umya_spreadsheet::reader::xlsx::read(&t.output).unwrap();
    let ws = book.get_sheet_by_name(SHEET).unwrap();
    let id_format = ws
        .get_cell((1, 1))
        .unwrap()
        .get_style()
        .get_number_format()
        .map(|f| f.get_format_code().to_string());
    assert_eq!(id_format.as_deref(), Some("@"));

    assert_eq!(read_cell_text(tpl.path(), SHEET, 1, 1), "stale");
}

#[test]
fn missing_template_and_empty_input() {
    let missing = scratch_path("nope.xlsx");
    let pairs = vec![KeyedPair::new("a", "1").unwrap()];
    let err = export_pairs_to_workbook(&target(missing.path()), &pairs).unwrap_err();
    assert!(matches!(err, ExportError::TargetNotFound { .. }));

    let tpl = template();
    let err = export_pairs_to_workbook(&target(tpl.path()), &[]).unwrap_err();
    assert!(matches!(err, ExportError::NothingToWrite));
    assert!(!target(tpl.path()).output.exists());
}
