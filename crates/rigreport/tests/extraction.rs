//! Extraction from lopdf-built report pages through to the JSON file.

mod common;

use common::{Cell, catalog_coords, cells_content, document, grid, to_bytes};
use lopdf::{Object, Stream, dictionary};
use rigreport::{
    DEFAULT_CATALOG_KEY, FieldCoordinate, IdentityNormalizer, Pdf, RunConfig, RunOutcome, TableSettings,
    extract_file, run,
};
use serde_json::{Value, json};

const HEADER_ROW: [&str; 7] = ["1404", "07", "10", "", "Camp: Ali", "O3", "Rig:"];

fn s(v: &str) -> Option<String> {
    Some(v.to_string())
}

fn header_entry(page_number: usize) -> FieldCoordinate {
    FieldCoordinate {
        page_number,
        sheet_name: "Header".to_string(),
        coordinates: catalog_coords(20.0, 700.0, 580.0, 720.0, 5.0),
    }
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn ruled_two_by_two_grid() {
    let cells = grid(50.0, 700.0, 100.0, 20.0, &[&["a1", "b1"], &["a2", "b2"]]);
    let mut doc = document(&[cells_content(&cells)], |_, _, _| {});
    let pdf = Pdf::open(&to_bytes(&mut doc)).unwrap();
    let page = pdf.page(0).unwrap();

    let table = page.crop(page.bbox()).extract_table(&TableSettings::default()).unwrap();
    assert_eq!(table, vec![vec![s("a1"), s("b1")], vec![s("a2"), s("b2")]]);
}

#[test]
fn merged_cell_leaves_a_gap() {
    let mut cells = vec![Cell {
        x0: 50.0,
        y0: 680.0,
        x1: 250.0,
        y1: 700.0,
        text: "wide",
    }];
    cells.extend(grid(50.0, 680.0, 100.0, 20.0, &[&["x", "y"]]));
    let mut doc = document(&[cells_content(&cells)], |_, _, _| {});
    let pdf = Pdf::open(&to_bytes(&mut doc)).unwrap();
    let page = pdf.page(0).unwrap();

    let table = page.crop(page.bbox()).extract_table(&TableSettings::default()).unwrap();
    assert_eq!(table, vec![vec![s("wide"), None], vec![s("x"), s("y")]]);
}

#[test]
fn crop_selects_one_table_of_two() {
    let mut cells = grid(50.0, 700.0, 100.0, 20.0, &[&["top", "row"], &["a", "b"]]);
    cells.extend(grid(50.0, 400.0, 100.0, 20.0, &[&["low", "er"], &["c", "d"]]));
    let mut doc = document(&[cells_content(&cells)], |_, _, _| {});
    let pdf = Pdf::open(&to_bytes(&mut doc)).unwrap();
    let page = pdf.page(0).unwrap();

    let entry = FieldCoordinate {
        page_number: 1,
        sheet_name: "Foods".to_string(),
        coordinates: catalog_coords(50.0, 360.0, 250.0, 400.0, 3.0),
    };
    let table = page.crop(entry.crop_box()).extract_table(&TableSettings::default()).unwrap();
    assert_eq!(table[0], vec![s("low"), s("er")]);
}

#[test]
fn header_sheet_end_to_end() {
    let cells = grid(20.0, 720.0, 80.0, 20.0, &[&HEADER_ROW]);
    let mut doc = document(&[cells_content(&cells)], |_, _, _| {});
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("DCR O3 1404 1007_flatten.pdf");
    std::fs::write(&pdf_path, to_bytes(&mut doc)).unwrap();

    let out = dir.path().join("out");
    let written = extract_file(
        &pdf_path,
        &out,
        &[header_entry(1)],
        &TableSettings::default(),
        &IdentityNormalizer,
    )
    .unwrap();
    assert_eq!(written, out.join("DCR O3 1404 1007_flatten_tables.json"));

    let value = read_json(&written);
    assert_eq!(
        value["Header"],
        json!({ "تاریخ": "14040710", "Camp": "Ali", "Rig": "O3" })
    );
    assert_eq!(value["Operation"]["ShiftA"], json!([]));
}

#[test]
fn empty_catalog_writes_all_defaults() {
    let mut doc = document(&[Vec::new()], |_, _, _| {});
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("blank.pdf");
    std::fs::write(&pdf_path, to_bytes(&mut doc)).unwrap();

    let written = extract_file(&pdf_path, dir.path(), &[], &TableSettings::default(), &IdentityNormalizer).unwrap();
    let value = read_json(&written);
    let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 8);
    assert_eq!(value["Header"]["دستگاه حفاری"], "");
    assert_eq!(value["Herasat"]["ShiftTotalHerasat"], json!({}));
    assert_eq!(value["employer"]["EmployerSupervisor"], json!({}));
    assert_eq!(value["Drilling"]["DrillingPage4"], json!([]));
    assert_eq!(value["Foods"]["توضیحات"], "");
    assert_eq!(value["total"], json!({}));
}

#[test]
fn page_past_the_end_is_skipped() {
    let cells = grid(20.0, 720.0, 80.0, 20.0, &[&HEADER_ROW]);
    let mut doc = document(&[cells_content(&cells)], |_, _, _| {});
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("one_page.pdf");
    std::fs::write(&pdf_path, to_bytes(&mut doc)).unwrap();

    let written = extract_file(
        &pdf_path,
        dir.path(),
        &[header_entry(3)],
        &TableSettings::default(),
        &IdentityNormalizer,
    )
    .unwrap();
    assert_eq!(read_json(&written)["Header"]["تاریخ"], "");
}

#[test]
fn run_flattens_form_fields_before_extracting() {
    // the rig name lives only in a form field over the sixth cell
    let mut row = HEADER_ROW;
    row[5] = "";
    let cells = grid(20.0, 720.0, 80.0, 20.0, &[&row]);
    let mut doc = document(&[cells_content(&cells)], |doc, _, page| {
        let font = common::helvetica(doc);
        let appearance = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 80.into(), 20.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "Helv" => font } },
            },
            b"BT /Helv 10 Tf 5 5 Td (O3) Tj ET".to_vec(),
        ));
        let widget = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Tx",
            "T" => Object::string_literal("rig"),
            "V" => Object::string_literal("O3"),
            "Rect" => vec![420.into(), 700.into(), 500.into(), 720.into()],
            "AP" => dictionary! { "N" => appearance },
        });
        page.set("Annots", vec![Object::from(widget)]);
    });
    let acroform = doc.add_object(dictionary! { "Fields" => Vec::<Object>::new() });
    doc.catalog_mut().unwrap().set("AcroForm", acroform);

    let dir = tempfile::tempdir().unwrap();
    let config = RunConfig {
        source_pdf: dir.path().join("DCR O3 1404 1007.pdf"),
        flattened_pdf: dir.path().join("DCR O3 1404 1007_flatten.pdf"),
        output_dir: dir.path().join("extract_tables_dcr"),
        catalog_path: dir.path().join("coordinates_points.json"),
        ..RunConfig::default()
    };
    std::fs::write(&config.source_pdf, to_bytes(&mut doc)).unwrap();
    let catalog = json!({
        DEFAULT_CATALOG_KEY: [{
            "page_number": 1,
            "sheet_name": "Header",
            "coordinates": catalog_coords(20.0, 700.0, 580.0, 720.0, 5.0),
        }]
    });
    std::fs::write(&config.catalog_path, catalog.to_string()).unwrap();

    let outcome = run(&config);
    let expected = config.output_dir.join("DCR O3 1404 1007_flatten_tables.json");
    assert_eq!(outcome, RunOutcome::Saved(expected.clone()));
    assert!(config.flattened_pdf.exists());
    assert_eq!(read_json(&expected)["Header"]["Rig"], "O3");
}
