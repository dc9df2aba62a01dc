//! File-to-store import tests

use kpi_hierarchy::{AttributeKey, HierarchyError};
use kpi_import::{
    CellSource, GridError, ImportConfig, ImportError, Importer, InMemoryStore, InsertError,
};
use kpi_test_utils::{
    finance_cells, finance_grid, write_temp_grid, FailingStore, FINANCE_CSV, FINANCE_MERGED_CSV,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

#[test]
fn csv_file_imports_into_store() {
    let file = write_temp_grid("csv", FINANCE_CSV);
    let mut store = InMemoryStore::new();

    let summary = Importer::default().import_file(&mut store, file.path()).unwrap();

    assert_eq!(summary.cells_read, 9);
    assert_eq!(summary.nodes_inserted, 6);
    assert_eq!(summary.roots, 2);
    assert_eq!(summary.per_column, BTreeMap::from([(0, 2), (1, 2), (2, 2)]));

    let finance = store.find(&AttributeKey::new(0, "Finance")).unwrap();
    let payroll = store.find(&AttributeKey::new(1, "Payroll")).unwrap();
    let bonus = store.find(&AttributeKey::new(2, "Bonus")).unwrap();
    assert_eq!(payroll.parent_id, Some(finance.id));
    assert_eq!(bonus.parent_id, Some(payroll.id));
    assert_eq!(payroll.name, "Area");
}

#[test]
fn csv_and_grid_fixture_agree() {
    let file = write_temp_grid("csv", FINANCE_CSV);
    let importer = Importer::default();

    let from_file = importer.prepare(&importer.load(file.path()).unwrap()).unwrap();
    let from_grid = importer.prepare(&CellSource::Grid(finance_grid())).unwrap();
    let from_cells = importer.prepare(&CellSource::Cells(finance_cells())).unwrap();

    assert_eq!(from_file.ordered(), from_grid.ordered());
    assert_eq!(from_grid.ordered(), from_cells.ordered());
}

#[test]
fn merged_export_matches_with_fill_down() {
    let plain = write_temp_grid("csv", FINANCE_CSV);
    let merged = write_temp_grid("csv", FINANCE_MERGED_CSV);
    let importer = Importer::new(ImportConfig::new().with_fill_merged_cells(true));

    let expected = importer.prepare(&importer.load(plain.path()).unwrap()).unwrap();
    let filled = importer.prepare(&importer.load(merged.path()).unwrap()).unwrap();
    assert_eq!(filled.ordered(), expected.ordered());
}

#[test]
fn merged_export_without_fill_down_detaches_children() {
    let merged = write_temp_grid("csv", FINANCE_MERGED_CSV);
    let importer = Importer::default();
    let prepared = importer.prepare(&importer.load(merged.path()).unwrap()).unwrap();

    let bonus = prepared
        .ordered()
        .iter()
        .find(|attribute| attribute.value() == "Bonus")
        .unwrap();
    assert!(bonus.is_root());
}

#[test]
fn json_cells_with_blank_value_are_rejected() {
    let file = write_temp_grid(
        "json",
        r#"[
            {"name": "Domain", "value": "Finance", "rowIndex": 0, "colIndex": 0},
            {"name": "Area", "value": " ", "rowIndex": 0, "colIndex": 1}
        ]"#,
    );
    let mut store = InMemoryStore::new();

    let err = Importer::default().import_file(&mut store, file.path()).unwrap_err();
    match err {
        ImportError::Rejected(rejection) => {
            assert_eq!(rejection.errors(), &[HierarchyError::BlankValue { row: 0, col: 1 }]);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn tsv_without_header_uses_generated_names() {
    let file = write_temp_grid("tsv", "Finance\tPayroll\n");
    let importer = Importer::new(ImportConfig::new().with_header(false));
    let mut store = InMemoryStore::new();

    importer.import_file(&mut store, file.path()).unwrap();
    let payroll = store.find(&AttributeKey::new(1, "payroll")).unwrap();
    assert_eq!(payroll.name, "Column 2");
}

#[test]
fn unsupported_extension_is_a_grid_error() {
    let file = write_temp_grid("xlsx", "binary");
    let mut store = InMemoryStore::new();
    let err = Importer::default().import_file(&mut store, file.path()).unwrap_err();
    assert!(matches!(err, ImportError::Grid(GridError::UnsupportedFormat(_))));
    assert!(err.store_untouched());
}

#[test]
fn store_failure_stops_part_way() {
    let mut store = FailingStore::after(3);
    let err = Importer::default()
        .import(&mut store, &CellSource::Grid(finance_grid()))
        .unwrap_err();

    match err {
        ImportError::Insert(InsertError::Store { key, .. }) => {
            assert_eq!(key, AttributeKey::new(1, "audit"));
        }
        other => panic!("expected store failure, got {other:?}"),
    }
    let written: Vec<&str> = store.written.iter().map(|a| a.value.as_str()).collect();
    assert_eq!(written, vec!["Legal", "Finance", "Payroll"]);
    assert_eq!(store.written[2].parent_id, Some(2));
}
