use core_types::{EnrichedProduct, StockStatus};
use dataset::loader::{load_table_file, Table};
use dataset::{export, load_dataset, DatasetError, EnrichedProductRow, TableKind};
use rust_decimal_macros::dec;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn loads_the_fixture_dataset() {
    let dataset = load_dataset(
        &fixture("products.csv"),
        &fixture("sales.csv"),
        &fixture("purchases.csv"),
    )
    .unwrap();

    assert_eq!(dataset.products().len(), 6);
    assert_eq!(dataset.sales().len(), 9);
    assert_eq!(dataset.purchases().len(), 8);

    let rice = &dataset.products()[0];
    assert_eq!(rice.product_id.as_str(), "101");
    assert_eq!(rice.unit_margin(), Some(dec!(5.00)));
    assert!(dataset
        .unknown_locations(&["Dhaka", "Chittagong", "Sylhet", "Rajshahi"])
        .is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_table_file(TableKind::Sales, &fixture("does-not-exist.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
    assert!(err.to_string().contains("does-not-exist.csv"));
}

#[test]
fn loaded_table_reports_its_kind() {
    let table = load_table_file(TableKind::Purchases, &fixture("purchases.csv")).unwrap();
    assert!(matches!(table, Table::Purchases(ref rows) if rows.len() == 8));
}

#[test]
fn export_writes_a_file_that_round_trips_through_the_csv_reader() {
    let dataset = load_dataset(
        &fixture("products.csv"),
        &fixture("sales.csv"),
        &fixture("purchases.csv"),
    )
    .unwrap();
    let rows: Vec<EnrichedProductRow> = dataset
        .products()
        .iter()
        .map(|product| EnrichedProductRow::from(&EnrichedProduct {
            product: product.clone(),
            current_stock: 0,
            profit: dec!(0),
            slow_moving: false,
            stock_status: StockStatus::ProperlyStocked,
        }))
        .collect();

    let path = std::env::temp_dir().join(format!(
        "retail-dashboard-export-{}.csv",
        std::process::id()
    ));
    export::write_csv_file(&rows, &path).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, <EnrichedProductRow as export::CsvTable>::COLUMNS);
    assert_eq!(reader.records().count(), 6);

    std::fs::remove_file(&path).unwrap();
}
