mod common;

use tempfile::TempDir;
use woo_shopify_etl::adapters::csv::read_table;
use woo_shopify_etl::{run_import, EtlError, ImportKind, Table};

const ORDERS_CSV: &str = "\
Name,Command,Customer: Email,Customer: Phone,Processed At,Note,Transaction: Amount,Line: Title,Line: Quantity,Line: Price,Metafield: woo._ppcp_paypal_payer_email,Woo Internal
#1001,NEW,jane@example.com,+1 (555) 123-4567,2024-03-01 10:00:00,,25,Blue Mug,2,12.5,,x
#1002,NEW,,+1 555,2024-03-02,Stock levels reduced: Green Tea 5→4,10,,,,payer@example.com,y
";

async fn import_orders(rebuild_line_items: bool) -> Table {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("orders.csv");
    std::fs::write(&input, ORDERS_CSV).unwrap();
    let output_dir = temp_dir.path().join("out");

    let mut config = common::config(ImportKind::Orders, &input, &output_dir);
    config.rebuild_line_items = rebuild_line_items;
    let output_path = run_import(ImportKind::Orders, config, false).await.unwrap();
    assert!(output_path.contains("orders_"));

    read_table(&std::fs::read(&output_path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_orders_conform_to_schema() {
    let table = import_orders(false).await;

    assert_eq!(table.columns.len(), 216);
    assert_eq!(table.columns[0], "Name");
    assert!(!table.has_column("Woo Internal"));
    assert_eq!(table.len(), 2);

    let first = &table.rows[0];
    assert_eq!(first.text("Customer: Phone").as_deref(), Some("+15551234567"));
    assert_eq!(first.text("Line: Quantity").as_deref(), Some("2"));
    assert_eq!(first.text("Line: Price").as_deref(), Some("12.5"));

    let second = &table.rows[1];
    assert_eq!(second.text("Customer: Email").as_deref(), Some("payer@example.com"));
    assert!(second.text("Customer: Phone").is_none());
    let note = second.text("Note").unwrap();
    assert!(note.starts_with("Stock levels reduced: Green Tea 5→4"));
    assert!(note.contains("Customer phone +1 555 was removed from phone fields because it is invalid"));
}

#[tokio::test]
async fn test_rebuild_line_items() {
    let table = import_orders(true).await;
    assert_eq!(table.len(), 2);

    let line = &table.rows[0];
    assert_eq!(line.text("Name").as_deref(), Some("#1001"));
    assert_eq!(line.text("Line: Type").as_deref(), Some("Line Item"));
    assert_eq!(line.text("Line: Product Handle").as_deref(), Some("blue-mug"));
    assert_eq!(line.text("Line: Quantity").as_deref(), Some("2"));
    assert_eq!(line.text("Transaction: Amount").as_deref(), Some("25"));
    assert_eq!(line.text("Processed At").as_deref(), Some("2024-03-01 10:00:00"));
    assert_eq!(line.text("Customer: Phone").as_deref(), Some("+15551234567"));

    let generic = &table.rows[1];
    assert_eq!(generic.text("Name").as_deref(), Some("#1002"));
    assert_eq!(generic.text("Line: Title").as_deref(), Some("Green Tea"));
    assert_eq!(generic.text("Line: Product Handle").as_deref(), Some("green-tea"));
    assert_eq!(generic.text("Line: Quantity").as_deref(), Some("1"));
    assert_eq!(generic.text("Line: Price").as_deref(), Some("10"));
    assert_eq!(generic.text("Customer: Email").as_deref(), Some("payer@example.com"));
    assert_eq!(generic.text("Processed At").as_deref(), Some("2024-03-02 00:00:00"));
}

#[tokio::test]
async fn test_orders_without_essential_columns_fail_validation() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("orders.csv");
    std::fs::write(&input, "Line: Title\nBlue Mug\n").unwrap();

    let config = common::config(ImportKind::Orders, &input, temp_dir.path());
    let err = run_import(ImportKind::Orders, config, false).await.unwrap_err();
    match err {
        EtlError::ValidationError { errors } => {
            assert_eq!(errors, vec!["❌ Missing essential columns: Name, Customer: Email"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
