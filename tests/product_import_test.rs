mod common;

use tempfile::TempDir;
use woo_shopify_etl::adapters::csv::read_table;
use woo_shopify_etl::{run_import, EtlError, ImportKind};

const PRODUCTS_CSV: &str = "\
Name,SKU,Description,Short description,Categories,Tags,Images,Regular price,Sale price,Weight (lbs),Stock,In stock?,Published,Tax status
Red T-Shirt!!,RTS-1,\"Soft\ncotton\",Comfy tee,Apparel,\"#summer, sale\",\"a.jpg,b.jpg\",20,10,1,5,1,1,taxable
Old Mug,MUG-1,Ceramic,,Kitchen,,,8,,0.5,3,0,-1,none
";

#[tokio::test]
async fn test_products_end_to_end() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("products.csv");
    std::fs::write(&input, PRODUCTS_CSV)?;
    let output_dir = temp_dir.path().join("out");

    let config = common::config(ImportKind::Products, &input, &output_dir);
    let output_path = run_import(ImportKind::Products, config, false).await?;

    assert!(output_path.contains("products_"));
    assert!(output_path.ends_with(".csv"));
    let written = std::fs::read(&output_path)?;
    let table = read_table(&written)?;

    assert_eq!(table.columns.len(), 48);
    assert_eq!(table.columns[0], "Handle");
    assert_eq!(table.len(), 3);

    let main = &table.rows[0];
    assert_eq!(main.text("Handle").as_deref(), Some("red-t-shirt"));
    assert_eq!(main.text("Body (HTML)").as_deref(), Some("Softcotton"));
    assert_eq!(main.text("Tags").as_deref(), Some("summer, sale"));
    assert_eq!(main.text("Variant Price").as_deref(), Some("10"));
    assert_eq!(main.text("Variant Compare At Price").as_deref(), Some("20"));
    assert_eq!(main.text("Variant Grams").as_deref(), Some("453.592"));
    assert_eq!(main.text("Variant Inventory Qty").as_deref(), Some("5"));
    assert_eq!(main.text("Variant Taxable").as_deref(), Some("TRUE"));
    assert_eq!(main.text("Image Src").as_deref(), Some("a.jpg"));
    assert_eq!(main.text("Image Position").as_deref(), Some("1"));
    assert_eq!(main.text("SEO Description").as_deref(), Some("Comfy tee"));

    let image = &table.rows[1];
    assert_eq!(image.text("Handle").as_deref(), Some("red-t-shirt"));
    assert_eq!(image.text("Image Src").as_deref(), Some("b.jpg"));
    assert_eq!(image.text("Image Position").as_deref(), Some("2"));
    assert!(image.text("Title").is_none());

    let mug = &table.rows[2];
    assert_eq!(mug.text("Status").as_deref(), Some("archived"));
    assert_eq!(mug.text("Published").as_deref(), Some("FALSE"));
    assert_eq!(mug.text("Variant Inventory Qty").as_deref(), Some("0"));
    assert_eq!(mug.text("Variant Price").as_deref(), Some("8"));
    assert!(mug.text("Variant Compare At Price").is_none());
    assert!(mug.text("Image Src").is_none());

    Ok(())
}

#[tokio::test]
async fn test_missing_product_columns_is_a_schema_error() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("products.csv");
    std::fs::write(&input, "Name,SKU\nShirt,S-1\n")?;
    let output_dir = temp_dir.path().join("out");

    let config = common::config(ImportKind::Products, &input, &output_dir);
    let err = run_import(ImportKind::Products, config, false)
        .await
        .unwrap_err();

    match err {
        EtlError::SchemaError { missing } => {
            assert!(missing.contains(&"Description".to_string()));
            assert!(!missing.contains(&"Name".to_string()));
        }
        other => panic!("expected schema error, got {other:?}"),
    }
    assert!(common::files_with_extension(&output_dir, "csv").is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_input_file_is_an_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("nope.csv");
    let config = common::config(ImportKind::Products, &input, temp_dir.path());

    let err = run_import(ImportKind::Products, config, false)
        .await
        .unwrap_err();
    assert!(matches!(err, EtlError::IoError(_)));
}
