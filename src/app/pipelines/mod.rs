pub mod customer_pipeline;
pub mod order_pipeline;
pub mod product_pipeline;

pub use customer_pipeline::CustomerPipeline;
pub use order_pipeline::OrderPipeline;
pub use product_pipeline::ProductPipeline;

use crate::adapters::csv::{output_filename, read_table, write_table};
use crate::core::{ConfigProvider, Storage, Table, TransformResult};
use crate::domain::model::ImportKind;
use crate::domain::report::ValidationReport;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

pub const REPORT_FILENAME: &str = "validation_report.json";

/// Contents of `validation_report.json` inside a bundle.
#[derive(Debug, Serialize)]
struct BundleReport<'a> {
    kind: ImportKind,
    source_rows: usize,
    output_rows: usize,
    report: &'a ValidationReport,
    warnings: &'a [String],
}

/// Reads the configured input file through `storage`. Relative inputs resolve against the
/// working directory, not the output directory.
pub(crate) async fn extract_table<S: Storage>(storage: &S, input_path: &str) -> Result<Table> {
    let path = std::path::absolute(input_path)?;
    tracing::debug!("Reading input from {}", path.display());
    let data = storage.read_file(&path.to_string_lossy()).await?;
    read_table(&data)
}

/// Writes the CSV artifact and, when asked, a zip bundle next to it. Returns the CSV path.
pub(crate) async fn load_artifact<S: Storage, C: ConfigProvider>(
    storage: &S,
    config: &C,
    kind: ImportKind,
    result: &TransformResult,
) -> Result<String> {
    let filename = output_filename(kind);
    let csv = write_table(&result.table)?;

    tracing::debug!("Writing {} ({} bytes) to storage", filename, csv.len());
    storage.write_file(&filename, csv.as_bytes()).await?;

    if config.bundle() {
        let bundle_name = format!("{}.zip", filename.trim_end_matches(".csv"));
        let zip_data = bundle(&filename, &csv, kind, result)?;
        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        storage.write_file(&bundle_name, &zip_data).await?;
        tracing::info!(
            "📦 Bundle saved to: {}",
            Path::new(config.output_path()).join(&bundle_name).display()
        );
    }

    Ok(Path::new(config.output_path())
        .join(&filename)
        .to_string_lossy()
        .into_owned())
}

fn bundle(csv_name: &str, csv: &str, kind: ImportKind, result: &TransformResult) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    zip.start_file::<_, ()>(csv_name, FileOptions::default())?;
    zip.write_all(csv.as_bytes())?;

    let report = BundleReport {
        kind,
        source_rows: result.source_rows,
        output_rows: result.table.len(),
        report: &result.report,
        warnings: &result.warnings,
    };
    zip.start_file::<_, ()>(REPORT_FILENAME, FileOptions::default())?;
    zip.write_all(serde_json::to_string_pretty(&report)?.as_bytes())?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;

    #[test]
    fn test_bundle_contains_csv_and_report() {
        let result = TransformResult {
            table: Table::new(["Handle"]),
            report: ValidationReport::new(Vec::new(), vec!["heads up".to_string()], 3),
            warnings: vec!["used fallback".to_string()],
            source_rows: 3,
        };
        let data = bundle("orders_x.csv", "Handle\n", ImportKind::Orders, &result).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut csv = String::new();
        archive.by_name("orders_x.csv").unwrap().read_to_string(&mut csv).unwrap();
        assert_eq!(csv, "Handle\n");

        let mut text = String::new();
        archive.by_name(REPORT_FILENAME).unwrap().read_to_string(&mut text).unwrap();
        let report: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(report["kind"], json!("orders"));
        assert_eq!(report["source_rows"], json!(3));
        assert_eq!(report["output_rows"], json!(0));
        assert_eq!(report["report"]["valid"], json!(true));
        assert_eq!(report["warnings"], json!(["used fallback"]));
    }
}
