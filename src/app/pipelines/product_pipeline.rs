use super::{extract_table, load_artifact};
use crate::core::product::{ProductTransformer, TransformStats};
use crate::core::{ConfigProvider, Pipeline, Storage, Table, TransformResult};
use crate::domain::model::ImportKind;
use crate::domain::report::ValidationReport;
use crate::utils::error::Result;

pub struct ProductPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    transformer: ProductTransformer,
}

impl<S: Storage, C: ConfigProvider> ProductPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            transformer: ProductTransformer::new(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ProductPipeline<S, C> {
    fn kind(&self) -> ImportKind {
        ImportKind::Products
    }

    async fn extract(&self) -> Result<Table> {
        extract_table(&self.storage, self.config.input_path()).await
    }

    /// Products have no row-level checks; missing columns surface as a schema error
    /// from `transform`.
    fn validate(&self, table: &Table) -> ValidationReport {
        ValidationReport::passing(table.len())
    }

    async fn transform(&self, data: Table, report: ValidationReport) -> Result<TransformResult> {
        let source_rows = data.len();
        let table = self.transformer.transform(data)?;

        let stats = TransformStats::compute(source_rows, &table);
        tracing::info!(
            "📊 Products: {} in, {} out, {} with images, {} active",
            stats.input_rows,
            stats.output_rows,
            stats.rows_with_images,
            stats.active_products
        );

        Ok(TransformResult {
            table,
            report,
            warnings: Vec::new(),
            source_rows,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        load_artifact(&self.storage, &self.config, self.kind(), &result).await
    }
}
