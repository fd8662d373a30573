use super::{extract_table, load_artifact};
use crate::core::order::OrderTransformer;
use crate::core::{ConfigProvider, Pipeline, Storage, Table, TransformResult};
use crate::domain::model::ImportKind;
use crate::domain::report::ValidationReport;
use crate::utils::error::Result;

pub struct OrderPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    transformer: OrderTransformer,
}

impl<S: Storage, C: ConfigProvider> OrderPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let transformer = OrderTransformer::new(config.rebuild_line_items());
        Self {
            storage,
            config,
            transformer,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OrderPipeline<S, C> {
    fn kind(&self) -> ImportKind {
        ImportKind::Orders
    }

    async fn extract(&self) -> Result<Table> {
        extract_table(&self.storage, self.config.input_path()).await
    }

    fn validate(&self, table: &Table) -> ValidationReport {
        self.transformer.validate(table)
    }

    async fn transform(&self, data: Table, report: ValidationReport) -> Result<TransformResult> {
        let source_rows = data.len();
        let (table, advisories) = self.transformer.transform_with_advisories(data);
        if !advisories.is_empty() {
            tracing::info!(
                "📧 {} email fallback(s), 📞 {} phone clean-up(s) applied",
                advisories.email_fallbacks.len(),
                advisories.phone_cleanups.len()
            );
        }

        Ok(TransformResult {
            table,
            report,
            warnings: advisories.into_warnings(),
            source_rows,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        load_artifact(&self.storage, &self.config, self.kind(), &result).await
    }
}
