use super::{extract_table, load_artifact};
use crate::core::customer::CustomerTransformer;
use crate::core::{ConfigProvider, Pipeline, Storage, Table, TransformResult};
use crate::domain::model::ImportKind;
use crate::domain::report::ValidationReport;
use crate::utils::error::Result;

pub struct CustomerPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    transformer: CustomerTransformer,
}

impl<S: Storage, C: ConfigProvider> CustomerPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let transformer = CustomerTransformer::new(config.retailer_tagging());
        Self {
            storage,
            config,
            transformer,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CustomerPipeline<S, C> {
    fn kind(&self) -> ImportKind {
        ImportKind::Customers
    }

    async fn extract(&self) -> Result<Table> {
        extract_table(&self.storage, self.config.input_path()).await
    }

    fn validate(&self, table: &Table) -> ValidationReport {
        self.transformer.validate(table)
    }

    fn repair(&self, table: Table, report: &ValidationReport) -> Table {
        if report.has_fixable_defects() {
            self.transformer.fix_4digit_zips(table)
        } else {
            table
        }
    }

    async fn transform(&self, data: Table, report: ValidationReport) -> Result<TransformResult> {
        let source_rows = data.len();
        let table = self.transformer.transform(data);
        tracing::debug!("Customer columns after transform: {:?}", table.columns);

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
