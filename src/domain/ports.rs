use crate::domain::model::{ImportKind, Table};
use crate::domain::report::ValidationReport;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// How the customer `Tags` column is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum RetailerTagging {
    /// `Role` equal to "retailer" (any case) tags the customer; nothing else does.
    #[default]
    Role,
    /// A non-null `Is_Retailer` decides ("yes" tags, anything else clears);
    /// `Role` is consulted only when `Is_Retailer` is null or missing.
    IsRetailer,
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn bundle(&self) -> bool;
    fn retailer_tagging(&self) -> RetailerTagging;
    fn auto_fix_zips(&self) -> bool;
    fn bypass_validation(&self) -> bool;
    fn rebuild_line_items(&self) -> bool;
}

/// Everything `load` needs to emit the artifact.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: Table,
    pub report: ValidationReport,
    pub warnings: Vec<String>,
    pub source_rows: usize,
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    fn kind(&self) -> ImportKind;
    async fn extract(&self) -> Result<Table>;
    fn validate(&self, table: &Table) -> ValidationReport;
    /// Applies the mechanical repairs a report offers. The default has none.
    fn repair(&self, table: Table, _report: &ValidationReport) -> Table {
        table
    }
    async fn transform(&self, data: Table, report: ValidationReport) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
