// Application layer: one pipeline per import kind, wired to storage and configuration.
pub mod pipelines;

use crate::config::cli::LocalStorage;
use crate::core::etl::{EtlEngine, RunOptions};
use crate::core::ConfigProvider;
use crate::domain::model::ImportKind;
use crate::utils::error::Result;
use pipelines::{CustomerPipeline, OrderPipeline, ProductPipeline};

/// Runs one import against local files: input from `config.input_path()`, artifacts into
/// `config.output_path()`. Returns the written CSV path.
pub async fn run_import<C: ConfigProvider>(
    kind: ImportKind,
    config: C,
    monitor_enabled: bool,
) -> Result<String> {
    let options = RunOptions::from_config(&config);
    let storage = LocalStorage::new(config.output_path().to_string());

    match kind {
        ImportKind::Products => {
            EtlEngine::new_with_monitoring(ProductPipeline::new(storage, config), monitor_enabled)
                .with_options(options)
                .run()
                .await
        }
        ImportKind::Customers => {
            EtlEngine::new_with_monitoring(CustomerPipeline::new(storage, config), monitor_enabled)
                .with_options(options)
                .run()
                .await
        }
        ImportKind::Orders => {
            EtlEngine::new_with_monitoring(OrderPipeline::new(storage, config), monitor_enabled)
                .with_options(options)
                .run()
                .await
        }
    }
}
