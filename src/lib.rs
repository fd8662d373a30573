pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::{CustomerPipeline, OrderPipeline, ProductPipeline};
pub use app::run_import;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::etl::{EtlEngine, RunOptions};
pub use domain::model::{ImportKind, Record, Table};
pub use domain::ports::RetailerTagging;
pub use domain::report::{FixableDefect, ValidationReport};
pub use utils::error::{EtlError, Result};
