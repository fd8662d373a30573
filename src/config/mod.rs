pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::ImportKind;
#[cfg(feature = "cli")]
use crate::domain::ports::RetailerTagging;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_io_paths, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "woo-shopify-etl", version)]
#[command(about = "Convert WooCommerce CSV exports into Shopify import files")]
pub struct CliConfig {
    /// Which export the input file holds
    #[arg(value_enum)]
    pub kind: ImportKind,

    /// WooCommerce CSV export to convert
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Zero-pad 4-digit US zip codes and validate again
    #[arg(long = "fix-zips")]
    pub fix_zips: bool,

    /// Write the output even when validation errors remain
    #[arg(long)]
    pub bypass: bool,

    #[arg(long, value_enum, default_value = "role")]
    pub retailer_tagging: RetailerTagging,

    /// Derive Shopify line items from the order rows before transforming
    #[arg(long)]
    pub rebuild_line_items: bool,

    /// Also write a zip with the CSV and the validation report
    #[arg(long)]
    pub bundle: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per stage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn bundle(&self) -> bool {
        self.bundle
    }

    fn retailer_tagging(&self) -> RetailerTagging {
        self.retailer_tagging
    }

    fn auto_fix_zips(&self) -> bool {
        self.fix_zips
    }

    fn bypass_validation(&self) -> bool {
        self.bypass
    }

    fn rebuild_line_items(&self) -> bool {
        self.rebuild_line_items
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_io_paths("input", &self.input, "output_path", &self.output_path)
    }
}
