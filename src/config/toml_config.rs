use crate::core::ConfigProvider;
use crate::domain::model::ImportKind;
use crate::domain::ports::RetailerTagging;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_io_paths, validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env placeholder regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub customers: CustomersConfig,
    #[serde(default)]
    pub orders: OrdersConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
    pub kind: ImportKind,
    pub input: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub auto_fix_zips: bool,
    #[serde(default)]
    pub bypass: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomersConfig {
    #[serde(default)]
    pub retailer_tagging: RetailerTagging,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrdersConfig {
    #[serde(default)]
    pub rebuild_line_items: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    #[serde(default)]
    pub bundle: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// Loads and parses a TOML config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;
        validate_io_paths("job.input", &self.job.input, "load.output_path", &self.load.output_path)?;

        if let Some(unresolved) = ENV_PLACEHOLDER.find(&self.job.input) {
            return Err(EtlError::InvalidConfigValueError {
                field: "job.input".to_string(),
                value: self.job.input.clone(),
                reason: format!("Environment variable {} is not set", unresolved.as_str()),
            });
        }

        Ok(())
    }

    pub fn kind(&self) -> ImportKind {
        self.job.kind
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.job.input
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn bundle(&self) -> bool {
        self.load.bundle
    }

    fn retailer_tagging(&self) -> RetailerTagging {
        self.customers.retailer_tagging
    }

    fn auto_fix_zips(&self) -> bool {
        self.validation.auto_fix_zips
    }

    fn bypass_validation(&self) -> bool {
        self.validation.bypass
    }

    fn rebuild_line_items(&self) -> bool {
        self.orders.rebuild_line_items
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[job]
name = "spring-migration"
kind = "customers"
input = "exports/customers.csv"

[load]
output_path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.job.name, "spring-migration");
        assert_eq!(config.kind(), ImportKind::Customers);
        assert_eq!(config.input_path(), "exports/customers.csv");
        assert_eq!(config.retailer_tagging(), RetailerTagging::Role);
        assert!(!config.auto_fix_zips());
        assert!(!config.bypass_validation());
        assert!(!config.bundle());
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[job]
name = "orders"
description = "Order history"
kind = "orders"
input = "orders.csv"

[validation]
auto_fix_zips = true
bypass = true

[customers]
retailer_tagging = "is-retailer"

[orders]
rebuild_line_items = true

[load]
output_path = "./out"
bundle = true

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.kind(), ImportKind::Orders);
        assert_eq!(config.retailer_tagging(), RetailerTagging::IsRetailer);
        assert!(config.auto_fix_zips());
        assert!(config.bypass_validation());
        assert!(config.rebuild_line_items());
        assert!(config.bundle());
        assert!(config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("WOO_SHOPIFY_TEST_EXPORT_DIR", "/data/exports");

        let toml_content = r#"
[job]
name = "env"
kind = "products"
input = "${WOO_SHOPIFY_TEST_EXPORT_DIR}/products.csv"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.job.input, "/data/exports/products.csv");

        std::env::remove_var("WOO_SHOPIFY_TEST_EXPORT_DIR");
    }

    #[test]
    fn test_unresolved_placeholder_fails_validation() {
        let toml_content = r#"
[job]
name = "env"
kind = "products"
input = "${WOO_SHOPIFY_TEST_UNSET_VAR}/products.csv"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[job]
name = "bad"
kind = "products"
input = "products.json"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_kind_is_a_parse_error() {
        let toml_content = r#"
[job]
name = "bad"
kind = "coupons"
input = "coupons.csv"

[load]
output_path = "./output"
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(EtlError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[job]
name = "file-test"
kind = "products"
input = "products.csv"

[load]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "file-test");
    }
}
