use clap::Parser;
use woo_shopify_etl::utils::error::ErrorSeverity;
use woo_shopify_etl::utils::{logger, validation::Validate};
use woo_shopify_etl::{run_import, CliConfig, EtlError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting woo-shopify-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let kind = config.kind;
    match run_import(kind, config, monitor_enabled).await {
        Ok(output_path) => {
            tracing::info!("✅ {} import completed successfully!", kind);
            println!("✅ {} import completed successfully!", kind);
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Import failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            if let EtlError::ValidationError { errors } = &e {
                for error in errors {
                    eprintln!("{}", error);
                }
            }
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // exit code follows severity
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
