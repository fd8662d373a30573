use crate::core::{ConfigProvider, Pipeline};
use crate::domain::report::ValidationReport;
use crate::utils::error::{EtlError, Result};
use crate::utils::monitor::SystemMonitor;

/// What the engine does when validation fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Apply the pipeline's mechanical repairs and validate again.
    pub auto_fix_zips: bool,
    /// Transform and load even if errors remain.
    pub bypass_validation: bool,
}

impl RunOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            auto_fix_zips: config.auto_fix_zips(),
            bypass_validation: config.bypass_validation(),
        }
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    options: RunOptions,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            options: RunOptions::default(),
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// extract → validate → (repair → validate) → transform → load. Returns the artifact path.
    pub async fn run(&self) -> Result<String> {
        let kind = self.pipeline.kind();
        tracing::info!("🚀 Starting {} import", kind);
        self.monitor.log_stats("Start");

        let mut table = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} row(s), {} column(s)", table.len(), table.columns.len());
        self.monitor.log_stats("Extract");

        let mut report = self.pipeline.validate(&table);
        log_report(&report);

        if !report.valid && report.has_fixable_defects() && self.options.auto_fix_zips {
            tracing::info!(
                "🔧 Applying {} automatic fix(es)",
                report.fixable_defects.len()
            );
            table = self.pipeline.repair(table, &report);
            report = self.pipeline.validate(&table);
            log_report(&report);
        }

        if !report.valid {
            if !self.options.bypass_validation {
                return Err(EtlError::ValidationError {
                    errors: report.errors,
                });
            }
            tracing::warn!(
                "⚠️ Continuing with {} unresolved validation error(s) because bypass is enabled",
                report.errors.len()
            );
        }
        self.monitor.log_stats("Validate");

        let result = self.pipeline.transform(table, report).await?;
        for warning in &result.warnings {
            tracing::debug!("{}", warning);
        }
        tracing::info!(
            "🔄 Transformed {} row(s) into {} row(s)",
            result.source_rows,
            result.table.len()
        );
        self.monitor.log_stats("Transform");

        let output_path = self.pipeline.load(result).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}

fn log_report(report: &ValidationReport) {
    if report.valid {
        tracing::info!("✅ Validation passed for {} row(s)", report.row_count);
    } else {
        tracing::error!("❌ Validation found {} error(s)", report.errors.len());
        for error in &report.errors {
            tracing::error!("{}", error);
        }
    }
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
}
