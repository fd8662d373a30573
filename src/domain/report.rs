use serde::{Deserialize, Serialize};

/// A validation failure with a safe mechanical repair (currently: 4-digit US zips).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixableDefect {
    /// 1-based display row, counting the header line.
    pub row: usize,
    pub customer: String,
    pub zip: String,
    pub fixed_zip: String,
}

/// Outcome of one validation call. Built fresh per call and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub fixable_defects: Vec<FixableDefect>,
    pub row_count: usize,
}

impl ValidationReport {
    pub fn new(errors: Vec<String>, warnings: Vec<String>, row_count: usize) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            fixable_defects: Vec::new(),
            row_count,
        }
    }

    /// A report with nothing to say, for pipelines without a validator.
    pub fn passing(row_count: usize) -> Self {
        Self::new(Vec::new(), Vec::new(), row_count)
    }

    pub fn with_fixable_defects(mut self, defects: Vec<FixableDefect>) -> Self {
        self.fixable_defects = defects;
        self
    }

    pub fn has_fixable_defects(&self) -> bool {
        !self.fixable_defects.is_empty()
    }
}
