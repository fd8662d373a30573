use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Missing required columns: {missing:?}")]
    SchemaError { missing: Vec<String> },

    #[error("Validation failed with {} error(s):\n{}", .errors.len(), .errors.join("\n"))]
    ValidationError { errors: Vec<String> },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Validation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::CsvError(_) | EtlError::SchemaError { .. } => ErrorCategory::Input,
            EtlError::ValidationError { .. } => ErrorCategory::Validation,
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::ZipError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // the user can fix the file and retry
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::SchemaError { .. } => {
                "Make sure the CSV has the expected WooCommerce export columns".to_string()
            }
            EtlError::ValidationError { .. } => {
                "Fix the listed rows, re-run with --fix-zips for 4-digit zips, or use --bypass"
                    .to_string()
            }
            EtlError::CsvError(_) => "Check the CSV file format and try again".to_string(),
            EtlError::IoError(_) => "Check that the input exists and the output path is writable".to_string(),
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the command line arguments or configuration file".to_string()
            }
            EtlError::ZipError(_) | EtlError::SerializationError(_) => {
                "Retry without --bundle".to_string()
            }
            EtlError::ProcessingError { .. } => "Please report this input file".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::SchemaError { missing } => {
                format!("Error processing file: missing required columns {}", missing.join(", "))
            }
            EtlError::ValidationError { errors } => {
                format!("Data validation failed ({} issue groups)", errors.len())
            }
            other => format!("Error processing file: {other}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
