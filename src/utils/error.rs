use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitchenError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Ephemeris unavailable: {message}")]
    EphemerisError { message: String },

    #[error("Circuit open for {service}, skipping remote call")]
    CircuitOpen { service: String },

    #[error("Catalog error: {message}")]
    CatalogError { message: String },

    #[error("Invalid input '{value}' for {field}")]
    InvalidInput { field: String, value: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KitchenError {
    pub fn invalid_input(field: &str, value: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::EphemerisError { .. } | Self::CircuitOpen { .. } => {
                ErrorCategory::Network
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::CsvError(_)
            | Self::SerializationError(_)
            | Self::CatalogError { .. }
            | Self::ProcessingError { .. } => ErrorCategory::Data,
            Self::InvalidInput { .. } => ErrorCategory::Input,
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data | ErrorCategory::Input => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ApiError(_) | Self::EphemerisError { .. } => {
                "Check the ephemeris endpoints and network access, or rerun with --offline"
            }
            Self::CircuitOpen { .. } => {
                "The ephemeris API failed repeatedly; wait for the recovery timeout or use --offline"
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and try again",
            Self::CsvError(_) | Self::CatalogError { .. } => {
                "Check the ingredient CSV and recipe catalog files for malformed rows"
            }
            Self::SerializationError(_) => "Check that the JSON input files are well formed",
            Self::InvalidInput { .. } => "Check the command arguments",
            Self::ProcessingError { .. } => "Rerun with --verbose to see which stage failed",
            Self::ZipError(_) | Self::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the ephemeris service: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Could not process kitchen data: {}", self),
            ErrorCategory::Input => format!("Invalid argument: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, KitchenError>;
