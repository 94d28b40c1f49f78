use thiserror::Error;

#[derive(Error, Debug)]
pub enum RizzaError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown entity: {name}")]
    UnknownEntityError { name: String },

    #[error("Unknown method '{method}' on entity {entity}")]
    UnknownMethodError { entity: String, method: String },

    #[error("Task import failed at {path}:{line}: {reason}")]
    TaskImportError {
        path: String,
        line: usize,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Config,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RizzaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RizzaError::ApiError(_) | RizzaError::UrlError(_) => ErrorCategory::Network,
            RizzaError::ConfigError { .. }
            | RizzaError::MissingConfigError { .. }
            | RizzaError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            RizzaError::SerializationError(_)
            | RizzaError::TaskImportError { .. }
            | RizzaError::UnknownEntityError { .. }
            | RizzaError::UnknownMethodError { .. } => ErrorCategory::Data,
            RizzaError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RizzaError::ApiError(_) => ErrorSeverity::Medium,
            RizzaError::UrlError(_)
            | RizzaError::SerializationError(_)
            | RizzaError::TaskImportError { .. }
            | RizzaError::UnknownEntityError { .. }
            | RizzaError::UnknownMethodError { .. }
            | RizzaError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            RizzaError::ConfigError { .. }
            | RizzaError::MissingConfigError { .. }
            | RizzaError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the target server: {}", self),
            ErrorCategory::Config => format!("Configuration problem: {}", self),
            ErrorCategory::Data => format!("Bad input data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RizzaError::ApiError(_) => {
                "Check that the target URL is reachable and credentials are valid \
                 (rizza config --show)"
                    .to_string()
            }
            RizzaError::UrlError(_) => {
                "Pass a full URL including scheme, e.g. https://server.example.com".to_string()
            }
            RizzaError::ConfigError { .. } | RizzaError::MissingConfigError { .. } => {
                "Run `rizza config -u <user> -p <password> -t <url>` to save a target".to_string()
            }
            RizzaError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value passed for '{}' and retry", field)
            }
            RizzaError::UnknownEntityError { .. } => {
                "Run `rizza list entities` to see the available entity names".to_string()
            }
            RizzaError::UnknownMethodError { entity, .. } => {
                format!("Run `rizza list methods -e {}` to see its methods", entity)
            }
            RizzaError::TaskImportError { .. } => {
                "The task file must contain one JSON task object per line; re-export it \
                 with `rizza brute -o <path>`"
                    .to_string()
            }
            RizzaError::SerializationError(_) => {
                "The file content is not valid JSON; regenerate it".to_string()
            }
            RizzaError::IoError(_) => {
                "Check file permissions and that the parent directory exists".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RizzaError>;
