use thiserror::Error;

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("No valid assignment options for {participant}")]
    NoFeasibleOptions { participant: String },

    #[error("No valid cyclic assignment exists for group {group}")]
    NoFeasibleAssignment { group: String },

    #[error("Need at least 2 participants, found {count}")]
    TooFewParticipants { count: usize },

    #[error("Invalid roster: {message}")]
    InvalidRoster { message: String },

    #[error("Group not found: {group}")]
    GroupNotFound { group: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

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
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Constraint,
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::NoFeasibleOptions { .. }
            | SantaError::NoFeasibleAssignment { .. }
            | SantaError::TooFewParticipants { .. } => ErrorCategory::Constraint,
            SantaError::InvalidRoster { .. }
            | SantaError::GroupNotFound { .. }
            | SantaError::CsvError(_)
            | SantaError::TomlError(_) => ErrorCategory::Input,
            SantaError::ConfigValidationError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SantaError::IoError(_)
            | SantaError::SerializationError(_)
            | SantaError::StorageError { .. } => ErrorCategory::Storage,
        }
    }

    /// Constraint failures are a legitimate outcome, so they rank below input mistakes.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Constraint => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            SantaError::NoFeasibleOptions { participant } => format!(
                "Relax the restrictions for {participant} or clear some of their past assignments"
            ),
            SantaError::NoFeasibleAssignment { .. } => {
                "Try adjusting restrictions or clearing some past assignments".to_string()
            }
            SantaError::TooFewParticipants { .. } => {
                "Add more participants to the group".to_string()
            }
            SantaError::InvalidRoster { .. } => {
                "Check that names and ids are unique and allow-lists only name other group members"
                    .to_string()
            }
            SantaError::GroupNotFound { .. } => "Check the group name in the roster file".to_string(),
            SantaError::CsvError(_) => {
                "Check the roster CSV header: id,name,email,allowed,excluded".to_string()
            }
            SantaError::TomlError(_) | SantaError::ConfigValidationError { .. } => {
                "Make sure the file exists and is valid TOML format".to_string()
            }
            SantaError::InvalidConfigValueError { field, .. }
            | SantaError::MissingConfigError { field } => {
                format!("Provide a valid value for {field}")
            }
            SantaError::IoError(_) => "Check file paths and permissions".to_string(),
            SantaError::SerializationError(_) | SantaError::StorageError { .. } => {
                "Check that the history file is valid JSON and writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SantaError::NoFeasibleOptions { participant } => format!(
                "{participant} has nobody left to give to. They may have already been assigned to \
                 every available participant or have too many restrictions."
            ),
            SantaError::NoFeasibleAssignment { group } => format!(
                "No valid assignment could be created for '{group}'. The restrictions and past \
                 assignments conflict with each other."
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
