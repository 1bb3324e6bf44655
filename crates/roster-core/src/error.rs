use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("no control at path '{0}'")]
    PathNotFound(String),

    #[error("control at '{path}' is not a {expected}")]
    NodeKind { path: String, expected: &'static str },

    #[error("no validation message for '{field}' / '{code}'")]
    MissingMessage { field: String, code: String },

    #[error("invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },

    #[error("invalid contact preference: {0}")]
    InvalidContactPreference(String),

    #[error("invalid proficiency: {0}")]
    InvalidProficiency(String),

    #[error("employee not found: {0}")]
    EmployeeNotFound(u64),

    #[error("employee has no id")]
    MissingEmployeeId,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl RosterError {
    /// Programming errors: a path or message-table entry the form was
    /// never configured with.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            RosterError::PathNotFound(_)
                | RosterError::NodeKind { .. }
                | RosterError::MissingMessage { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
