use async_graphql::ErrorExtensions;
use thiserror::Error;

use crate::model::RecordKind;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Can't find the {kind} with id ({id})")]
    NotFound { kind: RecordKind, id: String },

    /// A relational reference that must resolve at mutation time does not.
    #[error("{} not found", .kind.title())]
    InvalidReference { kind: RecordKind, id: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Project already initialized at {0}")]
    AlreadyInitialized(String),
}

impl RosterError {
    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn invalid_reference(kind: RecordKind, id: impl Into<String>) -> Self {
        Self::InvalidReference {
            kind,
            id: id.into(),
        }
    }

    /// Machine-readable code attached to GraphQL errors under `extensions.code`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidReference { .. } => "VALIDATION_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ErrorExtensions for RosterError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, e| e.set("code", self.code().to_string()))
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
