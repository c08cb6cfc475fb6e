use async_graphql::ErrorExtensions;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use uuid::Uuid;

use crate::entities::project;

/// Payload returned when a caller's expected version is stale. Carries
/// enough for a client to say "changed by someone else" and refetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictError {
    pub current_version: i32,
    pub expected_version: i32,
    pub updated_at: DateTime<Utc>,
}

impl ConflictError {
    pub fn against(project: &project::Model, expected_version: i32) -> Self {
        Self {
            current_version: project.version,
            expected_version,
            updated_at: project.updated_at.with_timezone(&Utc),
        }
    }
}

impl std::fmt::Display for ConflictError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "project was modified by someone else (expected version {}, current version {})",
            self.expected_version, self.current_version
        )
    }
}

/// Engine-level error taxonomy. Conflicts are the only retryable class,
/// and only by the caller after a refetch.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Version conflict: {0}")]
    Conflict(ConflictError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<ConflictError> for EngineError {
    fn from(conflict: ConflictError) -> Self {
        EngineError::Conflict(conflict)
    }
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    pub fn permission(msg: impl Into<String>) -> Self {
        EngineError::Permission(msg.into())
    }

    pub fn project_not_found(id: Uuid) -> Self {
        EngineError::NotFound { entity: "Project", id }
    }

    pub fn user_not_found(id: Uuid) -> Self {
        EngineError::NotFound { entity: "User", id }
    }

    /// Stable machine-readable code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Conflict(_) => "CONFLICT",
            EngineError::Validation(_) => "VALIDATION_ERROR",
            EngineError::NotFound { .. } => "NOT_FOUND",
            EngineError::Permission(_) => "FORBIDDEN",
            EngineError::Database(_) => "INTERNAL_ERROR",
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Conflict(_))
    }

    /// Message safe to hand to a client. Database details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            EngineError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ErrorExtensions for EngineError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.public_message()).extend_with(|_, e| {
            e.set("code", self.code());
            if let EngineError::Conflict(conflict) = self {
                e.set("currentVersion", conflict.current_version);
                e.set("expectedVersion", conflict.expected_version);
                e.set("updatedAt", conflict.updated_at.to_rfc3339());
            }
        })
    }
}
