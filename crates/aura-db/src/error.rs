//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Error Propagation                              │
//! │                                                                     │
//! │  SQLite Error (sqlx::Error)                                         │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  DbError (this module) ← classifies constraint violations           │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SettlementError (settlement.rs) ← what callers handle              │
//! │                                                                     │
//! │  The unique-violation classification matters: the settlement        │
//! │  engine keys its bounded invoice retry on it.                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These wrap sqlx errors and add context and categorization. Constraint
/// violations are split out because callers react to them differently:
/// unique violations trigger the invoice retry, CHECK violations indicate
/// an invariant backstop fired that the CAS layer should have caught.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation (e.g. duplicate invoice number when
    /// two terminals settle for the same store simultaneously).
    #[error("Unique constraint violated on {constraint}")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation (e.g. settling against a
    /// customer row that was deleted mid-flight).
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation. The schema backstops the non-negative
    /// invariants (stock, loyalty points); reaching this means a caller
    /// bypassed the CAS statements.
    #[error("Check constraint violation: {message}")]
    CheckViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// True when this error is a unique violation on the given column
    /// (matched by name against the constraint description).
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        matches!(self, DbError::UniqueViolation { constraint } if constraint.contains(column))
    }
}

/// Convert sqlx errors to DbError.
///
/// SQLite reports constraints in the error message:
/// - `UNIQUE constraint failed: <table>.<column>[, ...]`
/// - `FOREIGN KEY constraint failed`
/// - `CHECK constraint failed: <expr>`
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                if let Some(constraint) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        constraint: constraint.to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_matcher() {
        let err = DbError::UniqueViolation {
            constraint: "transactions.store_id, transactions.invoice_number".to_string(),
        };
        assert!(err.is_unique_violation_on("invoice_number"));
        assert!(!err.is_unique_violation_on("stock"));

        let other = DbError::PoolExhausted;
        assert!(!other.is_unique_violation_on("invoice_number"));
    }
}
