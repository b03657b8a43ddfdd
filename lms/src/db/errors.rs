use thiserror::Error;

/// Unified error type for store operations that application code can handle
#[derive(Error, Debug)]
pub enum DbError {
    /// Entity not found by the given identifier
    #[error("Entity not found")]
    NotFound,

    /// Unique constraint violation
    #[error("Unique constraint violation")]
    UniqueViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Foreign key constraint violation
    #[error("Foreign key constraint violation")]
    ForeignKeyViolation {
        constraint: Option<String>,
        table: Option<String>,
        message: String,
    },

    /// Catch-all for non-recoverable errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
impl DbError {
    /// True when this is a unique violation raised on the given table.
    pub fn is_unique_violation_on(&self, table_name: &str) -> bool {
        matches!(self, DbError::UniqueViolation { table: Some(t), .. } if t == table_name)
    }
}

/// Convert from sqlx::Error using proper sqlx error categorization
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    DbError::UniqueViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table: db_err.table().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else if db_err.is_foreign_key_violation() {
                    DbError::ForeignKeyViolation {
                        constraint: db_err.constraint().map(|s| s.to_string()),
                        table: db_err.table().map(|s| s.to_string()),
                        message: db_err.message().to_string(),
                    }
                } else {
                    // All other database errors are non-recoverable - convert to anyhow
                    DbError::Other(anyhow::Error::from(err))
                }
            }
            _ => DbError::Other(anyhow::Error::from(err)),
        }
    }
}

/// Type alias for database operation results
pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(DbError::from(sqlx::Error::RowNotFound), DbError::NotFound));
    }

    #[test]
    fn test_unique_violation_table_match() {
        let err = DbError::UniqueViolation {
            constraint: Some("enrollments_student_course_key".to_string()),
            table: Some("enrollments".to_string()),
            message: "duplicate key".to_string(),
        };
        assert!(err.is_unique_violation_on("enrollments"));
        assert!(!err.is_unique_violation_on("users"));
        assert!(!DbError::NotFound.is_unique_violation_on("enrollments"));
    }
}
