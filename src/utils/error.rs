use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Databasfel: {0}")]
    Database(rusqlite::Error),

    #[error("IO-fel: {0}")]
    Io(#[from] std::io::Error),

    #[error("Valideringsfel ({field}): {message}")]
    Validation { field: String, message: String },

    #[error("Hittades inte: {0}")]
    NotFound(String),

    #[error("Redan finns: {0}")]
    AlreadyExists(String),

    #[error("Blockeras av beroende poster: {0}")]
    ForeignKey(String),

    #[error("Okänd rapport: {0}")]
    UnknownReport(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn already_exists(msg: impl Into<String>) -> Self {
        Self::AlreadyExists(msg.into())
    }

    pub fn foreign_key(msg: impl Into<String>) -> Self {
        Self::ForeignKey(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

impl From<rusqlite::Error> for AppError {
    /// Översätt constraint-fel från SQLite till taxonomin ovan.
    /// UNIQUE-brott blir `AlreadyExists` med kolumnnamnet,
    /// FOREIGN KEY-brott blir `ForeignKey`.
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ffi_err, Some(msg)) = &e {
            if ffi_err.code == rusqlite::ErrorCode::ConstraintViolation {
                if let Some(column) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    return AppError::AlreadyExists(column.to_string());
                }
                if msg.contains("FOREIGN KEY constraint failed") {
                    return AppError::ForeignKey("främmande nyckel".to_string());
                }
            }
        }
        AppError::Database(e)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_maps_to_already_exists() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (ssn TEXT UNIQUE);").unwrap();
        conn.execute("INSERT INTO t (ssn) VALUES ('123')", []).unwrap();

        let err: AppError = conn
            .execute("INSERT INTO t (ssn) VALUES ('123')", [])
            .unwrap_err()
            .into();

        match err {
            AppError::AlreadyExists(column) => assert_eq!(column, "t.ssn"),
            other => panic!("fel variant: {:?}", other),
        }
    }

    #[test]
    fn test_fk_violation_maps_to_foreign_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (parent_id INTEGER REFERENCES parent(id));",
        )
        .unwrap();

        let err: AppError = conn
            .execute("INSERT INTO child (parent_id) VALUES (99)", [])
            .unwrap_err()
            .into();

        assert!(matches!(err, AppError::ForeignKey(_)));
    }

    #[test]
    fn test_validation_display() {
        let err = AppError::validation("birthdate", "Födelsedatum kan inte ligga i framtiden");
        assert_eq!(
            err.to_string(),
            "Valideringsfel (birthdate): Födelsedatum kan inte ligga i framtiden"
        );
    }
}
