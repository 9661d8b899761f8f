use sea_orm::{DbErr, RuntimeErr, SqlErr};
use thiserror::Error;

use crate::model::SchemaObject;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Failed to apply {object}: `{source}`")]
    Apply {
        object: SchemaObject,
        #[source]
        source: DbErr,
    },
    #[error("Table `{0}` is part of a foreign key dependency cycle")]
    DependencyCycle(String),
    #[error("Unknown migration `{0}`")]
    UnknownMigration(String),
    #[error("Database error: `{0}`")]
    Db(#[from] DbErr),
}

/// SQLSTATE codes raised when the object being created already exists:
/// duplicate_object, duplicate_table, unique_violation (concurrent catalog
/// inserts on PostgreSQL) and MySQL's table-exists state.
const DUPLICATE_SQLSTATES: [&str; 4] = ["42710", "42P07", "23505", "42S01"];

/// Matched case-insensitively against the error text when the driver gives no
/// SQLSTATE.
const DUPLICATE_MESSAGE_MARKERS: [&str; 2] = ["already exists", "duplicate"];

/// Whether `err` only says that the object being created is already there.
pub fn is_duplicate_object(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }

    match sql_state(err) {
        Some(code) if is_sqlstate(&code) => DUPLICATE_SQLSTATES.contains(&code.as_str()),
        _ => {
            let message = err.to_string().to_lowercase();
            DUPLICATE_MESSAGE_MARKERS
                .iter()
                .any(|marker| message.contains(marker))
        }
    }
}

fn sql_state(err: &DbErr) -> Option<String> {
    match err {
        DbErr::Conn(RuntimeErr::SqlxError(error))
        | DbErr::Exec(RuntimeErr::SqlxError(error))
        | DbErr::Query(RuntimeErr::SqlxError(error)) => error
            .as_database_error()
            .and_then(|error| error.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}

// SQLite reports numeric result codes instead
fn is_sqlstate(code: &str) -> bool {
    code.len() == 5
}
