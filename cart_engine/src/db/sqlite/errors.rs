use thiserror::Error;

use crate::{db::traits::LedgerError, db_types::Money};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("{quantity} units at {unit_price} do not fit in a line total")]
    LineTotalOverflow { quantity: i64, unit_price: Money },
}

impl From<SqliteDatabaseError> for LedgerError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::LineTotalOverflow { quantity, unit_price } => {
                LedgerError::QuantityTooLarge { quantity, unit_price }
            },
            e => LedgerError::DatabaseError(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(e: sqlx::Error) -> Self {
        LedgerError::DatabaseError(e.to_string())
    }
}
