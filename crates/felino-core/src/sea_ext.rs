use sea_orm::{DbErr, SqlErr};

pub trait DbErrExt {
    /// `true` when the driver reports a unique-constraint violation.
    fn is_unique_violation(&self) -> bool;
}

impl DbErrExt for DbErr {
    fn is_unique_violation(&self) -> bool {
        matches!(self.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
    }
}
