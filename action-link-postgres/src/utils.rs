use heapless::String as HeaplessString;
use sqlx::{postgres::PgRow, Row};
use std::error::Error;
use std::str::FromStr;

/// A trait for converting a database row into a model.
pub trait TryFromRow<R>: Sized {
    fn try_from_row(row: &R) -> Result<Self, Box<dyn Error + Send + Sync>>;
}

#[derive(Debug, thiserror::Error)]
pub enum RowDecodeError {
    #[error("Value for column '{column}' is too long (max {max} chars)")]
    TooLong { column: String, max: usize },
}

fn too_long(col_name: &str, max: usize) -> Box<dyn Error + Send + Sync> {
    Box::new(RowDecodeError::TooLong {
        column: col_name.to_string(),
        max,
    })
}

/// Retrieves a required `HeaplessString` from a row.
pub fn get_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<HeaplessString<N>, Box<dyn Error + Send + Sync>> {
    let s: String = row.try_get(col_name)?;
    // CHAR(n) columns come back space padded
    HeaplessString::from_str(s.trim_end()).map_err(|_| too_long(col_name, N))
}

/// Retrieves an optional `HeaplessString` from a row.
pub fn get_optional_heapless_string<const N: usize>(
    row: &PgRow,
    col_name: &str,
) -> Result<Option<HeaplessString<N>>, Box<dyn Error + Send + Sync>> {
    let s: Option<String> = row.try_get(col_name)?;
    match s {
        Some(value) => HeaplessString::from_str(&value)
            .map(Some)
            .map_err(|_| too_long(col_name, N)),
        None => Ok(None),
    }
}
