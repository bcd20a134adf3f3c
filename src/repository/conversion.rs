use std::str::FromStr;

use thiserror::Error;
use time::{format_description::well_known::Iso8601, OffsetDateTime};

use crate::models::{types::UtcDateTime, InvalidToken, SubmissionId, Token};

/// Values that are read back from a database row or column.
pub trait FromDB: Sized {
    type DBType;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError>;
}

/// Values that are also written, e.g. bound as query parameters.
pub trait DBConvertible: FromDB {
    fn to_db(&self) -> Result<Self::DBType, DBToConversionError>;
}

#[derive(Debug, Error)]
pub enum DBFromConversionError {
    #[error("Failed to parse datetime: {0}")]
    DateTime(#[from] time::error::Parse),
    #[error("Invalid number: {0}")]
    InvalidNumber(i64),
    #[error(transparent)]
    Token(#[from] InvalidToken),
}

#[derive(Debug, Error)]
pub enum DBToConversionError {
    #[error("Failed to format datetime")]
    DateTime(#[from] time::error::Format),
}

// Stored as fixed-width ISO 8601 text, so lexicographic order is chronological.
impl FromDB for UtcDateTime {
    type DBType = String;

    fn from_db(db_value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        let datetime = OffsetDateTime::parse(db_value, &Iso8601::DEFAULT)?;
        Ok(UtcDateTime::from(datetime))
    }
}

impl DBConvertible for UtcDateTime {
    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        let string = OffsetDateTime::from(*self).format(&Iso8601::DEFAULT)?;
        Ok(string)
    }
}

impl FromDB for SubmissionId {
    type DBType = i64;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        u64::try_from(*value)
            .map(SubmissionId)
            .map_err(|_| DBFromConversionError::InvalidNumber(*value))
    }
}

impl FromDB for Token {
    type DBType = String;

    fn from_db(value: &Self::DBType) -> Result<Self, DBFromConversionError> {
        Ok(Token::from_str(value)?)
    }
}

impl DBConvertible for Token {
    fn to_db(&self) -> Result<Self::DBType, DBToConversionError> {
        Ok(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::models::{types::UtcDateTime, SubmissionId, Token};

    use super::{DBConvertible, FromDB};

    #[test]
    fn datetime_text_sorts_chronologically() {
        let earlier = UtcDateTime::from(datetime!(2026-10-19 9:05:01.5 UTC));
        let later = UtcDateTime::from(datetime!(2026-10-19 10:00:00 UTC));

        let earlier_db = earlier.to_db().unwrap();
        let later_db = later.to_db().unwrap();

        assert_eq!(earlier_db.len(), later_db.len());
        assert!(earlier_db < later_db);
    }

    #[test]
    fn datetime_survives_storage() {
        let value = UtcDateTime::from(datetime!(2026-01-02 03:04:05.123456789 UTC));
        assert_eq!(UtcDateTime::from_db(&value.to_db().unwrap()).unwrap(), value);
    }

    #[test]
    fn negative_id_rejected() {
        assert!(SubmissionId::from_db(&-1).is_err());
    }

    #[test]
    fn malformed_token_rejected() {
        assert!(Token::from_db(&"../etc/passwd".to_string()).is_err());
    }
}
