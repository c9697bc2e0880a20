//! Trait-based conversions between external error types and
//! `DataParserError`.

use super::DataParserError;

impl From<serde_json::Error> for DataParserError {
    fn from(e: serde_json::Error) -> Self {
        Self::Record(e)
    }
}
