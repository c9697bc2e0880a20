//! Error types produced while declaring, building, and parsing records.

mod conversions;
mod helpers;
mod types;

pub use helpers::is_display_request;
pub use types::{ConfigurationError, DataParserError, DataParserResult};
