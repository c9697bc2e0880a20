//! Helpers for classifying parse failures.

use clap::{Error as ClapError, error::ErrorKind};

use super::DataParserError;

/// Returns `true` when a [`clap::Error`] corresponds to `--help` or
/// `--version`.
///
/// Clap surfaces these requests via specialised [`ErrorKind`] variants so
/// entry points can delegate to [`clap::Error::exit`] and preserve the
/// expected zero exit status.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}

impl DataParserError {
    /// Exit status the process would terminate with for this error.
    ///
    /// Input errors use the parser's convention (`2`, or `0` for help and
    /// version requests). Every other failure is a defect in the record and
    /// maps to `1`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CliParsing(err) => err.exit_code(),
            _ => 1,
        }
    }

    /// Returns the parser error when the tokens were rejected.
    #[must_use]
    pub const fn as_clap(&self) -> Option<&ClapError> {
        match self {
            Self::CliParsing(err) => Some(err),
            _ => None,
        }
    }
}
