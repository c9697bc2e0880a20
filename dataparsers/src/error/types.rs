//! Primary error enums for record declaration and parsing flows.

use thiserror::Error;

/// Programmer mistakes in a record's command-line schema.
///
/// Every variant is raised before any token is parsed: while a field is
/// constructed, while a record is resolved, or while its arguments are
/// registered with the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A field was declared without a name.
    #[error("field names must not be empty")]
    EmptyName,

    /// An explicit flag does not start with the `-` marker.
    #[error("flag '{flag}' of field '{field}' must start with a marker character '-'")]
    InvalidFlagPrefix {
        /// Field declaring the flag.
        field: String,
        /// Offending flag text.
        flag: String,
    },

    /// A flag starts with `-` but cannot be expressed by the parser.
    #[error(
        "flag '{flag}' of field '{field}' is not supported; use '-x' for short flags or '--name' for long flags"
    )]
    UnsupportedFlag {
        /// Field declaring the flag.
        field: String,
        /// Offending flag text.
        flag: String,
    },

    /// A field names both a plain group and an exclusive group.
    #[error(
        "field '{field}' cannot belong to both group '{group}' and exclusive group '{exclusive_group}'"
    )]
    GroupConflict {
        /// Field carrying both keys.
        field: String,
        /// Plain group key.
        group: String,
        /// Exclusive group key.
        exclusive_group: String,
    },

    /// A destination override was supplied.
    #[error("field '{field}' sets an explicit destination; destinations are derived from field names")]
    ExplicitDestination {
        /// Field carrying the override.
        field: String,
    },

    /// Two fields resolve to the same destination.
    #[error("destination '{destination}' is registered more than once")]
    DuplicateDestination {
        /// Repeated destination name.
        destination: String,
    },

    /// Two arguments in the same parser share a flag spelling.
    #[error("flag '{flag}' of field '{field}' is already registered in this parser")]
    DuplicateFlag {
        /// Field whose registration collided.
        field: String,
        /// Repeated flag text.
        flag: String,
    },

    /// The multiplicity marker is not one of `?`, `*`, `+`, or a count.
    #[error("invalid nargs '{value}' for field '{field}'; expected '?', '*', '+', or a count")]
    InvalidNargs {
        /// Field carrying the marker.
        field: String,
        /// Offending marker text.
        value: String,
    },

    /// An optional positional is followed by a required one.
    #[error(
        "optional positional '{optional}' cannot precede required positional '{required}'"
    )]
    PositionalOrder {
        /// Optional positional declared first.
        optional: String,
        /// Required positional declared afterwards.
        required: String,
    },

    /// A destination collides with an identifier the parser reserves.
    #[error("destination '{destination}' is reserved by the parser")]
    ReservedDestination {
        /// Reserved name used as a destination.
        destination: String,
    },

    /// The subcommand selector field is misused.
    #[error("invalid subcommand selector '{field}': {reason}")]
    InvalidSelector {
        /// Field involved in the misuse.
        field: String,
        /// Explanation of the rule that was broken.
        reason: &'static str,
    },
}

/// Errors returned by the parse entry points.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DataParserError {
    /// The record schema is invalid.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The tokens were rejected by the parser.
    ///
    /// Only produced by the non-exiting entry points, or when the record
    /// disables `exit_on_error`.
    #[error("Failed to parse command-line arguments: {0}")]
    CliParsing(#[from] clap::Error),

    /// A parsed value could not be read back with its resolved type.
    #[error("Failed to read parsed value for '{destination}': {source}")]
    Matches {
        /// Destination being read.
        destination: String,
        /// Underlying accessor error.
        #[source]
        source: clap::parser::MatchesError,
    },

    /// The parsed values could not be converted into the record type.
    #[error("Failed to build record from parsed values: {0}")]
    Record(#[source] serde_json::Error),
}

/// Result alias used across the crate.
pub type DataParserResult<T> = Result<T, DataParserError>;
