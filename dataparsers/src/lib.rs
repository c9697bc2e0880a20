//! Declarative command-line parsers for plain record types.
//!
//! A record type describes its command line as an ordered list of
//! [`FieldDescriptor`]s plus a [`RecordConfig`]. The resolution engine turns
//! those declarations into a `clap` parser (positional or flagged arguments,
//! groups, mutually exclusive groups, boolean defaults, and subcommands), and
//! the parsed values are converted back into the record with `serde`.
//!
//! Most users derive [`DataParser`]:
//!
//! ```rust,no_run
//! use dataparsers::DataParser;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, DataParser)]
//! #[dataparser(prog = "demo")]
//! struct Args {
//!     path: String,
//!     #[dataparser(flags("-b"), default = 42, help = "bar help")]
//!     bar: i64,
//! }
//!
//! # fn main() -> Result<(), dataparsers::DataParserError> {
//! let args = Args::parse()?;
//! println!("{args:?}");
//! # Ok(())
//! # }
//! ```

pub use dataparsers_macros::DataParser;

mod build;
mod config;
mod error;
pub mod field;
mod marshal;
pub mod resolve;

pub use clap;
pub use config::{ParserOptions, RecordConfig, SubcommandConfig};
pub use error::{ConfigurationError, DataParserError, DataParserResult, is_display_request};
pub use field::{
    ArgAction, ArgOptions, FieldBuilder, FieldDescriptor, FieldKind, GroupKey, Nargs,
    SelectorOptions, ValueType,
};
pub use resolve::RecordPlan;
pub use serde_json;

use std::ffi::OsString;

use clap::Command;
use serde::de::DeserializeOwned;
use tracing::debug;

/// A record type whose fields describe a command line.
///
/// Implementors supply [`DataParser::fields`] (and optionally
/// [`DataParser::record_config`]); every other method is provided. Each
/// method resolves the declarations afresh, so no state is shared between
/// calls.
pub trait DataParser: Sized + DeserializeOwned {
    /// Field descriptors in declaration order.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when a field declaration is invalid.
    fn fields() -> Result<Vec<FieldDescriptor>, ConfigurationError>;

    /// Parser-level configuration; defaults everywhere unless overridden.
    #[must_use]
    fn record_config() -> RecordConfig {
        RecordConfig::default()
    }

    /// Runs the resolution pass without building a parser.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the declarations are invalid.
    fn plan() -> Result<RecordPlan, ConfigurationError> {
        resolve::resolve(&Self::fields()?, &Self::record_config())
    }

    /// Builds the configured parser without parsing anything.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the declarations are invalid.
    fn command() -> Result<Command, ConfigurationError> {
        let config = Self::record_config();
        Self::command_from(build::base_command(&config, &default_program_name::<Self>()))
    }

    /// Registers this record's arguments on an existing parser.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when the declarations are invalid.
    fn command_from(base: Command) -> Result<Command, ConfigurationError> {
        let config = Self::record_config();
        let plan = resolve::resolve(&Self::fields()?, &config)?;
        Ok(build::command(&plan, &config, base))
    }

    /// Parses the process's arguments.
    ///
    /// Input errors and help requests terminate the process with the
    /// parser's conventional status unless the record disables
    /// `exit_on_error`.
    ///
    /// # Errors
    ///
    /// Returns [`DataParserError::Configuration`] for an invalid schema and
    /// [`DataParserError::Record`] when the values do not fit the record.
    fn parse() -> DataParserResult<Self> {
        let config = Self::record_config();
        let base = build::base_command(&config, &default_program_name::<Self>());
        run::<Self>(base, std::env::args_os(), true)
    }

    /// Parses `tokens`, which exclude the program name.
    ///
    /// Exits like [`DataParser::parse`] on input errors.
    ///
    /// # Errors
    ///
    /// As for [`DataParser::parse`].
    fn parse_args<I, S>(tokens: I) -> DataParserResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let config = Self::record_config();
        Self::parse_args_with(build::base_command(&config, &default_program_name::<Self>()), tokens)
    }

    /// Parses `tokens` into an extension of `base`.
    ///
    /// # Errors
    ///
    /// As for [`DataParser::parse`].
    fn parse_args_with<I, S>(base: Command, tokens: I) -> DataParserResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let argv = program_and(&base, tokens);
        run::<Self>(base, argv, true)
    }

    /// Parses `tokens` and returns input errors instead of exiting.
    ///
    /// # Errors
    ///
    /// Additionally returns [`DataParserError::CliParsing`] when the tokens
    /// are rejected or help is requested.
    fn try_parse_args<I, S>(tokens: I) -> DataParserResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let config = Self::record_config();
        let base = build::base_command(&config, &default_program_name::<Self>());
        let argv = program_and(&base, tokens);
        run::<Self>(base, argv, false)
    }
}

/// Builds the parser for `T`.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when `T`'s declarations are invalid.
pub fn make_parser<T: DataParser>() -> Result<Command, ConfigurationError> {
    T::command()
}

/// Parses `tokens` (program name excluded) into `T`.
///
/// # Errors
///
/// As for [`DataParser::parse_args`].
pub fn parse<T, I, S>(tokens: I) -> DataParserResult<T>
where
    T: DataParser,
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    T::parse_args(tokens)
}

fn program_and<I, S>(base: &Command, tokens: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    std::iter::once(OsString::from(base.get_name()))
        .chain(tokens.into_iter().map(Into::into))
        .collect()
}

fn run<T: DataParser>(
    base: Command,
    argv: impl IntoIterator<Item = OsString>,
    may_exit: bool,
) -> DataParserResult<T> {
    let config = T::record_config();
    let plan = resolve::resolve(&T::fields()?, &config)?;
    debug!(record = std::any::type_name::<T>(), "parsing record");
    let cmd = build::command(&plan, &config, base);
    let matches = match cmd.try_get_matches_from(argv) {
        Ok(matches) => matches,
        Err(err) if may_exit && config.parser_options().exit_on_error => err.exit(),
        Err(err) => return Err(err.into()),
    };
    let value = marshal::record_value(&plan, &matches)?;
    serde_json::from_value(value).map_err(DataParserError::Record)
}

/// Lower-cased final path segment of `T`'s type name.
fn default_program_name<T>() -> String {
    let full = std::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
        .to_ascii_lowercase()
}
