//! Records that implement `DataParser` by hand.

use anyhow::{Context, Result, anyhow, ensure};
use dataparsers::{
    ConfigurationError, DataParser, DataParserError, FieldDescriptor, RecordConfig, ValueType,
};
use rstest::rstest;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Manual {
    input: String,
    level: i64,
    quiet: bool,
}

impl DataParser for Manual {
    fn fields() -> Result<Vec<FieldDescriptor>, ConfigurationError> {
        Ok(vec![
            FieldDescriptor::builder("input", ValueType::String)
                .help("file to read")
                .build()?,
            FieldDescriptor::builder("level", ValueType::Integer)
                .flag("-l")
                .default(1)
                .nargs("?")
                .const_value(5)
                .build()?,
            FieldDescriptor::builder("quiet", ValueType::Bool).build()?,
        ])
    }

    fn record_config() -> RecordConfig {
        RecordConfig::new().prog("manual").version("1.2.3")
    }
}

#[derive(Debug, Deserialize)]
struct Broken {
    #[expect(dead_code, reason = "never constructed; parsing fails first")]
    value: String,
}

impl DataParser for Broken {
    fn fields() -> Result<Vec<FieldDescriptor>, ConfigurationError> {
        Ok(vec![
            FieldDescriptor::builder("value", ValueType::String)
                .flag("value")
                .build()?,
        ])
    }
}

#[derive(Debug, Deserialize)]
struct Mismatched {
    #[expect(dead_code, reason = "never constructed; deserialisation fails")]
    count: u8,
}

impl DataParser for Mismatched {
    fn fields() -> Result<Vec<FieldDescriptor>, ConfigurationError> {
        Ok(vec![
            FieldDescriptor::builder("count", ValueType::String).build()?,
        ])
    }
}

#[derive(Debug, Deserialize)]
struct HelpTopic {
    #[expect(dead_code, reason = "never constructed; resolution fails first")]
    help: String,
}

impl DataParser for HelpTopic {
    fn fields() -> Result<Vec<FieldDescriptor>, ConfigurationError> {
        Ok(vec![
            FieldDescriptor::builder("help", ValueType::String).build()?,
        ])
    }
}

#[rstest]
#[case::absent(&["in"], 1)]
#[case::bare_flag(&["in", "-l"], 5)]
#[case::with_value(&["in", "--level", "3"], 3)]
fn optional_value_flag_uses_const(#[case] tokens: &[&str], #[case] level: i64) -> Result<()> {
    let parsed: Manual = dataparsers::parse(tokens.iter().copied())?;
    ensure!(parsed.input == "in", "input = {}", parsed.input);
    ensure!(parsed.level == level, "level = {}", parsed.level);
    ensure!(!parsed.quiet, "quiet should default to false");
    Ok(())
}

#[rstest]
fn version_flag_is_a_display_request() -> Result<()> {
    let Err(DataParserError::CliParsing(err)) = Manual::try_parse_args(["--version"]) else {
        return Err(anyhow!("--version should short-circuit parsing"));
    };
    ensure!(dataparsers::is_display_request(&err), "kind {:?}", err.kind());
    ensure!(err.to_string().contains("1.2.3"), "rendered: {err}");
    Ok(())
}

#[rstest]
fn invalid_schema_is_reported_before_parsing() -> Result<()> {
    let err = Broken::try_parse_args(["--value", "x"])
        .err()
        .context("invalid flag should be rejected")?;
    let DataParserError::Configuration(ConfigurationError::InvalidFlagPrefix { field, flag }) = &err
    else {
        return Err(anyhow!("unexpected error: {err}"));
    };
    ensure!(field == "value" && flag == "value", "wrong details: {err}");
    ensure!(err.exit_code() == 1, "exit code {}", err.exit_code());
    Ok(())
}

#[rstest]
fn field_named_help_is_a_configuration_error() -> Result<()> {
    let err = HelpTopic::try_parse_args(["topic"])
        .err()
        .context("help destination should be rejected")?;
    let DataParserError::Configuration(ConfigurationError::ReservedDestination { destination }) =
        &err
    else {
        return Err(anyhow!("unexpected error: {err}"));
    };
    ensure!(destination == "help", "wrong destination: {err}");
    ensure!(err.exit_code() == 1, "exit code {}", err.exit_code());
    Ok(())
}

#[rstest]
fn record_type_mismatch_is_reported() -> Result<()> {
    let err = Mismatched::try_parse_args(["many"])
        .err()
        .context("a word cannot become a u8")?;
    ensure!(matches!(err, DataParserError::Record(_)), "unexpected error: {err}");
    Ok(())
}

#[rstest]
fn parse_args_with_extends_a_caller_command() -> Result<()> {
    let base = clap::Command::new("host").about("hosted parser");
    let parsed = Manual::parse_args_with(base, ["in", "--quiet"])?;
    ensure!(parsed.quiet, "quiet should be set");
    let cmd = Manual::command_from(clap::Command::new("host"))?;
    ensure!(cmd.get_name() == "manual", "prog overrides the caller's name");
    Ok(())
}

#[rstest]
fn plan_is_inspectable() -> Result<()> {
    let plan = Manual::plan()?;
    let names: Vec<&str> = plan
        .root
        .arguments
        .iter()
        .map(|argument| argument.destination.as_str())
        .collect();
    ensure!(names == ["input", "level", "quiet"], "arguments = {names:?}");
    Ok(())
}
