//! Argument groups and mutually exclusive groups.

use anyhow::{Context, Result, anyhow, ensure};
use clap::error::ErrorKind;
use dataparsers::{DataParser, DataParserError};
use rstest::rstest;
use serde::Deserialize;

#[derive(Debug, Deserialize, DataParser)]
#[dataparser(exclusive(key = "mode", required))]
struct RequiredMode {
    #[dataparser(flag = "-s", exclusive = "mode")]
    string: Option<String>,
    #[dataparser(flag = "-i", exclusive = "mode")]
    integer: Option<i64>,
}

#[derive(Debug, Deserialize, DataParser)]
struct OptionalMode {
    #[dataparser(exclusive = 1)]
    string: Option<String>,
    #[dataparser(exclusive = 1)]
    integer: Option<i64>,
}

#[derive(Debug, Deserialize, DataParser)]
#[dataparser(epilog = "See the manual.")]
#[dataparser(group(key = "io", description = "Where data comes from and goes to"))]
struct Grouped {
    #[dataparser(group = "io")]
    source: String,
    #[dataparser(group = "io", make_flag, help = "output file")]
    output: Option<String>,
    name: String,
}

#[derive(Debug, Deserialize, DataParser)]
struct SameLookingKeys {
    #[dataparser(exclusive = "1")]
    a: Option<String>,
    #[dataparser(exclusive = "1")]
    b: Option<String>,
    #[dataparser(exclusive = 1)]
    c: Option<String>,
}

fn cli_error<T: std::fmt::Debug>(result: Result<T, DataParserError>) -> Result<clap::Error> {
    match result {
        Err(DataParserError::CliParsing(err)) => Ok(err),
        other => Err(anyhow!("expected a command-line error, got {other:?}")),
    }
}

#[rstest]
fn single_exclusive_member_is_accepted() -> Result<()> {
    let parsed = RequiredMode::try_parse_args(["-s", "text"])?;
    ensure!(parsed.string.as_deref() == Some("text"), "string = {:?}", parsed.string);
    ensure!(parsed.integer.is_none(), "integer = {:?}", parsed.integer);
    Ok(())
}

#[rstest]
fn exclusive_members_conflict() -> Result<()> {
    let err = cli_error(RequiredMode::try_parse_args(["-s", "text", "-i", "1"]))?;
    ensure!(
        err.kind() == ErrorKind::ArgumentConflict,
        "unexpected kind {:?}",
        err.kind()
    );
    ensure!(err.exit_code() == 2, "exit code {}", err.exit_code());
    Ok(())
}

#[rstest]
fn required_exclusive_group_needs_a_member() -> Result<()> {
    let err = cli_error(RequiredMode::try_parse_args(Vec::<String>::new()))?;
    ensure!(
        err.kind() == ErrorKind::MissingRequiredArgument,
        "unexpected kind {:?}",
        err.kind()
    );
    Ok(())
}

#[rstest]
#[case::none(&[], None, None)]
#[case::string(&["--string", "x"], Some("x"), None)]
#[case::integer(&["--integer", "3"], None, Some(3))]
fn exclusive_members_become_flags(
    #[case] tokens: &[&str],
    #[case] string: Option<&str>,
    #[case] integer: Option<i64>,
) -> Result<()> {
    let parsed = OptionalMode::try_parse_args(tokens.iter().copied())?;
    ensure!(parsed.string.as_deref() == string, "string = {:?}", parsed.string);
    ensure!(parsed.integer == integer, "integer = {:?}", parsed.integer);
    Ok(())
}

#[rstest]
fn grouped_arguments_share_a_heading() -> Result<()> {
    let cmd = Grouped::command()?;
    for id in ["source", "output"] {
        let arg = cmd
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .with_context(|| format!("{id} registered"))?;
        ensure!(
            arg.get_help_heading() == Some("io"),
            "{id} heading = {:?}",
            arg.get_help_heading()
        );
    }
    let name = cmd
        .get_arguments()
        .find(|arg| arg.get_id() == "name")
        .context("name registered")?;
    ensure!(name.get_help_heading().is_none(), "name should stay ungrouped");
    Ok(())
}

#[rstest]
fn group_description_follows_epilog_in_long_help() -> Result<()> {
    let mut cmd = Grouped::command()?;
    let rendered = cmd.render_long_help().to_string();
    let epilog = rendered.find("See the manual.").context("epilog missing")?;
    let section = rendered
        .find("io:\n  Where data comes from and goes to")
        .with_context(|| format!("group description missing in {rendered}"))?;
    ensure!(epilog < section, "description should follow the epilog");
    Ok(())
}

#[rstest]
fn grouped_positional_and_flag_parse() -> Result<()> {
    let parsed = Grouped::try_parse_args(["in.txt", "me", "--output", "out.txt"])?;
    ensure!(parsed.source == "in.txt", "source = {}", parsed.source);
    ensure!(parsed.name == "me", "name = {}", parsed.name);
    ensure!(parsed.output.as_deref() == Some("out.txt"), "output = {:?}", parsed.output);
    Ok(())
}

#[rstest]
fn textual_and_numeric_exclusive_keys_are_separate_groups() -> Result<()> {
    let parsed = SameLookingKeys::try_parse_args(["--a", "x", "--c", "y"])?;
    ensure!(parsed.a.as_deref() == Some("x"), "a = {:?}", parsed.a);
    ensure!(parsed.c.as_deref() == Some("y"), "c = {:?}", parsed.c);

    let err = cli_error(SameLookingKeys::try_parse_args(["--a", "x", "--b", "y"]))?;
    ensure!(
        err.kind() == ErrorKind::ArgumentConflict,
        "unexpected kind {:?}",
        err.kind()
    );
    Ok(())
}
