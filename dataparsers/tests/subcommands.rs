//! Subcommand selection and per-subcommand arguments.

use anyhow::{Context, Result, anyhow, ensure};
use clap::error::ErrorKind;
use dataparsers::{DataParser, DataParserError};
use rstest::rstest;
use serde::Deserialize;

#[derive(Debug, Deserialize, DataParser, PartialEq)]
#[dataparser(prog = "PROG")]
#[dataparser(subcommand(name = "a", help = "a help"))]
#[dataparser(subcommand(name = "b", help = "b help", alias = "bee"))]
struct Prog {
    #[dataparser(help = "foo help")]
    foo: bool,
    #[dataparser(selector, title = "subcommands", description = "valid subcommands")]
    command: Option<String>,
    #[dataparser(subcommand = "a", help = "bar help")]
    bar: Option<i64>,
    #[dataparser(subcommand = "b", make_flag, choices("X", "Y", "Z"), help = "baz help")]
    baz: Option<String>,
}

#[derive(Debug, Deserialize, DataParser)]
#[dataparser(subcommand(name = "fast", defaults(speed = 10)))]
#[dataparser(subcommand(name = "slow", defaults(speed = 1)))]
struct Tuning {
    #[dataparser(selector, required)]
    mode: String,
    #[dataparser(constant, default = 0)]
    speed: i64,
    #[dataparser(constant, default = "tuning")]
    profile: String,
}

#[rstest]
fn first_subcommand_takes_its_positional() -> Result<()> {
    let parsed = Prog::try_parse_args(["a", "12"])?;
    let expected = Prog {
        foo: false,
        command: Some("a".to_owned()),
        bar: Some(12),
        baz: None,
    };
    ensure!(parsed == expected, "unexpected record: {parsed:?}");
    Ok(())
}

#[rstest]
#[case::name(&["--foo", "b", "--baz", "Z"])]
#[case::without_common_flag(&["b", "--baz", "Z"])]
#[case::alias(&["--foo", "bee", "--baz", "Z"])]
fn second_subcommand_takes_its_flag(#[case] tokens: &[&str]) -> Result<()> {
    let parsed = Prog::try_parse_args(tokens.iter().copied())?;
    ensure!(parsed.foo == tokens.contains(&"--foo"), "foo = {}", parsed.foo);
    ensure!(parsed.command.as_deref() == Some("b"), "command = {:?}", parsed.command);
    ensure!(parsed.bar.is_none(), "bar = {:?}", parsed.bar);
    ensure!(parsed.baz.as_deref() == Some("Z"), "baz = {:?}", parsed.baz);
    Ok(())
}

#[rstest]
fn no_subcommand_is_allowed_when_not_required() -> Result<()> {
    let parsed = Prog::try_parse_args(["--foo"])?;
    ensure!(parsed.command.is_none(), "command = {:?}", parsed.command);
    ensure!(parsed.bar.is_none() && parsed.baz.is_none(), "record: {parsed:?}");
    Ok(())
}

#[rstest]
fn choices_are_enforced() -> Result<()> {
    let Err(DataParserError::CliParsing(err)) = Prog::try_parse_args(["b", "--baz", "Q"]) else {
        return Err(anyhow!("invalid choice should be rejected"));
    };
    ensure!(err.kind() == ErrorKind::InvalidValue, "unexpected kind {:?}", err.kind());
    Ok(())
}

#[rstest]
fn subcommand_flags_stay_in_their_parser() -> Result<()> {
    let Err(DataParserError::CliParsing(err)) = Prog::try_parse_args(["a", "1", "--baz", "X"])
    else {
        return Err(anyhow!("--baz belongs to subcommand b"));
    };
    ensure!(err.kind() == ErrorKind::UnknownArgument, "unexpected kind {:?}", err.kind());
    Ok(())
}

#[rstest]
fn selector_title_heads_the_subcommand_listing() -> Result<()> {
    let mut cmd = Prog::command()?;
    let rendered = cmd.render_long_help().to_string();
    for fragment in ["subcommands:", "a", "a help", "b help", "valid subcommands"] {
        ensure!(rendered.contains(fragment), "missing {fragment} in {rendered}");
    }
    let names: Vec<&str> = cmd.get_subcommands().map(clap::Command::get_name).collect();
    ensure!(names == ["a", "b"], "subcommands = {names:?}");
    Ok(())
}

#[rstest]
#[case::fast("fast", 10)]
#[case::slow("slow", 1)]
fn selected_subcommand_defaults_override_constants(
    #[case] mode: &str,
    #[case] speed: i64,
) -> Result<()> {
    let parsed = Tuning::try_parse_args([mode])?;
    ensure!(parsed.mode == mode, "mode = {}", parsed.mode);
    ensure!(parsed.speed == speed, "speed = {}", parsed.speed);
    ensure!(parsed.profile == "tuning", "profile = {}", parsed.profile);
    Ok(())
}

#[rstest]
fn required_selector_rejects_missing_subcommand() -> Result<()> {
    let err = Tuning::try_parse_args(Vec::<String>::new())
        .err()
        .context("missing subcommand should fail")?;
    ensure!(err.exit_code() == 2, "exit code {}", err.exit_code());
    Ok(())
}
