//! End-to-end parsing through `#[derive(DataParser)]`.

use anyhow::{Context, Result, anyhow, ensure};
use dataparsers::{DataParser, DataParserError, is_display_request};
use rstest::rstest;
use serde::Deserialize;

#[derive(Debug, Deserialize, DataParser, PartialEq)]
struct Positionals {
    string: String,
    integer: i64,
}

#[derive(Debug, Deserialize, DataParser, PartialEq)]
#[dataparser(prog = "demo", description = "Demonstrates defaults")]
struct WithDefault {
    path: String,
    #[dataparser(flag = "-b", default = 42, help = "bar help")]
    bar: i64,
}

#[derive(Debug, Deserialize, DataParser, PartialEq)]
struct ForcedFlags {
    #[dataparser(flags("-s", "--str"), make_flag)]
    string: String,
}

#[derive(Debug, Deserialize, DataParser, PartialEq)]
#[dataparser(default_bool = true)]
struct Switches {
    #[dataparser(default = false)]
    dry_run: bool,
    color: bool,
    #[dataparser(flag = "-v", action = "count")]
    verbose: u8,
    #[dataparser(flag = "-t", action = "append")]
    tags: Vec<String>,
    inputs: Vec<std::path::PathBuf>,
}

#[rstest]
fn positionals_parse_in_order() -> Result<()> {
    let parsed = Positionals::try_parse_args(["test", "10"])?;
    ensure!(
        parsed
            == Positionals {
                string: "test".to_owned(),
                integer: 10,
            },
        "unexpected record: {parsed:?}"
    );
    Ok(())
}

#[rstest]
fn missing_positional_is_a_usage_error() -> Result<()> {
    let Err(err) = Positionals::try_parse_args(["test"]) else {
        return Err(anyhow!("missing positional should fail"));
    };
    ensure!(err.exit_code() == 2, "exit code {}", err.exit_code());
    Ok(())
}

#[rstest]
#[case::defaulted(&["file"], 42)]
#[case::short(&["file", "-b", "7"], 7)]
#[case::synthesized_long(&["file", "--bar", "9"], 9)]
fn defaulted_field_becomes_a_flag(#[case] tokens: &[&str], #[case] bar: i64) -> Result<()> {
    let parsed = WithDefault::try_parse_args(tokens.iter().copied())?;
    ensure!(parsed.bar == bar, "bar = {}", parsed.bar);
    ensure!(parsed.path == "file", "path = {}", parsed.path);
    Ok(())
}

#[rstest]
#[case::short(&["-s", "x"])]
#[case::explicit_long(&["--str", "x"])]
#[case::synthesized_long(&["--string", "x"])]
fn forced_make_flag_adds_field_name(#[case] tokens: &[&str]) -> Result<()> {
    let parsed = ForcedFlags::try_parse_args(tokens.iter().copied())?;
    ensure!(parsed.string == "x", "string = {}", parsed.string);
    Ok(())
}

#[rstest]
fn booleans_counts_and_lists() -> Result<()> {
    let parsed = Switches::try_parse_args([
        "--dry-run", "--color", "-vv", "-t", "a", "-t", "b", "in1", "in2",
    ])?;
    ensure!(parsed.dry_run, "dry_run should be set");
    ensure!(!parsed.color, "color defaults to true and flips to false");
    ensure!(parsed.verbose == 2, "verbose = {}", parsed.verbose);
    ensure!(parsed.tags == ["a", "b"], "tags = {:?}", parsed.tags);
    ensure!(parsed.inputs.len() == 2, "inputs = {:?}", parsed.inputs);
    Ok(())
}

#[rstest]
fn absent_switches_take_their_defaults() -> Result<()> {
    let parsed = Switches::try_parse_args(Vec::<String>::new())?;
    ensure!(!parsed.dry_run, "dry_run should default to false");
    ensure!(parsed.color, "color should follow the boolean policy");
    ensure!(parsed.verbose == 0, "verbose = {}", parsed.verbose);
    ensure!(parsed.tags.is_empty(), "tags = {:?}", parsed.tags);
    ensure!(parsed.inputs.is_empty(), "inputs = {:?}", parsed.inputs);
    Ok(())
}

#[rstest]
fn help_lists_flags_and_help_text() -> Result<()> {
    let Err(DataParserError::CliParsing(err)) = WithDefault::try_parse_args(["--help"]) else {
        return Err(anyhow!("--help should surface as a display request"));
    };
    ensure!(is_display_request(&err), "unexpected kind {:?}", err.kind());
    let rendered = err.to_string();
    for fragment in ["demo", "Demonstrates defaults", "-b", "--bar", "bar help"] {
        ensure!(rendered.contains(fragment), "missing {fragment} in {rendered}");
    }
    Ok(())
}

#[rstest]
fn command_can_be_built_without_parsing() -> Result<()> {
    let cmd = dataparsers::make_parser::<WithDefault>().context("build parser")?;
    ensure!(cmd.get_name() == "demo", "name = {}", cmd.get_name());
    let bar = cmd
        .get_arguments()
        .find(|arg| arg.get_id() == "bar")
        .context("bar registered")?;
    ensure!(bar.get_short() == Some('b'), "short = {:?}", bar.get_short());
    ensure!(bar.get_long() == Some("bar"), "long = {:?}", bar.get_long());
    Ok(())
}

#[rstest]
fn unnamed_record_uses_type_name() -> Result<()> {
    let cmd = Positionals::command()?;
    ensure!(cmd.get_name() == "positionals", "name = {}", cmd.get_name());
    Ok(())
}
