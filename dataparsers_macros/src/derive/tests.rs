//! Expansion tests for `#[derive(DataParser)]`.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use syn::{DeriveInput, parse_quote};

use super::expand;

fn expanded(input: &DeriveInput) -> Result<String> {
    expand(input)
        .map(|tokens| tokens.to_string())
        .map_err(|err| anyhow!("expansion failed: {err}"))
}

#[rstest]
fn fields_follow_declaration_order() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Args {
            first: String,
            second: i64,
        }
    };
    let out = expanded(&input)?;
    let first = out.find("\"first\"").ok_or_else(|| anyhow!("first missing: {out}"))?;
    let second = out.find("\"second\"").ok_or_else(|| anyhow!("second missing: {out}"))?;
    ensure!(first < second, "fields out of order: {out}");
    ensure!(out.contains("ValueType :: Integer"), "integer type missing: {out}");
    Ok(())
}

#[rstest]
#[case::list(parse_quote!(struct Args { items: Vec<String> }), ". nargs (\"*\")")]
#[case::optional(parse_quote!(struct Args { item: Option<String> }), ". nargs (\"?\")")]
#[case::flag(
    parse_quote!(struct Args { #[dataparser(flag = "-b", default = 42)] bar: i64 }),
    ". flag (\"-b\") . default (42)"
)]
#[case::selector(
    parse_quote!(struct Args { #[dataparser(selector, title = "cmds")] command: Option<String> }),
    "FieldDescriptor :: selector (\"command\") . title (\"cmds\")"
)]
#[case::constant(
    parse_quote!(struct Args { #[dataparser(constant, default = "v")] mode: String }),
    "FieldDescriptor :: constant (\"mode\" , \"v\") ?"
)]
#[case::index_group(
    parse_quote!(struct Args { #[dataparser(exclusive = 1, make_flag)] a: bool }),
    ". exclusive_group (:: dataparsers :: GroupKey :: Index (1i64)) . make_flag (true)"
)]
fn field_builders_are_generated(#[case] input: DeriveInput, #[case] fragment: &str) -> Result<()> {
    let out = expanded(&input)?;
    ensure!(out.contains(fragment), "missing `{fragment}` in {out}");
    Ok(())
}

#[rstest]
#[case::explicit_flag(parse_quote!(struct Args { #[dataparser(flag = "--name")] name: Option<String> }))]
#[case::exclusive(parse_quote!(struct Args { #[dataparser(exclusive = "m")] name: Option<String> }))]
#[case::boolean(parse_quote!(struct Args { verbose: Option<bool> }))]
#[case::subcommand(parse_quote!(struct Args { #[dataparser(subcommand = "a")] bar: Option<i64> }))]
fn optional_nargs_is_not_inferred(#[case] input: DeriveInput) -> Result<()> {
    let out = expanded(&input)?;
    ensure!(!out.contains("nargs"), "unexpected nargs in {out}");
    Ok(())
}

#[rstest]
fn record_config_carries_struct_options() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[dataparser(prog = "PROG", default_bool = true)]
        #[dataparser(subcommand(name = "a", alias = "alpha", defaults(x = 1)))]
        struct Args {
            path: String,
        }
    };
    let out = expanded(&input)?;
    for fragment in [
        ". prog (\"PROG\")",
        ". default_bool (true)",
        "SubcommandConfig :: new (\"a\") . alias (\"alpha\") . set_default (\"x\" , 1)",
    ] {
        ensure!(out.contains(fragment), "missing `{fragment}` in {out}");
    }
    Ok(())
}

#[rstest]
fn crate_override_is_used() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        #[dataparser(crate = "my_parsers")]
        struct Args {
            path: String,
        }
    };
    let out = expanded(&input)?;
    ensure!(out.contains("impl my_parsers :: DataParser for Args"), "{out}");
    Ok(())
}

#[rstest]
fn constant_without_default_is_rejected() -> Result<()> {
    let input: DeriveInput = parse_quote! {
        struct Args {
            #[dataparser(constant)]
            mode: String,
        }
    };
    let Err(err) = expand(&input) else {
        return Err(anyhow!("expected an error"));
    };
    ensure!(err.to_string().contains("need a `default`"), "unexpected error: {err}");
    Ok(())
}
