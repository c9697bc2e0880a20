//! Issues a [`RecordPlan`]'s registrations against `clap`'s builder API.
//!
//! Every check that can fail has already run during resolution, so
//! building is infallible.

use std::path::PathBuf;

use clap::builder::{PossibleValuesParser, TypedValueParser, ValueParser};
use clap::{Arg, ArgAction as ClapAction, ArgGroup, Command};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{trace, warn};

use crate::config::ParserOptions;
use crate::field::{FLAG_PREFIX, LONG_PREFIX};
use crate::resolve::{
    Container, EXCLUSIVE_GROUP_PREFIX, GroupContainer, ParserPlan, RecordPlan, ResolvedArgument,
};
use crate::{ArgAction, GroupKey, Nargs, RecordConfig, ValueType};

/// Heading used for the subcommand section when the selector has no title.
const DEFAULT_SUBCOMMAND_TITLE: &str = "Commands";

/// Creates the parser used when the caller does not supply one.
pub(crate) fn base_command(config: &RecordConfig, fallback_name: &str) -> Command {
    let name = config
        .parser_options()
        .prog
        .clone()
        .unwrap_or_else(|| fallback_name.to_owned());
    Command::new(name)
}

/// Registers the whole plan on `base`.
pub(crate) fn command(plan: &RecordPlan, config: &RecordConfig, base: Command) -> Command {
    let options = config.parser_options();
    let mut cmd = register_scope(apply_parser_options(base, options), &plan.root);

    let mut sections = group_sections(&plan.root.groups);
    if let Some(selector) = &plan.selector {
        cmd = cmd.subcommand_required(selector.required);
        if let Some(title) = &selector.title {
            cmd = cmd.subcommand_help_heading(title.clone());
        }
        if let Some(metavar) = &selector.metavar {
            cmd = cmd.subcommand_value_name(metavar.clone());
        }
        let text = selector.description.as_ref().or(selector.help.as_ref());
        if let Some(text) = text {
            let title = selector
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBCOMMAND_TITLE.to_owned());
            sections.push((title, text.clone()));
        }
    }
    if let Some(footer) = long_footer(options.epilog.as_deref(), &sections) {
        cmd = cmd.after_long_help(footer);
    }

    for subcommand in plan.subcommands.values() {
        trace!(subcommand = %subcommand.name, "registering subcommand");
        let mut sub = Command::new(subcommand.name.clone())
            .visible_aliases(subcommand.aliases.clone())
            .disable_help_flag(!options.add_help)
            .args_override_self(true);
        if let Some(help) = &subcommand.help {
            sub = sub.about(help.clone());
        }
        if let Some(footer) = long_footer(None, &group_sections(&subcommand.parser.groups)) {
            sub = sub.after_long_help(footer);
        }
        cmd = cmd.subcommand(register_scope(sub, &subcommand.parser));
    }
    cmd
}

fn apply_parser_options(base: Command, options: &ParserOptions) -> Command {
    let mut cmd = base
        .disable_help_flag(!options.add_help)
        .infer_long_args(options.infer_long_args)
        .args_override_self(true);
    if let Some(prog) = &options.prog {
        cmd = cmd.name(prog.clone()).bin_name(prog.clone());
    }
    if let Some(usage) = &options.usage {
        cmd = cmd.override_usage(usage.clone());
    }
    if let Some(description) = &options.description {
        cmd = cmd.about(description.clone());
    }
    if let Some(epilog) = &options.epilog {
        cmd = cmd.after_help(epilog.clone());
    }
    if let Some(version) = &options.version {
        cmd = cmd.version(version.clone());
    }
    cmd
}

fn register_scope(mut cmd: Command, plan: &ParserPlan) -> Command {
    for argument in &plan.arguments {
        cmd = cmd.arg(build_arg(argument, &plan.groups));
    }
    for (key, group) in &plan.exclusive_groups {
        cmd = cmd.group(
            ArgGroup::new(exclusive_group_id(key))
                .args(group.members.clone())
                .multiple(false)
                .required(group.required),
        );
    }
    cmd
}

/// Identifier of the `ArgGroup` backing an exclusive group.
pub(crate) fn exclusive_group_id(key: &GroupKey) -> String {
    match key {
        GroupKey::Name(name) => format!("{EXCLUSIVE_GROUP_PREFIX}name:{name}"),
        GroupKey::Index(index) => format!("{EXCLUSIVE_GROUP_PREFIX}index:{index}"),
    }
}

fn build_arg(argument: &ResolvedArgument, groups: &IndexMap<GroupKey, GroupContainer>) -> Arg {
    trace!(destination = %argument.destination, flags = ?argument.flags, "registering argument");
    let mut arg = apply_flags(Arg::new(argument.destination.clone()), &argument.flags)
        .action(clap_action(argument))
        .required(argument.required);

    if !argument.action.is_flag_only() {
        arg = arg.value_parser(value_parser(argument.value_type, &argument.options.choices));
        arg = apply_nargs(arg, argument);
    }
    if let Some(default) = argument.default.as_ref().filter(|_| !argument.required) {
        let rendered = render_default(default);
        if !rendered.is_empty() {
            arg = arg.default_values(rendered);
        }
    }

    let options = &argument.options;
    if let Some(help) = &options.help {
        arg = arg.help(help.clone());
    }
    if let Some(metavar) = &options.metavar {
        arg = arg.value_name(metavar.clone());
    }
    if let Container::Group(key) = &argument.container {
        if let Some(group) = groups.get(key) {
            arg = arg.help_heading(group.title.clone());
        }
    }
    apply_extras(arg, argument)
}

fn apply_flags(mut arg: Arg, flags: &[String]) -> Arg {
    let mut has_long = false;
    let mut has_short = false;
    for flag in flags {
        if let Some(long) = flag.strip_prefix(LONG_PREFIX) {
            arg = if has_long {
                arg.visible_alias(long.to_owned())
            } else {
                arg.long(long.to_owned())
            };
            has_long = true;
        } else if let Some(short) = flag.strip_prefix(FLAG_PREFIX).and_then(|s| s.chars().next()) {
            arg = if has_short {
                arg.visible_short_alias(short)
            } else {
                arg.short(short)
            };
            has_short = true;
        }
    }
    arg
}

fn clap_action(argument: &ResolvedArgument) -> ClapAction {
    match argument.action {
        ArgAction::Store => ClapAction::Set,
        ArgAction::StoreTrue => ClapAction::SetTrue,
        ArgAction::StoreFalse => ClapAction::SetFalse,
        ArgAction::Count => ClapAction::Count,
        ArgAction::Append => ClapAction::Append,
    }
}

fn apply_nargs(arg: Arg, argument: &ResolvedArgument) -> Arg {
    let positional = argument.is_positional();
    match argument.nargs {
        None => arg,
        Some(Nargs::Optional) if positional => arg.num_args(1),
        Some(Nargs::Optional) => {
            let arg = arg.num_args(0..=1);
            match argument.options.const_value.as_ref().map(render_default) {
                Some(rendered) if !rendered.is_empty() => arg.default_missing_values(rendered),
                _ => arg,
            }
        }
        Some(Nargs::ZeroOrMore) if positional => arg.num_args(1..),
        Some(Nargs::ZeroOrMore) => arg.num_args(0..),
        Some(Nargs::OneOrMore) => arg.num_args(1..),
        Some(Nargs::Exactly(count)) => arg.num_args(count),
    }
}

/// Converter for raw tokens, restricted to `choices` when any are given.
fn value_parser(value_type: ValueType, choices: &[String]) -> ValueParser {
    if choices.is_empty() {
        return match value_type {
            ValueType::String => ValueParser::string(),
            ValueType::Path => ValueParser::path_buf(),
            ValueType::Bool => ValueParser::bool(),
            ValueType::Integer => ValueParser::new(|raw: &str| raw.parse::<i64>()),
            ValueType::Unsigned => ValueParser::new(|raw: &str| raw.parse::<u64>()),
            ValueType::Float => ValueParser::new(|raw: &str| raw.parse::<f64>()),
        };
    }
    let allowed = PossibleValuesParser::new(choices.iter().cloned());
    match value_type {
        ValueType::String => ValueParser::new(allowed),
        ValueType::Path => ValueParser::new(allowed.map(PathBuf::from)),
        ValueType::Bool => ValueParser::new(allowed.try_map(|raw| raw.parse::<bool>())),
        ValueType::Integer => ValueParser::new(allowed.try_map(|raw| raw.parse::<i64>())),
        ValueType::Unsigned => ValueParser::new(allowed.try_map(|raw| raw.parse::<u64>())),
        ValueType::Float => ValueParser::new(allowed.try_map(|raw| raw.parse::<f64>())),
    }
}

/// Renders a default as the raw tokens the parser would have received.
fn render_default(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().flat_map(render_default).collect(),
        Value::String(text) => vec![text.clone()],
        other => vec![other.to_string()],
    }
}

fn apply_extras(mut arg: Arg, argument: &ResolvedArgument) -> Arg {
    for (key, value) in &argument.options.extras {
        arg = match key.as_str() {
            "long_help" => arg.long_help(value.clone()),
            "hide" => arg.hide(value != "false"),
            "alias" if !argument.is_positional() => {
                arg.visible_alias(value.trim_start_matches(FLAG_PREFIX).to_owned())
            }
            "value_delimiter" => arg.value_delimiter(value.chars().next()),
            _ => {
                warn!(
                    destination = %argument.destination,
                    option = %key,
                    "ignoring unsupported pass-through option"
                );
                arg
            }
        };
    }
    arg
}

/// `(title, text)` pairs for groups that carry a description.
fn group_sections(groups: &IndexMap<GroupKey, GroupContainer>) -> Vec<(String, String)> {
    groups
        .values()
        .filter_map(|group| {
            group
                .description
                .as_ref()
                .map(|text| (group.title.clone(), text.clone()))
        })
        .collect()
}

/// Long-help footer: the epilogue followed by section descriptions.
fn long_footer(epilog: Option<&str>, sections: &[(String, String)]) -> Option<String> {
    if sections.is_empty() {
        return None;
    }
    let mut parts: Vec<String> = epilog.map(str::to_owned).into_iter().collect();
    parts.extend(
        sections
            .iter()
            .map(|(title, text)| format!("{title}:\n  {text}")),
    );
    Some(parts.join("\n\n"))
}
