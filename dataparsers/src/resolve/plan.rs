//! Transient output of one resolution pass.
//!
//! A plan is built fresh for every parser construction and dropped once the
//! parser exists and the record has been populated.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::{ArgAction, ArgOptions, GroupKey, Nargs, ValueType};

/// Where an argument is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Container {
    /// Directly on the parser.
    Root,
    /// In the titled group with this key.
    Group(GroupKey),
    /// In the mutually exclusive group with this key.
    Exclusive(GroupKey),
}

/// Final registration instruction for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedArgument {
    /// Name the parsed value is bound to.
    pub destination: String,
    /// Flag spellings; empty for positionals.
    pub flags: Vec<String>,
    /// Converter applied to raw tokens.
    pub value_type: ValueType,
    /// Occurrence behaviour.
    pub action: ArgAction,
    /// Multiplicity.
    pub nargs: Option<Nargs>,
    /// Value used when the argument is absent.
    pub default: Option<Value>,
    /// Whether the argument must be supplied.
    pub required: bool,
    /// Target container.
    pub container: Container,
    /// Pass-through options.
    pub options: ArgOptions,
}

impl ResolvedArgument {
    /// Returns `true` when the argument is identified by position.
    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.flags.is_empty()
    }

    /// Returns `true` when the parsed result is a list.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.action == ArgAction::Append || self.nargs.is_some_and(Nargs::is_multiple)
    }
}

/// A titled group of arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupContainer {
    /// Heading shown in help output.
    pub title: String,
    /// Text shown beneath the heading.
    pub description: Option<String>,
    /// Member destinations in registration order.
    pub members: Vec<String>,
}

/// A mutually exclusive set of arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExclusiveContainer {
    /// Whether exactly one member must be supplied.
    pub required: bool,
    /// Member destinations in registration order.
    pub members: Vec<String>,
}

/// Everything registered on one parser scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParserPlan {
    /// Arguments in declaration order.
    pub arguments: Vec<ResolvedArgument>,
    /// Groups in first-occurrence order.
    pub groups: IndexMap<GroupKey, GroupContainer>,
    /// Exclusive groups in first-occurrence order.
    pub exclusive_groups: IndexMap<GroupKey, ExclusiveContainer>,
}

/// A nested parser for one subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubcommandPlan {
    /// Name typed on the command line.
    pub name: String,
    /// Help shown in the subcommand listing.
    pub help: Option<String>,
    /// Alternative names.
    pub aliases: Vec<String>,
    /// Values applied to the record when selected.
    pub defaults: BTreeMap<String, Value>,
    /// Arguments specific to this subcommand.
    pub parser: ParserPlan,
}

/// The field receiving the selected subcommand's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorPlan {
    /// Destination of the selector field.
    pub destination: String,
    /// Heading of the subcommand section.
    pub title: Option<String>,
    /// Text shown beneath the subcommand section heading.
    pub description: Option<String>,
    /// Help for the subcommand placeholder.
    pub help: Option<String>,
    /// Placeholder shown in usage.
    pub metavar: Option<String>,
    /// Whether a subcommand must be given.
    pub required: bool,
}

/// Resolution output for a whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordPlan {
    /// Arguments common to every invocation.
    pub root: ParserPlan,
    /// Subcommand selector, if declared.
    pub selector: Option<SelectorPlan>,
    /// Subcommands: declared ones first, then further tags in
    /// first-occurrence order.
    pub subcommands: IndexMap<String, SubcommandPlan>,
    /// Record-only values.
    pub constants: IndexMap<String, Value>,
}
