//! Record-level parser configuration.
//!
//! A [`RecordConfig`] travels alongside a record's field descriptors. It
//! carries options forwarded to the top-level parser, titles and
//! descriptions for groups, which exclusive groups are mandatory, the policy
//! for undefaulted booleans, and the declared subcommands.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::GroupKey;

/// Options forwarded to the top-level parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserOptions {
    /// Program name shown in usage; the invoked binary name when unset.
    pub prog: Option<String>,
    /// Replacement usage line.
    pub usage: Option<String>,
    /// Text shown before the argument listing.
    pub description: Option<String>,
    /// Text shown after the argument listing.
    pub epilog: Option<String>,
    /// Version reported by `--version`; no version flag when unset.
    pub version: Option<String>,
    /// Whether `-h/--help` is registered.
    pub add_help: bool,
    /// Whether unambiguous prefixes of long flags are accepted.
    pub infer_long_args: bool,
    /// Whether input errors terminate the process.
    pub exit_on_error: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            prog: None,
            usage: None,
            description: None,
            epilog: None,
            version: None,
            add_help: true,
            infer_long_args: false,
            exit_on_error: true,
        }
    }
}

/// Declaration of one subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[must_use]
pub struct SubcommandConfig {
    pub(crate) name: String,
    pub(crate) help: Option<String>,
    pub(crate) aliases: Vec<String>,
    pub(crate) defaults: BTreeMap<String, Value>,
}

impl SubcommandConfig {
    /// Declares a subcommand invoked as `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: None,
            aliases: Vec::new(),
            defaults: BTreeMap::new(),
        }
    }

    /// Help text shown in the subcommand listing.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds an alternative name.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Value stored into `destination` whenever this subcommand is selected.
    pub fn set_default(mut self, destination: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(destination.into(), value.into());
        self
    }

    /// Subcommand name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Parser-level settings attached to a record type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[must_use]
pub struct RecordConfig {
    pub(crate) parser: ParserOptions,
    pub(crate) group_descriptions: BTreeMap<GroupKey, String>,
    pub(crate) required_exclusive_groups: BTreeMap<GroupKey, bool>,
    pub(crate) default_bool: bool,
    pub(crate) subcommands: Vec<SubcommandConfig>,
}

impl RecordConfig {
    /// Configuration with every option at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the program name.
    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.parser.prog = Some(prog.into());
        self
    }

    /// Replaces the generated usage line.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.parser.usage = Some(usage.into());
        self
    }

    /// Sets the description shown before the argument listing.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.parser.description = Some(description.into());
        self
    }

    /// Sets the epilogue shown after the argument listing.
    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.parser.epilog = Some(epilog.into());
        self
    }

    /// Enables `--version` with the given text.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.parser.version = Some(version.into());
        self
    }

    /// Toggles the automatic `-h/--help` flag.
    pub const fn add_help(mut self, add_help: bool) -> Self {
        self.parser.add_help = add_help;
        self
    }

    /// Accepts unambiguous prefixes of long flags.
    pub const fn infer_long_args(mut self, infer: bool) -> Self {
        self.parser.infer_long_args = infer;
        self
    }

    /// Controls whether input errors terminate the process.
    pub const fn exit_on_error(mut self, exit: bool) -> Self {
        self.parser.exit_on_error = exit;
        self
    }

    /// Describes a group in help output.
    pub fn group_description(
        mut self,
        key: impl Into<GroupKey>,
        description: impl Into<String>,
    ) -> Self {
        self.group_descriptions
            .insert(key.into(), description.into());
        self
    }

    /// Marks an exclusive group as requiring exactly one member.
    pub fn required_exclusive_group(mut self, key: impl Into<GroupKey>, required: bool) -> Self {
        self.required_exclusive_groups.insert(key.into(), required);
        self
    }

    /// Default assigned to boolean fields declared without one.
    pub const fn default_bool(mut self, value: bool) -> Self {
        self.default_bool = value;
        self
    }

    /// Declares a subcommand.
    pub fn subcommand(mut self, subcommand: SubcommandConfig) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Options forwarded to the top-level parser.
    #[must_use]
    pub const fn parser_options(&self) -> &ParserOptions {
        &self.parser
    }

    /// Boolean default policy.
    #[must_use]
    pub const fn default_bool_policy(&self) -> bool {
        self.default_bool
    }

    /// Whether the exclusive group `key` is mandatory; `false` when unset.
    #[must_use]
    pub fn is_exclusive_group_required(&self, key: &GroupKey) -> bool {
        self.required_exclusive_groups
            .get(key)
            .copied()
            .unwrap_or(false)
    }

    /// Description attached to group `key`.
    #[must_use]
    pub fn group_description_for(&self, key: &GroupKey) -> Option<&str> {
        self.group_descriptions.get(key).map(String::as_str)
    }

    /// Declared subcommands in declaration order.
    #[must_use]
    pub fn subcommands(&self) -> &[SubcommandConfig] {
        &self.subcommands
    }
}
