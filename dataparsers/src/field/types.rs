//! Value-level building blocks shared by descriptors and resolved plans.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Identifier of a group or exclusive group.
///
/// Keys compare by variant first, so `"1"` and `1` name different groups.
/// Titles come from the display text, so two such plain groups share the
/// heading `1` in help output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    /// Textual key, also used as the group's title.
    Name(String),
    /// Numeric key.
    Index(i64),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self::Name(value.to_owned())
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        Self::Name(value)
    }
}

impl From<i64> for GroupKey {
    fn from(value: i64) -> Self {
        Self::Index(value)
    }
}

impl From<i32> for GroupKey {
    fn from(value: i32) -> Self {
        Self::Index(i64::from(value))
    }
}

/// Semantic type of a field's values.
///
/// Selects the converter applied to raw tokens and the accessor used when
/// reading parsed values back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// UTF-8 text.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// Unsigned 64-bit integer.
    Unsigned,
    /// 64-bit float.
    Float,
    /// `true`/`false`.
    Bool,
    /// Filesystem path.
    Path,
}

/// Multiplicity marker for a field's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Nargs {
    /// `?`: zero or one value.
    Optional,
    /// `*`: any number of values.
    ZeroOrMore,
    /// `+`: at least one value.
    OneOrMore,
    /// An exact number of values.
    Exactly(usize),
}

impl Nargs {
    /// Returns `true` for the optional-occurrence markers `?` and `*`.
    #[must_use]
    pub const fn is_optional_occurrence(self) -> bool {
        matches!(self, Self::Optional | Self::ZeroOrMore)
    }

    /// Returns `true` when the parsed result is a list.
    #[must_use]
    pub const fn is_multiple(self) -> bool {
        !matches!(self, Self::Optional)
    }

    /// Parses `?`, `*`, `+`, or a positive count.
    #[must_use]
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "?" => Some(Self::Optional),
            "*" => Some(Self::ZeroOrMore),
            "+" => Some(Self::OneOrMore),
            count => count
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Self::Exactly),
        }
    }
}

/// What happens when an argument occurs on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgAction {
    /// Store the converted value(s).
    Store,
    /// Store `true`; the flag takes no value.
    StoreTrue,
    /// Store `false`; the flag takes no value.
    StoreFalse,
    /// Count occurrences.
    Count,
    /// Collect a value per occurrence.
    Append,
}

impl ArgAction {
    /// Actions that take no value and therefore only make sense on flags.
    #[must_use]
    pub const fn is_flag_only(self) -> bool {
        matches!(self, Self::StoreTrue | Self::StoreFalse | Self::Count)
    }
}

/// Structured option bag for a field.
///
/// `extras` carries engine-specific options the resolution logic does not
/// interpret; they are applied when the argument is registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArgOptions {
    /// Help text.
    pub help: Option<String>,
    /// Accepted values.
    pub choices: Vec<String>,
    /// Multiplicity.
    pub nargs: Option<Nargs>,
    /// Placeholder shown in usage.
    pub metavar: Option<String>,
    /// Action override.
    pub action: Option<ArgAction>,
    /// Converter override.
    pub value_type: Option<ValueType>,
    /// Whether the argument must be supplied.
    pub required: Option<bool>,
    /// Value stored when an optional-occurrence flag appears without a token.
    pub const_value: Option<Value>,
    /// Pass-through options such as `long_help`, `hide`, `alias`, and
    /// `value_delimiter`.
    pub extras: BTreeMap<String, String>,
}

/// Options specific to the subcommand selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectorOptions {
    /// Heading of the subcommand section in help output.
    pub title: Option<String>,
    /// Text shown beneath the subcommand section heading.
    pub description: Option<String>,
}

/// Role of a field within its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Registered as a command-line argument.
    Argument,
    /// Receives the name of the selected subcommand.
    Selector(SelectorOptions),
    /// Record-only value, never registered.
    Constant,
}
