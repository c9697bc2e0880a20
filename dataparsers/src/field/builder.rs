//! Validating builder for [`FieldDescriptor`].

use serde_json::Value;
use tracing::trace;

use super::{
    ArgAction, ArgOptions, FLAG_PREFIX, FieldDescriptor, FieldKind, GroupKey, LONG_PREFIX, Nargs,
    ValueType,
};
use crate::ConfigurationError;

/// Extra option name reserved for destination overrides.
const DEST_OPTION: &str = "dest";

/// Accumulates a field declaration; [`FieldBuilder::build`] validates it.
#[derive(Debug, Clone)]
#[must_use = "call `build` to obtain a FieldDescriptor"]
pub struct FieldBuilder {
    name: String,
    declared_type: ValueType,
    kind: FieldKind,
    default: Option<Value>,
    flags: Vec<String>,
    group: Option<GroupKey>,
    exclusive_group: Option<GroupKey>,
    make_flag: Option<bool>,
    subcommand: Option<String>,
    nargs: Option<String>,
    title: Option<String>,
    description: Option<String>,
    options: ArgOptions,
}

impl FieldBuilder {
    pub(super) fn new(name: String, declared_type: ValueType, kind: FieldKind) -> Self {
        Self {
            name,
            declared_type,
            kind,
            default: None,
            flags: Vec::new(),
            group: None,
            exclusive_group: None,
            make_flag: None,
            subcommand: None,
            nargs: None,
            title: None,
            description: None,
            options: ArgOptions::default(),
        }
    }

    /// Adds one flag spelling such as `-b` or `--bar`.
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Adds several flag spellings in order.
    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Places the field in a titled group.
    pub fn group(mut self, key: impl Into<GroupKey>) -> Self {
        self.group = Some(key.into());
        self
    }

    /// Places the field in a mutually exclusive group.
    pub fn exclusive_group(mut self, key: impl Into<GroupKey>) -> Self {
        self.exclusive_group = Some(key.into());
        self
    }

    /// Forces (`true`) or suppresses (`false`) the synthesized long flag.
    pub const fn make_flag(mut self, make_flag: bool) -> Self {
        self.make_flag = Some(make_flag);
        self
    }

    /// Sets the default value.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the help text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.options.help = Some(help.into());
        self
    }

    /// Restricts accepted values.
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the multiplicity marker: `?`, `*`, `+`, or a count.
    pub fn nargs(mut self, marker: impl Into<String>) -> Self {
        self.nargs = Some(marker.into());
        self
    }

    /// Sets the usage placeholder.
    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.options.metavar = Some(metavar.into());
        self
    }

    /// Pins the action instead of deriving it.
    pub const fn action(mut self, action: ArgAction) -> Self {
        self.options.action = Some(action);
        self
    }

    /// Overrides the converter applied to raw tokens.
    pub const fn value_type(mut self, value_type: ValueType) -> Self {
        self.options.value_type = Some(value_type);
        self
    }

    /// Marks the argument as mandatory (or explicitly optional).
    pub const fn required(mut self, required: bool) -> Self {
        self.options.required = Some(required);
        self
    }

    /// Value stored when an optional-occurrence flag is given without a token.
    pub fn const_value(mut self, value: impl Into<Value>) -> Self {
        self.options.const_value = Some(value.into());
        self
    }

    /// Adds a pass-through option applied verbatim at registration.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.extras.insert(key.into(), value.into());
        self
    }

    /// Assigns the field to a subcommand.
    pub fn subcommand(mut self, name: impl Into<String>) -> Self {
        self.subcommand = Some(name.into());
        self
    }

    /// Heading of the subcommand section (selector only).
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Description of the subcommand section (selector only).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the declaration and produces a descriptor.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when a flag lacks the `-` prefix,
    /// when both a group and an exclusive group are given, when a `dest`
    /// override is present, when `nargs` is not a recognised marker, or when
    /// selector-only settings are misused.
    pub fn build(self) -> Result<FieldDescriptor, ConfigurationError> {
        if self.name.is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        if let Some(flag) = self.flags.iter().find(|f| !f.starts_with(FLAG_PREFIX)) {
            return Err(ConfigurationError::InvalidFlagPrefix {
                field: self.name.clone(),
                flag: flag.clone(),
            });
        }
        if let (Some(group), Some(exclusive)) = (&self.group, &self.exclusive_group) {
            return Err(ConfigurationError::GroupConflict {
                field: self.name.clone(),
                group: group.to_string(),
                exclusive_group: exclusive.to_string(),
            });
        }
        if self.options.extras.contains_key(DEST_OPTION) {
            return Err(ConfigurationError::ExplicitDestination { field: self.name });
        }
        let nargs = self.parse_nargs()?;
        let kind = self.checked_kind()?;
        let make_flag = self.normalised_make_flag(nargs);
        trace!(field = %self.name, ?make_flag, "built field descriptor");

        let mut options = self.options;
        options.nargs = nargs;
        Ok(FieldDescriptor {
            name: self.name,
            declared_type: self.declared_type,
            default: self.default,
            explicit_flags: self.flags,
            group: self.group,
            exclusive_group: self.exclusive_group,
            make_flag,
            subcommand: self.subcommand,
            kind,
            options,
        })
    }

    fn parse_nargs(&self) -> Result<Option<Nargs>, ConfigurationError> {
        self.nargs
            .as_deref()
            .map(|marker| {
                Nargs::from_marker(marker).ok_or_else(|| ConfigurationError::InvalidNargs {
                    field: self.name.clone(),
                    value: marker.to_owned(),
                })
            })
            .transpose()
    }

    fn checked_kind(&self) -> Result<FieldKind, ConfigurationError> {
        let invalid = |reason| ConfigurationError::InvalidSelector {
            field: self.name.clone(),
            reason,
        };
        match &self.kind {
            FieldKind::Selector(_) => {
                if !self.flags.is_empty() || self.make_flag == Some(true) {
                    return Err(invalid("the selector is positional and takes no flags"));
                }
                if self.group.is_some() || self.exclusive_group.is_some() {
                    return Err(invalid("the selector cannot join a group"));
                }
                if self.subcommand.is_some() {
                    return Err(invalid("the selector cannot belong to a subcommand"));
                }
                Ok(FieldKind::Selector(super::SelectorOptions {
                    title: self.title.clone(),
                    description: self.description.clone(),
                }))
            }
            other => {
                if self.title.is_some() || self.description.is_some() {
                    return Err(invalid(
                        "title and description only apply to the subcommand selector",
                    ));
                }
                Ok(other.clone())
            }
        }
    }

    /// Applies the construction-time `make_flag` rules.
    ///
    /// A forced `false` survives only when explicit flags already make the
    /// field flag-like; otherwise the rules below may override it.
    fn normalised_make_flag(&self, nargs: Option<Nargs>) -> Option<bool> {
        if matches!(self.kind, FieldKind::Selector(_)) {
            return self.make_flag;
        }
        let overridable = self.make_flag.is_none()
            || (self.make_flag == Some(false) && self.flags.is_empty());
        let mut make_flag = self.make_flag;

        // A concrete default cannot sit on a positional.
        let optional_occurrence = nargs.is_some_and(Nargs::is_optional_occurrence);
        if overridable && self.default.is_some() && !optional_occurrence {
            make_flag = Some(true);
        }

        // Short aliases alone gain a long form.
        let has_long = self.flags.iter().any(|f| f.starts_with(LONG_PREFIX));
        if make_flag.is_none() && !self.flags.is_empty() && !has_long {
            make_flag = Some(true);
        }

        // Exclusive groups only hold flags.
        if self.exclusive_group.is_some() && self.flags.is_empty() && make_flag != Some(true) {
            make_flag = Some(true);
        }
        make_flag
    }
}
