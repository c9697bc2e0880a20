//! Field descriptors: the per-field half of a record's command-line schema.
//!
//! A [`FieldDescriptor`] is produced by [`FieldBuilder::build`], which
//! validates the declaration and normalises the `make_flag` tri-state before
//! any parser exists. Descriptors are immutable afterwards.

mod builder;
mod types;

pub use builder::FieldBuilder;
pub use types::{ArgAction, ArgOptions, FieldKind, GroupKey, Nargs, SelectorOptions, ValueType};

use serde_json::Value;

use crate::ConfigurationError;

/// Prefix shared by every flag spelling.
pub const FLAG_PREFIX: char = '-';

/// Prefix identifying a long flag.
pub const LONG_PREFIX: &str = "--";

/// Declarative description of one record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) declared_type: ValueType,
    pub(crate) default: Option<Value>,
    pub(crate) explicit_flags: Vec<String>,
    pub(crate) group: Option<GroupKey>,
    pub(crate) exclusive_group: Option<GroupKey>,
    pub(crate) make_flag: Option<bool>,
    pub(crate) subcommand: Option<String>,
    pub(crate) kind: FieldKind,
    pub(crate) options: ArgOptions,
}

impl FieldDescriptor {
    /// Starts declaring a command-line argument bound to `name`.
    ///
    /// ```
    /// use dataparsers::{FieldDescriptor, ValueType};
    ///
    /// let bar = FieldDescriptor::builder("bar", ValueType::Integer)
    ///     .flag("-b")
    ///     .default(42)
    ///     .build()?;
    /// assert_eq!(bar.make_flag(), Some(true));
    /// # Ok::<(), dataparsers::ConfigurationError>(())
    /// ```
    #[must_use]
    pub fn builder(name: impl Into<String>, declared_type: ValueType) -> FieldBuilder {
        FieldBuilder::new(name.into(), declared_type, FieldKind::Argument)
    }

    /// Starts declaring the field that receives the selected subcommand name.
    #[must_use]
    pub fn selector(name: impl Into<String>) -> FieldBuilder {
        FieldBuilder::new(
            name.into(),
            ValueType::String,
            FieldKind::Selector(SelectorOptions::default()),
        )
    }

    /// Declares a record-only field that is never exposed on the command line.
    ///
    /// The value is `default` unless the selected subcommand overrides it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyName`] when `name` is empty.
    pub fn constant(
        name: impl Into<String>,
        default: impl Into<Value>,
    ) -> Result<Self, ConfigurationError> {
        let field_name = name.into();
        if field_name.is_empty() {
            return Err(ConfigurationError::EmptyName);
        }
        Ok(Self {
            name: field_name,
            declared_type: ValueType::String,
            default: Some(default.into()),
            explicit_flags: Vec::new(),
            group: None,
            exclusive_group: None,
            make_flag: None,
            subcommand: None,
            kind: FieldKind::Constant,
            options: ArgOptions::default(),
        })
    }

    /// Field name; also the destination parsed values are bound to.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Semantic type declared for the field.
    #[must_use]
    pub const fn declared_type(&self) -> ValueType {
        self.declared_type
    }

    /// Default value, if one was declared.
    #[must_use]
    pub const fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Flag spellings supplied by the declaration, in order.
    #[must_use]
    pub fn explicit_flags(&self) -> &[String] {
        &self.explicit_flags
    }

    /// Plain group key.
    #[must_use]
    pub const fn group(&self) -> Option<&GroupKey> {
        self.group.as_ref()
    }

    /// Exclusive group key.
    #[must_use]
    pub const fn exclusive_group(&self) -> Option<&GroupKey> {
        self.exclusive_group.as_ref()
    }

    /// Normalised `make_flag` tri-state.
    #[must_use]
    pub const fn make_flag(&self) -> Option<bool> {
        self.make_flag
    }

    /// Subcommand this field belongs to, if any.
    #[must_use]
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// Role of the field in the record.
    #[must_use]
    pub const fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Pass-through argument options.
    #[must_use]
    pub const fn options(&self) -> &ArgOptions {
        &self.options
    }

    /// Type used to convert raw tokens: the override, else the declared type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.options.value_type.unwrap_or(self.declared_type)
    }

    /// Long flag synthesized from the field name (`file_path` → `--file-path`).
    #[must_use]
    pub fn synthesized_flag(&self) -> String {
        format!("{LONG_PREFIX}{}", self.name.replace('_', "-"))
    }
}
