//! Resolution engine.
//!
//! Walks a record's field descriptors in declaration order and decides, for
//! each one, whether it is positional or flagged, which flag spellings it
//! gets, what implicit type, action, and default apply, and which container
//! it is registered in. The result is a [`RecordPlan`] that the parser
//! builder turns into registrations.

mod plan;

pub use plan::{
    Container, ExclusiveContainer, GroupContainer, ParserPlan, RecordPlan, ResolvedArgument,
    SelectorPlan, SubcommandPlan,
};

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::debug;

use crate::field::{FLAG_PREFIX, LONG_PREFIX};
use crate::{
    ArgAction, ConfigurationError, FieldDescriptor, FieldKind, RecordConfig, SubcommandConfig,
    ValueType,
};

/// Flags registered automatically when help is enabled.
const HELP_FLAGS: [&str; 2] = ["-h", "--help"];

/// Flags registered automatically when a version is configured.
const VERSION_FLAGS: [&str; 2] = ["-V", "--version"];

/// Argument id of the automatic help flag.
const HELP_ID: &str = "help";

/// Argument id of the automatic version flag.
const VERSION_ID: &str = "version";

/// Prefix of the ids backing exclusive groups; no destination may use it.
pub(crate) const EXCLUSIVE_GROUP_PREFIX: &str = "exclusive-group:";

/// Resolves `fields` against `config`.
///
/// # Errors
///
/// Returns a [`ConfigurationError`] when a destination or flag is repeated,
/// when a destination is an id the parser reserves, when a flag cannot be
/// expressed, when an optional positional precedes a
/// required one, or when more than one subcommand selector is declared.
pub fn resolve(
    fields: &[FieldDescriptor],
    config: &RecordConfig,
) -> Result<RecordPlan, ConfigurationError> {
    let mut resolver = Resolver::new(config);
    for field in fields {
        resolver.push(field)?;
    }
    Ok(resolver.plan)
}

/// Decides the registration instruction for a single argument field.
///
/// Pure: containers and uniqueness are handled by the caller.
#[must_use]
pub fn resolve_argument(field: &FieldDescriptor, config: &RecordConfig) -> ResolvedArgument {
    let is_bool = field.declared_type() == ValueType::Bool;
    let mut default = field.default().cloned();
    if is_bool && default.is_none() {
        default = Some(Value::Bool(config.default_bool_policy()));
    }

    let action = field.options().action.unwrap_or_else(|| {
        if is_bool {
            inverse_of(default.as_ref())
        } else {
            ArgAction::Store
        }
    });

    let flag_like = !field.explicit_flags().is_empty()
        || field.make_flag() == Some(true)
        || action.is_flag_only();
    let flags = if flag_like {
        let mut flags = field.explicit_flags().to_vec();
        let synthesized = field.synthesized_flag();
        if (field.make_flag() == Some(true) || flags.is_empty()) && !flags.contains(&synthesized) {
            flags.push(synthesized);
        }
        flags
    } else {
        Vec::new()
    };

    let nargs = field.options().nargs;
    let optional_occurrence = nargs.is_some_and(crate::Nargs::is_optional_occurrence);
    let required = field
        .options()
        .required
        .unwrap_or(!flag_like && !optional_occurrence);

    let container = match (field.group(), field.exclusive_group()) {
        (Some(key), _) => Container::Group(key.clone()),
        (None, Some(key)) => Container::Exclusive(key.clone()),
        (None, None) => Container::Root,
    };

    debug!(
        field = field.name(),
        ?flags,
        ?action,
        required,
        "resolved field"
    );
    ResolvedArgument {
        destination: field.name().to_owned(),
        flags,
        value_type: field.value_type(),
        action,
        nargs,
        default,
        required,
        container,
        options: field.options().clone(),
    }
}

/// Store-true for a `false` default, store-false for a `true` one.
fn inverse_of(default: Option<&Value>) -> ArgAction {
    if default.and_then(Value::as_bool) == Some(true) {
        ArgAction::StoreFalse
    } else {
        ArgAction::StoreTrue
    }
}

struct Resolver<'a> {
    config: &'a RecordConfig,
    destinations: HashSet<String>,
    scopes: BTreeMap<Option<String>, ScopeState>,
    plan: RecordPlan,
}

/// Per-parser bookkeeping that does not belong in the plan.
#[derive(Default)]
struct ScopeState {
    flags: HashSet<String>,
    reserved_ids: Vec<&'static str>,
    optional_positional: Option<String>,
}

impl ScopeState {
    fn seeded(add_help: bool, version: bool) -> Self {
        let mut state = Self::default();
        if add_help {
            state.flags.extend(HELP_FLAGS.map(str::to_owned));
            state.reserved_ids.push(HELP_ID);
        }
        if version {
            state.flags.extend(VERSION_FLAGS.map(str::to_owned));
            state.reserved_ids.push(VERSION_ID);
        }
        state
    }
}

impl<'a> Resolver<'a> {
    fn new(config: &'a RecordConfig) -> Self {
        let options = config.parser_options();
        let mut scopes = BTreeMap::new();
        scopes.insert(
            None,
            ScopeState::seeded(options.add_help, options.version.is_some()),
        );
        let mut plan = RecordPlan::default();
        for declared in config.subcommands() {
            plan.subcommands
                .entry(declared.name().to_owned())
                .or_insert_with(|| subcommand_plan(declared));
        }
        Self {
            config,
            destinations: HashSet::new(),
            scopes,
            plan,
        }
    }

    fn push(&mut self, field: &FieldDescriptor) -> Result<(), ConfigurationError> {
        if !self.destinations.insert(field.name().to_owned()) {
            return Err(ConfigurationError::DuplicateDestination {
                destination: field.name().to_owned(),
            });
        }
        match field.kind() {
            FieldKind::Constant => {
                let value = field.default().cloned().unwrap_or(Value::Null);
                self.plan.constants.insert(field.name().to_owned(), value);
                Ok(())
            }
            FieldKind::Selector(options) => {
                if self.plan.selector.is_some() {
                    return Err(ConfigurationError::InvalidSelector {
                        field: field.name().to_owned(),
                        reason: "only one subcommand selector may be declared",
                    });
                }
                self.plan.selector = Some(SelectorPlan {
                    destination: field.name().to_owned(),
                    title: options.title.clone(),
                    description: options.description.clone(),
                    help: field.options().help.clone(),
                    metavar: field.options().metavar.clone(),
                    required: field.options().required.unwrap_or(false),
                });
                Ok(())
            }
            FieldKind::Argument => self.register(field),
        }
    }

    fn register(&mut self, field: &FieldDescriptor) -> Result<(), ConfigurationError> {
        let argument = resolve_argument(field, self.config);
        let scope_key = field.subcommand().map(str::to_owned);
        let add_help = self.config.parser_options().add_help;
        let state = self
            .scopes
            .entry(scope_key.clone())
            .or_insert_with(|| ScopeState::seeded(add_help, false));
        check_destination(&argument, state)?;
        check_flags(&argument, state)?;
        check_positional_order(&argument, state)?;

        let parser = match scope_key {
            None => &mut self.plan.root,
            Some(name) => {
                &mut self
                    .plan
                    .subcommands
                    .entry(name.clone())
                    .or_insert_with(|| {
                        debug!(subcommand = %name, "creating undeclared subcommand");
                        subcommand_plan(&SubcommandConfig::new(name.clone()))
                    })
                    .parser
            }
        };
        attach(parser, argument, self.config);
        Ok(())
    }
}

fn subcommand_plan(declared: &SubcommandConfig) -> SubcommandPlan {
    debug!(subcommand = %declared.name, "creating subcommand");
    SubcommandPlan {
        name: declared.name.clone(),
        help: declared.help.clone(),
        aliases: declared.aliases.clone(),
        defaults: declared.defaults.clone(),
        parser: ParserPlan::default(),
    }
}

/// Routes an argument into its container, creating the container on first
/// use.
fn attach(parser: &mut ParserPlan, argument: ResolvedArgument, config: &RecordConfig) {
    let destination = argument.destination.clone();
    match &argument.container {
        Container::Root => {}
        Container::Group(key) => {
            parser
                .groups
                .entry(key.clone())
                .or_insert_with(|| {
                    debug!(group = %key, "creating group");
                    GroupContainer {
                        title: key.to_string(),
                        description: config.group_description_for(key).map(str::to_owned),
                        members: Vec::new(),
                    }
                })
                .members
                .push(destination);
        }
        Container::Exclusive(key) => {
            parser
                .exclusive_groups
                .entry(key.clone())
                .or_insert_with(|| {
                    debug!(group = %key, "creating exclusive group");
                    ExclusiveContainer {
                        required: config.is_exclusive_group_required(key),
                        members: Vec::new(),
                    }
                })
                .members
                .push(destination);
        }
    }
    parser.arguments.push(argument);
}

/// Destinations double as argument ids, which share a namespace with the
/// automatic flags and the exclusive groups.
fn check_destination(argument: &ResolvedArgument, state: &ScopeState) -> Result<(), ConfigurationError> {
    let destination = argument.destination.as_str();
    if state.reserved_ids.contains(&destination)
        || destination.starts_with(EXCLUSIVE_GROUP_PREFIX)
    {
        return Err(ConfigurationError::ReservedDestination {
            destination: destination.to_owned(),
        });
    }
    Ok(())
}

fn check_flags(argument: &ResolvedArgument, state: &mut ScopeState) -> Result<(), ConfigurationError> {
    for flag in &argument.flags {
        if !is_expressible(flag) {
            return Err(ConfigurationError::UnsupportedFlag {
                field: argument.destination.clone(),
                flag: flag.clone(),
            });
        }
        if !state.flags.insert(flag.clone()) {
            return Err(ConfigurationError::DuplicateFlag {
                field: argument.destination.clone(),
                flag: flag.clone(),
            });
        }
    }
    Ok(())
}

/// `-x` with a single character, or `--name`.
fn is_expressible(flag: &str) -> bool {
    if let Some(long) = flag.strip_prefix(LONG_PREFIX) {
        return !long.is_empty() && !long.starts_with(FLAG_PREFIX);
    }
    let mut chars = flag.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(FLAG_PREFIX), Some(c), None) if c != FLAG_PREFIX
    )
}

fn check_positional_order(
    argument: &ResolvedArgument,
    state: &mut ScopeState,
) -> Result<(), ConfigurationError> {
    if !argument.is_positional() {
        return Ok(());
    }
    if !argument.required {
        state
            .optional_positional
            .get_or_insert_with(|| argument.destination.clone());
        return Ok(());
    }
    match &state.optional_positional {
        Some(optional) => Err(ConfigurationError::PositionalOrder {
            optional: optional.clone(),
            required: argument.destination.clone(),
        }),
        None => Ok(()),
    }
}
