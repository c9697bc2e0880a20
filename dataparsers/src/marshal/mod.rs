//! Converts parsed matches into the record's flat key-value form.
//!
//! Values are read by destination with the typed accessor matching each
//! resolved argument, collected into a `serde_json` object, and handed to
//! `serde` to produce the record.

use std::any::Any;
use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::MatchesError;
use serde_json::{Map, Value};
use tracing::debug;

use crate::resolve::{ParserPlan, RecordPlan, ResolvedArgument};
use crate::{ArgAction, DataParserError, DataParserResult, ValueType};

/// Builds the record object for `matches`.
///
/// Arguments of subcommands that were not selected take their declared
/// default, or `null`; the selected subcommand's defaults are applied last.
pub(crate) fn record_value(plan: &RecordPlan, matches: &ArgMatches) -> DataParserResult<Value> {
    let mut record = Map::new();
    for (name, value) in &plan.constants {
        record.insert(name.clone(), value.clone());
    }
    read_scope(&plan.root, matches, &mut record)?;

    let selected = matches.subcommand();
    if let Some(selector) = &plan.selector {
        let name = selected.map_or(Value::Null, |(name, _)| Value::String(name.to_owned()));
        record.insert(selector.destination.clone(), name);
    }
    for subcommand in plan.subcommands.values() {
        match selected {
            Some((name, sub_matches)) if name == subcommand.name => {
                debug!(subcommand = %name, "reading selected subcommand");
                read_scope(&subcommand.parser, sub_matches, &mut record)?;
            }
            _ => {
                for argument in &subcommand.parser.arguments {
                    record.insert(argument.destination.clone(), absent_value(argument));
                }
            }
        }
    }
    if let Some(subcommand) = selected.and_then(|(name, _)| plan.subcommands.get(name)) {
        for (destination, value) in &subcommand.defaults {
            record.insert(destination.clone(), value.clone());
        }
    }
    Ok(Value::Object(record))
}

fn read_scope(
    plan: &ParserPlan,
    matches: &ArgMatches,
    record: &mut Map<String, Value>,
) -> DataParserResult<()> {
    for argument in &plan.arguments {
        let value = read_argument(argument, matches).map_err(|source| {
            DataParserError::Matches {
                destination: argument.destination.clone(),
                source,
            }
        })?;
        record.insert(argument.destination.clone(), value);
    }
    Ok(())
}

/// Value recorded for an argument whose parser never ran.
fn absent_value(argument: &ResolvedArgument) -> Value {
    match &argument.default {
        Some(value) => value.clone(),
        None if argument.is_multiple() => Value::Array(Vec::new()),
        None => Value::Null,
    }
}

fn read_argument(argument: &ResolvedArgument, matches: &ArgMatches) -> Result<Value, MatchesError> {
    let id = argument.destination.as_str();
    match argument.action {
        ArgAction::StoreTrue | ArgAction::StoreFalse => {
            Ok(matches.try_get_one::<bool>(id)?.map_or(Value::Null, |v| Value::Bool(*v)))
        }
        ArgAction::Count => Ok(matches.try_get_one::<u8>(id)?.map_or(Value::Null, |v| Value::from(*v))),
        ArgAction::Store | ArgAction::Append => {
            let multiple = argument.is_multiple();
            let value = match argument.value_type {
                ValueType::String => read::<String>(matches, id, multiple, |v| Value::String(v.clone())),
                ValueType::Path => read::<PathBuf>(matches, id, multiple, |v| {
                    Value::String(v.to_string_lossy().into_owned())
                }),
                ValueType::Bool => read::<bool>(matches, id, multiple, |v| Value::Bool(*v)),
                ValueType::Integer => read::<i64>(matches, id, multiple, |v| Value::from(*v)),
                ValueType::Unsigned => read::<u64>(matches, id, multiple, |v| Value::from(*v)),
                ValueType::Float => read::<f64>(matches, id, multiple, |v| Value::from(*v)),
            }?;
            // Absent lists read as empty rather than null.
            Ok(if multiple && value.is_null() {
                Value::Array(Vec::new())
            } else {
                value
            })
        }
    }
}

fn read<T>(
    matches: &ArgMatches,
    id: &str,
    multiple: bool,
    convert: fn(&T) -> Value,
) -> Result<Value, MatchesError>
where
    T: Any + Clone + Send + Sync + 'static,
{
    if multiple {
        Ok(matches
            .try_get_many::<T>(id)?
            .map_or(Value::Null, |values| Value::Array(values.map(convert).collect())))
    } else {
        Ok(matches.try_get_one::<T>(id)?.map_or(Value::Null, convert))
    }
}
