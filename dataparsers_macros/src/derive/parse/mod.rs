//! Parsing of `#[dataparser(...)]` attributes.
//!
//! Struct-level attributes configure the parser as a whole; field-level
//! attributes become builder calls on each field's descriptor. Unknown keys
//! are rejected so misspelt options fail at compile time.

use heck::ToUpperCamelCase;
use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, LitStr, Token, parenthesized};

mod input;
mod literals;
mod type_utils;

pub(crate) use input::parse_input;
use literals::{lit_bool, lit_group_key, lit_nargs, lit_str, switch};
pub(crate) use type_utils::{TypeShape, shape};

const ACTIONS: &[&str] = &["store", "store_true", "store_false", "count", "append"];
const VALUE_TYPES: &[&str] = &["string", "integer", "unsigned", "float", "bool", "path"];

/// Group key as written in an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GroupKeyLit {
    Name(String),
    Index(i64),
}

/// `group(key = ..., description = "...")` on the struct.
#[derive(Debug, Clone)]
pub(crate) struct GroupAttr {
    pub key: GroupKeyLit,
    pub description: String,
}

/// `exclusive(key = ..., required)` on the struct.
#[derive(Debug, Clone)]
pub(crate) struct ExclusiveAttr {
    pub key: GroupKeyLit,
    pub required: bool,
}

/// `subcommand(name = "...", help = "...", alias = "...", defaults(...))`.
#[derive(Debug, Clone, Default)]
pub(crate) struct SubcommandAttr {
    pub name: String,
    pub help: Option<String>,
    pub aliases: Vec<String>,
    pub defaults: Vec<(String, Expr)>,
}

/// Struct-level attributes.
#[derive(Debug, Clone, Default)]
pub(crate) struct StructAttrs {
    pub prog: Option<String>,
    pub usage: Option<String>,
    pub description: Option<String>,
    pub epilog: Option<String>,
    pub version: Option<String>,
    pub add_help: Option<bool>,
    pub infer_long_args: Option<bool>,
    pub exit_on_error: Option<bool>,
    pub default_bool: Option<bool>,
    pub groups: Vec<GroupAttr>,
    pub exclusives: Vec<ExclusiveAttr>,
    pub subcommands: Vec<SubcommandAttr>,
    /// Overrides the generated crate path for renamed dependencies.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(DataParser)]`.
///
/// `action` and `value_type` hold the runtime enum variant name, already
/// validated.
#[derive(Debug, Clone, Default)]
pub(crate) struct FieldAttrs {
    pub flags: Vec<String>,
    pub group: Option<GroupKeyLit>,
    pub exclusive: Option<GroupKeyLit>,
    pub make_flag: Option<bool>,
    pub default: Option<Expr>,
    pub help: Option<String>,
    pub metavar: Option<String>,
    pub nargs: Option<String>,
    pub choices: Vec<String>,
    pub action: Option<String>,
    pub value_type: Option<String>,
    pub required: Option<bool>,
    pub const_value: Option<Expr>,
    pub subcommand: Option<String>,
    pub selector: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub constant: bool,
    pub extras: Vec<(String, String)>,
}

/// Iterate all `#[dataparser(...)]` attributes once and apply a callback.
fn parse_dataparser<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("dataparser")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn key_of(meta: &ParseNestedMeta) -> String {
    meta.path
        .get_ident()
        .map(ToString::to_string)
        .unwrap_or_default()
}

fn unknown(meta: &ParseNestedMeta, key: &str) -> syn::Error {
    meta.error(format!("unknown dataparser attribute `{key}`"))
}

/// Parses `key("a", "b", ...)`.
fn lit_str_list(meta: &ParseNestedMeta) -> syn::Result<Vec<String>> {
    let content;
    parenthesized!(content in meta.input);
    let items = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(items.iter().map(LitStr::value).collect())
}

/// Validates `value` against `allowed` and returns its variant name.
fn variant_name(value: &LitStr, key: &str, allowed: &[&str]) -> syn::Result<String> {
    let raw = value.value();
    if allowed.contains(&raw.as_str()) {
        return Ok(raw.to_upper_camel_case());
    }
    Err(syn::Error::new(
        value.span(),
        format!("unknown {key} '{raw}'; expected one of {}", allowed.join(", ")),
    ))
}

fn required_key<T>(value: Option<T>, span: Span, what: &str) -> syn::Result<T> {
    value.ok_or_else(|| syn::Error::new(span, format!("{what} is required")))
}

fn parse_group(meta: &ParseNestedMeta) -> syn::Result<GroupAttr> {
    let mut key = None;
    let mut description = None;
    meta.parse_nested_meta(|nested| match key_of(&nested).as_str() {
        "key" => {
            key = Some(lit_group_key(&nested, "key")?);
            Ok(())
        }
        "description" => {
            description = Some(lit_str(&nested, "description")?.value());
            Ok(())
        }
        other => Err(unknown(&nested, other)),
    })?;
    let span = meta.path.span();
    Ok(GroupAttr {
        key: required_key(key, span, "group key")?,
        description: required_key(description, span, "group description")?,
    })
}

fn parse_exclusive(meta: &ParseNestedMeta) -> syn::Result<ExclusiveAttr> {
    let mut key = None;
    let mut required = false;
    meta.parse_nested_meta(|nested| match key_of(&nested).as_str() {
        "key" => {
            key = Some(lit_group_key(&nested, "key")?);
            Ok(())
        }
        "required" => {
            required = switch(&nested, "required")?;
            Ok(())
        }
        other => Err(unknown(&nested, other)),
    })?;
    Ok(ExclusiveAttr {
        key: required_key(key, meta.path.span(), "exclusive group key")?,
        required,
    })
}

fn parse_subcommand(meta: &ParseNestedMeta) -> syn::Result<SubcommandAttr> {
    let mut out = SubcommandAttr::default();
    let mut name = None;
    meta.parse_nested_meta(|nested| match key_of(&nested).as_str() {
        "name" => {
            name = Some(lit_str(&nested, "name")?.value());
            Ok(())
        }
        "help" => {
            out.help = Some(lit_str(&nested, "help")?.value());
            Ok(())
        }
        "alias" => {
            out.aliases.push(lit_str(&nested, "alias")?.value());
            Ok(())
        }
        "defaults" => nested.parse_nested_meta(|entry| {
            let destination = key_of(&entry);
            let value: Expr = entry.value()?.parse()?;
            out.defaults.push((destination, value));
            Ok(())
        }),
        other => Err(unknown(&nested, other)),
    })?;
    out.name = required_key(name, meta.path.span(), "subcommand name")?;
    Ok(out)
}

/// Extracts `#[dataparser(...)]` metadata applied to a struct.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_dataparser(attrs, |meta| {
        let key = key_of(meta);
        match key.as_str() {
            "prog" => out.prog = Some(lit_str(meta, "prog")?.value()),
            "usage" => out.usage = Some(lit_str(meta, "usage")?.value()),
            "description" => out.description = Some(lit_str(meta, "description")?.value()),
            "epilog" => out.epilog = Some(lit_str(meta, "epilog")?.value()),
            "version" => out.version = Some(lit_str(meta, "version")?.value()),
            "add_help" => out.add_help = Some(lit_bool(meta, "add_help")?),
            "infer_long_args" => out.infer_long_args = Some(switch(meta, "infer_long_args")?),
            "exit_on_error" => out.exit_on_error = Some(lit_bool(meta, "exit_on_error")?),
            "default_bool" => out.default_bool = Some(lit_bool(meta, "default_bool")?),
            "group" => out.groups.push(parse_group(meta)?),
            "exclusive" => out.exclusives.push(parse_exclusive(meta)?),
            "subcommand" => out.subcommands.push(parse_subcommand(meta)?),
            "crate" => {
                let s = lit_str(meta, "crate")?;
                let path: syn::Path =
                    syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
                out.crate_path = Some(path);
            }
            other => return Err(unknown(meta, other)),
        }
        Ok(())
    })?;
    Ok(out)
}

/// Applies one field attribute to `out`.
fn apply_field_attr(meta: &ParseNestedMeta, out: &mut FieldAttrs) -> syn::Result<()> {
    let key = key_of(meta);
    match key.as_str() {
        "flag" => out.flags.push(lit_str(meta, "flag")?.value()),
        "flags" => out.flags.extend(lit_str_list(meta)?),
        "group" => out.group = Some(lit_group_key(meta, "group")?),
        "exclusive" => out.exclusive = Some(lit_group_key(meta, "exclusive")?),
        "make_flag" => out.make_flag = Some(switch(meta, "make_flag")?),
        "default" => out.default = Some(meta.value()?.parse()?),
        "help" => out.help = Some(lit_str(meta, "help")?.value()),
        "metavar" => out.metavar = Some(lit_str(meta, "metavar")?.value()),
        "nargs" => out.nargs = Some(lit_nargs(meta)?),
        "choices" => out.choices.extend(lit_str_list(meta)?),
        "action" => {
            let value = lit_str(meta, "action")?;
            out.action = Some(variant_name(&value, "action", ACTIONS)?);
        }
        "value_type" => {
            let value = lit_str(meta, "value_type")?;
            out.value_type = Some(variant_name(&value, "value_type", VALUE_TYPES)?);
        }
        "required" => out.required = Some(switch(meta, "required")?),
        "const_value" => out.const_value = Some(meta.value()?.parse()?),
        "subcommand" => out.subcommand = Some(lit_str(meta, "subcommand")?.value()),
        "selector" => out.selector = switch(meta, "selector")?,
        "title" => out.title = Some(lit_str(meta, "title")?.value()),
        "description" => out.description = Some(lit_str(meta, "description")?.value()),
        "constant" => out.constant = switch(meta, "constant")?,
        "extra" => meta.parse_nested_meta(|entry| {
            let name = key_of(&entry);
            let value = lit_str(&entry, &name)?.value();
            out.extras.push((name, value));
            Ok(())
        })?,
        "dest" => {
            return Err(meta.error("destinations are derived from field names"));
        }
        other => return Err(unknown(meta, other)),
    }
    Ok(())
}

/// Parses field-level `#[dataparser(...)]` attributes.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_dataparser(attrs, |meta| apply_field_attr(meta, &mut out))?;
    Ok(out)
}
