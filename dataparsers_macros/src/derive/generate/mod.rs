//! Token generation for the `DataParser` trait implementation.
//!
//! Each field becomes one builder chain ending in `build()?`, so schema
//! errors surface from `fields()` at run time exactly as they do for
//! hand-written descriptors.

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Field, Ident};

use super::parse::{FieldAttrs, GroupKeyLit, StructAttrs, SubcommandAttr, TypeShape, shape};

/// Generate the full `impl DataParser for ...` block.
pub(crate) fn generate_impl(
    ident: &Ident,
    krate: &TokenStream,
    fields: &[Field],
    struct_attrs: &StructAttrs,
    field_attrs: &[FieldAttrs],
) -> syn::Result<TokenStream> {
    let descriptors = fields
        .iter()
        .zip(field_attrs)
        .map(|(field, attrs)| field_descriptor(krate, field, attrs))
        .collect::<syn::Result<Vec<_>>>()?;
    let config = record_config(krate, struct_attrs);
    Ok(quote! {
        impl #krate::DataParser for #ident {
            fn fields() -> ::core::result::Result<
                ::std::vec::Vec<#krate::FieldDescriptor>,
                #krate::ConfigurationError,
            > {
                ::core::result::Result::Ok(::std::vec![ #( #descriptors ),* ])
            }

            fn record_config() -> #krate::RecordConfig {
                #config
            }
        }
    })
}

fn group_key(krate: &TokenStream, key: &GroupKeyLit) -> TokenStream {
    match key {
        GroupKeyLit::Name(name) => quote! { #name },
        GroupKeyLit::Index(index) => {
            let lit = Literal::i64_suffixed(*index);
            quote! { #krate::GroupKey::Index(#lit) }
        }
    }
}

/// `nargs` implied by the field's Rust type when none is given.
///
/// A subcommand field is `Option<T>` because other subcommands leave it
/// unset, so its optionality says nothing about its own parser.
fn inferred_nargs(ty: TypeShape, attrs: &FieldAttrs) -> Option<&'static str> {
    if attrs.action.is_some() || attrs.selector {
        return None;
    }
    if ty.multiple {
        return Some("*");
    }
    let positional = attrs.subcommand.is_none()
        && attrs.required.is_none()
        && attrs.flags.is_empty()
        && attrs.make_flag != Some(true)
        && attrs.default.is_none()
        && attrs.exclusive.is_none()
        && ty.value_kind != "Bool";
    (ty.optional && positional).then_some("?")
}

fn field_descriptor(
    krate: &TokenStream,
    field: &Field,
    attrs: &FieldAttrs,
) -> syn::Result<TokenStream> {
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "DataParser requires named fields"));
    };
    let name = ident.unraw().to_string();

    if attrs.constant {
        let Some(default) = &attrs.default else {
            return Err(syn::Error::new_spanned(
                ident,
                "constant fields need a `default` value",
            ));
        };
        return Ok(quote! { #krate::FieldDescriptor::constant(#name, #default)? });
    }

    let ty = shape(&field.ty);
    let base = if attrs.selector {
        quote! { #krate::FieldDescriptor::selector(#name) }
    } else {
        let kind = format_ident!("{}", ty.value_kind);
        quote! { #krate::FieldDescriptor::builder(#name, #krate::ValueType::#kind) }
    };

    let mut calls = Vec::new();
    calls.extend(attrs.flags.iter().map(|flag| quote! { .flag(#flag) }));
    if let Some(key) = &attrs.group {
        let tokens = group_key(krate, key);
        calls.push(quote! { .group(#tokens) });
    }
    if let Some(key) = &attrs.exclusive {
        let tokens = group_key(krate, key);
        calls.push(quote! { .exclusive_group(#tokens) });
    }
    if let Some(make_flag) = attrs.make_flag {
        calls.push(quote! { .make_flag(#make_flag) });
    }
    if let Some(default) = &attrs.default {
        calls.push(quote! { .default(#default) });
    }
    if let Some(help) = &attrs.help {
        calls.push(quote! { .help(#help) });
    }
    if !attrs.choices.is_empty() {
        let choices = &attrs.choices;
        calls.push(quote! { .choices([#(#choices),*]) });
    }
    if let Some(nargs) = attrs.nargs.as_deref().or_else(|| inferred_nargs(ty, attrs)) {
        calls.push(quote! { .nargs(#nargs) });
    }
    if let Some(metavar) = &attrs.metavar {
        calls.push(quote! { .metavar(#metavar) });
    }
    if let Some(action) = &attrs.action {
        let variant = format_ident!("{}", action);
        calls.push(quote! { .action(#krate::ArgAction::#variant) });
    }
    if let Some(value_type) = &attrs.value_type {
        let variant = format_ident!("{}", value_type);
        calls.push(quote! { .value_type(#krate::ValueType::#variant) });
    }
    if let Some(required) = attrs.required {
        calls.push(quote! { .required(#required) });
    }
    if let Some(value) = &attrs.const_value {
        calls.push(quote! { .const_value(#value) });
    }
    calls.extend(
        attrs
            .extras
            .iter()
            .map(|(key, value)| quote! { .extra(#key, #value) }),
    );
    if let Some(subcommand) = &attrs.subcommand {
        calls.push(quote! { .subcommand(#subcommand) });
    }
    if let Some(title) = &attrs.title {
        calls.push(quote! { .title(#title) });
    }
    if let Some(description) = &attrs.description {
        calls.push(quote! { .description(#description) });
    }

    Ok(quote! { #base #(#calls)* .build()? })
}

fn subcommand_config(krate: &TokenStream, sub: &SubcommandAttr) -> TokenStream {
    let name = &sub.name;
    let help = sub.help.iter().map(|help| quote! { .help(#help) });
    let aliases = sub.aliases.iter().map(|alias| quote! { .alias(#alias) });
    let defaults = sub
        .defaults
        .iter()
        .map(|(destination, value)| quote! { .set_default(#destination, #value) });
    quote! {
        #krate::SubcommandConfig::new(#name) #(#help)* #(#aliases)* #(#defaults)*
    }
}

fn record_config(krate: &TokenStream, attrs: &StructAttrs) -> TokenStream {
    let mut calls = Vec::new();
    let text_options = [
        ("prog", &attrs.prog),
        ("usage", &attrs.usage),
        ("description", &attrs.description),
        ("epilog", &attrs.epilog),
        ("version", &attrs.version),
    ];
    for (name, value) in text_options {
        if let Some(text) = value {
            let setter = format_ident!("{}", name);
            calls.push(quote! { .#setter(#text) });
        }
    }
    let switches = [
        ("add_help", attrs.add_help),
        ("infer_long_args", attrs.infer_long_args),
        ("exit_on_error", attrs.exit_on_error),
        ("default_bool", attrs.default_bool),
    ];
    for (name, value) in switches {
        if let Some(enabled) = value {
            let setter = format_ident!("{}", name);
            calls.push(quote! { .#setter(#enabled) });
        }
    }
    for group in &attrs.groups {
        let key = group_key(krate, &group.key);
        let description = &group.description;
        calls.push(quote! { .group_description(#key, #description) });
    }
    for exclusive in &attrs.exclusives {
        let key = group_key(krate, &exclusive.key);
        let required = exclusive.required;
        calls.push(quote! { .required_exclusive_group(#key, #required) });
    }
    for sub in &attrs.subcommands {
        let tokens = subcommand_config(krate, sub);
        calls.push(quote! { .subcommand(#tokens) });
    }
    quote! { #krate::RecordConfig::new() #(#calls)* }
}
