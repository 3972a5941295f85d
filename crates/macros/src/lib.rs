//! Proc macros for htmlstruct records
//!
//! This crate provides `#[derive(Record)]`, which generates the static field
//! descriptor list and the name-based field assigner for a struct.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{quote, ToTokens};
use syn::{
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    Attribute, Data, DeriveInput, Fields, Ident, LitStr, Meta, MetaNameValue, Path, Token, Type,
};

/// Contents of a `#[tag(...)]` attribute
///
/// Supports two forms:
/// - `#[tag(r#"xpath:"//h1" json:"title""#)]`, the raw annotation verbatim
/// - `#[tag(xpath = "//h1", json = "title")]`, rendered to the raw form
struct TagArgs {
    raw: String,
}

impl Parse for TagArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            let lit: LitStr = input.parse()?;
            if !input.is_empty() {
                return Err(input.error("expected a single annotation string"));
            }
            return Ok(TagArgs { raw: lit.value() });
        }

        let pairs = Punctuated::<MetaNameValue, Token![,]>::parse_terminated(input)?;
        let mut rendered = Vec::with_capacity(pairs.len());
        for nv in pairs {
            let key = nv
                .path
                .get_ident()
                .ok_or_else(|| syn::Error::new_spanned(&nv.path, "expected identifier"))?
                .unraw()
                .to_string();
            let value = match &nv.value {
                syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(s),
                    ..
                }) => s.value(),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        format!("expected string literal for {key}"),
                    ))
                }
            };
            rendered.push(format!("{key}:\"{}\"", escape_tag_value(&value)));
        }
        Ok(TagArgs {
            raw: rendered.join(" "),
        })
    }
}

/// Escape a value for the `key:"value"` grammar
fn escape_tag_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Parse `#[tag(...)]` or `#[tag = "..."]`
fn parse_tag_attr(attr: &Attribute) -> syn::Result<Option<String>> {
    if !attr.path().is_ident("tag") {
        return Ok(None);
    }

    match &attr.meta {
        Meta::List(list) => {
            let args: TagArgs = syn::parse2(list.tokens.clone())?;
            Ok(Some(args.raw))
        }
        Meta::NameValue(nv) => match &nv.value {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(s),
                ..
            }) => Ok(Some(s.value())),
            other => Err(syn::Error::new_spanned(
                other,
                "expected #[tag = \"...\"] with a string literal",
            )),
        },
        Meta::Path(_) => Err(syn::Error::new_spanned(
            attr,
            "expected #[tag(\"...\")] or #[tag(key = \"...\")]",
        )),
    }
}

/// Options from `#[record(...)]`
#[derive(Default)]
struct RecordOptions {
    basename: bool,
    crate_path: Option<Path>,
}

/// Parse `#[record(basename)]` on fields and `#[record(crate = "...")]` on the struct
fn parse_record_attrs(attrs: &[Attribute], on_field: bool) -> syn::Result<RecordOptions> {
    let mut options = RecordOptions::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("record")) {
        let metas = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        for meta in metas {
            match &meta {
                Meta::Path(p) if on_field && p.is_ident("basename") => options.basename = true,
                Meta::NameValue(nv) if !on_field && nv.path.is_ident("crate") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: syn::Lit::Str(s),
                        ..
                    }) = &nv.value
                    {
                        options.crate_path = Some(s.parse()?);
                    } else {
                        return Err(syn::Error::new_spanned(
                            &nv.value,
                            "expected string literal for crate",
                        ));
                    }
                }
                _ => {
                    let expected = if on_field {
                        "expected #[record(basename)]"
                    } else {
                        "expected #[record(crate = \"...\")]"
                    };
                    return Err(syn::Error::new_spanned(meta, expected));
                }
            }
        }
    }

    Ok(options)
}

/// Check if a type is Option<T>
fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}

/// Render a type the way it would be written by hand
fn type_display(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(":: ", "::")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}

/// Information about one declared field
struct RecordField {
    ident: Ident,
    name: String,
    type_name: String,
    tag: String,
    basename: bool,
    is_optional: bool,
}

fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<RecordField>> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Record can only be derived for structs with named fields",
            ))
        }
    };

    let mut fields = Vec::with_capacity(named.named.len());
    for field in &named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"))?;

        let mut tag = None;
        for attr in &field.attrs {
            if let Some(raw) = parse_tag_attr(attr)? {
                if tag.is_some() {
                    return Err(syn::Error::new_spanned(attr, "duplicate #[tag] attribute"));
                }
                tag = Some(raw);
            }
        }
        let options = parse_record_attrs(&field.attrs, true)?;

        fields.push(RecordField {
            name: ident.unraw().to_string(),
            ident,
            type_name: type_display(&field.ty),
            tag: tag.unwrap_or_default(),
            basename: options.basename,
            is_optional: is_option_type(&field.ty),
        });
    }

    Ok(fields)
}

/// Derive `Record` for a struct with named fields
///
/// # Attributes
///
/// - `#[tag("...")]` / `#[tag = "..."]` - raw annotation in the `key:"value"` grammar
/// - `#[tag(xpath = "...", json = "...")]` - annotation pairs, rendered to the raw grammar
/// - `#[record(basename)]` - mark the field for path-basename reduction
/// - `#[record(crate = "path")]` on the struct - path to the crate exporting `Record`
///   (defaults to `::htmlstruct`)
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, Record)]
/// struct Product {
///     #[tag(xpath = "//h1")]
///     title: String,
///     #[tag(r#"xpath:"//a[@class='seller']/@href""#)]
///     #[record(basename)]
///     seller: String,
///     #[tag(xpath = "-")]
///     cached: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(tag, record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_record(input: &DeriveInput) -> syn::Result<TokenStream2> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record cannot be derived for generic structs",
        ));
    }

    let name = &input.ident;
    let options = parse_record_attrs(&input.attrs, false)?;
    let krate = options
        .crate_path
        .map(|p| p.to_token_stream())
        .unwrap_or_else(|| quote! { ::htmlstruct });
    let fields = collect_fields(input)?;

    let descriptors = fields.iter().map(|f| {
        let field_name = &f.name;
        let type_name = &f.type_name;
        let tag = &f.tag;
        let basename = f.basename;
        quote! {
            #krate::FieldDescriptor {
                name: #field_name,
                type_name: #type_name,
                tag: #tag,
                basename: #basename,
            }
        }
    });

    let assignments = fields.iter().map(|f| {
        let ident = &f.ident;
        let field_name = &f.name;
        let take = if f.is_optional {
            quote! { assign_to_option }
        } else {
            quote! { assign_to }
        };
        quote! {
            #field_name => {
                self.#ident = value.#take(field)?;
                ::core::result::Result::Ok(())
            }
        }
    });

    Ok(quote! {
        impl #krate::Record for #name {
            fn fields() -> &'static [#krate::FieldDescriptor] {
                static FIELDS: &[#krate::FieldDescriptor] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }

            #[allow(unused_variables)]
            fn assign_field(
                &mut self,
                field: &str,
                value: #krate::FieldValue,
            ) -> ::core::result::Result<(), #krate::AssignmentError> {
                match field {
                    #(#assignments)*
                    _ => ::core::result::Result::Err(
                        #krate::AssignmentError::unknown_field(field),
                    ),
                }
            }
        }
    })
}
