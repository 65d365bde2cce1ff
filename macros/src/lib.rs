use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{
    parse_macro_input, Data, DeriveInput, Expr, Field, Fields, GenericArgument, Lit, Meta,
    PathArguments, Token, Type,
};

/// Derives `value::Record` for a struct with named fields, turning the
/// struct definition into the schema table the mapping engine drives.
///
/// Usage:
/// ```ignore
/// use value::{Decimal, Record};
///
/// #[derive(Default, Record)]
/// struct Material {
///     #[field(rename = "MATNR")]
///     number: String,
///     net_price: Decimal,
///     created: Option<chrono::NaiveDateTime>,
/// }
/// ```
///
/// The field's Rust type decides its kind: `String` is text, `Decimal` is
/// decimal, `Option<NaiveDateTime>` is date/time, `i64` and `bool` declare
/// integer/bool fields. The external field name defaults to the field
/// identifier and can be overridden with `#[field(rename = "...")]`.
#[proc_macro_derive(Record, attributes(field))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error().into(),
    }
}

enum Kind {
    Text,
    DateTime,
    Decimal,
    Integer,
    Bool,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            name,
            "Record can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            name,
            "Record needs a struct with named fields",
        ));
    };

    let mut descriptors = Vec::new();
    for field in &fields.named {
        let ident = field.ident.as_ref().unwrap();
        let external = external_name(field)?.unwrap_or_else(|| ident.to_string());

        let (kind, get, set) = match field_kind(&field.ty)? {
            Kind::Text => (
                quote! { Text },
                quote! { |record: &Self| ::value::Value::text(record.#ident.as_str()) },
                quote! { |record: &mut Self, value: ::value::Value| {
                    if let ::value::Value::Text(text) = value {
                        record.#ident = text;
                    }
                } },
            ),
            Kind::DateTime => (
                quote! { DateTime },
                quote! { |record: &Self| ::value::Value::from(record.#ident) },
                quote! { |record: &mut Self, value: ::value::Value| {
                    if let ::value::Value::DateTime(datetime) = value {
                        record.#ident = ::std::option::Option::Some(datetime);
                    }
                } },
            ),
            Kind::Decimal => (
                quote! { Decimal },
                quote! { |record: &Self| ::value::Value::Decimal(record.#ident) },
                quote! { |record: &mut Self, value: ::value::Value| {
                    if let ::value::Value::Decimal(decimal) = value {
                        record.#ident = decimal;
                    }
                } },
            ),
            Kind::Integer => (
                quote! { Integer },
                quote! { |record: &Self| ::value::Value::Int(record.#ident) },
                quote! { |record: &mut Self, value: ::value::Value| {
                    if let ::value::Value::Int(int) = value {
                        record.#ident = int;
                    }
                } },
            ),
            Kind::Bool => (
                quote! { Bool },
                quote! { |record: &Self| ::value::Value::Bool(record.#ident) },
                quote! { |record: &mut Self, value: ::value::Value| {
                    if let ::value::Value::Bool(bool) = value {
                        record.#ident = bool;
                    }
                } },
            ),
        };

        descriptors.push(quote! {
            ::value::FieldDescriptor {
                name: #external,
                kind: ::value::FieldKind::#kind,
                get: #get,
                set: #set,
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let generated = quote! {
        impl #impl_generics ::value::Record for #name #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<::value::FieldDescriptor<Self>> {
                ::std::vec![ #(#descriptors),* ]
            }
        }
    };
    Ok(generated.into())
}

fn field_kind(ty: &Type) -> syn::Result<Kind> {
    if let Some(inner) = option_inner(ty) {
        if last_ident(inner).as_deref() == Some("NaiveDateTime") {
            return Ok(Kind::DateTime);
        }
        return Err(syn::Error::new_spanned(
            ty,
            "only Option<NaiveDateTime> is mappable among Option fields",
        ));
    }
    match last_ident(ty).as_deref() {
        Some("String") => Ok(Kind::Text),
        Some("Decimal") => Ok(Kind::Decimal),
        Some("i64") => Ok(Kind::Integer),
        Some("bool") => Ok(Kind::Bool),
        Some("NaiveDateTime") => Err(syn::Error::new_spanned(
            ty,
            "date/time fields must be Option<NaiveDateTime> so an unset date has a default",
        )),
        _ => Err(syn::Error::new_spanned(
            ty,
            "cannot map this field type; use String, Decimal, Option<NaiveDateTime>, i64 or bool",
        )),
    }
}

fn last_ident(ty: &Type) -> Option<String> {
    if let Type::Path(path) = ty {
        return path.path.segments.last().map(|segment| segment.ident.to_string());
    }
    None
}

fn option_inner(ty: &Type) -> Option<&Type> {
    if let Type::Path(path) = ty
        && let Some(segment) = path.path.segments.last()
        && segment.ident == "Option"
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return Some(inner);
    }
    None
}

fn external_name(field: &Field) -> syn::Result<Option<String>> {
    for attr in &field.attrs {
        if !attr.path().is_ident("field") {
            continue;
        }
        let args: Punctuated<Meta, Token![,]> =
            attr.parse_args_with(Punctuated::parse_terminated)?;
        for meta in args {
            if let Meta::NameValue(nv) = &meta
                && nv.path.is_ident("rename")
                && let Expr::Lit(expr) = &nv.value
                && let Lit::Str(lit) = &expr.lit
            {
                return Ok(Some(lit.value()));
            }
            return Err(syn::Error::new_spanned(meta, "expected `rename = \"...\"`"));
        }
    }
    Ok(None)
}
