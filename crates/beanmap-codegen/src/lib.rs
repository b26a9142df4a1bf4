// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DataEnum, DeriveInput, Fields, FieldsNamed,
    GenericParam, Generics, Ident, LitStr, Type,
};

/// `#[derive(Bean)]` macro: generates the schema and value bridges of a
/// struct or a unit-only enum.
///
/// Structs need named fields and must also implement `Debug` and `Clone`
/// (and `Default`, unless `no_construct` or `builder` is set).
///
/// Type attributes:
/// - `#[bean(name = "...")]` schema name (defaults to the Rust name)
/// - `#[bean(builder)]` instances are built through a draft and finished
/// - `#[bean(no_construct)]` the engine cannot create instances
///
/// Field attributes:
/// - `#[bean(rename = "...")]` property name
/// - `#[bean(skip)]` not a property
/// - `#[bean(read_only)]` / `#[bean(write_only)]`
///
/// Variant attributes: `#[bean(rename = "...")]`.
///
/// Example:
/// ```ignore
/// use beanmap::Bean;
///
/// #[derive(Bean, Debug, Clone, Default)]
/// struct Person {
///     #[bean(rename = "fullName")]
///     name: String,
///     age: u32,
///     #[bean(skip)]
///     cache: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let expanded = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => derive_struct(&input, fields),
            _ => Err(syn::Error::new_spanned(
                &input,
                "Bean structs must have named fields",
            )),
        },
        Data::Enum(data) => derive_enum(&input, data),
        Data::Union(_) => Err(syn::Error::new_spanned(&input, "unions are not supported")),
    };

    expanded.unwrap_or_else(syn::Error::into_compile_error).into()
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Default)]
struct TypeAttrs {
    name: Option<String>,
    builder: bool,
    no_construct: bool,
}

#[derive(Default)]
struct FieldAttrs {
    rename: Option<String>,
    skip: bool,
    read_only: bool,
    write_only: bool,
}

fn type_attrs(attrs: &[Attribute]) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                out.name = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("builder") {
                out.builder = true;
            } else if meta.path.is_ident("no_construct") {
                out.no_construct = true;
            } else {
                return Err(meta.error("expected `name`, `builder` or `no_construct`"));
            }
            Ok(())
        })?;
    }
    if out.builder && out.no_construct {
        return Err(syn::Error::new_spanned(
            &attrs[0],
            "`builder` and `no_construct` are mutually exclusive",
        ));
    }
    Ok(out)
}

fn field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("bean")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                out.rename = Some(meta.value()?.parse::<LitStr>()?.value());
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else if meta.path.is_ident("read_only") {
                out.read_only = true;
            } else if meta.path.is_ident("write_only") {
                out.write_only = true;
            } else {
                return Err(meta.error(
                    "expected `rename`, `skip`, `read_only` or `write_only`",
                ));
            }
            Ok(())
        })?;
        if out.read_only && out.write_only {
            return Err(syn::Error::new_spanned(
                attr,
                "a property cannot be both read_only and write_only",
            ));
        }
    }
    Ok(out)
}

// ============================================================================
// Structs
// ============================================================================

struct Property<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    name: String,
    attrs: FieldAttrs,
}

fn derive_struct(input: &DeriveInput, fields: &FieldsNamed) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let attrs = type_attrs(&input.attrs)?;
    let schema_name = attrs.name.clone().unwrap_or_else(|| ident.to_string());

    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "Bean types cannot borrow (lifetime parameters are not supported)",
        ));
    }
    let type_params: Vec<&Ident> = input.generics.type_params().map(|p| &p.ident).collect();
    let mut generics = with_value_bounds(&input.generics);
    if !type_params.is_empty() && !attrs.builder && !attrs.no_construct {
        let (_, ty_generics, _) = input.generics.split_for_impl();
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(#ident #ty_generics: ::core::default::Default));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let mut properties = Vec::new();
    let mut skipped = Vec::new();
    for field in &fields.named {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };
        let field_attrs = field_attrs(&field.attrs)?;
        if field_attrs.skip {
            skipped.push(field_ident);
            continue;
        }
        properties.push(Property {
            ident: field_ident,
            ty: &field.ty,
            name: field_attrs
                .rename
                .clone()
                .unwrap_or_else(|| field_ident.to_string()),
            attrs: field_attrs,
        });
    }

    let param_names: Vec<String> = type_params.iter().map(ToString::to_string).collect();
    let field_specs = properties.iter().map(|p| {
        let field = p.ident;
        let name = &p.name;
        let declared = declared_type(p.ty, &type_params);
        let getter = (!p.attrs.write_only).then(|| {
            quote! {
                .with_getter(|bean| {
                    let this = ::beanmap::bean::cast::<Self>(bean)?;
                    Ok(::beanmap::IntoValue::into_value(::core::clone::Clone::clone(&this.#field)))
                })
            }
        });
        let setter = (!p.attrs.read_only).then(|| {
            quote! {
                .with_setter(|bean, value| {
                    let this = ::beanmap::bean::cast_mut::<Self>(bean)?;
                    this.#field = ::beanmap::FromValue::from_value(value)?;
                    Ok(())
                })
            }
        });
        quote! {
            .field_spec(
                ::beanmap::PropertySpec::new(#name, #declared)
                    #getter
                    #setter
            )
        }
    });

    let construction = if attrs.no_construct {
        quote! {}
    } else if attrs.builder {
        builder_construction(&schema_name, &param_names, &properties, &skipped, &type_params)
    } else {
        quote! {
            .construct_default(|_: &::beanmap::StructType| -> ::std::boxed::Box<dyn ::beanmap::Bean> {
                ::std::boxed::Box::new(<Self as ::core::default::Default>::default())
            })
        }
    };

    let build_schema = quote! {
        ::beanmap::SchemaBuilder::new(#schema_name)
            #( .type_param(#param_names) )*
            #( #field_specs )*
            #construction
            .build()
    };

    // Generic schemas mention `Self`'s parameters and cannot live in a
    // shared static.
    let schema_body = if type_params.is_empty() {
        quote! {
            static SCHEMA: ::std::sync::OnceLock<::std::sync::Arc<::beanmap::BeanSchema>> =
                ::std::sync::OnceLock::new();
            ::std::sync::Arc::clone(SCHEMA.get_or_init(|| #build_schema))
        }
    } else {
        build_schema
    };

    Ok(quote! {
        impl #impl_generics #ident #ty_generics #where_clause {
            #[doc(hidden)]
            pub fn __beanmap_schema() -> ::std::sync::Arc<::beanmap::BeanSchema> {
                #schema_body
            }
        }

        impl #impl_generics ::beanmap::Typed for #ident #ty_generics #where_clause {
            fn type_of() -> ::beanmap::Type {
                ::beanmap::Type::Struct(::beanmap::StructType::lazy(
                    #schema_name,
                    ::std::vec![ #( <#type_params as ::beanmap::Typed>::type_of() ),* ],
                    Self::__beanmap_schema,
                ))
            }
        }

        impl #impl_generics ::beanmap::Bean for #ident #ty_generics #where_clause {
            fn bean_type(&self) -> ::beanmap::Type {
                <Self as ::beanmap::Typed>::type_of()
            }

            fn clone_bean(&self) -> ::std::boxed::Box<dyn ::beanmap::Bean> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl #impl_generics ::beanmap::IntoValue for #ident #ty_generics #where_clause {
            fn into_value(self) -> ::beanmap::Value {
                ::beanmap::Value::Object(::std::boxed::Box::new(self))
            }
        }

        impl #impl_generics ::beanmap::FromValue for #ident #ty_generics #where_clause {
            fn from_value(value: ::beanmap::Value) -> ::core::result::Result<Self, ::beanmap::AccessError> {
                ::beanmap::bean::take_bean::<Self>(value)
            }
        }
    })
}

/// Draft-and-finish construction: the engine populates a dynamic draft
/// named `<Name>Builder`, then the finisher moves its fields into `Self`.
fn builder_construction(
    schema_name: &str,
    param_names: &[String],
    properties: &[Property<'_>],
    skipped: &[&Ident],
    type_params: &[&Ident],
) -> TokenStream2 {
    let draft_name = format!("{schema_name}Builder");
    let settable: Vec<&Property<'_>> = properties.iter().filter(|p| !p.attrs.read_only).collect();
    let draft_fields = settable.iter().map(|p| {
        let name = &p.name;
        let declared = declared_type(p.ty, type_params);
        quote! { .field(#name, #declared) }
    });
    let moved = settable.iter().map(|p| {
        let field = p.ident;
        let name = &p.name;
        quote! { #field: ::beanmap::bean::required(draft, #name)? }
    });
    let defaulted = properties
        .iter()
        .filter(|p| p.attrs.read_only)
        .map(|p| p.ident)
        .chain(skipped.iter().copied())
        .map(|field| quote! { #field: ::core::default::Default::default() });
    let draft_var = format_ident!("__draft_schema");

    quote! {
        .construct_with_builder(
            {
                let #draft_var = ::beanmap::SchemaBuilder::new(#draft_name)
                    #( .type_param(#param_names) )*
                    #( #draft_fields )*
                    .build();
                ::std::sync::Arc::new(move |ty: &::beanmap::StructType| -> ::std::boxed::Box<dyn ::beanmap::Bean> {
                    ::std::boxed::Box::new(::beanmap::DynamicBean::empty(
                        ::beanmap::StructType::with_args(
                            ::std::sync::Arc::clone(&#draft_var),
                            ty.args().to_vec(),
                        ),
                    ))
                })
            },
            ::std::sync::Arc::new(|mut built: ::std::boxed::Box<dyn ::beanmap::Bean>|
                -> ::core::result::Result<::std::boxed::Box<dyn ::beanmap::Bean>, ::beanmap::AccessError>
            {
                let draft = ::beanmap::bean::cast_mut::<::beanmap::DynamicBean>(&mut *built)?;
                ::core::result::Result::Ok(::std::boxed::Box::new(Self {
                    #( #moved, )*
                    #( #defaulted, )*
                }))
            }),
        )
    }
}

/// Declared property type: a bare type parameter stays a type variable,
/// anything else is described by its `Typed` impl.
fn declared_type(ty: &Type, type_params: &[&Ident]) -> TokenStream2 {
    if let Type::Path(path) = ty {
        if path.qself.is_none() {
            if let Some(ident) = path.path.get_ident() {
                if type_params.contains(&ident) {
                    let name = ident.to_string();
                    return quote! { ::beanmap::Type::var(#name) };
                }
            }
        }
    }
    quote! { <#ty as ::beanmap::Typed>::type_of() }
}

/// Every type parameter must itself travel through values.
fn with_value_bounds(generics: &Generics) -> Generics {
    let mut generics = generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(param) = param {
            param.bounds.push(parse_quote!(::beanmap::Typed));
            param.bounds.push(parse_quote!(::beanmap::IntoValue));
            param.bounds.push(parse_quote!(::beanmap::FromValue));
            param.bounds.push(parse_quote!(::core::clone::Clone));
            param.bounds.push(parse_quote!(::core::fmt::Debug));
            param.bounds.push(parse_quote!(::core::marker::Send));
            param.bounds.push(parse_quote!(::core::marker::Sync));
            param.bounds.push(parse_quote!('static));
        }
    }
    generics
}

// ============================================================================
// Enums
// ============================================================================

fn derive_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream2> {
    let ident = &input.ident;
    let attrs = type_attrs(&input.attrs)?;
    if attrs.builder || attrs.no_construct {
        return Err(syn::Error::new_spanned(
            ident,
            "`builder` and `no_construct` only apply to structs",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Bean enums cannot be generic",
        ));
    }
    let type_name = attrs.name.unwrap_or_else(|| ident.to_string());

    let mut variants = Vec::new();
    let mut names = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "Bean enums must only have unit variants",
            ));
        }
        let variant_attrs = field_attrs(&variant.attrs)?;
        if variant_attrs.skip || variant_attrs.read_only || variant_attrs.write_only {
            return Err(syn::Error::new_spanned(
                variant,
                "only `rename` applies to enum variants",
            ));
        }
        names.push(
            variant_attrs
                .rename
                .unwrap_or_else(|| variant.ident.to_string()),
        );
        variants.push(&variant.ident);
    }

    let count = names.len();

    Ok(quote! {
        impl #ident {
            #[doc(hidden)]
            pub fn __beanmap_enum_type() -> ::beanmap::EnumType {
                static TYPE: ::std::sync::OnceLock<::beanmap::EnumType> = ::std::sync::OnceLock::new();
                ::core::clone::Clone::clone(TYPE.get_or_init(|| {
                    let names: [&str; #count] = [ #( #names ),* ];
                    ::beanmap::EnumType::new(#type_name, names)
                }))
            }
        }

        impl ::beanmap::Typed for #ident {
            fn type_of() -> ::beanmap::Type {
                ::beanmap::Type::Enum(Self::__beanmap_enum_type())
            }
        }

        impl ::beanmap::IntoValue for #ident {
            fn into_value(self) -> ::beanmap::Value {
                let name: &str = match self {
                    #( Self::#variants => #names, )*
                };
                ::beanmap::Value::Enum(Self::__beanmap_enum_type(), ::std::sync::Arc::from(name))
            }
        }

        impl ::beanmap::FromValue for #ident {
            fn from_value(value: ::beanmap::Value) -> ::core::result::Result<Self, ::beanmap::AccessError> {
                let name: ::std::string::String = match value {
                    ::beanmap::Value::Enum(_, name) => ::std::string::ToString::to_string(&*name),
                    ::beanmap::Value::String(name) => name,
                    ::beanmap::Value::Null => {
                        return ::core::result::Result::Err(::beanmap::AccessError::NullValue(
                            ::std::string::ToString::to_string(#type_name),
                        ))
                    }
                    other => {
                        return ::core::result::Result::Err(::beanmap::AccessError::TypeMismatch {
                            expected: ::std::string::ToString::to_string(#type_name),
                            got: ::std::string::ToString::to_string(&other.runtime_type()),
                        })
                    }
                };
                match name.as_str() {
                    #( #names => ::core::result::Result::Ok(Self::#variants), )*
                    _ => ::core::result::Result::Err(::beanmap::AccessError::TypeMismatch {
                        expected: ::std::string::ToString::to_string(#type_name),
                        got: name,
                    }),
                }
            }
        }
    })
}
