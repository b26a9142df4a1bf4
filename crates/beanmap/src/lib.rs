// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # beanmap - Type-directed object mapping
//!
//! Converts values between types and copies named properties between
//! struct-like and map-like values, driven by explicit runtime type
//! descriptions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use beanmap::{Bean, BeanMapper, Result};
//! use std::collections::HashMap;
//!
//! #[derive(Bean, Debug, Clone, Default)]
//! struct Person {
//!     name: String,
//!     age: u32,
//! }
//!
//! fn main() -> Result<()> {
//!     let mapper = BeanMapper::new();
//!
//!     let person = Person { name: "Ada".into(), age: 36 };
//!     let map: HashMap<String, String> = mapper.convert_to(person)?;
//!     assert_eq!(map["age"], "36");
//!
//!     let back: Person = mapper.convert_to(map)?;
//!     assert_eq!(back.age, 36);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                          BeanMapper                                 |
//! |   convert | convert_to | copy_properties | copy_bean | resolve      |
//! +---------------------------------------------------------------------+
//! |   Mapper (9 handlers)   <---->   Property copier (4 branches)       |
//! +---------------------------------------------------------------------+
//! |   MetadataCache (LRU)  ->  ChainResolver  ->  StructuralProvider    |
//! +---------------------------------------------------------------------+
//! |   Type | Value | BeanSchema (#[derive(Bean)] / SchemaBuilder)      |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`BeanMapper`] | Entry point: resolve, convert, copy |
//! | [`Type`] | Runtime description of a type, generics included |
//! | [`Value`] | Dynamic value flowing through conversions |
//! | [`TypeDescriptor`] | Resolved properties and methods of a type |
//! | [`ConversionOptions`] | Per-call behavior (reuse, nulls, failures, charset) |
//! | [`HandlerChain`] | Ordered chain of responsibility used by resolver and mapper |
//!
//! ## Modules Overview
//!
//! - [`chain`] - Handler chain with `Continue`/`Value`/`Break` flow
//! - [`types`] - Type model
//! - [`value`] - Dynamic values and typed extraction
//! - [`bean`] - Schemas, beans, instantiation
//! - [`resolver`] - Structural resolution
//! - [`cache`] - Descriptor cache
//! - [`convert`] - Type-directed conversion
//! - [`copy`] - Property copier

// Allow the derive macro to work inside this crate's tests
extern crate self as beanmap;

/// Bean trait, schemas and instantiation.
pub mod bean;
/// LRU cache of resolved type descriptors.
pub mod cache;
/// Chain of responsibility.
pub mod chain;
/// YAML option profiles.
#[cfg(feature = "config-loaders")]
pub mod config;
/// Type-directed conversion (mapper and its handlers).
pub mod convert;
/// Property copier.
pub mod copy;
/// Property and type descriptors.
pub mod descriptor;
/// Error types.
pub mod error;
mod facade;
/// Conversion options.
pub mod options;
/// Structural resolver.
pub mod resolver;
/// Type model.
pub mod types;
/// Dynamic values.
pub mod value;

pub use bean::{
    Annotation, BeanSchema, Construction, DynamicBean, Instance, Instantiate, MethodSpec,
    PropertySpec, SchemaBuilder, SchemaInstantiator,
};
pub use cache::{CachedResolver, LookupStats, MetadataCache};
pub use chain::{Flow, Handler, HandlerChain};
pub use convert::{Charset, Convert, Env, Mapper, MappingContext, NumberFormat};
pub use descriptor::{MethodDescriptor, PropertyDescriptor, TypeDescriptor};
pub use error::{AccessError, Error, Result};
pub use facade::BeanMapper;
pub use options::{ConversionOptions, ReusePolicy};
pub use resolver::{ChainResolver, Resolve, SchemaProvider, StructuralProvider};
pub use types::{CollectionKind, EnumType, MapKind, PrimitiveKind, StructType, Type, Typed};
pub use value::{FromValue, IntoValue, Value};

pub use bean::Bean;
pub use beanmap_codegen::Bean;
