// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reified type values.
//!
//! A [`Type`] travels alongside every value the engine touches. It carries
//! what the Rust compiler erases at runtime: container element types, map
//! key/value types, struct type arguments, type variables and wildcards.

mod typed;

pub use typed::Typed;

use crate::bean::BeanSchema;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Primitive (atomic, fixed-size) kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Numeric kinds are every kind except `Bool` and `Char`.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Self::Bool | Self::Char)
    }

    /// Signed or unsigned integer kinds.
    pub fn is_integer(self) -> bool {
        self.is_numeric() && !self.is_float()
    }

    /// `F32` or `F64`.
    pub fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Size in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::Char | Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
            Self::I128 | Self::U128 => 16,
        }
    }

    /// Rust spelling of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// Iterable container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Abstract "anything iterable"; materialized as a list.
    Iterable,
    List,
    Deque,
    /// Unordered set; materialized as an insertion-ordered set.
    Set,
    SortedSet,
}

impl CollectionKind {
    /// True for kinds that only describe an interface.
    pub fn is_abstract(self) -> bool {
        matches!(self, Self::Iterable)
    }

    /// True for set kinds (elements are deduplicated).
    pub fn is_set(self) -> bool {
        matches!(self, Self::Set | Self::SortedSet)
    }

    /// Concrete kind used when a target asks for this kind.
    pub fn canonical(self) -> Self {
        match self {
            Self::Iterable => Self::List,
            other => other,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Iterable => "Iterable",
            Self::List => "List",
            Self::Deque => "Deque",
            Self::Set => "Set",
            Self::SortedSet => "SortedSet",
        }
    }
}

/// Map container kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Abstract map; materialized as an insertion-ordered map.
    Map,
    Hash,
    Sorted,
    Ordered,
}

impl MapKind {
    /// True for kinds that only describe an interface.
    pub fn is_abstract(self) -> bool {
        matches!(self, Self::Map)
    }

    /// Concrete kind used when a target asks for this kind.
    pub fn canonical(self) -> Self {
        match self {
            Self::Map => Self::Ordered,
            other => other,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Hash => "HashMap",
            Self::Sorted => "SortedMap",
            Self::Ordered => "OrderedMap",
        }
    }
}

/// A struct-like type: schema plus type arguments.
///
/// Identity is the name and the type arguments; two `StructType`s with the
/// same name and arguments are the same type whatever schema instance they
/// carry.
#[derive(Clone)]
pub struct StructType {
    name: Arc<str>,
    args: Vec<Type>,
    schema: SchemaSource,
}

/// Schema of a struct type, built now or on first use.
#[derive(Clone)]
enum SchemaSource {
    Ready(Arc<BeanSchema>),
    /// Self-referencing types cannot build their schema while describing
    /// their own fields.
    Lazy(fn() -> Arc<BeanSchema>),
}

impl StructType {
    /// Struct type without type arguments.
    pub fn new(schema: Arc<BeanSchema>) -> Self {
        Self::with_args(schema, Vec::new())
    }

    /// Struct type applied to `args` (matched positionally against the
    /// schema's type parameters).
    pub fn with_args(schema: Arc<BeanSchema>, args: Vec<Type>) -> Self {
        Self {
            name: schema.name.clone(),
            args,
            schema: SchemaSource::Ready(schema),
        }
    }

    /// Struct type whose schema is produced by `schema` when first needed.
    ///
    /// `name` must match the name of the produced schema.
    pub fn lazy(name: impl Into<Arc<str>>, args: Vec<Type>, schema: fn() -> Arc<BeanSchema>) -> Self {
        Self {
            name: name.into(),
            args,
            schema: SchemaSource::Lazy(schema),
        }
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Type arguments.
    pub fn args(&self) -> &[Type] {
        &self.args
    }

    /// Schema describing the type's accessors.
    pub fn schema(&self) -> Arc<BeanSchema> {
        match &self.schema {
            SchemaSource::Ready(schema) => Arc::clone(schema),
            SchemaSource::Lazy(build) => build(),
        }
    }

    /// Type parameter bindings. Parameters without an argument bind to `Any`.
    pub fn bindings(&self) -> Vec<(Arc<str>, Type)> {
        self.schema()
            .type_params
            .iter()
            .enumerate()
            .map(|(i, param)| (param.clone(), self.args.get(i).cloned().unwrap_or(Type::Any)))
            .collect()
    }

    /// Same struct without type arguments.
    pub fn raw(&self) -> Self {
        Self {
            name: self.name.clone(),
            args: Vec::new(),
            schema: self.schema.clone(),
        }
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        if self.name != other.name || self.args != other.args {
            return false;
        }
        // Runtime-built schemas may share a name; they must also agree on
        // their properties.
        match (&self.schema, &other.schema) {
            (SchemaSource::Ready(a), SchemaSource::Ready(b)) => {
                Arc::ptr_eq(a, b) || same_shape(a, b)
            }
            _ => true,
        }
    }
}

fn same_shape(a: &BeanSchema, b: &BeanSchema) -> bool {
    a.type_params == b.type_params
        && a.properties()
            .map(|p| (&p.name, &p.ty))
            .eq(b.properties().map(|p| (&p.name, &p.ty)))
}

impl Eq for StructType {}

impl Hash for StructType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.args.hash(state);
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructType({self})")
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

/// An enumerated type: a name and its symbolic variant names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    name: Arc<str>,
    variants: Arc<[Arc<str>]>,
}

impl EnumType {
    /// Create an enum type.
    pub fn new<I, S>(name: impl Into<Arc<str>>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        }
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variant names in declaration order.
    pub fn variants(&self) -> &[Arc<str>] {
        &self.variants
    }

    /// Variant with exactly this symbolic name.
    pub fn variant(&self, name: &str) -> Option<&Arc<str>> {
        self.variants.iter().find(|v| v.as_ref() == name)
    }

    /// Declaration index of a variant.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.variants.iter().position(|v| v.as_ref() == name)
    }
}

/// A reified type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Top type; every type is assignable to it.
    Any,
    Primitive(PrimitiveKind),
    /// Owned UTF-8 text.
    String,
    /// Mutable raw byte array (`bytes::BytesMut`).
    Bytes,
    /// Shared immutable byte buffer (`bytes::Bytes`).
    ByteBuffer,
    Enum(EnumType),
    Collection(CollectionKind, Box<Type>),
    /// Array with optional fixed length.
    Array(Box<Type>, Option<usize>),
    Map(MapKind, Box<Type>, Box<Type>),
    Struct(StructType),
    /// Type variable placeholder (e.g. `T`).
    Var(Arc<str>),
    /// Bounded placeholder (`?`, `? extends A`, `? super B`).
    Wildcard { upper: Vec<Type>, lower: Vec<Type> },
}

impl Type {
    pub const BOOL: Type = Type::Primitive(PrimitiveKind::Bool);
    pub const CHAR: Type = Type::Primitive(PrimitiveKind::Char);
    pub const I8: Type = Type::Primitive(PrimitiveKind::I8);
    pub const I16: Type = Type::Primitive(PrimitiveKind::I16);
    pub const I32: Type = Type::Primitive(PrimitiveKind::I32);
    pub const I64: Type = Type::Primitive(PrimitiveKind::I64);
    pub const I128: Type = Type::Primitive(PrimitiveKind::I128);
    pub const U8: Type = Type::Primitive(PrimitiveKind::U8);
    pub const U16: Type = Type::Primitive(PrimitiveKind::U16);
    pub const U32: Type = Type::Primitive(PrimitiveKind::U32);
    pub const U64: Type = Type::Primitive(PrimitiveKind::U64);
    pub const U128: Type = Type::Primitive(PrimitiveKind::U128);
    pub const F32: Type = Type::Primitive(PrimitiveKind::F32);
    pub const F64: Type = Type::Primitive(PrimitiveKind::F64);

    /// `List<element>`.
    pub fn list(element: Type) -> Self {
        Self::Collection(CollectionKind::List, Box::new(element))
    }

    /// `Deque<element>`.
    pub fn deque(element: Type) -> Self {
        Self::Collection(CollectionKind::Deque, Box::new(element))
    }

    /// `Set<element>`.
    pub fn set(element: Type) -> Self {
        Self::Collection(CollectionKind::Set, Box::new(element))
    }

    /// `SortedSet<element>`.
    pub fn sorted_set(element: Type) -> Self {
        Self::Collection(CollectionKind::SortedSet, Box::new(element))
    }

    /// `Iterable<element>`.
    pub fn iterable(element: Type) -> Self {
        Self::Collection(CollectionKind::Iterable, Box::new(element))
    }

    /// Fixed-length array.
    pub fn array(element: Type, length: usize) -> Self {
        Self::Array(Box::new(element), Some(length))
    }

    /// Array of any length.
    pub fn slice(element: Type) -> Self {
        Self::Array(Box::new(element), None)
    }

    /// Abstract `Map<key, value>`.
    pub fn map(key: Type, value: Type) -> Self {
        Self::Map(MapKind::Map, Box::new(key), Box::new(value))
    }

    /// Map of a given kind.
    pub fn map_of(kind: MapKind, key: Type, value: Type) -> Self {
        Self::Map(kind, Box::new(key), Box::new(value))
    }

    /// Type variable.
    pub fn var(name: impl Into<Arc<str>>) -> Self {
        Self::Var(name.into())
    }

    /// Unbounded wildcard `?`.
    pub fn wildcard() -> Self {
        Self::Wildcard {
            upper: Vec::new(),
            lower: Vec::new(),
        }
    }

    /// `? extends bound`.
    pub fn extends(bound: Type) -> Self {
        Self::Wildcard {
            upper: vec![bound],
            lower: Vec::new(),
        }
    }

    /// `? super bound`.
    pub fn super_of(bound: Type) -> Self {
        Self::Wildcard {
            upper: Vec::new(),
            lower: vec![bound],
        }
    }

    /// Primitive kind, if any.
    pub fn primitive(&self) -> Option<PrimitiveKind> {
        match self {
            Self::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    pub fn is_numeric(&self) -> bool {
        self.primitive().is_some_and(PrimitiveKind::is_numeric)
    }

    /// `String` or `char`.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Primitive(PrimitiveKind::Char))
    }

    /// `Bytes` or `ByteBuffer`.
    pub fn is_byte_buffer(&self) -> bool {
        matches!(self, Self::Bytes | Self::ByteBuffer)
    }

    /// Collection or array.
    pub fn is_iterable(&self) -> bool {
        matches!(self, Self::Collection(..) | Self::Array(..))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(..))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Self::Struct(_))
    }

    /// True for type variables and wildcards.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Var(_) | Self::Wildcard { .. })
    }

    /// Struct type, if any.
    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Self::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Element type of a collection, array or byte buffer.
    pub fn element_type(&self) -> Option<Type> {
        match self {
            Self::Collection(_, element) | Self::Array(element, _) => Some((**element).clone()),
            Self::Bytes | Self::ByteBuffer => Some(Self::U8),
            _ => None,
        }
    }

    /// Key and value types of a map.
    pub fn key_value_types(&self) -> Option<(Type, Type)> {
        match self {
            Self::Map(_, key, value) => Some(((**key).clone(), (**value).clone())),
            _ => None,
        }
    }

    /// The single upper bound of a wildcard.
    ///
    /// `?` has the implicit bound `Any`. Wildcards with several upper bounds
    /// or with a lower bound have no single bound.
    pub fn single_upper_bound(&self) -> Option<&Type> {
        const ANY: Type = Type::Any;
        match self {
            Self::Wildcard { upper, lower } if lower.is_empty() => match upper.as_slice() {
                [] => Some(&ANY),
                [bound] => Some(bound),
                _ => None,
            },
            _ => None,
        }
    }

    /// Can a value of type `other` be used where `self` is expected?
    pub fn is_assignable_from(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }
        match (self, other) {
            (Self::Any, _) => true,
            (Self::Wildcard { upper, lower }, _) => {
                upper.iter().all(|u| u.is_assignable_from(other))
                    && lower.iter().all(|l| other.is_assignable_from(l))
            }
            (
                Self::Collection(CollectionKind::Iterable, element),
                Self::Collection(_, other_element) | Self::Array(other_element, _),
            ) => element.is_assignable_from(other_element),
            (Self::Collection(kind, element), Self::Collection(other_kind, other_element)) => {
                kind == other_kind && element.is_assignable_from(other_element)
            }
            (Self::Array(element, length), Self::Array(other_element, other_length)) => {
                (length.is_none() || length == other_length)
                    && element.is_assignable_from(other_element)
            }
            (Self::Map(kind, key, value), Self::Map(other_kind, other_key, other_value)) => {
                (kind.is_abstract() || kind == other_kind)
                    && key.is_assignable_from(other_key)
                    && value.is_assignable_from(other_value)
            }
            _ => false,
        }
    }

    /// Replace type variables by their bindings, recursively.
    ///
    /// Unbound variables are left in place.
    #[must_use]
    pub fn substitute(&self, bindings: &[(Arc<str>, Type)]) -> Type {
        if bindings.is_empty() {
            return self.clone();
        }
        match self {
            Self::Var(name) => bindings
                .iter()
                .find(|(param, _)| param == name)
                .map(|(_, bound)| bound.clone())
                .unwrap_or_else(|| self.clone()),
            Self::Collection(kind, element) => {
                Self::Collection(*kind, Box::new(element.substitute(bindings)))
            }
            Self::Array(element, length) => {
                Self::Array(Box::new(element.substitute(bindings)), *length)
            }
            Self::Map(kind, key, value) => Self::Map(
                *kind,
                Box::new(key.substitute(bindings)),
                Box::new(value.substitute(bindings)),
            ),
            Self::Struct(st) if !st.args.is_empty() => Self::Struct(StructType {
                name: st.name.clone(),
                args: st.args.iter().map(|a| a.substitute(bindings)).collect(),
                schema: st.schema.clone(),
            }),
            Self::Wildcard { upper, lower } => Self::Wildcard {
                upper: upper.iter().map(|t| t.substitute(bindings)).collect(),
                lower: lower.iter().map(|t| t.substitute(bindings)).collect(),
            },
            other => other.clone(),
        }
    }

    /// Raw type with every type argument dropped.
    #[must_use]
    pub fn erasure(&self) -> Type {
        match self {
            Self::Collection(kind, _) => Self::Collection(*kind, Box::new(Self::Any)),
            Self::Array(element, length) => Self::Array(Box::new(element.erasure()), *length),
            Self::Map(kind, _, _) => Self::Map(*kind, Box::new(Self::Any), Box::new(Self::Any)),
            Self::Struct(st) if !st.args.is_empty() => Self::Struct(st.raw()),
            Self::Var(_) => Self::Any,
            Self::Wildcard { .. } => self
                .single_upper_bound()
                .map(Type::erasure)
                .unwrap_or(Self::Any),
            other => other.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Primitive(kind) => f.write_str(kind.name()),
            Self::String => f.write_str("String"),
            Self::Bytes => f.write_str("Bytes"),
            Self::ByteBuffer => f.write_str("ByteBuffer"),
            Self::Enum(e) => f.write_str(e.name()),
            Self::Collection(kind, element) => write!(f, "{}<{element}>", kind.label()),
            Self::Array(element, Some(length)) => write!(f, "[{element}; {length}]"),
            Self::Array(element, None) => write!(f, "[{element}]"),
            Self::Map(kind, key, value) => write!(f, "{}<{key}, {value}>", kind.label()),
            Self::Struct(st) => write!(f, "{st}"),
            Self::Var(name) => f.write_str(name),
            Self::Wildcard { upper, lower } => {
                f.write_str("?")?;
                for bound in upper {
                    write!(f, " extends {bound}")?;
                }
                for bound in lower {
                    write!(f, " super {bound}")?;
                }
                Ok(())
            }
        }
    }
}
