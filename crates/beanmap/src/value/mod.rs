// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values.
//!
//! [`Value`] is what flows through the mapper and the copier. Values are
//! totally ordered and hashable (floats by bit pattern) so any value can be
//! a set element or a map key.

mod extract;

pub use extract::{FromValue, IntoValue};

use crate::bean::{self, Bean};
use crate::types::{CollectionKind, EnumType, MapKind, PrimitiveKind, Type};
use bytes::{Bytes, BytesMut};
use indexmap::{IndexMap, IndexSet};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A dynamic value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,

    // Primitives
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    F32(f32),
    F64(f64),

    String(String),
    Bytes(BytesMut),
    ByteBuffer(Bytes),
    /// Enum variant (type, symbolic name).
    Enum(EnumType, Arc<str>),

    // Composites
    List(Vec<Value>),
    Set(IndexSet<Value>),
    Map(IndexMap<Value, Value>),
    Object(Box<dyn Bean>),
}

impl Value {
    /// Zero value of a primitive kind.
    pub fn zero(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Bool => Self::Bool(false),
            PrimitiveKind::Char => Self::Char('\0'),
            PrimitiveKind::I8 => Self::I8(0),
            PrimitiveKind::I16 => Self::I16(0),
            PrimitiveKind::I32 => Self::I32(0),
            PrimitiveKind::I64 => Self::I64(0),
            PrimitiveKind::I128 => Self::I128(0),
            PrimitiveKind::U8 => Self::U8(0),
            PrimitiveKind::U16 => Self::U16(0),
            PrimitiveKind::U32 => Self::U32(0),
            PrimitiveKind::U64 => Self::U64(0),
            PrimitiveKind::U128 => Self::U128(0),
            PrimitiveKind::F32 => Self::F32(0.0),
            PrimitiveKind::F64 => Self::F64(0.0),
        }
    }

    /// Enum value for a variant of `ty`, if the variant exists.
    pub fn enum_variant(ty: &EnumType, name: &str) -> Option<Self> {
        ty.variant(name)
            .map(|variant| Self::Enum(ty.clone(), variant.clone()))
    }

    /// Wrap a bean.
    pub fn object(bean: impl Bean) -> Self {
        Self::Object(Box::new(bean))
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Lists, sets, maps and objects.
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            Self::List(_) | Self::Set(_) | Self::Map(_) | Self::Object(_)
        )
    }

    /// Primitive kind of a scalar value.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        Some(match self {
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::Char(_) => PrimitiveKind::Char,
            Self::I8(_) => PrimitiveKind::I8,
            Self::I16(_) => PrimitiveKind::I16,
            Self::I32(_) => PrimitiveKind::I32,
            Self::I64(_) => PrimitiveKind::I64,
            Self::I128(_) => PrimitiveKind::I128,
            Self::U8(_) => PrimitiveKind::U8,
            Self::U16(_) => PrimitiveKind::U16,
            Self::U32(_) => PrimitiveKind::U32,
            Self::U64(_) => PrimitiveKind::U64,
            Self::U128(_) => PrimitiveKind::U128,
            Self::F32(_) => PrimitiveKind::F32,
            Self::F64(_) => PrimitiveKind::F64,
            _ => return None,
        })
    }

    /// Type describing this value as it is at runtime.
    ///
    /// Container element types are the common runtime type of the elements,
    /// or `Any` when elements differ (or the container is empty).
    pub fn runtime_type(&self) -> Type {
        if let Some(kind) = self.primitive_kind() {
            return Type::Primitive(kind);
        }
        match self {
            Self::String(_) => Type::String,
            Self::Bytes(_) => Type::Bytes,
            Self::ByteBuffer(_) => Type::ByteBuffer,
            Self::Enum(ty, _) => Type::Enum(ty.clone()),
            Self::List(items) => Type::Collection(
                CollectionKind::List,
                Box::new(common_type(items.iter())),
            ),
            Self::Set(items) => {
                Type::Collection(CollectionKind::Set, Box::new(common_type(items.iter())))
            }
            Self::Map(entries) => Type::Map(
                MapKind::Ordered,
                Box::new(common_type(entries.keys())),
                Box::new(common_type(entries.values())),
            ),
            Self::Object(bean) => bean.bean_type(),
            _ => Type::Any,
        }
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as char.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Raw bytes of either buffer representation.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            Self::ByteBuffer(v) => Some(v),
            _ => None,
        }
    }

    /// Symbolic name of an enum value.
    pub fn as_variant(&self) -> Option<&str> {
        match self {
            Self::Enum(_, name) => Some(name),
            _ => None,
        }
    }

    /// Try to get as list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as set.
    pub fn as_set(&self) -> Option<&IndexSet<Value>> {
        match self {
            Self::Set(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as map.
    pub fn as_map(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as mutable map.
    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<Value, Value>> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Map entry by string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map()?.get(&Value::from(key))
    }

    /// Try to get as object.
    pub fn as_object(&self) -> Option<&dyn Bean> {
        match self {
            Self::Object(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    /// Try to get as mutable object.
    pub fn as_object_mut(&mut self) -> Option<&mut dyn Bean> {
        match self {
            Self::Object(v) => Some(v.as_mut()),
            _ => None,
        }
    }

    /// Downcast an object value to a concrete bean.
    pub fn downcast_ref<T: Bean>(&self) -> Option<&T> {
        self.as_object().and_then(bean::downcast_ref)
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Char(_) => 2,
            Self::I8(_) => 3,
            Self::I16(_) => 4,
            Self::I32(_) => 5,
            Self::I64(_) => 6,
            Self::I128(_) => 7,
            Self::U8(_) => 8,
            Self::U16(_) => 9,
            Self::U32(_) => 10,
            Self::U64(_) => 11,
            Self::U128(_) => 12,
            Self::F32(_) => 13,
            Self::F64(_) => 14,
            Self::String(_) => 15,
            Self::Bytes(_) => 16,
            Self::ByteBuffer(_) => 17,
            Self::Enum(..) => 18,
            Self::List(_) => 19,
            Self::Set(_) => 20,
            Self::Map(_) => 21,
            Self::Object(_) => 22,
        }
    }
}

fn common_type<'a>(mut values: impl Iterator<Item = &'a Value>) -> Type {
    let Some(first) = values.next() else {
        return Type::Any;
    };
    let ty = first.runtime_type();
    if values.all(|v| v.runtime_type() == ty) {
        ty
    } else {
        Type::Any
    }
}

fn sorted<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<&'a Value> {
    let mut values: Vec<_> = values.collect();
    values.sort();
    values
}

fn sorted_entries(map: &IndexMap<Value, Value>) -> Vec<(&Value, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort();
    entries
}

fn unordered_hash<T: Hash>(items: impl Iterator<Item = T>) -> u64 {
    items.fold(0u64, |acc, item| {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        acc.wrapping_add(hasher.finish())
    })
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::I128(a), Self::I128(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::U128(a), Self::U128(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::ByteBuffer(a), Self::ByteBuffer(b)) => a == b,
            (Self::Enum(ta, a), Self::Enum(tb, b)) => ta.name() == tb.name() && a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Set(a), Self::Set(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => {
                a.bean_type() == b.bean_type()
                    && bean::snapshot(a.as_ref()) == bean::snapshot(b.as_ref())
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Null => {}
            Self::Bool(v) => v.hash(state),
            Self::Char(v) => v.hash(state),
            Self::I8(v) => v.hash(state),
            Self::I16(v) => v.hash(state),
            Self::I32(v) => v.hash(state),
            Self::I64(v) => v.hash(state),
            Self::I128(v) => v.hash(state),
            Self::U8(v) => v.hash(state),
            Self::U16(v) => v.hash(state),
            Self::U32(v) => v.hash(state),
            Self::U64(v) => v.hash(state),
            Self::U128(v) => v.hash(state),
            Self::F32(v) => v.to_bits().hash(state),
            Self::F64(v) => v.to_bits().hash(state),
            Self::String(v) => v.hash(state),
            Self::Bytes(v) => v.as_ref().hash(state),
            Self::ByteBuffer(v) => v.as_ref().hash(state),
            Self::Enum(ty, name) => {
                ty.name().hash(state);
                name.hash(state);
            }
            Self::List(v) => v.hash(state),
            // Sets and maps compare regardless of insertion order.
            Self::Set(v) => unordered_hash(v.iter()).hash(state),
            Self::Map(v) => unordered_hash(v.iter()).hash(state),
            Self::Object(bean) => {
                bean.bean_type().hash(state);
                bean::snapshot(bean.as_ref()).hash(state);
            }
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Char(a), Self::Char(b)) => a.cmp(b),
            (Self::I8(a), Self::I8(b)) => a.cmp(b),
            (Self::I16(a), Self::I16(b)) => a.cmp(b),
            (Self::I32(a), Self::I32(b)) => a.cmp(b),
            (Self::I64(a), Self::I64(b)) => a.cmp(b),
            (Self::I128(a), Self::I128(b)) => a.cmp(b),
            (Self::U8(a), Self::U8(b)) => a.cmp(b),
            (Self::U16(a), Self::U16(b)) => a.cmp(b),
            (Self::U32(a), Self::U32(b)) => a.cmp(b),
            (Self::U64(a), Self::U64(b)) => a.cmp(b),
            (Self::U128(a), Self::U128(b)) => a.cmp(b),
            (Self::F32(a), Self::F32(b)) => a.total_cmp(b),
            (Self::F64(a), Self::F64(b)) => a.total_cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::Bytes(a), Self::Bytes(b)) => a.as_ref().cmp(b.as_ref()),
            (Self::ByteBuffer(a), Self::ByteBuffer(b)) => a.cmp(b),
            (Self::Enum(ta, a), Self::Enum(tb, b)) => ta
                .name()
                .cmp(tb.name())
                .then_with(|| ta.ordinal(a).cmp(&tb.ordinal(b)))
                .then_with(|| a.cmp(b)),
            (Self::List(a), Self::List(b)) => a.cmp(b),
            (Self::Set(a), Self::Set(b)) => sorted(a.iter()).cmp(&sorted(b.iter())),
            (Self::Map(a), Self::Map(b)) => sorted_entries(a).cmp(&sorted_entries(b)),
            (Self::Object(a), Self::Object(b)) => a
                .bean_type()
                .to_string()
                .cmp(&b.bean_type().to_string())
                .then_with(|| bean::snapshot(a.as_ref()).cmp(&bean::snapshot(b.as_ref()))),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::I128(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::U128(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Bytes(v) => write!(f, "{:?}", v.as_ref()),
            Self::ByteBuffer(v) => write!(f, "{:?}", v.as_ref()),
            Self::Enum(_, name) => f.write_str(name),
            Self::List(items) => f.debug_list().entries(items.iter().map(Shown)).finish(),
            Self::Set(items) => f.debug_set().entries(items.iter().map(Shown)).finish(),
            Self::Map(entries) => f
                .debug_map()
                .entries(entries.iter().map(|(k, v)| (Shown(k), Shown(v))))
                .finish(),
            Self::Object(bean) => {
                let mut map = f.debug_map();
                for (name, value) in bean::snapshot(bean.as_ref()) {
                    map.entry(&name, &Shown(&value));
                }
                map.finish()
            }
        }
    }
}

/// Debug adapter that prints nested values with their Display form.
struct Shown<'a>(&'a Value);

impl fmt::Debug for Shown<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.0, f)
    }
}

// Conversion traits
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<char> for Value {
    fn from(v: char) -> Self {
        Self::Char(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Self::I8(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Self::I16(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<i128> for Value {
    fn from(v: i128) -> Self {
        Self::I128(v)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<u16> for Value {
    fn from(v: u16) -> Self {
        Self::U16(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::U64(v)
    }
}

impl From<u128> for Value {
    fn from(v: u128) -> Self {
        Self::U128(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Bytes> for Value {
    fn from(v: Bytes) -> Self {
        Self::ByteBuffer(v)
    }
}

impl From<BytesMut> for Value {
    fn from(v: BytesMut) -> Self {
        Self::Bytes(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl<K: Into<Value>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_primitive_values() {
        let v = Value::from(42i32);
        assert_eq!(v.as_i32(), Some(42));
        assert_eq!(v.as_i64(), None);
        assert_eq!(v.runtime_type(), Type::I32);

        let v = Value::from(std::f64::consts::PI);
        assert_eq!(v.as_f64(), Some(std::f64::consts::PI));

        let v = Value::from("hello");
        assert_eq!(v.as_str(), Some("hello"));
        assert!(Value::default().is_null());
    }

    #[test]
    fn test_float_identity_by_bits() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert_ne!(Value::F64(0.0), Value::F64(-0.0));
        assert!(Value::F64(-0.0) < Value::F64(0.0));

        let mut seen = HashSet::new();
        assert!(seen.insert(Value::F32(1.5)));
        assert!(!seen.insert(Value::F32(1.5)));
    }

    #[test]
    fn test_map_equality_ignores_order() {
        let a: Value = [("x", 1i32), ("y", 2)].into_iter().collect();
        let b: Value = [("y", 2i32), ("x", 1)].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);

        let mut seen = HashSet::new();
        seen.insert(a);
        assert!(seen.contains(&b));
        assert_eq!(b.get("x"), Some(&Value::I32(1)));
    }

    #[test]
    fn test_runtime_type_of_containers() {
        let ints = Value::from(vec![1i32, 2, 3]);
        assert_eq!(ints.runtime_type(), Type::list(Type::I32));

        let mixed = Value::List(vec![Value::from(1i32), Value::from("a")]);
        assert_eq!(mixed.runtime_type(), Type::list(Type::Any));
        assert_eq!(Value::List(Vec::new()).runtime_type(), Type::list(Type::Any));

        let map: Value = [("k", 1u8)].into_iter().collect();
        assert_eq!(
            map.runtime_type(),
            Type::map_of(MapKind::Ordered, Type::String, Type::U8)
        );
        assert!(ints.is_composite());
        assert!(!Value::from(1i32).is_composite());
    }

    #[test]
    fn test_ordering_across_variants() {
        let mut values = vec![
            Value::from("b"),
            Value::from(3i32),
            Value::Null,
            Value::from("a"),
            Value::from(1i32),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::from(1i32),
                Value::from(3i32),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn test_enum_value() {
        let color = EnumType::new("Color", ["RED", "GREEN"]);
        let v = Value::enum_variant(&color, "GREEN").expect("variant");
        assert_eq!(v.as_variant(), Some("GREEN"));
        assert_eq!(v.to_string(), "GREEN");
        assert!(Value::enum_variant(&color, "BLUE").is_none());
        assert!(Value::enum_variant(&color, "RED").expect("variant") < v);
    }

    #[test]
    fn test_display() {
        let v = Value::List(vec![Value::from(1i32), Value::from("a")]);
        assert_eq!(v.to_string(), "[1, a]");
        assert_eq!(Value::from(None::<i32>).to_string(), "null");
    }
}
