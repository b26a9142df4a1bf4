// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bridges between Rust values and [`Value`].
//!
//! Extraction is strict: the mapper converts a value to the declared type of
//! a property before the setter runs, so a setter only ever has to unwrap
//! the exact variant its field type corresponds to.

use super::Value;
use crate::error::AccessError;
use bytes::{Bytes, BytesMut};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// Trait for converting from [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, AccessError>;
}

/// Trait for converting to [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

fn mismatch(expected: &str, got: &Value) -> AccessError {
    if got.is_null() {
        AccessError::NullValue(expected.to_string())
    } else {
        AccessError::mismatch(expected, got.runtime_type().to_string())
    }
}

// Scalars
macro_rules! impl_scalar {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, AccessError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(mismatch($name, &other)),
                }
            }
        }

        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_scalar!(bool, Bool, "bool");
impl_scalar!(char, Char, "char");
impl_scalar!(i8, I8, "i8");
impl_scalar!(i16, I16, "i16");
impl_scalar!(i32, I32, "i32");
impl_scalar!(i64, I64, "i64");
impl_scalar!(i128, I128, "i128");
impl_scalar!(u8, U8, "u8");
impl_scalar!(u16, U16, "u16");
impl_scalar!(u32, U32, "u32");
impl_scalar!(u64, U64, "u64");
impl_scalar!(u128, U128, "u128");
impl_scalar!(f32, F32, "f32");
impl_scalar!(f64, F64, "f64");
impl_scalar!(String, String, "String");
impl_scalar!(BytesMut, Bytes, "Bytes");
impl_scalar!(Bytes, ByteBuffer, "ByteBuffer");

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: IntoValue> IntoValue for Box<T> {
    fn into_value(self) -> Value {
        (*self).into_value()
    }
}

fn list_items(value: Value, expected: &str) -> Result<Vec<Value>, AccessError> {
    match value {
        Value::List(items) => Ok(items),
        other => Err(mismatch(expected, &other)),
    }
}

fn set_items(value: Value, expected: &str) -> Result<IndexSet<Value>, AccessError> {
    match value {
        Value::Set(items) => Ok(items),
        other => Err(mismatch(expected, &other)),
    }
}

fn map_entries(value: Value, expected: &str) -> Result<IndexMap<Value, Value>, AccessError> {
    match value {
        Value::Map(entries) => Ok(entries),
        other => Err(mismatch(expected, &other)),
    }
}

// Sequences
impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        list_items(value, "List")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        list_items(value, "Deque")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        let items = list_items(value, "array")?;
        if items.len() != N {
            return Err(AccessError::mismatch(
                format!("array of length {N}"),
                format!("array of length {}", items.len()),
            ));
        }
        let items: Vec<T> = items
            .into_iter()
            .map(T::from_value)
            .collect::<Result<_, _>>()?;
        items
            .try_into()
            .map_err(|_| AccessError::mismatch(format!("array of length {N}"), "array"))
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

// Sets
impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        set_items(value, "Set")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: IntoValue> IntoValue for HashSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue + Eq + Hash> FromValue for IndexSet<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        set_items(value, "Set")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: IntoValue> IntoValue for IndexSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> Result<Self, AccessError> {
        set_items(value, "SortedSet")?
            .into_iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

// Maps
macro_rules! impl_map {
    ($map:ident, $name:expr, $($bound:path),+) => {
        impl<K: FromValue $(+ $bound)+, V: FromValue> FromValue for $map<K, V> {
            fn from_value(value: Value) -> Result<Self, AccessError> {
                map_entries(value, $name)?
                    .into_iter()
                    .map(|(k, v)| Ok((K::from_value(k)?, V::from_value(v)?)))
                    .collect()
            }
        }

        impl<K: IntoValue, V: IntoValue> IntoValue for $map<K, V> {
            fn into_value(self) -> Value {
                Value::Map(
                    self.into_iter()
                        .map(|(k, v)| (k.into_value(), v.into_value()))
                        .collect(),
                )
            }
        }
    };
}

impl_map!(HashMap, "HashMap", Eq, Hash);
impl_map!(IndexMap, "OrderedMap", Eq, Hash);
impl_map!(BTreeMap, "SortedMap", Ord);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_extraction() {
        assert_eq!(i32::from_value(Value::I32(7)), Ok(7));
        assert_eq!(
            i32::from_value(Value::I64(7)),
            Err(AccessError::mismatch("i32", "i64"))
        );
        assert_eq!(
            String::from_value(Value::Null),
            Err(AccessError::NullValue("String".into()))
        );
        assert_eq!(Option::<String>::from_value(Value::Null), Ok(None));
        assert_eq!(7u8.into_value(), Value::U8(7));
    }

    #[test]
    fn test_container_extraction() {
        let list = vec![1i32, 2, 3].into_value();
        assert_eq!(Vec::<i32>::from_value(list.clone()), Ok(vec![1, 2, 3]));
        assert_eq!(<[i32; 3]>::from_value(list.clone()), Ok([1, 2, 3]));
        assert!(<[i32; 2]>::from_value(list).is_err());

        let map = BTreeMap::from([("a".to_string(), 1u16)]).into_value();
        let back = HashMap::<String, u16>::from_value(map).expect("map");
        assert_eq!(back.get("a"), Some(&1));

        let set = BTreeSet::from([3i64, 1]).into_value();
        assert!(HashSet::<i64>::from_value(set.clone()).is_ok());
        assert!(Vec::<i64>::from_value(set).is_err());
    }

    #[test]
    fn test_nested_option_in_list() {
        let list = Value::List(vec![Value::I32(1), Value::Null]);
        assert_eq!(
            Vec::<Option<i32>>::from_value(list),
            Ok(vec![Some(1), None])
        );
    }
}
