// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{CollectionKind, MapKind, PrimitiveKind, Type};
use crate::value::Value;
use bytes::{Bytes, BytesMut};
use indexmap::{IndexMap, IndexSet};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// Rust types with a static reified [`Type`].
///
/// Implemented for primitives, text, byte buffers and std/indexmap
/// containers; `#[derive(Bean)]` implements it for structs and enums.
pub trait Typed {
    fn type_of() -> Type;
}

macro_rules! impl_primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Typed for $ty {
                fn type_of() -> Type {
                    Type::Primitive(PrimitiveKind::$kind)
                }
            }
        )*
    };
}

impl_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    f32 => F32,
    f64 => F64,
}

impl Typed for String {
    fn type_of() -> Type {
        Type::String
    }
}

impl Typed for BytesMut {
    fn type_of() -> Type {
        Type::Bytes
    }
}

impl Typed for Bytes {
    fn type_of() -> Type {
        Type::ByteBuffer
    }
}

impl Typed for Value {
    fn type_of() -> Type {
        Type::Any
    }
}

/// `Option<T>` is described by `T`; absence is carried by `Value::Null`.
impl<T: Typed> Typed for Option<T> {
    fn type_of() -> Type {
        T::type_of()
    }
}

impl<T: Typed> Typed for Box<T> {
    fn type_of() -> Type {
        T::type_of()
    }
}

macro_rules! impl_collection {
    ($($container:ident => $kind:ident),* $(,)?) => {
        $(
            impl<T: Typed> Typed for $container<T> {
                fn type_of() -> Type {
                    Type::Collection(CollectionKind::$kind, Box::new(T::type_of()))
                }
            }
        )*
    };
}

impl_collection! {
    Vec => List,
    VecDeque => Deque,
    HashSet => Set,
    IndexSet => Set,
    BTreeSet => SortedSet,
}

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_of() -> Type {
        Type::array(T::type_of(), N)
    }
}

macro_rules! impl_map {
    ($($container:ident => $kind:ident),* $(,)?) => {
        $(
            impl<K: Typed, V: Typed> Typed for $container<K, V> {
                fn type_of() -> Type {
                    Type::map_of(MapKind::$kind, K::type_of(), V::type_of())
                }
            }
        )*
    };
}

impl_map! {
    HashMap => Hash,
    IndexMap => Ordered,
    BTreeMap => Sorted,
}
