// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::element_failure;
use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::error::Result;
use crate::types::{MapKind, Type};
use crate::value::Value;
use indexmap::IndexMap;

/// Rebuilds map values with converted keys and values.
///
/// Entry order is kept, except for sorted targets which are ordered by
/// converted key.
#[derive(Debug, Default)]
pub struct MapHandler;

impl Handler<MappingContext, Result<Value>> for MapHandler {
    fn name(&self) -> &str {
        "map"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        let Type::Map(kind, key_ty, value_ty) = &ctx.dst else {
            return Flow::Continue;
        };
        let (kind, key_ty, value_ty) = (kind.canonical(), (**key_ty).clone(), (**value_ty).clone());
        let entries = match ctx.take_value() {
            Value::Map(entries) => entries,
            other => {
                ctx.value = other;
                return Flow::Continue;
            }
        };

        let (src_key, src_value) = ctx.src.key_value_types().unzip();
        let mut converted = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let key_src = MappingContext::source_part(src_key.clone(), &key);
            let value_src = MappingContext::source_part(src_value.clone(), &value);
            let key = match ctx.env.map(key, &key_src, &key_ty) {
                Ok(key) => key,
                Err(err) => return element_failure(err),
            };
            let value = match ctx.env.map(value, &value_src, &value_ty) {
                Ok(value) => value,
                Err(err) => return element_failure(err),
            };
            converted.insert(key, value);
        }
        if kind == MapKind::Sorted {
            converted.sort_keys();
        }
        Flow::Value(Ok(Value::Map(converted)))
    }
}
