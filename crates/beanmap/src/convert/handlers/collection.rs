// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::element_failure;
use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::error::Result;
use crate::types::{CollectionKind, Type};
use crate::value::Value;
use indexmap::IndexSet;

/// Rebuilds iterable values as collections or arrays.
///
/// Every element is converted from the source element type to the target
/// element type. One failing element abandons the whole container.
#[derive(Debug, Default)]
pub struct CollectionHandler;

impl Handler<MappingContext, Result<Value>> for CollectionHandler {
    fn name(&self) -> &str {
        "collection"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        let (kind, element, length) = match &ctx.dst {
            Type::Collection(kind, element) => (kind.canonical(), (**element).clone(), None),
            Type::Array(element, length) => (CollectionKind::List, (**element).clone(), *length),
            _ => return Flow::Continue,
        };
        let items: Vec<Value> = match ctx.take_value() {
            Value::List(items) => items,
            Value::Set(items) => items.into_iter().collect(),
            Value::Bytes(buf) => buf.iter().copied().map(Value::U8).collect(),
            Value::ByteBuffer(buf) => buf.iter().copied().map(Value::U8).collect(),
            other => {
                ctx.value = other;
                return Flow::Continue;
            }
        };
        if length.is_some_and(|len| len != items.len()) {
            log::trace!(
                "[mapper] array length {} does not fit {}",
                items.len(),
                ctx.dst
            );
            return Flow::Break;
        }

        let declared = ctx.src.element_type();
        let mut converted = Vec::with_capacity(items.len());
        for item in items {
            let src = MappingContext::source_part(declared.clone(), &item);
            match ctx.env.map(item, &src, &element) {
                Ok(value) => converted.push(value),
                Err(err) => return element_failure(err),
            }
        }

        let result = match kind {
            CollectionKind::Set => Value::Set(converted.into_iter().collect::<IndexSet<_>>()),
            CollectionKind::SortedSet => {
                converted.sort();
                converted.dedup();
                Value::Set(converted.into_iter().collect())
            }
            _ => Value::List(converted),
        };
        Flow::Value(Ok(result))
    }
}
