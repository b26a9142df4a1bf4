// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::number::Number;
use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::error::Result;
use crate::types::PrimitiveKind;
use crate::value::Value;

/// Converts to `bool`.
///
/// Numbers are `true` exactly when they equal one and text is `true` when
/// it reads "true" in any case. Null maps to `false`.
#[derive(Debug, Default)]
pub struct BooleanHandler;

impl Handler<MappingContext, Result<Value>> for BooleanHandler {
    fn name(&self) -> &str {
        "boolean"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        if ctx.dst.primitive() != Some(PrimitiveKind::Bool) {
            return Flow::Continue;
        }
        let result = match &ctx.value {
            Value::Null => false,
            Value::Bool(v) => *v,
            Value::String(text) => text.trim().eq_ignore_ascii_case("true"),
            other => match Number::of(other) {
                Some(number) => number.is_one(),
                None => return Flow::Continue,
            },
        };
        Flow::Value(Ok(Value::Bool(result)))
    }
}
