// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::error::Result;
use crate::types::Type;
use crate::value::Value;

/// Converts to enums by exact variant name.
///
/// The source may be another enum, a string or a char.
#[derive(Debug, Default)]
pub struct EnumHandler;

impl Handler<MappingContext, Result<Value>> for EnumHandler {
    fn name(&self) -> &str {
        "enum"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        let Type::Enum(target) = &ctx.dst else {
            return Flow::Continue;
        };
        let name = match &ctx.value {
            Value::Enum(_, variant) => variant.to_string(),
            Value::String(text) => text.clone(),
            Value::Char(ch) => ch.to_string(),
            _ => return Flow::Continue,
        };
        match Value::enum_variant(target, &name) {
            Some(value) => Flow::Value(Ok(value)),
            None => {
                log::trace!("[mapper] {} has no variant {:?}", target.name(), name);
                Flow::Continue
            }
        }
    }
}
