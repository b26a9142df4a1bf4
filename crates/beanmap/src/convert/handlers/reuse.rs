// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::error::Result;
use crate::options::ReusePolicy;
use crate::types::Type;
use crate::value::Value;

/// Returns the source value itself when the reuse policy allows it, and
/// settles placeholders.
///
/// - null stays null, except for primitive targets which get their zero
///   value from later handlers
/// - a type variable target stops the chain
/// - a wildcard with a single upper bound is replaced by that bound; other
///   wildcards degrade to `Any`
/// - equal types reuse unless the policy is `NoReuse`
/// - assignable types reuse only under `ReuseIfAssignable`
/// - an `Any` target is mapped to the value's runtime type
#[derive(Debug, Default)]
pub struct ReuseHandler;

impl Handler<MappingContext, Result<Value>> for ReuseHandler {
    fn name(&self) -> &str {
        "reuse"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        if ctx.value.is_null() {
            if ctx.dst.primitive().is_some() {
                return Flow::Continue;
            }
            return Flow::Value(Ok(Value::Null));
        }
        if matches!(ctx.dst, Type::Var(_)) {
            return Flow::Break;
        }

        if let Type::Wildcard { .. } = ctx.src {
            match ctx.src.single_upper_bound().cloned() {
                Some(bound) => {
                    let value = ctx.take_value();
                    return Flow::Value(ctx.env.map(value, &bound, &ctx.dst));
                }
                None => ctx.src = Type::Any,
            }
        }
        if let Type::Wildcard { .. } = ctx.dst {
            match ctx.dst.single_upper_bound().cloned() {
                Some(bound) => {
                    let value = ctx.take_value();
                    return Flow::Value(ctx.env.map(value, &ctx.src, &bound));
                }
                None => ctx.dst = Type::Any,
            }
        }

        let reusable = ctx.env.may_reuse(&ctx.value);
        if ctx.dst == ctx.src {
            if reusable {
                return Flow::Value(Ok(ctx.take_value()));
            }
        } else if ctx.dst.is_assignable_from(&ctx.src)
            && reusable
            && ctx.env.options().reuse_policy == ReusePolicy::ReuseIfAssignable
        {
            return Flow::Value(Ok(ctx.take_value()));
        }

        if ctx.dst.is_any() {
            let runtime = ctx.value.runtime_type();
            if runtime.is_any() {
                // Nothing more specific is known about the value.
                return Flow::Value(Ok(ctx.take_value()));
            }
            let value = ctx.take_value();
            return Flow::Value(ctx.env.map(value, &runtime, &runtime));
        }

        Flow::Continue
    }
}
