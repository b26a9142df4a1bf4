// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::bean::Instance;
use crate::chain::{Flow, Handler};
use crate::convert::MappingContext;
use crate::copy::{self, Source, Target};
use crate::error::{Error, Result};
use crate::value::Value;

/// Builds a fresh target object (or map) and copies the source's
/// properties into it.
///
/// The target comes from the environment's instantiation capability; a
/// builder instance is populated and then finished. Sources must be maps
/// or objects.
#[derive(Debug, Default)]
pub struct BeanHandler;

impl Handler<MappingContext, Result<Value>> for BeanHandler {
    fn name(&self) -> &str {
        "bean"
    }

    fn handle(&self, ctx: &mut MappingContext) -> Flow<Result<Value>> {
        if !(ctx.dst.is_struct() || ctx.dst.is_map()) {
            return Flow::Continue;
        }
        let Some(source) = Source::of(&ctx.value) else {
            return Flow::Continue;
        };
        let Some(mut instance) = ctx.env.instantiator().instantiate(&ctx.dst) else {
            log::trace!("[mapper] cannot instantiate {}", ctx.dst);
            return Flow::Continue;
        };

        let src_ty = if ctx.src.is_struct() || ctx.src.is_map() {
            ctx.src.clone()
        } else {
            ctx.value.runtime_type()
        };
        // A builder is populated under its own type.
        let target_ty = match &instance {
            Instance::Builder { builder, .. } => builder.bean_type(),
            Instance::Ready(_) => ctx.dst.clone(),
        };
        let Some(target) = Target::from_ref(instance.target()) else {
            return Flow::Continue;
        };
        if let Err(err) = copy::copy_properties(source, &src_ty, target, &target_ty, &ctx.env) {
            return Flow::Value(Err(err));
        }

        Flow::Value(instance.finish().map_err(Error::from))
    }
}
