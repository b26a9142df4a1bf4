// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default resolution handlers.

use super::ResolveContext;
use crate::chain::{Flow, Handler};
use crate::descriptor::{MethodDescriptor, PropertyDescriptor};

/// Stops resolution of anything that is not a struct type.
#[derive(Debug, Default)]
pub struct AtomicTypeGuard;

impl Handler<ResolveContext, ()> for AtomicTypeGuard {
    fn name(&self) -> &str {
        "atomic-type-guard"
    }

    fn handle(&self, ctx: &mut ResolveContext) -> Flow<()> {
        if ctx.struct_type().is_some() {
            Flow::Continue
        } else {
            Flow::Break
        }
    }
}

/// Claims the explicit accessor pairs.
#[derive(Debug, Default)]
pub struct AccessorHandler;

impl Handler<ResolveContext, ()> for AccessorHandler {
    fn name(&self) -> &str {
        "accessors"
    }

    fn handle(&self, ctx: &mut ResolveContext) -> Flow<()> {
        let Some(st) = ctx.struct_type().cloned() else {
            return Flow::Continue;
        };
        let bindings = st.bindings();
        let provider = ctx.provider().clone();
        for spec in provider.accessors(&st) {
            if let Some(property) = PropertyDescriptor::from_spec(&spec, &bindings) {
                ctx.claim(property);
            }
        }
        Flow::Continue
    }
}

/// Claims the declared fields not already claimed by an accessor.
#[derive(Debug, Default)]
pub struct FieldHandler;

impl Handler<ResolveContext, ()> for FieldHandler {
    fn name(&self) -> &str {
        "fields"
    }

    fn handle(&self, ctx: &mut ResolveContext) -> Flow<()> {
        let Some(st) = ctx.struct_type().cloned() else {
            return Flow::Continue;
        };
        let bindings = st.bindings();
        let provider = ctx.provider().clone();
        for spec in provider.fields(&st) {
            if let Some(property) = PropertyDescriptor::from_spec(&spec, &bindings) {
                ctx.claim(property);
            }
        }
        Flow::Continue
    }
}

/// Collects invocable methods.
#[derive(Debug, Default)]
pub struct MethodHandler;

impl Handler<ResolveContext, ()> for MethodHandler {
    fn name(&self) -> &str {
        "methods"
    }

    fn handle(&self, ctx: &mut ResolveContext) -> Flow<()> {
        let Some(st) = ctx.struct_type().cloned() else {
            return Flow::Continue;
        };
        let bindings = st.bindings();
        let provider = ctx.provider().clone();
        for spec in provider.methods(&st) {
            ctx.add_method(MethodDescriptor::from_spec(&spec, &bindings));
        }
        Flow::Continue
    }
}
