// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use crate::bean::{MethodSpec, PropertySpec};
use crate::types::StructType;

/// Enumerates the members of a struct type.
///
/// This is the only place the engine learns about the shape of user types.
/// Declared types returned here may mention the struct's type parameters;
/// the resolver substitutes them.
pub trait StructuralProvider: Send + Sync {
    /// Explicit accessor pairs.
    fn accessors(&self, ty: &StructType) -> Vec<PropertySpec>;

    /// Declared fields.
    fn fields(&self, ty: &StructType) -> Vec<PropertySpec>;

    /// Invocable methods.
    fn methods(&self, ty: &StructType) -> Vec<MethodSpec>;
}

/// Reads members from the [`BeanSchema`](crate::bean::BeanSchema) attached
/// to the type.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaProvider;

impl StructuralProvider for SchemaProvider {
    fn accessors(&self, ty: &StructType) -> Vec<PropertySpec> {
        ty.schema().accessors.clone()
    }

    fn fields(&self, ty: &StructType) -> Vec<PropertySpec> {
        ty.schema().fields.clone()
    }

    fn methods(&self, ty: &StructType) -> Vec<MethodSpec> {
        ty.schema().methods.clone()
    }
}
