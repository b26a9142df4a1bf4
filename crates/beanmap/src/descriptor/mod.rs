// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for structural metadata.
//!
//! A [`TypeDescriptor`] is what the resolver produces for one [`Type`]: its
//! named properties in discovery order and its invocable methods. It is
//! immutable once built and shared through the metadata cache.

use crate::bean::{Annotation, Bean, Getter, Invoker, MethodSpec, PropertySpec, Setter};
use crate::error::{AccessError, Result};
use crate::types::Type;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// One named, typed member of a [`TypeDescriptor`].
///
/// Always readable, writeable or both.
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: Arc<str>,
    declared_type: Type,
    generic_type: Type,
    getter: Option<Getter>,
    setter: Option<Setter>,
    annotations: Vec<Annotation>,
}

impl PropertyDescriptor {
    /// Describe a schema property as seen from a type with `bindings`.
    ///
    /// Returns `None` for a `PropertySpec` with neither getter nor setter.
    pub fn from_spec(spec: &PropertySpec, bindings: &[(Arc<str>, Type)]) -> Option<Self> {
        if spec.getter.is_none() && spec.setter.is_none() {
            return None;
        }
        Some(Self {
            name: spec.name.clone(),
            declared_type: spec.ty.erasure(),
            generic_type: spec.ty.substitute(bindings),
            getter: spec.getter.clone(),
            setter: spec.setter.clone(),
            annotations: spec.annotations.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw type, type arguments erased.
    pub fn declared_type(&self) -> &Type {
        &self.declared_type
    }

    /// Exact type with the owner's type arguments substituted.
    pub fn generic_type(&self) -> &Type {
        &self.generic_type
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotation by name.
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| &*a.name == name)
    }

    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn is_writeable(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the property from `bean`.
    pub fn read(&self, bean: &dyn Bean) -> std::result::Result<Value, AccessError> {
        let getter = self
            .getter
            .as_ref()
            .ok_or_else(|| AccessError::NotReadable(self.name.clone()))?;
        getter(bean)
    }

    /// Write `value` (already of the property's type) to `bean`.
    pub fn write(&self, bean: &mut dyn Bean, value: Value) -> std::result::Result<(), AccessError> {
        let setter = self
            .setter
            .as_ref()
            .ok_or_else(|| AccessError::NotWriteable(self.name.clone()))?;
        setter(bean, value)
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("declared_type", &self.declared_type)
            .field("generic_type", &self.generic_type)
            .field("readable", &self.is_readable())
            .field("writeable", &self.is_writeable())
            .finish()
    }
}

/// An invocable method of a [`TypeDescriptor`].
#[derive(Clone)]
pub struct MethodDescriptor {
    name: Arc<str>,
    params: Vec<Type>,
    returns: Type,
    invoker: Invoker,
}

impl MethodDescriptor {
    /// Describe a schema method as seen from a type with `bindings`.
    pub fn from_spec(spec: &MethodSpec, bindings: &[(Arc<str>, Type)]) -> Self {
        Self {
            name: spec.name.clone(),
            params: spec.params.iter().map(|p| p.substitute(bindings)).collect(),
            returns: spec.returns.substitute(bindings),
            invoker: spec.invoker.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Type] {
        &self.params
    }

    pub fn returns(&self) -> &Type {
        &self.returns
    }

    /// Call the method on `bean`.
    pub fn invoke(&self, bean: &dyn Bean, args: Vec<Value>) -> Result<Value> {
        (self.invoker)(bean, args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish()
    }
}

/// Immutable structural description of a type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    ty: Type,
    properties: IndexMap<Arc<str>, PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    pub fn new(
        ty: Type,
        properties: IndexMap<Arc<str>, PropertyDescriptor>,
        methods: Vec<MethodDescriptor>,
    ) -> Self {
        Self {
            ty,
            properties,
            methods,
        }
    }

    /// Descriptor without properties or methods (atomic types).
    pub fn empty(ty: Type) -> Self {
        Self::new(ty, IndexMap::new(), Vec::new())
    }

    /// Described type.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Properties in discovery order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.values()
    }

    /// Property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Property names in discovery order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|name| name.as_ref())
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// First method called `name`.
    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// True if the type has no properties and no methods.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.methods.is_empty()
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for TypeDescriptor {}
