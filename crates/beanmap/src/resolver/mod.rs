// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural resolution.
//!
//! [`ChainResolver`] turns a [`Type`] into a [`TypeDescriptor`] by running a
//! [`HandlerChain`] over a [`ResolveContext`]. The default chain is:
//!
//! 1. [`AtomicTypeGuard`]: non-struct types stop here (empty descriptor)
//! 2. [`AccessorHandler`]: explicit accessor pairs
//! 3. [`FieldHandler`]: declared fields
//! 4. [`MethodHandler`]: methods
//!
//! A property name belongs to the first handler that claims it. Resolution
//! never fails; a type nothing can describe yields an empty descriptor.

mod handlers;
mod provider;

pub use handlers::{AccessorHandler, AtomicTypeGuard, FieldHandler, MethodHandler};
pub use provider::{SchemaProvider, StructuralProvider};

use crate::chain::{Handler, HandlerChain};
use crate::descriptor::{MethodDescriptor, PropertyDescriptor, TypeDescriptor};
use crate::types::{StructType, Type};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Derives structural metadata from a type.
pub trait Resolve: Send + Sync {
    fn resolve(&self, ty: &Type) -> Arc<TypeDescriptor>;
}

/// In-progress resolution state shared by the resolution handlers.
pub struct ResolveContext {
    ty: Type,
    provider: Arc<dyn StructuralProvider>,
    properties: IndexMap<Arc<str>, PropertyDescriptor>,
    methods: Vec<MethodDescriptor>,
}

impl ResolveContext {
    pub fn new(ty: Type, provider: Arc<dyn StructuralProvider>) -> Self {
        Self {
            ty,
            provider,
            properties: IndexMap::new(),
            methods: Vec::new(),
        }
    }

    /// Type being resolved.
    pub fn ty(&self) -> &Type {
        &self.ty
    }

    /// Struct being resolved, if the type is a struct.
    pub fn struct_type(&self) -> Option<&StructType> {
        self.ty.as_struct()
    }

    pub fn provider(&self) -> &Arc<dyn StructuralProvider> {
        &self.provider
    }

    /// Insert `property` unless its name is already claimed.
    ///
    /// Returns `true` if the property was inserted.
    pub fn claim(&mut self, property: PropertyDescriptor) -> bool {
        if self.properties.contains_key(property.name()) {
            return false;
        }
        self.properties.insert(property.name().into(), property);
        true
    }

    /// True if a property called `name` is already claimed.
    pub fn is_claimed(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Record an invocable method.
    pub fn add_method(&mut self, method: MethodDescriptor) {
        self.methods.push(method);
    }

    /// Freeze into an immutable descriptor.
    pub fn into_descriptor(self) -> TypeDescriptor {
        TypeDescriptor::new(self.ty, self.properties, self.methods)
    }
}

impl fmt::Debug for ResolveContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveContext")
            .field("ty", &self.ty)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .field("methods", &self.methods.len())
            .finish_non_exhaustive()
    }
}

/// Resolver running a chain of resolution handlers.
#[derive(Clone)]
pub struct ChainResolver {
    chain: HandlerChain<ResolveContext, ()>,
    provider: Arc<dyn StructuralProvider>,
}

impl ChainResolver {
    /// Default chain over the schema provider.
    pub fn new() -> Self {
        Self::with_provider(Arc::new(SchemaProvider))
    }

    /// Default chain over a custom structural provider.
    pub fn with_provider(provider: Arc<dyn StructuralProvider>) -> Self {
        Self {
            chain: Self::default_chain(),
            provider,
        }
    }

    /// The four default handlers, in order.
    pub fn default_chain() -> HandlerChain<ResolveContext, ()> {
        let handlers: Vec<Arc<dyn Handler<ResolveContext, ()>>> = vec![
            Arc::new(AtomicTypeGuard),
            Arc::new(AccessorHandler),
            Arc::new(FieldHandler),
            Arc::new(MethodHandler),
        ];
        HandlerChain::new(handlers)
    }

    /// Same provider, different chain.
    #[must_use]
    pub fn with_chain(&self, chain: HandlerChain<ResolveContext, ()>) -> Self {
        Self {
            chain,
            provider: self.provider.clone(),
        }
    }

    pub fn chain(&self) -> &HandlerChain<ResolveContext, ()> {
        &self.chain
    }
}

impl Default for ChainResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChainResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainResolver")
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl Resolve for ChainResolver {
    fn resolve(&self, ty: &Type) -> Arc<TypeDescriptor> {
        let mut ctx = ResolveContext::new(ty.clone(), self.provider.clone());
        let completed = self.chain.resolve(&mut ctx);
        let descriptor = ctx.into_descriptor();
        log::debug!(
            "[resolver] {} -> {} properties, {} methods{}",
            ty,
            descriptor.properties().count(),
            descriptor.methods().len(),
            if completed { "" } else { " (stopped)" }
        );
        Arc::new(descriptor)
    }
}
