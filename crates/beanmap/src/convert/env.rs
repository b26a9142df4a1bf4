// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::Convert;
use crate::bean::Instantiate;
use crate::descriptor::TypeDescriptor;
use crate::error::{Error, Result};
use crate::options::{ConversionOptions, ReusePolicy};
use crate::resolver::Resolve;
use crate::types::Type;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Collaborators and options of one conversion or copy.
///
/// Cheap to clone; every nested conversion gets a copy one level deeper.
#[derive(Clone)]
pub struct Env {
    options: Arc<ConversionOptions>,
    resolver: Arc<dyn Resolve>,
    converter: Arc<dyn Convert>,
    instantiator: Arc<dyn Instantiate>,
    depth: usize,
}

impl Env {
    /// Environment at depth zero. Resolver and converter overrides in
    /// `options` take precedence over the given ones.
    pub fn new(
        options: Arc<ConversionOptions>,
        resolver: Arc<dyn Resolve>,
        converter: Arc<dyn Convert>,
        instantiator: Arc<dyn Instantiate>,
    ) -> Self {
        let resolver = options.resolver.clone().unwrap_or(resolver);
        let converter = options.converter.clone().unwrap_or(converter);
        Self {
            options,
            resolver,
            converter,
            instantiator,
            depth: 0,
        }
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn resolver(&self) -> &Arc<dyn Resolve> {
        &self.resolver
    }

    pub fn converter(&self) -> &Arc<dyn Convert> {
        &self.converter
    }

    pub fn instantiator(&self) -> &Arc<dyn Instantiate> {
        &self.instantiator
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Convert `value` from `src` to `dst`, one level deeper.
    pub fn map(&self, value: Value, src: &Type, dst: &Type) -> Result<Value> {
        let next = self.descend()?;
        next.converter.convert(value, src, dst, &next)
    }

    /// Structural metadata of `ty`.
    pub fn resolve(&self, ty: &Type) -> Arc<TypeDescriptor> {
        self.resolver.resolve(ty)
    }

    /// May byte buffers be shared between source and result?
    pub fn share_buffers(&self) -> bool {
        self.options.reuse_policy != ReusePolicy::NoReuse && !self.options.deep_copy
    }

    /// May `value` be returned as is under the current options?
    pub(crate) fn may_reuse(&self, value: &Value) -> bool {
        self.options.reuse_policy != ReusePolicy::NoReuse
            && !(self.options.deep_copy && value.is_composite())
    }

    fn descend(&self) -> Result<Self> {
        if self.depth >= self.options.max_depth {
            log::debug!("[mapper] depth limit {} reached", self.options.max_depth);
            return Err(Error::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        let mut next = self.clone();
        next.depth += 1;
        Ok(next)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("options", &self.options)
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
