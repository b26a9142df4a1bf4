// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! [`BeanMapper`]: resolver, converter and copier behind one handle.
//!
//! A mapper owns its collaborators; there is no process-wide default.
//! Create one at startup and share it (it is `Send + Sync`).
//!
//! ```ignore
//! let mapper = BeanMapper::new();
//! let dto: PersonDto = mapper.convert_to(person)?;
//! ```

use crate::bean::{Bean, Instantiate, SchemaInstantiator};
use crate::cache::{CachedResolver, MetadataCache};
use crate::convert::{Convert, Env, Mapper};
use crate::copy::{self, Source, Target};
use crate::descriptor::TypeDescriptor;
use crate::error::{AccessError, Error, Result};
use crate::options::ConversionOptions;
use crate::resolver::{ChainResolver, Resolve};
use crate::types::{Type, Typed};
use crate::value::{FromValue, IntoValue, Value};
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::Arc;

/// Entry point for resolving, converting and copying.
pub struct BeanMapper {
    resolver: Arc<CachedResolver>,
    converter: Arc<dyn Convert>,
    instantiator: Arc<dyn Instantiate>,
    /// Options used when a call does not pass its own. Swapped atomically.
    defaults: ArcSwap<ConversionOptions>,
}

impl BeanMapper {
    /// Mapper with the default resolver chain, mapping chain and
    /// schema-driven instantiation, caching up to
    /// [`DEFAULT_CAPACITY`](crate::cache::DEFAULT_CAPACITY) descriptors.
    pub fn new() -> Self {
        let cache = Arc::new(MetadataCache::default());
        Self {
            resolver: Arc::new(CachedResolver::new(Arc::new(ChainResolver::new()), cache)),
            converter: Arc::new(Mapper::new()),
            instantiator: Arc::new(SchemaInstantiator),
            defaults: ArcSwap::from_pointee(ConversionOptions::default()),
        }
    }

    /// Replace the resolver. Cached descriptors are dropped.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        let cache = self.resolver.cache().clone();
        cache.clear();
        self.resolver = Arc::new(CachedResolver::new(resolver, cache));
        self
    }

    #[must_use]
    pub fn with_converter(mut self, converter: Arc<dyn Convert>) -> Self {
        self.converter = converter;
        self
    }

    #[must_use]
    pub fn with_instantiator(mut self, instantiator: Arc<dyn Instantiate>) -> Self {
        self.instantiator = instantiator;
        self
    }

    /// Use a fresh metadata cache holding up to `capacity` descriptors.
    #[must_use]
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        let inner = self.resolver.inner().clone();
        self.resolver = Arc::new(CachedResolver::new(
            inner,
            Arc::new(MetadataCache::new(capacity)),
        ));
        self
    }

    /// Metadata cache in use.
    pub fn cache(&self) -> &Arc<MetadataCache> {
        self.resolver.cache()
    }

    /// Current default options.
    pub fn default_options(&self) -> Arc<ConversionOptions> {
        self.defaults.load_full()
    }

    /// Replace the default options for subsequent calls.
    pub fn set_default_options(&self, options: ConversionOptions) {
        self.defaults.store(Arc::new(options));
    }

    /// Environment of one call with `options`.
    pub fn env(&self, options: impl Into<Arc<ConversionOptions>>) -> Env {
        Env::new(
            options.into(),
            self.resolver.clone(),
            self.converter.clone(),
            self.instantiator.clone(),
        )
    }

    /// Structural metadata of `ty` (cached).
    pub fn resolve(&self, ty: &Type) -> Arc<TypeDescriptor> {
        self.resolver.resolve(ty)
    }

    /// Convert `value` from `src` to `dst` with the default options.
    pub fn convert(&self, value: Value, src: &Type, dst: &Type) -> Result<Value> {
        self.convert_with(value, src, dst, self.default_options())
    }

    /// Convert `value` from `src` to `dst` with `options`.
    pub fn convert_with(
        &self,
        value: Value,
        src: &Type,
        dst: &Type,
        options: impl Into<Arc<ConversionOptions>>,
    ) -> Result<Value> {
        let env = self.env(options);
        env.converter().convert(value, src, dst, &env)
    }

    /// Convert a typed value into another Rust type.
    pub fn convert_to<S, T>(&self, source: S) -> Result<T>
    where
        S: IntoValue + Typed,
        T: FromValue + Typed,
    {
        let value = self.convert(source.into_value(), &S::type_of(), &T::type_of())?;
        Ok(T::from_value(value)?)
    }

    /// Convert a typed value to a dynamic value of type `dst`.
    pub fn to_value<S>(&self, source: S, dst: &Type) -> Result<Value>
    where
        S: IntoValue + Typed,
    {
        self.convert(source.into_value(), &S::type_of(), dst)
    }

    /// Convert a dynamic value (described by its runtime type) to `T`.
    pub fn from_value<T>(&self, value: Value) -> Result<T>
    where
        T: FromValue + Typed,
    {
        let src = value.runtime_type();
        let value = self.convert(value, &src, &T::type_of())?;
        Ok(T::from_value(value)?)
    }

    /// Copy properties between two map or object values, with the default
    /// options.
    pub fn copy_properties(
        &self,
        src: &Value,
        src_ty: &Type,
        dst: &mut Value,
        dst_ty: &Type,
    ) -> Result<()> {
        self.copy_properties_with(src, src_ty, dst, dst_ty, self.default_options())
    }

    /// Copy properties between two map or object values.
    pub fn copy_properties_with(
        &self,
        src: &Value,
        src_ty: &Type,
        dst: &mut Value,
        dst_ty: &Type,
        options: impl Into<Arc<ConversionOptions>>,
    ) -> Result<()> {
        let source = Source::of(src).ok_or_else(|| not_copyable(src))?;
        let target = match Target::of(dst) {
            Some(target) => target,
            None => return Err(not_copyable(dst)),
        };
        copy::copy_properties(source, src_ty, target, dst_ty, &self.env(options))
    }

    /// Copy same-named properties from one bean into another.
    pub fn copy_bean<S, D>(&self, src: &S, dst: &mut D) -> Result<()>
    where
        S: Bean,
        D: Bean,
    {
        let src_ty = src.bean_type();
        let dst_ty = dst.bean_type();
        copy::copy_properties(
            Source::Bean(src),
            &src_ty,
            Target::Bean(dst),
            &dst_ty,
            &self.env(self.default_options()),
        )
    }
}

fn not_copyable(value: &Value) -> Error {
    AccessError::mismatch("map or object", value.runtime_type().to_string()).into()
}

impl Default for BeanMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BeanMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanMapper")
            .field("cache", self.resolver.cache())
            .field("defaults", &self.default_options())
            .finish_non_exhaustive()
    }
}
