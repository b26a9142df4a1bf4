// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Conversion and copy options.

use crate::convert::{Charset, Convert, NumberFormat};
use crate::resolver::Resolve;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Default nesting limit for one conversion.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// When a conversion may return its input instead of building a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReusePolicy {
    /// Always build a new value.
    NoReuse,
    /// Reuse when the target type accepts the source type.
    ReuseIfAssignable,
    /// Reuse only when source and target types are identical.
    #[default]
    ReuseIfEqual,
}

/// Options for a single `convert` or `copy_properties` call.
#[derive(Clone)]
pub struct ConversionOptions {
    /// Resolver used instead of the mapper's own.
    pub resolver: Option<Arc<dyn Resolve>>,
    /// Converter used instead of the mapper's own.
    pub converter: Option<Arc<dyn Convert>>,
    /// Property names (or map keys, by their text form) never copied.
    pub ignored_properties: HashSet<String>,
    /// Skip null source values when copying.
    pub ignore_null: bool,
    /// Abort a copy on the first failing property.
    pub thrown_if_any_fails: bool,
    /// Insert keys missing from a destination map.
    pub put_if_not_contained: bool,
    pub reuse_policy: ReusePolicy,
    /// Rebuild containers and objects even when they could be reused.
    pub deep_copy: bool,
    pub charset: Charset,
    pub number_format: NumberFormat,
    /// Maximum nesting of conversions before failing.
    pub max_depth: usize,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            resolver: None,
            converter: None,
            ignored_properties: HashSet::new(),
            ignore_null: false,
            thrown_if_any_fails: true,
            put_if_not_contained: true,
            reuse_policy: ReusePolicy::default(),
            deep_copy: false,
            charset: Charset::default(),
            number_format: NumberFormat::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ConversionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn Resolve>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn with_converter(mut self, converter: Arc<dyn Convert>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Add a property name to skip.
    pub fn ignore_property(mut self, name: impl Into<String>) -> Self {
        self.ignored_properties.insert(name.into());
        self
    }

    pub fn with_ignore_null(mut self, ignore_null: bool) -> Self {
        self.ignore_null = ignore_null;
        self
    }

    pub fn with_thrown_if_any_fails(mut self, thrown: bool) -> Self {
        self.thrown_if_any_fails = thrown;
        self
    }

    pub fn with_put_if_not_contained(mut self, put: bool) -> Self {
        self.put_if_not_contained = put;
        self
    }

    pub fn with_reuse_policy(mut self, policy: ReusePolicy) -> Self {
        self.reuse_policy = policy;
        self
    }

    pub fn with_deep_copy(mut self, deep_copy: bool) -> Self {
        self.deep_copy = deep_copy;
        self
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_number_format(mut self, format: NumberFormat) -> Self {
        self.number_format = format;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// True if `name` must not be copied.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignored_properties.contains(name)
    }
}

impl fmt::Debug for ConversionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionOptions")
            .field("custom_resolver", &self.resolver.is_some())
            .field("custom_converter", &self.converter.is_some())
            .field("ignored_properties", &self.ignored_properties)
            .field("ignore_null", &self.ignore_null)
            .field("thrown_if_any_fails", &self.thrown_if_any_fails)
            .field("put_if_not_contained", &self.put_if_not_contained)
            .field("reuse_policy", &self.reuse_policy)
            .field("deep_copy", &self.deep_copy)
            .field("charset", &self.charset)
            .field("number_format", &self.number_format)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
