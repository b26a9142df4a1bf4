// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{Bean, Construction, Finisher};
use crate::error::AccessError;
use crate::types::Type;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;

/// A fresh target produced by an [`Instantiate`] capability.
pub enum Instance {
    /// Ready to be populated in place.
    Ready(Value),
    /// A builder to populate, then finish into the value.
    Builder {
        builder: Box<dyn Bean>,
        finish: Finisher,
    },
}

impl Instance {
    /// The value being populated (the instance itself or its builder).
    pub fn target(&mut self) -> TargetRef<'_> {
        match self {
            Self::Ready(value) => TargetRef::Value(value),
            Self::Builder { builder, .. } => TargetRef::Bean(builder.as_mut()),
        }
    }

    /// Turn the populated target into the final value.
    pub fn finish(self) -> Result<Value, AccessError> {
        match self {
            Self::Ready(value) => Ok(value),
            Self::Builder { builder, finish } => finish(builder).map(Value::Object),
        }
    }
}

/// Mutable view on what an [`Instance`] populates.
pub enum TargetRef<'a> {
    Value(&'a mut Value),
    Bean(&'a mut dyn Bean),
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Builder { builder, .. } => f
                .debug_struct("Builder")
                .field("builder", builder)
                .finish_non_exhaustive(),
        }
    }
}

/// Capability creating empty instances of a target type.
pub trait Instantiate: Send + Sync {
    /// A fresh instance of `ty`, or `None` if the type cannot be created.
    fn instantiate(&self, ty: &Type) -> Option<Instance>;
}

/// Default instantiation: empty maps for map types, and the schema's
/// [`Construction`] for struct types.
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaInstantiator;

impl Instantiate for SchemaInstantiator {
    fn instantiate(&self, ty: &Type) -> Option<Instance> {
        match ty {
            Type::Map(..) => Some(Instance::Ready(Value::Map(IndexMap::new()))),
            Type::Struct(st) => match &st.schema().construction {
                Construction::Unavailable => None,
                Construction::Default(factory) => {
                    Some(Instance::Ready(Value::Object(factory(st))))
                }
                Construction::Builder { builder, finish } => Some(Instance::Builder {
                    builder: builder(st),
                    finish: finish.clone(),
                }),
            },
            _ => None,
        }
    }
}
