// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type-directed conversion.
//!
//! [`Mapper`] converts a [`Value`] from a declared source [`Type`] to a
//! target type by asking a chain of handlers, one per category of target.
//! The first handler producing a result wins:
//!
//! | # | Handler | Targets |
//! |---|---------|---------|
//! | 1 | [`ReuseHandler`] | any (identity, assignability, placeholders) |
//! | 2 | [`NumberHandler`] | numeric primitives |
//! | 3 | [`BooleanHandler`] | `bool` |
//! | 4 | [`TextHandler`] | `String`, `char` |
//! | 5 | [`BytesHandler`] | `Bytes`, `ByteBuffer` |
//! | 6 | [`EnumHandler`] | enums |
//! | 7 | [`CollectionHandler`] | collections and arrays |
//! | 8 | [`MapHandler`] | maps |
//! | 9 | [`BeanHandler`] | structs (and maps from structs) |
//!
//! Nested conversions go back through [`Env::map`], which enforces the
//! configured depth limit.

mod charset;
mod env;
mod handlers;
mod number_format;

pub use charset::Charset;
pub use env::Env;
pub use handlers::{
    BeanHandler, BooleanHandler, BytesHandler, CollectionHandler, EnumHandler, MapHandler,
    NumberHandler, ReuseHandler, TextHandler,
};
pub use number_format::NumberFormat;

use crate::chain::{Handler, HandlerChain};
use crate::error::{Error, Result};
use crate::types::Type;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Converts values between types.
pub trait Convert: Send + Sync {
    /// Convert `value`, declared as `src`, to `dst`.
    fn convert(&self, value: Value, src: &Type, dst: &Type, env: &Env) -> Result<Value>;
}

/// State of one conversion, shared by the mapping handlers.
#[derive(Debug)]
pub struct MappingContext {
    pub value: Value,
    pub src: Type,
    pub dst: Type,
    pub env: Env,
}

impl MappingContext {
    pub fn new(value: Value, src: Type, dst: Type, env: Env) -> Self {
        Self {
            value,
            src,
            dst,
            env,
        }
    }

    /// Move the value out, leaving null behind.
    ///
    /// Only a handler that is about to produce a result may take the value.
    pub fn take_value(&mut self) -> Value {
        std::mem::take(&mut self.value)
    }

    /// Element type of the source: the declared one, or the runtime type of
    /// `element` when the declared one is unknown.
    pub(crate) fn source_part(declared: Option<Type>, element: &Value) -> Type {
        match declared {
            Some(ty) if !ty.is_any() && !ty.is_placeholder() => ty,
            _ => element.runtime_type(),
        }
    }
}

/// Handler type of the mapping chain.
pub type MappingHandler = dyn Handler<MappingContext, Result<Value>>;

/// Converter running a chain of mapping handlers.
#[derive(Clone)]
pub struct Mapper {
    chain: HandlerChain<MappingContext, Result<Value>>,
}

impl Mapper {
    /// Mapper with the nine default handlers.
    pub fn new() -> Self {
        Self {
            chain: Self::default_chain(),
        }
    }

    /// The default handlers, in order.
    pub fn default_chain() -> HandlerChain<MappingContext, Result<Value>> {
        let handlers: Vec<Arc<MappingHandler>> = vec![
            Arc::new(ReuseHandler),
            Arc::new(NumberHandler),
            Arc::new(BooleanHandler),
            Arc::new(TextHandler),
            Arc::new(BytesHandler),
            Arc::new(EnumHandler),
            Arc::new(CollectionHandler),
            Arc::new(MapHandler),
            Arc::new(BeanHandler),
        ];
        HandlerChain::new(handlers)
    }

    /// Mapper over a custom chain.
    pub fn with_chain(chain: HandlerChain<MappingContext, Result<Value>>) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &HandlerChain<MappingContext, Result<Value>> {
        &self.chain
    }
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Mapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapper").field("chain", &self.chain).finish()
    }
}

impl Convert for Mapper {
    fn convert(&self, value: Value, src: &Type, dst: &Type, env: &Env) -> Result<Value> {
        let mut ctx = MappingContext::new(value, src.clone(), dst.clone(), env.clone());
        match self.chain.produce(&mut ctx) {
            Some(result) => result,
            None => {
                log::trace!("[mapper] no handler for {} -> {}", src, dst);
                Err(Error::Conversion {
                    from: src.clone(),
                    to: dst.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests;
