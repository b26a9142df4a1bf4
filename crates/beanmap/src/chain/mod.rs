// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Ordered handler chains.
//!
//! A [`HandlerChain`] is the dispatch primitive shared by the structural
//! resolver and the mapper. Each [`Handler`] receives the same mutable
//! context and answers with a [`Flow`]:
//!
//! - [`Flow::Continue`]: no opinion, the next handler runs
//! - [`Flow::Value`]: a result was produced
//! - [`Flow::Break`]: abandon the remaining handlers without a result
//!
//! Chains are immutable once built. Extending the default behavior means
//! building a new chain with [`HandlerChain::with_first`],
//! [`HandlerChain::with_last`], [`HandlerChain::replace`] or
//! [`HandlerChain::without`]; existing handlers are never modified.
//!
//! # Example
//!
//! ```rust
//! use beanmap::chain::{Flow, Handler, HandlerChain};
//! use std::sync::Arc;
//!
//! struct Double;
//!
//! impl Handler<i32, i32> for Double {
//!     fn name(&self) -> &str {
//!         "double"
//!     }
//!
//!     fn handle(&self, ctx: &mut i32) -> Flow<i32> {
//!         Flow::Value(*ctx * 2)
//!     }
//! }
//!
//! let chain: HandlerChain<i32, i32> = HandlerChain::new(vec![Arc::new(Double)]);
//! assert_eq!(chain.produce(&mut 21), Some(42));
//! ```

use std::fmt;
use std::sync::Arc;

/// Outcome of a single handler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow<R> {
    /// No opinion; fall through to the next handler.
    Continue,
    /// A result was produced.
    Value(R),
    /// Abort the remaining chain without a result.
    Break,
}

impl<R> Flow<R> {
    /// True for [`Flow::Continue`].
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// True for [`Flow::Break`].
    pub fn is_break(&self) -> bool {
        matches!(self, Self::Break)
    }

    /// Map the produced value, keeping `Continue` / `Break` as-is.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Flow<U> {
        match self {
            Self::Continue => Flow::Continue,
            Self::Value(v) => Flow::Value(f(v)),
            Self::Break => Flow::Break,
        }
    }
}

/// A unit of strategy inside a [`HandlerChain`].
///
/// Handlers must not keep per-call state: everything a call needs lives in
/// the context `C`, so one handler instance can serve concurrent calls on
/// independent contexts.
pub trait Handler<C, R>: Send + Sync {
    /// Stable name, used by [`HandlerChain::replace`] and [`HandlerChain::without`].
    fn name(&self) -> &str;

    /// Inspect (and possibly mutate) the context.
    fn handle(&self, ctx: &mut C) -> Flow<R>;
}

/// Immutable, ordered list of handlers.
pub struct HandlerChain<C, R> {
    handlers: Vec<Arc<dyn Handler<C, R>>>,
}

impl<C, R> HandlerChain<C, R> {
    /// Create a chain from handlers in priority order.
    pub fn new(handlers: Vec<Arc<dyn Handler<C, R>>>) -> Self {
        Self { handlers }
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// True if the chain has no handler.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names in dispatch order.
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Position of the handler called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.handlers.iter().position(|h| h.name() == name)
    }

    /// New chain with `handler` dispatched before every existing handler.
    #[must_use]
    pub fn with_first(&self, handler: Arc<dyn Handler<C, R>>) -> Self {
        let mut handlers = Vec::with_capacity(self.handlers.len() + 1);
        handlers.push(handler);
        handlers.extend(self.handlers.iter().cloned());
        Self { handlers }
    }

    /// New chain with `handler` dispatched after every existing handler.
    #[must_use]
    pub fn with_last(&self, handler: Arc<dyn Handler<C, R>>) -> Self {
        let mut handlers = self.handlers.clone();
        handlers.push(handler);
        Self { handlers }
    }

    /// New chain where the handler called `name` is swapped for `handler`.
    ///
    /// Returns `None` if no handler has that name.
    pub fn replace(&self, name: &str, handler: Arc<dyn Handler<C, R>>) -> Option<Self> {
        let index = self.position(name)?;
        let mut handlers = self.handlers.clone();
        handlers[index] = handler;
        Some(Self { handlers })
    }

    /// New chain without the handler called `name`.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        Self {
            handlers: self
                .handlers
                .iter()
                .filter(|h| h.name() != name)
                .cloned()
                .collect(),
        }
    }

    /// Run every handler in order against the shared context.
    ///
    /// Produced values are ignored; handlers communicate through the
    /// context. Returns `false` if a handler signalled [`Flow::Break`].
    pub fn resolve(&self, ctx: &mut C) -> bool {
        for handler in &self.handlers {
            if handler.handle(ctx).is_break() {
                log::trace!("[chain] {} stopped resolution", handler.name());
                return false;
            }
        }
        true
    }

    /// Ask each handler in order for a value; the first that does not fall
    /// through wins. [`Flow::Break`] and an exhausted chain yield `None`.
    pub fn produce(&self, ctx: &mut C) -> Option<R> {
        for handler in &self.handlers {
            match handler.handle(ctx) {
                Flow::Continue => {}
                Flow::Value(value) => {
                    log::trace!("[chain] {} produced a value", handler.name());
                    return Some(value);
                }
                Flow::Break => {
                    log::trace!("[chain] {} broke the chain", handler.name());
                    return None;
                }
            }
        }
        None
    }
}

impl<C, R> Clone for HandlerChain<C, R> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<C, R> Default for HandlerChain<C, R> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }
}

impl<C, R> fmt::Debug for HandlerChain<C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Trace {
        visited: Vec<String>,
        input: i32,
    }

    struct Step {
        name: &'static str,
        outcome: fn(i32) -> Flow<i32>,
    }

    impl Handler<Trace, i32> for Step {
        fn name(&self) -> &str {
            self.name
        }

        fn handle(&self, ctx: &mut Trace) -> Flow<i32> {
            ctx.visited.push(self.name.to_string());
            (self.outcome)(ctx.input)
        }
    }

    fn step(name: &'static str, outcome: fn(i32) -> Flow<i32>) -> Arc<dyn Handler<Trace, i32>> {
        Arc::new(Step { name, outcome })
    }

    fn sample_chain() -> HandlerChain<Trace, i32> {
        HandlerChain::new(vec![
            step("skip", |_| Flow::Continue),
            step("negative", |n| if n < 0 { Flow::Break } else { Flow::Continue }),
            step("double", |n| Flow::Value(n * 2)),
            step("never", |_| Flow::Value(-1)),
        ])
    }

    #[test]
    fn test_first_value_wins() {
        let chain = sample_chain();
        let mut ctx = Trace {
            input: 4,
            ..Trace::default()
        };
        assert_eq!(chain.produce(&mut ctx), Some(8));
        assert_eq!(ctx.visited, vec!["skip", "negative", "double"]);
    }

    #[test]
    fn test_break_short_circuits() {
        let chain = sample_chain();
        let mut ctx = Trace {
            input: -1,
            ..Trace::default()
        };
        assert_eq!(chain.produce(&mut ctx), None);
        assert_eq!(ctx.visited, vec!["skip", "negative"]);
    }

    #[test]
    fn test_exhausted_chain_yields_none() {
        let chain = HandlerChain::new(vec![step("skip", |_| Flow::Continue)]);
        assert_eq!(chain.produce(&mut Trace::default()), None);
    }

    #[test]
    fn test_resolve_runs_every_handler_until_break() {
        let chain = HandlerChain::new(vec![
            step("a", |_| Flow::Value(1)),
            step("b", |_| Flow::Continue),
            step("c", |_| Flow::Break),
            step("d", |_| Flow::Continue),
        ]);
        let mut ctx = Trace::default();
        assert!(!chain.resolve(&mut ctx));
        assert_eq!(ctx.visited, vec!["a", "b", "c"]);

        let complete = chain.without("c");
        let mut ctx = Trace::default();
        assert!(complete.resolve(&mut ctx));
        assert_eq!(ctx.visited, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_chain_extension_leaves_original_untouched() {
        let chain = sample_chain();
        let first = chain.with_first(step("triple", |n| Flow::Value(n * 3)));
        let last = chain.with_last(step("tail", |_| Flow::Continue));
        let replaced = chain
            .replace("double", step("square", |n| Flow::Value(n * n)))
            .expect("double exists");

        assert_eq!(chain.names(), vec!["skip", "negative", "double", "never"]);
        assert_eq!(first.names()[0], "triple");
        assert_eq!(last.names().last().copied(), Some("tail"));
        assert_eq!(replaced.position("square"), Some(2));
        assert!(chain.replace("missing", step("x", |_| Flow::Break)).is_none());

        let mut ctx = Trace {
            input: 5,
            ..Trace::default()
        };
        assert_eq!(first.produce(&mut ctx), Some(15));
        let mut ctx = Trace {
            input: 5,
            ..Trace::default()
        };
        assert_eq!(replaced.produce(&mut ctx), Some(25));
    }

    #[test]
    fn test_flow_map() {
        assert_eq!(Flow::Value(2).map(|v| v + 1), Flow::Value(3));
        assert_eq!(Flow::<i32>::Break.map(|v| v + 1), Flow::Break);
        assert!(Flow::<i32>::Continue.map(|v| v + 1).is_continue());
    }
}
