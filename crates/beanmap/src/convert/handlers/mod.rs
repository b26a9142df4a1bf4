// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Default mapping handlers.

mod bean;
mod boolean;
mod bytes;
mod collection;
mod enums;
mod map;
mod number;
mod reuse;
mod text;

pub use bean::BeanHandler;
pub use boolean::BooleanHandler;
pub use bytes::BytesHandler;
pub use collection::CollectionHandler;
pub use enums::EnumHandler;
pub use map::MapHandler;
pub use number::NumberHandler;
pub use reuse::ReuseHandler;
pub use text::TextHandler;

use crate::chain::Flow;
use crate::error::{Error, Result};
use crate::value::Value;

/// Outcome of a nested element conversion inside a container handler.
///
/// Depth overflows propagate as errors; any other element failure abandons
/// the container with [`Flow::Break`].
fn element_failure(err: Error) -> Flow<Result<Value>> {
    if err.is_depth_exceeded() {
        Flow::Value(Err(err))
    } else {
        log::trace!("[mapper] element conversion failed: {}", err);
        Flow::Break
    }
}
