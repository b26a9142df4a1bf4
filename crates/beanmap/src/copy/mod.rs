// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Property copier.
//!
//! Copies named values from a map or an object into a map or an object.
//! Each side is described by a [`Type`]; property types come from the
//! resolved [`TypeDescriptor`](crate::descriptor::TypeDescriptor) and every
//! value goes through the converter of the [`Env`].
//!
//! Copies are not transactional: when a property fails and
//! `thrown_if_any_fails` is set, properties copied before it stay written.

use crate::bean::{Bean, TargetRef};
use crate::convert::{Env, MappingContext};
use crate::error::{Error, Result};
use crate::types::Type;
use crate::value::Value;
use indexmap::IndexMap;
use std::borrow::Cow;

/// Read side of a copy.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Map(&'a IndexMap<Value, Value>),
    Bean(&'a dyn Bean),
}

impl<'a> Source<'a> {
    /// View a map or object value as a copy source.
    pub fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Map(entries) => Some(Self::Map(entries)),
            Value::Object(bean) => Some(Self::Bean(bean.as_ref())),
            _ => None,
        }
    }
}

/// Write side of a copy.
#[derive(Debug)]
pub enum Target<'a> {
    Map(&'a mut IndexMap<Value, Value>),
    Bean(&'a mut dyn Bean),
}

impl<'a> Target<'a> {
    /// View a map or object value as a copy target.
    pub fn of(value: &'a mut Value) -> Option<Self> {
        match value {
            Value::Map(entries) => Some(Self::Map(entries)),
            Value::Object(bean) => Some(Self::Bean(bean.as_mut())),
            _ => None,
        }
    }

    /// Target behind an instance being populated.
    pub fn from_ref(target: TargetRef<'a>) -> Option<Self> {
        match target {
            TargetRef::Value(value) => Self::of(value),
            TargetRef::Bean(bean) => Some(Self::Bean(bean)),
        }
    }
}

/// Copy every property of `src` into `dst`.
///
/// `src_ty` and `dst_ty` describe both sides; an object side whose type is
/// not a struct type is described by the object's own type, and a map side
/// whose type is not a map type is treated as `Map<Any, Any>`.
pub fn copy_properties(
    src: Source<'_>,
    src_ty: &Type,
    dst: Target<'_>,
    dst_ty: &Type,
    env: &Env,
) -> Result<()> {
    let copier = Copier { src_ty, dst_ty, env };
    match (src, dst) {
        (Source::Map(entries), Target::Map(out)) => copier.map_to_map(entries, out),
        (Source::Map(entries), Target::Bean(bean)) => copier.map_to_bean(entries, bean),
        (Source::Bean(bean), Target::Map(out)) => copier.bean_to_map(bean, out),
        (Source::Bean(from), Target::Bean(to)) => copier.bean_to_bean(from, to),
    }
}

struct Copier<'e> {
    src_ty: &'e Type,
    dst_ty: &'e Type,
    env: &'e Env,
}

impl Copier<'_> {
    fn map_to_map(
        &self,
        entries: &IndexMap<Value, Value>,
        out: &mut IndexMap<Value, Value>,
    ) -> Result<()> {
        let (src_key, src_value) = map_parts(self.src_ty);
        let (dst_key, dst_value) = self.dst_map_parts();
        for (key, value) in entries {
            let name = key_name(key);
            if self.skipped(&name, value) {
                continue;
            }
            let key_src = MappingContext::source_part(Some(src_key.clone()), key);
            let Some(key) = self.settle(&name, self.env.map(key.clone(), &key_src, &dst_key))?
            else {
                continue;
            };
            if !self.env.options().put_if_not_contained && !out.contains_key(&key) {
                continue;
            }
            let value_src = MappingContext::source_part(Some(src_value.clone()), value);
            let Some(value) =
                self.settle(&name, self.env.map(value.clone(), &value_src, &dst_value))?
            else {
                continue;
            };
            out.insert(key, value);
        }
        Ok(())
    }

    fn map_to_bean(&self, entries: &IndexMap<Value, Value>, bean: &mut dyn Bean) -> Result<()> {
        let (src_key, src_value) = map_parts(self.src_ty);
        let dst_ty = self.bean_type(self.dst_ty, bean);
        let descriptor = self.env.resolve(&dst_ty);
        for (key, value) in entries {
            let label = key_name(key);
            if self.skipped(&label, value) {
                continue;
            }
            let key_src = MappingContext::source_part(Some(src_key.clone()), key);
            let name = match self.settle(&label, self.env.map(key.clone(), &key_src, &Type::String))? {
                Some(Value::String(name)) => name,
                _ => continue,
            };
            let Some(property) = descriptor.property(&name).filter(|p| p.is_writeable()) else {
                continue;
            };
            let value_src = MappingContext::source_part(Some(src_value.clone()), value);
            let converted = self.env.map(value.clone(), &value_src, property.generic_type());
            let Some(converted) = self.settle(&name, converted)? else {
                continue;
            };
            self.settle(&name, property.write(&mut *bean, converted).map_err(Error::from))?;
        }
        Ok(())
    }

    fn bean_to_map(&self, bean: &dyn Bean, out: &mut IndexMap<Value, Value>) -> Result<()> {
        let src_ty = self.bean_type(self.src_ty, bean);
        let descriptor = self.env.resolve(&src_ty);
        let (dst_key, dst_value) = self.dst_map_parts();
        for property in descriptor.properties().filter(|p| p.is_readable()) {
            let name = property.name();
            if self.env.options().is_ignored(name) {
                continue;
            }
            let Some(value) = self.settle(name, property.read(bean).map_err(Error::from))? else {
                continue;
            };
            if value.is_null() && self.env.options().ignore_null {
                continue;
            }
            let key = self.env.map(Value::from(name), &Type::String, &dst_key);
            let Some(key) = self.settle(name, key)? else {
                continue;
            };
            if !self.env.options().put_if_not_contained && !out.contains_key(&key) {
                continue;
            }
            let value_src = MappingContext::source_part(Some(property.generic_type().clone()), &value);
            let Some(value) = self.settle(name, self.env.map(value, &value_src, &dst_value))? else {
                continue;
            };
            out.insert(key, value);
        }
        Ok(())
    }

    fn bean_to_bean(&self, from: &dyn Bean, to: &mut dyn Bean) -> Result<()> {
        let src_ty = self.bean_type(self.src_ty, from);
        let dst_ty = self.bean_type(self.dst_ty, to);
        let source = self.env.resolve(&src_ty);
        let target = self.env.resolve(&dst_ty);
        for property in source.properties().filter(|p| p.is_readable()) {
            let name = property.name();
            if self.env.options().is_ignored(name) {
                continue;
            }
            let Some(dst_property) = target.property(name).filter(|p| p.is_writeable()) else {
                continue;
            };
            let Some(value) = self.settle(name, property.read(from).map_err(Error::from))? else {
                continue;
            };
            if value.is_null() && self.env.options().ignore_null {
                continue;
            }
            let value_src = MappingContext::source_part(Some(property.generic_type().clone()), &value);
            let converted = self.env.map(value, &value_src, dst_property.generic_type());
            let Some(converted) = self.settle(name, converted)? else {
                continue;
            };
            self.settle(name, dst_property.write(&mut *to, converted).map_err(Error::from))?;
        }
        Ok(())
    }

    /// Ignored names and, under `ignore_null`, null values.
    fn skipped(&self, name: &str, value: &Value) -> bool {
        let options = self.env.options();
        options.is_ignored(name) || (options.ignore_null && value.is_null())
    }

    /// Apply the failure policy to the outcome of one property.
    fn settle<T>(&self, property: &str, result: Result<T>) -> Result<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_depth_exceeded() => Err(err),
            Err(err) if self.env.options().thrown_if_any_fails => Err(Error::Copy {
                from: self.src_ty.clone(),
                to: self.dst_ty.clone(),
                property: property.to_string(),
                source: Box::new(err),
            }),
            Err(err) => {
                log::warn!(
                    "[copier] skipping '{}' ({} -> {}): {}",
                    property,
                    self.src_ty,
                    self.dst_ty,
                    err
                );
                Ok(None)
            }
        }
    }

    fn dst_map_parts(&self) -> (Type, Type) {
        map_parts(self.dst_ty)
    }

    /// Struct type describing `bean`: the declared one if it is a struct
    /// type, the bean's own type otherwise.
    fn bean_type<'t>(&self, declared: &'t Type, bean: &dyn Bean) -> Cow<'t, Type> {
        if declared.is_struct() {
            Cow::Borrowed(declared)
        } else {
            Cow::Owned(bean.bean_type())
        }
    }
}

fn map_parts(ty: &Type) -> (Type, Type) {
    ty.key_value_types().unwrap_or((Type::Any, Type::Any))
}

/// Property name carried by a map key.
fn key_name(key: &Value) -> Cow<'_, str> {
    match key {
        Value::String(name) => Cow::Borrowed(name),
        other => Cow::Owned(other.to_string()),
    }
}
