// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Struct-like values and their schemas.
//!
//! A [`Bean`] is any Rust value the engine can read and write by property
//! name. Each bean carries a reified [`Type`] whose [`BeanSchema`] lists
//! its fields, computed accessors, methods and how to construct a fresh
//! instance. Schemas come from `#[derive(Bean)]` or from [`SchemaBuilder`].

mod builder;
mod instantiate;

pub use builder::{DynamicBean, SchemaBuilder};
pub use instantiate::{Instance, Instantiate, SchemaInstantiator, TargetRef};

use crate::error::{AccessError, Result};
use crate::types::{StructType, Type};
use crate::value::{FromValue, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A struct-like value addressable by property name.
pub trait Bean: Any + Send + Sync + fmt::Debug {
    /// Reified type of this instance (including type arguments).
    fn bean_type(&self) -> Type;

    fn clone_bean(&self) -> Box<dyn Bean>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl Clone for Box<dyn Bean> {
    fn clone(&self) -> Self {
        (**self).clone_bean()
    }
}

/// Reads a property from a bean.
pub type Getter = Arc<dyn Fn(&dyn Bean) -> std::result::Result<Value, AccessError> + Send + Sync>;

/// Writes a property on a bean. The value already has the property's type.
pub type Setter =
    Arc<dyn Fn(&mut dyn Bean, Value) -> std::result::Result<(), AccessError> + Send + Sync>;

/// Calls a method on a bean.
pub type Invoker = Arc<dyn Fn(&dyn Bean, Vec<Value>) -> Result<Value> + Send + Sync>;

/// Creates an empty instance (or builder) for a struct type.
pub type Factory = Arc<dyn Fn(&StructType) -> Box<dyn Bean> + Send + Sync>;

/// Turns a populated builder into the built value.
pub type Finisher =
    Arc<dyn Fn(Box<dyn Bean>) -> std::result::Result<Box<dyn Bean>, AccessError> + Send + Sync>;

/// Opaque metadata attached to a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub name: Arc<str>,
    pub value: Option<String>,
}

impl Annotation {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<Arc<str>>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// One accessor pair as declared by a schema.
///
/// `ty` is the declared type, which may mention the schema's type
/// parameters as [`Type::Var`].
#[derive(Clone)]
pub struct PropertySpec {
    pub name: Arc<str>,
    pub ty: Type,
    pub getter: Option<Getter>,
    pub setter: Option<Setter>,
    pub annotations: Vec<Annotation>,
}

impl PropertySpec {
    /// Property without accessors.
    pub fn new(name: impl Into<Arc<str>>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            getter: None,
            setter: None,
            annotations: Vec::new(),
        }
    }

    pub fn with_getter<F>(mut self, getter: F) -> Self
    where
        F: Fn(&dyn Bean) -> std::result::Result<Value, AccessError> + Send + Sync + 'static,
    {
        self.getter = Some(Arc::new(getter));
        self
    }

    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut dyn Bean, Value) -> std::result::Result<(), AccessError>
            + Send
            + Sync
            + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl fmt::Debug for PropertySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySpec")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("readable", &self.getter.is_some())
            .field("writeable", &self.setter.is_some())
            .field("annotations", &self.annotations)
            .finish()
    }
}

/// An invocable method as declared by a schema.
#[derive(Clone)]
pub struct MethodSpec {
    pub name: Arc<str>,
    pub params: Vec<Type>,
    pub returns: Type,
    pub invoker: Invoker,
}

impl MethodSpec {
    pub fn new<F>(name: impl Into<Arc<str>>, params: Vec<Type>, returns: Type, invoker: F) -> Self
    where
        F: Fn(&dyn Bean, Vec<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params,
            returns,
            invoker: Arc::new(invoker),
        }
    }
}

impl fmt::Debug for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodSpec")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// How a fresh instance of a struct type is obtained.
#[derive(Clone, Default)]
pub enum Construction {
    /// The type cannot be instantiated by the engine.
    #[default]
    Unavailable,
    /// A default instance, populated in place.
    Default(Factory),
    /// A mutable builder, populated and then finished into the value.
    Builder { builder: Factory, finish: Finisher },
}

impl fmt::Debug for Construction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unavailable => "Unavailable",
            Self::Default(_) => "Default",
            Self::Builder { .. } => "Builder",
        })
    }
}

/// Structural description of a struct type, shared by every instance.
#[derive(Debug, Clone, Default)]
pub struct BeanSchema {
    pub name: Arc<str>,
    /// Type parameter names, in declaration order.
    pub type_params: Vec<Arc<str>>,
    /// Declared fields.
    pub fields: Vec<PropertySpec>,
    /// Explicit accessor pairs (computed properties).
    pub accessors: Vec<PropertySpec>,
    pub methods: Vec<MethodSpec>,
    pub construction: Construction,
}

impl BeanSchema {
    /// Accessors then fields; a name seen twice keeps its first entry.
    pub fn properties(&self) -> impl Iterator<Item = &PropertySpec> {
        let mut seen: Vec<&str> = Vec::new();
        self.accessors
            .iter()
            .chain(self.fields.iter())
            .filter(move |spec| {
                if seen.contains(&spec.name.as_ref()) {
                    false
                } else {
                    seen.push(&spec.name);
                    true
                }
            })
    }
}

/// Downcast a bean to its concrete type.
pub fn downcast_ref<T: Bean>(bean: &dyn Bean) -> Option<&T> {
    bean.as_any().downcast_ref()
}

/// Downcast a bean to its concrete type, mutably.
pub fn downcast_mut<T: Bean>(bean: &mut dyn Bean) -> Option<&mut T> {
    bean.as_any_mut().downcast_mut()
}

/// Like [`downcast_ref`], failing with a type mismatch.
pub fn cast<T: Bean>(bean: &dyn Bean) -> std::result::Result<&T, AccessError> {
    let got = bean.bean_type();
    downcast_ref(bean)
        .ok_or_else(|| AccessError::mismatch(std::any::type_name::<T>(), got.to_string()))
}

/// Like [`downcast_mut`], failing with a type mismatch.
pub fn cast_mut<T: Bean>(bean: &mut dyn Bean) -> std::result::Result<&mut T, AccessError> {
    let got = bean.bean_type();
    downcast_mut(bean)
        .ok_or_else(|| AccessError::mismatch(std::any::type_name::<T>(), got.to_string()))
}

/// Move a concrete bean out of an object value.
pub fn take_bean<T: Bean>(value: Value) -> std::result::Result<T, AccessError> {
    let expected = std::any::type_name::<T>();
    match value {
        Value::Object(bean) => {
            let got = bean.bean_type();
            bean.into_any()
                .downcast::<T>()
                .map(|bean| *bean)
                .map_err(|_| AccessError::mismatch(expected, got.to_string()))
        }
        Value::Null => Err(AccessError::NullValue(expected.to_string())),
        other => Err(AccessError::mismatch(expected, other.runtime_type().to_string())),
    }
}

/// Take a property out of a builder, failing if it was never set.
pub fn required<T: FromValue>(
    builder: &mut DynamicBean,
    name: &str,
) -> std::result::Result<T, AccessError> {
    T::from_value(builder.take(name)).map_err(|err| match err {
        AccessError::NullValue(_) => AccessError::MissingProperty(name.to_string()),
        other => other,
    })
}

/// Readable properties of a bean as `(name, value)` pairs.
///
/// Unreadable or failing properties are left out.
pub fn snapshot(bean: &dyn Bean) -> Vec<(Arc<str>, Value)> {
    let ty = bean.bean_type();
    let Some(st) = ty.as_struct() else {
        return Vec::new();
    };
    st.schema()
        .properties()
        .filter_map(|spec| {
            let getter = spec.getter.as_ref()?;
            getter(bean).ok().map(|value| (spec.name.clone(), value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_schema() -> Arc<BeanSchema> {
        SchemaBuilder::new("Point")
            .field("x", Type::I32)
            .field("y", Type::I32)
            .accessor(
                PropertySpec::new("sum", Type::I64).with_getter(|bean| {
                    let point = cast::<DynamicBean>(bean)?;
                    let x = point.get("x").and_then(Value::as_i32).unwrap_or(0);
                    let y = point.get("y").and_then(Value::as_i32).unwrap_or(0);
                    Ok(Value::I64(i64::from(x) + i64::from(y)))
                }),
            )
            .dynamic()
            .build()
    }

    #[test]
    fn test_snapshot_reads_accessors_then_fields() {
        let schema = point_schema();
        let mut point = DynamicBean::new(StructType::new(schema));
        point.set("x", Value::I32(2)).expect("x");
        point.set("y", Value::I32(3)).expect("y");

        let names: Vec<_> = snapshot(&point)
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        assert_eq!(names, vec!["sum=5", "x=2", "y=3"]);
    }

    #[test]
    fn test_object_values_compare_by_content() {
        let schema = point_schema();
        let mut a = DynamicBean::new(StructType::new(schema.clone()));
        a.set("x", Value::I32(1)).expect("x");
        let b = a.clone();
        let c = DynamicBean::new(StructType::new(schema));

        assert_eq!(Value::object(a.clone()), Value::object(b));
        assert_ne!(Value::object(a), Value::object(c));
    }

    #[test]
    fn test_take_bean() {
        let schema = point_schema();
        let point = DynamicBean::new(StructType::new(schema));
        let value = Value::object(point.clone());

        assert_eq!(take_bean::<DynamicBean>(value).ok(), Some(point));
        assert!(matches!(
            take_bean::<DynamicBean>(Value::Null),
            Err(AccessError::NullValue(_))
        ));
        assert!(take_bean::<DynamicBean>(Value::I32(1)).is_err());
    }

    #[test]
    fn test_required_reports_missing_property() {
        let schema = SchemaBuilder::new("Draft").field("title", Type::String).build();
        let mut draft = DynamicBean::empty(StructType::new(schema));
        assert_eq!(
            required::<String>(&mut draft, "title"),
            Err(AccessError::MissingProperty("title".into()))
        );
        draft.set("title", Value::from("hello")).expect("title");
        assert_eq!(required::<String>(&mut draft, "title").as_deref(), Ok("hello"));
        assert_eq!(required::<Option<String>>(&mut draft, "title"), Ok(None));
    }
}
