// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for [`BeanSchema`], and the runtime-defined
//! [`DynamicBean`] it can describe.

use super::{
    cast, cast_mut, Bean, BeanSchema, Construction, Factory, Finisher, MethodSpec, PropertySpec,
};
use crate::error::AccessError;
use crate::types::{StructType, Type};
use crate::value::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::sync::Arc;

/// Builder for creating [`BeanSchema`] instances.
#[derive(Debug)]
pub struct SchemaBuilder {
    schema: BeanSchema,
}

impl SchemaBuilder {
    /// Create a new builder for a struct type.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            schema: BeanSchema {
                name: name.into(),
                ..BeanSchema::default()
            },
        }
    }

    /// Declare a type parameter.
    pub fn type_param(mut self, name: impl Into<Arc<str>>) -> Self {
        self.schema.type_params.push(name.into());
        self
    }

    /// Add a read/write field stored in a [`DynamicBean`].
    pub fn field(self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        let name = name.into();
        let spec = PropertySpec::new(name.clone(), ty)
            .with_getter(dynamic_getter(name.clone()))
            .with_setter(dynamic_setter(name));
        self.field_spec(spec)
    }

    /// Add a read-only field stored in a [`DynamicBean`].
    pub fn read_only_field(self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        let name = name.into();
        let spec = PropertySpec::new(name.clone(), ty).with_getter(dynamic_getter(name));
        self.field_spec(spec)
    }

    /// Add a field with caller-provided accessors.
    pub fn field_spec(mut self, spec: PropertySpec) -> Self {
        self.schema.fields.push(spec);
        self
    }

    /// Add an explicit accessor pair.
    pub fn accessor(mut self, spec: PropertySpec) -> Self {
        self.schema.accessors.push(spec);
        self
    }

    /// Add an invocable method.
    pub fn method(mut self, spec: MethodSpec) -> Self {
        self.schema.methods.push(spec);
        self
    }

    /// Instances are created by `factory` and populated in place.
    pub fn construct_default<F>(mut self, factory: F) -> Self
    where
        F: Fn(&StructType) -> Box<dyn Bean> + Send + Sync + 'static,
    {
        self.schema.construction = Construction::Default(Arc::new(factory));
        self
    }

    /// Instances are built: `builder` creates a mutable builder bean that is
    /// populated and then turned into the value by `finish`.
    pub fn construct_with_builder(mut self, builder: Factory, finish: Finisher) -> Self {
        self.schema.construction = Construction::Builder { builder, finish };
        self
    }

    /// Instances are [`DynamicBean`]s with zero-initialized fields.
    pub fn dynamic(self) -> Self {
        self.construct_default(|ty| Box::new(DynamicBean::new(ty.clone())))
    }

    /// Build the schema.
    pub fn build(self) -> Arc<BeanSchema> {
        Arc::new(self.schema)
    }

    /// Build the schema and wrap it in a struct type without type arguments.
    pub fn build_type(self) -> Type {
        Type::Struct(StructType::new(self.build()))
    }
}

fn dynamic_getter(
    name: Arc<str>,
) -> impl Fn(&dyn Bean) -> Result<Value, AccessError> + Send + Sync + 'static {
    move |bean| {
        cast::<DynamicBean>(bean)?
            .get(&name)
            .cloned()
            .ok_or_else(|| AccessError::UnknownProperty(name.to_string()))
    }
}

fn dynamic_setter(
    name: Arc<str>,
) -> impl Fn(&mut dyn Bean, Value) -> Result<(), AccessError> + Send + Sync + 'static {
    move |bean, value| cast_mut::<DynamicBean>(bean)?.set(&name, value)
}

/// A struct-like value whose fields are defined at runtime by its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicBean {
    ty: StructType,
    values: IndexMap<Arc<str>, Value>,
}

impl DynamicBean {
    /// Instance with every declared field set to its zero value (primitive
    /// fields) or null.
    pub fn new(ty: StructType) -> Self {
        let bindings = ty.bindings();
        let values = ty
            .schema()
            .fields
            .iter()
            .map(|spec| {
                let value = spec
                    .ty
                    .substitute(&bindings)
                    .primitive()
                    .map_or(Value::Null, Value::zero);
                (spec.name.clone(), value)
            })
            .collect();
        Self { ty, values }
    }

    /// Instance with every declared field null.
    pub fn empty(ty: StructType) -> Self {
        let values = ty
            .schema()
            .fields
            .iter()
            .map(|spec| (spec.name.clone(), Value::Null))
            .collect();
        Self { ty, values }
    }

    /// Struct type of this instance.
    pub fn struct_type(&self) -> &StructType {
        &self.ty
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Set a declared field.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), AccessError> {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(AccessError::UnknownProperty(name.to_string())),
        }
    }

    /// Take a field value, leaving null behind.
    pub fn take(&mut self, name: &str) -> Value {
        self.values
            .get_mut(name)
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Iterate over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_ref(), value))
    }
}

impl Bean for DynamicBean {
    fn bean_type(&self) -> Type {
        Type::Struct(self.ty.clone())
    }

    fn clone_bean(&self) -> Box<dyn Bean> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_fields() {
        let schema = SchemaBuilder::new("Sensor")
            .field("id", Type::U32)
            .read_only_field("label", Type::String)
            .build();

        assert_eq!(&*schema.name, "Sensor");
        assert_eq!(schema.fields.len(), 2);
        assert!(schema.fields[0].setter.is_some());
        assert!(schema.fields[1].setter.is_none());
        assert!(matches!(schema.construction, Construction::Unavailable));
    }

    #[test]
    fn test_dynamic_bean_defaults() {
        let ty = StructType::new(
            SchemaBuilder::new("Sensor")
                .field("id", Type::U32)
                .field("label", Type::String)
                .build(),
        );
        let bean = DynamicBean::new(ty.clone());
        assert_eq!(bean.get("id"), Some(&Value::U32(0)));
        assert_eq!(bean.get("label"), Some(&Value::Null));

        let empty = DynamicBean::empty(ty);
        assert_eq!(empty.get("id"), Some(&Value::Null));
    }

    #[test]
    fn test_dynamic_bean_rejects_unknown_fields() {
        let ty = StructType::new(SchemaBuilder::new("Sensor").field("id", Type::U32).build());
        let mut bean = DynamicBean::new(ty);
        assert!(bean.set("id", 7u32).is_ok());
        assert_eq!(
            bean.set("missing", 1u32),
            Err(AccessError::UnknownProperty("missing".into()))
        );
        assert_eq!(bean.take("id"), Value::U32(7));
        assert_eq!(bean.get("id"), Some(&Value::Null));
        assert_eq!(bean.take("missing"), Value::Null);
    }

    #[test]
    fn test_generic_fields_zero_after_substitution() {
        let schema = SchemaBuilder::new("Boxed")
            .type_param("T")
            .field("inner", Type::var("T"))
            .build();
        let bean = DynamicBean::new(StructType::with_args(schema, vec![Type::I64]));
        assert_eq!(bean.get("inner"), Some(&Value::I64(0)));
    }

    #[test]
    fn test_dynamic_accessors() {
        let ty = SchemaBuilder::new("Sensor").field("id", Type::U32).build_type();
        let st = ty.as_struct().expect("struct").clone();
        let mut bean = DynamicBean::new(st.clone());
        let schema = st.schema();
        let spec = &schema.fields[0];

        let setter = spec.setter.as_ref().expect("setter");
        setter(&mut bean, Value::U32(9)).expect("set");
        let getter = spec.getter.as_ref().expect("getter");
        assert_eq!(getter(&bean), Ok(Value::U32(9)));
    }
}
