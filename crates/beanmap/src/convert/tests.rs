// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::*;
use crate::bean::{self, required, Bean, DynamicBean, SchemaBuilder, SchemaInstantiator};
use crate::error::AccessError;
use crate::options::{ConversionOptions, ReusePolicy};
use crate::resolver::ChainResolver;
use crate::types::{EnumType, MapKind, StructType};
use bytes::{Bytes, BytesMut};
use indexmap::IndexSet;

fn env(options: ConversionOptions) -> Env {
    Env::new(
        Arc::new(options),
        Arc::new(ChainResolver::default()),
        Arc::new(Mapper::new()),
        Arc::new(SchemaInstantiator),
    )
}

fn convert(value: Value, src: &Type, dst: &Type) -> Result<Value> {
    convert_with(value, src, dst, ConversionOptions::default())
}

fn convert_with(value: Value, src: &Type, dst: &Type, options: ConversionOptions) -> Result<Value> {
    Mapper::new().convert(value, src, dst, &env(options))
}

fn person_type() -> Type {
    SchemaBuilder::new("Person")
        .field("name", Type::String)
        .field("age", Type::I32)
        .dynamic()
        .build_type()
}

fn person(name: &str, age: i32) -> DynamicBean {
    let ty = person_type();
    let mut bean = DynamicBean::new(ty.as_struct().expect("struct").clone());
    bean.set("name", name).expect("name");
    bean.set("age", age).expect("age");
    bean
}

#[test]
fn test_default_chain_order() {
    let mapper = Mapper::new();
    let names = mapper.chain().names();
    assert_eq!(
        names,
        vec!["reuse", "number", "boolean", "text", "bytes", "enum", "collection", "map", "bean"]
    );
}

#[test]
fn test_null_stays_null() {
    let out = convert(Value::Null, &Type::String, &Type::String).expect("convert");
    assert!(out.is_null());
}

#[test]
fn test_identity_reuse_keeps_the_same_object() {
    let value = Value::object(person("ada", 36));
    let before = value.as_object().expect("object") as *const dyn Bean as *const ();
    let ty = person_type();

    let out = convert(value, &ty, &ty).expect("convert");
    let after = out.as_object().expect("object") as *const dyn Bean as *const ();
    assert_eq!(before, after);
}

#[test]
fn test_no_reuse_rebuilds_the_object() {
    let value = Value::object(person("ada", 36));
    let before = value.as_object().expect("object") as *const dyn Bean as *const ();
    let ty = person_type();

    let options = ConversionOptions::default().with_reuse_policy(ReusePolicy::NoReuse);
    let out = convert_with(value.clone(), &ty, &ty, options).expect("convert");
    let after = out.as_object().expect("object") as *const dyn Bean as *const ();
    assert_ne!(before, after);
    assert_eq!(out, value);
}

#[test]
fn test_assignable_reuse_needs_policy() {
    let list = Value::from(vec![1i32, 2]);
    let src = Type::list(Type::I32);
    let dst = Type::iterable(Type::I32);
    let reuse = ConversionOptions::default().with_reuse_policy(ReusePolicy::ReuseIfAssignable);
    assert_eq!(convert_with(list.clone(), &src, &dst, reuse).expect("convert"), list);
    // Rebuilt by the collection handler, with the same content.
    assert_eq!(convert(list.clone(), &src, &dst).expect("convert"), list);
}

#[test]
fn test_numbers() {
    assert_eq!(
        convert(Value::I32(7), &Type::I32, &Type::I64).expect("widen"),
        Value::I64(7)
    );
    assert_eq!(
        convert(Value::from("42"), &Type::String, &Type::U8).expect("parse"),
        Value::U8(42)
    );
    assert_eq!(
        convert(Value::Null, &Type::Any, &Type::F64).expect("zero"),
        Value::F64(0.0)
    );
    assert_eq!(
        convert(Value::Bool(true), &Type::BOOL, &Type::I32).expect("bool"),
        Value::I32(1)
    );
    assert!(matches!(
        convert(Value::I32(300), &Type::I32, &Type::I8),
        Err(Error::Conversion { .. })
    ));
    assert!(convert(Value::from("x"), &Type::String, &Type::I32).is_err());
}

#[test]
fn test_grouped_number_format() {
    let options = ConversionOptions::default()
        .with_number_format(NumberFormat::default().with_grouping(','));
    assert_eq!(
        convert_with(Value::I64(1234567), &Type::I64, &Type::String, options.clone())
            .expect("format"),
        Value::from("1,234,567")
    );
    assert_eq!(
        convert_with(Value::from("1,234"), &Type::String, &Type::I32, options).expect("parse"),
        Value::I32(1234)
    );
}

#[test]
fn test_booleans() {
    assert_eq!(
        convert(Value::I32(1), &Type::I32, &Type::BOOL).expect("one"),
        Value::Bool(true)
    );
    assert_eq!(
        convert(Value::I32(2), &Type::I32, &Type::BOOL).expect("two"),
        Value::Bool(false)
    );
    assert_eq!(
        convert(Value::from("TRUE"), &Type::String, &Type::BOOL).expect("text"),
        Value::Bool(true)
    );
}

#[test]
fn test_text() {
    assert_eq!(
        convert(Value::F64(2.5), &Type::F64, &Type::String).expect("float"),
        Value::from("2.5")
    );
    assert_eq!(
        convert(Value::from("x"), &Type::String, &Type::CHAR).expect("char"),
        Value::Char('x')
    );
    assert_eq!(
        convert(Value::U32(65), &Type::U32, &Type::CHAR).expect("code point"),
        Value::Char('A')
    );
    assert!(convert(Value::from("xy"), &Type::String, &Type::CHAR).is_err());

    let latin1 = ConversionOptions::default().with_charset(Charset::Latin1);
    let bytes = Value::ByteBuffer(Bytes::from_static(&[0x63, 0x61, 0x66, 0xE9]));
    assert_eq!(
        convert_with(bytes, &Type::ByteBuffer, &Type::String, latin1).expect("decode"),
        Value::from("café")
    );
}

#[test]
fn test_byte_buffers_share_storage() {
    let buf = Bytes::from(vec![1u8, 2, 3]);
    let ptr = buf.as_ptr();

    let out = convert(Value::ByteBuffer(buf.clone()), &Type::ByteBuffer, &Type::ByteBuffer)
        .expect("reuse");
    assert_eq!(out.as_bytes().expect("bytes").as_ptr(), ptr);

    let out = convert(Value::ByteBuffer(buf.clone()), &Type::Any, &Type::ByteBuffer)
        .expect("share");
    assert_eq!(out.as_bytes().expect("bytes").as_ptr(), ptr);

    let options = ConversionOptions::default().with_reuse_policy(ReusePolicy::NoReuse);
    let out = convert_with(Value::ByteBuffer(buf), &Type::ByteBuffer, &Type::ByteBuffer, options)
        .expect("copy");
    assert_ne!(out.as_bytes().expect("bytes").as_ptr(), ptr);
    assert_eq!(out.as_bytes(), Some(&[1u8, 2, 3][..]));
}

#[test]
fn test_bytes_from_text_and_lists() {
    let out = convert(Value::from("hi"), &Type::String, &Type::Bytes).expect("encode");
    assert_eq!(out, Value::Bytes(BytesMut::from(&b"hi"[..])));

    let list = Value::from(vec![104u8, 105]);
    let out = convert(list, &Type::list(Type::U8), &Type::ByteBuffer).expect("list");
    assert_eq!(out, Value::ByteBuffer(Bytes::from_static(b"hi")));

    let bad = Value::from(vec![1000i32]);
    assert!(convert(bad, &Type::list(Type::I32), &Type::Bytes).is_err());
}

#[test]
fn test_enums() {
    let color = EnumType::new("Color", ["Red", "Green"]);
    let ty = Type::Enum(color.clone());
    assert_eq!(
        convert(Value::from("Green"), &Type::String, &ty).expect("variant"),
        Value::enum_variant(&color, "Green").expect("green")
    );
    assert!(convert(Value::from("green"), &Type::String, &ty).is_err());

    let red = Value::enum_variant(&color, "Red").expect("red");
    assert_eq!(
        convert(red, &ty, &Type::String).expect("name"),
        Value::from("Red")
    );
}

#[test]
fn test_list_to_set_of_strings() {
    let list = Value::from(vec![1i32, 2, 3]);
    let out = convert(list, &Type::list(Type::I32), &Type::set(Type::String)).expect("convert");
    let expected: IndexSet<Value> = ["1", "2", "3"].into_iter().map(Value::from).collect();
    assert_eq!(out.as_set(), Some(&expected));
}

#[test]
fn test_sorted_set_and_arrays() {
    let list = Value::from(vec![3i32, 1, 2, 1]);
    let out = convert(list, &Type::list(Type::I32), &Type::sorted_set(Type::I64)).expect("sorted");
    let items: Vec<_> = out.as_set().expect("set").iter().cloned().collect();
    assert_eq!(items, vec![Value::I64(1), Value::I64(2), Value::I64(3)]);

    let pair = Value::from(vec![1i32, 2]);
    assert!(convert(pair.clone(), &Type::Any, &Type::array(Type::I32, 2)).is_ok());
    assert!(matches!(
        convert(pair, &Type::Any, &Type::array(Type::I32, 3)),
        Err(Error::Conversion { .. })
    ));

    let bytes = Value::ByteBuffer(Bytes::from_static(&[7, 8]));
    assert_eq!(
        convert(bytes, &Type::ByteBuffer, &Type::list(Type::I32)).expect("bytes"),
        Value::from(vec![7i32, 8])
    );
}

#[test]
fn test_one_bad_element_fails_the_container() {
    let list = Value::from(vec!["1", "x"]);
    let err = convert(list, &Type::list(Type::String), &Type::list(Type::I32))
        .expect_err("must fail");
    assert!(matches!(err, Error::Conversion { .. }));
}

#[test]
fn test_maps() {
    let source: Value = [("b", 2i32), ("a", 1)].into_iter().collect();
    let dst = Type::map_of(MapKind::Sorted, Type::String, Type::I64);
    let out = convert(source, &Type::map(Type::String, Type::I32), &dst).expect("map");
    let keys: Vec<_> = out.as_map().expect("map").keys().cloned().collect();
    assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
    assert_eq!(out.get("a"), Some(&Value::I64(1)));
}

#[test]
fn test_placeholders() {
    assert_eq!(
        convert(Value::I32(5), &Type::I32, &Type::extends(Type::I64)).expect("bound"),
        Value::I64(5)
    );
    assert_eq!(
        convert(Value::I32(5), &Type::extends(Type::I32), &Type::String).expect("src bound"),
        Value::from("5")
    );
    assert!(matches!(
        convert(Value::I32(5), &Type::I32, &Type::var("T")),
        Err(Error::Conversion { .. })
    ));
    assert_eq!(
        convert(Value::I32(5), &Type::I32, &Type::wildcard()).expect("any"),
        Value::I32(5)
    );
}

#[test]
fn test_any_target_keeps_value_without_reuse() {
    let options = ConversionOptions::default().with_reuse_policy(ReusePolicy::NoReuse);
    let list = Value::from(vec![1i32, 2]);
    assert_eq!(
        convert_with(list.clone(), &Type::Any, &Type::Any, options).expect("any"),
        list
    );
}

#[test]
fn test_map_to_struct_and_back() {
    let ty = person_type();
    let source: Value = [
        ("name", Value::from("grace")),
        ("age", Value::from("85")),
    ]
    .into_iter()
    .collect();

    let out = convert(source, &Type::map(Type::String, Type::Any), &ty).expect("to struct");
    let bean = out.downcast_ref::<DynamicBean>().expect("dynamic");
    assert_eq!(bean.get("name"), Some(&Value::from("grace")));
    assert_eq!(bean.get("age"), Some(&Value::I32(85)));

    let map = convert(out, &ty, &Type::map(Type::String, Type::Any)).expect("to map");
    assert_eq!(map.get("age"), Some(&Value::I32(85)));
    assert_eq!(map.get("name"), Some(&Value::from("grace")));
}

#[test]
fn test_struct_without_constructor_fails() {
    let ty = SchemaBuilder::new("Abstract").field("a", Type::I32).build_type();
    let source: Value = [("a", 1i32)].into_iter().collect();
    assert!(matches!(
        convert(source, &Type::map(Type::String, Type::I32), &ty),
        Err(Error::Conversion { .. })
    ));
}

#[test]
fn test_builder_targets_are_finished() {
    let draft = SchemaBuilder::new("PointDraft")
        .field("x", Type::I32)
        .field("y", Type::I32)
        .build();
    let point = SchemaBuilder::new("Point")
        .field("sum", Type::I32)
        .build();
    let point_ty = Type::Struct(StructType::new(point.clone()));
    let ty = SchemaBuilder::new("Point")
        .field("sum", Type::I32)
        .construct_with_builder(
            Arc::new(move |_: &StructType| -> Box<dyn Bean> {
                Box::new(DynamicBean::empty(StructType::new(draft.clone())))
            }),
            Arc::new(
                move |mut builder: Box<dyn Bean>| -> std::result::Result<Box<dyn Bean>, AccessError> {
                    let draft = bean::cast_mut::<DynamicBean>(builder.as_mut())?;
                    let x: i32 = required(draft, "x")?;
                    let y: i32 = required(draft, "y")?;
                    let mut built = DynamicBean::new(StructType::new(point.clone()));
                    built.set("sum", x + y)?;
                    Ok(Box::new(built))
                },
            ),
        )
        .build_type();

    let source: Value = [("x", 2i32), ("y", 3)].into_iter().collect();
    let out = convert(source, &Type::map(Type::String, Type::I32), &ty).expect("build");
    assert_eq!(out.runtime_type(), point_ty);
    assert_eq!(
        out.downcast_ref::<DynamicBean>().and_then(|b| b.get("sum")),
        Some(&Value::I32(5))
    );

    let partial: Value = [("x", 2i32)].into_iter().collect();
    let err = convert(partial, &Type::map(Type::String, Type::I32), &ty).expect_err("missing");
    assert!(matches!(
        err,
        Error::Access(AccessError::MissingProperty(ref name)) if name == "y"
    ));
}

#[test]
fn test_depth_limit() {
    let nested = Value::List(vec![Value::List(vec![Value::List(vec![Value::I32(1)])])]);
    let ty = Type::list(Type::list(Type::list(Type::I64)));
    assert!(convert(nested.clone(), &Type::Any, &ty).is_ok());

    let shallow = ConversionOptions::default().with_max_depth(2);
    let err = convert_with(nested, &Type::Any, &ty, shallow).expect_err("too deep");
    assert!(err.is_depth_exceeded());
}

#[test]
fn test_custom_chain() {
    let chain = Mapper::default_chain().without("number");
    let mapper = Mapper::with_chain(chain);
    let env = env(ConversionOptions::default());
    assert!(mapper
        .convert(Value::from("1"), &Type::String, &Type::I32, &env)
        .is_err());
    assert_eq!(
        mapper
            .convert(Value::from("1"), &Type::String, &Type::String, &env)
            .expect("text"),
        Value::from("1")
    );
}

#[test]
fn test_deep_copy_rebuilds_maps() {
    let source: Value = [("k", 1i32)].into_iter().collect();
    let ty = Type::map(Type::String, Type::I32);
    let options = ConversionOptions::default().with_deep_copy(true);
    let out = convert_with(source.clone(), &ty, &ty, options).expect("copy");
    assert_eq!(out, source);
}

#[test]
fn test_containers_and_objects_render_as_text() {
    let list = Value::List(vec![Value::I32(1), Value::I32(2)]);
    let out = convert(list, &Type::list(Type::I32), &Type::String).expect("list");
    assert_eq!(out, Value::from("[1, 2]"));

    let ty = person_type();
    let out = convert(Value::object(person("ada", 36)), &ty, &Type::String).expect("object");
    assert_eq!(out, Value::from(r#"{"name": ada, "age": 36}"#));
}

#[test]
fn test_same_named_schema_is_not_reused() {
    let source = SchemaBuilder::new("X").field("a", Type::I32).dynamic().build_type();
    let target = SchemaBuilder::new("X").field("b", Type::String).dynamic().build_type();
    let mut x = DynamicBean::new(source.as_struct().expect("struct").clone());
    x.set("a", 5i32).expect("a");

    let out = convert(Value::object(x), &source, &target).expect("convert");
    let object = out.as_object().expect("object");
    assert_eq!(object.bean_type(), target);
    let names: Vec<&str> = bean::downcast_ref::<DynamicBean>(object)
        .expect("dynamic")
        .fields()
        .map(|(name, _)| name)
        .collect();
    assert!(!names.contains(&"a"));
}
