// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::items_after_statements)] // Test helpers

//! `#[derive(Bean)]` integration tests
//!
//! Schemas generated for structs and enums, as seen through the resolver
//! and the mapper.

use beanmap::{
    AccessError, Bean, BeanMapper, ConversionOptions, Error, FromValue, IntoValue, ReusePolicy,
    Type, Typed, Value,
};
use std::collections::{BTreeMap, HashMap};

#[derive(Bean, Debug, Clone, Default, PartialEq)]
struct Account {
    #[bean(rename = "login")]
    user: String,
    balance: i64,
    #[bean(read_only)]
    id: u32,
    #[bean(write_only)]
    secret: String,
    #[bean(skip)]
    session: Vec<u8>,
}

#[derive(Bean, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Level {
    #[default]
    Low,
    #[bean(rename = "HIGH")]
    High,
}

#[derive(Bean, Debug, Clone, Default, PartialEq)]
#[bean(name = "Ticket")]
struct TicketRecord {
    title: String,
    level: Level,
    watchers: Vec<String>,
}

#[derive(Bean, Debug, Clone, Default, PartialEq)]
struct Page<T> {
    first: T,
    items: Vec<T>,
    total: u32,
}

#[derive(Bean, Debug, Clone, PartialEq)]
#[bean(builder)]
struct Point {
    x: i32,
    y: i32,
    label: Option<String>,
    #[bean(skip)]
    hits: u32,
}

#[derive(Bean, Debug, Clone, PartialEq)]
#[bean(no_construct)]
struct Handle {
    raw: u64,
}

#[derive(Bean, Debug, Clone, Default, PartialEq)]
struct Node {
    value: i32,
    next: Option<Box<Node>>,
}

fn chain(len: i32) -> Node {
    let mut node = Node { value: len, next: None };
    for value in (1..len).rev() {
        node = Node {
            value,
            next: Some(Box::new(node)),
        };
    }
    node
}

#[test]
fn test_struct_schema_shape() {
    let ty = Account::type_of();
    assert_eq!(ty.to_string(), "Account");

    let mapper = BeanMapper::new();
    let descriptor = mapper.resolve(&ty);
    let names: Vec<&str> = descriptor.property_names().collect();
    assert_eq!(names, vec!["login", "balance", "id", "secret"]);

    let id = descriptor.property("id").expect("id");
    assert!(id.is_readable());
    assert!(!id.is_writeable());
    assert_eq!(id.declared_type(), &Type::U32);

    let secret = descriptor.property("secret").expect("secret");
    assert!(!secret.is_readable());
    assert!(secret.is_writeable());
    assert!(descriptor.property("session").is_none());
}

#[test]
fn test_struct_to_map_respects_attributes() {
    let mapper = BeanMapper::new();
    let account = Account {
        user: "ada".into(),
        balance: -5,
        id: 7,
        secret: "hunter2".into(),
        session: vec![1, 2, 3],
    };

    let map: BTreeMap<String, String> = mapper.convert_to(account).expect("to map");
    assert_eq!(map.get("login").map(String::as_str), Some("ada"));
    assert_eq!(map.get("balance").map(String::as_str), Some("-5"));
    assert_eq!(map.get("id").map(String::as_str), Some("7"));
    assert!(!map.contains_key("secret"));
    assert!(!map.contains_key("session"));
}

#[test]
fn test_map_to_struct_skips_read_only() {
    let mapper = BeanMapper::new();
    let map: HashMap<String, String> = [
        ("login", "grace"),
        ("balance", "42"),
        ("id", "99"),
        ("secret", "s3"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let account: Account = mapper.convert_to(map).expect("to struct");
    assert_eq!(account.user, "grace");
    assert_eq!(account.balance, 42);
    assert_eq!(account.id, 0);
    assert_eq!(account.secret, "s3");
    assert!(account.session.is_empty());
}

#[test]
fn test_enum_values() {
    let ty = Level::type_of();
    assert_eq!(ty.to_string(), "Level");

    assert_eq!(Level::High.into_value().as_variant(), Some("HIGH"));
    assert_eq!(Level::from_value(Value::from("Low")), Ok(Level::Low));
    assert!(matches!(
        Level::from_value(Value::from("High")),
        Err(AccessError::TypeMismatch { .. })
    ));
    assert!(matches!(
        Level::from_value(Value::Null),
        Err(AccessError::NullValue(_))
    ));

    let mapper = BeanMapper::new();
    let level: Level = mapper.convert_to("HIGH".to_string()).expect("from text");
    assert_eq!(level, Level::High);
    let text: String = mapper.convert_to(Level::Low).expect("to text");
    assert_eq!(text, "Low");
}

#[test]
fn test_renamed_type_and_nested_enum() {
    let mapper = BeanMapper::new();
    assert_eq!(TicketRecord::type_of().to_string(), "Ticket");

    let mut source: HashMap<String, Value> = HashMap::new();
    source.insert("title".into(), Value::from("outage"));
    source.insert("level".into(), Value::from("HIGH"));
    source.insert(
        "watchers".into(),
        Value::List(vec![Value::from("ops"), Value::I32(7)]),
    );

    let ticket: TicketRecord = mapper.convert_to(source).expect("ticket");
    assert_eq!(
        ticket,
        TicketRecord {
            title: "outage".into(),
            level: Level::High,
            watchers: vec!["ops".into(), "7".into()],
        }
    );
}

#[test]
fn test_generic_struct_binds_type_arguments() {
    let mapper = BeanMapper::new();
    assert_eq!(Page::<i32>::type_of().to_string(), "Page<i32>");

    let descriptor = mapper.resolve(&Page::<String>::type_of());
    let first = descriptor.property("first").expect("first");
    assert_eq!(first.declared_type(), &Type::Any);
    assert_eq!(first.generic_type(), &Type::String);

    let page = Page {
        first: 1,
        items: vec![1, 2, 3],
        total: 3,
    };
    let texts: Page<String> = mapper.convert_to(page).expect("convert");
    assert_eq!(texts.first, "1");
    assert_eq!(texts.items, vec!["1", "2", "3"]);
    assert_eq!(texts.total, 3);
}

#[test]
fn test_builder_struct() {
    let mapper = BeanMapper::new();
    let mut map: HashMap<String, Value> = HashMap::new();
    map.insert("x".into(), Value::from("3"));
    map.insert("y".into(), Value::I64(4));

    let point: Point = mapper.convert_to(map).expect("built");
    assert_eq!(
        point,
        Point {
            x: 3,
            y: 4,
            label: None,
            hits: 0,
        }
    );

    let partial: HashMap<String, i32> = [("x".to_string(), 1)].into_iter().collect();
    let err = mapper.convert_to::<_, Point>(partial).expect_err("y missing");
    assert!(matches!(
        err,
        Error::Access(AccessError::MissingProperty(ref name)) if name == "y"
    ));
}

#[test]
fn test_no_construct_struct_cannot_be_target() {
    let mapper = BeanMapper::new();
    let map: HashMap<String, u64> = [("raw".to_string(), 1)].into_iter().collect();
    let err = mapper.convert_to::<_, Handle>(map).expect_err("no instance");
    assert!(matches!(err, Error::Conversion { .. }));

    let out: HashMap<String, u64> = mapper.convert_to(Handle { raw: 9 }).expect("source works");
    assert_eq!(out.get("raw"), Some(&9));
}

#[test]
fn test_recursive_struct() {
    let mapper = BeanMapper::new();
    let descriptor = mapper.resolve(&Node::type_of());
    assert_eq!(
        descriptor.property("next").map(|p| p.declared_type().clone()),
        Some(Node::type_of())
    );

    let rebuild = ConversionOptions::default().with_reuse_policy(ReusePolicy::NoReuse);
    let copy = mapper
        .convert_with(chain(5).into_value(), &Node::type_of(), &Node::type_of(), rebuild.clone())
        .expect("rebuild");
    assert_eq!(Node::from_value(copy), Ok(chain(5)));

    let err = mapper
        .convert_with(
            chain(10).into_value(),
            &Node::type_of(),
            &Node::type_of(),
            rebuild.with_max_depth(3),
        )
        .expect_err("too deep");
    assert!(err.is_depth_exceeded());
}

#[test]
fn test_copy_bean_between_derived_types() {
    #[derive(Bean, Debug, Clone, Default)]
    struct AccountView {
        login: String,
        balance: String,
        id: i64,
    }

    let mapper = BeanMapper::new();
    let account = Account {
        user: "linus".into(),
        balance: 12,
        id: 3,
        ..Account::default()
    };
    let mut view = AccountView::default();
    mapper.copy_bean(&account, &mut view).expect("copy");
    assert_eq!(view.login, "linus");
    assert_eq!(view.balance, "12");
    assert_eq!(view.id, 3);
}
