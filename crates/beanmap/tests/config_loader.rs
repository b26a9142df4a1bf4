// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![cfg(feature = "config-loaders")]
#![allow(clippy::missing_panics_doc)] // Tests panic on failure

//! YAML option profiles loaded from disk and applied to a mapper.

use beanmap::config::OptionsLoader;
use beanmap::{BeanMapper, Charset, Error, ReusePolicy, Type, Value};
use std::io::Write;
use tempfile::NamedTempFile;

const PROFILES: &str = r#"
default_profile: report

profiles:
  report:
    ignored_properties: [password]
    number_format:
      decimal_places: 2
      grouping: ","
  strict:
    reuse_policy: NO_REUSE
    charset: ISO-8859-1
    max_depth: 4
"#;

fn write_profiles(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write yaml");
    file.flush().expect("flush");
    file
}

#[test]
fn test_load_profiles_from_file() {
    let file = write_profiles(PROFILES);
    let doc = OptionsLoader::load_from_file(file.path()).expect("load");
    assert_eq!(doc.profiles.len(), 2);

    let strict = OptionsLoader::get_profile(&doc, "strict").expect("strict");
    assert_eq!(strict.reuse_policy, ReusePolicy::NoReuse);
    assert_eq!(strict.charset, Charset::Latin1);
    assert_eq!(strict.max_depth, 4);
}

#[test]
fn test_default_profile_drives_mapper() {
    let file = write_profiles(PROFILES);
    let doc = OptionsLoader::load_from_file(file.path()).expect("load");
    let report = OptionsLoader::get_default_profile(&doc).expect("default");

    let mapper = BeanMapper::new();
    mapper.set_default_options(report);

    let text = mapper
        .convert(Value::F64(1234.5), &Type::F64, &Type::String)
        .expect("format");
    assert_eq!(text, Value::from("1,234.50"));

    let src: Value = [("user", "ada"), ("password", "secret")].into_iter().collect();
    let mut dst = Value::Map(Default::default());
    let map_ty = Type::map(Type::String, Type::String);
    mapper
        .copy_properties(&src, &map_ty, &mut dst, &map_ty)
        .expect("copy");
    assert_eq!(dst.get("user"), Some(&Value::from("ada")));
    assert_eq!(dst.get("password"), None);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = OptionsLoader::load_from_file(dir.path().join("absent.yaml")).expect_err("missing");
    assert!(matches!(err, Error::Config(ref msg) if msg.contains("absent.yaml")));
}

#[test]
fn test_invalid_file_is_config_error() {
    let file = write_profiles("profiles:\n  bad:\n    max_depth: 0\n");
    let doc = OptionsLoader::load_from_file(file.path()).expect("parses");
    assert!(matches!(
        OptionsLoader::get_profile(&doc, "bad"),
        Err(Error::Config(_))
    ));
}
