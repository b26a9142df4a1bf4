// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! YAML conversion option profiles.
//!
//! Named sets of [`ConversionOptions`] kept outside the code.
//!
//! # Example YAML
//!
//! ```yaml
//! # mapping.yaml
//! default_profile: lenient
//!
//! profiles:
//!   lenient:
//!     ignore_null: true
//!     thrown_if_any_fails: false
//!     ignored_properties: [password]
//!
//!   export:
//!     reuse_policy: NO_REUSE
//!     deep_copy: true
//!     charset: UTF-16LE
//!     number_format:
//!       decimal_places: 2
//!       grouping: ","
//! ```

use crate::convert::{Charset, NumberFormat};
use crate::error::{Error, Result};
use crate::options::{ConversionOptions, ReusePolicy};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Loader for YAML option profiles.
pub struct OptionsLoader;

/// Root YAML document structure.
#[derive(Debug, Deserialize)]
pub struct YamlOptionsDocument {
    /// Named profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, YamlOptionsProfile>,

    /// Default profile name (optional).
    #[serde(default)]
    pub default_profile: Option<String>,
}

/// A single option profile. Absent keys keep their defaults.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlOptionsProfile {
    pub ignored_properties: Option<Vec<String>>,
    pub ignore_null: Option<bool>,
    pub thrown_if_any_fails: Option<bool>,
    pub put_if_not_contained: Option<bool>,

    /// NO_REUSE, REUSE_IF_ASSIGNABLE or REUSE_IF_EQUAL
    pub reuse_policy: Option<String>,

    pub deep_copy: Option<bool>,

    /// UTF-8, UTF-16LE, UTF-16BE, ISO-8859-1 or US-ASCII
    pub charset: Option<String>,

    pub number_format: Option<YamlNumberFormat>,
    pub max_depth: Option<usize>,
}

/// Number format in YAML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct YamlNumberFormat {
    pub decimal_places: Option<usize>,
    /// A single separator character
    pub grouping: Option<String>,
}

impl OptionsLoader {
    /// Load profiles from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<YamlOptionsDocument> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read YAML file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::parse_yaml(&content)
    }

    /// Parse YAML content.
    pub fn parse_yaml(content: &str) -> Result<YamlOptionsDocument> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse YAML: {}", e)))
    }

    /// Options of a named profile.
    pub fn get_profile(doc: &YamlOptionsDocument, name: &str) -> Result<ConversionOptions> {
        let profile = doc
            .profiles
            .get(name)
            .ok_or_else(|| Error::Config(format!("Profile '{}' not found", name)))?;
        Self::profile_to_options(profile)
    }

    /// Options of the default profile, else of the first profile by name,
    /// else the defaults.
    pub fn get_default_profile(doc: &YamlOptionsDocument) -> Result<ConversionOptions> {
        if let Some(ref default_name) = doc.default_profile {
            Self::get_profile(doc, default_name)
        } else if let Some(profile) = doc.profiles.values().next() {
            Self::profile_to_options(profile)
        } else {
            Ok(ConversionOptions::default())
        }
    }

    /// Convert a YAML profile to options.
    pub fn profile_to_options(profile: &YamlOptionsProfile) -> Result<ConversionOptions> {
        let mut options = ConversionOptions::default();

        if let Some(ref names) = profile.ignored_properties {
            options.ignored_properties = names.iter().cloned().collect();
        }
        if let Some(flag) = profile.ignore_null {
            options.ignore_null = flag;
        }
        if let Some(flag) = profile.thrown_if_any_fails {
            options.thrown_if_any_fails = flag;
        }
        if let Some(flag) = profile.put_if_not_contained {
            options.put_if_not_contained = flag;
        }

        if let Some(ref policy) = profile.reuse_policy {
            options.reuse_policy = match policy.to_uppercase().as_str() {
                "NO_REUSE" => ReusePolicy::NoReuse,
                "REUSE_IF_ASSIGNABLE" => ReusePolicy::ReuseIfAssignable,
                "REUSE_IF_EQUAL" => ReusePolicy::ReuseIfEqual,
                other => return Err(Error::Config(format!("Invalid reuse policy: {}", other))),
            };
        }

        if let Some(flag) = profile.deep_copy {
            options.deep_copy = flag;
        }
        if let Some(ref charset) = profile.charset {
            options.charset = charset.parse::<Charset>()?;
        }

        if let Some(ref format) = profile.number_format {
            let mut number_format = NumberFormat::default();
            if let Some(places) = format.decimal_places {
                number_format = number_format.with_decimal_places(places);
            }
            if let Some(ref grouping) = format.grouping {
                let mut chars = grouping.chars();
                match (chars.next(), chars.next()) {
                    (Some(separator), None) => {
                        number_format = number_format.with_grouping(separator);
                    }
                    _ => {
                        return Err(Error::Config(format!(
                            "Invalid grouping separator: {:?}",
                            grouping
                        )))
                    }
                }
            }
            options.number_format = number_format;
        }

        if let Some(depth) = profile.max_depth {
            if depth == 0 {
                return Err(Error::Config("max_depth must be positive".to_string()));
            }
            options.max_depth = depth;
        }

        Ok(options)
    }
}
