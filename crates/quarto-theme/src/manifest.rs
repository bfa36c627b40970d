/*
 * manifest.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Theme manifest schema and structural validation.
 */

//! Theme manifest schema.
//!
//! A [`Manifest`] is the shape of a theme file: a named, versioned set of
//! design tokens, fonts, template overrides and asset paths. Named
//! [`Variant`]s (e.g. `dark`) overlay parts of the base definition; any field
//! a variant leaves empty is inherited from the base.
//!
//! Manifests are plain data. Merging a variant over the base is done by
//! explicit per-family functions ([`Manifest::tokens_for_variant`] here, and
//! the template/asset resolution in [`crate::selection`]).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError, ValidationError};

/// Ordered string-to-string map used for every manifest map family.
pub type StringMap = BTreeMap<String, String>;

/// CSS custom property prefix used when none is given.
pub const DEFAULT_CSS_PREFIX: &str = "--";

/// A theme definition consumable by downstream renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tokens: StringMap,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fonts: StringMap,

    #[serde(default, skip_serializing_if = "Assets::is_empty")]
    pub assets: Assets,

    /// Logical template key (e.g. `forms.input`) to template path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: StringMap,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<String, Variant>,
}

/// Static assets plus an optional path or CDN root.
///
/// `prefix` may be a path segment (`/static`) or an absolute URL containing
/// `://` (`https://cdn.example.com/theme`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub files: StringMap,
}

impl Assets {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            files: StringMap::new(),
        }
    }

    /// Add an asset file under a logical key.
    pub fn with_file(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.files.insert(key.into(), path.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty() && self.files.is_empty()
    }
}

/// Token, template and asset overrides for a named variant (light/dark...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tokens: StringMap,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: StringMap,

    #[serde(default, skip_serializing_if = "Assets::is_empty")]
    pub assets: Assets,
}

impl Variant {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(key.into(), value.into());
        self
    }

    pub fn with_template(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.templates.insert(key.into(), path.into());
        self
    }

    pub fn with_assets(mut self, assets: Assets) -> Self {
        self.assets = assets;
        self
    }
}

impl Manifest {
    /// Create an empty manifest with the given identity.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tokens.insert(key.into(), value.into());
        self
    }

    pub fn with_font(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fonts.insert(key.into(), value.into());
        self
    }

    pub fn with_template(mut self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.templates.insert(key.into(), path.into());
        self
    }

    pub fn with_assets(mut self, assets: Assets) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_variant(mut self, name: impl Into<String>, variant: Variant) -> Self {
        self.variants.insert(name.into(), variant);
        self
    }

    /// Look up a variant by exact name.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.get(name)
    }

    /// Check required fields and the integrity of every map and variant.
    ///
    /// All issues are collected before returning, so a single error lists
    /// everything that needs fixing.
    pub fn validate(&self) -> Result<()> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push("name is required".to_string());
        }
        if self.version.trim().is_empty() {
            issues.push("version is required".to_string());
        }

        check_map(&mut issues, "tokens", &self.tokens);
        check_map(&mut issues, "fonts", &self.fonts);
        check_map(&mut issues, "templates", &self.templates);
        check_map(&mut issues, "assets.files", &self.assets.files);

        for (name, variant) in &self.variants {
            if name.trim().is_empty() {
                issues.push("variant name cannot be empty".to_string());
            }
            check_map(&mut issues, &format!("variants.{}.tokens", name), &variant.tokens);
            check_map(
                &mut issues,
                &format!("variants.{}.templates", name),
                &variant.templates,
            );
            check_map(
                &mut issues,
                &format!("variants.{}.assets.files", name),
                &variant.assets.files,
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues).into())
        }
    }

    /// Base tokens with the named variant's tokens laid over them.
    ///
    /// Always returns a fresh map; an unknown or empty variant yields a copy
    /// of the base tokens.
    pub fn tokens_for_variant(&self, variant: &str) -> StringMap {
        let mut merged = self.tokens.clone();
        if variant.is_empty() {
            return merged;
        }
        if let Some(selected) = self.variants.get(variant) {
            merged.extend(
                selected
                    .tokens
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        merged
    }

    /// Variant-merged tokens keyed as CSS custom properties.
    ///
    /// Each key is `prefix + token`; an empty prefix means `--`.
    pub fn css_variables(&self, prefix: &str, variant: &str) -> StringMap {
        let prefix = if prefix.is_empty() {
            DEFAULT_CSS_PREFIX
        } else {
            prefix
        };
        self.tokens_for_variant(variant)
            .into_iter()
            .map(|(k, v)| (format!("{}{}", prefix, k), v))
            .collect()
    }
}

/// Validate a manifest that may be absent.
///
/// A missing manifest is reported on its own rather than folded into the
/// aggregated issue list.
pub fn validate_manifest(manifest: Option<&Manifest>) -> Result<()> {
    match manifest {
        Some(manifest) => manifest.validate(),
        None => Err(ThemeError::NilManifest),
    }
}

fn check_map(issues: &mut Vec<String>, label: &str, values: &StringMap) {
    for (key, value) in values {
        if key.trim().is_empty() {
            issues.push(format!("{} has empty key", label));
        }
        if value.trim().is_empty() {
            issues.push(format!("{} entry '{}' is empty", label, key));
        }
    }
}
