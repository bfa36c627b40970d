/*
 * selection.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Variant-aware resolution of tokens, templates and assets.
 */

//! Resolution over a selected theme and variant.
//!
//! A [`Selection`] pairs a manifest with the variant chosen for it and
//! answers lookups with strict variant → base → fallback precedence.
//! Every accessor degrades gracefully when no manifest is present: maps come
//! back empty, templates return their fallback and assets are not found.

use std::fmt;

use serde::Serialize;

use crate::manifest::{Assets, DEFAULT_CSS_PREFIX, Manifest, StringMap, Variant};
use crate::path::join_asset_path;

/// The chosen theme, variant and manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub theme: String,
    pub variant: String,
    pub manifest: Option<Manifest>,
}

/// A fully merged, self-contained view of a [`Selection`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    pub theme: String,
    pub variant: String,
    pub tokens: StringMap,
    pub templates: StringMap,
    /// Asset keys mapped to prefix-joined paths or URLs.
    pub assets: StringMap,
    /// The active asset prefix (variant prefix if set, else base), without a
    /// trailing slash.
    pub asset_prefix: String,
}

/// Resolved partials, tokens, CSS variables and an asset lookup for a
/// renderer.
pub struct RendererConfig {
    pub theme: String,
    pub variant: String,
    pub partials: StringMap,
    pub tokens: StringMap,
    pub css_vars: StringMap,
    asset_url: Box<dyn Fn(&str) -> String + Send + Sync>,
}

impl RendererConfig {
    /// Resolve an asset key, or `""` when it is not defined.
    pub fn asset_url(&self, key: &str) -> String {
        (self.asset_url)(key)
    }
}

impl fmt::Debug for RendererConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererConfig")
            .field("theme", &self.theme)
            .field("variant", &self.variant)
            .field("partials", &self.partials)
            .field("tokens", &self.tokens)
            .field("css_vars", &self.css_vars)
            .finish_non_exhaustive()
    }
}

impl Selection {
    pub fn new(theme: impl Into<String>, variant: impl Into<String>, manifest: Manifest) -> Self {
        Self {
            theme: theme.into(),
            variant: variant.into(),
            manifest: Some(manifest),
        }
    }

    /// Merged tokens for the selected variant.
    pub fn tokens(&self) -> StringMap {
        self.manifest
            .as_ref()
            .map(|m| m.tokens_for_variant(&self.variant))
            .unwrap_or_default()
    }

    /// CSS variables for the selected variant; an empty prefix means `--`.
    pub fn css_variables(&self, prefix: &str) -> StringMap {
        self.manifest
            .as_ref()
            .map(|m| m.css_variables(prefix, &self.variant))
            .unwrap_or_default()
    }

    /// Resolve a template key: variant override, then base, then `fallback`.
    pub fn template(&self, key: &str, fallback: &str) -> String {
        let key = key.trim();
        let Some(manifest) = self.manifest.as_ref() else {
            return fallback.to_string();
        };
        if key.is_empty() {
            return fallback.to_string();
        }

        self.variant_templates()
            .and_then(|templates| non_empty(templates, key))
            .or_else(|| non_empty(&manifest.templates, key))
            .map_or_else(|| fallback.to_string(), str::to_string)
    }

    /// Resolve each key of `fallbacks`, keeping one entry per input key.
    pub fn partials(&self, fallbacks: &StringMap) -> StringMap {
        fallbacks
            .iter()
            .map(|(key, fallback)| (key.clone(), self.template(key, fallback)))
            .collect()
    }

    /// Resolve an asset key to a prefixed path or URL.
    ///
    /// Variant files win over base files; both are joined with the active
    /// prefix.
    pub fn asset(&self, key: &str) -> Option<String> {
        let manifest = self.manifest.as_ref()?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        let variant_assets = self.variant_assets();
        let prefix = active_prefix(&manifest.assets, variant_assets);

        variant_assets
            .and_then(|assets| non_empty(&assets.files, key))
            .or_else(|| non_empty(&manifest.assets.files, key))
            .map(|path| join_asset_path(prefix, path))
    }

    /// Bundle partials, tokens, CSS variables and asset lookup for renderers.
    pub fn renderer_theme(&self, fallbacks: &StringMap) -> RendererConfig {
        let lookup = self.clone();
        RendererConfig {
            theme: self.theme.clone(),
            variant: self.variant.clone(),
            partials: self.partials(fallbacks),
            tokens: self.tokens(),
            css_vars: self.css_variables(DEFAULT_CSS_PREFIX),
            asset_url: Box::new(move |key| lookup.asset(key).unwrap_or_default()),
        }
    }

    /// Compute the fully merged view in one pass.
    ///
    /// Assets from both the base and the variant are joined with the same
    /// active prefix that [`Selection::asset`] uses.
    pub fn snapshot(&self) -> ResolvedSelection {
        let mut resolved = ResolvedSelection {
            theme: self.theme.clone(),
            variant: self.variant.clone(),
            ..ResolvedSelection::default()
        };
        let Some(manifest) = self.manifest.as_ref() else {
            return resolved;
        };

        resolved.tokens = manifest.tokens_for_variant(&self.variant);
        resolved.templates = overlay(&manifest.templates, self.variant_templates());

        let variant_assets = self.variant_assets();
        let prefix = active_prefix(&manifest.assets, variant_assets);
        resolved.assets = overlay(&manifest.assets.files, variant_assets.map(|a| &a.files))
            .into_iter()
            .map(|(key, path)| {
                let url = join_asset_path(prefix, &path);
                (key, url)
            })
            .collect();
        resolved.asset_prefix = prefix.to_string();
        resolved
    }

    fn selected_variant(&self) -> Option<&Variant> {
        if self.variant.is_empty() {
            return None;
        }
        self.manifest.as_ref()?.variant(&self.variant)
    }

    fn variant_templates(&self) -> Option<&StringMap> {
        self.selected_variant().map(|v| &v.templates)
    }

    fn variant_assets(&self) -> Option<&Assets> {
        self.selected_variant().map(|v| &v.assets)
    }
}

/// Variant prefix if non-blank, else the base prefix; one trailing `/`
/// removed.
fn active_prefix<'a>(base: &'a Assets, variant: Option<&'a Assets>) -> &'a str {
    let prefix = variant
        .map(|v| v.prefix.as_str())
        .filter(|p| !p.trim().is_empty())
        .unwrap_or(base.prefix.as_str());
    prefix.strip_suffix('/').unwrap_or(prefix)
}

fn non_empty<'a>(map: &'a StringMap, key: &str) -> Option<&'a str> {
    map.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

/// Key-by-key union of `base` and `over`; non-empty `over` values win.
fn overlay(base: &StringMap, over: Option<&StringMap>) -> StringMap {
    let mut merged = base.clone();
    for (key, value) in over.into_iter().flatten() {
        if !value.is_empty() {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn template_manifest() -> Manifest {
        Manifest::new("default", "1.0.0")
            .with_template("forms.input", "base.tmpl")
            .with_variant(
                "dark",
                Variant::new().with_template("forms.input", "dark.tmpl"),
            )
    }

    fn asset_manifest() -> Manifest {
        Manifest::new("default", "1.0.0")
            .with_assets(
                Assets::new("/static")
                    .with_file("logo", "logo.png")
                    .with_file("banner", "/images/banner.png"),
            )
            .with_variant(
                "dark",
                Variant::new().with_assets(
                    Assets::new("https://cdn.example.com/theme/")
                        .with_file("logo", "logo-dark.png"),
                ),
            )
    }

    fn map(entries: &[(&str, &str)]) -> StringMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_template_precedence() {
        let dark = Selection::new("default", "dark", template_manifest());
        assert_eq!(dark.template("forms.input", "fb"), "dark.tmpl");
        assert_eq!(dark.template("forms.select", "fb"), "fb");

        let light = Selection::new("default", "light", template_manifest());
        assert_eq!(light.template("forms.input", "fb"), "base.tmpl");
    }

    #[test]
    fn test_template_trims_key() {
        let sel = Selection::new("default", "dark", template_manifest());
        assert_eq!(sel.template("  forms.input ", "fb"), "dark.tmpl");
        assert_eq!(sel.template("   ", "fb"), "fb");
    }

    #[test]
    fn test_template_empty_variant_value_falls_through() {
        let manifest = template_manifest()
            .with_variant("blank", Variant::new().with_template("forms.input", ""));
        let sel = Selection::new("default", "blank", manifest);
        assert_eq!(sel.template("forms.input", "fb"), "base.tmpl");
    }

    #[test]
    fn test_partials_preserves_keys() {
        let sel = Selection::new("default", "dark", template_manifest());
        let partials = sel.partials(&map(&[
            ("forms.input", "fallback/input.tmpl"),
            ("forms.select", "fallback/select.tmpl"),
        ]));
        assert_eq!(
            partials,
            map(&[
                ("forms.input", "dark.tmpl"),
                ("forms.select", "fallback/select.tmpl"),
            ])
        );
    }

    #[test]
    fn test_asset_variant_cdn_prefix() {
        let sel = Selection::new("default", "dark", asset_manifest());
        assert_eq!(
            sel.asset("logo").as_deref(),
            Some("https://cdn.example.com/theme/logo-dark.png")
        );
    }

    #[test]
    fn test_asset_base_file_uses_variant_prefix() {
        let sel = Selection::new("default", "dark", asset_manifest());
        assert_eq!(
            sel.asset("banner").as_deref(),
            Some("https://cdn.example.com/theme/images/banner.png")
        );
    }

    #[test]
    fn test_asset_base_prefix_normalized() {
        let sel = Selection::new("default", "", asset_manifest());
        assert_eq!(sel.asset("banner").as_deref(), Some("/static/images/banner.png"));
        assert_eq!(sel.asset("logo").as_deref(), Some("/static/logo.png"));
    }

    #[test]
    fn test_asset_cdn_prefix_double_slash_file() {
        let manifest = Manifest::new("default", "1.0.0").with_assets(
            Assets::new("https://cdn.example.com/theme/").with_file("logo", "//logo.png"),
        );
        let sel = Selection::new("default", "", manifest);
        assert_eq!(
            sel.asset("logo").as_deref(),
            Some("https://cdn.example.com/theme/logo.png")
        );
    }

    #[test]
    fn test_asset_not_found() {
        let sel = Selection::new("default", "dark", asset_manifest());
        assert_eq!(sel.asset("missing"), None);
        assert_eq!(sel.asset(" "), None);
    }

    #[test]
    fn test_missing_manifest_degrades() {
        let sel = Selection {
            theme: "default".to_string(),
            variant: "dark".to_string(),
            manifest: None,
        };
        assert!(sel.tokens().is_empty());
        assert!(sel.css_variables("").is_empty());
        assert_eq!(sel.template("forms.input", "fb"), "fb");
        assert_eq!(sel.asset("logo"), None);
        assert_eq!(
            sel.partials(&map(&[("a", "fa")])),
            map(&[("a", "fa")])
        );

        let snapshot = sel.snapshot();
        assert_eq!(snapshot.theme, "default");
        assert!(snapshot.tokens.is_empty());
        assert!(snapshot.assets.is_empty());
        assert_eq!(snapshot.asset_prefix, "");
    }

    #[test]
    fn test_renderer_theme() {
        let manifest = Manifest::new("default", "1.0.0")
            .with_token("primary", "blue")
            .with_variant("dark", Variant::new().with_token("primary", "black"));
        let sel = Selection::new("default", "dark", manifest);

        let cfg = sel.renderer_theme(&map(&[("forms.input", "fallback/input.tmpl")]));
        assert_eq!(cfg.tokens["primary"], "black");
        assert_eq!(cfg.css_vars["--primary"], "black");
        assert_eq!(cfg.partials["forms.input"], "fallback/input.tmpl");
        assert_eq!(cfg.asset_url("missing"), "");
        assert_eq!(cfg.theme, "default");
        assert_eq!(cfg.variant, "dark");
    }

    #[test]
    fn test_renderer_theme_asset_url() {
        let sel = Selection::new("default", "", asset_manifest());
        let cfg = sel.renderer_theme(&StringMap::new());
        assert_eq!(cfg.asset_url("logo"), "/static/logo.png");
    }

    #[test]
    fn test_snapshot_merges_everything() {
        let manifest = asset_manifest()
            .with_token("primary", "blue")
            .with_template("forms.input", "base.tmpl")
            .with_template("forms.select", "select.tmpl")
            .with_variant(
                "dark",
                Variant::new()
                    .with_token("primary", "black")
                    .with_template("forms.input", "dark.tmpl")
                    .with_assets(
                        Assets::new("https://cdn.example.com/theme/")
                            .with_file("logo", "logo-dark.png")
                            .with_file("icon", "/icon.svg"),
                    ),
            );
        let snapshot = Selection::new("default", "dark", manifest).snapshot();

        assert_eq!(
            snapshot,
            ResolvedSelection {
                theme: "default".to_string(),
                variant: "dark".to_string(),
                tokens: map(&[("primary", "black")]),
                templates: map(&[
                    ("forms.input", "dark.tmpl"),
                    ("forms.select", "select.tmpl"),
                ]),
                assets: map(&[
                    ("banner", "https://cdn.example.com/theme/images/banner.png"),
                    ("icon", "https://cdn.example.com/theme/icon.svg"),
                    ("logo", "https://cdn.example.com/theme/logo-dark.png"),
                ]),
                asset_prefix: "https://cdn.example.com/theme".to_string(),
            }
        );
    }

    #[test]
    fn test_snapshot_agrees_with_asset() {
        let sel = Selection::new("default", "dark", asset_manifest());
        let snapshot = sel.snapshot();
        for (key, url) in &snapshot.assets {
            assert_eq!(sel.asset(key).as_ref(), Some(url));
        }
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let sel = Selection::new("default", "dark", asset_manifest());
        let first = sel.snapshot();
        let second = sel.snapshot();
        assert_eq!(first, second);
        assert_eq!(sel.manifest, Some(asset_manifest()));
    }

    #[test]
    fn test_snapshot_base_prefix() {
        let snapshot = Selection::new("default", "light", asset_manifest()).snapshot();
        assert_eq!(snapshot.asset_prefix, "/static");
        assert_eq!(snapshot.assets["logo"], "/static/logo.png");
    }
}
