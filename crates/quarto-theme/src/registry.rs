/*
 * registry.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * In-memory registry of versioned theme manifests.
 */

//! Registry of versioned theme manifests.
//!
//! The registry stores validated manifests keyed by name and version and
//! resolves lookups with an optional exact-version filter, falling back to
//! the latest version when allowed.
//!
//! # Thread Safety
//!
//! A single [`RwLock`] guards the whole name → version table. Registration
//! takes the write lock, so concurrent readers see either the complete
//! previous state or the complete new state. Lookups share the read lock.
//!
//! # Ownership
//!
//! Manifests are cloned on the way in and on the way out. Nothing returned
//! by the registry aliases its internal state.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use quarto_util::version::compare_versions;

use crate::error::{Result, ThemeError};
use crate::loader;
use crate::manifest::Manifest;
use crate::settings::ThemeSettings;

/// Summary of a stored manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRef {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl ManifestRef {
    fn of(manifest: &Manifest) -> Self {
        Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
        }
    }
}

/// Options controlling a registry lookup.
///
/// The default query asks for the latest version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeQuery {
    version: Option<String>,
    allow_fallback: bool,
}

impl Default for ThemeQuery {
    fn default() -> Self {
        Self {
            version: None,
            allow_fallback: true,
        }
    }
}

impl ThemeQuery {
    /// Query for the latest registered version.
    pub fn latest() -> Self {
        Self::default()
    }

    /// Request a specific version. Blank versions are ignored.
    pub fn with_version(mut self, version: impl AsRef<str>) -> Self {
        let version = version.as_ref().trim();
        self.version = (!version.is_empty()).then(|| version.to_string());
        self
    }

    /// Fail instead of falling back to the latest version when the requested
    /// version is missing.
    pub fn without_fallback(mut self) -> Self {
        self.allow_fallback = false;
        self
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn allows_fallback(&self) -> bool {
        self.allow_fallback
    }
}

/// Read-only registry access for downstream consumers.
pub trait ThemeProvider: Send + Sync {
    /// Fetch a manifest copy by name according to `query`.
    fn theme(&self, name: &str, query: &ThemeQuery) -> Result<Manifest>;

    /// List every stored manifest.
    fn themes(&self) -> Vec<ManifestRef>;
}

type VersionTable = HashMap<String, HashMap<String, Manifest>>;

/// In-memory theme registry.
///
/// Construct one per application (or per test) and share it behind an
/// `Arc`; there is no process-wide instance.
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    themes: RwLock<VersionTable>,
}

impl ThemeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a copy of a manifest.
    ///
    /// An existing entry with the same name and version is replaced.
    pub fn register(&self, manifest: &Manifest) -> Result<()> {
        manifest.validate()?;

        let stored = manifest.clone();
        let mut themes = self.write();
        themes
            .entry(stored.name.clone())
            .or_default()
            .insert(stored.version.clone(), stored);

        tracing::debug!(
            theme = %manifest.name,
            version = %manifest.version,
            "Registered theme manifest"
        );
        Ok(())
    }

    /// Register a manifest that may be absent.
    pub fn register_optional(&self, manifest: Option<&Manifest>) -> Result<()> {
        match manifest {
            Some(manifest) => self.register(manifest),
            None => Err(ThemeError::NilManifest),
        }
    }

    /// Load the manifest in `dir` and register it.
    pub fn register_dir(&self, dir: impl AsRef<Path>) -> Result<ManifestRef> {
        let manifest = loader::load_dir(dir)?;
        self.register(&manifest)?;
        Ok(ManifestRef::of(&manifest))
    }

    /// Register the manifest found in each configured directory, in order.
    pub fn load_settings_dirs(&self, settings: &ThemeSettings) -> Result<Vec<ManifestRef>> {
        settings
            .manifest_dirs
            .iter()
            .map(|dir| self.register_dir(dir))
            .collect()
    }

    /// Fetch a manifest copy by name.
    ///
    /// With an exact version in `query` that version is returned if present.
    /// A missing exact version falls back to the latest version unless the
    /// query disables fallback.
    pub fn get(&self, name: &str, query: &ThemeQuery) -> Result<Manifest> {
        if name.trim().is_empty() {
            return Err(ThemeError::NameRequired);
        }

        let themes = self.read();
        let versions = match themes.get(name) {
            Some(versions) if !versions.is_empty() => versions,
            _ => return Err(not_found(name)),
        };

        if let Some(version) = query.version() {
            if let Some(manifest) = versions.get(version) {
                return Ok(manifest.clone());
            }
            if !query.allows_fallback() {
                return Err(ThemeError::VersionNotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                });
            }
            tracing::debug!(
                theme = name,
                requested = version,
                "Theme version not registered, falling back to latest"
            );
        }

        latest(versions)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    /// All stored manifests, by name ascending then version newest first.
    pub fn list(&self) -> Vec<ManifestRef> {
        let mut refs: Vec<ManifestRef> = self
            .read()
            .values()
            .flat_map(|versions| versions.values().map(ManifestRef::of))
            .collect();

        refs.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| compare_versions(&b.version, &a.version))
                .then_with(|| b.version.cmp(&a.version))
        });
        refs
    }

    /// Registered versions of a theme, newest first.
    pub fn versions(&self, name: &str) -> Vec<String> {
        let themes = self.read();
        let mut versions: Vec<String> = themes
            .get(name)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default();
        versions.sort_by(|a, b| compare_versions(b, a).then_with(|| b.cmp(a)));
        versions
    }

    /// Check if any version of a theme is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.read()
            .get(name)
            .is_some_and(|versions| !versions.is_empty())
    }

    /// Number of stored (name, version) entries.
    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every write leaves the table consistent, so a poisoned lock is still
    // safe to use.
    fn read(&self) -> RwLockReadGuard<'_, VersionTable> {
        self.themes.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VersionTable> {
        self.themes.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ThemeProvider for ThemeRegistry {
    fn theme(&self, name: &str, query: &ThemeQuery) -> Result<Manifest> {
        self.get(name, query)
    }

    fn themes(&self) -> Vec<ManifestRef> {
        self.list()
    }
}

fn not_found(name: &str) -> ThemeError {
    ThemeError::ThemeNotFound {
        name: name.to_string(),
    }
}

/// Highest version by [`compare_versions`]; ties broken by string order so
/// the choice does not depend on hash iteration order.
fn latest(versions: &HashMap<String, Manifest>) -> Option<&Manifest> {
    versions
        .iter()
        .max_by(|(a, _), (b, _)| compare_versions(a, b).then_with(|| a.cmp(b)))
        .map(|(_, manifest)| manifest)
}
