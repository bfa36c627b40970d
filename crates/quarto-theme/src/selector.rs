/*
 * selector.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Theme/variant selection with default fallbacks.
 */

//! Theme selection.
//!
//! [`Selector`] picks a theme and variant from a [`ThemeProvider`], filling
//! in the configured defaults when the caller supplies none and retrying the
//! default theme when the requested one cannot be resolved.

use std::sync::Arc;

use crate::error::{Result, ThemeError};
use crate::registry::{ThemeProvider, ThemeQuery};
use crate::selection::Selection;
use crate::settings::ThemeSettings;

/// Selects themes from a registry with default theme/variant fallbacks.
#[derive(Clone, Default)]
pub struct Selector {
    pub registry: Option<Arc<dyn ThemeProvider>>,
    pub default_theme: String,
    pub default_variant: String,
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("registry", &self.registry.as_ref().map(|_| "ThemeProvider"))
            .field("default_theme", &self.default_theme)
            .field("default_variant", &self.default_variant)
            .finish()
    }
}

impl Selector {
    /// Create a selector over `registry` with no defaults.
    pub fn new(registry: Arc<dyn ThemeProvider>) -> Self {
        Self {
            registry: Some(registry),
            ..Self::default()
        }
    }

    /// Create a selector using the defaults from `settings`.
    pub fn from_settings(registry: Arc<dyn ThemeProvider>, settings: &ThemeSettings) -> Self {
        Self::new(registry)
            .with_default_theme(settings.default_theme.clone())
            .with_default_variant(settings.default_variant.clone())
    }

    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }

    pub fn with_default_variant(mut self, variant: impl Into<String>) -> Self {
        self.default_variant = variant.into();
        self
    }

    /// Resolve a theme and variant into a [`Selection`].
    ///
    /// A blank theme name means the default theme. If the lookup fails and a
    /// different default theme is configured, the default is tried before
    /// giving up. An empty variant means the default variant; the variant is
    /// not checked against the manifest.
    pub fn select(&self, theme_name: &str, variant: &str, query: &ThemeQuery) -> Result<Selection> {
        let mut theme_name = theme_name.trim();
        if theme_name.is_empty() {
            theme_name = self.default_theme.as_str();
        }

        let registry = self
            .registry
            .as_ref()
            .ok_or(ThemeError::RegistryUnconfigured)?;

        let manifest = match registry.theme(theme_name, query) {
            Ok(manifest) => Ok(manifest),
            Err(err) if !self.default_theme.is_empty() && theme_name != self.default_theme => {
                tracing::warn!(
                    theme = theme_name,
                    default = %self.default_theme,
                    error = %err,
                    "Theme not resolved, falling back to default theme"
                );
                registry.theme(&self.default_theme, query)
            }
            Err(err) => Err(err),
        }
        .map_err(|err| ThemeError::ResolveFailed {
            source: Box::new(err),
        })?;

        let variant = if variant.is_empty() {
            self.default_variant.as_str()
        } else {
            variant
        };

        Ok(Selection {
            theme: theme_name.to_string(),
            variant: variant.to_string(),
            manifest: Some(manifest),
        })
    }
}
