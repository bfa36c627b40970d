/*
 * settings.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Theme selection settings.
//!
//! Settings are usually a small block of project configuration:
//!
//! ```yaml
//! default-theme: default
//! default-variant: light
//! manifest-dirs:
//!   - themes/default
//!   - themes/brand
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ThemeSettings {
    /// Theme used when none is requested or the requested one is missing.
    pub default_theme: String,

    /// Variant used when none is requested.
    pub default_variant: String,

    /// Directories containing a theme manifest to register at startup.
    pub manifest_dirs: Vec<PathBuf>,
}

impl ThemeSettings {
    /// Parse settings from YAML. An empty or null document gives defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str::<Option<Self>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| ThemeError::Decode {
                format: "yaml",
                message: e.to_string(),
            })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ThemeError::Decode {
            format: "json",
            message: e.to_string(),
        })
    }
}
