/*
 * loader.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Decoding theme manifests from JSON and YAML.
 */

//! Manifest loading.
//!
//! Manifests are decoded from JSON or YAML and validated before they are
//! returned. When no format is known the JSON decoder is tried first, then
//! YAML.
//!
//! A directory is searched for the first of [`MANIFEST_FILENAMES`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, ThemeError};
use crate::manifest::Manifest;

/// Conventional manifest filenames, in search order.
pub const MANIFEST_FILENAMES: &[&str] = &[
    "theme.json",
    "theme.yaml",
    "theme.yml",
    "manifest.json",
    "manifest.yaml",
    "manifest.yml",
];

/// Serialization format of a manifest document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestFormat {
    Json,
    Yaml,
}

impl ManifestFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManifestFormat::Json => "json",
            ManifestFormat::Yaml => "yaml",
        }
    }

    /// Infer the format from a file extension; unknown extensions give `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

impl FromStr for ManifestFormat {
    type Err = ThemeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ManifestFormat::Json),
            "yaml" | "yml" => Ok(ManifestFormat::Yaml),
            _ => Err(ThemeError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ManifestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decode and validate a manifest from raw bytes.
///
/// `format` may be `"json"` or `"yaml"`/`"yml"`. Anything else, including
/// `None`, tries JSON then YAML.
pub fn load_bytes(data: &[u8], format: Option<&str>) -> Result<Manifest> {
    let declared = format.map(str::trim).filter(|f| !f.is_empty());
    let format = declared.and_then(|f| f.parse::<ManifestFormat>().ok());
    if let (Some(declared), None) = (declared, format) {
        tracing::debug!(format = declared, "Unknown manifest format, detecting");
    }
    decode(data, format)
}

/// Read a manifest file, inferring the format from its extension.
pub fn load_file(path: impl AsRef<Path>) -> Result<Manifest> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ThemeError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let format = ManifestFormat::from_path(path);
    match format {
        Some(format) => {
            tracing::debug!(path = %path.display(), format = %format, "Loading theme manifest")
        }
        None => tracing::debug!(path = %path.display(), "Loading theme manifest, detecting format"),
    }

    decode(&data, format).map_err(|source| ThemeError::InFile {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

/// Load the first conventional manifest file found in `dir`.
pub fn load_dir(dir: impl AsRef<Path>) -> Result<Manifest> {
    let dir = dir.as_ref();
    let found = MANIFEST_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file());

    match found {
        Some(path) => load_file(path),
        None => Err(ThemeError::NoManifestFound {
            dir: dir.to_path_buf(),
            candidates: MANIFEST_FILENAMES.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

fn decode(data: &[u8], format: Option<ManifestFormat>) -> Result<Manifest> {
    let manifest = match format {
        Some(format) => decode_as(data, format)?,
        None => match decode_as(data, ManifestFormat::Json) {
            Ok(manifest) => manifest,
            Err(_) => decode_as(data, ManifestFormat::Yaml)?,
        },
    };

    // An empty or null document is a manifest with nothing set
    let manifest = manifest.unwrap_or_default();
    manifest.validate()?;
    Ok(manifest)
}

/// Decode without validating. `None` means the document was empty or null.
fn decode_as(data: &[u8], format: ManifestFormat) -> Result<Option<Manifest>> {
    let decoded = match format {
        ManifestFormat::Json => serde_json::from_slice(data).map_err(|e| e.to_string()),
        ManifestFormat::Yaml if data.iter().all(u8::is_ascii_whitespace) => Ok(None),
        ManifestFormat::Yaml => serde_yaml::from_slice(data).map_err(|e| e.to_string()),
    };
    decoded.map_err(|message| ThemeError::Decode {
        format: format.as_str(),
        message,
    })
}
