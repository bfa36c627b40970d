//! Theme manifests for Quarto.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! This crate provides:
//! - Theme manifests (tokens, fonts, templates, assets) with named variants
//! - An in-memory, thread-safe registry of versioned manifests
//! - Theme/variant selection with default fallbacks
//! - Variant-aware resolution of tokens, CSS variables, templates and asset URLs
//! - Manifest loading from JSON and YAML files

pub mod error;
pub mod loader;
pub mod manifest;
pub mod path;
pub mod registry;
pub mod selection;
pub mod selector;
pub mod settings;

pub use error::{Result, ThemeError, ValidationError};
pub use loader::{MANIFEST_FILENAMES, ManifestFormat, load_bytes, load_dir, load_file};
pub use manifest::{Assets, DEFAULT_CSS_PREFIX, Manifest, StringMap, Variant, validate_manifest};
pub use path::join_asset_path;
pub use registry::{ManifestRef, ThemeProvider, ThemeQuery, ThemeRegistry};
pub use selection::{RendererConfig, ResolvedSelection, Selection};
pub use selector::Selector;
pub use settings::ThemeSettings;

pub use quarto_util::version::compare_versions;
