/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for quarto-theme

use std::path::PathBuf;

use thiserror::Error;

/// Aggregated manifest validation issues.
///
/// Validation never stops at the first problem; every issue found in a
/// manifest is collected here so it can be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("manifest validation failed: {}", .issues.join("; "))]
pub struct ValidationError {
    pub issues: Vec<String>,
}

impl ValidationError {
    pub fn new(issues: Vec<String>) -> Self {
        Self { issues }
    }
}

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("manifest is nil")]
    NilManifest,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("name is required")]
    NameRequired,

    #[error("theme not found: {name}")]
    ThemeNotFound { name: String },

    #[error("theme version not found: {name}@{version}")]
    VersionNotFound { name: String, version: String },

    #[error("theme registry is nil")]
    RegistryUnconfigured,

    #[error("resolve theme: {source}")]
    ResolveFailed {
        #[source]
        source: Box<ThemeError>,
    },

    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(String),

    #[error("{format} decode: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    #[error("read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode manifest {}: {source}", .path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ThemeError>,
    },

    #[error("no manifest found in {} (looked for {})", .dir.display(), .candidates.join(", "))]
    NoManifestFound {
        dir: PathBuf,
        candidates: Vec<String>,
    },
}

impl ThemeError {
    /// Whether this error (or the cause it wraps) means the theme or version
    /// is not registered.
    pub fn is_not_found(&self) -> bool {
        match self {
            ThemeError::ThemeNotFound { .. } | ThemeError::VersionNotFound { .. } => true,
            ThemeError::ResolveFailed { source } | ThemeError::InFile { source, .. } => {
                source.is_not_found()
            }
            _ => false,
        }
    }

    /// The validation issues carried by this error, if it is (or wraps) a
    /// validation failure.
    pub fn validation_issues(&self) -> Option<&[String]> {
        match self {
            ThemeError::Validation(err) => Some(&err.issues),
            ThemeError::ResolveFailed { source } | ThemeError::InFile { source, .. } => {
                source.validation_issues()
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ThemeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_joins_issues() {
        let err = ValidationError::new(vec![
            "name is required".to_string(),
            "version is required".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "manifest validation failed: name is required; version is required"
        );
    }

    #[test]
    fn test_resolve_failed_wraps_cause() {
        let err = ThemeError::ResolveFailed {
            source: Box::new(ThemeError::ThemeNotFound {
                name: "missing".to_string(),
            }),
        };
        assert_eq!(err.to_string(), "resolve theme: theme not found: missing");
        assert!(err.is_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_version_not_found_display() {
        let err = ThemeError::VersionNotFound {
            name: "default".to_string(),
            version: "2.0.0".to_string(),
        };
        assert_eq!(err.to_string(), "theme version not found: default@2.0.0");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_no_manifest_found_lists_candidates() {
        let err = ThemeError::NoManifestFound {
            dir: PathBuf::from("themes/default"),
            candidates: vec!["theme.json".to_string(), "theme.yaml".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "no manifest found in themes/default (looked for theme.json, theme.yaml)"
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_validation_issues_through_in_file() {
        let err = ThemeError::InFile {
            path: PathBuf::from("theme.json"),
            source: Box::new(ThemeError::Validation(ValidationError::new(vec![
                "name is required".to_string(),
            ]))),
        };
        assert_eq!(err.validation_issues(), Some(&["name is required".to_string()][..]));
    }
}
