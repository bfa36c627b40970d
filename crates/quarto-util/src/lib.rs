//! Shared utilities for Quarto crates.

pub mod version;
