//! Optional TOML defaults for the command line.
//!
//! ```toml
//! [defaults]
//! comment = "Code generated by ifacesynth; DO NOT EDIT."
//! copy_docs = true
//! copy_type_doc = false
//! with_promoted = true
//! with_not_exported = false
//! import_module = "github.com/acme/models"
//! exclude_methods = ["String"]
//! ```
//!
//! Values given on the command line always win; excluded methods from both
//! sources are combined.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_COMMENT: &str = "Code generated by ifacesynth; DO NOT EDIT.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub comment: Option<String>,
    pub copy_docs: Option<bool>,
    pub copy_type_doc: Option<bool>,
    pub with_promoted: Option<bool>,
    pub with_not_exported: Option<bool>,
    pub import_module: Option<String>,
    pub exclude_methods: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl GeneratorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Defaults {
    pub fn comment_or(&self, cli: Option<String>) -> String {
        cli.or_else(|| self.comment.clone())
            .unwrap_or_else(|| DEFAULT_COMMENT.to_string())
    }

    pub fn import_module_or(&self, cli: Option<String>) -> Option<String> {
        cli.or_else(|| self.import_module.clone())
    }

    /// CLI exclusions first, then configured ones not already listed.
    pub fn exclusions_with(&self, cli: Vec<String>) -> Vec<String> {
        let mut merged = cli;
        for name in &self.exclude_methods {
            if !merged.contains(name) {
                merged.push(name.clone());
            }
        }
        merged
    }
}
