//! Network catalog files.
//!
//! A catalog is the static description of a network: its stations and
//! lines, as JSON. It is the input to graph builds at startup and on
//! rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{Line, Station};

/// Errors reading or writing a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The file couldn't be read or written
    #[error("catalog I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The contents aren't a valid catalog
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stations and lines of a network.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub stations: Vec<Station>,
    pub lines: Vec<Line>,
}

impl Catalog {
    /// Parse a catalog from JSON.
    ///
    /// Only the shape is checked here; topology is checked when a graph is
    /// built from it.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Write the catalog as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
