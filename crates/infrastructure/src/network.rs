//! Network file loading and saving
//!
//! A network file holds a `nodes` list and an `edges` list, as JSON or TOML
//! (chosen by file extension). Every record is validated on load.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use domain::{DomainError, Edge, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while reading or writing a network file
#[derive(Debug, Error)]
pub enum NetworkFileError {
    /// The file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The extension is neither `.json` nor `.toml`
    #[error("Unsupported network file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A record failed validation
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// Two nodes share the same name
    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),
}

/// Nodes and edges of a logistics network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkFile {
    /// Facilities
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Links between facilities, referencing nodes by name
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl NetworkFile {
    /// Validate every node and edge, and node name uniqueness
    ///
    /// Edges may reference unknown nodes; the optimizer reports those as
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(&self) -> Result<(), NetworkFileError> {
        let mut names = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            node.validate()?;
            if !names.insert(node.name.as_str()) {
                return Err(NetworkFileError::DuplicateNode(node.name.clone()));
            }
        }
        for edge in &self.edges {
            edge.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format, NetworkFileError> {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(NetworkFileError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read and validate a network file
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
#[instrument]
pub fn load_network(path: &Path) -> Result<NetworkFile, NetworkFileError> {
    let format = format_of(path)?;
    let text = fs::read_to_string(path).map_err(|source| NetworkFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let network: NetworkFile = match format {
        Format::Json => serde_json::from_str(&text)?,
        Format::Toml => toml::from_str(&text)?,
    };
    network.validate()?;

    debug!(
        nodes = network.nodes.len(),
        edges = network.edges.len(),
        "Network loaded"
    );
    Ok(network)
}

/// Write a network file in the format given by its extension
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
#[instrument(skip(network))]
pub fn save_network(path: &Path, network: &NetworkFile) -> Result<(), NetworkFileError> {
    let text = match format_of(path)? {
        Format::Json => serde_json::to_string_pretty(network)?,
        Format::Toml => toml::to_string_pretty(network)?,
    };
    fs::write(path, text).map_err(|source| NetworkFileError::Io {
        path: path.to_path_buf(),
        source,
    })
}
