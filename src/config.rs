//! Index configuration.

use crate::error::Result;
use crate::quadtree::ToroidalQuadtree;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Construction parameters of a [`ToroidalQuadtree`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Maximum number of elements a leaf holds before it subdivides. At least 4.
    #[serde(default = "default_node_limit")]
    pub node_limit: usize,
    /// Plane width.
    #[serde(default = "default_extent")]
    pub width: f64,
    /// Plane height.
    #[serde(default = "default_extent")]
    pub height: f64,
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from `path`, or use defaults if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            info!("No {} found, using default config", path.display());
            Ok(Self::default())
        }
    }

    pub fn build(&self) -> Result<ToroidalQuadtree> {
        ToroidalQuadtree::new(self.node_limit, self.width, self.height)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node_limit: default_node_limit(),
            width: default_extent(),
            height: default_extent(),
        }
    }
}

fn default_node_limit() -> usize {
    16
}
fn default_extent() -> f64 {
    1.0
}
