//! Selection configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;
use crate::geometry::Granularity;
use crate::pick::{HitResolver, Pick};

/// How click picks are sized and resolved
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Primitive kind addressed below the node level
    pub granularity: Granularity,
    /// Width of a click pick, as a fraction of the frame
    pub pick_width: f32,
    /// Height of a click pick, as a fraction of the frame
    pub pick_height: f32,
    /// Capacity of the hit buffer
    pub max_hits: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            granularity: Granularity::Face,
            pick_width: 0.01,
            pick_height: 0.01,
            max_hits: 512,
        }
    }
}

impl SelectionConfig {
    /// Pick of the configured size centred on frame point `(u, v)`.
    pub fn pick_at(&self, u: f32, v: f32) -> Result<Pick> {
        Pick::around(u, v, self.pick_width, self.pick_height)
    }

    pub fn resolver(&self) -> HitResolver {
        HitResolver::new(self.granularity)
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file (sync). Missing fields take their defaults.
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}
