//! Editor configuration.

use anyhow::{Context, Result};
use glam::Vec2;
use node::{CanvasPoint, CanvasSize, NODE_SIZE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the canvas. Every field has a default, so a config file only
/// needs the values it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Card size used for connector geometry and hit testing.
    pub node_size: CanvasSize,
    /// Top-left corner of the region new nodes spawn in.
    pub spawn_origin: CanvasPoint,
    /// Width and height of the spawn region.
    pub spawn_extent: Vec2,
    /// Pointer travel (canvas units) after which a press counts as a drag
    /// rather than a click.
    pub click_threshold: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            node_size: NODE_SIZE,
            spawn_origin: CanvasPoint::new(300.0, 200.0),
            spawn_extent: Vec2::new(200.0, 200.0),
            click_threshold: 3.0,
        }
    }
}

impl CanvasConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid canvas config JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        log::debug!("Loaded canvas config from {}", path.display());
        Ok(config)
    }
}
