use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use serde::{Deserialize, Serialize};

use crate::error::MeshBuildError;

/// Tunables for the build pipeline.
///
/// `MeshBuildPlugin` uses `init_resource`, so a config inserted before the
/// plugin is added takes precedence over the defaults.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshBuildConfig {
    /// Maximum number of built entities promoted into meshes per pass.
    /// Entities past the limit stay tagged and are promoted on later passes.
    pub promotions_per_pass: usize,
    /// Recompute vertex normals after assigning new geometry.
    pub compute_normals: bool,
    /// Keep the mesh data readable in the main world after it is uploaded.
    pub keep_main_world_copy: bool,
    /// Log each promotion at `info` level instead of `debug`.
    pub log_promotions: bool,
}

impl Default for MeshBuildConfig {
    fn default() -> Self {
        Self {
            promotions_per_pass: 1,
            compute_normals: true,
            keep_main_world_copy: true,
            log_promotions: true,
        }
    }
}

impl MeshBuildConfig {
    /// Parse a JSON config. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, MeshBuildError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), MeshBuildError> {
        if self.promotions_per_pass == 0 {
            return Err(MeshBuildError::InvalidConfig(
                "promotions_per_pass must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn asset_usage(&self) -> RenderAssetUsages {
        if self.keep_main_world_copy {
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD
        } else {
            RenderAssetUsages::RENDER_WORLD
        }
    }
}
