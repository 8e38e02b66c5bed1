use bevy::log::LogPlugin;
use bevy::prelude::*;

use mesh_build::{MeshBuildPlugin, MeshBuildStats, NeedsGeometry};

use crate::scene::spawn_demo_scene;

pub const DEFAULT_PASSES: u32 = 10;

/// Run `passes` updates of the demo scene without a window, then log stats.
pub fn run(passes: u32) {
    let config = crate::load_config();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), AssetPlugin::default()))
        .init_asset::<Mesh>()
        .insert_resource(config.clone().unwrap_or_default())
        .add_plugins(MeshBuildPlugin)
        .add_systems(Startup, spawn_demo_scene);

    if let Err(err) = config {
        warn!("Ignoring MESH_DEMO_CONFIG: {err}");
    }

    app.finish();
    app.cleanup();
    for _ in 0..passes {
        app.update();
    }

    let world = app.world_mut();
    let pending = world
        .query_filtered::<Entity, With<NeedsGeometry>>()
        .iter(world)
        .count();
    let stats = world.resource::<MeshBuildStats>();
    info!(
        "{} passes: {} build passes, {} jobs, {} promotions, {} deferred, {} invalid, {} still pending",
        passes,
        stats.build_passes,
        stats.jobs_run,
        stats.promotions,
        stats.deferred,
        stats.invalid_geometry,
        pending
    );
}
