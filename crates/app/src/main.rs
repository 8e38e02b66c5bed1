use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use mesh_build::{MeshBuildConfig, MeshBuildPlugin};

mod headless;
mod scene;

fn main() {
    // Headless mode: build the demo scene without a window, log stats and exit
    if let Ok(passes) = std::env::var("MESH_DEMO_HEADLESS") {
        headless::run(passes.parse().unwrap_or(headless::DEFAULT_PASSES));
        return;
    }

    let config = load_config();

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Mesh Build Demo".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    })
    .insert_resource(config.clone().unwrap_or_default())
    .add_plugins(MeshBuildPlugin)
    .add_systems(Startup, (scene::setup_view, scene::spawn_demo_scene))
    .add_systems(
        Update,
        (
            scene::attach_material,
            scene::reseed_heightfields,
            scene::rebuild_all,
        ),
    );

    if let Err(err) = config {
        warn!("Ignoring MESH_DEMO_CONFIG: {err}");
    }

    app.run();
}

/// Read `MeshBuildConfig` from the JSON file named by `MESH_DEMO_CONFIG`, if set.
pub(crate) fn load_config() -> Result<MeshBuildConfig, String> {
    let Ok(path) = std::env::var("MESH_DEMO_CONFIG") else {
        return Ok(MeshBuildConfig::default());
    };
    let json = std::fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
    MeshBuildConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))
}
