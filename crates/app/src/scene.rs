use bevy::prelude::*;

use mesh_build::{
    parse_authoring, spawn_authored, GeometrySource, MeshBuildCommandsExt, ProceduralShape,
};

const DEMO_SCENE: &str = include_str!("../assets/demo_scene.json");

pub fn spawn_demo_scene(mut commands: Commands) {
    let generators = match parse_authoring(DEMO_SCENE) {
        Ok(generators) => generators,
        Err(err) => {
            error!("Demo scene failed to load: {err}");
            return;
        }
    };
    for authoring in &generators {
        spawn_authored(&mut commands, authoring);
    }
    info!("Spawned {} generators from the demo scene", generators.len());
}

pub fn setup_view(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(1.0, 9.0, 12.0).looking_at(Vec3::new(1.0, 0.0, -3.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
    ));
}

/// Give every newly spawned generator the shared surface material.
pub fn attach_material(
    mut commands: Commands,
    new_generators: Query<Entity, Added<GeometrySource>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut shared: Local<Option<Handle<StandardMaterial>>>,
) {
    for entity in &new_generators {
        let material = shared
            .get_or_insert_with(|| {
                materials.add(StandardMaterial {
                    base_color: Color::srgb(0.55, 0.7, 0.45),
                    perceptual_roughness: 0.9,
                    double_sided: true,
                    cull_mode: None,
                    ..default()
                })
            })
            .clone();
        commands.entity(entity).insert(MeshMaterial3d(material));
    }
}

/// Space: swap every heightfield for the next seed.
pub fn reseed_heightfields(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    sources: Query<(Entity, &GeometrySource)>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    for (entity, source) in &sources {
        let GeometrySource::Procedural(shape @ ProceduralShape::Heightfield { .. }) = source else {
            continue;
        };
        let mut shape = shape.clone();
        if let ProceduralShape::Heightfield { seed, .. } = &mut shape {
            *seed = seed.wrapping_add(1);
        }
        commands.replace_geometry(entity, GeometrySource::Procedural(shape));
    }
}

/// R: rebuild every generator from its current source.
pub fn rebuild_all(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    sources: Query<Entity, With<GeometrySource>>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }
    for entity in &sources {
        commands.request_geometry_rebuild(entity);
    }
}
