//! Authoring descriptors and the spawn helpers that turn them into pending
//! generator entities.

use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::NeedsGeometry;
use crate::error::MeshBuildError;
use crate::geometry::{FixedGeometry, GeometrySource, ProceduralShape};

/// Data-only geometry description, as found in scene files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryDescriptor {
    Procedural(ProceduralShape),
    Fixed(FixedGeometry),
}

impl From<&GeometryDescriptor> for GeometrySource {
    fn from(descriptor: &GeometryDescriptor) -> Self {
        match descriptor {
            GeometryDescriptor::Procedural(shape) => GeometrySource::Procedural(shape.clone()),
            GeometryDescriptor::Fixed(fixed) => GeometrySource::Fixed(Arc::new(fixed.clone())),
        }
    }
}

/// One generator as written by a scene author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorAuthoring {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub translation: [f32; 3],
    pub geometry: GeometryDescriptor,
}

/// Parse a JSON array of generators, rejecting procedural shapes that are too
/// large to build.
pub fn parse_authoring(json: &str) -> Result<Vec<GeneratorAuthoring>, MeshBuildError> {
    let generators: Vec<GeneratorAuthoring> = serde_json::from_str(json)?;
    for generator in &generators {
        if let GeometryDescriptor::Procedural(shape) = &generator.geometry {
            shape.check()?;
        }
    }
    Ok(generators)
}

/// Components of a freshly converted generator: source (which brings empty
/// buffers and an empty slot), build tag and placement.
pub fn generator_bundle(
    source: GeometrySource,
    transform: Transform,
) -> (GeometrySource, NeedsGeometry, Transform) {
    (source, NeedsGeometry, transform)
}

pub fn spawn_generator(commands: &mut Commands, source: GeometrySource) -> Entity {
    commands
        .spawn(generator_bundle(source, Transform::default()))
        .id()
}

pub fn spawn_authored(commands: &mut Commands, authoring: &GeneratorAuthoring) -> Entity {
    let transform = Transform::from_translation(Vec3::from_array(authoring.translation));
    let mut entity = commands.spawn(generator_bundle(
        GeometrySource::from(&authoring.geometry),
        transform,
    ));
    if let Some(name) = &authoring.name {
        entity.insert(Name::new(name.clone()));
    }
    entity.id()
}
