use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::procedural::ProceduralShape;
use super::writer::GeometryWriter;
use crate::components::{IndexBuffer, MeshSlot, VertexBuffer};
use crate::error::MeshBuildError;

/// Something that can append geometry for one entity.
///
/// Called from the parallel build job, once per tagged entity per pass, so
/// implementations must not rely on shared mutable state.
pub trait GeometryProducer: Send + Sync + 'static {
    fn produce(&self, out: &mut GeometryWriter);

    fn label(&self) -> &str {
        "computed"
    }
}

impl<F> GeometryProducer for F
where
    F: Fn(&mut GeometryWriter) + Send + Sync + 'static,
{
    fn produce(&self, out: &mut GeometryWriter) {
        self(out)
    }
}

/// Fixed vertex/index data, e.g. loaded from an authoring file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixedGeometry {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

/// Per-entity geometry producer consumed by the build job.
///
/// Spawning a source also inserts empty `VertexBuffer`, `IndexBuffer` and
/// `MeshSlot` components.
#[derive(Component, Clone)]
#[require(VertexBuffer, IndexBuffer, MeshSlot)]
pub enum GeometrySource {
    Procedural(ProceduralShape),
    Fixed(Arc<FixedGeometry>),
    Computed(Arc<dyn GeometryProducer>),
}

impl Default for GeometrySource {
    fn default() -> Self {
        GeometrySource::Procedural(ProceduralShape::Triangle)
    }
}

impl fmt::Debug for GeometrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometrySource::Procedural(shape) => f.debug_tuple("Procedural").field(shape).finish(),
            GeometrySource::Fixed(fixed) => f
                .debug_struct("Fixed")
                .field("vertices", &fixed.positions.len())
                .field("indices", &fixed.indices.len())
                .finish(),
            GeometrySource::Computed(producer) => {
                f.debug_tuple("Computed").field(&producer.label()).finish()
            }
        }
    }
}

impl GeometrySource {
    pub fn computed(producer: impl GeometryProducer) -> Self {
        GeometrySource::Computed(Arc::new(producer))
    }

    pub fn fixed(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        GeometrySource::Fixed(Arc::new(FixedGeometry { positions, indices }))
    }

    pub fn label(&self) -> &str {
        match self {
            GeometrySource::Procedural(shape) => shape.label(),
            GeometrySource::Fixed(_) => "fixed",
            GeometrySource::Computed(producer) => producer.label(),
        }
    }

    /// Checks that can be made before producing. Fixed and computed data is
    /// validated after the build instead.
    pub fn check(&self) -> Result<(), MeshBuildError> {
        match self {
            GeometrySource::Procedural(shape) => shape.check(),
            GeometrySource::Fixed(_) | GeometrySource::Computed(_) => Ok(()),
        }
    }

    pub fn produce(&self, out: &mut GeometryWriter) {
        match self {
            GeometrySource::Procedural(shape) => shape.generate(out),
            GeometrySource::Fixed(fixed) => {
                out.reserve(fixed.positions.len(), fixed.indices.len());
                let base = out.vertex_count() as u32;
                for p in &fixed.positions {
                    out.push_vertex(Vec3::from_array(*p));
                }
                for &i in &fixed.indices {
                    out.push_index(base + i);
                }
            }
            GeometrySource::Computed(producer) => producer.produce(out),
        }
    }
}
