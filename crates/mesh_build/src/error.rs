// ---------------------------------------------------------------------------
// MeshBuildError: typed failures for geometry validation, requests and config
// ---------------------------------------------------------------------------

use std::fmt;

use bevy::prelude::Entity;

/// Errors produced by the mesh build pipeline.
///
/// None of these abort a pass. The pipeline turns them into log lines,
/// counters in `MeshBuildStats` and the `GeometryRejected` component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshBuildError {
    /// The entity does not exist (despawned before the request was processed).
    MissingEntity(Entity),
    /// The entity lacks a component the pipeline needs to build it.
    MissingComponents {
        entity: Entity,
        missing: Vec<&'static str>,
    },
    /// Index data cannot be read as a triangle list.
    IndexCountNotTriangleAligned { count: usize },
    /// An index points past the end of the vertex buffer.
    IndexOutOfBounds {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
    /// A grid shape would exceed the vertex limit (or overflow `u32` indices).
    GridTooLarge {
        columns: u32,
        rows: u32,
        max_vertices: u32,
    },
    /// A configuration value is outside its allowed range.
    InvalidConfig(String),
    /// JSON config or authoring data could not be parsed.
    Parse(String),
}

impl fmt::Display for MeshBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshBuildError::MissingEntity(entity) => write!(f, "Entity {entity} does not exist"),
            MeshBuildError::MissingComponents { entity, missing } => write!(
                f,
                "Entity {entity} cannot be built, missing components: {}",
                missing.join(", ")
            ),
            MeshBuildError::IndexCountNotTriangleAligned { count } => {
                write!(f, "Index count {count} is not a multiple of 3")
            }
            MeshBuildError::IndexOutOfBounds {
                position,
                index,
                vertex_count,
            } => write!(
                f,
                "Index {index} at position {position} is out of bounds for {vertex_count} vertices"
            ),
            MeshBuildError::GridTooLarge {
                columns,
                rows,
                max_vertices,
            } => write!(
                f,
                "Grid of {columns}x{rows} cells exceeds the limit of {max_vertices} vertices"
            ),
            MeshBuildError::InvalidConfig(msg) => write!(f, "Invalid config: {msg}"),
            MeshBuildError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for MeshBuildError {}

impl From<serde_json::Error> for MeshBuildError {
    fn from(e: serde_json::Error) -> Self {
        MeshBuildError::Parse(e.to_string())
    }
}
