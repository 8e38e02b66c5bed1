use bevy::prelude::*;

use crate::error::MeshBuildError;

/// Build tag: the entity's geometry is stale and must be (re)built.
///
/// Removed by the finalize step once the entity's mesh has been republished.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct NeedsGeometry;

/// Order in which a tagged entity became pending. Lower values are promoted
/// first, so an entity re-tagged every pass cannot hold the promotion slot.
///
/// Stamped during the request phase; removed together with the tag.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PendingSince(pub u64);

/// Vertex positions produced by the last build of this entity.
#[derive(Component, Debug, Default, Clone, Deref, DerefMut)]
pub struct VertexBuffer(pub Vec<Vec3>);

/// Triangle-list indices into the entity's `VertexBuffer`.
#[derive(Component, Debug, Default, Clone, Deref, DerefMut)]
pub struct IndexBuffer(pub Vec<u32>);

/// Holder of the entity's current renderable mesh.
///
/// Only the finalize step writes it, and it never mutates a published asset:
/// each settle adds a fresh `Mesh` and swaps the handle.
#[derive(Component, Debug, Default, Clone)]
pub struct MeshSlot {
    handle: Option<Handle<Mesh>>,
    revision: u32,
}

impl MeshSlot {
    pub fn handle(&self) -> Option<&Handle<Mesh>> {
        self.handle.as_ref()
    }

    /// Number of meshes published into this slot so far.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn is_empty(&self) -> bool {
        self.handle.is_none()
    }

    /// Replace the current mesh, returning the previous handle.
    pub(crate) fn publish(&mut self, handle: Handle<Mesh>) -> Option<Handle<Mesh>> {
        self.revision += 1;
        self.handle.replace(handle)
    }
}

/// Attached when the last build produced geometry that failed validation.
/// The slot keeps its previous mesh.
#[derive(Component, Debug, Clone)]
pub struct GeometryRejected(pub MeshBuildError);

/// Externally observable lifecycle of a generator entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Tag present; a build will run on the next pass.
    Pending,
    /// Tag absent; the slot holds the mesh of the latest build.
    Settled,
    /// Tag absent; the latest build was invalid and was not published.
    Rejected,
}

impl BuildState {
    pub fn of(entity: EntityRef) -> Self {
        if entity.contains::<NeedsGeometry>() {
            BuildState::Pending
        } else if entity.contains::<GeometryRejected>() {
            BuildState::Rejected
        } else {
            BuildState::Settled
        }
    }
}
