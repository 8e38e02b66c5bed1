//! Inspection helpers for `TestPipeline`.

use bevy::prelude::*;

use crate::components::{BuildState, IndexBuffer, MeshSlot, NeedsGeometry, VertexBuffer};
use crate::stats::MeshBuildStats;

use super::TestPipeline;

impl TestPipeline {
    pub fn state(&self, entity: Entity) -> BuildState {
        BuildState::of(self.world().entity(entity))
    }

    pub fn is_pending(&self, entity: Entity) -> bool {
        self.world().get::<NeedsGeometry>(entity).is_some()
    }

    /// Count entities still carrying the build tag.
    pub fn pending_count(&mut self) -> usize {
        let world = self.world_mut();
        world
            .query_filtered::<Entity, With<NeedsGeometry>>()
            .iter(world)
            .count()
    }

    pub fn stats(&self) -> &MeshBuildStats {
        self.world().resource::<MeshBuildStats>()
    }

    pub fn slot(&self, entity: Entity) -> &MeshSlot {
        self.world()
            .get::<MeshSlot>(entity)
            .expect("entity should have a MeshSlot")
    }

    pub fn vertex_buffer(&self, entity: Entity) -> &[Vec3] {
        self.world()
            .get::<VertexBuffer>(entity)
            .expect("entity should have a VertexBuffer")
    }

    pub fn index_buffer(&self, entity: Entity) -> &[u32] {
        self.world()
            .get::<IndexBuffer>(entity)
            .expect("entity should have an IndexBuffer")
    }

    /// The mesh currently published in the entity's slot, if any.
    pub fn mesh(&self, entity: Entity) -> Option<&Mesh> {
        let handle = self.slot(entity).handle()?;
        self.world().resource::<Assets<Mesh>>().get(handle)
    }

    pub fn mesh_positions(&self, entity: Entity) -> Vec<[f32; 3]> {
        self.mesh(entity)
            .and_then(|mesh| mesh.attribute(Mesh::ATTRIBUTE_POSITION))
            .and_then(|values| values.as_float3())
            .map(|positions| positions.to_vec())
            .unwrap_or_default()
    }

    pub fn mesh_normals(&self, entity: Entity) -> Vec<[f32; 3]> {
        self.mesh(entity)
            .and_then(|mesh| mesh.attribute(Mesh::ATTRIBUTE_NORMAL))
            .and_then(|values| values.as_float3())
            .map(|normals| normals.to_vec())
            .unwrap_or_default()
    }

    pub fn mesh_indices(&self, entity: Entity) -> Vec<u32> {
        self.mesh(entity)
            .and_then(|mesh| mesh.indices())
            .map(|indices| indices.iter().map(|i| i as u32).collect())
            .unwrap_or_default()
    }

    /// Handle mirrored into the renderer-facing `Mesh3d` component.
    pub fn mesh3d_handle(&self, entity: Entity) -> Option<Handle<Mesh>> {
        self.world()
            .get::<Mesh3d>(entity)
            .map(|mesh3d| mesh3d.0.clone())
    }
}
