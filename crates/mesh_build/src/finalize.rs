//! Serial phase of a pass: promote built buffers into published meshes.
//!
//! Runs after `run_build_jobs` has joined, so every buffer write of the pass
//! is visible here and nothing else touches the buffers while they are read.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

use crate::build_job::BuildOutput;
use crate::components::{
    GeometryRejected, IndexBuffer, MeshSlot, NeedsGeometry, PendingSince, VertexBuffer,
};
use crate::config::MeshBuildConfig;
use crate::geometry::validate_geometry;
use crate::stats::MeshBuildStats;

/// Sent once per published mesh.
#[derive(Event, Debug, Clone)]
pub struct MeshSettled {
    pub entity: Entity,
    pub mesh: Handle<Mesh>,
    pub vertex_count: usize,
    pub index_count: usize,
    /// Slot revision after this publish.
    pub revision: u32,
}

/// Build a triangle-list mesh from a snapshot of an entity's buffers.
///
/// `indices` must already be validated against `vertices`.
pub fn build_mesh(vertices: &[Vec3], indices: &[u32], config: &MeshBuildConfig) -> Mesh {
    let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.to_array()).collect();
    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, config.asset_usage())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_indices(Indices::U32(indices.to_vec()));
    if config.compute_normals && !indices.is_empty() {
        mesh.compute_normals();
    }
    mesh
}

fn describe(entity: Entity, name: Option<&Name>) -> String {
    match name {
        Some(name) => format!("{entity} '{name}'"),
        None => entity.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn finalize_builds(
    mut commands: Commands,
    mut output: ResMut<BuildOutput>,
    config: Res<MeshBuildConfig>,
    mut slots: Query<(
        &mut VertexBuffer,
        &mut IndexBuffer,
        &mut MeshSlot,
        Option<&Name>,
    )>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut settled: EventWriter<MeshSettled>,
    mut stats: ResMut<MeshBuildStats>,
) {
    if output.is_empty() {
        return;
    }

    let limit = config.promotions_per_pass.max(1);
    let promote_count = output.entities.len().min(limit);
    let deferred = output.entities.len() - promote_count;
    if deferred > 0 {
        stats.deferred += deferred as u64;
        debug!(
            "Promotion limit {} reached, {} built entities stay pending",
            limit, deferred
        );
    }

    let output = &mut *output;
    for &entity in &output.entities[..promote_count] {
        let Ok((mut vertices, mut indices, mut slot, name)) = slots.get_mut(entity) else {
            continue;
        };

        commands
            .entity(entity)
            .remove::<(NeedsGeometry, PendingSince)>();

        let checked = match output.failed.remove(&entity) {
            Some(err) => Err(err),
            None => validate_geometry(vertices.len(), &indices),
        };
        if let Err(err) = checked {
            warn!(
                "Rejected geometry for {}: {}. Keeping previous mesh.",
                describe(entity, name),
                err
            );
            // Settled buffers must always index in bounds.
            vertices.clear();
            indices.clear();
            stats.invalid_geometry += 1;
            commands.entity(entity).try_insert(GeometryRejected(err));
            continue;
        }

        let mesh = build_mesh(&vertices, &indices, &config);
        let handle = meshes.add(mesh);
        slot.publish(handle.clone());

        commands
            .entity(entity)
            .remove::<GeometryRejected>()
            .try_insert(Mesh3d(handle.clone()));

        if config.log_promotions {
            info!(
                "Settled {}: {} vertices, {} indices (revision {})",
                describe(entity, name),
                vertices.len(),
                indices.len(),
                slot.revision()
            );
        } else {
            debug!(
                "Settled {}: {} vertices, {} indices (revision {})",
                describe(entity, name),
                vertices.len(),
                indices.len(),
                slot.revision()
            );
        }

        stats.promotions += 1;
        settled.send(MeshSettled {
            entity,
            mesh: handle,
            vertex_count: vertices.len(),
            index_count: indices.len(),
            revision: slot.revision(),
        });
    }

    output.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(mesh: &Mesh) -> Vec<[f32; 3]> {
        mesh.attribute(Mesh::ATTRIBUTE_POSITION)
            .and_then(|values| values.as_float3())
            .expect("mesh should have float3 positions")
            .to_vec()
    }

    #[test]
    fn test_build_mesh_reference_triangle() {
        let vertices = [Vec3::ZERO, Vec3::Z, Vec3::X];
        let mesh = build_mesh(&vertices, &[0, 1, 2], &MeshBuildConfig::default());

        assert_eq!(mesh.count_vertices(), 3);
        assert_eq!(
            positions(&mesh),
            vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]
        );
        let indices: Vec<usize> = mesh.indices().expect("indexed").iter().collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_build_mesh_computes_up_normals() {
        let vertices = [Vec3::ZERO, Vec3::Z, Vec3::X];
        let mesh = build_mesh(&vertices, &[0, 1, 2], &MeshBuildConfig::default());

        let normals = mesh
            .attribute(Mesh::ATTRIBUTE_NORMAL)
            .and_then(|values| values.as_float3())
            .expect("normals should be computed");
        for n in normals {
            assert!((n[1] - 1.0).abs() < 1e-5, "normal {n:?} should point up");
        }
    }

    #[test]
    fn test_build_mesh_without_normals() {
        let config = MeshBuildConfig {
            compute_normals: false,
            ..Default::default()
        };
        let mesh = build_mesh(&[Vec3::ZERO, Vec3::Z, Vec3::X], &[0, 1, 2], &config);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_none());
    }

    #[test]
    fn test_build_mesh_empty_geometry() {
        let mesh = build_mesh(&[], &[], &MeshBuildConfig::default());
        assert_eq!(mesh.count_vertices(), 0);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_none());
    }
}
