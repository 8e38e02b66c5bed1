//! Integration tests for re-tagging settled entities:
//! - A rebuild with new geometry replaces vertices, indices and normals
//! - A rebuild with the same geometry does not accumulate old data
//! - Each rebuild publishes a new asset handle

use bevy::prelude::*;

use crate::components::BuildState;
use crate::geometry::{GeometrySource, GeometryWriter, ProceduralShape};
use crate::test_harness::TestPipeline;

#[test]
fn test_rebuild_with_new_source_leaves_no_residue() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::Procedural(ProceduralShape::Grid {
        columns: 4,
        rows: 4,
        cell_size: 1.0,
    }));
    pipeline.tick(1);
    assert_eq!(pipeline.mesh_positions(entity).len(), 25);

    pipeline.request_rebuild_with(entity, GeometrySource::default());
    pipeline.tick(1);

    assert_eq!(pipeline.state(entity), BuildState::Settled);
    assert_eq!(pipeline.vertex_buffer(entity).len(), 3);
    assert_eq!(
        pipeline.mesh_positions(entity),
        vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]
    );
    assert_eq!(pipeline.mesh_indices(entity), vec![0, 1, 2]);
    assert_eq!(pipeline.mesh_normals(entity).len(), 3);
    assert_eq!(pipeline.slot(entity).revision(), 2);
}

#[test]
fn test_rebuild_same_source_does_not_accumulate() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::default());

    for _ in 0..4 {
        pipeline.tick(1);
        pipeline.request_rebuild(entity);
    }
    pipeline.tick(1);

    assert_eq!(pipeline.vertex_buffer(entity).len(), 3);
    assert_eq!(pipeline.index_buffer(entity), &[0, 1, 2]);
    assert_eq!(pipeline.slot(entity).revision(), 5);
}

#[test]
fn test_rebuild_publishes_new_handle() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::default());
    pipeline.tick(1);
    let before = pipeline.slot(entity).handle().cloned();

    pipeline.request_rebuild(entity);
    pipeline.tick(1);
    let after = pipeline.slot(entity).handle().cloned();

    assert!(before.is_some() && after.is_some());
    assert_ne!(before, after);
    assert_eq!(pipeline.mesh3d_handle(entity), after);
}

#[test]
fn test_computed_source_sees_fresh_buffers_each_build() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::computed(|out: &mut GeometryWriter| {
        // Would produce out-of-bounds indices if buffers were not cleared first.
        assert_eq!(out.vertex_count(), 0);
        let a = out.push_vertex(Vec3::ZERO);
        let b = out.push_vertex(Vec3::Z);
        let c = out.push_vertex(Vec3::X);
        out.push_triangle(a, b, c);
    }));

    pipeline.tick(1);
    pipeline.request_rebuild(entity);
    pipeline.tick(1);

    assert_eq!(pipeline.state(entity), BuildState::Settled);
    assert_eq!(pipeline.mesh_indices(entity), vec![0, 1, 2]);
}
