//! Integration tests for the basic build-and-promote cycle:
//! - One pass settles a tagged entity and publishes its mesh
//! - Untagged entities are left alone
//! - Each settle replaces the slot's mesh exactly once
//! - Published indices always point at existing vertices

use crate::components::BuildState;
use crate::geometry::{GeometrySource, ProceduralShape};
use crate::test_harness::TestPipeline;

#[test]
fn test_reference_triangle_settles_after_one_pass() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::default());
    assert_eq!(pipeline.state(entity), BuildState::Pending);
    assert!(pipeline.slot(entity).is_empty());

    pipeline.tick(1);

    assert_eq!(pipeline.state(entity), BuildState::Settled);
    assert_eq!(
        pipeline.mesh_positions(entity),
        vec![[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]
    );
    assert_eq!(pipeline.mesh_indices(entity), vec![0, 1, 2]);
}

#[test]
fn test_vertex_count_matches_appended_positions() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::Procedural(ProceduralShape::Grid {
        columns: 3,
        rows: 2,
        cell_size: 1.0,
    }));

    pipeline.tick(1);

    let mesh = pipeline.mesh(entity).expect("mesh should be published");
    assert_eq!(mesh.count_vertices(), pipeline.vertex_buffer(entity).len());
    assert_eq!(mesh.count_vertices(), 4 * 3);
}

#[test]
fn test_normals_recomputed_on_settle() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::Procedural(ProceduralShape::Quad { size: 2.0 }));

    pipeline.tick(1);

    let normals = pipeline.mesh_normals(entity);
    assert_eq!(normals.len(), 4);
    for n in normals {
        assert!((n[1] - 1.0).abs() < 1e-5, "normal {n:?} should point up");
    }
}

#[test]
fn test_untagged_entity_is_untouched() {
    let mut pipeline = TestPipeline::new();
    let idle = pipeline.spawn_untagged(GeometrySource::default());
    let busy = pipeline.spawn(GeometrySource::default());

    pipeline.tick(3);

    assert_eq!(pipeline.state(busy), BuildState::Settled);
    assert!(pipeline.vertex_buffer(idle).is_empty());
    assert!(pipeline.index_buffer(idle).is_empty());
    assert!(pipeline.slot(idle).is_empty());
    assert_eq!(pipeline.slot(idle).revision(), 0);
}

#[test]
fn test_settled_entity_is_not_rebuilt() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::default());

    pipeline.tick(1);
    let handle = pipeline.slot(entity).handle().cloned();
    pipeline.tick(5);

    assert_eq!(pipeline.slot(entity).revision(), 1);
    assert_eq!(pipeline.slot(entity).handle().cloned(), handle);
    assert_eq!(pipeline.stats().jobs_run, 1);
    assert_eq!(pipeline.stats().promotions, 1);
}

#[test]
fn test_slot_replaced_exactly_once_per_settle() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::default());

    for expected in 1..=3 {
        pipeline.tick(1);
        assert_eq!(pipeline.slot(entity).revision(), expected);
        pipeline.tick(2);
        assert_eq!(pipeline.slot(entity).revision(), expected);
        pipeline.request_rebuild(entity);
    }
}

#[test]
fn test_published_indices_in_bounds() {
    let mut pipeline = TestPipeline::with_config(crate::config::MeshBuildConfig {
        promotions_per_pass: 8,
        ..Default::default()
    });
    let shapes = [
        ProceduralShape::Triangle,
        ProceduralShape::Quad { size: 1.0 },
        ProceduralShape::Grid {
            columns: 5,
            rows: 7,
            cell_size: 0.5,
        },
        ProceduralShape::Heightfield {
            columns: 16,
            rows: 16,
            cell_size: 1.0,
            amplitude: 3.0,
            frequency: 0.05,
            seed: 11,
        },
    ];
    let entities: Vec<_> = shapes
        .into_iter()
        .map(|shape| pipeline.spawn(GeometrySource::Procedural(shape)))
        .collect();

    pipeline.tick(1);

    for entity in entities {
        assert_eq!(pipeline.state(entity), BuildState::Settled);
        let vertex_count = pipeline.mesh_positions(entity).len();
        let indices = pipeline.mesh_indices(entity);
        assert_eq!(indices.len() % 3, 0);
        assert!(
            indices.iter().all(|&i| (i as usize) < vertex_count),
            "index out of bounds for {entity}"
        );
    }
}

#[test]
fn test_settle_mirrors_handle_into_mesh3d_and_emits_event() {
    let mut pipeline = TestPipeline::new();
    let entity = pipeline.spawn(GeometrySource::default());

    pipeline.tick(1);

    let slot_handle = pipeline.slot(entity).handle().cloned();
    assert!(slot_handle.is_some());
    assert_eq!(pipeline.mesh3d_handle(entity), slot_handle);

    let events = pipeline.settled_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity, entity);
    assert_eq!(events[0].vertex_count, 3);
    assert_eq!(events[0].index_count, 3);
    assert_eq!(events[0].revision, 1);
}

#[test]
fn test_empty_pass_is_noop() {
    let mut pipeline = TestPipeline::new();
    pipeline.tick(4);

    assert_eq!(pipeline.stats().build_passes, 0);
    assert_eq!(pipeline.stats().promotions, 0);
    assert!(pipeline.settled_events().is_empty());
}
