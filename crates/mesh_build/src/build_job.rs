//! Parallel phase of a pass: rebuild the buffers of every tagged entity.
//!
//! Each job only receives its own entity's `VertexBuffer` / `IndexBuffer`
//! through the query, so jobs for different entities can run on any worker
//! without coordination. The identities of touched entities are collected in
//! per-thread queues and merged into `BuildOutput` once the parallel loop has
//! joined, ordered by their `PendingSince` stamp.

use bevy::ecs::entity::EntityHashMap;
use bevy::prelude::*;
use bevy::utils::Parallel;

use crate::components::{IndexBuffer, NeedsGeometry, PendingSince, VertexBuffer};
use crate::error::MeshBuildError;
use crate::geometry::{GeometrySource, GeometryWriter};
use crate::stats::MeshBuildStats;

/// Entities built during the current pass, longest pending first.
///
/// Written by `run_build_jobs`, drained by `finalize_builds`. Empty means no
/// entity was processed this pass.
#[derive(Resource, Default, Debug)]
pub struct BuildOutput {
    pub(crate) entities: Vec<Entity>,
    /// Entities whose source refused to produce geometry this pass.
    pub(crate) failed: EntityHashMap<MeshBuildError>,
}

impl BuildOutput {
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn failure(&self, entity: Entity) -> Option<&MeshBuildError> {
        self.failed.get(&entity)
    }

    pub(crate) fn clear(&mut self) {
        self.entities.clear();
        self.failed.clear();
    }
}

/// `(pending since, entity, failure)` for one job.
type JobRecord = (u64, Entity, Option<MeshBuildError>);

#[allow(clippy::type_complexity)]
pub fn run_build_jobs(
    mut jobs: Query<
        (
            Entity,
            &GeometrySource,
            Option<&PendingSince>,
            &mut VertexBuffer,
            &mut IndexBuffer,
        ),
        With<NeedsGeometry>,
    >,
    mut records: Local<Parallel<Vec<JobRecord>>>,
    mut merged: Local<Vec<JobRecord>>,
    mut output: ResMut<BuildOutput>,
    mut stats: ResMut<MeshBuildStats>,
) {
    output.clear();

    let queue: &Parallel<Vec<JobRecord>> = &records;
    jobs.par_iter_mut().for_each(
        |(entity, source, pending_since, mut vertices, mut indices)| {
            // A rebuild replaces the previous geometry, never extends it.
            vertices.clear();
            indices.clear();
            let failure = source.check().err();
            if failure.is_none() {
                source.produce(&mut GeometryWriter::new(&mut vertices.0, &mut indices.0));
            }
            trace!(
                "Built {} ({}): {} vertices, {} indices",
                entity,
                source.label(),
                vertices.len(),
                indices.len()
            );
            queue
                .borrow_local_mut()
                .push((pending_since.map_or(0, |p| p.0), entity, failure));
        },
    );

    records.drain_into(&mut merged);
    if merged.is_empty() {
        return;
    }
    merged.sort_unstable_by_key(|(since, entity, _)| (*since, *entity));

    stats.build_passes += 1;
    stats.jobs_run += merged.len() as u64;

    for (_, entity, failure) in merged.drain(..) {
        output.entities.push(entity);
        if let Some(err) = failure {
            output.failed.insert(entity, err);
        }
    }
}
