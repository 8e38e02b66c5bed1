//! Tag boundary: how entities become pending.
//!
//! `RequestRebuild` is the checked way in. Requests are applied at the start
//! of a pass, before any build job runs, so swapping an entity's source can
//! never tear a build. Tags inserted by hand are checked by
//! `reject_orphan_tags` before the build phase. Every tag that survives is
//! stamped with `PendingSince`, which orders promotion in the finalize step.

use bevy::ecs::entity::EntityHashSet;
use bevy::prelude::*;

use crate::components::{IndexBuffer, MeshSlot, NeedsGeometry, PendingSince, VertexBuffer};
use crate::error::MeshBuildError;
use crate::geometry::GeometrySource;
use crate::stats::MeshBuildStats;

/// Ask for an entity's geometry to be rebuilt, optionally with a new source.
#[derive(Event, Debug, Clone)]
pub struct RequestRebuild {
    pub entity: Entity,
    pub source: Option<GeometrySource>,
}

impl RequestRebuild {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            source: None,
        }
    }

    pub fn with_source(entity: Entity, source: GeometrySource) -> Self {
        Self {
            entity,
            source: Some(source),
        }
    }
}

/// Names of the components a buildable entity is missing, in a stable order.
pub fn missing_components(
    has_source: bool,
    has_vertices: bool,
    has_indices: bool,
    has_slot: bool,
) -> Vec<&'static str> {
    [
        (has_source, "GeometrySource"),
        (has_vertices, "VertexBuffer"),
        (has_indices, "IndexBuffer"),
        (has_slot, "MeshSlot"),
    ]
    .into_iter()
    .filter_map(|(present, name)| (!present).then_some(name))
    .collect()
}

#[allow(clippy::type_complexity)]
pub fn apply_rebuild_requests(
    mut commands: Commands,
    mut requests: EventReader<RequestRebuild>,
    mut targets: Query<(
        Option<&mut GeometrySource>,
        Has<VertexBuffer>,
        Has<IndexBuffer>,
        Has<MeshSlot>,
        Has<NeedsGeometry>,
    )>,
    mut tagged_this_pass: Local<EntityHashSet>,
    mut stats: ResMut<MeshBuildStats>,
) {
    tagged_this_pass.clear();

    for request in requests.read() {
        let entity = request.entity;
        let Ok((source, has_vertices, has_indices, has_slot, pending)) = targets.get_mut(entity)
        else {
            warn!(
                "Rebuild request refused: {}",
                MeshBuildError::MissingEntity(entity)
            );
            stats.rejected_requests += 1;
            continue;
        };

        let missing = missing_components(source.is_some(), has_vertices, has_indices, has_slot);
        let Some(mut source) = source.filter(|_| missing.is_empty()) else {
            warn!(
                "Rebuild request refused: {}",
                MeshBuildError::MissingComponents { entity, missing }
            );
            stats.rejected_requests += 1;
            continue;
        };

        if let Some(replacement) = &request.source {
            *source = replacement.clone();
        }

        if pending || !tagged_this_pass.insert(entity) {
            stats.coalesced_requests += 1;
            continue;
        }
        commands.entity(entity).insert(NeedsGeometry);
    }
}

#[allow(clippy::type_complexity)]
pub fn reject_orphan_tags(
    mut commands: Commands,
    orphans: Query<
        (
            Entity,
            Has<GeometrySource>,
            Has<VertexBuffer>,
            Has<IndexBuffer>,
            Has<MeshSlot>,
        ),
        (
            With<NeedsGeometry>,
            Or<(
                Without<GeometrySource>,
                Without<VertexBuffer>,
                Without<IndexBuffer>,
                Without<MeshSlot>,
            )>,
        ),
    >,
    mut stats: ResMut<MeshBuildStats>,
) {
    for (entity, has_source, has_vertices, has_indices, has_slot) in &orphans {
        let missing = missing_components(has_source, has_vertices, has_indices, has_slot);
        warn!(
            "Removing build tag: {}",
            MeshBuildError::MissingComponents { entity, missing }
        );
        commands
            .entity(entity)
            .remove::<(NeedsGeometry, PendingSince)>();
        stats.rejected_tags += 1;
    }
}

/// Give every newly tagged entity the next `PendingSince` stamp.
///
/// Entities tagged in the same pass are stamped in entity order.
#[allow(clippy::type_complexity)]
pub fn stamp_pending_order(
    mut commands: Commands,
    newly_pending: Query<
        Entity,
        (
            With<NeedsGeometry>,
            Or<(Without<PendingSince>, Added<NeedsGeometry>)>,
        ),
    >,
    mut next_stamp: Local<u64>,
) {
    let mut entities: Vec<Entity> = newly_pending.iter().collect();
    entities.sort_unstable();
    for entity in entities {
        commands.entity(entity).insert(PendingSince(*next_stamp));
        *next_stamp += 1;
    }
}

/// Queue rebuild requests from any system holding `Commands`.
pub trait MeshBuildCommandsExt {
    fn request_geometry_rebuild(&mut self, entity: Entity);

    fn replace_geometry(&mut self, entity: Entity, source: GeometrySource);
}

impl MeshBuildCommandsExt for Commands<'_, '_> {
    fn request_geometry_rebuild(&mut self, entity: Entity) {
        self.queue(move |world: &mut World| {
            world.send_event(RequestRebuild::new(entity));
        });
    }

    fn replace_geometry(&mut self, entity: Entity, source: GeometrySource) {
        self.queue(move |world: &mut World| {
            world.send_event(RequestRebuild::with_source(entity, source));
        });
    }
}
