//! Tag-driven mesh build pipeline.
//!
//! Entities carrying a [`GeometrySource`] own a `VertexBuffer`, an
//! `IndexBuffer` and a `MeshSlot`. Adding the [`NeedsGeometry`] tag schedules a
//! rebuild. Each pass in `Update` runs three ordered phases:
//!
//! ```text
//! Requests  →  Build (parallel, one job per tagged entity)  →  Finalize (serial)
//! ```
//!
//! * **Requests** – apply `RequestRebuild` events, drop tags from entities
//!   that cannot be built and stamp newly pending entities with `PendingSince`.
//! * **Build** – clear and refill the buffers of every tagged entity, recording
//!   which entities were touched in `BuildOutput`.
//! * **Finalize** – for up to `MeshBuildConfig::promotions_per_pass` of them,
//!   longest pending first:
//!   remove the tag, validate the buffers, publish a new `Mesh` into the slot
//!   and emit `MeshSettled`.
//!
//! The plugin expects `Assets<Mesh>` to be registered by the host (the render
//! plugins do this; headless apps call `init_asset::<Mesh>()`).

use bevy::prelude::*;

pub mod authoring;
pub mod build_job;
pub mod components;
pub mod config;
pub mod error;
pub mod finalize;
pub mod geometry;
pub mod requests;
pub mod stats;

#[cfg(test)]
mod integration_tests;
#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use authoring::{
    generator_bundle, parse_authoring, spawn_authored, spawn_generator, GeneratorAuthoring,
    GeometryDescriptor,
};
pub use build_job::BuildOutput;
pub use components::{
    BuildState, GeometryRejected, IndexBuffer, MeshSlot, NeedsGeometry, PendingSince,
    VertexBuffer,
};
pub use config::MeshBuildConfig;
pub use error::MeshBuildError;
pub use finalize::MeshSettled;
pub use geometry::{FixedGeometry, GeometryProducer, GeometrySource, GeometryWriter, ProceduralShape};
pub use requests::{MeshBuildCommandsExt, RequestRebuild};
pub use stats::MeshBuildStats;

/// Ordered phases of a build pass in the `Update` schedule.
///
/// Configured as a chain: `Requests` → `Build` → `Finalize`. Bevy flushes
/// commands between the phases, so tags inserted by requests are visible to
/// the build job and tag removals from finalize are committed before the next
/// pass begins.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum MeshBuildSet {
    /// Rebuild requests and tag validation.
    Requests,
    /// Parallel per-entity build jobs.
    Build,
    /// Serial promotion of built buffers into meshes.
    Finalize,
}

pub struct MeshBuildPlugin;

impl Plugin for MeshBuildPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeshBuildConfig>()
            .init_resource::<MeshBuildStats>()
            .init_resource::<BuildOutput>()
            .add_event::<RequestRebuild>()
            .add_event::<MeshSettled>()
            .configure_sets(
                Update,
                (
                    MeshBuildSet::Requests,
                    MeshBuildSet::Build,
                    MeshBuildSet::Finalize,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    (
                        requests::apply_rebuild_requests,
                        requests::reject_orphan_tags,
                        requests::stamp_pending_order,
                    )
                        .chain()
                        .in_set(MeshBuildSet::Requests),
                    build_job::run_build_jobs.in_set(MeshBuildSet::Build),
                    finalize::finalize_builds.in_set(MeshBuildSet::Finalize),
                ),
            );

        if let Err(err) = app.world().resource::<MeshBuildConfig>().validate() {
            warn!("{err}; finalize will promote one entity per pass");
        }
    }
}
