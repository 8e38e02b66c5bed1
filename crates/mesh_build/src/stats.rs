use bevy::prelude::*;

/// Running counters for the build pipeline. Used by tests and the demo summary.
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct MeshBuildStats {
    /// Passes in which at least one build job ran.
    pub build_passes: u64,
    /// Total build job invocations (one per tagged entity per pass).
    pub jobs_run: u64,
    /// Meshes published into slots.
    pub promotions: u64,
    /// Built entities left tagged because the per-pass promotion limit was hit.
    pub deferred: u64,
    /// Builds whose geometry failed validation.
    pub invalid_geometry: u64,
    /// Tags removed from entities lacking the components needed to build.
    pub rejected_tags: u64,
    /// Rebuild requests refused at the request boundary.
    pub rejected_requests: u64,
    /// Rebuild requests for entities that were already pending.
    pub coalesced_requests: u64,
}
