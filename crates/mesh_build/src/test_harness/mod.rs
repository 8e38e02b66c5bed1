//! # TestPipeline: headless harness for the mesh build pipeline
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins`, the asset plugin,
//! `Assets<Mesh>` and `MeshBuildPlugin`, so tests can spawn generators, run
//! passes and inspect slots without a window or renderer.

mod queries;

use bevy::app::App;
use bevy::ecs::world::CommandQueue;
use bevy::prelude::*;

use crate::authoring::{generator_bundle, GeneratorAuthoring};
use crate::config::MeshBuildConfig;
use crate::finalize::MeshSettled;
use crate::geometry::GeometrySource;
use crate::requests::RequestRebuild;
use crate::MeshBuildPlugin;

/// A headless Bevy App running the build pipeline.
///
/// Every `tick()` is one full pass: requests, parallel build, finalize.
pub struct TestPipeline {
    app: App,
    settled: Vec<MeshSettled>,
}

impl Default for TestPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPipeline {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Pipeline with the default config (one promotion per pass).
    pub fn new() -> Self {
        Self::with_config(MeshBuildConfig::default())
    }

    /// Pipeline with a custom config, inserted before the plugin so it wins
    /// over the plugin's defaults.
    pub fn with_config(config: MeshBuildConfig) -> Self {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, AssetPlugin::default()));
        app.init_asset::<Mesh>();
        app.insert_resource(config);
        app.add_plugins(MeshBuildPlugin);
        app.finish();
        app.cleanup();

        // Run Startup once so the first tick() is a plain pass.
        app.update();

        Self {
            app,
            settled: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Spawning and requests
    // -----------------------------------------------------------------------

    /// Spawn a pending generator (empty buffers, empty slot, tag present).
    pub fn spawn(&mut self, source: GeometrySource) -> Entity {
        self.app
            .world_mut()
            .spawn(generator_bundle(source, Transform::default()))
            .id()
    }

    /// Spawn a generator that is not tagged yet.
    pub fn spawn_untagged(&mut self, source: GeometrySource) -> Entity {
        self.app.world_mut().spawn(source).id()
    }

    /// Spawn through the same `Commands` path a game system would use.
    pub fn spawn_authored(&mut self, authoring: &GeneratorAuthoring) -> Entity {
        let world = self.app.world_mut();
        let mut queue = CommandQueue::default();
        let entity = {
            let mut commands = Commands::new(&mut queue, world);
            crate::authoring::spawn_authored(&mut commands, authoring)
        };
        queue.apply(world);
        entity
    }

    /// Send a checked rebuild request; applied on the next tick.
    pub fn request_rebuild(&mut self, entity: Entity) {
        self.app
            .world_mut()
            .send_event(RequestRebuild::new(entity));
    }

    pub fn request_rebuild_with(&mut self, entity: Entity, source: GeometrySource) {
        self.app
            .world_mut()
            .send_event(RequestRebuild::with_source(entity, source));
    }

    /// Insert the build tag directly, bypassing request validation.
    pub fn insert_tag(&mut self, entity: Entity) {
        self.app
            .world_mut()
            .entity_mut(entity)
            .insert(crate::components::NeedsGeometry);
    }

    // -----------------------------------------------------------------------
    // Passes
    // -----------------------------------------------------------------------

    /// Run `n` full passes, collecting every `MeshSettled` event.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
            let events = self.app.world().resource::<Events<MeshSettled>>();
            self.settled
                .extend(events.iter_current_update_events().cloned());
        }
    }

    /// All `MeshSettled` events seen so far, oldest first.
    pub fn settled_events(&self) -> &[MeshSettled] {
        &self.settled
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }
}
