//! Process-wide scene cache.
//!
//! The scene is built once at startup and shared read-only afterwards.

use std::sync::OnceLock;

use gwmesh_core::{GwMeshError, PipelineOptions, Result};

use crate::pipeline::{Pipeline, Scene};

/// Global scene singleton.
static SCENE: OnceLock<Scene> = OnceLock::new();

/// Runs the pipeline and caches its scene for the rest of the process.
///
/// Fails with `AlreadyInitialized` if a scene is already cached, without
/// running anything.
pub fn init(options: PipelineOptions) -> Result<&'static Scene> {
    if is_initialized() {
        return Err(GwMeshError::AlreadyInitialized);
    }
    let scene = Pipeline::new(options).run()?;
    init_with_scene(scene)
}

/// Caches a prebuilt scene.
pub fn init_with_scene(scene: Scene) -> Result<&'static Scene> {
    SCENE
        .set(scene)
        .map_err(|_| GwMeshError::AlreadyInitialized)?;
    log::info!("gwmesh scene initialized");
    SCENE.get().ok_or(GwMeshError::AlreadyInitialized)
}

/// Returns the cached scene, if any.
pub fn scene() -> Option<&'static Scene> {
    SCENE.get()
}

/// Returns whether a scene has been cached.
pub fn is_initialized() -> bool {
    SCENE.get().is_some()
}
