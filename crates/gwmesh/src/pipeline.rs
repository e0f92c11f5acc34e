//! The load, filter, extract and build pipeline.

use serde::Serialize;

use gwmesh_core::{PipelineOptions, Result};
use gwmesh_render::{MeshState, VtkJsState};
use gwmesh_structures::{
    extract, load_vtk, FieldStateBuilder, UnstructuredGrid, ValidityFilter,
};

/// One stacked render layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name from the options.
    pub name: String,
    /// Renderer-ready geometry and attribute.
    pub state: MeshState,
}

/// The pipeline output: layers in stacking order, first drawn first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// Layers in configuration order.
    pub layers: Vec<Layer>,
}

impl Scene {
    /// Looks up a layer by name.
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    /// Iterates over the layers in stacking order.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Returns the number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if the scene has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Serializes the scene as `{"layers": [{"name", "state"}]}` with each
    /// state in the vtk.js layout.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_export())?)
    }

    /// Pretty-printed variant of [`Self::to_json_string`].
    pub fn to_json_string_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_export())?)
    }

    fn to_export(&self) -> SceneExport<'_> {
        SceneExport {
            layers: self
                .layers
                .iter()
                .map(|layer| LayerExport {
                    name: &layer.name,
                    state: layer.state.to_vtk_js(),
                })
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Scene {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[derive(Serialize)]
struct SceneExport<'a> {
    layers: Vec<LayerExport<'a>>,
}

#[derive(Serialize)]
struct LayerExport<'a> {
    name: &'a str,
    state: VtkJsState<'a>,
}

/// A configured, one-shot pipeline run.
///
/// Stages run in order and the first failure ends the run:
/// load the snapshot, check every layer's field, then per layer filter,
/// extract and build its mesh state.
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    /// Creates a pipeline. Options are validated when it runs.
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    /// Returns the options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Loads the configured snapshot and runs every layer on it.
    pub fn run(&self) -> Result<Scene> {
        self.options.validate()?;
        log::info!("loading snapshot {}", self.options.snapshot.display());
        let grid = load_vtk(&self.options.snapshot)?;
        self.build_layers(&grid)
    }

    /// Runs every layer on an already loaded grid.
    pub fn run_on(&self, grid: &UnstructuredGrid) -> Result<Scene> {
        self.options.validate()?;
        self.build_layers(grid)
    }

    fn build_layers(&self, grid: &UnstructuredGrid) -> Result<Scene> {
        // Every field must exist before any layer does work
        for layer in &self.options.layers {
            grid.field(&layer.field)?;
        }

        let mut layers = Vec::with_capacity(self.options.layers.len());
        for options in &self.options.layers {
            let builder = FieldStateBuilder::from_layer(options);
            let state = match &options.filter {
                Some(rule) => {
                    log::info!("layer '{}': filtering on '{}'", options.name, options.field);
                    let mask = ValidityFilter::new(options.field.clone(), rule.clone()).mask(grid)?;
                    log::info!(
                        "layer '{}': extracting {} of {} cells",
                        options.name,
                        mask.retained_count(),
                        mask.len()
                    );
                    let filtered = extract(grid, &mask)?;
                    builder.build(&filtered)?
                }
                None => builder.build(grid)?,
            };
            log::info!(
                "layer '{}' ready: {} points, {} polys, range [{}, {}]",
                options.name,
                state.num_points(),
                state.num_polys(),
                state.color_range().min(),
                state.color_range().max()
            );
            layers.push(Layer {
                name: options.name.clone(),
                state,
            });
        }
        Ok(Scene { layers })
    }
}
