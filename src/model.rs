//! Wireframe models
//!
//! A model owns the arrays a `Context` borrows during a draw. Models load
//! from JSON:
//!
//! ```json
//! {
//!   "name": "triangle",
//!   "mode": "LineLoop",
//!   "size": 2,
//!   "positions": [-0.5, -0.5, 0.5, -0.5, 0.0, 0.5],
//!   "colors": [[255, 0, 0], [0, 255, 0], [0, 0, 255]]
//! }
//! ```
//!
//! `size` defaults to 3, `colors` and `indices` are optional.

use crate::backend::Backend;
use crate::color::rgb888_to_555;
use crate::error::PipelineError;
use crate::fixed::Fixed32;
use crate::pipeline::{Context, DrawMode};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize)]
struct ModelFile {
    #[serde(default)]
    name: String,
    mode: DrawMode,
    #[serde(default = "default_size")]
    size: u8,
    positions: Vec<Fixed32>,
    #[serde(default)]
    colors: Option<Vec<[u8; 3]>>,
    #[serde(default)]
    indices: Option<Vec<u8>>,
}

fn default_size() -> u8 {
    3
}

/// Vertex data plus the topology it is drawn with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub name: String,
    pub mode: DrawMode,
    /// Components per position (2, 3 or 4)
    pub size: u8,
    pub positions: Vec<Fixed32>,
    /// RGB555, one per vertex
    pub colors: Option<Vec<u16>>,
    pub indices: Option<Vec<u8>>,
}

impl Model {
    /// Unit cube centered at the origin, 12 edges drawn as indexed lines
    pub fn cube() -> Self {
        let h = Fixed32::HALF;
        let corners = [
            [-h, -h, -h], // 0: back-bottom-left
            [h, -h, -h],  // 1: back-bottom-right
            [h, h, -h],   // 2: back-top-right
            [-h, h, -h],  // 3: back-top-left
            [-h, -h, h],  // 4: front-bottom-left
            [h, -h, h],   // 5: front-bottom-right
            [h, h, h],    // 6: front-top-right
            [-h, h, h],   // 7: front-top-left
        ];
        let colors = vec![
            rgb888_to_555(255, 64, 64),
            rgb888_to_555(255, 255, 64),
            rgb888_to_555(64, 255, 64),
            rgb888_to_555(64, 255, 255),
            rgb888_to_555(64, 64, 255),
            rgb888_to_555(255, 64, 255),
            rgb888_to_555(255, 255, 255),
            rgb888_to_555(255, 160, 64),
        ];
        let indices = vec![
            0, 1, 1, 2, 2, 3, 3, 0, // back face
            4, 5, 5, 6, 6, 7, 7, 4, // front face
            0, 4, 1, 5, 2, 6, 3, 7, // connecting edges
        ];

        Self {
            name: "cube".to_string(),
            mode: DrawMode::Lines,
            size: 3,
            positions: corners.iter().flatten().copied().collect(),
            colors: Some(colors),
            indices: Some(indices),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let file: ModelFile = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let model = Self {
            name: file.name,
            mode: file.mode,
            size: file.size,
            positions: file.positions,
            colors: file.colors.map(|colors| {
                colors
                    .iter()
                    .map(|&[r, g, b]| rgb888_to_555(r, g, b))
                    .collect()
            }),
            indices: file.indices,
        };
        model.validate()?;
        Ok(model)
    }

    /// Load a model from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_json(&json)
    }

    fn validate(&self) -> Result<(), String> {
        if !(2..=4).contains(&self.size) {
            return Err(format!("size must be 2, 3 or 4 (got {})", self.size));
        }
        let size = usize::from(self.size);
        if self.positions.len() % size != 0 {
            return Err(format!(
                "{} position components do not divide into vertices of size {}",
                self.positions.len(),
                size
            ));
        }
        let count = self.vertex_count();
        if let Some(colors) = &self.colors {
            if colors.len() != count {
                return Err(format!("{} colors for {} vertices", colors.len(), count));
            }
        }
        if let Some(bad) = self
            .indices
            .iter()
            .flatten()
            .find(|&&i| usize::from(i) >= count)
        {
            return Err(format!("index {} out of range for {} vertices", bad, count));
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / usize::from(self.size.max(1))
    }

    /// Bind this model's arrays into `ctx` and draw it with its own mode.
    pub fn draw<'a, B: Backend + ?Sized>(
        &'a self,
        ctx: &mut Context<'a>,
        backend: &mut B,
    ) -> Result<(), PipelineError> {
        self.draw_as(ctx, backend, self.mode)
    }

    /// Like [`Model::draw`] with a different topology.
    pub fn draw_as<'a, B: Backend + ?Sized>(
        &'a self,
        ctx: &mut Context<'a>,
        backend: &mut B,
        mode: DrawMode,
    ) -> Result<(), PipelineError> {
        ctx.set_vertex_pointer(self.size, 0, &self.positions)?;
        match &self.colors {
            Some(colors) => ctx.set_color_pointer(0, colors),
            None => ctx.disable_color_pointer(),
        }
        match &self.indices {
            Some(indices) => {
                ctx.set_index_pointer(indices);
                ctx.draw_elements(backend, mode, indices.len())
            }
            None => {
                ctx.disable_index_pointer();
                ctx.draw_arrays(backend, mode, 0, self.vertex_count())
            }
        }
    }
}
