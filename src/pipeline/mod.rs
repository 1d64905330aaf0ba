//! Vertex pipeline
//!
//! One draw call runs, start to finish:
//! gather -> vertex function -> line expansion -> clip -> perspective divide
//! -> viewport -> one `Backend::line` per surviving segment.
//!
//! The `Context` only borrows the caller's arrays. Its working buffers are
//! cleared at the start of every draw, so nothing carries over between calls.

mod assembly;
mod clip;
mod viewport;

pub use assembly::{expand_lines, gather_arrays, gather_elements, ColorArray, VertexArray};
pub use clip::{clip_lines, clip_point, clip_segment};
pub use viewport::{perspective_divide, Viewport};

use crate::backend::Backend;
use crate::error::PipelineError;
use crate::fixed::Fixed32;
use crate::math::Vec4;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// How a vertex sequence becomes line segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
}

impl DrawMode {
    /// Cycle Points -> Lines -> LineStrip -> LineLoop -> Points
    pub fn next(self) -> Self {
        match self {
            Self::Points => Self::Lines,
            Self::Lines => Self::LineStrip,
            Self::LineStrip => Self::LineLoop,
            Self::LineLoop => Self::Points,
        }
    }
}

/// A position with its RGB555 color. Lives for one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertex {
    pub position: Vec4,
    pub color: u16,
}

impl Vertex {
    pub const fn new(position: Vec4, color: u16) -> Self {
        Self { position, color }
    }
}

/// Render state: viewport, bound arrays and the vertex function.
pub struct Context<'a> {
    viewport: Viewport,
    vertex_array: Option<VertexArray<'a>>,
    color_array: Option<ColorArray<'a>>,
    index_array: Option<&'a [u8]>,
    vertex_function: Option<Box<dyn Fn(Vec4) -> Vec4 + 'a>>,
    gathered: Vec<Vertex>,
    lines: Vec<Vertex>,
}

impl<'a> Context<'a> {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            vertex_array: None,
            color_array: None,
            index_array: None,
            vertex_function: None,
            gathered: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Bind the function applied to every gathered position. It maps model
    /// positions into clip space and is required for drawing.
    pub fn set_vertex_function<F>(&mut self, f: F)
    where
        F: Fn(Vec4) -> Vec4 + 'a,
    {
        self.vertex_function = Some(Box::new(f));
    }

    pub fn clear_vertex_function(&mut self) {
        self.vertex_function = None;
    }

    /// Bind vertex positions: `size` components (2, 3 or 4) every `stride`
    /// elements (0 = tightly packed).
    pub fn set_vertex_pointer(
        &mut self,
        size: u8,
        stride: u8,
        data: &'a [Fixed32],
    ) -> Result<(), PipelineError> {
        self.vertex_array = Some(VertexArray::new(size, stride, data)?);
        Ok(())
    }

    pub fn disable_vertex_pointer(&mut self) {
        self.vertex_array = None;
    }

    /// Bind per-vertex RGB555 colors. Without one every vertex is white.
    pub fn set_color_pointer(&mut self, stride: u8, data: &'a [u16]) {
        self.color_array = Some(ColorArray::new(stride, data));
    }

    pub fn disable_color_pointer(&mut self) {
        self.color_array = None;
    }

    pub fn set_index_pointer(&mut self, data: &'a [u8]) {
        self.index_array = Some(data);
    }

    pub fn disable_index_pointer(&mut self) {
        self.index_array = None;
    }

    /// Draw `count` vertices starting at `first`.
    ///
    /// Does nothing when no vertex array is bound.
    pub fn draw_arrays<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        mode: DrawMode,
        first: usize,
        count: usize,
    ) -> Result<(), PipelineError> {
        let Some(vertices) = self.vertex_array else {
            debug!("draw_arrays skipped: no vertex array bound");
            return Ok(());
        };
        let transform = self
            .vertex_function
            .as_deref()
            .ok_or(PipelineError::MissingVertexFunction)?;

        gather_arrays(vertices, self.color_array, first, count, &mut self.gathered)?;
        run(
            transform,
            self.viewport,
            mode,
            &mut self.gathered,
            &mut self.lines,
            backend,
        )
    }

    /// Draw the vertices named by the first `count` bound indices.
    ///
    /// Does nothing when no vertex array or no index array is bound.
    pub fn draw_elements<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        mode: DrawMode,
        count: usize,
    ) -> Result<(), PipelineError> {
        let (Some(vertices), Some(indices)) = (self.vertex_array, self.index_array) else {
            debug!("draw_elements skipped: vertex or index array not bound");
            return Ok(());
        };
        let transform = self
            .vertex_function
            .as_deref()
            .ok_or(PipelineError::MissingVertexFunction)?;

        gather_elements(vertices, self.color_array, indices, count, &mut self.gathered)?;
        run(
            transform,
            self.viewport,
            mode,
            &mut self.gathered,
            &mut self.lines,
            backend,
        )
    }
}

impl Default for Context<'_> {
    fn default() -> Self {
        Self::new(Viewport::DEFAULT)
    }
}

fn run<B: Backend + ?Sized>(
    transform: &dyn Fn(Vec4) -> Vec4,
    viewport: Viewport,
    mode: DrawMode,
    gathered: &mut [Vertex],
    lines: &mut Vec<Vertex>,
    backend: &mut B,
) -> Result<(), PipelineError> {
    for v in gathered.iter_mut() {
        v.position = transform(v.position);
    }

    expand_lines(mode, gathered, lines);
    let candidates = lines.len() / 2;
    clip_lines(lines)?;
    perspective_divide(lines)?;
    viewport.apply(lines);
    let drawn = dispatch(lines, backend);

    trace!(?mode, vertices = gathered.len(), candidates, drawn, "draw call");
    Ok(())
}

/// Issue one `line` per vertex pair, truncating positions to whole pixels and
/// coloring the segment with its first vertex. Returns the number of lines.
pub fn dispatch<B: Backend + ?Sized>(vertices: &[Vertex], backend: &mut B) -> usize {
    let mut drawn = 0;
    for pair in vertices.chunks_exact(2) {
        let (a, b) = (pair[0].position, pair[1].position);
        backend.line(
            a.x.to_i32(),
            a.y.to_i32(),
            b.x.to_i32(),
            b.y.to_i32(),
            pair[0].color,
        );
        drawn += 1;
    }
    drawn
}
