//! Primitive assembly
//!
//! Gathers the bound arrays into `Vertex` values, then expands a draw mode
//! into a flat list where every consecutive pair is one line segment.

use super::{DrawMode, Vertex};
use crate::color::WHITE;
use crate::error::PipelineError;
use crate::fixed::Fixed32;
use crate::math::Vec4;
use tracing::warn;

/// Borrowed array of vertex positions.
#[derive(Debug, Clone, Copy)]
pub struct VertexArray<'a> {
    data: &'a [Fixed32],
    size: u8,
    stride: usize,
}

impl<'a> VertexArray<'a> {
    /// `size` is the component count per vertex (2, 3 or 4). `stride` is the
    /// distance in elements between the starts of two vertices; 0 means
    /// tightly packed.
    pub fn new(size: u8, stride: u8, data: &'a [Fixed32]) -> Result<Self, PipelineError> {
        if !(2..=4).contains(&size) {
            return Err(PipelineError::InvalidVertexSize(size));
        }
        let stride = if stride == 0 { size } else { stride };
        Ok(Self {
            data,
            size,
            stride: usize::from(stride),
        })
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    /// Number of complete vertices in the array.
    pub fn len(&self) -> usize {
        let size = usize::from(self.size);
        if self.data.len() < size {
            0
        } else {
            (self.data.len() - size) / self.stride + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one position. Missing z is padded with zero, missing w with one.
    pub fn fetch(&self, index: usize) -> Result<Vec4, PipelineError> {
        let size = usize::from(self.size);
        let components = index
            .checked_mul(self.stride)
            .and_then(|start| self.data.get(start..start.checked_add(size)?))
            .ok_or(PipelineError::VertexOutOfRange {
                index,
                len: self.len(),
            })?;

        let mut position = Vec4::point(Fixed32::ZERO, Fixed32::ZERO, Fixed32::ZERO);
        for (axis, &c) in components.iter().enumerate() {
            position[axis] = c;
        }
        Ok(position)
    }
}

/// Borrowed array of RGB555 colors.
#[derive(Debug, Clone, Copy)]
pub struct ColorArray<'a> {
    data: &'a [u16],
    stride: usize,
}

impl<'a> ColorArray<'a> {
    /// `stride` in elements; 0 means tightly packed.
    pub fn new(stride: u8, data: &'a [u16]) -> Self {
        Self {
            data,
            stride: usize::from(stride.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        if self.data.is_empty() {
            0
        } else {
            (self.data.len() - 1) / self.stride + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn fetch(&self, index: usize) -> Result<u16, PipelineError> {
        index
            .checked_mul(self.stride)
            .and_then(|i| self.data.get(i))
            .copied()
            .ok_or(PipelineError::ColorOutOfRange {
                index,
                len: self.len(),
            })
    }
}

fn gather_one(
    vertices: VertexArray<'_>,
    colors: Option<ColorArray<'_>>,
    index: usize,
) -> Result<Vertex, PipelineError> {
    let position = vertices.fetch(index)?;
    let color = match colors {
        Some(colors) => colors.fetch(index)?,
        None => WHITE,
    };
    Ok(Vertex { position, color })
}

/// Gather `count` consecutive vertices starting at `first`.
pub fn gather_arrays(
    vertices: VertexArray<'_>,
    colors: Option<ColorArray<'_>>,
    first: usize,
    count: usize,
    out: &mut Vec<Vertex>,
) -> Result<(), PipelineError> {
    out.clear();
    for index in (first..).take(count) {
        out.push(gather_one(vertices, colors, index)?);
    }
    Ok(())
}

/// Gather the vertices named by the first `count` entries of `indices`.
/// Colors are looked up through the same index.
pub fn gather_elements(
    vertices: VertexArray<'_>,
    colors: Option<ColorArray<'_>>,
    indices: &[u8],
    count: usize,
    out: &mut Vec<Vertex>,
) -> Result<(), PipelineError> {
    out.clear();
    let indices = indices
        .get(..count)
        .ok_or(PipelineError::IndexOutOfRange {
            count,
            len: indices.len(),
        })?;
    for &index in indices {
        out.push(gather_one(vertices, colors, usize::from(index))?);
    }
    Ok(())
}

/// Expand `src` by `mode` into segment pairs written to `out`.
///
/// - `Points`: `(Vi, Vi)` for every vertex
/// - `Lines`: unchanged; an odd trailing vertex has no partner and is dropped
/// - `LineStrip`: `(Vi, Vi+1)`
/// - `LineLoop`: the strip plus the closing `(Vn-1, V0)`
///
/// Strips and loops with fewer than two vertices produce nothing.
pub fn expand_lines(mode: DrawMode, src: &[Vertex], out: &mut Vec<Vertex>) {
    out.clear();
    match mode {
        DrawMode::Points => {
            for &v in src {
                out.push(v);
                out.push(v);
            }
        }
        DrawMode::Lines => {
            let paired = src.len() & !1;
            if paired != src.len() {
                warn!(vertices = src.len(), "odd vertex count for Lines, dropping last vertex");
            }
            out.extend_from_slice(&src[..paired]);
        }
        DrawMode::LineStrip | DrawMode::LineLoop => {
            for pair in src.windows(2) {
                out.extend_from_slice(pair);
            }
            if mode == DrawMode::LineLoop && src.len() >= 2 {
                out.push(src[src.len() - 1]);
                out.push(src[0]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: f32) -> Fixed32 {
        Fixed32::from_f32(v)
    }

    fn vert(n: i16) -> Vertex {
        Vertex::new(
            Vec4::point(Fixed32::from_int(n), Fixed32::ZERO, Fixed32::ZERO),
            n as u16,
        )
    }

    fn expand(mode: DrawMode, src: &[Vertex]) -> Vec<Vertex> {
        let mut out = Vec::new();
        expand_lines(mode, src, &mut out);
        out
    }

    #[test]
    fn test_fetch_pads_missing_components() {
        let data2 = [fx(1.0), fx(2.0)];
        let a2 = VertexArray::new(2, 0, &data2).unwrap();
        assert_eq!(a2.fetch(0).unwrap(), Vec4::from_f32(1.0, 2.0, 0.0, 1.0));

        let data3 = [fx(1.0), fx(2.0), fx(3.0)];
        let a3 = VertexArray::new(3, 0, &data3).unwrap();
        assert_eq!(a3.fetch(0).unwrap(), Vec4::from_f32(1.0, 2.0, 3.0, 1.0));

        let data4 = [fx(1.0), fx(2.0), fx(3.0), fx(0.5)];
        let a4 = VertexArray::new(4, 0, &data4).unwrap();
        assert_eq!(a4.fetch(0).unwrap(), Vec4::from_f32(1.0, 2.0, 3.0, 0.5));
    }

    #[test]
    fn test_fetch_with_stride() {
        // Two xy positions interleaved with an unused component
        let data = [fx(1.0), fx(2.0), fx(99.0), fx(3.0), fx(4.0)];
        let array = VertexArray::new(2, 3, &data).unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array.fetch(1).unwrap(), Vec4::from_f32(3.0, 4.0, 0.0, 1.0));
        assert_eq!(
            array.fetch(2),
            Err(PipelineError::VertexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_invalid_vertex_size() {
        let data = [Fixed32::ZERO; 8];
        assert_eq!(
            VertexArray::new(1, 0, &data).unwrap_err(),
            PipelineError::InvalidVertexSize(1)
        );
        assert_eq!(
            VertexArray::new(5, 0, &data).unwrap_err(),
            PipelineError::InvalidVertexSize(5)
        );
    }

    #[test]
    fn test_color_array_stride() {
        let colors = [10, 0, 20, 0, 30];
        let array = ColorArray::new(2, &colors);
        assert_eq!(array.len(), 3);
        assert_eq!(array.fetch(2), Ok(30));
        assert_eq!(
            array.fetch(3),
            Err(PipelineError::ColorOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_gather_arrays_default_color() {
        let data = [fx(0.0), fx(0.0), fx(1.0), fx(1.0), fx(2.0), fx(2.0)];
        let array = VertexArray::new(2, 0, &data).unwrap();
        let mut out = Vec::new();
        gather_arrays(array, None, 1, 2, &mut out).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, Vec4::from_f32(1.0, 1.0, 0.0, 1.0));
        assert!(out.iter().all(|v| v.color == WHITE));
    }

    #[test]
    fn test_gather_arrays_colors_by_direct_index() {
        let data = [fx(0.0), fx(0.0), fx(1.0), fx(1.0), fx(2.0), fx(2.0)];
        let colors = [100, 200, 300];
        let array = VertexArray::new(2, 0, &data).unwrap();
        let mut out = Vec::new();
        gather_arrays(array, Some(ColorArray::new(0, &colors)), 1, 2, &mut out).unwrap();
        assert_eq!(out[0].color, 200);
        assert_eq!(out[1].color, 300);
    }

    #[test]
    fn test_gather_elements_colors_through_index() {
        let data = [fx(0.0), fx(0.0), fx(1.0), fx(1.0), fx(2.0), fx(2.0)];
        let colors = [100, 200, 300];
        let indices = [2, 0, 1];
        let array = VertexArray::new(2, 0, &data).unwrap();
        let mut out = Vec::new();
        gather_elements(
            array,
            Some(ColorArray::new(0, &colors)),
            &indices,
            2,
            &mut out,
        )
        .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].position, Vec4::from_f32(2.0, 2.0, 0.0, 1.0));
        assert_eq!(out[0].color, 300);
        assert_eq!(out[1].color, 100);

        assert_eq!(
            gather_elements(array, None, &indices, 4, &mut out),
            Err(PipelineError::IndexOutOfRange { count: 4, len: 3 })
        );
    }

    #[test]
    fn test_gather_clears_previous_contents() {
        let data = [fx(0.0), fx(0.0)];
        let array = VertexArray::new(2, 0, &data).unwrap();
        let mut out = vec![vert(7); 5];
        gather_arrays(array, None, 0, 0, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_expand_points() {
        let (p0, p1) = (vert(0), vert(1));
        assert_eq!(expand(DrawMode::Points, &[p0, p1]), vec![p0, p0, p1, p1]);
    }

    #[test]
    fn test_expand_lines() {
        let v: Vec<_> = (0..4).map(vert).collect();
        assert_eq!(expand(DrawMode::Lines, &v), v);
        assert_eq!(expand(DrawMode::Lines, &v[..3]), v[..2].to_vec());
    }

    #[test]
    fn test_expand_strip_and_loop() {
        let (p0, p1, p2) = (vert(0), vert(1), vert(2));
        assert_eq!(
            expand(DrawMode::LineStrip, &[p0, p1, p2]),
            vec![p0, p1, p1, p2]
        );
        assert_eq!(
            expand(DrawMode::LineLoop, &[p0, p1, p2]),
            vec![p0, p1, p1, p2, p2, p0]
        );
    }

    #[test]
    fn test_expand_degenerate_topology() {
        let p0 = vert(0);
        for mode in [DrawMode::LineStrip, DrawMode::LineLoop] {
            assert!(expand(mode, &[]).is_empty());
            assert!(expand(mode, &[p0]).is_empty());
        }
        assert!(expand(DrawMode::Points, &[]).is_empty());
        assert!(expand(DrawMode::Lines, &[p0]).is_empty());
    }
}
