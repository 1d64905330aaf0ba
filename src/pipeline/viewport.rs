//! Perspective divide and the NDC to pixel mapping

use super::Vertex;
use crate::error::PipelineError;
use crate::fixed::Fixed32;
use crate::math::Vec4;

/// Pixel size of the render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
}

impl Viewport {
    /// 240x160 logical canvas
    pub const DEFAULT: Self = Self {
        width: 240,
        height: 160,
    };

    /// Both dimensions must fit the integer range of a 16.16 value.
    pub fn new(width: u16, height: u16) -> Result<Self, PipelineError> {
        let limit = i16::MAX as u16;
        if width > limit || height > limit {
            return Err(PipelineError::ViewportTooLarge { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Map one NDC position to pixels: x grows right, y is flipped so +1 is
    /// the top row, z goes from [-1, 1] to [0, 1], w passes through.
    pub fn transform(&self, ndc: Vec4) -> Vec4 {
        let half_w = Fixed32::from_raw(i32::from(self.width) << 15);
        let half_h = Fixed32::from_raw(i32::from(self.height) << 15);
        Vec4::new(
            half_w * ndc.x + half_w,
            -half_h * ndc.y + half_h,
            ndc.z * Fixed32::HALF + Fixed32::HALF,
            ndc.w,
        )
    }

    pub fn apply(&self, vertices: &mut [Vertex]) {
        for v in vertices {
            v.position = self.transform(v.position);
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Divide every position by its own w, leaving w at exactly one.
pub fn perspective_divide(vertices: &mut [Vertex]) -> Result<(), PipelineError> {
    for (index, v) in vertices.iter_mut().enumerate() {
        let divided = v
            .position
            .checked_div(v.position.w)
            .ok_or(PipelineError::ZeroW { index })?;
        v.position = Vec4 {
            w: Fixed32::ONE,
            ..divided
        };
    }
    Ok(())
}
