//! fren: fixed-point vector line renderer
//!
//! Takes caller-owned vertex, color and index arrays, runs them through a
//! vertex function, clips the resulting line segments in homogeneous clip
//! space and hands pixel-space lines to a [`Backend`].

pub mod backend;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod fixed;
pub mod math;
pub mod model;
pub mod pipeline;

pub use backend::Backend;
pub use error::PipelineError;
pub use fixed::Fixed32;
pub use math::{Mat4, Vec2, Vec3, Vec4};
pub use pipeline::{Context, DrawMode, Vertex, Viewport};
