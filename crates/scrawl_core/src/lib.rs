//! Scrawl Core Types
//!
//! This crate provides the value types the Scrawl canvas recorder is built
//! on top of:
//!
//! - **Geometry**: vectors, rectangles, affine/4x4 transforms, poses
//! - **Color**: the wire-level RGB triple
//! - **Command Buffer**: the growable byte buffer recorded commands land in
//!
//! Nothing in this crate knows about opcodes or canvas state; it is the
//! narrow interface the recorder writes through.

pub mod buffer;
pub mod color;
pub mod geometry;

pub use buffer::CommandBuffer;
pub use color::Color;
pub use geometry::{Affine2D, ColoredPoint, Mat4, Pose2D, Pose3D, Rect, Vec2, Vec3};
