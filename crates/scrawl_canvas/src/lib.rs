//! Scrawl Canvas Recorder
//!
//! This crate records 2D/3D vector-drawing commands into a compact binary
//! opcode stream for replay by a remote renderer:
//!
//! - **Opcodes & tags**: the one-byte command and scalar-encoding registries
//! - **Canvas2D / Canvas3D**: immediate-mode drawing APIs that append to a
//!   growable command buffer and enforce path/shape sequencing
//! - **Wire**: length-prefixed message serialization, default-viewport
//!   header handling, and canvas merging
//!
//! Nothing here rasterizes — the consumer of a serialized canvas does.
//!
//! # Example
//!
//! ```rust
//! use scrawl_canvas::Canvas2D;
//! use scrawl_core::Color;
//!
//! let mut canvas = Canvas2D::new();
//! canvas.set_color(Color::RED);
//! canvas.start_path(0.0f32, 0.0);
//! canvas.append_line_segment(10.0f32, 0.0);
//! canvas.append_quadratic_curve(15.0f32, 5.0, 10.0, 10.0);
//! canvas.close_path();
//!
//! let message = canvas.serialize();
//! assert!(!message.is_empty());
//! ```
//!
//! Sequencing mistakes (a curve outside a path, closing an empty path) are
//! logged through `tracing` and dropped; the canvas stays usable.

pub mod canvas2d;
pub mod canvas3d;
pub mod opcode;
mod recorder;
pub mod scalar;
pub mod wire;

pub use canvas2d::Canvas2D;
pub use canvas3d::Canvas3D;
pub use opcode::{NumberTag, OpCode};
pub use scalar::{CanvasElement, CanvasScalar};
pub use wire::WireError;

// Re-export the value types the canvas APIs take.
pub use scrawl_core::{Affine2D, Color, ColoredPoint, Mat4, Pose2D, Pose3D, Rect, Vec2, Vec3};
