//! 2D drawing-command canvas.
//!
//! `Canvas2D` records vector-graphics commands for replay by a remote
//! renderer; nothing is rasterized here. Geometry is recorded serially and
//! cannot be removed — reuse a canvas with [`Canvas2D::clear`].
//!
//! Fixed-arity operations come in two flavors: struct-typed conveniences
//! (`Vec2`, [`Affine2D`], [`Pose2D`]) that encode `f32`, and scalar-generic
//! variants that let one canvas mix numeric precisions across calls — the
//! element type picks the wire tag. Bulk geometry (polygons, splines,
//! strips) takes any `Vec2` iterator and records `f32`.

use smallvec::SmallVec;

use scrawl_core::{Affine2D, Color, Pose2D, Rect, Vec2};

use crate::opcode::OpCode;
use crate::recorder::CanvasRecorder;
use crate::scalar::CanvasScalar;
use crate::wire::{self, WireError};

/// Stack capacity for gathered point iterators; longer runs spill to the
/// heap.
const POINT_CHUNK: usize = 16;

/// Records 2D drawing commands into a binary opcode stream.
///
/// Move-only: a canvas exclusively owns its command buffer, so ownership
/// transfers by move and there is no `Clone`.
#[derive(Debug, Default)]
pub struct Canvas2D {
    rec: CanvasRecorder,
}

impl Canvas2D {
    pub fn new() -> Self {
        Self {
            rec: CanvasRecorder::new(),
        }
    }

    /// Remove all recorded geometry and reset canvas state.
    pub fn clear(&mut self) {
        self.rec.clear();
    }

    /// Take the recorded canvas, leaving an empty-but-valid one behind.
    pub fn take(&mut self) -> Canvas2D {
        std::mem::take(self)
    }

    /// The recorded command stream so far.
    pub fn bytes(&self) -> &[u8] {
        self.rec.buffer.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.rec.buffer.is_empty()
    }

    /// Byte offset of the recorded default-viewport commands, if any.
    pub fn default_viewport_offset(&self) -> Option<u64> {
        self.rec.default_viewport_offset
    }

    /// True between a path/shape start and its close or abandonment.
    pub fn in_path_mode(&self) -> bool {
        self.rec.in_path_mode
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transformation operations
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the current transformation of all following operations.
    /// Overwrites the current transform completely, so it should only be
    /// used where this code fragment never runs on top of another
    /// transformation.
    pub fn set_transformation(&mut self, t: &Affine2D) {
        self.set_transformation_elements(&t.elements);
    }

    /// Scalar-generic form of [`Canvas2D::set_transformation`]; elements in
    /// `[m00, m10, m01, m11, m02, m12]` order.
    pub fn set_transformation_elements<S: CanvasScalar>(&mut self, elements: &[S; 6]) {
        if !self.rec.leave_path_mode("set_transformation") {
            return;
        }
        self.rec.append_command(OpCode::SetTransformation, elements);
    }

    pub fn set_pose(&mut self, pose: &Pose2D) {
        self.set_transformation(&pose.to_matrix());
    }

    /// Apply an affine transform on top of the current transformation
    /// (last specified, first applied).
    pub fn transform(&mut self, t: &Affine2D) {
        self.transform_elements(&t.elements);
    }

    pub fn transform_elements<S: CanvasScalar>(&mut self, elements: &[S; 6]) {
        if !self.rec.leave_path_mode("transform") {
            return;
        }
        self.rec.append_command(OpCode::Transform, elements);
    }

    pub fn transform_pose(&mut self, pose: &Pose2D) {
        self.transform(&pose.to_matrix());
    }

    pub fn translate<S: CanvasScalar>(&mut self, x: S, y: S) {
        if !self.rec.leave_path_mode("translate") {
            return;
        }
        self.rec.append_command(OpCode::Translate, &[x, y]);
    }

    pub fn translate_vec(&mut self, v: Vec2) {
        self.translate(v.x, v.y);
    }

    /// Rotate the current transformation by `yaw` radians.
    pub fn rotate<S: CanvasScalar>(&mut self, yaw: S) {
        if !self.rec.leave_path_mode("rotate") {
            return;
        }
        self.rec.append_command(OpCode::Rotate, &[yaw]);
    }

    pub fn scale<S: CanvasScalar>(&mut self, x: S, y: S) {
        if !self.rec.leave_path_mode("scale") {
            return;
        }
        self.rec.append_command(OpCode::Scale, &[x, y]);
    }

    pub fn scale_vec(&mut self, v: Vec2) {
        self.scale(v.x, v.y);
    }

    /// Reset the current transformation to the identity matrix.
    pub fn reset_transformation(&mut self) {
        if !self.rec.leave_path_mode("reset_transformation") {
            return;
        }
        self.rec.append_opcode(OpCode::ResetTransformation);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Style operations
    // ─────────────────────────────────────────────────────────────────────

    /// Set both edge and fill color.
    pub fn set_color(&mut self, color: Color) {
        if !self.rec.leave_path_mode("set_color") {
            return;
        }
        self.rec
            .append_command_raw(OpCode::SetColor, &color.to_array());
    }

    pub fn set_edge_color(&mut self, color: Color) {
        if !self.rec.leave_path_mode("set_edge_color") {
            return;
        }
        self.rec
            .append_command_raw(OpCode::SetEdgeColor, &color.to_array());
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if !self.rec.leave_path_mode("set_fill_color") {
            return;
        }
        self.rec
            .append_command_raw(OpCode::SetFillColor, &color.to_array());
    }

    /// Should closed geometry be filled?
    pub fn set_fill(&mut self, fill: bool) {
        if !self.rec.leave_path_mode("set_fill") {
            return;
        }
        self.rec.append_command_raw(OpCode::SetFill, &[fill as u8]);
    }

    /// Opacity for all following geometry (255 = opaque).
    pub fn set_alpha(&mut self, alpha: u8) {
        if !self.rec.leave_path_mode("set_alpha") {
            return;
        }
        self.rec.append_command_raw(OpCode::SetAlpha, &[alpha]);
    }

    /// Z coordinate assigned to all following 2D geometry.
    pub fn set_z<S: CanvasScalar>(&mut self, z: S) {
        if !self.rec.leave_path_mode("set_z") {
            return;
        }
        self.rec.append_command(OpCode::SetZ, &[z]);
    }

    /// Extrusion depth for renderers that lift 2D geometry into 3D.
    pub fn set_extrusion<S: CanvasScalar>(&mut self, extrusion: S) {
        if !self.rec.leave_path_mode("set_extrusion") {
            return;
        }
        self.rec.append_command(OpCode::SetExtrusion, &[extrusion]);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Geometry primitives
    // ─────────────────────────────────────────────────────────────────────

    pub fn draw_point<S: CanvasScalar>(&mut self, x: S, y: S) {
        if !self.rec.leave_path_mode("draw_point") {
            return;
        }
        self.rec.append_command(OpCode::DrawPoint, &[x, y]);
    }

    pub fn draw_point_vec(&mut self, p: Vec2) {
        self.draw_point(p.x, p.y);
    }

    /// Infinite line through `support` along `direction`.
    pub fn draw_line<S: CanvasScalar>(&mut self, support_x: S, support_y: S, dir_x: S, dir_y: S) {
        if !self.rec.leave_path_mode("draw_line") {
            return;
        }
        self.rec
            .append_command(OpCode::DrawLine, &[support_x, support_y, dir_x, dir_y]);
    }

    pub fn draw_line_vec(&mut self, support: Vec2, direction: Vec2) {
        self.draw_line(support.x, support.y, direction.x, direction.y);
    }

    pub fn draw_line_segment<S: CanvasScalar>(&mut self, x1: S, y1: S, x2: S, y2: S) {
        if !self.rec.leave_path_mode("draw_line_segment") {
            return;
        }
        self.rec
            .append_command(OpCode::DrawLineSegment, &[x1, y1, x2, y2]);
    }

    pub fn draw_line_segment_vec(&mut self, p1: Vec2, p2: Vec2) {
        self.draw_line_segment(p1.x, p1.y, p2.x, p2.y);
    }

    /// Connected line segments through every point in order.
    pub fn draw_line_strip<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        let points: SmallVec<[Vec2; POINT_CHUNK]> = points.into_iter().collect();
        if points.len() > u32::MAX as usize {
            tracing::error!(
                "draw_line_strip: {} points exceed the u32 count; command has no effect",
                points.len()
            );
            return;
        }
        if !self.rec.leave_path_mode("draw_line_strip") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawLineStrip);
        self.rec.buffer.write_u32(points.len() as u32);
        self.rec.append_data(&points);
    }

    /// Arrow from `p1` to `p2`; `undirected` draws heads on both ends.
    pub fn draw_arrow<S: CanvasScalar>(&mut self, x1: S, y1: S, x2: S, y2: S, undirected: bool) {
        if !self.rec.leave_path_mode("draw_arrow") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawArrow);
        self.rec.buffer.write_bool(undirected);
        self.rec.append_data(&[x1, y1, x2, y2]);
    }

    pub fn draw_arrow_vec(&mut self, p1: Vec2, p2: Vec2, undirected: bool) {
        self.draw_arrow(p1.x, p1.y, p2.x, p2.y, undirected);
    }

    /// Axis-aligned box from its top-left corner and extents.
    pub fn draw_box<S: CanvasScalar>(&mut self, top_left_x: S, top_left_y: S, width: S, height: S) {
        if !self.rec.leave_path_mode("draw_box") {
            return;
        }
        self.rec
            .append_command(OpCode::DrawBox, &[top_left_x, top_left_y, width, height]);
    }

    pub fn draw_box_rect(&mut self, rect: Rect) {
        self.draw_box(rect.x, rect.y, rect.width, rect.height);
    }

    /// Ellipse from its center and full extents. A `height` of `-1` (in the
    /// scalar's own conversion of -1) is the circle shorthand: the height
    /// becomes the width. The wire payload carries the bounding-box corner.
    pub fn draw_ellipsoid<S: CanvasScalar>(&mut self, center_x: S, center_y: S, width: S, height: S) {
        if !self.rec.leave_path_mode("draw_ellipsoid") {
            return;
        }
        let height = if height == S::NEG_ONE { width } else { height };
        let values = [
            center_x.minus(width.halved()),
            center_y.minus(height.halved()),
            width,
            height,
        ];
        self.rec.append_command(OpCode::DrawEllipsoid, &values);
    }

    pub fn draw_ellipsoid_vec(&mut self, center: Vec2, width: f32, height: f32) {
        self.draw_ellipsoid(center.x, center.y, width, height);
    }

    /// Bezier curve of arbitrary degree; needs at least two points.
    pub fn draw_bezier_curve<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        let points: SmallVec<[Vec2; POINT_CHUNK]> = points.into_iter().collect();
        if points.len() < 2 {
            tracing::error!(
                "draw_bezier_curve: a curve needs at least two points; command has no effect"
            );
            return;
        }
        if points.len() - 1 > u16::MAX as usize {
            tracing::error!(
                "draw_bezier_curve: {} points exceed the u16 degree; command has no effect",
                points.len()
            );
            return;
        }
        if !self.rec.leave_path_mode("draw_bezier_curve") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawBezierCurve);
        self.rec.buffer.write_u16((points.len() - 1) as u16);
        self.rec.append_data(&points);
    }

    pub fn draw_polygon<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        let points: SmallVec<[Vec2; POINT_CHUNK]> = points.into_iter().collect();
        if points.len() > u16::MAX as usize {
            tracing::error!(
                "draw_polygon: {} points exceed the u16 count; command has no effect",
                points.len()
            );
            return;
        }
        if !self.rec.leave_path_mode("draw_polygon") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawPolygon);
        self.rec.buffer.write_u16(points.len() as u16);
        self.rec.append_data(&points);
    }

    /// Cardinal spline through the points; `tension` 0.0 is the default
    /// rounding.
    pub fn draw_spline<I>(&mut self, points: I, tension: f32)
    where
        I: IntoIterator<Item = Vec2>,
    {
        let points: SmallVec<[Vec2; POINT_CHUNK]> = points.into_iter().collect();
        if points.len() > u16::MAX as usize {
            tracing::error!(
                "draw_spline: {} points exceed the u16 count; command has no effect",
                points.len()
            );
            return;
        }
        if !self.rec.leave_path_mode("draw_spline") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawSpline);
        self.rec.buffer.write_f32(tension);
        self.rec.buffer.write_u16(points.len() as u16);
        self.rec.append_data(&points);
    }

    /// Text anchored at a point.
    pub fn draw_text<S: CanvasScalar>(&mut self, x: S, y: S, text: &str) {
        if !self.rec.leave_path_mode("draw_text") {
            return;
        }
        self.rec.append_command(OpCode::DrawString, &[x, y]);
        self.rec.buffer.write_str(text);
    }

    pub fn draw_text_vec(&mut self, position: Vec2, text: &str) {
        self.draw_text(position.x, position.y, text);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Custom paths and shapes
    // ─────────────────────────────────────────────────────────────────────

    /// Start an open path of lines and curves at the given point. The path
    /// ends with [`Canvas2D::close_path`] or implicitly with the next
    /// ordinary command.
    pub fn start_path<S: CanvasScalar>(&mut self, x: S, y: S) {
        if !self.rec.enter_path_mode("start_path") {
            return;
        }
        self.rec.append_command(OpCode::PathStart, &[x, y]);
        self.rec.buffer.write_bool(false);
    }

    pub fn start_path_vec(&mut self, p: Vec2) {
        self.start_path(p.x, p.y);
    }

    /// Start a closed shape outline at the given point; the decoder
    /// connects its end back to the start.
    pub fn start_shape<S: CanvasScalar>(&mut self, x: S, y: S) {
        if !self.rec.enter_path_mode("start_shape") {
            return;
        }
        self.rec.append_command(OpCode::PathStart, &[x, y]);
        self.rec.buffer.write_bool(true);
    }

    pub fn start_shape_vec(&mut self, p: Vec2) {
        self.start_shape(p.x, p.y);
    }

    /// Append a straight segment to the current path or shape edge.
    pub fn append_line_segment<S: CanvasScalar>(&mut self, x: S, y: S) {
        if !self.rec.continue_path("append_line_segment") {
            return;
        }
        self.rec.append_command(OpCode::PathLine, &[x, y]);
    }

    pub fn append_line_segment_vec(&mut self, p: Vec2) {
        self.append_line_segment(p.x, p.y);
    }

    /// Append a quadratic curve; point 1 is the control point, point 2 the
    /// destination.
    pub fn append_quadratic_curve<S: CanvasScalar>(&mut self, x1: S, y1: S, x2: S, y2: S) {
        if !self.rec.continue_path("append_quadratic_curve") {
            return;
        }
        self.rec
            .append_command(OpCode::PathQuadraticCurve, &[x1, y1, x2, y2]);
    }

    pub fn append_quadratic_curve_vec(&mut self, control: Vec2, end: Vec2) {
        self.append_quadratic_curve(control.x, control.y, end.x, end.y);
    }

    /// Append a cubic bezier curve; points 1 and 2 are control points,
    /// point 3 the destination.
    pub fn append_cubic_curve<S: CanvasScalar>(&mut self, x1: S, y1: S, x2: S, y2: S, x3: S, y3: S) {
        if !self.rec.continue_path("append_cubic_curve") {
            return;
        }
        self.rec
            .append_command(OpCode::PathCubicCurve, &[x1, y1, x2, y2, x3, y3]);
    }

    pub fn append_cubic_curve_vec(&mut self, control1: Vec2, control2: Vec2, end: Vec2) {
        self.append_cubic_curve(control1.x, control1.y, control2.x, control2.y, end.x, end.y);
    }

    /// End the current path, leaving it open.
    pub fn close_path(&mut self) {
        if !self.rec.end_path_mode("close_path") {
            return;
        }
        self.rec.append_opcode(OpCode::PathEndOpen);
    }

    /// End the current shape outline; start and end points are connected.
    pub fn close_shape(&mut self) {
        if !self.rec.end_path_mode("close_shape") {
            return;
        }
        self.rec.append_opcode(OpCode::PathEndClosed);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Default viewport
    // ─────────────────────────────────────────────────────────────────────

    /// Record `viewport` as the recommended default view window. The rect is
    /// recorded as an ordinary box command and its byte offset remembered;
    /// serialization materializes the offset as the stream header. Calling
    /// again overwrites the previous viewport.
    pub fn set_default_viewport(&mut self, viewport: Rect) {
        if !self.rec.leave_path_mode("set_default_viewport") {
            return;
        }
        self.rec.default_viewport_offset = Some(self.rec.position() as u64);
        self.rec.append_command(
            OpCode::DrawBox,
            &[viewport.x, viewport.y, viewport.width, viewport.height],
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // Merging and messages
    // ─────────────────────────────────────────────────────────────────────

    /// Append all commands recorded by `other` onto this canvas. See
    /// [`crate::wire`] for the viewport-offset arithmetic and the
    /// mid-path-entry precondition.
    pub fn append_canvas(&mut self, other: &Canvas2D) {
        wire::merge_canvases(&mut self.rec, &other.rec);
    }

    /// Serialize into a length-prefixed message. Takes `&mut self` because a
    /// stream that already carries a viewport header is patched in place.
    pub fn serialize(&mut self) -> Vec<u8> {
        wire::encode_message(&mut self.rec)
    }

    /// Restore this canvas from a length-prefixed message, replacing any
    /// recorded state.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        wire::decode_message(&mut self.rec, bytes)
    }
}
