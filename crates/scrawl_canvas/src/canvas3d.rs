//! 3D drawing-command canvas.
//!
//! Shares the append engine and path state machine with [`crate::Canvas2D`];
//! differs in payload dimensionality (3-component points, 16-element
//! row-major matrices) and in the bulk primitives only a 3D scene needs
//! (point clouds, colored point clouds, rotation around an arbitrary axis).

use smallvec::SmallVec;

use scrawl_core::{Color, ColoredPoint, Mat4, Pose3D, Vec3};

use crate::opcode::OpCode;
use crate::recorder::CanvasRecorder;
use crate::scalar::CanvasScalar;
use crate::wire::{self, WireError};

/// Stack capacity for gathered point iterators; longer runs spill to the
/// heap. Point clouds routinely do.
const POINT_CHUNK: usize = 16;

/// Records 3D drawing commands into a binary opcode stream.
///
/// Move-only, like [`crate::Canvas2D`].
#[derive(Debug, Default)]
pub struct Canvas3D {
    rec: CanvasRecorder,
}

impl Canvas3D {
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
    pub fn take(&mut self) -> Canvas3D {
        std::mem::take(self)
    }

    /// The recorded command stream so far.
    pub fn bytes(&self) -> &[u8] {
        self.rec.buffer.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.rec.buffer.is_empty()
    }

    /// True between a path/shape start and its close or abandonment.
    pub fn in_path_mode(&self) -> bool {
        self.rec.in_path_mode
    }

    // ─────────────────────────────────────────────────────────────────────
    // Transformation operations
    // ─────────────────────────────────────────────────────────────────────

    /// Replace the current transformation of all following operations.
    pub fn set_transformation(&mut self, t: &Mat4) {
        self.set_transformation_elements(&t.to_rows_array());
    }

    /// Scalar-generic form; 16 elements flattened row by row.
    pub fn set_transformation_elements<S: CanvasScalar>(&mut self, elements: &[S; 16]) {
        if !self.rec.leave_path_mode("set_transformation") {
            return;
        }
        self.rec.append_command(OpCode::SetTransformation, elements);
    }

    pub fn set_pose(&mut self, pose: &Pose3D) {
        self.set_transformation(&pose.to_matrix());
    }

    /// Apply a transform on top of the current transformation
    /// (last specified, first applied).
    pub fn transform(&mut self, t: &Mat4) {
        self.transform_elements(&t.to_rows_array());
    }

    pub fn transform_elements<S: CanvasScalar>(&mut self, elements: &[S; 16]) {
        if !self.rec.leave_path_mode("transform") {
            return;
        }
        self.rec.append_command(OpCode::Transform, elements);
    }

    pub fn transform_pose(&mut self, pose: &Pose3D) {
        self.transform(&pose.to_matrix());
    }

    pub fn translate<S: CanvasScalar>(&mut self, x: S, y: S, z: S) {
        if !self.rec.leave_path_mode("translate") {
            return;
        }
        self.rec.append_command(OpCode::Translate, &[x, y, z]);
    }

    pub fn translate_vec(&mut self, v: Vec3) {
        self.translate(v.x, v.y, v.z);
    }

    /// Rotate by roll/pitch/yaw (radians).
    pub fn rotate<S: CanvasScalar>(&mut self, roll: S, pitch: S, yaw: S) {
        if !self.rec.leave_path_mode("rotate") {
            return;
        }
        self.rec.append_command(OpCode::Rotate, &[roll, pitch, yaw]);
    }

    /// Rotate by `angle` radians around an arbitrary axis.
    pub fn rotate_around_vector<S: CanvasScalar>(&mut self, angle: S, x: S, y: S, z: S) {
        if !self.rec.leave_path_mode("rotate_around_vector") {
            return;
        }
        self.rec
            .append_command(OpCode::RotateAroundVector, &[angle, x, y, z]);
    }

    pub fn rotate_around_vector_vec(&mut self, angle: f32, axis: Vec3) {
        self.rotate_around_vector(angle, axis.x, axis.y, axis.z);
    }

    pub fn scale<S: CanvasScalar>(&mut self, x: S, y: S, z: S) {
        if !self.rec.leave_path_mode("scale") {
            return;
        }
        self.rec.append_command(OpCode::Scale, &[x, y, z]);
    }

    pub fn scale_vec(&mut self, v: Vec3) {
        self.scale(v.x, v.y, v.z);
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

    // ─────────────────────────────────────────────────────────────────────
    // Geometry primitives
    // ─────────────────────────────────────────────────────────────────────

    pub fn draw_point<S: CanvasScalar>(&mut self, x: S, y: S, z: S) {
        if !self.rec.leave_path_mode("draw_point") {
            return;
        }
        self.rec.append_command(OpCode::DrawPoint, &[x, y, z]);
    }

    pub fn draw_point_vec(&mut self, p: Vec3) {
        self.draw_point(p.x, p.y, p.z);
    }

    /// Infinite line through a support point along a direction.
    pub fn draw_line<S: CanvasScalar>(&mut self, sx: S, sy: S, sz: S, dx: S, dy: S, dz: S) {
        if !self.rec.leave_path_mode("draw_line") {
            return;
        }
        self.rec
            .append_command(OpCode::DrawLine, &[sx, sy, sz, dx, dy, dz]);
    }

    pub fn draw_line_vec(&mut self, support: Vec3, direction: Vec3) {
        self.draw_line(
            support.x,
            support.y,
            support.z,
            direction.x,
            direction.y,
            direction.z,
        );
    }

    pub fn draw_line_segment<S: CanvasScalar>(&mut self, x1: S, y1: S, z1: S, x2: S, y2: S, z2: S) {
        if !self.rec.leave_path_mode("draw_line_segment") {
            return;
        }
        self.rec
            .append_command(OpCode::DrawLineSegment, &[x1, y1, z1, x2, y2, z2]);
    }

    pub fn draw_line_segment_vec(&mut self, p1: Vec3, p2: Vec3) {
        self.draw_line_segment(p1.x, p1.y, p1.z, p2.x, p2.y, p2.z);
    }

    /// Connected line segments through every point in order.
    pub fn draw_line_strip<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Vec3>,
    {
        let points: SmallVec<[Vec3; POINT_CHUNK]> = points.into_iter().collect();
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
    #[allow(clippy::too_many_arguments)]
    pub fn draw_arrow<S: CanvasScalar>(
        &mut self,
        x1: S,
        y1: S,
        z1: S,
        x2: S,
        y2: S,
        z2: S,
        undirected: bool,
    ) {
        if !self.rec.leave_path_mode("draw_arrow") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawArrow);
        self.rec.buffer.write_bool(undirected);
        self.rec.append_data(&[x1, y1, z1, x2, y2, z2]);
    }

    pub fn draw_arrow_vec(&mut self, p1: Vec3, p2: Vec3, undirected: bool) {
        self.draw_arrow(p1.x, p1.y, p1.z, p2.x, p2.y, p2.z, undirected);
    }

    /// Axis-aligned box from its bottom-left-front corner and extents.
    pub fn draw_box<S: CanvasScalar>(&mut self, x: S, y: S, z: S, width: S, height: S, depth: S) {
        if !self.rec.leave_path_mode("draw_box") {
            return;
        }
        self.rec
            .append_command(OpCode::DrawBox, &[x, y, z, width, height, depth]);
    }

    pub fn draw_box_vec(&mut self, corner: Vec3, width: f32, height: f32, depth: f32) {
        self.draw_box(corner.x, corner.y, corner.z, width, height, depth);
    }

    /// Ellipsoid from its center and full extents. Unlike the 2D canvas the
    /// center goes on the wire as-is.
    pub fn draw_ellipsoid<S: CanvasScalar>(
        &mut self,
        center_x: S,
        center_y: S,
        center_z: S,
        width: S,
        height: S,
        depth: S,
    ) {
        if !self.rec.leave_path_mode("draw_ellipsoid") {
            return;
        }
        self.rec.append_command(
            OpCode::DrawEllipsoid,
            &[center_x, center_y, center_z, width, height, depth],
        );
    }

    pub fn draw_ellipsoid_vec(&mut self, center: Vec3, width: f32, height: f32, depth: f32) {
        self.draw_ellipsoid(center.x, center.y, center.z, width, height, depth);
    }

    /// Bezier curve of arbitrary degree; needs at least two points.
    pub fn draw_bezier_curve<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Vec3>,
    {
        let points: SmallVec<[Vec3; POINT_CHUNK]> = points.into_iter().collect();
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
        I: IntoIterator<Item = Vec3>,
    {
        let points: SmallVec<[Vec3; POINT_CHUNK]> = points.into_iter().collect();
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
        I: IntoIterator<Item = Vec3>,
    {
        let points: SmallVec<[Vec3; POINT_CHUNK]> = points.into_iter().collect();
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

    /// Text anchored at a 3D point.
    pub fn draw_text<S: CanvasScalar>(&mut self, x: S, y: S, z: S, text: &str) {
        if !self.rec.leave_path_mode("draw_text") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawString);
        self.rec.buffer.write_bool(false);
        self.rec.append_data(&[x, y, z]);
        self.rec.buffer.write_str(text);
    }

    pub fn draw_text_vec(&mut self, position: Vec3, text: &str) {
        self.draw_text(position.x, position.y, position.z, text);
    }

    /// Text anchored at a 2D point (screen-aligned); the leading flag tells
    /// the decoder only two components follow.
    pub fn draw_text_2d<S: CanvasScalar>(&mut self, x: S, y: S, text: &str) {
        if !self.rec.leave_path_mode("draw_text") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawString);
        self.rec.buffer.write_bool(true);
        self.rec.append_data(&[x, y]);
        self.rec.buffer.write_str(text);
    }

    /// Bulk point cloud; the u32 count leaves room for the sizes clouds
    /// reach in practice.
    pub fn draw_point_cloud<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = Vec3>,
    {
        let points: SmallVec<[Vec3; POINT_CHUNK]> = points.into_iter().collect();
        if points.len() > u32::MAX as usize {
            tracing::error!(
                "draw_point_cloud: {} points exceed the u32 count; command has no effect",
                points.len()
            );
            return;
        }
        if !self.rec.leave_path_mode("draw_point_cloud") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawPointCloud);
        self.rec.buffer.write_u32(points.len() as u32);
        self.rec.append_data(&points);
    }

    /// Bulk point cloud with one color per point.
    pub fn draw_colored_point_cloud<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = ColoredPoint>,
    {
        let points: SmallVec<[ColoredPoint; POINT_CHUNK]> = points.into_iter().collect();
        if points.len() > u32::MAX as usize {
            tracing::error!(
                "draw_colored_point_cloud: {} points exceed the u32 count; command has no effect",
                points.len()
            );
            return;
        }
        if !self.rec.leave_path_mode("draw_colored_point_cloud") {
            return;
        }
        self.rec.append_opcode(OpCode::DrawColoredPointCloud);
        self.rec.buffer.write_u32(points.len() as u32);
        self.rec.append_data(&points);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Custom paths and shapes
    // ─────────────────────────────────────────────────────────────────────

    /// Start an open path of lines and curves at the given point.
    pub fn start_path<S: CanvasScalar>(&mut self, x: S, y: S, z: S) {
        if !self.rec.enter_path_mode("start_path") {
            return;
        }
        self.rec.append_command(OpCode::PathStart, &[x, y, z]);
        self.rec.buffer.write_bool(false);
    }

    pub fn start_path_vec(&mut self, p: Vec3) {
        self.start_path(p.x, p.y, p.z);
    }

    /// Start a closed shape outline at the given point.
    pub fn start_shape<S: CanvasScalar>(&mut self, x: S, y: S, z: S) {
        if !self.rec.enter_path_mode("start_shape") {
            return;
        }
        self.rec.append_command(OpCode::PathStart, &[x, y, z]);
        self.rec.buffer.write_bool(true);
    }

    pub fn start_shape_vec(&mut self, p: Vec3) {
        self.start_shape(p.x, p.y, p.z);
    }

    /// Append a straight segment to the current path or shape edge.
    pub fn append_line_segment<S: CanvasScalar>(&mut self, x: S, y: S, z: S) {
        if !self.rec.continue_path("append_line_segment") {
            return;
        }
        self.rec.append_command(OpCode::PathLine, &[x, y, z]);
    }

    pub fn append_line_segment_vec(&mut self, p: Vec3) {
        self.append_line_segment(p.x, p.y, p.z);
    }

    /// Append a quadratic curve; point 1 is the control point, point 2 the
    /// destination.
    pub fn append_quadratic_curve<S: CanvasScalar>(&mut self, x1: S, y1: S, z1: S, x2: S, y2: S, z2: S) {
        if !self.rec.continue_path("append_quadratic_curve") {
            return;
        }
        self.rec
            .append_command(OpCode::PathQuadraticCurve, &[x1, y1, z1, x2, y2, z2]);
    }

    pub fn append_quadratic_curve_vec(&mut self, control: Vec3, end: Vec3) {
        self.append_quadratic_curve(control.x, control.y, control.z, end.x, end.y, end.z);
    }

    /// Append a cubic bezier curve; points 1 and 2 are control points,
    /// point 3 the destination.
    #[allow(clippy::too_many_arguments)]
    pub fn append_cubic_curve<S: CanvasScalar>(
        &mut self,
        x1: S,
        y1: S,
        z1: S,
        x2: S,
        y2: S,
        z2: S,
        x3: S,
        y3: S,
        z3: S,
    ) {
        if !self.rec.continue_path("append_cubic_curve") {
            return;
        }
        self.rec.append_command(
            OpCode::PathCubicCurve,
            &[x1, y1, z1, x2, y2, z2, x3, y3, z3],
        );
    }

    pub fn append_cubic_curve_vec(&mut self, control1: Vec3, control2: Vec3, end: Vec3) {
        self.append_cubic_curve(
            control1.x, control1.y, control1.z, control2.x, control2.y, control2.z, end.x, end.y,
            end.z,
        );
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
    // Merging and messages
    // ─────────────────────────────────────────────────────────────────────

    /// Append all commands recorded by `other` onto this canvas.
    pub fn append_canvas(&mut self, other: &Canvas3D) {
        wire::merge_canvases(&mut self.rec, &other.rec);
    }

    /// Serialize into a length-prefixed message.
    pub fn serialize(&mut self) -> Vec<u8> {
        wire::encode_message(&mut self.rec)
    }

    /// Restore this canvas from a length-prefixed message, replacing any
    /// recorded state.
    pub fn deserialize(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        wire::decode_message(&mut self.rec, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode::NumberTag;

    fn payload_f32(bytes: &[u8], start: usize, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| {
                let mut le = [0u8; 4];
                le.copy_from_slice(&bytes[start + i * 4..start + (i + 1) * 4]);
                f32::from_le_bytes(le)
            })
            .collect()
    }

    #[test]
    fn test_transformation_flattens_row_major() {
        let mut canvas = Canvas3D::new();
        canvas.set_transformation(&Mat4::translation(1.0, 2.0, 3.0));
        let bytes = canvas.bytes();
        assert_eq!(bytes[0], OpCode::SetTransformation as u8);
        assert_eq!(bytes[1], NumberTag::Float as u8);
        let vals = payload_f32(bytes, 2, 16);
        assert_eq!(
            vals,
            &[
                1.0, 0.0, 0.0, 1.0, //
                0.0, 1.0, 0.0, 2.0, //
                0.0, 0.0, 1.0, 3.0, //
                0.0, 0.0, 0.0, 1.0,
            ]
        );
    }

    #[test]
    fn test_rotate_around_vector_payload() {
        let mut canvas = Canvas3D::new();
        canvas.rotate_around_vector_vec(0.5, Vec3::new(0.0, 0.0, 1.0));
        let bytes = canvas.bytes();
        assert_eq!(bytes[0], OpCode::RotateAroundVector as u8);
        assert_eq!(payload_f32(bytes, 2, 4), &[0.5, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_point_is_three_components() {
        let mut canvas = Canvas3D::new();
        canvas.draw_point(1.0f32, 2.0, 3.0);
        assert_eq!(canvas.bytes().len(), 2 + 3 * 4);
    }

    #[test]
    fn test_ellipsoid_center_passes_through() {
        let mut canvas = Canvas3D::new();
        canvas.draw_ellipsoid(10.0f32, 20.0, 30.0, 2.0, 4.0, 6.0);
        let vals = payload_f32(canvas.bytes(), 2, 6);
        assert_eq!(vals, &[10.0, 20.0, 30.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_text_3d_and_2d_flags() {
        let mut canvas = Canvas3D::new();
        canvas.draw_text(1.0f32, 2.0, 3.0, "abc");
        let bytes = canvas.bytes();
        assert_eq!(bytes[0], OpCode::DrawString as u8);
        assert_eq!(bytes[1], 0);
        assert_eq!(bytes[2], NumberTag::Float as u8);
        // opcode + bool + tag + 12 point bytes, then the string block.
        assert_eq!(&bytes[15..19], &3u32.to_le_bytes());
        assert_eq!(&bytes[19..], b"abc");

        let mut flat = Canvas3D::new();
        flat.draw_text_2d(1.0f32, 2.0, "abc");
        let bytes = flat.bytes();
        assert_eq!(bytes[1], 1);
        assert_eq!(&bytes[11..15], &3u32.to_le_bytes());
    }

    #[test]
    fn test_point_cloud_count_is_u32() {
        let mut canvas = Canvas3D::new();
        let points = (0..100).map(|i| Vec3::new(i as f32, 0.0, 0.0));
        canvas.draw_point_cloud(points);
        let bytes = canvas.bytes();
        assert_eq!(bytes[0], OpCode::DrawPointCloud as u8);
        assert_eq!(&bytes[1..5], &100u32.to_le_bytes());
        assert_eq!(bytes.len(), 6 + 100 * 12);
    }

    #[test]
    fn test_colored_point_cloud_element_width() {
        let mut canvas = Canvas3D::new();
        canvas.draw_colored_point_cloud([
            ColoredPoint::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0)),
            ColoredPoint::new(Vec3::ONE, Vec3::new(0.0, 1.0, 0.0)),
        ]);
        let bytes = canvas.bytes();
        assert_eq!(bytes[0], OpCode::DrawColoredPointCloud as u8);
        assert_eq!(&bytes[1..5], &2u32.to_le_bytes());
        // 6 f32 components per element
        assert_eq!(bytes.len(), 6 + 2 * 24);
        assert_eq!(payload_f32(bytes, 6, 6), &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cubic_curve_vec_expands_in_order() {
        let mut canvas = Canvas3D::new();
        canvas.start_path(0.0f32, 0.0, 0.0);
        canvas.append_cubic_curve_vec(
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::new(7.0, 8.0, 9.0),
        );
        let bytes = canvas.bytes();
        // path-start record is opcode + tag + 12 + bool = 15 bytes
        assert_eq!(bytes[15], OpCode::PathCubicCurve as u8);
        assert_eq!(
            payload_f32(bytes, 17, 9),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
    }

    #[test]
    fn test_path_guards_shared_with_2d() {
        let mut canvas = Canvas3D::new();
        canvas.start_shape(0.0f32, 0.0, 0.0);
        let before = canvas.bytes().len();

        canvas.draw_point(1.0f32, 1.0, 1.0); // rejected: just entered
        canvas.close_shape(); // rejected: no segments
        assert_eq!(canvas.bytes().len(), before);

        canvas.append_line_segment(1.0f32, 0.0, 0.0);
        canvas.close_shape();
        assert_eq!(*canvas.bytes().last().unwrap(), OpCode::PathEndClosed as u8);
        assert!(!canvas.in_path_mode());
    }

    #[test]
    fn test_roundtrip() {
        let mut canvas = Canvas3D::new();
        canvas.set_color(Color::GREEN);
        canvas.draw_line_segment(0.0f32, 0.0, 0.0, 1.0, 1.0, 1.0);
        let msg = canvas.serialize();

        let mut restored = Canvas3D::new();
        restored.deserialize(&msg).unwrap();
        assert_eq!(restored.bytes(), canvas.bytes());
    }

    #[test]
    fn test_merge_between_3d_canvases() {
        let mut a = Canvas3D::new();
        a.draw_point(1.0f32, 2.0, 3.0);

        let mut b = Canvas3D::new();
        b.set_alpha(128);
        let before = b.bytes().len();
        b.append_canvas(&a);
        assert_eq!(b.bytes().len(), before + a.bytes().len());
        assert_eq!(&b.bytes()[before..], a.bytes());
    }
}
