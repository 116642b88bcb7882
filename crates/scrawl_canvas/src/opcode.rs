//! Wire opcodes and numeric type tags.
//!
//! Every recorded command starts with a one-byte opcode; typed numeric
//! payloads are additionally preceded by a one-byte [`NumberTag`] naming
//! their scalar encoding, so a decoder needs no external schema to walk the
//! stream.
//!
//! The numeric values below ARE the wire contract of this crate. Gaps
//! between groups leave room for new commands without renumbering, and the
//! default-viewport marker sits at 255 so it is trivially recognizable as a
//! stream's first byte.

/// One-byte command tag.
///
/// `[vector]` and `[point]` payloads carry 2 components on a 2D canvas and
/// 3 components on a 3D canvas, encoded per the preceding [`NumberTag`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpCode {
    // Transformation operations
    /// [6-element 2D matrix] or [16-element row-major 3D matrix]
    SetTransformation = 0,
    /// [6-element 2D matrix] or [16-element row-major 3D matrix]
    Transform = 1,
    /// [vector]
    Translate = 2,
    /// [yaw] (2D) or [roll, pitch, yaw] (3D)
    Rotate = 3,
    /// [vector]
    Scale = 4,
    ResetTransformation = 5,

    // Canvas and draw mode
    /// [RGB: 3 bytes]
    SetColor = 8,
    /// [RGB: 3 bytes]
    SetEdgeColor = 9,
    /// [RGB: 3 bytes]
    SetFillColor = 10,
    /// [bool]
    SetFill = 11,
    /// [1 byte]
    SetAlpha = 12,

    // Geometry primitives
    /// [point]
    DrawPoint = 16,
    /// [support point][direction vector]
    DrawLine = 17,
    /// [point][point]
    DrawLineSegment = 18,
    /// [u32 number of points][point 1]...[point N]
    DrawLineStrip = 19,
    /// [bool undirected][point][point]
    DrawArrow = 20,
    /// [corner point][extent 1]...[extent K]
    DrawBox = 21,
    /// 2D: [corner point][diameters]; 3D: [center point][diameters]
    DrawEllipsoid = 22,
    /// [u16 degree N][point 1]...[point N+1]
    DrawBezierCurve = 23,
    /// [u16 number of points][point 1]...[point N]
    DrawPolygon = 24,
    /// [f32 tension][u16 number of points][point 1]...[point N]
    DrawSpline = 25,
    /// 2D: [point][string]; 3D: [bool 2d-point?][point][string]
    DrawString = 26,

    // Custom path/shape
    /// [point][bool shape?]
    PathStart = 32,
    PathEndOpen = 33,
    PathEndClosed = 34,
    /// [point]
    PathLine = 35,
    /// [control point][end point]
    PathQuadraticCurve = 36,
    /// [control point][control point][end point]
    PathCubicCurve = 37,

    // 2D-only
    /// [value]
    SetZ = 48,
    /// [value]
    SetExtrusion = 49,

    // 3D-only
    /// [angle][axis vector]
    RotateAroundVector = 56,
    /// [u32 number of points][point 1]...[point N]
    DrawPointCloud = 57,
    /// [u32 number of points][position+color 1]...[position+color N]
    DrawColoredPointCloud = 58,

    // Meta
    /// [u64 byte offset of the viewport-defining commands]
    DefaultViewportOffset = 255,
}

/// One-byte scalar encoding tag written before typed payloads.
///
/// `Zeroes` is a zero-fill marker reserved for decoders; this encoder never
/// emits it.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumberTag {
    Float = 0,
    Double = 1,
    Zeroes = 2,
    Int8 = 3,
    UInt8 = 4,
    Int16 = 5,
    UInt16 = 6,
    Int32 = 7,
    UInt32 = 8,
    Int64 = 9,
    UInt64 = 10,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_marker_value() {
        assert_eq!(OpCode::DefaultViewportOffset as u8, 255);
    }

    #[test]
    fn test_group_bases() {
        assert_eq!(OpCode::SetTransformation as u8, 0);
        assert_eq!(OpCode::SetColor as u8, 8);
        assert_eq!(OpCode::DrawPoint as u8, 16);
        assert_eq!(OpCode::PathStart as u8, 32);
        assert_eq!(OpCode::SetZ as u8, 48);
        assert_eq!(OpCode::RotateAroundVector as u8, 56);
    }

    #[test]
    fn test_number_tag_values() {
        assert_eq!(NumberTag::Float as u8, 0);
        assert_eq!(NumberTag::Double as u8, 1);
        assert_eq!(NumberTag::UInt64 as u8, 10);
    }
}
