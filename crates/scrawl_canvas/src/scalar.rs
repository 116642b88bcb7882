//! Scalar and payload-element encoding traits.
//!
//! [`CanvasScalar`] is the closed mapping from a supported scalar type to
//! its wire tag, resolved at the call site from the static element type.
//! [`CanvasElement`] extends it to fixed runs of scalars (vectors, colored
//! points) so bulk geometry can be appended as one tagged block.
//!
//! The wire format is little-endian regardless of host byte order: on
//! little-endian hosts payload slices are bulk-copied as raw bytes, on
//! big-endian hosts each scalar goes through its `write_le` path.

use bytemuck::Pod;
use scrawl_core::{ColoredPoint, CommandBuffer, Vec2, Vec3};

use crate::opcode::NumberTag;

/// A scalar type the protocol can encode.
///
/// `NEG_ONE` is the value a C-style `-1` converts to in this type (so the
/// ellipsoid circle shorthand behaves identically for unsigned scalars);
/// `halved`/`minus` carry the arithmetic the corner correction needs.
pub trait CanvasScalar: Copy + PartialEq + Pod + CanvasElement {
    const TAG: NumberTag;
    const NEG_ONE: Self;

    fn halved(self) -> Self;
    fn minus(self, other: Self) -> Self;
    fn write_le(self, buf: &mut CommandBuffer);
}

/// One payload element: a scalar, or a fixed-size group of scalars sharing
/// one [`NumberTag`].
pub trait CanvasElement: Copy + Pod {
    type Scalar: CanvasScalar;

    fn write_components(&self, buf: &mut CommandBuffer);
}

macro_rules! impl_float_scalar {
    ($t:ty, $tag:ident) => {
        impl CanvasScalar for $t {
            const TAG: NumberTag = NumberTag::$tag;
            const NEG_ONE: Self = -1.0;

            fn halved(self) -> Self {
                self / 2.0
            }

            fn minus(self, other: Self) -> Self {
                self - other
            }

            fn write_le(self, buf: &mut CommandBuffer) {
                buf.write_raw(&self.to_le_bytes());
            }
        }

        impl CanvasElement for $t {
            type Scalar = $t;

            fn write_components(&self, buf: &mut CommandBuffer) {
                CanvasScalar::write_le(*self, buf);
            }
        }
    };
}

macro_rules! impl_int_scalar {
    ($t:ty, $tag:ident, $neg_one:expr) => {
        impl CanvasScalar for $t {
            const TAG: NumberTag = NumberTag::$tag;
            const NEG_ONE: Self = $neg_one;

            fn halved(self) -> Self {
                self / 2
            }

            fn minus(self, other: Self) -> Self {
                self.wrapping_sub(other)
            }

            fn write_le(self, buf: &mut CommandBuffer) {
                buf.write_raw(&self.to_le_bytes());
            }
        }

        impl CanvasElement for $t {
            type Scalar = $t;

            fn write_components(&self, buf: &mut CommandBuffer) {
                CanvasScalar::write_le(*self, buf);
            }
        }
    };
}

impl_float_scalar!(f32, Float);
impl_float_scalar!(f64, Double);
impl_int_scalar!(i8, Int8, -1);
impl_int_scalar!(u8, UInt8, u8::MAX);
impl_int_scalar!(i16, Int16, -1);
impl_int_scalar!(u16, UInt16, u16::MAX);
impl_int_scalar!(i32, Int32, -1);
impl_int_scalar!(u32, UInt32, u32::MAX);
impl_int_scalar!(i64, Int64, -1);
impl_int_scalar!(u64, UInt64, u64::MAX);

impl CanvasElement for Vec2 {
    type Scalar = f32;

    fn write_components(&self, buf: &mut CommandBuffer) {
        buf.write_f32(self.x);
        buf.write_f32(self.y);
    }
}

impl CanvasElement for Vec3 {
    type Scalar = f32;

    fn write_components(&self, buf: &mut CommandBuffer) {
        buf.write_f32(self.x);
        buf.write_f32(self.y);
        buf.write_f32(self.z);
    }
}

impl CanvasElement for ColoredPoint {
    type Scalar = f32;

    fn write_components(&self, buf: &mut CommandBuffer) {
        self.position.write_components(buf);
        self.color.write_components(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_scalar_types() {
        assert_eq!(<f32 as CanvasScalar>::TAG, NumberTag::Float);
        assert_eq!(<f64 as CanvasScalar>::TAG, NumberTag::Double);
        assert_eq!(<i16 as CanvasScalar>::TAG, NumberTag::Int16);
        assert_eq!(<u64 as CanvasScalar>::TAG, NumberTag::UInt64);
        assert_eq!(<Vec2 as CanvasElement>::Scalar::TAG, NumberTag::Float);
    }

    #[test]
    fn test_neg_one_follows_c_conversion() {
        assert_eq!(<i32 as CanvasScalar>::NEG_ONE, -1);
        assert_eq!(<u16 as CanvasScalar>::NEG_ONE, 0xFFFF);
        assert_eq!(<f64 as CanvasScalar>::NEG_ONE, -1.0);
    }

    #[test]
    fn test_scalar_write_le() {
        let mut buf = CommandBuffer::new();
        CanvasScalar::write_le(1.5f32, &mut buf);
        CanvasScalar::write_le(0x0102i16, &mut buf);
        assert_eq!(buf.as_slice(), &[0x00, 0x00, 0xC0, 0x3F, 0x02, 0x01]);
    }

    #[test]
    fn test_element_write_components() {
        let mut buf = CommandBuffer::new();
        Vec2::new(1.0, -1.0).write_components(&mut buf);
        assert_eq!(
            buf.as_slice(),
            &[0x00, 0x00, 0x80, 0x3F, 0x00, 0x00, 0x80, 0xBF]
        );
    }
}
