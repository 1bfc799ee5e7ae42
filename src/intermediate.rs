//! Transient high-precision pixel buffers
//!
//! Sources above 8 bits never decode straight into the BGRA surface: they are
//! expanded into one of these buffers first, so unpremultiply and the HDR
//! display transform run at full precision. The buffer lives only for the
//! duration of one conversion.

use imgref::ImgVec;
use rgb::{Rgb, Rgba};

/// High-precision intermediate representation of a decoded image
#[derive(Debug)]
#[non_exhaustive]
pub enum Intermediate {
    /// Full-range 16-bit RGB (SDR sources above 8 bits)
    Rgb16(ImgVec<Rgb<u16>>),
    /// Full-range 16-bit RGBA
    Rgba16(ImgVec<Rgba<u16>>),
    /// Unit-range float RGB (PQ sources)
    RgbF32(ImgVec<Rgb<f32>>),
    /// Unit-range float RGBA
    RgbaF32(ImgVec<Rgba<f32>>),
}

impl Intermediate {
    /// Buffer width in pixels
    pub fn width(&self) -> usize {
        match self {
            Intermediate::Rgb16(img) => img.width(),
            Intermediate::Rgba16(img) => img.width(),
            Intermediate::RgbF32(img) => img.width(),
            Intermediate::RgbaF32(img) => img.width(),
        }
    }

    /// Buffer height in pixels
    pub fn height(&self) -> usize {
        match self {
            Intermediate::Rgb16(img) => img.height(),
            Intermediate::Rgba16(img) => img.height(),
            Intermediate::RgbF32(img) => img.height(),
            Intermediate::RgbaF32(img) => img.height(),
        }
    }

    /// Whether the buffer carries an alpha channel
    pub fn has_alpha(&self) -> bool {
        matches!(self, Intermediate::Rgba16(_) | Intermediate::RgbaF32(_))
    }

    /// Whether the buffer holds unit-range floats
    pub fn is_float(&self) -> bool {
        matches!(self, Intermediate::RgbF32(_) | Intermediate::RgbaF32(_))
    }
}
