//! Decode strategy selection and the per-image conversion driver
//!
//! The combinatorial space {bit depth class} × {alpha} × {layout} × {color
//! model} is kept explicit: every combination maps to one named strategy, so
//! the full table is visible in one place and testable exhaustively.

use crate::alpha;
use crate::config::ConvertConfig;
use crate::display;
use crate::error::{Error, Result};
use crate::image::{ChromaLayout, DecodedImage, HdrFormat, HeifColorSpace};
use crate::intermediate::Intermediate;
use crate::mono_decoder;
use crate::rgb_decoder;
use crate::surface::SurfaceMut;
use log::debug;
use whereat::at;

/// Precision of the high-precision intermediate buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WidePrecision {
    /// Full-range 16-bit integers (SDR display path)
    Int16,
    /// Unit-range floats (PQ display path)
    Float32,
}

/// The four properties that determine how an image's planes are walked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DecodeKey {
    pub eight_bit: bool,
    pub alpha: bool,
    pub planar: bool,
    pub monochrome: bool,
}

impl DecodeKey {
    pub(crate) fn of(image: &DecodedImage) -> Self {
        Self {
            eight_bit: image.bit_depth() == 8,
            alpha: image.has_alpha(),
            planar: image.chroma() == ChromaLayout::Planar,
            monochrome: image.color_space() == HeifColorSpace::Monochrome,
        }
    }
}

/// One leaf decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DecodeStrategy {
    Gray8,
    GrayAlpha8,
    PlanarRgb8,
    PlanarRgba8,
    InterleavedRgb8,
    InterleavedRgba8,
    GrayWide,
    GrayAlphaWide,
    PlanarRgbWide,
    PlanarRgbaWide,
    InterleavedRgbWide,
    InterleavedRgbaWide,
}

/// Map a decode key to its strategy
///
/// Total over all sixteen combinations. A monochrome image has a single luma
/// plane, so its layout flag is irrelevant.
pub(crate) fn select(key: DecodeKey) -> DecodeStrategy {
    match (key.eight_bit, key.monochrome, key.alpha, key.planar) {
        (true, true, false, _) => DecodeStrategy::Gray8,
        (true, true, true, _) => DecodeStrategy::GrayAlpha8,
        (true, false, false, true) => DecodeStrategy::PlanarRgb8,
        (true, false, false, false) => DecodeStrategy::InterleavedRgb8,
        (true, false, true, true) => DecodeStrategy::PlanarRgba8,
        (true, false, true, false) => DecodeStrategy::InterleavedRgba8,
        (false, true, false, _) => DecodeStrategy::GrayWide,
        (false, true, true, _) => DecodeStrategy::GrayAlphaWide,
        (false, false, false, true) => DecodeStrategy::PlanarRgbWide,
        (false, false, false, false) => DecodeStrategy::InterleavedRgbWide,
        (false, false, true, true) => DecodeStrategy::PlanarRgbaWide,
        (false, false, true, false) => DecodeStrategy::InterleavedRgbaWide,
    }
}

/// Run one image through the full conversion: decode, straighten alpha,
/// transform or format-convert, write BGRA32
///
/// Any failure aborts the whole image; a partially written surface is not a
/// valid result.
pub(crate) fn decode_to_surface(
    image: &DecodedImage,
    config: &ConvertConfig,
    surface: &mut SurfaceMut<'_>,
) -> Result<()> {
    if image.width() as usize != surface.width() || image.height() as usize != surface.height() {
        return Err(at(Error::SurfaceSizeMismatch {
            image_width: image.width(),
            image_height: image.height(),
            surface_width: surface.width() as u32,
            surface_height: surface.height() as u32,
        }));
    }

    let key = DecodeKey::of(image);
    let strategy = select(key);
    debug!(
        "decoding {}x{} {}-bit via {strategy:?}, hdr {:?}",
        image.width(),
        image.height(),
        image.bit_depth(),
        image.hdr_format()
    );

    if key.eight_bit {
        match strategy {
            DecodeStrategy::Gray8 => mono_decoder::gray8(image, surface)?,
            DecodeStrategy::GrayAlpha8 => mono_decoder::gray_alpha8(image, surface)?,
            DecodeStrategy::PlanarRgb8 => rgb_decoder::planar_rgb8(image, surface)?,
            DecodeStrategy::PlanarRgba8 => rgb_decoder::planar_rgba8(image, surface)?,
            DecodeStrategy::InterleavedRgb8 => rgb_decoder::interleaved_rgb8(image, surface)?,
            DecodeStrategy::InterleavedRgba8 => rgb_decoder::interleaved_rgba8(image, surface)?,
            wide => unreachable!("8-bit key selected wide strategy {wide:?}"),
        }

        if image.has_alpha() && image.premultiplied_alpha() {
            surface.convert_from_premultiplied_alpha();
        }

        return Ok(());
    }

    let hdr_format = image.hdr_format();
    // PQ sources expand straight to float; a 16-bit detour would quantize
    // the signal before the display transform sees it.
    let precision = match hdr_format {
        HdrFormat::Pq => WidePrecision::Float32,
        HdrFormat::None => WidePrecision::Int16,
    };

    let mut buffer: Intermediate = match strategy {
        DecodeStrategy::GrayWide => mono_decoder::gray_wide(image, precision)?,
        DecodeStrategy::GrayAlphaWide => mono_decoder::gray_alpha_wide(image, precision)?,
        DecodeStrategy::PlanarRgbWide => rgb_decoder::planar_rgb_wide(image, precision)?,
        DecodeStrategy::PlanarRgbaWide => rgb_decoder::planar_rgba_wide(image, precision)?,
        DecodeStrategy::InterleavedRgbWide => rgb_decoder::interleaved_rgb_wide(image, precision)?,
        DecodeStrategy::InterleavedRgbaWide => {
            rgb_decoder::interleaved_rgba_wide(image, precision)?
        }
        direct => unreachable!("wide key selected 8-bit strategy {direct:?}"),
    };

    // Straight alpha before the display transform; the CMS assumes it.
    if image.has_alpha() && image.premultiplied_alpha() {
        alpha::unpremultiply(&mut buffer);
    }

    match hdr_format {
        HdrFormat::None => display::sdr_to_bgra32(&buffer, surface),
        hdr => display::hdr_to_bgra32(&buffer, hdr, config.hdr_target, surface),
    }
}
