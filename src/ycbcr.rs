//! YCbCr front-end
//!
//! YCbCr sample planes are never walked here; the matrix conversion belongs to
//! the native decoder. This module picks the interleaved RGB format that
//! preserves the source's depth and alpha, asks the handle for an RGB
//! re-decode, and feeds the result to the RGB pipeline.

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::image::{ImageHandle, RgbDecodeFormat};
use crate::surface::SurfaceMut;

pub(crate) fn decode_as_rgb<H: ImageHandle + ?Sized>(
    handle: &H,
    config: &ConvertConfig,
    surface: &mut SurfaceMut<'_>,
) -> Result<()> {
    let format = if handle.has_alpha() {
        if handle.bit_depth() == 8 {
            RgbDecodeFormat::Rgba32
        } else {
            RgbDecodeFormat::Rgba64
        }
    } else if handle.bit_depth() == 8 {
        RgbDecodeFormat::Rgb24
    } else {
        RgbDecodeFormat::Rgb48
    };

    let image = handle.decode_rgb(format)?;
    crate::convert_with(&image, config, surface)
}
