//! Premultiplied to straight alpha conversion
//!
//! The color-management transform and the host surface both assume straight
//! alpha, so premultiplied sources are converted in place before any further
//! processing. Zero alpha zeroes the color channels.

use crate::intermediate::Intermediate;
use crate::surface::Bgra8;
use rgb::Rgba;

/// Convert premultiplied alpha to straight alpha for one 8-bit BGRA row
#[inline(never)]
pub fn unpremultiply_bgra8_row(row: &mut [Bgra8]) {
    for px in row.iter_mut() {
        match px.a {
            255 => {}
            0 => {
                px.b = 0;
                px.g = 0;
                px.r = 0;
            }
            a => {
                let a = a as u16;
                px.b = (px.b as u16 * 255 / a).min(255) as u8;
                px.g = (px.g as u16 * 255 / a).min(255) as u8;
                px.r = (px.r as u16 * 255 / a).min(255) as u8;
            }
        }
    }
}

/// Convert premultiplied alpha to straight alpha for one 16-bit RGBA row
#[inline(never)]
pub fn unpremultiply_rgba16_row(row: &mut [Rgba<u16>]) {
    for px in row.iter_mut() {
        match px.a {
            0xFFFF => {}
            0 => {
                px.r = 0;
                px.g = 0;
                px.b = 0;
            }
            a => {
                let a = a as u32;
                px.r = (px.r as u32 * 0xFFFF / a).min(0xFFFF) as u16;
                px.g = (px.g as u32 * 0xFFFF / a).min(0xFFFF) as u16;
                px.b = (px.b as u32 * 0xFFFF / a).min(0xFFFF) as u16;
            }
        }
    }
}

/// Convert premultiplied alpha to straight alpha for one float RGBA row
///
/// Results are clamped to [0, 1]; the buffer is unit-range encoded.
#[inline(never)]
pub fn unpremultiply_rgba_f32_row(row: &mut [Rgba<f32>]) {
    for px in row.iter_mut() {
        if px.a <= 0.0 {
            px.r = 0.0;
            px.g = 0.0;
            px.b = 0.0;
        } else if px.a < 1.0 {
            let inv = 1.0 / px.a;
            px.r = (px.r * inv).min(1.0);
            px.g = (px.g * inv).min(1.0);
            px.b = (px.b * inv).min(1.0);
        }
    }
}

/// Convert a premultiplied high-precision buffer to straight alpha in place
///
/// A no-op for buffers without alpha. Must run before the HDR display
/// transform.
pub fn unpremultiply(image: &mut Intermediate) {
    match image {
        Intermediate::Rgba16(img) => {
            for row in img.rows_mut() {
                unpremultiply_rgba16_row(row);
            }
        }
        Intermediate::RgbaF32(img) => {
            for row in img.rows_mut() {
                unpremultiply_rgba_f32_row(row);
            }
        }
        Intermediate::Rgb16(_) | Intermediate::RgbF32(_) => {}
    }
}
