//! Final conversion of intermediate buffers to the BGRA32 surface
//!
//! SDR buffers get a pure format conversion. PQ-tagged float buffers run one
//! device color transform into the display space first; an HDR format without
//! a transform falls back to the SDR conversion and loses its tagging.

use crate::color::{self, DisplayColorSpace};
use crate::error::{Error, Result};
use crate::image::HdrFormat;
use crate::intermediate::Intermediate;
use crate::surface::{Bgra8, SurfaceMut};
use imgref::ImgVec;
use log::debug;
use moxcms::{Layout, TransformOptions};
use rgb::{ComponentSlice, Rgb, Rgba};
use whereat::at;

#[inline]
fn quantize_unit(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn check_dims(image: &Intermediate, surface: &SurfaceMut<'_>) -> Result<()> {
    if image.width() != surface.width() || image.height() != surface.height() {
        return Err(at(Error::SurfaceSizeMismatch {
            image_width: image.width() as u32,
            image_height: image.height() as u32,
            surface_width: surface.width() as u32,
            surface_height: surface.height() as u32,
        }));
    }
    Ok(())
}

/// Convert a high-precision buffer to BGRA32 with no color transform
///
/// 16-bit channels are truncated to their high byte; floats are clamped to
/// [0, 1] and scaled. Buffers without alpha produce opaque pixels.
pub fn sdr_to_bgra32(image: &Intermediate, surface: &mut SurfaceMut<'_>) -> Result<()> {
    check_dims(image, surface)?;

    match image {
        Intermediate::Rgb16(img) => {
            for (src_row, dst_row) in img.as_ref().rows().zip(surface.rows_mut()) {
                for (src, dst) in src_row.iter().zip(dst_row.iter_mut()) {
                    *dst = Bgra8 {
                        b: (src.b >> 8) as u8,
                        g: (src.g >> 8) as u8,
                        r: (src.r >> 8) as u8,
                        a: 255,
                    };
                }
            }
        }
        Intermediate::Rgba16(img) => {
            for (src_row, dst_row) in img.as_ref().rows().zip(surface.rows_mut()) {
                for (src, dst) in src_row.iter().zip(dst_row.iter_mut()) {
                    *dst = Bgra8 {
                        b: (src.b >> 8) as u8,
                        g: (src.g >> 8) as u8,
                        r: (src.r >> 8) as u8,
                        a: (src.a >> 8) as u8,
                    };
                }
            }
        }
        Intermediate::RgbF32(img) => {
            for (src_row, dst_row) in img.as_ref().rows().zip(surface.rows_mut()) {
                for (src, dst) in src_row.iter().zip(dst_row.iter_mut()) {
                    *dst = Bgra8 {
                        b: quantize_unit(src.b),
                        g: quantize_unit(src.g),
                        r: quantize_unit(src.r),
                        a: 255,
                    };
                }
            }
        }
        Intermediate::RgbaF32(img) => {
            for (src_row, dst_row) in img.as_ref().rows().zip(surface.rows_mut()) {
                for (src, dst) in src_row.iter().zip(dst_row.iter_mut()) {
                    *dst = Bgra8 {
                        b: quantize_unit(src.b),
                        g: quantize_unit(src.g),
                        r: quantize_unit(src.r),
                        a: quantize_unit(src.a),
                    };
                }
            }
        }
    }

    Ok(())
}

/// Convert an HDR-tagged buffer to BGRA32
///
/// PQ float buffers run a single device transform from BT.2020/PQ into the
/// target display space with straight-alpha semantics. Anything else is
/// converted as SDR and the HDR tagging is discarded.
pub fn hdr_to_bgra32(
    image: &Intermediate,
    hdr_format: HdrFormat,
    target: DisplayColorSpace,
    surface: &mut SurfaceMut<'_>,
) -> Result<()> {
    match (hdr_format, image) {
        (HdrFormat::Pq, Intermediate::RgbF32(img)) => pq_rgb_to_bgra32(img, target, surface),
        (HdrFormat::Pq, Intermediate::RgbaF32(img)) => pq_rgba_to_bgra32(img, target, surface),
        _ => {
            debug!("no display transform for {hdr_format:?} buffer, converting as SDR");
            sdr_to_bgra32(image, surface)
        }
    }
}

fn transform_error(e: impl core::fmt::Debug) -> whereat::At<Error> {
    at(Error::ColorTransform(format!("{e:?}")))
}

fn pq_rgb_to_bgra32(
    img: &ImgVec<Rgb<f32>>,
    target: DisplayColorSpace,
    surface: &mut SurfaceMut<'_>,
) -> Result<()> {
    if img.width() != surface.width() || img.height() != surface.height() {
        return Err(at(Error::SurfaceSizeMismatch {
            image_width: img.width() as u32,
            image_height: img.height() as u32,
            surface_width: surface.width() as u32,
            surface_height: surface.height() as u32,
        }));
    }

    let src_profile = color::pq_source_profile();
    let dst_profile = color::display_profile(target);
    // Scoped: the transform is released when this call returns, on every path.
    let transform = src_profile
        .create_transform_f32(Layout::Rgb, &dst_profile, Layout::Rgb, TransformOptions::default())
        .map_err(transform_error)?;

    let mut display_row = vec![Rgb { r: 0.0f32, g: 0.0, b: 0.0 }; img.width()];
    for (src_row, dst_row) in img.as_ref().rows().zip(surface.rows_mut()) {
        transform
            .transform(src_row.as_slice(), display_row.as_mut_slice().as_mut_slice())
            .map_err(transform_error)?;
        for (src, dst) in display_row.iter().zip(dst_row.iter_mut()) {
            *dst = Bgra8 {
                b: quantize_unit(src.b),
                g: quantize_unit(src.g),
                r: quantize_unit(src.r),
                a: 255,
            };
        }
    }

    Ok(())
}

fn pq_rgba_to_bgra32(
    img: &ImgVec<Rgba<f32>>,
    target: DisplayColorSpace,
    surface: &mut SurfaceMut<'_>,
) -> Result<()> {
    if img.width() != surface.width() || img.height() != surface.height() {
        return Err(at(Error::SurfaceSizeMismatch {
            image_width: img.width() as u32,
            image_height: img.height() as u32,
            surface_width: surface.width() as u32,
            surface_height: surface.height() as u32,
        }));
    }

    let src_profile = color::pq_source_profile();
    let dst_profile = color::display_profile(target);
    let transform = src_profile
        .create_transform_f32(
            Layout::Rgba,
            &dst_profile,
            Layout::Rgba,
            TransformOptions::default(),
        )
        .map_err(transform_error)?;

    let mut display_row = vec![
        Rgba {
            r: 0.0f32,
            g: 0.0,
            b: 0.0,
            a: 0.0
        };
        img.width()
    ];
    for (src_row, dst_row) in img.as_ref().rows().zip(surface.rows_mut()) {
        transform
            .transform(src_row.as_slice(), display_row.as_mut_slice().as_mut_slice())
            .map_err(transform_error)?;
        for ((src, orig), dst) in display_row.iter().zip(src_row.iter()).zip(dst_row.iter_mut()) {
            // Straight alpha: the transform only touches color, alpha is
            // carried over from the source pixel.
            *dst = Bgra8 {
                b: quantize_unit(src.b),
                g: quantize_unit(src.g),
                r: quantize_unit(src.r),
                a: quantize_unit(orig.a),
            };
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::Surface;

    fn gray_f32(value: f32, width: usize, height: usize) -> Intermediate {
        Intermediate::RgbF32(ImgVec::new(
            vec![
                Rgb {
                    r: value,
                    g: value,
                    b: value
                };
                width * height
            ],
            width,
            height,
        ))
    }

    #[test]
    fn sixteen_bit_truncates_high_byte() {
        let img = ImgVec::new(
            vec![Rgb {
                r: 0xFFFFu16,
                g: 0x8000,
                b: 0x0000,
            }],
            1,
            1,
        );
        let mut surface = Surface::new(1, 1).unwrap();
        sdr_to_bgra32(&Intermediate::Rgb16(img), &mut surface.view_mut()).unwrap();
        let px = surface.pixel(0, 0);
        assert_eq!((px.r, px.g, px.b, px.a), (255, 128, 0, 255));
    }

    #[test]
    fn float_conversion_rounds_and_clamps() {
        let img = ImgVec::new(
            vec![Rgb {
                r: 1.5f32,
                g: 0.5,
                b: -0.25,
            }],
            1,
            1,
        );
        let mut surface = Surface::new(1, 1).unwrap();
        sdr_to_bgra32(&Intermediate::RgbF32(img), &mut surface.view_mut()).unwrap();
        let px = surface.pixel(0, 0);
        assert_eq!((px.r, px.g, px.b, px.a), (255, 128, 0, 255));
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let img = ImgVec::new(vec![Rgb { r: 0u16, g: 0, b: 0 }; 4], 2, 2);
        let mut surface = Surface::new(1, 1).unwrap();
        let err = sdr_to_bgra32(&Intermediate::Rgb16(img), &mut surface.view_mut()).unwrap_err();
        assert!(
            err.to_string().contains("mismatch"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn pq_transform_black_stays_black() {
        let mut surface = Surface::new(2, 1).unwrap();
        hdr_to_bgra32(
            &gray_f32(0.0, 2, 1),
            HdrFormat::Pq,
            DisplayColorSpace::DisplayP3,
            &mut surface.view_mut(),
        )
        .unwrap();
        let px = surface.pixel(0, 0);
        assert!(px.r <= 1 && px.g <= 1 && px.b <= 1, "got {px:?}");
        assert_eq!(px.a, 255);
    }

    #[test]
    fn pq_transform_is_monotonic_in_signal() {
        let mut values = Vec::new();
        for signal in [0.0f32, 0.25, 0.5, 0.75, 1.0] {
            let mut surface = Surface::new(1, 1).unwrap();
            hdr_to_bgra32(
                &gray_f32(signal, 1, 1),
                HdrFormat::Pq,
                DisplayColorSpace::DisplayP3,
                &mut surface.view_mut(),
            )
            .unwrap();
            values.push(surface.pixel(0, 0).g);
        }
        for pair in values.windows(2) {
            assert!(pair[0] <= pair[1], "not monotonic: {values:?}");
        }
        assert!(
            values[4] > values[0],
            "PQ white should be brighter than black: {values:?}"
        );
    }

    #[test]
    fn non_pq_format_falls_back_to_sdr() {
        let buffer = gray_f32(0.5, 2, 2);

        let mut fallback = Surface::new(2, 2).unwrap();
        hdr_to_bgra32(
            &buffer,
            HdrFormat::None,
            DisplayColorSpace::DisplayP3,
            &mut fallback.view_mut(),
        )
        .unwrap();

        let mut sdr = Surface::new(2, 2).unwrap();
        sdr_to_bgra32(&buffer, &mut sdr.view_mut()).unwrap();

        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(fallback.pixel(x, y), sdr.pixel(x, y));
            }
        }
    }
}
