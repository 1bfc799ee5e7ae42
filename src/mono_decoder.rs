//! Layout decoders for monochrome images
//!
//! A monochrome source is the degenerate single-channel case: the gray value
//! is fanned out to all three color channels of every output pixel.

use crate::dispatch::WidePrecision;
use crate::error::Result;
use crate::expand::{HdrExpansionTable, SdrExpansionTable};
use crate::image::{DecodedImage, HeifChannel};
use crate::intermediate::Intermediate;
use crate::surface::{Bgra8, SurfaceMut};
use imgref::ImgVec;
use rgb::{Rgb, Rgba};

pub(crate) fn gray8(image: &DecodedImage, surface: &mut SurfaceMut<'_>) -> Result<()> {
    let gray_plane = image.plane8(HeifChannel::Y)?;

    for (src_row, dst_row) in gray_plane.rows().zip(surface.rows_mut()) {
        for (&gray, dst) in src_row.iter().zip(dst_row.iter_mut()) {
            *dst = Bgra8 {
                b: gray,
                g: gray,
                r: gray,
                a: 255,
            };
        }
    }

    Ok(())
}

pub(crate) fn gray_alpha8(image: &DecodedImage, surface: &mut SurfaceMut<'_>) -> Result<()> {
    let gray_plane = image.plane8(HeifChannel::Y)?;
    let alpha_plane = image.plane8(HeifChannel::Alpha)?;

    for ((src_row, alpha_row), dst_row) in gray_plane
        .rows()
        .zip(alpha_plane.rows())
        .zip(surface.rows_mut())
    {
        for ((&gray, &alpha), dst) in src_row.iter().zip(alpha_row.iter()).zip(dst_row.iter_mut())
        {
            *dst = Bgra8 {
                b: gray,
                g: gray,
                r: gray,
                a: alpha,
            };
        }
    }

    Ok(())
}

pub(crate) fn gray_wide(image: &DecodedImage, precision: WidePrecision) -> Result<Intermediate> {
    let gray_plane = image.plane16(HeifChannel::Y)?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    match precision {
        WidePrecision::Int16 => {
            let expansion = SdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for src_row in gray_plane.rows() {
                for &sample in src_row {
                    let gray = expansion.get(sample);
                    buf.push(Rgb {
                        r: gray,
                        g: gray,
                        b: gray,
                    });
                }
            }
            Ok(Intermediate::Rgb16(ImgVec::new(buf, width, height)))
        }
        WidePrecision::Float32 => {
            let expansion = HdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for src_row in gray_plane.rows() {
                for &sample in src_row {
                    let gray = expansion.get(sample);
                    buf.push(Rgb {
                        r: gray,
                        g: gray,
                        b: gray,
                    });
                }
            }
            Ok(Intermediate::RgbF32(ImgVec::new(buf, width, height)))
        }
    }
}

pub(crate) fn gray_alpha_wide(
    image: &DecodedImage,
    precision: WidePrecision,
) -> Result<Intermediate> {
    let gray_plane = image.plane16(HeifChannel::Y)?;
    let alpha_plane = image.plane16(HeifChannel::Alpha)?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    match precision {
        WidePrecision::Int16 => {
            let expansion = SdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for (src_row, alpha_row) in gray_plane.rows().zip(alpha_plane.rows()) {
                for (&sample, &alpha) in src_row.iter().zip(alpha_row.iter()) {
                    let gray = expansion.get(sample);
                    buf.push(Rgba {
                        r: gray,
                        g: gray,
                        b: gray,
                        a: expansion.get(alpha),
                    });
                }
            }
            Ok(Intermediate::Rgba16(ImgVec::new(buf, width, height)))
        }
        WidePrecision::Float32 => {
            let expansion = HdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for (src_row, alpha_row) in gray_plane.rows().zip(alpha_plane.rows()) {
                for (&sample, &alpha) in src_row.iter().zip(alpha_row.iter()) {
                    let gray = expansion.get(sample);
                    buf.push(Rgba {
                        r: gray,
                        g: gray,
                        b: gray,
                        a: expansion.get(alpha),
                    });
                }
            }
            Ok(Intermediate::RgbaF32(ImgVec::new(buf, width, height)))
        }
    }
}
