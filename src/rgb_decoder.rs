//! Layout decoders for RGB images
//!
//! Planar and interleaved layouts differ only in how source samples advance:
//! one row per channel with its own stride, versus fixed-size chunks of a
//! single combined row. The per-pixel computation is identical.

use crate::dispatch::WidePrecision;
use crate::error::Result;
use crate::expand::{HdrExpansionTable, SdrExpansionTable};
use crate::image::{DecodedImage, HeifChannel};
use crate::intermediate::Intermediate;
use crate::surface::{Bgra8, SurfaceMut};
use imgref::ImgVec;
use rgb::{Rgb, Rgba};

pub(crate) fn planar_rgb8(image: &DecodedImage, surface: &mut SurfaceMut<'_>) -> Result<()> {
    let red = image.plane8(HeifChannel::R)?;
    let green = image.plane8(HeifChannel::G)?;
    let blue = image.plane8(HeifChannel::B)?;

    for (((red_row, green_row), blue_row), dst_row) in red
        .rows()
        .zip(green.rows())
        .zip(blue.rows())
        .zip(surface.rows_mut())
    {
        for (((&r, &g), &b), dst) in red_row
            .iter()
            .zip(green_row.iter())
            .zip(blue_row.iter())
            .zip(dst_row.iter_mut())
        {
            *dst = Bgra8 { b, g, r, a: 255 };
        }
    }

    Ok(())
}

pub(crate) fn planar_rgba8(image: &DecodedImage, surface: &mut SurfaceMut<'_>) -> Result<()> {
    let red = image.plane8(HeifChannel::R)?;
    let green = image.plane8(HeifChannel::G)?;
    let blue = image.plane8(HeifChannel::B)?;
    let alpha = image.plane8(HeifChannel::Alpha)?;

    for ((((red_row, green_row), blue_row), alpha_row), dst_row) in red
        .rows()
        .zip(green.rows())
        .zip(blue.rows())
        .zip(alpha.rows())
        .zip(surface.rows_mut())
    {
        for ((((&r, &g), &b), &a), dst) in red_row
            .iter()
            .zip(green_row.iter())
            .zip(blue_row.iter())
            .zip(alpha_row.iter())
            .zip(dst_row.iter_mut())
        {
            *dst = Bgra8 { b, g, r, a };
        }
    }

    Ok(())
}

pub(crate) fn interleaved_rgb8(image: &DecodedImage, surface: &mut SurfaceMut<'_>) -> Result<()> {
    let plane = image.plane8(HeifChannel::Interleaved)?;

    for (src_row, dst_row) in plane.rows().zip(surface.rows_mut()) {
        for (src, dst) in src_row.chunks_exact(3).zip(dst_row.iter_mut()) {
            *dst = Bgra8 {
                b: src[2],
                g: src[1],
                r: src[0],
                a: 255,
            };
        }
    }

    Ok(())
}

pub(crate) fn interleaved_rgba8(image: &DecodedImage, surface: &mut SurfaceMut<'_>) -> Result<()> {
    let plane = image.plane8(HeifChannel::Interleaved)?;

    for (src_row, dst_row) in plane.rows().zip(surface.rows_mut()) {
        for (src, dst) in src_row.chunks_exact(4).zip(dst_row.iter_mut()) {
            *dst = Bgra8 {
                b: src[2],
                g: src[1],
                r: src[0],
                a: src[3],
            };
        }
    }

    Ok(())
}

pub(crate) fn planar_rgb_wide(
    image: &DecodedImage,
    precision: WidePrecision,
) -> Result<Intermediate> {
    let red = image.plane16(HeifChannel::R)?;
    let green = image.plane16(HeifChannel::G)?;
    let blue = image.plane16(HeifChannel::B)?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    match precision {
        WidePrecision::Int16 => {
            let expansion = SdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for ((red_row, green_row), blue_row) in red.rows().zip(green.rows()).zip(blue.rows()) {
                for ((&r, &g), &b) in red_row.iter().zip(green_row.iter()).zip(blue_row.iter()) {
                    buf.push(Rgb {
                        r: expansion.get(r),
                        g: expansion.get(g),
                        b: expansion.get(b),
                    });
                }
            }
            Ok(Intermediate::Rgb16(ImgVec::new(buf, width, height)))
        }
        WidePrecision::Float32 => {
            let expansion = HdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for ((red_row, green_row), blue_row) in red.rows().zip(green.rows()).zip(blue.rows()) {
                for ((&r, &g), &b) in red_row.iter().zip(green_row.iter()).zip(blue_row.iter()) {
                    buf.push(Rgb {
                        r: expansion.get(r),
                        g: expansion.get(g),
                        b: expansion.get(b),
                    });
                }
            }
            Ok(Intermediate::RgbF32(ImgVec::new(buf, width, height)))
        }
    }
}

pub(crate) fn planar_rgba_wide(
    image: &DecodedImage,
    precision: WidePrecision,
) -> Result<Intermediate> {
    let red = image.plane16(HeifChannel::R)?;
    let green = image.plane16(HeifChannel::G)?;
    let blue = image.plane16(HeifChannel::B)?;
    let alpha = image.plane16(HeifChannel::Alpha)?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    match precision {
        WidePrecision::Int16 => {
            let expansion = SdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for (((red_row, green_row), blue_row), alpha_row) in red
                .rows()
                .zip(green.rows())
                .zip(blue.rows())
                .zip(alpha.rows())
            {
                for (((&r, &g), &b), &a) in red_row
                    .iter()
                    .zip(green_row.iter())
                    .zip(blue_row.iter())
                    .zip(alpha_row.iter())
                {
                    buf.push(Rgba {
                        r: expansion.get(r),
                        g: expansion.get(g),
                        b: expansion.get(b),
                        a: expansion.get(a),
                    });
                }
            }
            Ok(Intermediate::Rgba16(ImgVec::new(buf, width, height)))
        }
        WidePrecision::Float32 => {
            let expansion = HdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for (((red_row, green_row), blue_row), alpha_row) in red
                .rows()
                .zip(green.rows())
                .zip(blue.rows())
                .zip(alpha.rows())
            {
                for (((&r, &g), &b), &a) in red_row
                    .iter()
                    .zip(green_row.iter())
                    .zip(blue_row.iter())
                    .zip(alpha_row.iter())
                {
                    buf.push(Rgba {
                        r: expansion.get(r),
                        g: expansion.get(g),
                        b: expansion.get(b),
                        a: expansion.get(a),
                    });
                }
            }
            Ok(Intermediate::RgbaF32(ImgVec::new(buf, width, height)))
        }
    }
}

pub(crate) fn interleaved_rgb_wide(
    image: &DecodedImage,
    precision: WidePrecision,
) -> Result<Intermediate> {
    let plane = image.plane16(HeifChannel::Interleaved)?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    match precision {
        WidePrecision::Int16 => {
            let expansion = SdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for src_row in plane.rows() {
                for src in src_row.chunks_exact(3) {
                    buf.push(Rgb {
                        r: expansion.get(src[0]),
                        g: expansion.get(src[1]),
                        b: expansion.get(src[2]),
                    });
                }
            }
            Ok(Intermediate::Rgb16(ImgVec::new(buf, width, height)))
        }
        WidePrecision::Float32 => {
            let expansion = HdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for src_row in plane.rows() {
                for src in src_row.chunks_exact(3) {
                    buf.push(Rgb {
                        r: expansion.get(src[0]),
                        g: expansion.get(src[1]),
                        b: expansion.get(src[2]),
                    });
                }
            }
            Ok(Intermediate::RgbF32(ImgVec::new(buf, width, height)))
        }
    }
}

pub(crate) fn interleaved_rgba_wide(
    image: &DecodedImage,
    precision: WidePrecision,
) -> Result<Intermediate> {
    let plane = image.plane16(HeifChannel::Interleaved)?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    match precision {
        WidePrecision::Int16 => {
            let expansion = SdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for src_row in plane.rows() {
                for src in src_row.chunks_exact(4) {
                    buf.push(Rgba {
                        r: expansion.get(src[0]),
                        g: expansion.get(src[1]),
                        b: expansion.get(src[2]),
                        a: expansion.get(src[3]),
                    });
                }
            }
            Ok(Intermediate::Rgba16(ImgVec::new(buf, width, height)))
        }
        WidePrecision::Float32 => {
            let expansion = HdrExpansionTable::new(image.bit_depth());
            let mut buf = Vec::with_capacity(width * height);
            for src_row in plane.rows() {
                for src in src_row.chunks_exact(4) {
                    buf.push(Rgba {
                        r: expansion.get(src[0]),
                        g: expansion.get(src[1]),
                        b: expansion.get(src[2]),
                        a: expansion.get(src[3]),
                    });
                }
            }
            Ok(Intermediate::RgbaF32(ImgVec::new(buf, width, height)))
        }
    }
}
