//! The canonical output surface: packed 8-bit BGRA with a caller-supplied stride

use crate::alpha;
use crate::error::{Error, Result};
use whereat::at;

/// One packed surface pixel, blue byte first
pub type Bgra8 = rgb::alt::BGRA<u8>;

/// A mutable view over caller-owned BGRA32 surface memory
///
/// The pipeline writes pixels through this view and never resizes or
/// reallocates the backing buffer. `stride` is in pixels; the row pitch
/// must be at least the image width.
#[derive(Debug)]
pub struct SurfaceMut<'a> {
    buf: &'a mut [Bgra8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> SurfaceMut<'a> {
    /// Wrap a typed pixel buffer. `stride` is in pixels.
    pub fn new(buf: &'a mut [Bgra8], width: u32, height: u32, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(at(Error::InvalidDimensions(width, height)));
        }
        let width = width as usize;
        let height = height as usize;
        if stride < width {
            return Err(at(Error::PlaneMismatch("surface stride shorter than row")));
        }
        let needed = stride * (height - 1) + width;
        if buf.len() < needed {
            return Err(at(Error::BufferTooSmall {
                needed,
                actual: buf.len(),
            }));
        }
        Ok(Self {
            buf,
            width,
            height,
            stride,
        })
    }

    /// Wrap raw surface bytes as BGRA pixels. `stride_bytes` is the row pitch
    /// in bytes and must be a multiple of 4.
    pub fn from_bytes(
        bytes: &'a mut [u8],
        width: u32,
        height: u32,
        stride_bytes: usize,
    ) -> Result<Self> {
        if stride_bytes % 4 != 0 {
            return Err(at(Error::PlaneMismatch(
                "surface stride is not a whole number of BGRA pixels",
            )));
        }
        let trimmed_len = bytes.len() - bytes.len() % 4;
        let buf: &mut [Bgra8] = bytemuck::cast_slice_mut(&mut bytes[..trimmed_len]);
        Self::new(buf, width, height, stride_bytes / 4)
    }

    /// Surface width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Surface height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// One row of pixels, excluding any stride padding
    ///
    /// # Panics
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: usize) -> &mut [Bgra8] {
        assert!(y < self.height, "row {y} out of range");
        &mut self.buf[y * self.stride..][..self.width]
    }

    /// Iterator over all pixel rows, top to bottom
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Bgra8]> + '_ {
        let width = self.width;
        self.buf
            .chunks_mut(self.stride)
            .take(self.height)
            .map(move |row| &mut row[..width])
    }

    /// Convert every pixel from premultiplied to straight alpha, in place
    ///
    /// This is the host's standard 8-bit unpremultiply; zero alpha zeroes the
    /// color channels.
    pub fn convert_from_premultiplied_alpha(&mut self) {
        for row in self.rows_mut() {
            alpha::unpremultiply_bgra8_row(row);
        }
    }
}

/// An owned BGRA32 surface for callers that do not bring their own memory
///
/// Stride equals the width; pixels start zeroed (transparent black).
#[derive(Debug, Clone)]
pub struct Surface {
    buf: Vec<Bgra8>,
    width: usize,
    height: usize,
}

impl Surface {
    /// Allocate a zeroed surface
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(at(Error::InvalidDimensions(width, height)));
        }
        let width = width as usize;
        let height = height as usize;
        Ok(Self {
            buf: vec![Bgra8::default(); width * height],
            width,
            height,
        })
    }

    /// Surface width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Surface height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Mutable view for the conversion pipeline
    pub fn view_mut(&mut self) -> SurfaceMut<'_> {
        SurfaceMut {
            buf: &mut self.buf,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// One row of pixels
    pub fn row(&self, y: usize) -> &[Bgra8] {
        &self.buf[y * self.width..][..self.width]
    }

    /// One pixel
    pub fn pixel(&self, x: usize, y: usize) -> Bgra8 {
        self.buf[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_skip_stride_padding() {
        let mut buf = vec![Bgra8::default(); 2 * 3];
        {
            let mut surface = SurfaceMut::new(&mut buf, 2, 2, 3).unwrap();
            for (y, row) in surface.rows_mut().enumerate() {
                for px in row.iter_mut() {
                    px.r = y as u8 + 1;
                }
            }
        }
        // padding pixel at index 2 untouched
        assert_eq!(buf[0].r, 1);
        assert_eq!(buf[1].r, 1);
        assert_eq!(buf[2].r, 0);
        assert_eq!(buf[3].r, 2);
        assert_eq!(buf[4].r, 2);
    }

    #[test]
    fn last_row_needs_no_padding() {
        // stride 3, height 2: 3*1 + 2 = 5 pixels suffice
        let mut buf = vec![Bgra8::default(); 5];
        let mut surface = SurfaceMut::new(&mut buf, 2, 2, 3).unwrap();
        assert_eq!(surface.row_mut(1).len(), 2);
    }

    #[test]
    fn byte_buffer_view_roundtrips() {
        let mut bytes = vec![0u8; 2 * 2 * 4];
        {
            let mut surface = SurfaceMut::from_bytes(&mut bytes, 2, 2, 8).unwrap();
            surface.row_mut(1)[1] = Bgra8 {
                b: 1,
                g: 2,
                r: 3,
                a: 4,
            };
        }
        assert_eq!(&bytes[12..16], &[1, 2, 3, 4]);
    }

    #[test]
    fn misaligned_byte_stride_is_rejected() {
        let mut bytes = vec![0u8; 64];
        let err = SurfaceMut::from_bytes(&mut bytes, 2, 2, 9).unwrap_err();
        assert!(err.to_string().contains("stride"), "unexpected error: {err}");
    }

    #[test]
    fn undersized_buffer_is_rejected() {
        let mut buf = vec![Bgra8::default(); 3];
        let err = SurfaceMut::new(&mut buf, 2, 2, 2).unwrap_err();
        assert!(
            err.to_string().contains("too small"),
            "unexpected error: {err}"
        );
    }
}
