//! Decoded image model, plane views, and color metadata

use crate::error::{Error, Result};
use whereat::at;

/// Color space of a decoded HEIF image, as reported by the native decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeifColorSpace {
    /// YCbCr sample planes; must be re-decoded to RGB before conversion
    YCbCr,
    /// RGB sample planes (planar or interleaved)
    Rgb,
    /// Single luma plane
    Monochrome,
}

/// How the color channels of one pixel are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaLayout {
    /// One contiguous plane per channel
    Planar,
    /// All channels of a pixel stored contiguously in a single plane
    Interleaved,
}

/// Logical channel identifiers for plane access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeifChannel {
    /// Luma (also the gray channel of monochrome images)
    Y,
    /// Blue-difference chroma
    Cb,
    /// Red-difference chroma
    Cr,
    /// Red
    R,
    /// Green
    G,
    /// Blue
    B,
    /// Alpha
    Alpha,
    /// The single combined plane of an interleaved image
    Interleaved,
}

/// Interleaved RGB formats the native decoder can be asked to produce
///
/// Used by the YCbCr front-end to request an RGB re-decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbDecodeFormat {
    /// 8-bit interleaved RGB
    Rgb24,
    /// 8-bit interleaved RGBA
    Rgba32,
    /// High bit depth interleaved RGB in 16-bit containers
    Rgb48,
    /// High bit depth interleaved RGBA in 16-bit containers
    Rgba64,
}

/// Color primaries code point (ITU-T H.273)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPrimaries(pub u8);

impl ColorPrimaries {
    pub const BT709: Self = Self(1);
    pub const UNKNOWN: Self = Self(2);
    pub const BT470M: Self = Self(4);
    pub const BT470BG: Self = Self(5);
    pub const BT601: Self = Self(6);
    pub const SMPTE240: Self = Self(7);
    pub const FILM: Self = Self(8);
    pub const BT2020: Self = Self(9);
    pub const XYZ: Self = Self(10);
    pub const SMPTE431: Self = Self(11);
    pub const SMPTE432: Self = Self(12);
    pub const EBU3213: Self = Self(22);
}

/// Transfer characteristics code point (ITU-T H.273)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferCharacteristics(pub u8);

impl TransferCharacteristics {
    pub const BT709: Self = Self(1);
    pub const UNKNOWN: Self = Self(2);
    pub const BT470M: Self = Self(4);
    pub const BT470BG: Self = Self(5);
    pub const BT601: Self = Self(6);
    pub const SMPTE240: Self = Self(7);
    pub const LINEAR: Self = Self(8);
    pub const LOG100: Self = Self(9);
    pub const LOG100_SQRT10: Self = Self(10);
    pub const IEC61966: Self = Self(11);
    pub const BT1361: Self = Self(12);
    pub const SRGB: Self = Self(13);
    pub const BT2020_10BIT: Self = Self(14);
    pub const BT2020_12BIT: Self = Self(15);
    pub const SMPTE2084: Self = Self(16);
    pub const SMPTE428: Self = Self(17);
    pub const HLG: Self = Self(18);
}

/// Matrix coefficients code point (ITU-T H.273)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatrixCoefficients(pub u8);

impl MatrixCoefficients {
    pub const IDENTITY: Self = Self(0);
    pub const BT709: Self = Self(1);
    pub const UNKNOWN: Self = Self(2);
    pub const FCC: Self = Self(4);
    pub const BT470BG: Self = Self(5);
    pub const BT601: Self = Self(6);
    pub const SMPTE240: Self = Self(7);
    pub const YCGCO: Self = Self(8);
    pub const BT2020_NCL: Self = Self(9);
    pub const BT2020_CL: Self = Self(10);
    pub const SMPTE2085: Self = Self(11);
    pub const CHROMAT_NCL: Self = Self(12);
    pub const CHROMAT_CL: Self = Self(13);
    pub const ICTCP: Self = Self(14);
}

/// CICP color description attached to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CicpColorData {
    /// Color primaries
    pub color_primaries: ColorPrimaries,
    /// Transfer characteristics
    pub transfer_characteristics: TransferCharacteristics,
    /// Matrix coefficients
    pub matrix_coefficients: MatrixCoefficients,
    /// Whether samples span the full container range
    pub full_range: bool,
}

/// HDR encoding of an image's samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HdrFormat {
    /// Standard dynamic range
    #[default]
    None,
    /// Perceptual Quantizer (SMPTE ST 2084) on BT.2020 primaries
    Pq,
}

impl HdrFormat {
    /// Derive the HDR format from CICP color data.
    ///
    /// PQ requires BT.2020 primaries with the SMPTE ST 2084 transfer; any other
    /// combination is treated as standard dynamic range.
    pub fn from_cicp(cicp: Option<&CicpColorData>) -> Self {
        match cicp {
            Some(c)
                if c.color_primaries == ColorPrimaries::BT2020
                    && c.transfer_characteristics == TransferCharacteristics::SMPTE2084 =>
            {
                HdrFormat::Pq
            }
            _ => HdrFormat::None,
        }
    }
}

/// Static description of a decoded image
#[derive(Debug, Clone)]
pub struct ImageDescriptor {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Bit depth of the samples (8, 10, 12, or 16)
    pub bit_depth: u8,
    /// Color space of the stored planes
    pub color_space: HeifColorSpace,
    /// Planar or interleaved channel storage
    pub chroma: ChromaLayout,
    /// Whether an alpha channel is present
    pub has_alpha: bool,
    /// Whether alpha is premultiplied into the color channels
    pub premultiplied_alpha: bool,
    /// CICP color description, if the file carried one
    pub cicp: Option<CicpColorData>,
    /// Raw ICC profile bytes, passed through opaquely
    pub icc_profile: Option<Vec<u8>>,
}

impl Default for ImageDescriptor {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            bit_depth: 8,
            color_space: HeifColorSpace::Rgb,
            chroma: ChromaLayout::Interleaved,
            has_alpha: false,
            premultiplied_alpha: false,
            cicp: None,
            icc_profile: None,
        }
    }
}

/// A read-only, bounds-checked view of one sample plane
///
/// `stride` is in samples, not bytes. Rows are served as plain slices; no raw
/// addresses cross this boundary.
#[derive(Debug, Clone, Copy)]
pub struct PlaneView<'a, T> {
    data: &'a [T],
    stride: usize,
    row_len: usize,
    height: usize,
}

impl<'a, T> PlaneView<'a, T> {
    /// Samples per row (pixel width, times the channel count for interleaved planes)
    pub fn samples_per_row(&self) -> usize {
        self.row_len
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// One row of samples
    ///
    /// # Panics
    /// Panics if `y >= height`.
    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row {y} out of range");
        &self.data[y * self.stride..][..self.row_len]
    }

    /// Iterator over all rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).map(|y| self.row(y))
    }
}

#[derive(Debug, Clone)]
enum PlaneStore {
    U8 { data: Vec<u8>, stride: usize },
    U16 { data: Vec<u16>, stride: usize },
}

/// A decoded HEIF image: descriptor plus sample planes
///
/// Produced by the native decoder collaborator. Immutable once populated; the
/// conversion pipeline only reads it. The HDR format is derived from the CICP
/// data at construction so later stages never re-parse color metadata.
#[derive(Debug)]
pub struct DecodedImage {
    desc: ImageDescriptor,
    hdr_format: HdrFormat,
    planes: [Option<PlaneStore>; CHANNEL_COUNT],
}

const CHANNEL_COUNT: usize = 8;

fn channel_index(channel: HeifChannel) -> usize {
    match channel {
        HeifChannel::Y => 0,
        HeifChannel::Cb => 1,
        HeifChannel::Cr => 2,
        HeifChannel::R => 3,
        HeifChannel::G => 4,
        HeifChannel::B => 5,
        HeifChannel::Alpha => 6,
        HeifChannel::Interleaved => 7,
    }
}

impl DecodedImage {
    /// Create an image from its descriptor, with no planes attached yet
    ///
    /// Validates dimensions and bit depth; an unsupported bit depth is rejected
    /// here, at open time, not discovered mid-decode.
    pub fn new(desc: ImageDescriptor) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 {
            return Err(at(Error::InvalidDimensions(desc.width, desc.height)));
        }
        if !matches!(desc.bit_depth, 8 | 10 | 12 | 16) {
            return Err(at(Error::UnsupportedBitDepth(desc.bit_depth)));
        }

        let hdr_format = HdrFormat::from_cicp(desc.cicp.as_ref());

        Ok(Self {
            desc,
            hdr_format,
            planes: [None, None, None, None, None, None, None, None],
        })
    }

    /// The image descriptor
    pub fn descriptor(&self) -> &ImageDescriptor {
        &self.desc
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.desc.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.desc.height
    }

    /// Sample bit depth (8, 10, 12, or 16)
    pub fn bit_depth(&self) -> u8 {
        self.desc.bit_depth
    }

    /// Color space of the stored planes
    pub fn color_space(&self) -> HeifColorSpace {
        self.desc.color_space
    }

    /// Planar or interleaved storage
    pub fn chroma(&self) -> ChromaLayout {
        self.desc.chroma
    }

    /// Whether an alpha channel is present
    pub fn has_alpha(&self) -> bool {
        self.desc.has_alpha
    }

    /// Whether alpha is premultiplied
    pub fn premultiplied_alpha(&self) -> bool {
        self.desc.premultiplied_alpha
    }

    /// HDR format derived from the CICP data at construction
    pub fn hdr_format(&self) -> HdrFormat {
        self.hdr_format
    }

    /// CICP color description, if present
    pub fn cicp(&self) -> Option<&CicpColorData> {
        self.desc.cicp.as_ref()
    }

    /// Raw ICC profile bytes, if present
    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.desc.icc_profile.as_deref()
    }

    fn expected_row_samples(&self, channel: HeifChannel) -> usize {
        let width = self.desc.width as usize;
        match channel {
            HeifChannel::Interleaved => {
                let channels = if self.desc.has_alpha { 4 } else { 3 };
                width * channels
            }
            _ => width,
        }
    }

    fn validate_plane(&self, channel: HeifChannel, len: usize, stride: usize) -> Result<()> {
        let row_len = self.expected_row_samples(channel);
        let height = self.desc.height as usize;
        if stride < row_len {
            return Err(at(Error::PlaneMismatch("stride shorter than row")));
        }
        let needed = stride * (height - 1) + row_len;
        if len < needed {
            return Err(at(Error::BufferTooSmall {
                needed,
                actual: len,
            }));
        }
        Ok(())
    }

    /// Attach an 8-bit plane. `stride` is in samples.
    pub fn set_plane8(&mut self, channel: HeifChannel, data: Vec<u8>, stride: usize) -> Result<()> {
        self.validate_plane(channel, data.len(), stride)?;
        self.planes[channel_index(channel)] = Some(PlaneStore::U8 { data, stride });
        Ok(())
    }

    /// Attach a 16-bit-container plane. `stride` is in samples.
    pub fn set_plane16(
        &mut self,
        channel: HeifChannel,
        data: Vec<u16>,
        stride: usize,
    ) -> Result<()> {
        self.validate_plane(channel, data.len(), stride)?;
        self.planes[channel_index(channel)] = Some(PlaneStore::U16 { data, stride });
        Ok(())
    }

    /// Get a read-only view of an 8-bit plane.
    ///
    /// Fails with `ChannelNotFound` if the channel does not exist for this
    /// image, and `PlaneMismatch` if the plane holds 16-bit containers. Callers
    /// are expected to have branched on color model and bit depth already.
    pub fn plane8(&self, channel: HeifChannel) -> Result<PlaneView<'_, u8>> {
        match &self.planes[channel_index(channel)] {
            Some(PlaneStore::U8 { data, stride }) => Ok(PlaneView {
                data,
                stride: *stride,
                row_len: self.expected_row_samples(channel),
                height: self.desc.height as usize,
            }),
            Some(PlaneStore::U16 { .. }) => {
                Err(at(Error::PlaneMismatch("expected 8-bit samples")))
            }
            None => Err(at(Error::ChannelNotFound(channel))),
        }
    }

    /// Get a read-only view of a 16-bit-container plane.
    ///
    /// Same contract as [`plane8`](Self::plane8), with the sample widths swapped.
    pub fn plane16(&self, channel: HeifChannel) -> Result<PlaneView<'_, u16>> {
        match &self.planes[channel_index(channel)] {
            Some(PlaneStore::U16 { data, stride }) => Ok(PlaneView {
                data,
                stride: *stride,
                row_len: self.expected_row_samples(channel),
                height: self.desc.height as usize,
            }),
            Some(PlaneStore::U8 { .. }) => {
                Err(at(Error::PlaneMismatch("expected 16-bit samples")))
            }
            None => Err(at(Error::ChannelNotFound(channel))),
        }
    }
}

/// Handle to a not-yet-converted image inside the native decoder
///
/// This is the collaborator boundary: the native decoder owns the bitstream and
/// can materialize the image in its native layout or re-decode it as
/// interleaved RGB (used for YCbCr sources).
pub trait ImageHandle {
    /// Bit depth the image was coded at
    fn bit_depth(&self) -> u8;

    /// Whether the image carries an alpha channel
    fn has_alpha(&self) -> bool;

    /// Decode in the image's native color space and layout
    fn decode_native(&self) -> Result<DecodedImage>;

    /// Decode as interleaved RGB in the requested format
    fn decode_rgb(&self, format: RgbDecodeFormat) -> Result<DecodedImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_desc(width: u32, height: u32, bit_depth: u8) -> ImageDescriptor {
        ImageDescriptor {
            width,
            height,
            bit_depth,
            color_space: HeifColorSpace::Rgb,
            chroma: ChromaLayout::Planar,
            ..Default::default()
        }
    }

    #[test]
    fn rejects_zero_dimensions() {
        let err = DecodedImage::new(rgb_desc(0, 4, 8)).unwrap_err();
        assert!(
            err.to_string().contains("invalid image dimensions"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn rejects_unsupported_bit_depth() {
        for depth in [0u8, 1, 9, 14, 24] {
            let err = DecodedImage::new(rgb_desc(4, 4, depth)).unwrap_err();
            assert!(
                err.to_string().contains("bit depth"),
                "unexpected error for depth {depth}: {err}"
            );
        }
    }

    #[test]
    fn missing_channel_fails_loudly() {
        let image = DecodedImage::new(rgb_desc(4, 4, 8)).unwrap();
        let err = image.plane8(HeifChannel::R).unwrap_err();
        assert!(
            err.to_string().contains("not present"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn sample_width_mismatch_fails_loudly() {
        let mut image = DecodedImage::new(rgb_desc(2, 2, 10)).unwrap();
        image
            .set_plane16(HeifChannel::R, vec![0u16; 4], 2)
            .unwrap();
        let err = image.plane8(HeifChannel::R).unwrap_err();
        assert!(
            err.to_string().contains("mismatch"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn plane_views_respect_stride() {
        let mut image = DecodedImage::new(rgb_desc(2, 2, 8)).unwrap();
        // 2 samples per row, stride 3: one padding sample at the end of each row
        image
            .set_plane8(HeifChannel::R, vec![1, 2, 99, 3, 4], 3)
            .unwrap();
        let plane = image.plane8(HeifChannel::R).unwrap();
        assert_eq!(plane.row(0), &[1, 2]);
        assert_eq!(plane.row(1), &[3, 4]);
    }

    #[test]
    fn short_plane_is_rejected() {
        let mut image = DecodedImage::new(rgb_desc(4, 4, 8)).unwrap();
        let err = image
            .set_plane8(HeifChannel::R, vec![0u8; 7], 4)
            .unwrap_err();
        assert!(
            err.to_string().contains("too small"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn hdr_format_is_derived_eagerly() {
        let pq = CicpColorData {
            color_primaries: ColorPrimaries::BT2020,
            transfer_characteristics: TransferCharacteristics::SMPTE2084,
            matrix_coefficients: MatrixCoefficients::IDENTITY,
            full_range: true,
        };
        let desc = ImageDescriptor {
            cicp: Some(pq),
            ..rgb_desc(4, 4, 10)
        };
        assert_eq!(DecodedImage::new(desc).unwrap().hdr_format(), HdrFormat::Pq);

        // HLG is not PQ: treated as SDR
        let hlg = CicpColorData {
            transfer_characteristics: TransferCharacteristics::HLG,
            ..pq
        };
        let desc = ImageDescriptor {
            cicp: Some(hlg),
            ..rgb_desc(4, 4, 10)
        };
        assert_eq!(
            DecodedImage::new(desc).unwrap().hdr_format(),
            HdrFormat::None
        );
    }
}
