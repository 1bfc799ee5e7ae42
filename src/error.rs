//! Error types for zenheif-convert

use crate::image::HeifChannel;

/// Error type for surface conversion operations
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Bit depth outside {8, 10, 12, 16}; rejected at image-open time
    #[error("unsupported HEIF image bit depth: {0}")]
    UnsupportedBitDepth(u8),

    /// A channel required by the declared color model is missing
    #[error("channel {0:?} is not present in this image")]
    ChannelNotFound(HeifChannel),

    /// YCbCr plane data reached the pixel pipeline without an RGB re-decode
    #[error("YCbCr sample planes must be re-decoded as RGB by the native decoder")]
    YCbCrNotConverted,

    /// A plane's shape disagrees with the declared layout
    #[error("plane layout mismatch: {0}")]
    PlaneMismatch(&'static str),

    /// Image dimensions are zero or otherwise invalid
    #[error("invalid image dimensions: {0}x{1}")]
    InvalidDimensions(u32, u32),

    /// The output surface does not match the image dimensions
    #[error("surface size mismatch: image {image_width}x{image_height}, surface {surface_width}x{surface_height}")]
    SurfaceSizeMismatch {
        /// Image width
        image_width: u32,
        /// Image height
        image_height: u32,
        /// Surface width
        surface_width: u32,
        /// Surface height
        surface_height: u32,
    },

    /// A destination buffer is too small for the requested view
    #[error("buffer too small: need {needed} elements, got {actual}")]
    BufferTooSmall {
        /// Required element count
        needed: usize,
        /// Provided element count
        actual: usize,
    },

    /// The color-management collaborator could not build or run a transform
    #[error("color transform failed: {0}")]
    ColorTransform(String),
}

/// Result type for zenheif-convert operations with location tracking
pub type Result<T, E = whereat::At<Error>> = core::result::Result<T, E>;
