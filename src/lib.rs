//! # zenheif-convert
//!
//! Converts decoded HEIF sample planes into one canonical packed BGRA32
//! surface, handling the full cross-product of bit depth (8/10/12/16), color
//! model (monochrome, planar/interleaved RGB, YCbCr-derived RGB), alpha mode
//! (none, straight, premultiplied), and dynamic range (SDR, PQ HDR).
//!
//! The native bitstream decoder sits on the other side of [`DecodedImage`] /
//! [`ImageHandle`]: it materializes sample planes, this crate turns them into
//! display pixels. Color management goes through moxcms; the only transform
//! wired here is the fixed PQ → display-space mapping for HDR content.
//!
//! ## Quick Start
//!
//! ```no_run
//! use zenheif_convert::{convert, DecodedImage, Surface};
//!
//! # fn decoded_image_from_somewhere() -> DecodedImage { unimplemented!() }
//! let image = decoded_image_from_somewhere();
//! let mut surface = Surface::new(image.width(), image.height()).unwrap();
//! convert(&image, &mut surface.view_mut()).unwrap();
//! ```
//!
//! ## Configuration
//!
//! HDR content is mapped into Display P3 by default; use [`ConvertConfig`] to
//! target sRGB instead:
//!
//! ```no_run
//! use zenheif_convert::{convert_with, ConvertConfig, DisplayColorSpace};
//! # use zenheif_convert::{DecodedImage, Surface};
//!
//! let config = ConvertConfig::new().hdr_target(DisplayColorSpace::Srgb);
//! # fn decoded_image_from_somewhere() -> DecodedImage { unimplemented!() }
//! # let image = decoded_image_from_somewhere();
//! # let mut surface = Surface::new(image.width(), image.height()).unwrap();
//! convert_with(&image, &config, &mut surface.view_mut()).unwrap();
//! ```

mod alpha;
mod color;
mod config;
mod dispatch;
mod display;
mod error;
mod expand;
mod image;
mod intermediate;
mod mono_decoder;
mod rgb_decoder;
mod surface;
mod ycbcr;

pub use alpha::{
    unpremultiply, unpremultiply_bgra8_row, unpremultiply_rgba16_row, unpremultiply_rgba_f32_row,
};
pub use color::{
    DisplayColorSpace, document_profile, profile_from_cicp, profile_from_icc,
};
pub use config::ConvertConfig;
pub use display::{hdr_to_bgra32, sdr_to_bgra32};
pub use error::{Error, Result};
pub use expand::{HdrExpansionTable, SdrExpansionTable};
pub use image::{
    ChromaLayout, CicpColorData, ColorPrimaries, DecodedImage, HdrFormat, HeifChannel,
    HeifColorSpace, ImageDescriptor, ImageHandle, MatrixCoefficients, PlaneView, RgbDecodeFormat,
    TransferCharacteristics,
};
pub use intermediate::Intermediate;
pub use surface::{Bgra8, Surface, SurfaceMut};

use whereat::at;

/// Convert a decoded image into a BGRA32 surface with default settings
///
/// The surface must match the image dimensions. See [`convert_with`] for
/// HDR target selection.
pub fn convert(image: &DecodedImage, surface: &mut SurfaceMut<'_>) -> Result<()> {
    convert_with(image, &ConvertConfig::default(), surface)
}

/// Convert a decoded image into a BGRA32 surface
///
/// The image must hold RGB or monochrome planes; YCbCr sources go through
/// [`convert_from_handle`] so the native decoder can produce RGB first.
pub fn convert_with(
    image: &DecodedImage,
    config: &ConvertConfig,
    surface: &mut SurfaceMut<'_>,
) -> Result<()> {
    match image.color_space() {
        HeifColorSpace::Rgb | HeifColorSpace::Monochrome => {
            dispatch::decode_to_surface(image, config, surface)
        }
        HeifColorSpace::YCbCr => Err(at(Error::YCbCrNotConverted)),
    }
}

/// Decode through a native-decoder handle and convert into a BGRA32 surface
///
/// Dispatches on the image's native color space; YCbCr images are re-decoded
/// as interleaved RGB by the handle before conversion.
pub fn convert_from_handle<H: ImageHandle + ?Sized>(
    handle: &H,
    config: &ConvertConfig,
    surface: &mut SurfaceMut<'_>,
) -> Result<()> {
    let image = handle.decode_native()?;
    match image.color_space() {
        HeifColorSpace::YCbCr => ycbcr::decode_as_rgb(handle, config, surface),
        HeifColorSpace::Rgb | HeifColorSpace::Monochrome => {
            dispatch::decode_to_surface(&image, config, surface)
        }
    }
}
