//! Color-management collaborator wiring
//!
//! Builds moxcms profiles for the two supported display targets, the PQ
//! source description, and the image's own color metadata (CICP codes or
//! opaque ICC bytes). No color math lives here; the profiles are handed to
//! moxcms device transforms.

use crate::image::{CicpColorData, ColorPrimaries, DecodedImage, HdrFormat, TransferCharacteristics};
use moxcms::{CicpColorPrimaries, CicpProfile, ColorProfile};

/// Display color spaces the pipeline can produce output for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayColorSpace {
    /// Standard sRGB
    Srgb,
    /// Display P3: SMPTE EG 432-1 primaries with the sRGB transfer curve.
    /// The wide-gamut target used for HDR content.
    #[default]
    DisplayP3,
}

fn cicp_profile(
    primaries: CicpColorPrimaries,
    transfer: moxcms::TransferCharacteristics,
) -> ColorProfile {
    let mut profile = ColorProfile::new_srgb();
    profile.update_rgb_colorimetry_from_cicp(CicpProfile {
        color_primaries: primaries,
        transfer_characteristics: transfer,
        matrix_coefficients: moxcms::MatrixCoefficients::Identity,
        full_range: true,
    });
    profile
}

/// Profile for a display target
pub(crate) fn display_profile(space: DisplayColorSpace) -> ColorProfile {
    match space {
        DisplayColorSpace::Srgb => ColorProfile::new_srgb(),
        DisplayColorSpace::DisplayP3 => cicp_profile(
            CicpColorPrimaries::Smpte432,
            moxcms::TransferCharacteristics::Srgb,
        ),
    }
}

/// Source profile for PQ-encoded pixels: BT.2020 primaries, SMPTE ST 2084 transfer
pub(crate) fn pq_source_profile() -> ColorProfile {
    cicp_profile(
        CicpColorPrimaries::Bt2020,
        moxcms::TransferCharacteristics::Smpte2084,
    )
}

/// Map CICP color data to a known display profile, if one matches
///
/// Only the combinations the host can represent are mapped; everything else
/// returns `None` and the image is treated as untagged.
pub fn profile_from_cicp(color_data: &CicpColorData) -> Option<ColorProfile> {
    match color_data.color_primaries {
        ColorPrimaries::BT709 => match color_data.transfer_characteristics {
            TransferCharacteristics::LINEAR => Some(cicp_profile(
                CicpColorPrimaries::Bt709,
                moxcms::TransferCharacteristics::Linear,
            )),
            TransferCharacteristics::SRGB => Some(ColorProfile::new_srgb()),
            _ => None,
        },
        // Display P3 is SMPTE EG 432-1 primaries with the sRGB transfer curve.
        ColorPrimaries::SMPTE432 => {
            if color_data.transfer_characteristics == TransferCharacteristics::SRGB {
                Some(display_profile(DisplayColorSpace::DisplayP3))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Parse an ICC profile, ignoring malformed data
pub fn profile_from_icc(profile_bytes: &[u8]) -> Option<ColorProfile> {
    ColorProfile::new_from_slice(profile_bytes).ok()
}

/// The color context the host should attach to the loaded document
///
/// HDR images are delivered in the wide-gamut display space, so that wins over
/// any embedded profile; otherwise ICC bytes take priority over CICP codes.
pub fn document_profile(image: &DecodedImage) -> Option<ColorProfile> {
    if image.hdr_format() != HdrFormat::None {
        return Some(display_profile(DisplayColorSpace::DisplayP3));
    }
    if let Some(icc) = image.icc_profile() {
        if let Some(profile) = profile_from_icc(icc) {
            return Some(profile);
        }
    }
    image.cicp().and_then(profile_from_cicp)
}
