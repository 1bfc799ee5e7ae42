//! PQ display mapping scenarios

use zenheif_convert::{
    ChromaLayout, CicpColorData, ColorPrimaries, ConvertConfig, DecodedImage, DisplayColorSpace,
    HdrFormat, HeifChannel, HeifColorSpace, ImageDescriptor, MatrixCoefficients, Surface,
    TransferCharacteristics, convert, convert_with,
};

fn pq_cicp() -> CicpColorData {
    CicpColorData {
        color_primaries: ColorPrimaries::BT2020,
        transfer_characteristics: TransferCharacteristics::SMPTE2084,
        matrix_coefficients: MatrixCoefficients::IDENTITY,
        full_range: true,
    }
}

fn pq_planar_rgb(
    width: u32,
    height: u32,
    has_alpha: bool,
    premultiplied: bool,
) -> DecodedImage {
    let desc = ImageDescriptor {
        width,
        height,
        bit_depth: 10,
        color_space: HeifColorSpace::Rgb,
        chroma: ChromaLayout::Planar,
        has_alpha,
        premultiplied_alpha: premultiplied,
        cicp: Some(pq_cicp()),
        ..Default::default()
    };
    DecodedImage::new(desc).unwrap()
}

#[test]
fn pq_tag_is_detected_from_cicp() {
    let image = pq_planar_rgb(1, 1, false, false);
    assert_eq!(image.hdr_format(), HdrFormat::Pq);
}

#[test]
fn pq_black_maps_to_black() {
    let mut image = pq_planar_rgb(2, 1, false, false);
    for channel in [HeifChannel::R, HeifChannel::G, HeifChannel::B] {
        image.set_plane16(channel, vec![0, 0], 2).unwrap();
    }

    let mut surface = Surface::new(2, 1).unwrap();
    convert(&image, &mut surface.view_mut()).unwrap();

    let px = surface.pixel(0, 0);
    assert!(px.r <= 1 && px.g <= 1 && px.b <= 1, "got {px:?}");
    assert_eq!(px.a, 255);
}

#[test]
fn pq_gray_ramp_is_monotonic_after_display_mapping() {
    // Four gray pixels with increasing PQ signal
    let signals = [0u16, 300, 700, 1023];
    let mut image = pq_planar_rgb(4, 1, false, false);
    for channel in [HeifChannel::R, HeifChannel::G, HeifChannel::B] {
        image.set_plane16(channel, signals.to_vec(), 4).unwrap();
    }

    let mut surface = Surface::new(4, 1).unwrap();
    convert(&image, &mut surface.view_mut()).unwrap();

    let values: Vec<u8> = (0..4).map(|x| surface.pixel(x, 0).g).collect();
    for pair in values.windows(2) {
        assert!(pair[0] <= pair[1], "not monotonic: {values:?}");
    }
    assert!(
        values[3] > values[0],
        "peak PQ signal should be brighter than black: {values:?}"
    );
}

#[test]
fn pq_alpha_passes_through_straight() {
    let mut image = pq_planar_rgb(2, 1, true, false);
    for channel in [HeifChannel::R, HeifChannel::G, HeifChannel::B] {
        image.set_plane16(channel, vec![512, 512], 2).unwrap();
    }
    image
        .set_plane16(HeifChannel::Alpha, vec![0, 1023], 2)
        .unwrap();

    let mut surface = Surface::new(2, 1).unwrap();
    convert(&image, &mut surface.view_mut()).unwrap();

    assert_eq!(surface.pixel(0, 0).a, 0);
    assert_eq!(surface.pixel(1, 0).a, 255);
}

#[test]
fn premultiplied_pq_matches_straight_pq() {
    // Straight color 0.5 at alpha 0.5, once stored premultiplied (0.25) and
    // once straight; the unpremultiply step runs before the display transform,
    // so both must land on the same display pixel.
    let straight = {
        let mut image = pq_planar_rgb(1, 1, true, false);
        for channel in [HeifChannel::R, HeifChannel::G, HeifChannel::B] {
            image.set_plane16(channel, vec![512], 1).unwrap();
        }
        image.set_plane16(HeifChannel::Alpha, vec![512], 1).unwrap();
        image
    };

    let premultiplied = {
        let mut image = pq_planar_rgb(1, 1, true, true);
        for channel in [HeifChannel::R, HeifChannel::G, HeifChannel::B] {
            image.set_plane16(channel, vec![256], 1).unwrap();
        }
        image.set_plane16(HeifChannel::Alpha, vec![512], 1).unwrap();
        image
    };

    let mut straight_out = Surface::new(1, 1).unwrap();
    convert(&straight, &mut straight_out.view_mut()).unwrap();
    let mut premultiplied_out = Surface::new(1, 1).unwrap();
    convert(&premultiplied, &mut premultiplied_out.view_mut()).unwrap();

    let a = straight_out.pixel(0, 0);
    let b = premultiplied_out.pixel(0, 0);
    // 256/512 is exactly 0.5 while 512/1023 is 0.50049, so allow a small gap
    for (lhs, rhs) in [(a.r, b.r), (a.g, b.g), (a.b, b.b)] {
        assert!((lhs as i32 - rhs as i32).abs() <= 2, "{a:?} vs {b:?}");
    }
    assert_eq!(a.a, b.a);
}

#[test]
fn hdr_target_is_configurable() {
    let mut image = pq_planar_rgb(1, 1, false, false);
    for channel in [HeifChannel::R, HeifChannel::G, HeifChannel::B] {
        image.set_plane16(channel, vec![600], 1).unwrap();
    }

    for target in [DisplayColorSpace::DisplayP3, DisplayColorSpace::Srgb] {
        let config = ConvertConfig::new().hdr_target(target);
        let mut surface = Surface::new(1, 1).unwrap();
        convert_with(&image, &config, &mut surface.view_mut()).unwrap();
        let px = surface.pixel(0, 0);
        assert_eq!(px.a, 255);
        assert!(px.g > 0, "mid PQ signal should not be black for {target:?}");
    }
}

#[test]
fn pq_monochrome_goes_through_the_float_path() {
    let desc = ImageDescriptor {
        width: 2,
        height: 1,
        bit_depth: 10,
        color_space: HeifColorSpace::Monochrome,
        chroma: ChromaLayout::Planar,
        cicp: Some(pq_cicp()),
        ..Default::default()
    };
    let mut image = DecodedImage::new(desc).unwrap();
    image.set_plane16(HeifChannel::Y, vec![0, 800], 2).unwrap();

    let mut surface = Surface::new(2, 1).unwrap();
    convert(&image, &mut surface.view_mut()).unwrap();

    let black = surface.pixel(0, 0);
    let bright = surface.pixel(1, 0);
    assert!(black.g <= 1);
    assert!(bright.g > black.g);
    // gray input stays gray through the display transform
    assert!(
        (bright.r as i32 - bright.g as i32).abs() <= 2
            && (bright.b as i32 - bright.g as i32).abs() <= 2,
        "got {bright:?}"
    );
}
