use std::path::PathBuf;

use super::*;

#[test]
fn format_from_extension_is_case_insensitive() {
    assert_eq!(OutputFormat::from_extension("PNG").unwrap(), OutputFormat::Png);
    assert_eq!(OutputFormat::from_extension("jpg").unwrap(), OutputFormat::Jpeg);
    assert_eq!(OutputFormat::from_extension("JpEg").unwrap(), OutputFormat::Jpeg);
}

#[test]
fn unknown_extension_is_unsupported() {
    for ext in ["gif", "webp", "bmp", ""] {
        assert!(matches!(
            OutputFormat::from_extension(ext),
            Err(CardError::UnsupportedFormat(_))
        ));
    }
    assert!(matches!(
        OutputFormat::from_path(&PathBuf::from("out/card")),
        Err(CardError::UnsupportedFormat(_))
    ));
    assert_eq!(
        OutputFormat::from_path(&PathBuf::from("out/card.Png")).unwrap(),
        OutputFormat::Png
    );
}

#[test]
fn png_keeps_alpha() {
    let premul = vec![64u8, 0, 0, 128, 0, 0, 0, 0];
    let bytes = encode_premul_rgba8(&premul, 2, 1, OutputFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [128, 0, 0, 128]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 0]);
}

#[test]
fn jpeg_is_opaque_rgb() {
    let premul = [255u8, 255, 255, 255].repeat(16 * 16);
    let bytes = encode_premul_rgba8(&premul, 16, 16, OutputFormat::Jpeg).unwrap();
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 16));
    assert!(!decoded.color().has_alpha());
    let px = decoded.to_rgb8().get_pixel(8, 8).0;
    assert!(px.iter().all(|&c| c >= 250));
}

#[test]
fn canonical_extension_maps_back_to_format() {
    for format in [OutputFormat::Png, OutputFormat::Jpeg] {
        assert_eq!(OutputFormat::from_extension(format.extension()).unwrap(), format);
    }
    assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
}
