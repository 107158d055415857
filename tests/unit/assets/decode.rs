use std::io::Cursor;

use super::*;

fn encode_png(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let prepared = decode_image(&encode_png(image::DynamicImage::ImageRgba8(img))).unwrap();
    assert_eq!(prepared.canvas(), Canvas { width: 1, height: 1 });
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn rgb_source_gets_opaque_alpha() {
    let img = image::RgbImage::from_raw(2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap();
    let prepared = decode_image(&encode_png(image::DynamicImage::ImageRgb8(img))).unwrap();
    assert_eq!(prepared.rgba8_premul, vec![1, 2, 3, 255, 4, 5, 6, 255]);
}

#[test]
fn garbage_bytes_fail() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn empty_image_is_rejected() {
    let img = image::RgbaImage::new(0, 0);
    assert!(PreparedImage::from_rgba_image(img).is_err());
}
