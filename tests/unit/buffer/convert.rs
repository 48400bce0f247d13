use std::io::Cursor;

use super::*;
use crate::buffer::pixel::Precision;
use crate::foundation::core::{Domain, Int2};

fn png_bytes(img: image::DynamicImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_color_png_dimensions_and_values() {
    let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 0]).unwrap();
    let buf = decode_color(&png_bytes(image::DynamicImage::ImageRgba8(img))).unwrap();
    assert_eq!(buf.domain(), Domain::new(2, 1));
    assert!(!buf.is_single_value());
    assert_eq!(buf.load_color(Int2::new(0, 0)), [1.0, 0.0, 0.0, 1.0]);
    assert_eq!(buf.load_color(Int2::new(1, 0)), [0.0, 0.0, 1.0, 0.0]);
}

#[test]
fn decode_alpha_uses_luma() {
    let img = image::GrayImage::from_raw(1, 2, vec![0, 255]).unwrap();
    let buf = decode_alpha(&png_bytes(image::DynamicImage::ImageLuma8(img))).unwrap();
    assert_eq!(buf.load_float(Int2::new(0, 0)), 0.0);
    assert_eq!(buf.load_float(Int2::new(0, 1)), 1.0);
}

#[test]
fn decode_garbage_fails() {
    assert!(decode_color(b"not an image").is_err());
}

#[test]
fn to_rgba8_clamps_and_rounds() {
    let mut out = OutputBuffer::new(Domain::new(2, 1), Precision::Full, false);
    out.pixels_mut()
        .copy_from_slice(&[[2.0, -1.0, 0.5, 1.0], [f32::NAN, 0.0, 0.0, 0.0]]);
    let img = to_rgba8_image(&out);
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 128, 255]);
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 0]);
}
