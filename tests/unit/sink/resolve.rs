use super::*;
use crate::buffer::pixel::PixelBuffer;
use crate::foundation::core::CompositingRegion;

fn image(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::color(w, h, vec![[0.5; 4]; (w * h) as usize]).unwrap()
}

fn alpha(w: u32, h: u32) -> PixelBuffer {
    PixelBuffer::float(w, h, vec![0.5; (w * h) as usize]).unwrap()
}

fn region() -> CompositingRegion {
    CompositingRegion::new(10, 20, 74, 68)
}

#[test]
fn composite_output_forces_region_size() {
    let img = image(5, 7);
    let a = PixelBuffer::default_alpha();
    let config = SinkConfig::default().with_composite_region(region());
    let domain = resolve_domain(&SinkInputs::new(&img, &a), &config);
    assert_eq!(domain, Domain::new(64, 48));
}

#[test]
fn natural_domain_comes_from_image() {
    let img = image(5, 7);
    let a = alpha(2, 2);
    let config = SinkConfig::default().with_fallback_region(region());
    let domain = resolve_domain(&SinkInputs::new(&img, &a), &config);
    assert_eq!(domain, Domain::new(5, 7));
}

#[test]
fn single_image_uses_alpha_domain() {
    let img = PixelBuffer::single_color([1.0; 4]);
    let a = alpha(3, 9);
    let domain = resolve_domain(&SinkInputs::new(&img, &a), &SinkConfig::default());
    assert_eq!(domain, Domain::new(3, 9));
}

#[test]
fn single_value_domain_falls_back_to_region() {
    let img = PixelBuffer::single_color([1.0, 0.0, 0.0, 1.0]);
    let a = PixelBuffer::default_alpha();
    let config = SinkConfig::default().with_fallback_region(region());
    let domain = resolve_domain(&SinkInputs::new(&img, &a), &config);
    assert_eq!(domain, Domain::new(64, 48));
}

#[test]
fn one_by_one_image_also_falls_back() {
    let img = image(1, 1);
    let a = PixelBuffer::default_alpha();
    let config = SinkConfig::default().with_fallback_region(region());
    let domain = resolve_domain(&SinkInputs::new(&img, &a), &config);
    assert_eq!(domain, Domain::new(64, 48));
}

#[test]
fn bounds_cover_whole_domain_by_default() {
    let b = resolve_bounds(Domain::new(5, 7), &SinkConfig::default());
    assert_eq!(b, Bounds::new(Int2::ZERO, Int2::new(5, 7)));
}

#[test]
fn composite_bounds_are_region_translated() {
    let config = SinkConfig::default().with_composite_region(region());
    let b = resolve_bounds(Domain::new(64, 48), &config);
    assert_eq!(b, Bounds::new(Int2::new(10, 20), Int2::new(74, 68)));
}
