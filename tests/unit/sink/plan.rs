use super::*;
use crate::foundation::core::{CompositingRegion, Int2};

#[test]
fn clear_plan_carries_fill_and_tags() {
    let img = PixelBuffer::single_color([1.0, 0.0, 0.0, 1.0])
        .with_precision(Precision::Half)
        .with_non_color_data(true);
    let a = PixelBuffer::single_float(0.5);
    let config = SinkConfig::default()
        .with_alpha_linked(true)
        .with_fallback_region(CompositingRegion::new(0, 0, 4, 4));
    let plan = compile_plan(&SinkInputs::new(&img, &a), &config);
    assert_eq!(plan.strategy, Strategy::Clear);
    assert_eq!(plan.domain, Domain::new(4, 4));
    assert_eq!(plan.bounds, Bounds::new(Int2::ZERO, Int2::new(4, 4)));
    assert_eq!(plan.fill, [1.0, 0.0, 0.0, 0.5]);
    assert_eq!(plan.precision, Precision::Half);
    assert!(plan.non_color);
}

#[test]
fn copy_plan_has_no_fill() {
    let img = PixelBuffer::color(2, 2, vec![[0.3; 4]; 4]).unwrap();
    let a = PixelBuffer::default_alpha();
    let plan = compile_plan(&SinkInputs::new(&img, &a), &SinkConfig::default());
    assert_eq!(plan.strategy, Strategy::Copy);
    assert_eq!(plan.domain, Domain::new(2, 2));
    assert_eq!(plan.fill, [0.0; 4]);
    assert_eq!(plan.precision, Precision::Full);
    assert!(!plan.non_color);
}
