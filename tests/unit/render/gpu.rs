use super::*;
use crate::buffer::pixel::{PixelBuffer, Precision};
use crate::foundation::core::{Bounds, Int2};

#[test]
fn pass_params_match_wgsl_layout() {
    assert_eq!(std::mem::size_of::<PassParams>(), 80);
    assert_eq!(std::mem::offset_of!(PassParams, image_single), 48);
    assert_eq!(std::mem::offset_of!(PassParams, fill), 64);
}

#[test]
fn pass_params_carry_plan_and_inputs() {
    let img = PixelBuffer::color(3, 2, vec![[0.0; 4]; 6]).unwrap();
    let a = PixelBuffer::single_float(0.5);
    let plan = SinkPlan {
        strategy: Strategy::SetAlpha,
        domain: Domain::new(3, 2),
        bounds: Bounds::new(Int2::new(-1, 2), Int2::new(4, 5)),
        fill: [1.0, 2.0, 3.0, 4.0],
        precision: Precision::Full,
        non_color: false,
    };
    let p = PassParams::new(&plan, &SinkInputs::new(&img, &a), Domain::new(8, 9));
    assert_eq!(p.lower_bound, [-1, 2]);
    assert_eq!(p.upper_bound, [4, 5]);
    assert_eq!(p.domain_size, [3, 2]);
    assert_eq!(p.output_size, [8, 9]);
    assert_eq!(p.image_size, [3, 2]);
    assert_eq!(p.alpha_size, [1, 1]);
    assert_eq!(p.image_single, 0);
    assert_eq!(p.alpha_single, 1);
    assert_eq!(p.fill, [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn non_empty_pads_only_empty_planes() {
    assert_eq!(non_empty::<f32>(vec![]), vec![0.0]);
    assert_eq!(non_empty(vec![1.0f32, 2.0]), vec![1.0, 2.0]);
}

#[test]
fn oversized_planes_are_rejected_before_upload() {
    let limits = wgpu::Limits::default();
    let dci_4k = u64::from(4096u32 * 2160) * 16;
    let err = check_plane_sizes(&limits, &[("image", 64), ("output", dci_4k)]).unwrap_err();
    assert!(matches!(err, ViewerError::Backend(_)));
    assert!(err.to_string().contains("output plane"));

    let hd = u64::from(1920u32 * 1080) * 16;
    check_plane_sizes(&limits, &[("image", hd), ("output", hd), ("alpha", hd / 4)]).unwrap();
}

#[test]
fn buffer_limits_follow_the_adapter() {
    let supported = wgpu::Limits {
        max_buffer_size: 1 << 31,
        max_storage_buffer_binding_size: (1 << 31) - 4,
        ..wgpu::Limits::default()
    };
    let limits = buffer_limits(&supported);
    assert_eq!(limits.max_buffer_size, 1 << 31);
    assert_eq!(limits.max_storage_buffer_binding_size, (1 << 31) - 4);
    assert_eq!(
        limits.max_compute_workgroup_size_x,
        wgpu::Limits::default().max_compute_workgroup_size_x
    );

    let dci_4k = u64::from(4096u32 * 2160) * 16;
    check_plane_sizes(&limits, &[("output", dci_4k)]).unwrap();
}
