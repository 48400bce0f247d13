use super::*;
use crate::buffer::pixel::{PixelBuffer, Precision};
use crate::foundation::core::{Bounds, Domain};
use crate::sink::strategy::Strategy;

const SENTINEL: [f32; 4] = [-1.0, -1.0, -1.0, -1.0];

fn gradient(w: u32, h: u32) -> PixelBuffer {
    let px = (0..h)
        .flat_map(|y| (0..w).map(move |x| [x as f32, y as f32, 0.5, 0.25]))
        .collect();
    PixelBuffer::color(w, h, px).unwrap()
}

fn run(backend: &mut CpuBackend, plan: &SinkPlan, img: &PixelBuffer, a: &PixelBuffer) -> OutputBuffer {
    let mut out = OutputBuffer::filled(plan.domain, Precision::Full, false, SENTINEL);
    backend
        .execute_pass(plan, &SinkInputs::new(img, a), &mut out)
        .unwrap();
    out
}

fn plan(strategy: Strategy, domain: Domain, bounds: Bounds) -> SinkPlan {
    SinkPlan {
        strategy,
        domain,
        bounds,
        fill: [0.0, 1.0, 0.0, 1.0],
        precision: Precision::Full,
        non_color: false,
    }
}

#[test]
fn copy_over_full_bounds_writes_every_texel() {
    let img = gradient(5, 3);
    let a = PixelBuffer::default_alpha();
    let domain = Domain::new(5, 3);
    let p = plan(Strategy::Copy, domain, Bounds::new(Int2::ZERO, domain.size()));
    let out = run(&mut CpuBackend::new(&RenderSettings::default()).unwrap(), &p, &img, &a);
    for y in 0..3 {
        for x in 0..5 {
            assert_eq!(out.get(x, y), Some([x as f32, y as f32, 0.5, 0.25]));
        }
    }
}

#[test]
fn offset_bounds_shift_and_clip() {
    let img = gradient(4, 4);
    let a = PixelBuffer::default_alpha();
    let domain = Domain::new(4, 4);
    let p = plan(
        Strategy::IgnoreAlpha,
        domain,
        Bounds::new(Int2::new(1, 1), Int2::new(3, 3)),
    );
    let out = run(&mut CpuBackend::new(&RenderSettings::default()).unwrap(), &p, &img, &a);
    for y in 0..4 {
        for x in 0..4 {
            let px = out.get(x, y).unwrap();
            if (1..=3).contains(&x) && (1..=3).contains(&y) {
                assert_eq!(px, [(x - 1) as f32, (y - 1) as f32, 0.5, 1.0]);
            } else {
                assert_eq!(px, SENTINEL);
            }
        }
    }
}

#[test]
fn dedicated_pool_matches_global_pool() {
    let img = gradient(37, 29);
    let a = PixelBuffer::float(37, 29, (0..37 * 29).map(|i| i as f32 / 1000.0).collect()).unwrap();
    let domain = Domain::new(37, 29);
    let p = plan(
        Strategy::SetAlpha,
        domain,
        Bounds::new(Int2::new(3, 2), Int2::new(30, 20)),
    );
    let global = run(&mut CpuBackend::new(&RenderSettings::default()).unwrap(), &p, &img, &a);
    let settings = RenderSettings::default().with_threads(Some(3));
    let pooled = run(&mut CpuBackend::new(&settings).unwrap(), &p, &img, &a);
    assert_eq!(global, pooled);
}

#[test]
fn clear_fills_only_bounds() {
    let img = PixelBuffer::default_image();
    let a = PixelBuffer::default_alpha();
    let domain = Domain::new(3, 3);
    let p = plan(
        Strategy::Clear,
        domain,
        Bounds::new(Int2::ZERO, Int2::new(1, 1)),
    );
    let out = run(&mut CpuBackend::new(&RenderSettings::default()).unwrap(), &p, &img, &a);
    let written = out.pixels().iter().filter(|px| **px == p.fill).count();
    assert_eq!(written, 4);
    assert_eq!(out.get(2, 2), Some(SENTINEL));
}

#[test]
fn written_texels_match_forward_clipping_rule() {
    let img = gradient(6, 5);
    let a = PixelBuffer::default_alpha();
    let domain = Domain::new(6, 5);
    let output = Domain::new(4, 7);
    for bounds in [
        Bounds::new(Int2::new(-2, -1), Int2::new(2, 3)),
        Bounds::new(Int2::new(1, 2), Int2::new(9, 9)),
        Bounds::new(Int2::new(3, 0), Int2::new(3, 6)),
    ] {
        let p = plan(Strategy::Copy, domain, bounds);
        let mut out = OutputBuffer::filled(output, Precision::Full, false, SENTINEL);
        CpuBackend::new(&RenderSettings::default())
            .unwrap()
            .execute_pass(&p, &SinkInputs::new(&img, &a), &mut out)
            .unwrap();

        let mut expected = vec![SENTINEL; output.len()];
        for y in 0..5 {
            for x in 0..6 {
                let t = Int2::new(x, y);
                if let Some(o) = output_texel(t, domain, &bounds, output) {
                    expected[output.index_of(o).unwrap()] = img.load_color(t);
                }
            }
        }
        assert_eq!(out.pixels(), expected.as_slice(), "{bounds:?}");
    }
}
