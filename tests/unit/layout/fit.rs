use super::*;
use crate::foundation::core::Rgba8;

#[test]
fn zero_source_dimension_is_rejected() {
    assert!(matches!(
        fill_plan(0, 10, 100, 100),
        Err(CardError::InvalidSourceDimensions { width: 0, height: 10 })
    ));
    assert!(matches!(
        fill_plan(10, 0, 100, 100),
        Err(CardError::InvalidSourceDimensions { .. })
    ));
}

#[test]
fn landscape_source_scales_to_height() {
    let plan = fill_plan(2000, 1000, 1000, 1000).unwrap();
    assert!((plan.scale - 1.0).abs() < 1e-12);
    assert_eq!((plan.scaled_width, plan.scaled_height), (2000, 1000));
    assert_eq!((plan.crop_x, plan.crop_y), (0, 0));
    assert_eq!((plan.crop_width, plan.crop_height), (1000, 1000));
}

#[test]
fn portrait_source_scales_to_width() {
    let plan = fill_plan(300, 600, 900, 900).unwrap();
    assert!((plan.scale - 3.0).abs() < 1e-12);
    assert_eq!((plan.scaled_width, plan.scaled_height), (900, 1800));
}

#[test]
fn exact_edges_do_not_overshoot() {
    let plan = fill_plan(3, 7, 1000, 1000).unwrap();
    assert_eq!(plan.scaled_width, 1000);
    assert_eq!(plan.scaled_height, 2334);
}

#[test]
fn scaled_size_always_covers_target() {
    let sources = [(1, 1), (3, 7), (7, 3), (1999, 1001), (640, 480), (17, 1000), (999, 998)];
    let targets = [(1, 1), (10, 30), (300, 300), (1000, 1000), (333, 777)];
    for &(sw, sh) in &sources {
        for &(tw, th) in &targets {
            let plan = fill_plan(sw, sh, tw, th).unwrap();
            assert!(plan.scaled_width >= tw, "{sw}x{sh} -> {tw}x{th}: {plan:?}");
            assert!(plan.scaled_height >= th, "{sw}x{sh} -> {tw}x{th}: {plan:?}");
            assert_eq!((plan.crop_width, plan.crop_height), (tw, th));
        }
    }
}

#[test]
fn fit_fill_output_is_exactly_target() {
    let src = SourceImage::solid(40, 10, Rgba8::opaque(10, 20, 30)).unwrap();
    let out = fit_fill(&src, 25, 25).unwrap();
    assert_eq!((out.width(), out.height()), (25, 25));
    assert_eq!(src.width(), 40);

    let out = fit_fill(&src, 100, 7).unwrap();
    assert_eq!((out.width(), out.height()), (100, 7));
}

#[test]
fn crop_is_anchored_top_left() {
    // Left half red, right half blue; covering a square keeps only the left part.
    let mut straight = Vec::new();
    for _y in 0..10 {
        for x in 0..40 {
            if x < 20 {
                straight.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                straight.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    let src = SourceImage::from_straight_rgba8(40, 10, straight).unwrap();
    let out = fit_fill(&src, 10, 10).unwrap();
    assert_eq!(out.pixel(0, 0).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(out.pixel(9, 9).unwrap().to_array(), [255, 0, 0, 255]);
}

#[test]
fn fit_fill_keeps_valid_premultiplied_pixels() {
    let mut straight = Vec::new();
    for i in 0..64u32 {
        let on = i % 2 == 0;
        straight.extend_from_slice(if on { &[255, 255, 255, 255] } else { &[0, 0, 0, 0] });
    }
    let src = SourceImage::from_straight_rgba8(8, 8, straight).unwrap();
    let out = fit_fill(&src, 29, 29).unwrap();
    for px in out.as_premul_bytes().chunks_exact(4) {
        assert!(px[0] <= px[3] && px[1] <= px[3] && px[2] <= px[3]);
    }
}

#[test]
fn thin_source_resamples_only_visible_rows() {
    let plan = fill_plan(1, 20_000, 1000, 1000).unwrap();
    assert_eq!(visible_source_region(&plan, 1, 20_000), (1, 5));

    let src = SourceImage::solid(1, 20_000, Rgba8::opaque(40, 80, 120)).unwrap();
    let out = fit_fill(&src, 1000, 1000).unwrap();
    assert_eq!((out.width(), out.height()), (1000, 1000));
    assert_eq!(out.pixel(999, 999).unwrap().to_array(), [40, 80, 120, 255]);
}

#[test]
fn region_covers_crop_when_downsampling() {
    let plan = fill_plan(4000, 2000, 100, 100).unwrap();
    let (w, h) = visible_source_region(&plan, 4000, 2000);
    assert_eq!(h, 2000);
    assert!(w >= 2000 && w < 4000, "{w}");
    assert!(f64::from(w) * plan.scale >= 100.0);
}
