use super::*;

fn red(w: u32, h: u32) -> SourceImage {
    SourceImage::solid(w, h, Rgba8::opaque(255, 0, 0)).unwrap()
}

fn count_opaque(canvas: &Canvas) -> usize {
    canvas
        .as_premul_bytes()
        .chunks_exact(4)
        .filter(|px| px[3] == 255)
        .count()
}

#[test]
fn new_canvas_is_transparent() {
    let canvas = Canvas::new(4, 3).unwrap();
    assert_eq!(canvas.as_premul_bytes().len(), 4 * 3 * 4);
    assert!(canvas.as_premul_bytes().iter().all(|&b| b == 0));
    assert!(Canvas::new(0, 3).is_err());
}

#[test]
fn composite_inside_leaves_border_untouched() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    canvas.composite_over(&red(4, 3), 2, 5);
    for y in 0..10 {
        for x in 0..10 {
            let inside = (2..6).contains(&x) && (5..8).contains(&y);
            let px = canvas.pixel(x, y).unwrap().to_array();
            if inside {
                assert_eq!(px, [255, 0, 0, 255], "({x},{y})");
            } else {
                assert_eq!(px, [0, 0, 0, 0], "({x},{y})");
            }
        }
    }
}

#[test]
fn composite_preserves_previous_opaque_pixels_outside_source() {
    let mut canvas = Canvas::new(6, 6).unwrap();
    canvas.composite_over(
        &SourceImage::solid(6, 6, Rgba8::opaque(0, 0, 255)).unwrap(),
        0,
        0,
    );
    canvas.composite_over(&red(2, 2), 1, 1);
    assert_eq!(canvas.pixel(0, 0).unwrap().to_array(), [0, 0, 255, 255]);
    assert_eq!(canvas.pixel(1, 1).unwrap().to_array(), [255, 0, 0, 255]);
    assert_eq!(canvas.pixel(3, 3).unwrap().to_array(), [0, 0, 255, 255]);
}

#[test]
fn composite_clips_on_every_side() {
    let mut canvas = Canvas::new(5, 5).unwrap();
    canvas.composite_over(&red(3, 3), -2, -2);
    assert_eq!(count_opaque(&canvas), 1);

    let mut canvas = Canvas::new(5, 5).unwrap();
    canvas.composite_over(&red(3, 3), 4, 4);
    assert_eq!(count_opaque(&canvas), 1);
    assert_eq!(canvas.pixel(4, 4).unwrap().a, 255);

    let mut canvas = Canvas::new(5, 5).unwrap();
    canvas.composite_over(&red(20, 1), -7, 2);
    assert_eq!(count_opaque(&canvas), 5);

    let mut canvas = Canvas::new(5, 5).unwrap();
    canvas.composite_over(&red(3, 3), 5, 0);
    canvas.composite_over(&red(3, 3), -3, 0);
    canvas.composite_over(&red(3, 3), 0, 100);
    assert_eq!(count_opaque(&canvas), 0);
}

#[test]
fn composite_blends_translucent_source() {
    let mut canvas = Canvas::new(1, 1).unwrap();
    canvas.composite_over(
        &SourceImage::solid(1, 1, Rgba8::opaque(0, 0, 255)).unwrap(),
        0,
        0,
    );
    canvas.composite_over(
        &SourceImage::solid(1, 1, Rgba8::new(255, 0, 0, 128)).unwrap(),
        0,
        0,
    );
    let px = canvas.pixel(0, 0).unwrap().to_array();
    assert_eq!(px[3], 255);
    assert_eq!(px[0], 128);
    assert_eq!(px[2], 127);
}

#[test]
fn glyph_mask_paints_color_by_coverage() {
    let mask = GlyphMask {
        width: 3,
        height: 1,
        coverage: vec![255, 0, 128],
        origin_x: 0,
        baseline: 1,
    };
    let mut canvas = Canvas::new(4, 2).unwrap();
    canvas.draw_glyph_mask(&mask, 1, 1, Rgba8::opaque(0, 255, 0));
    assert_eq!(canvas.pixel(1, 1).unwrap().to_array(), [0, 255, 0, 255]);
    assert_eq!(canvas.pixel(2, 1).unwrap().to_array(), [0, 0, 0, 0]);
    assert_eq!(canvas.pixel(3, 1).unwrap().to_array(), [0, 128, 0, 128]);
    assert_eq!(canvas.pixel(0, 0).unwrap().to_array(), [0, 0, 0, 0]);
}

#[test]
fn glyph_mask_clips_and_empty_mask_is_noop() {
    let mask = GlyphMask {
        width: 2,
        height: 2,
        coverage: vec![255; 4],
        origin_x: 0,
        baseline: 2,
    };
    let mut canvas = Canvas::new(2, 2).unwrap();
    canvas.draw_glyph_mask(&mask, -1, -1, Rgba8::opaque(1, 1, 1));
    assert_eq!(count_opaque(&canvas), 1);

    let before = canvas.clone();
    canvas.draw_glyph_mask(&GlyphMask::empty(), 0, 0, Rgba8::opaque(9, 9, 9));
    assert_eq!(canvas, before);
}

#[test]
fn png_round_trip_is_lossless() {
    let mut canvas = Canvas::new(7, 5).unwrap();
    canvas.composite_over(
        &SourceImage::from_straight_rgba8(
            2,
            1,
            vec![10, 200, 30, 255, 90, 80, 70, 77],
        )
        .unwrap(),
        3,
        2,
    );
    canvas.draw_glyph_mask(
        &GlyphMask {
            width: 1,
            height: 1,
            coverage: vec![200],
            origin_x: 0,
            baseline: 1,
        },
        0,
        0,
        Rgba8::opaque(250, 20, 20),
    );

    let bytes = canvas.encode(OutputFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (7, 5));
    assert_eq!(decoded.into_raw(), canvas.to_rgba8());
}
