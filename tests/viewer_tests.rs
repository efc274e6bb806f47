//! Zoom/pan transform properties exercised through the public API.

use frameshot::viewer::{ZoomPanEngine, MAX_SCALE, MIN_SCALE};

#[test]
fn fit_of_a_smaller_image_is_one_to_one_and_centered() {
    let mut engine = ZoomPanEngine::new(800.0, 600.0);
    engine.reset(400, 300);
    let t = engine.transform();
    assert_eq!(t.scale, 1.0);
    assert_eq!(t.translate_x, 200.0);
    assert_eq!(t.translate_y, 150.0);
}

#[test]
fn anchor_invariance_holds_across_scales_and_anchors() {
    let anchors = [(0.0, 0.0), (400.0, 300.0), (799.0, 1.0), (123.4, 567.8)];
    let scales = [0.07, 0.5, 1.0, 2.5, 9.9];

    for &(px, py) in &anchors {
        let mut engine = ZoomPanEngine::new(800.0, 600.0);
        engine.reset(1024, 768);
        for &target in &scales {
            let before = engine.transform();
            let img_x = (px - before.translate_x) / before.scale;
            let img_y = (py - before.translate_y) / before.scale;
            engine.zoom_at_point(target, px, py);
            let after = engine.transform();
            assert!(
                ((px - after.translate_x) / after.scale - img_x).abs() < 1e-6,
                "x anchor drifted at scale {} anchor ({}, {})",
                target,
                px,
                py
            );
            assert!(((py - after.translate_y) / after.scale - img_y).abs() < 1e-6);
        }
    }
}

#[test]
fn scale_never_escapes_its_bounds() {
    let mut engine = ZoomPanEngine::new(800.0, 600.0);
    engine.reset(400, 300);
    for _ in 0..200 {
        engine.wheel_zoom(true, 10.0, 10.0);
    }
    assert_eq!(engine.transform().scale, MAX_SCALE);
    for _ in 0..400 {
        engine.wheel_zoom(false, 790.0, 590.0);
    }
    assert_eq!(engine.transform().scale, MIN_SCALE);
}

#[test]
fn fit_after_pan_and_zoom_restores_the_fitted_transform() {
    let mut engine = ZoomPanEngine::new(800.0, 600.0);
    engine.reset(2000, 500);
    let fitted = engine.transform();
    engine.zoom_by(4.0);
    engine.pan_by(-313.0, 88.0);
    engine.fit();
    assert_eq!(engine.transform(), fitted);
}
