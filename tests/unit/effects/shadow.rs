use super::*;

fn luminance(px: [u8; 4]) -> f32 {
    0.2126 * f32::from(px[0]) + 0.7152 * f32::from(px[1]) + 0.0722 * f32::from(px[2])
}

#[test]
fn tiers_follow_draw_rect() {
    let draw = DrawRect::new(100.0, 100.0, 300.0, 300.0);
    let [ambient, contact, core] = shadow_tiers(draw);

    assert_eq!(ambient.kind, ShadowKind::Ambient);
    assert_eq!(ambient.center, Point::new(200.0, 304.0));
    assert!((ambient.radius - 140.0).abs() < 1e-9);
    assert!((ambient.semi_axes.x - 130.0).abs() < 1e-9);
    assert!((ambient.semi_axes.y - 12.0).abs() < 1e-9);

    assert_eq!(contact.kind, ShadowKind::Contact);
    assert!((contact.center.x - 206.0).abs() < 1e-9);
    assert_eq!(contact.center.y, 302.0);
    assert!((contact.radius - 76.0).abs() < 1e-9);
    assert!((contact.semi_axes.y - 5.0).abs() < 1e-9);

    assert_eq!(core.kind, ShadowKind::Core);
    assert_eq!(core.center, Point::new(200.0, 301.0));
    assert!((core.radius - 44.0).abs() < 1e-9);
    assert!((core.semi_axes.y - 2.4).abs() < 1e-9);
}

#[test]
fn gradient_interpolates_between_stops() {
    let [ambient, contact, core] = shadow_tiers(DrawRect::new(0.0, 0.0, 100.0, 100.0));
    assert!((ambient.alpha_at(0.0) - 0.10).abs() < 1e-6);
    assert!((ambient.alpha_at(0.2) - 0.075).abs() < 1e-6);
    assert!((ambient.alpha_at(0.55) - 0.035).abs() < 1e-6);
    assert!((ambient.alpha_at(0.85) - 0.01).abs() < 1e-6);
    assert_eq!(ambient.alpha_at(1.0), 0.0);
    assert_eq!(ambient.alpha_at(3.0), 0.0);
    assert!((contact.alpha_at(0.4) - 0.08).abs() < 1e-6);
    assert!((core.alpha_at(0.25) - 0.19).abs() < 1e-6);
}

#[test]
fn points_outside_ellipse_are_untouched() {
    let [ambient, _, core] = shadow_tiers(DrawRect::new(100.0, 100.0, 300.0, 300.0));
    assert_eq!(core.alpha_at_point(Point::new(200.0, 310.0)), 0.0);
    assert_eq!(ambient.alpha_at_point(Point::new(200.0, 320.0)), 0.0);
    assert!(ambient.alpha_at_point(Point::new(200.0, 304.0)) > 0.09);
}

#[test]
fn core_is_darker_than_ambient_only_band() {
    let mut canvas = RasterImage::filled(400, 400, [255, 255, 255, 255]);
    paint_shadows(&mut canvas, DrawRect::new(100.0, 100.0, 300.0, 300.0));

    let core_px = canvas.pixel(200, 301).unwrap();
    let ambient_only_px = canvas.pixel(300, 304).unwrap();
    assert!(luminance(core_px) < luminance(ambient_only_px));
    assert!(luminance(ambient_only_px) < 255.0);
    assert_eq!(core_px[3], 255);

    // Above the base and far outside the ellipses nothing changes.
    assert_eq!(canvas.pixel(200, 200), Some([255, 255, 255, 255]));
    assert_eq!(canvas.pixel(20, 304), Some([255, 255, 255, 255]));
}

#[test]
fn contact_shadow_is_biased_right() {
    let mut canvas = RasterImage::filled(400, 400, [255, 255, 255, 255]);
    paint_shadows(&mut canvas, DrawRect::new(100.0, 100.0, 300.0, 300.0));

    let left = canvas.pixel(200 - 70, 302).unwrap();
    let right = canvas.pixel(200 + 70, 302).unwrap();
    assert!(luminance(right) < luminance(left));
}

#[test]
fn shadows_clip_at_canvas_edges() {
    let mut canvas = RasterImage::filled(50, 50, [200, 200, 200, 255]);
    paint_shadows(&mut canvas, DrawRect::new(-40.0, 0.0, 60.0, 40.0));
    assert!(canvas.pixel(0, 44).unwrap()[0] < 200);

    let mut untouched = RasterImage::filled(10, 10, [1, 2, 3, 255]);
    paint_shadows(&mut untouched, DrawRect::new(500.0, 500.0, 600.0, 600.0));
    assert!(untouched.as_raw().chunks_exact(4).all(|p| p == [1, 2, 3, 255]));
}

#[test]
fn empty_draw_rect_paints_nothing() {
    let mut canvas = RasterImage::filled(10, 10, [255, 255, 255, 255]);
    paint_shadows(&mut canvas, DrawRect::new(5.0, 5.0, 5.0, 5.0));
    assert!(canvas.is_opaque());
    assert!(canvas.as_raw().iter().all(|&b| b == 255));
}
