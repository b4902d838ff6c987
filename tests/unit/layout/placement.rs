use super::*;

#[test]
fn portrait_product_in_wide_box_is_centered() {
    let r = place(Size::new(100, 200), PixelRect::new(0, 0, 300, 100));
    assert_eq!(r.height(), 100.0);
    assert_eq!(r.width(), 50.0);
    assert_eq!(r.x0, 125.0);
    assert_eq!(r.y0, 0.0);
}

#[test]
fn wide_product_keeps_left_edge_and_rests_on_bottom() {
    let r = place(Size::new(400, 100), PixelRect::new(10, 20, 200, 200));
    assert_eq!(r.x0, 10.0);
    assert_eq!(r.width(), 200.0);
    assert_eq!(r.height(), 50.0);
    assert_eq!(r.y1, 220.0);
    assert_eq!(r.y0, 170.0);
}

#[test]
fn equal_aspect_fills_box() {
    let r = place(Size::new(50, 50), PixelRect::new(100, 100, 200, 200));
    assert_eq!(r, DrawRect::new(100.0, 100.0, 300.0, 300.0));
}

#[test]
fn aspect_and_bottom_anchor_hold_across_inputs() {
    let naturals = [(1, 1), (3, 7), (640, 480), (17, 1000), (1000, 17), (333, 334)];
    let targets = [
        PixelRect::new(0, 0, 1, 1),
        PixelRect::new(-20, 5, 77, 13),
        PixelRect::new(300, 200, 400, 450),
        PixelRect::new(900, 700, 250, 120),
        PixelRect::new(3, 9, 1000, 999),
    ];
    for (w, h) in naturals {
        for t in targets {
            let r = place(Size::new(w, h), t);
            let want = f64::from(w) / f64::from(h);
            let got = r.width() / r.height();
            assert!(
                (got - want).abs() <= 1e-9 * want.max(1.0),
                "aspect {got} != {want} for {w}x{h} in {t:?}"
            );
            assert_eq!(r.y1, t.bottom() as f64, "bottom anchor for {w}x{h} in {t:?}");
            assert!(r.width() <= f64::from(t.width) + 1e-9);
            assert!(r.height() <= f64::from(t.height) + 1e-9);
        }
    }
}

#[test]
fn degenerate_natural_size_collapses_to_bottom_center() {
    let r = place(Size::new(0, 10), PixelRect::new(0, 0, 100, 50));
    assert_eq!(r, DrawRect::new(50.0, 50.0, 50.0, 50.0));
    assert_eq!(r.area(), 0.0);
}
