use super::*;

#[test]
fn spec_parses_collaborator_json() {
    let spec = CompositingSpec::from_json_str(
        r#"{"canvasWidth":1024,"canvasHeight":768,"productPosition":{"x":300,"y":200,"width":400,"height":450}}"#,
    )
    .unwrap();
    assert_eq!(spec.canvas(), Size::new(1024, 768));
    assert_eq!(spec.product_position, PixelRect::new(300, 200, 400, 450));
}

#[test]
fn spec_rejects_zero_canvas_and_empty_rect() {
    assert!(
        CompositingSpec::from_json_str(
            r#"{"canvasWidth":0,"canvasHeight":10,"productPosition":{"x":0,"y":0,"width":1,"height":1}}"#,
        )
        .is_err()
    );
    assert!(
        CompositingSpec::from_json_str(
            r#"{"canvasWidth":10,"canvasHeight":10,"productPosition":{"x":0,"y":0,"width":0,"height":1}}"#,
        )
        .is_err()
    );
}

#[test]
fn spec_accepts_rect_past_canvas_edge() {
    let spec = CompositingSpec::from_json_str(
        r#"{"canvasWidth":100,"canvasHeight":100,"productPosition":{"x":80,"y":90,"width":40,"height":40}}"#,
    )
    .unwrap();
    assert!(spec.product_position.exceeds(100, 100));
}

#[test]
fn intersect_clips_to_canvas() {
    let r = PixelRect::new(-10, 90, 40, 40);
    assert_eq!(r.intersect(100, 100), Some(PixelRect::new(0, 90, 30, 10)));
    assert_eq!(PixelRect::new(200, 0, 5, 5).intersect(100, 100), None);
}

#[test]
fn degenerate_sizes_have_no_aspect() {
    assert_eq!(Size::new(0, 10).aspect(), None);
    assert_eq!(Size::new(100, 200).aspect(), Some(0.5));
}
