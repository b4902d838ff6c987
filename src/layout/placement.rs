use crate::foundation::core::{DrawRect, PixelRect, Size};

/// Fit an image of `natural` size into `target`, preserving aspect ratio.
///
/// The result is always bottom-anchored: its bottom edge is exactly the target's bottom edge,
/// so the product rests on whatever surface the scene put there. A product relatively wider
/// than the box keeps the box's left edge; otherwise it is centered horizontally.
///
/// The returned rect is not clipped to any canvas.
pub fn place(natural: Size, target: PixelRect) -> DrawRect {
    let tx = f64::from(target.x);
    let ty = f64::from(target.y);
    let tw = f64::from(target.width);
    let th = f64::from(target.height);
    let bottom = target.bottom() as f64;

    let (Some(aspect), Some(box_aspect)) = (natural.aspect(), target.aspect()) else {
        let cx = tx + tw / 2.0;
        return DrawRect::new(cx, bottom, cx, bottom);
    };

    if aspect > box_aspect {
        let w = tw;
        let h = w / aspect;
        DrawRect::new(tx, bottom - h, tx + w, bottom)
    } else {
        let h = th;
        let w = h * aspect;
        let x0 = tx + (tw - w) / 2.0;
        DrawRect::new(x0, ty, x0 + w, bottom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
