//! Contact shadows for a placed product.
//!
//! Three soft black ellipses are painted under the product's base before the product itself:
//! a broad ambient occlusion, a directional contact shadow biased to the right (key light from
//! the upper left), and a tight dark core where the object presses on the surface.
//!
//! Each tier fills an ellipse with a circular radial gradient centered on the ellipse. Alpha is
//! linearly interpolated between stops by distance from the center over the gradient radius.

use rayon::prelude::*;

use crate::{
    foundation::core::{DrawRect, Point, Vec2},
    foundation::raster::RasterImage,
    render::composite::blend_over,
};

/// One color stop of a shadow gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Radial position in `0..=1`.
    pub offset: f32,
    /// Shadow opacity at that position.
    pub alpha: f32,
}

const fn stop(offset: f32, alpha: f32) -> GradientStop {
    GradientStop { offset, alpha }
}

const AMBIENT_STOPS: [GradientStop; 4] = [
    stop(0.0, 0.10),
    stop(0.4, 0.05),
    stop(0.7, 0.02),
    stop(1.0, 0.0),
];
const CONTACT_STOPS: [GradientStop; 3] = [stop(0.0, 0.18), stop(0.4, 0.08), stop(1.0, 0.0)];
const CORE_STOPS: [GradientStop; 3] = [stop(0.0, 0.28), stop(0.5, 0.10), stop(1.0, 0.0)];

/// Which of the three shadow layers a tier is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShadowKind {
    /// Broad, faint diffuse occlusion.
    Ambient,
    /// Directional shadow from the key light.
    Contact,
    /// Tight, dark pressure line at the base.
    Core,
}

/// Geometry and gradient of one shadow layer, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowTier {
    /// Layer identity.
    pub kind: ShadowKind,
    /// Ellipse and gradient center.
    pub center: Point,
    /// Gradient radius.
    pub radius: f64,
    /// Ellipse semi-axes `(horizontal, vertical)`.
    pub semi_axes: Vec2,
    /// Gradient stops, ascending by offset.
    pub stops: &'static [GradientStop],
}

impl ShadowTier {
    /// Shadow opacity at gradient position `t` (clamped to `0..=1`).
    pub fn alpha_at(&self, t: f32) -> f32 {
        gradient_alpha(self.stops, t)
    }

    /// Shadow opacity at canvas point `p`, zero outside the ellipse.
    pub fn alpha_at_point(&self, p: Point) -> f32 {
        let d = p - self.center;
        if self.semi_axes.x <= 0.0 || self.semi_axes.y <= 0.0 || self.radius <= 0.0 {
            return 0.0;
        }
        let ex = d.x / self.semi_axes.x;
        let ey = d.y / self.semi_axes.y;
        if ex * ex + ey * ey > 1.0 {
            return 0.0;
        }
        self.alpha_at((d.hypot() / self.radius) as f32)
    }

    /// Axis-aligned bounds of the ellipse.
    pub fn bounds(&self) -> DrawRect {
        DrawRect::new(
            self.center.x - self.semi_axes.x,
            self.center.y - self.semi_axes.y,
            self.center.x + self.semi_axes.x,
            self.center.y + self.semi_axes.y,
        )
    }
}

/// The ambient, contact and core tiers for a product drawn at `draw`, in paint order.
pub fn shadow_tiers(draw: DrawRect) -> [ShadowTier; 3] {
    let w = draw.width();
    let h = draw.height();
    let cx = draw.x0 + w / 2.0;
    let cy = draw.y1;

    [
        ShadowTier {
            kind: ShadowKind::Ambient,
            center: Point::new(cx, cy + 4.0),
            radius: w * 0.70,
            semi_axes: Vec2::new(w * 0.65, h * 0.06),
            stops: &AMBIENT_STOPS,
        },
        ShadowTier {
            kind: ShadowKind::Contact,
            center: Point::new(cx + w * 0.03, cy + 2.0),
            radius: w * 0.38,
            semi_axes: Vec2::new(w * 0.38, h * 0.025),
            stops: &CONTACT_STOPS,
        },
        ShadowTier {
            kind: ShadowKind::Core,
            center: Point::new(cx, cy + 1.0),
            radius: w * 0.22,
            semi_axes: Vec2::new(w * 0.22, h * 0.012),
            stops: &CORE_STOPS,
        },
    ]
}

/// Paint all three tiers under `draw`, ambient first so the core reads on top.
#[tracing::instrument(skip(dest), fields(width = dest.width(), height = dest.height()))]
pub fn paint_shadows(dest: &mut RasterImage, draw: DrawRect) {
    if draw.width() <= 0.0 || draw.height() <= 0.0 {
        return;
    }
    for tier in shadow_tiers(draw) {
        paint_tier(dest, &tier);
    }
}

/// Paint a single tier with source-over, clipped to the canvas.
pub fn paint_tier(dest: &mut RasterImage, tier: &ShadowTier) {
    let (w, h) = (dest.width(), dest.height());
    let b = tier.bounds();
    let x_start = b.x0.floor().max(0.0) as u32;
    let y_start = b.y0.floor().max(0.0) as u32;
    let x_end = (b.x1.ceil().max(0.0) as u32).min(w);
    let y_end = (b.y1.ceil().max(0.0) as u32).min(h);
    if x_start >= x_end || y_start >= y_end {
        return;
    }

    let row_len = w as usize * 4;
    dest.as_raw_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .skip(y_start as usize)
        .take((y_end - y_start) as usize)
        .for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            for x in x_start..x_end {
                let a = tier.alpha_at_point(Point::new(f64::from(x) + 0.5, py));
                if a <= 0.0 {
                    continue;
                }
                let i = x as usize * 4;
                let out = blend_over([row[i], row[i + 1], row[i + 2], row[i + 3]], [0.0; 3], a);
                row[i..i + 4].copy_from_slice(&out);
            }
        });
}

fn gradient_alpha(stops: &[GradientStop], t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let Some(first) = stops.first() else {
        return 0.0;
    };
    if t <= first.offset {
        return first.alpha;
    }
    for pair in stops.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if t <= b.offset {
            let span = b.offset - a.offset;
            if span <= 0.0 {
                return b.alpha;
            }
            return crate::foundation::math::lerp(a.alpha, b.alpha, (t - a.offset) / span);
        }
    }
    stops.last().map_or(0.0, |s| s.alpha)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/shadow.rs"]
mod tests;
