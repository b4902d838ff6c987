use rayon::prelude::*;

use crate::foundation::{core::DrawRect, math::to_u8, raster::RasterImage};

/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Source sampling used when scaling an image into its draw rect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resample {
    /// Nearest source pixel.
    Nearest,
    /// Bilinear filtering, with 2x box prefiltering when shrinking a lot.
    #[default]
    Bilinear,
}

/// Source-over of a straight-alpha color with opacity `src_a` (`0..=1`) onto `dst`.
///
/// Colors are `0..=255` floats. With an opaque destination this is
/// `src * a + dst * (1 - a)`.
pub fn blend_over(dst: Rgba8, src_rgb: [f32; 3], src_a: f32) -> Rgba8 {
    let sa = src_a.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let dw = da * (1.0 - sa);
    let out_a = sa + dw;
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = to_u8((src_rgb[i] * sa + f32::from(dst[i]) * dw) / out_a);
    }
    out[3] = to_u8(out_a * 255.0);
    out
}

/// Source-over of two straight-alpha RGBA8 pixels.
pub fn over_straight(dst: Rgba8, src: Rgba8) -> Rgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    blend_over(
        dst,
        [f32::from(src[0]), f32::from(src[1]), f32::from(src[2])],
        f32::from(src[3]) / 255.0,
    )
}

/// Draw `src` scaled into `rect` over `dest`.
///
/// Only destination pixels whose centers fall inside `rect` are touched; the parts of `rect`
/// outside the canvas are clipped silently.
#[tracing::instrument(skip(dest, src), fields(src_w = src.width(), src_h = src.height()))]
pub fn draw_over(dest: &mut RasterImage, src: &RasterImage, rect: DrawRect, resample: Resample) {
    let Some(span) = PixelSpan::covering(rect, dest.width(), dest.height()) else {
        tracing::debug!("draw rect does not cover any canvas pixel");
        return;
    };
    if src.width() == 0 || src.height() == 0 {
        return;
    }

    let sampler = Sampler::new(src, rect, resample);
    let row_len = dest.width() as usize * 4;
    dest.as_raw_mut()
        .par_chunks_exact_mut(row_len)
        .enumerate()
        .skip(span.y0 as usize)
        .take((span.y1 - span.y0) as usize)
        .for_each(|(y, row)| {
            let py = y as f64 + 0.5;
            for x in span.x0..span.x1 {
                let (rgb, a) = sampler.sample(f64::from(x) + 0.5, py);
                if a <= 0.0 {
                    continue;
                }
                let i = x as usize * 4;
                let out = blend_over([row[i], row[i + 1], row[i + 2], row[i + 3]], rgb, a);
                row[i..i + 4].copy_from_slice(&out);
            }
        });
}

/// Scale `src` to exactly `width x height`.
pub fn resample(src: &RasterImage, width: u32, height: u32, resample: Resample) -> RasterImage {
    if src.width() == width && src.height() == height {
        return src.clone();
    }
    let mut out = RasterImage::filled(width, height, [0, 0, 0, 0]);
    draw_over(
        &mut out,
        src,
        DrawRect::new(0.0, 0.0, f64::from(width), f64::from(height)),
        resample,
    );
    out
}

/// Integer pixel range `[x0,x1) x [y0,y1)` whose centers lie inside a rect, clipped to a canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelSpan {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelSpan {
    fn covering(rect: DrawRect, width: u32, height: u32) -> Option<Self> {
        if !(rect.width() > 0.0 && rect.height() > 0.0) {
            return None;
        }
        let clamp = |v: f64, max: u32| v.clamp(0.0, f64::from(max)) as u32;
        let span = Self {
            x0: clamp((rect.x0 - 0.5).ceil(), width),
            y0: clamp((rect.y0 - 0.5).ceil(), height),
            x1: clamp((rect.x1 - 0.5).ceil(), width),
            y1: clamp((rect.y1 - 0.5).ceil(), height),
        };
        (span.x0 < span.x1 && span.y0 < span.y1).then_some(span)
    }
}

/// Premultiplied float copy of a source image plus the mapping from canvas to source space.
struct Sampler {
    width: u32,
    height: u32,
    /// Premultiplied `[r, g, b, a]` with colors in `0..=255` and alpha in `0..=1`.
    texels: Vec<[f32; 4]>,
    rect: DrawRect,
    resample: Resample,
}

impl Sampler {
    fn new(src: &RasterImage, rect: DrawRect, resample: Resample) -> Self {
        let mut texels: Vec<[f32; 4]> = src
            .as_raw()
            .chunks_exact(4)
            .map(|px| {
                let a = f32::from(px[3]) / 255.0;
                [
                    f32::from(px[0]) * a,
                    f32::from(px[1]) * a,
                    f32::from(px[2]) * a,
                    a,
                ]
            })
            .collect();
        let (mut w, mut h) = (src.width(), src.height());

        if resample == Resample::Bilinear {
            while w > 1
                && h > 1
                && f64::from(w) >= 2.0 * rect.width()
                && f64::from(h) >= 2.0 * rect.height()
            {
                (texels, w, h) = halve(&texels, w, h);
            }
        }

        Self {
            width: w,
            height: h,
            texels,
            rect,
            resample,
        }
    }

    /// Straight color and alpha at canvas point `(px, py)`.
    fn sample(&self, px: f64, py: f64) -> ([f32; 3], f32) {
        let u = (px - self.rect.x0) / self.rect.width() * f64::from(self.width);
        let v = (py - self.rect.y0) / self.rect.height() * f64::from(self.height);

        let p = match self.resample {
            Resample::Nearest => self.texel(u.floor() as i64, v.floor() as i64),
            Resample::Bilinear => {
                let fx = u - 0.5;
                let fy = v - 0.5;
                let x0 = fx.floor();
                let y0 = fy.floor();
                let tx = (fx - x0) as f32;
                let ty = (fy - y0) as f32;
                let (x0, y0) = (x0 as i64, y0 as i64);
                let a = self.texel(x0, y0);
                let b = self.texel(x0 + 1, y0);
                let c = self.texel(x0, y0 + 1);
                let d = self.texel(x0 + 1, y0 + 1);
                let mut out = [0.0f32; 4];
                for i in 0..4 {
                    let top = a[i] + (b[i] - a[i]) * tx;
                    let bottom = c[i] + (d[i] - c[i]) * tx;
                    out[i] = top + (bottom - top) * ty;
                }
                out
            }
        };

        let a = p[3];
        if a <= 0.0 {
            return ([0.0; 3], 0.0);
        }
        ([p[0] / a, p[1] / a, p[2] / a], a)
    }

    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.texels[y * self.width as usize + x]
    }
}

/// 2x2 box downsample in premultiplied space.
fn halve(texels: &[[f32; 4]], w: u32, h: u32) -> (Vec<[f32; 4]>, u32, u32) {
    let nw = (w / 2).max(1);
    let nh = (h / 2).max(1);
    let w = w as usize;
    let mut out = Vec::with_capacity(nw as usize * nh as usize);
    for y in 0..nh as usize {
        for x in 0..nw as usize {
            let i = (2 * y) * w + 2 * x;
            let quad = [texels[i], texels[i + 1], texels[i + w], texels[i + w + 1]];
            let mut acc = [0.0f32; 4];
            for t in quad {
                for c in 0..4 {
                    acc[c] += t[c] * 0.25;
                }
            }
            out.push(acc);
        }
    }
    (out, nw, nh)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
