//! Per-pixel background classifiers.
//!
//! Both keyers only write the alpha channel; RGB is left untouched and pixels outside the
//! trigger bands are not modified. There is no dependency between pixels, so each pass runs as a
//! parallel map over the buffer.

use rayon::prelude::*;

use crate::foundation::{math::to_u8, raster::RasterImage};

/// Which upstream path produced the product image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoutKind {
    /// Already a clean cutout with a meaningful alpha channel.
    #[default]
    Clean,
    /// Shot against a green screen; chroma-key it.
    GreenScreen,
    /// Catalog photo on a white backdrop; strip the white.
    WhiteBackground,
}

/// Alpha for a pixel under the green chroma key, or `None` when the pixel is not keyed.
pub fn chroma_key_alpha(r: u8, g: u8, b: u8) -> Option<u8> {
    if g > 180 && r < 120 && b < 120 {
        return Some(0);
    }
    let (rf, gf, bf) = (f32::from(r), f32::from(g), f32::from(b));
    if g > 150 && gf > 1.4 * rf && gf > 1.4 * bf {
        let greenness = (gf - rf.max(bf)) / gf;
        return Some(to_u8(255.0 * (1.0 - greenness)));
    }
    None
}

/// Alpha for a pixel under white-background removal, or `None` when the pixel is kept.
pub fn white_key_alpha(r: u8, g: u8, b: u8) -> Option<u8> {
    if r > 240 && g > 240 && b > 240 {
        return Some(0);
    }
    if r > 220 && g > 220 && b > 220 {
        let whiteness = (f32::from(r) + f32::from(g) + f32::from(b)) / 765.0;
        return Some(to_u8(255.0 * (1.0 - whiteness)));
    }
    None
}

/// Make green-screen pixels transparent, with a soft band at the green/product boundary.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn chroma_key_green(img: &mut RasterImage) {
    apply_alpha_key(img, chroma_key_alpha);
}

/// Make white-backdrop pixels transparent, anti-aliasing the near-white edge band.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn remove_white_background(img: &mut RasterImage) {
    apply_alpha_key(img, white_key_alpha);
}

/// Run the keyer matching `kind`; clean cutouts pass through untouched.
pub fn prepare_cutout(mut img: RasterImage, kind: CutoutKind) -> RasterImage {
    match kind {
        CutoutKind::Clean => {}
        CutoutKind::GreenScreen => chroma_key_green(&mut img),
        CutoutKind::WhiteBackground => remove_white_background(&mut img),
    }
    img
}

fn apply_alpha_key(img: &mut RasterImage, key: fn(u8, u8, u8) -> Option<u8>) {
    img.as_raw_mut().par_chunks_exact_mut(4).for_each(|px| {
        if let Some(a) = key(px[0], px[1], px[2]) {
            px[3] = a;
        }
    });
}

#[cfg(test)]
#[path = "../../tests/unit/keying/classify.rs"]
mod tests;
