use std::io::Cursor;

use rayon::prelude::*;

use crate::{
    foundation::error::{PackshotError, PackshotResult},
    foundation::math::mul_div255_u8,
    foundation::raster::RasterImage,
};

/// Default lossy quality for [`OutputFormat::Jpeg`].
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Encoding used for the final, alpha-free image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Baseline JPEG.
    #[default]
    Jpeg,
    /// RGB8 PNG (still no alpha channel).
    Png,
}

impl OutputFormat {
    /// MIME type declared alongside the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Final encoded artifact.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded bytes.
    pub bytes: Vec<u8>,
    /// Declared MIME type.
    pub mime: &'static str,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("bytes_len", &self.bytes.len())
            .field("mime", &self.mime)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Composite `buf` over opaque white and drop the alpha channel.
///
/// Per channel: `out = src * a + 255 * (1 - a)`.
pub fn flatten_over_white(buf: &RasterImage) -> image::RgbImage {
    let mut rgb = vec![0u8; buf.width() as usize * buf.height() as usize * 3];
    rgb.par_chunks_exact_mut(3)
        .zip(buf.as_raw().par_chunks_exact(4))
        .for_each(|(out, px)| {
            let a = u16::from(px[3]);
            let inv = 255 - px[3];
            for i in 0..3 {
                out[i] = mul_div255_u8(u16::from(px[i]), a).saturating_add(inv);
            }
        });
    // Length matches width*height*3 by construction.
    image::RgbImage::from_raw(buf.width(), buf.height(), rgb)
        .unwrap_or_else(|| image::RgbImage::new(buf.width(), buf.height()))
}

/// Flatten and encode `buf`. The result never carries an alpha channel.
#[tracing::instrument(skip(buf), fields(width = buf.width(), height = buf.height()))]
pub fn finalize(
    buf: &RasterImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> PackshotResult<EncodedImage> {
    if buf.width() == 0 || buf.height() == 0 {
        return Err(PackshotError::encode("cannot encode an empty image"));
    }
    let rgb = flatten_over_white(buf);

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let quality = jpeg_quality.clamp(1, 100);
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, quality);
            rgb.write_with_encoder(encoder)?;
        }
        OutputFormat::Png => {
            rgb.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        }
    }

    tracing::debug!(mime = format.mime(), bytes = bytes.len(), "encoded output");
    Ok(EncodedImage {
        bytes,
        mime: format.mime(),
        width: buf.width(),
        height: buf.height(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/output.rs"]
mod tests;
