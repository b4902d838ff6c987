use base64::Engine as _;

use crate::{
    foundation::error::{PackshotError, PackshotResult},
    foundation::raster::RasterImage,
};

/// Decode PNG, JPEG or WebP bytes into a straight-alpha RGBA8 buffer.
///
/// Grey, RGB, 16-bit and palette inputs are all normalized to 8-bit sRGB RGBA; images
/// without an alpha channel come back fully opaque.
pub fn decode_image(bytes: &[u8]) -> PackshotResult<RasterImage> {
    if bytes.is_empty() {
        return Err(PackshotError::decode("empty image source"));
    }
    let format = image::guess_format(bytes)
        .map_err(|e| PackshotError::decode(format!("unrecognized image bytes: {e}")))?;
    if !matches!(
        format,
        image::ImageFormat::Png | image::ImageFormat::Jpeg | image::ImageFormat::WebP
    ) {
        return Err(PackshotError::decode(format!(
            "unsupported image format {format:?}"
        )));
    }

    let dyn_img = image::load_from_memory_with_format(bytes, format)?;
    let rgba = dyn_img.to_rgba8();
    tracing::debug!(
        ?format,
        width = rgba.width(),
        height = rgba.height(),
        "decoded image"
    );
    Ok(RasterImage::from(rgba))
}

/// Extract the payload of a `data:` URI.
///
/// Base64 payloads (`;base64,`) are decoded; anything else is taken as raw bytes.
pub fn decode_data_uri(uri: &str) -> PackshotResult<Vec<u8>> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .or_else(|| uri.trim().strip_prefix("DATA:"))
        .ok_or_else(|| PackshotError::decode("data uri must start with 'data:'"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PackshotError::decode("data uri is missing ',' separator"))?;

    let is_base64 = meta
        .split(';')
        .any(|p| p.trim().eq_ignore_ascii_case("base64"));
    let bytes = if is_base64 {
        let cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned.as_bytes())
            .map_err(|e| PackshotError::decode(format!("data uri base64: {e}")))?
    } else {
        payload.as_bytes().to_vec()
    };

    if bytes.is_empty() {
        return Err(PackshotError::decode("data uri has an empty payload"));
    }
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
