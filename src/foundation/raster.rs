use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{PackshotError, PackshotResult};
use crate::foundation::math::rgba_len;

/// Owned raster buffer: straight (non-premultiplied) RGBA8, row-major, tightly packed.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl RasterImage {
    /// Wrap an existing straight-alpha RGBA8 buffer.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> PackshotResult<Self> {
        let expected = rgba_len(width, height)
            .ok_or_else(|| PackshotError::validation("raster buffer size overflow"))?;
        if data.len() != expected {
            return Err(PackshotError::validation(format!(
                "raster buffer length {} does not match {width}x{height}x4",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A buffer where every pixel is `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            data: rgba.repeat(n),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Natural size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Raw RGBA8 bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume into raw RGBA8 bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    /// Overwrite the pixel at `(x, y)`; out-of-range writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// True when every alpha byte is 255.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 255)
    }

    /// Tight bounding box around pixels with non-zero alpha.
    pub fn alpha_bounds(&self) -> Option<PixelRect> {
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        let mut any = false;
        for (i, px) in self.data.chunks_exact(4).enumerate() {
            if px[3] == 0 {
                continue;
            }
            let x = (i % self.width as usize) as u32;
            let y = (i / self.width as usize) as u32;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            any = true;
        }
        if !any {
            return None;
        }
        Some(PixelRect::new(
            min_x as i32,
            min_y as i32,
            max_x - min_x + 1,
            max_y - min_y + 1,
        ))
    }

    /// Copy out the part of the image covered by `rect` (clipped to the buffer).
    pub fn crop(&self, rect: PixelRect) -> PackshotResult<Self> {
        let r = rect
            .intersect(self.width, self.height)
            .ok_or_else(|| PackshotError::validation("crop rect lies outside the image"))?;
        let row_len = r.width as usize * 4;
        let mut data = Vec::with_capacity(row_len * r.height as usize);
        for y in r.y as u32..(r.y as u32 + r.height) {
            let start = self.index(r.x as u32, y);
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        Self::new(r.width, r.height, data)
    }

    /// Trim fully transparent padding; returns `self` unchanged when nothing is visible.
    pub fn trim_transparent(self) -> Self {
        match self.alpha_bounds() {
            Some(b) if b.width != self.width || b.height != self.height => {
                self.crop(b).unwrap_or(self)
            }
            _ => self,
        }
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

impl From<image::RgbaImage> for RasterImage {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

impl From<RasterImage> for image::RgbaImage {
    fn from(img: RasterImage) -> Self {
        let RasterImage {
            width,
            height,
            data,
        } = img;
        // Length is checked on construction.
        image::RgbaImage::from_raw(width, height, data)
            .unwrap_or_else(|| image::RgbaImage::new(width, height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/raster.rs"]
mod tests;
