use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{PackshotError, PackshotResult};

pub use kurbo::{Point, Rect, Vec2};

/// Final destination rectangle of a placed image, in canvas pixels.
///
/// Edges are stored explicitly (`x0,y0,x1,y1`) so the bottom edge `y1` is carried exactly.
pub type DrawRect = Rect;

/// Natural (intrinsic) size of an image in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Build a size from width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height; `None` for degenerate sizes.
    pub fn aspect(self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(f64::from(self.width) / f64::from(self.height))
    }
}

/// Axis-aligned box in destination-canvas pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Build a rect from its origin and extent.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Width divided by height; `None` for degenerate rects.
    pub fn aspect(self) -> Option<f64> {
        Size::new(self.width, self.height).aspect()
    }

    /// True when any part of the rect lies outside a `canvas_w x canvas_h` canvas.
    pub fn exceeds(self, canvas_w: u32, canvas_h: u32) -> bool {
        self.x < 0
            || self.y < 0
            || self.right() > i64::from(canvas_w)
            || self.bottom() > i64::from(canvas_h)
    }

    /// Portion of the rect inside a `canvas_w x canvas_h` canvas, if any.
    pub fn intersect(self, canvas_w: u32, canvas_h: u32) -> Option<PixelRect> {
        let x0 = i64::from(self.x).max(0);
        let y0 = i64::from(self.y).max(0);
        let x1 = self.right().min(i64::from(canvas_w));
        let y1 = self.bottom().min(i64::from(canvas_h));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0 as i32,
            y: y0 as i32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// The same box as floating point edges.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            self.right() as f64,
            self.bottom() as f64,
        )
    }
}

/// Where the product must land on a previously generated background.
///
/// Produced by the scene-generation stage as JSON with camelCase keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositingSpec {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Target box for the product.
    pub product_position: PixelRect,
}

impl CompositingSpec {
    /// Parse a spec from a JSON string.
    pub fn from_json_str(s: &str) -> PackshotResult<Self> {
        let spec: Self = serde_json::from_str(s)
            .map_err(|e| PackshotError::validation(format!("compositing spec json: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Read and parse a spec from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PackshotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read compositing spec '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject specs that cannot produce any output.
    ///
    /// Rects that exceed the canvas are accepted; they are clipped when drawn.
    pub fn validate(&self) -> PackshotResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PackshotError::validation("canvas dimensions must be > 0"));
        }
        if self.product_position.width == 0 || self.product_position.height == 0 {
            return Err(PackshotError::validation(
                "productPosition width and height must be > 0",
            ));
        }
        Ok(())
    }

    /// Canvas size.
    pub fn canvas(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
