//! Compositing pipeline: key the product, place it, paint shadows, draw it, flatten.

use std::path::Path;

use anyhow::Context;

use crate::{
    effects::shadow::paint_shadows,
    encode::output::{DEFAULT_JPEG_QUALITY, EncodedImage, OutputFormat, finalize},
    foundation::core::{CompositingSpec, DrawRect},
    foundation::error::{PackshotError, PackshotResult},
    foundation::raster::RasterImage,
    keying::classify::{CutoutKind, prepare_cutout},
    layout::placement::place,
    render::composite::{Resample, draw_over, resample},
};

/// Options for [`composite_product`] and [`compose_ad`].
///
/// Every field has a default, so partial JSON objects are accepted.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositeOptions {
    /// How the product image must be keyed before placement.
    pub cutout: CutoutKind,
    /// Crop fully transparent padding off the cutout before placement.
    pub trim_transparent: bool,
    /// Paint ambient/contact/core shadows under the product.
    pub shadows: bool,
    /// Sampling used when scaling the product (and a mismatched background).
    pub resample: Resample,
    /// Output encoding.
    pub output: OutputFormat,
    /// JPEG quality, `1..=100`.
    pub jpeg_quality: u8,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            cutout: CutoutKind::Clean,
            trim_transparent: false,
            shadows: true,
            resample: Resample::Bilinear,
            output: OutputFormat::Jpeg,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl CompositeOptions {
    /// Parse options from a JSON string.
    pub fn from_json_str(s: &str) -> PackshotResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| PackshotError::validation(format!("composite options json: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Read and parse options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> PackshotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read composite options '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> PackshotResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(PackshotError::validation("jpeg_quality must be in 1..=100"));
        }
        Ok(())
    }
}

/// Where the product ended up, relative to the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Final draw rect of the product.
    pub draw: DrawRect,
    /// True when the target box reaches past the canvas edge and drawing is clipped.
    pub clipped: bool,
}

/// Solve placement of a product of `product` size for `spec`.
pub fn plan_placement(product: &RasterImage, spec: &CompositingSpec) -> Placement {
    let target = spec.product_position;
    let clipped = target.exceeds(spec.canvas_width, spec.canvas_height);
    if clipped {
        tracing::warn!(
            ?target,
            canvas_width = spec.canvas_width,
            canvas_height = spec.canvas_height,
            "product position exceeds canvas; clipping"
        );
    }
    Placement {
        draw: place(product.size(), target),
        clipped,
    }
}

/// Composite `product` onto `background` as described by `spec`.
///
/// The background is resampled to the spec's canvas size when they differ. The product is keyed
/// according to `opts.cutout`, placed bottom-anchored, shadowed, then drawn. The result may still
/// carry transparency if the background did; [`compose_ad`] flattens it.
#[tracing::instrument(skip_all, fields(
    canvas_width = spec.canvas_width,
    canvas_height = spec.canvas_height,
    cutout = ?opts.cutout,
))]
pub fn composite_product(
    background: RasterImage,
    product: RasterImage,
    spec: &CompositingSpec,
    opts: &CompositeOptions,
) -> PackshotResult<RasterImage> {
    spec.validate()?;

    let mut canvas = fit_background(background, spec, opts.resample);

    let mut product = prepare_cutout(product, opts.cutout);
    if opts.trim_transparent {
        product = product.trim_transparent();
    }

    let placement = plan_placement(&product, spec);
    tracing::debug!(
        x = placement.draw.x0,
        y = placement.draw.y0,
        w = placement.draw.width(),
        h = placement.draw.height(),
        "placed product"
    );

    if opts.shadows {
        paint_shadows(&mut canvas, placement.draw);
    }
    draw_over(&mut canvas, &product, placement.draw, opts.resample);
    Ok(canvas)
}

/// [`composite_product`] followed by flattening and encoding.
pub fn compose_ad(
    background: RasterImage,
    product: RasterImage,
    spec: &CompositingSpec,
    opts: &CompositeOptions,
) -> PackshotResult<EncodedImage> {
    opts.validate()?;
    let canvas = composite_product(background, product, spec, opts)?;
    finalize(&canvas, opts.output, opts.jpeg_quality)
}

/// Why a best-effort composition fell back to the bare background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fallback {
    /// Error category, see [`PackshotError::kind`].
    pub kind: &'static str,
    /// Human-readable cause.
    pub reason: String,
}

impl Fallback {
    fn from_error(err: &PackshotError) -> Self {
        Self {
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

/// Output of [`compose_best_effort`].
#[derive(Clone, Debug)]
pub struct Composed {
    /// Encoded, alpha-free image.
    pub image: EncodedImage,
    /// Set when the product could not be composited and the background was delivered alone.
    pub fallback: Option<Fallback>,
}

impl Composed {
    /// True when the product made it into the image.
    pub fn is_composited(&self) -> bool {
        self.fallback.is_none()
    }
}

/// Composite when possible, otherwise deliver the generated background as-is.
///
/// A missing or undecodable product, or an unusable spec, never blocks delivery: the background
/// is flattened and encoded alone and the cause is reported in [`Composed::fallback`]. Errors that
/// are not [recoverable](PackshotError::is_recoverable), and failures to encode the output itself,
/// are returned as errors.
pub fn compose_best_effort(
    background: RasterImage,
    product: PackshotResult<RasterImage>,
    spec: &CompositingSpec,
    opts: &CompositeOptions,
) -> PackshotResult<Composed> {
    opts.validate()?;

    let attempt = product.and_then(|p| spec.validate().map(|()| p));
    let (canvas, fallback) = match attempt {
        Ok(product) => (composite_product(background, product, spec, opts)?, None),
        Err(err) if !err.is_recoverable() => return Err(err),
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "compositing skipped; using background as-is");
            let canvas = match spec.validate() {
                Ok(()) => fit_background(background, spec, opts.resample),
                Err(_) => background,
            };
            (canvas, Some(Fallback::from_error(&err)))
        }
    };

    let image = finalize(&canvas, opts.output, opts.jpeg_quality)?;
    Ok(Composed { image, fallback })
}

fn fit_background(background: RasterImage, spec: &CompositingSpec, mode: Resample) -> RasterImage {
    if background.size() == spec.canvas() {
        return background;
    }
    tracing::debug!(
        from_w = background.width(),
        from_h = background.height(),
        to_w = spec.canvas_width,
        to_h = spec.canvas_height,
        "resampling background to canvas size"
    );
    if background.width() == 0 || background.height() == 0 {
        return RasterImage::filled(spec.canvas_width, spec.canvas_height, [255, 255, 255, 255]);
    }
    resample(&background, spec.canvas_width, spec.canvas_height, mode)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
