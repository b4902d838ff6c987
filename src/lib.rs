//! packshot places a real, unaltered product photo into a generated advertising scene.
//!
//! The generated background is treated as the stage; the product pixels are never synthesized.
//! Everything here is CPU raster work over owned straight-alpha RGBA8 buffers ([`RasterImage`]).
//!
//! # Pipeline overview
//!
//! 1. **Load**: `ImageSource -> RasterImage` ([`ImageLoader`], [`decode_image`])
//! 2. **Key** (optional): strip a green screen or white backdrop into alpha
//!    ([`chroma_key_green`], [`remove_white_background`])
//! 3. **Place**: fit the product into the spec's box, aspect-preserving and bottom-anchored ([`place`])
//! 4. **Shadow**: paint ambient, contact and core shadows at the product's base ([`paint_shadows`])
//! 5. **Composite**: draw the product over the scene with source-over ([`draw_over`])
//! 6. **Finalize**: flatten over white and encode without alpha ([`finalize`])
//!
//! [`compose_best_effort`] and [`Compositor`] wrap the steps so that a failed product never blocks
//! delivery of the background.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No shared state**: every call owns its buffers; calls can run in parallel freely.
//! - **Lenient placement**: boxes past the canvas edge are clipped, never rejected.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod effects;
mod encode;
mod foundation;
mod keying;
mod layout;
mod render;

pub use assets::decode::{decode_data_uri, decode_image};
pub use assets::loader::{ImageLoader, LoaderConfig};
pub use assets::source::ImageSource;
pub use effects::shadow::{
    GradientStop, ShadowKind, ShadowTier, paint_shadows, paint_tier, shadow_tiers,
};
pub use encode::output::{
    DEFAULT_JPEG_QUALITY, EncodedImage, OutputFormat, finalize, flatten_over_white,
};
pub use foundation::core::{CompositingSpec, DrawRect, PixelRect, Point, Rect, Size, Vec2};
pub use foundation::error::{PackshotError, PackshotResult};
pub use foundation::raster::RasterImage;
pub use keying::classify::{
    CutoutKind, chroma_key_alpha, chroma_key_green, prepare_cutout, remove_white_background,
    white_key_alpha,
};
pub use layout::placement::place;
pub use render::composite::{Resample, Rgba8, blend_over, draw_over, over_straight, resample};
pub use render::pipeline::{
    CompositeOptions, Composed, Fallback, Placement, compose_ad, compose_best_effort,
    composite_product, plan_placement,
};
pub use render::session::Compositor;
