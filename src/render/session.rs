use crate::{
    assets::loader::{ImageLoader, LoaderConfig},
    assets::source::ImageSource,
    foundation::core::CompositingSpec,
    foundation::error::{PackshotError, PackshotResult},
    render::pipeline::{CompositeOptions, Composed, compose_best_effort},
};

/// Loads sources and runs best-effort composition with fixed options.
///
/// A `Compositor` holds no per-request state; one instance can serve requests from many threads.
pub struct Compositor {
    loader: ImageLoader,
    opts: CompositeOptions,
    pool: Option<rayon::ThreadPool>,
}

impl Compositor {
    /// Build a compositor running pixel work on the global rayon pool.
    pub fn new(loader: LoaderConfig, opts: CompositeOptions) -> PackshotResult<Self> {
        opts.validate()?;
        Ok(Self {
            loader: ImageLoader::new(loader)?,
            opts,
            pool: None,
        })
    }

    /// Run pixel work on a dedicated pool of `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> PackshotResult<Self> {
        self.pool = Some(build_thread_pool(threads)?);
        Ok(self)
    }

    /// Active options.
    pub fn options(&self) -> &CompositeOptions {
        &self.opts
    }

    /// Load both images and composite them.
    ///
    /// The background is required: failing to load it is an error. A product that cannot be
    /// loaded degrades to delivering the background alone.
    #[tracing::instrument(skip_all, fields(
        background = %background.describe(),
        product = %product.describe(),
    ))]
    pub fn compose_sources(
        &self,
        background: &ImageSource,
        product: &ImageSource,
        spec: &CompositingSpec,
    ) -> PackshotResult<Composed> {
        let bg = self.loader.load(background)?;
        let product = self.loader.load(product);
        self.run(|| compose_best_effort(bg, product, spec, &self.opts))
    }

    fn run<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}

fn build_thread_pool(threads: usize) -> PackshotResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(PackshotError::validation("thread count must be > 0"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("packshot-{i}"))
        .build()
        .map_err(|e| PackshotError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/session.rs"]
mod tests;
