use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "packshot", version)]
struct Cli {
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a product into a generated background.
    Compose(ComposeArgs),
    /// Key a product photo into a transparent PNG cutout.
    Key(KeyArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Background scene: file path, http(s) URL or data URI.
    #[arg(long)]
    background: String,

    /// Product image: file path, http(s) URL or data URI.
    #[arg(long)]
    product: String,

    /// Compositing spec JSON (`canvasWidth`, `canvasHeight`, `productPosition`).
    #[arg(long)]
    spec: PathBuf,

    /// Optional composite options JSON; CLI flags below override it.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Output file.
    #[arg(long)]
    out: PathBuf,

    /// How the product photo was shot.
    #[arg(long, value_enum)]
    cutout: Option<CutoutArg>,

    /// Output encoding.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// JPEG quality (1-100).
    #[arg(long)]
    quality: Option<u8>,

    /// Skip contact shadows.
    #[arg(long, default_value_t = false)]
    no_shadows: bool,

    /// Crop transparent padding off the cutout before placing it.
    #[arg(long, default_value_t = false)]
    trim: bool,

    /// Remote fetch timeout in milliseconds.
    #[arg(long, default_value_t = 15_000)]
    timeout_ms: u64,

    /// Worker threads for pixel work (defaults to rayon's choice).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct KeyArgs {
    /// Product photo: file path, http(s) URL or data URI.
    #[arg(long = "in")]
    input: String,

    /// Background to strip.
    #[arg(long, value_enum)]
    mode: KeyMode,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CutoutArg {
    Clean,
    Green,
    White,
}

impl From<CutoutArg> for packshot::CutoutKind {
    fn from(value: CutoutArg) -> Self {
        match value {
            CutoutArg::Clean => Self::Clean,
            CutoutArg::Green => Self::GreenScreen,
            CutoutArg::White => Self::WhiteBackground,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for packshot::OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Jpeg => Self::Jpeg,
            FormatArg::Png => Self::Png,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyMode {
    Green,
    White,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Key(args) => cmd_key(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let spec = packshot::CompositingSpec::from_path(&args.spec)?;

    let mut opts = match &args.options {
        Some(path) => packshot::CompositeOptions::from_path(path)?,
        None => packshot::CompositeOptions::default(),
    };
    if let Some(c) = args.cutout {
        opts.cutout = c.into();
    }
    if let Some(f) = args.format {
        opts.output = f.into();
    }
    if let Some(q) = args.quality {
        opts.jpeg_quality = q;
    }
    if args.no_shadows {
        opts.shadows = false;
    }
    if args.trim {
        opts.trim_transparent = true;
    }

    let loader = packshot::LoaderConfig {
        timeout_ms: args.timeout_ms,
        ..packshot::LoaderConfig::default()
    };
    let mut compositor = packshot::Compositor::new(loader, opts)?;
    if let Some(threads) = args.threads {
        compositor = compositor.with_threads(threads)?;
    }

    let composed = compositor.compose_sources(
        &packshot::ImageSource::parse(&args.background),
        &packshot::ImageSource::parse(&args.product),
        &spec,
    )?;
    if let Some(fallback) = &composed.fallback {
        tracing::warn!(
            kind = fallback.kind,
            reason = %fallback.reason,
            "wrote background without product"
        );
    }

    write_output(&args.out, &composed.image.bytes)?;
    eprintln!(
        "wrote {} ({}, {}x{})",
        args.out.display(),
        composed.image.mime,
        composed.image.width,
        composed.image.height
    );
    Ok(())
}

fn cmd_key(args: KeyArgs) -> anyhow::Result<()> {
    let loader = packshot::ImageLoader::new(packshot::LoaderConfig::default())?;
    let mut img = loader.load(&packshot::ImageSource::parse(&args.input))?;
    match args.mode {
        KeyMode::Green => packshot::chroma_key_green(&mut img),
        KeyMode::White => packshot::remove_white_background(&mut img),
    }

    let (w, h) = (img.width(), img.height());
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        img.as_raw(),
        w,
        h,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
