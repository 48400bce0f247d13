use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgGroup, Parser, ValueEnum};
use viewer_sink::{
    BackendKind, CompositingRegion, PixelBuffer, RenderSettings, SinkConfig, SinkInputs,
    ViewerSink, decode_alpha, decode_color, to_rgba8_image,
};

#[derive(Parser, Debug)]
#[command(name = "viewer-sink", version, about = "Run the compositor viewer stage on images")]
#[command(group(ArgGroup::new("image_src").required(true).args(["image", "image_color"])))]
#[command(group(ArgGroup::new("alpha_src").args(["alpha", "alpha_value"])))]
struct Cli {
    /// Color input image.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Constant color input as `r,g,b,a`.
    #[arg(long, value_parser = parse_rgba)]
    image_color: Option<[f32; 4]>,

    /// Alpha input image (luma). Links the alpha socket.
    #[arg(long)]
    alpha: Option<PathBuf>,

    /// Constant alpha input. Links the alpha socket.
    #[arg(long)]
    alpha_value: Option<f32>,

    /// Base configuration JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Force the output alpha to 1.
    #[arg(long, default_value_t = false)]
    ignore_alpha: bool,

    /// Compositing region as `xmin,ymin,xmax,ymax`.
    #[arg(long, value_parser = parse_region)]
    region: Option<CompositingRegion>,

    /// Conform the output to the compositing region.
    #[arg(long, default_value_t = false)]
    composite: bool,

    /// Execution backend.
    #[arg(long, value_enum, default_value_t = BackendArg::Cpu)]
    backend: BackendArg,

    /// Override rayon worker threads (cpu backend only).
    #[arg(long)]
    threads: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Cpu,
    Gpu,
}

impl From<BackendArg> for BackendKind {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Cpu => BackendKind::Cpu,
            BackendArg::Gpu => BackendKind::Gpu,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = build_config(&cli)?;
    let image = load_image(&cli)?;
    let alpha = load_alpha(&cli)?;

    let settings = RenderSettings::default().with_threads(cli.threads);
    let mut sink = ViewerSink::new(cli.backend.into(), &settings)?;
    let Some(output) = sink.render(&SinkInputs::new(&image, &alpha), &config)? else {
        eprintln!("viewer skipped: compositing region is empty");
        return Ok(());
    };
    if output.domain().is_empty() {
        anyhow::bail!(
            "output canvas is empty: constant inputs take their size from the compositing region, \
             pass --region or set compositing_region in --config"
        );
    }

    if let Some(parent) = cli.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    to_rgba8_image(&output)
        .save_with_format(&cli.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", cli.out.display()))?;

    eprintln!("wrote {}", cli.out.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(cli: &Cli) -> anyhow::Result<SinkConfig> {
    let mut config = match &cli.config {
        Some(path) => SinkConfig::from_path(path)?,
        None => SinkConfig::default(),
    };
    if let Some(region) = cli.region {
        config = config.with_fallback_region(region);
    }
    if cli.composite {
        config.treat_as_composite_output = true;
    }
    if cli.ignore_alpha {
        config = config.with_ignore_alpha(true);
    }
    if cli.alpha.is_some() || cli.alpha_value.is_some() {
        config = config.with_alpha_linked(true);
    }
    Ok(config)
}

fn load_image(cli: &Cli) -> anyhow::Result<PixelBuffer> {
    match (&cli.image, cli.image_color) {
        (Some(path), _) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
            Ok(decode_color(&bytes)?)
        }
        (None, Some(color)) => Ok(PixelBuffer::single_color(color)),
        (None, None) => Ok(PixelBuffer::default_image()),
    }
}

fn load_alpha(cli: &Cli) -> anyhow::Result<PixelBuffer> {
    match (&cli.alpha, cli.alpha_value) {
        (Some(path), _) => {
            let bytes =
                std::fs::read(path).with_context(|| format!("read alpha '{}'", path.display()))?;
            Ok(decode_alpha(&bytes)?)
        }
        (None, Some(v)) => Ok(PixelBuffer::single_float(v)),
        (None, None) => Ok(PixelBuffer::default_alpha()),
    }
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated values, got {}", parts.len()));
    }
    let mut out = [0.0f32; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse::<f32>()
            .map_err(|e| format!("invalid number '{part}': {e}"))?;
    }
    Ok(out)
}

fn parse_rgba(s: &str) -> Result<[f32; 4], String> {
    parse_floats::<4>(s)
}

fn parse_region(s: &str) -> Result<CompositingRegion, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [xmin, ymin, xmax, ymax] = parts.as_slice() else {
        return Err(format!("expected xmin,ymin,xmax,ymax, got '{s}'"));
    };
    let int = |v: &str| {
        v.parse::<i32>()
            .map_err(|e| format!("invalid integer '{v}': {e}"))
    };
    Ok(CompositingRegion::new(
        int(*xmin)?,
        int(*ymin)?,
        int(*xmax)?,
        int(*ymax)?,
    ))
}
