use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rectanim", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the animation as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Run the animation headlessly and print lifecycle events as JSON lines.
    Events(EventsArgs),
}

#[derive(Parser, Debug)]
struct SurfaceArgs {
    /// View configuration JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Surface width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Clock rate in frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Wall-clock span to simulate.
    #[arg(long, default_value_t = 7200)]
    duration_ms: u64,

    /// Simulate a host without pause support (`stop` cancels).
    #[arg(long)]
    no_pause: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Output directory for `frame_NNNNN.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct EventsArgs {
    #[command(flatten)]
    surface: SurfaceArgs,

    /// Call `stop` once the clock reaches this time.
    #[arg(long)]
    stop_at_ms: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Events(args) => cmd_events(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<rectanim::ViewConfig> {
    match path {
        Some(path) => rectanim::ViewConfig::from_json_path(path)
            .with_context(|| format!("load view config '{}'", path.display())),
        None => Ok(rectanim::ViewConfig::default()),
    }
}

fn make_driver(args: &SurfaceArgs) -> anyhow::Result<rectanim::HeadlessDriver> {
    let config = read_config(args.config.as_deref())?;
    let caps = rectanim::HostCaps {
        supports_pause: !args.no_pause,
    };
    let fps = rectanim::Fps::new(args.fps, 1)?;
    let size = rectanim::Size::new(args.width, args.height);
    Ok(rectanim::HeadlessDriver::new(config, caps, size, fps)?)
}

fn make_backend(choice: BackendChoice) -> anyhow::Result<Box<dyn rectanim::RenderBackend>> {
    let kind = match choice {
        BackendChoice::Cpu => rectanim::BackendKind::Cpu,
    };

    Ok(rectanim::create_backend(
        kind,
        &rectanim::RenderSettings::default(),
    )?)
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut driver = make_driver(&args.surface)?;
    let mut backend = make_backend(args.backend)?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let total = driver
        .fps()
        .frames_in(Duration::from_millis(args.surface.duration_ms))
        .max(1);
    for idx in 0..total {
        if idx > 0 {
            driver.step();
        }
        let frame = driver
            .render(backend.as_mut())
            .with_context(|| format!("render frame {idx}"))?;
        let path = args.out.join(format!("frame_{idx:05}.png"));
        image::save_buffer_with_format(
            &path,
            &frame.to_straight_rgba8(),
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
    }

    eprintln!("wrote {total} frames to {}", args.out.display());
    Ok(())
}

fn cmd_events(args: EventsArgs) -> anyhow::Result<()> {
    let mut driver = make_driver(&args.surface)?;
    let end = Duration::from_millis(args.surface.duration_ms);

    if let Some(stop_at) = args.stop_at_ms.map(Duration::from_millis) {
        driver.run_until(stop_at.min(end));
        driver.view_mut().stop();
    }
    driver.run_until(end);

    for event in driver.events() {
        println!(
            "{}",
            serde_json::to_string(&event).context("serialize event")?
        );
    }
    Ok(())
}
