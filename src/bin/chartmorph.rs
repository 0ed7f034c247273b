use std::{
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chartmorph::{AnimationSession, ShapeSpec, Story};
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "chartmorph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a story JSON file.
    Validate(ValidateArgs),
    /// Print resolved frames of the transition between two steps, one JSON object per line.
    Frames(FramesArgs),
    /// Print the encoded SVG path of a single shape.
    Encode(EncodeArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input story JSON.
    #[arg(long)]
    story: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input story JSON.
    #[arg(long)]
    story: PathBuf,

    /// Index of the step to start from.
    #[arg(long, default_value_t = 0)]
    from: usize,

    /// Index of the step to morph to.
    #[arg(long, default_value_t = 1)]
    to: usize,

    /// Number of evenly spaced samples, including both ends.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    frames: u32,

    /// Apply the story's easing curve to each sample.
    #[arg(long, default_value_t = false)]
    eased: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeKind {
    Rect,
    Circle,
    Wedge,
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    #[arg(long, value_enum)]
    kind: ShapeKind,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    x: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    y: f64,
    #[arg(long, default_value_t = 0.0)]
    width: f64,
    #[arg(long, default_value_t = 0.0)]
    height: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    cx: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    cy: f64,
    #[arg(long, default_value_t = 0.0)]
    r: f64,
    /// Radians, 0 at twelve o'clock, clockwise.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    start_angle: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    end_angle: f64,

    /// Hand-drawn wobble.
    #[arg(long, default_value_t = false)]
    cartoonize: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Encode(args) => cmd_encode(args),
    }
}

fn load_story(path: &Path) -> anyhow::Result<Story> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read story '{}'", path.display()))?;
    Story::from_json_str(&json).with_context(|| format!("load story '{}'", path.display()))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let story = load_story(&args.story)?;
    println!("ok: {} steps", story.steps.len());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let story = load_story(&args.story)?;
    let from = story.step(args.from)?;
    let to = story.step(args.to)?;
    let session = AnimationSession::morph(story.options.clone(), from, to)?;
    let playback = story.options.playback()?;

    let mut out = BufWriter::new(std::io::stdout().lock());
    let last = f64::from(args.frames - 1);
    for i in 0..args.frames {
        let linear = if args.frames == 1 {
            1.0
        } else {
            f64::from(i) / last
        };
        let t = if args.eased {
            playback.progress_at(linear * playback.duration_ms)
        } else {
            linear
        };
        let Some(frame) = session.frame(t) else {
            anyhow::bail!("no transition to sample");
        };
        serde_json::to_writer(&mut out, &frame).context("serialize frame")?;
        out.write_all(b"\n").context("write frame")?;
    }
    out.flush().context("flush output")?;
    Ok(())
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let spec = match args.kind {
        ShapeKind::Rect => ShapeSpec::Rect {
            x: args.x,
            y: args.y,
            width: args.width,
            height: args.height,
        },
        ShapeKind::Circle => ShapeSpec::Circle {
            cx: args.cx,
            cy: args.cy,
            r: args.r,
        },
        ShapeKind::Wedge => ShapeSpec::Wedge {
            cx: args.cx,
            cy: args.cy,
            r: args.r,
            start_angle: args.start_angle,
            end_angle: args.end_angle,
        },
    };
    spec.validate()?;
    println!("{}", chartmorph::encode(&spec, args.cartoonize));
    Ok(())
}
