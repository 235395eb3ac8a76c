use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use looper::{
    ConfigStore, Handled, IterationConfig, JsonFileStore, LooperEngine, MemoryScene, MemoryStore,
    PanelMessage, SceneDoc, SceneGraph,
};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

#[derive(Parser, Debug)]
#[command(name = "looper", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a loop inside a JSON scene document.
    Generate(GenerateArgs),
    /// Print the per-iteration values of a scalar ramp.
    Ramp(RampArgs),
    /// Normalize a hex color and print it back.
    Color(ColorArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Iteration config JSON.
    #[arg(long)]
    config: PathBuf,

    /// Name of the base node. Defaults to the scene's own selection.
    #[arg(long)]
    node: Option<String>,

    /// Output scene JSON.
    #[arg(long)]
    out: PathBuf,

    /// Persist the config as the last used one in this store file.
    #[arg(long)]
    store: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RampArgs {
    /// Value at the first iteration.
    #[arg(long, allow_negative_numbers = true)]
    start: f64,

    /// Value at the last iteration.
    #[arg(long, allow_negative_numbers = true)]
    end: f64,

    /// Number of iterations.
    #[arg(long)]
    iterations: u32,
}

#[derive(Parser, Debug)]
struct ColorArgs {
    /// Hex color, with or without a leading '#'.
    hex: String,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Ramp(args) => cmd_ramp(args),
        Command::Color(args) => cmd_color(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    let value = serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))?;
    Ok(value)
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let doc: SceneDoc = read_json(&args.scene, "scene")?;
    let config: IterationConfig = read_json(&args.config, "config")?;

    let mut scene = MemoryScene::from_doc(&doc).context("build scene")?;
    if let Some(name) = &args.node {
        let node = scene
            .find_by_name(name)
            .with_context(|| format!("no node named '{name}'"))?;
        scene.set_selection(vec![node]);
    }

    let scene = match &args.store {
        Some(path) => run_create(scene, JsonFileStore::new(path), config)?,
        None => run_create(scene, MemoryStore::new(), config)?,
    };

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let out = scene.to_doc().context("export scene")?;
    let f = File::create(&args.out)
        .with_context(|| format!("create scene '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(f, &out)
        .with_context(|| format!("write scene '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn run_create<C: ConfigStore>(
    scene: MemoryScene,
    store: C,
    config: IterationConfig,
) -> anyhow::Result<MemoryScene> {
    let mut engine = LooperEngine::new(scene, store);
    match engine.handle(PanelMessage::Create(config))? {
        Handled::Generated { focus, .. } => {
            let copies = engine.session().generated().len();
            eprintln!(
                "generated {copies} copies; bounds x={} y={} w={} h={}",
                focus.x, focus.y, focus.width, focus.height
            );
        }
        _ => anyhow::bail!("selection cannot be looped: select exactly one shape or group"),
    }
    let (scene, _) = engine.into_parts();
    Ok(scene)
}

fn cmd_ramp(args: RampArgs) -> anyhow::Result<()> {
    for i in 0..args.iterations {
        let v = looper::value_at(args.start, args.end, args.iterations, i);
        println!("{i}\t{v}");
    }
    Ok(())
}

fn cmd_color(args: ColorArgs) -> anyhow::Result<()> {
    let rgb = looper::parse_hex_input(&args.hex)
        .with_context(|| format!("invalid hex color '{}'", args.hex))?;
    let hex = looper::rgb_to_hex(rgb).context("color out of range")?;
    println!("{} {} {}", rgb.r, rgb.g, rgb.b);
    println!("{hex}");
    Ok(())
}
