use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use blockworld_control::Controller;
use blockworld_input::{InputMapper, Intent, Key, PadButton};
use blockworld_kernel::WorldModel;
use blockworld_persist::{MapFormat, load_world, save_world};
use blockworld_render::{
    BuilderVariant, DebugTextRenderer, RenderView, Renderer, SpriteRenderer, ViewConfig,
};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockworld-cli", about = "CLI for block world maps")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// View configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RenderFormat {
    /// Top-down character grid
    Text,
    /// Isometric draw instructions, one per line
    Draws,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Render the view around the builder
    Render {
        map: PathBuf,
        /// Draw the builder with a hat
        #[arg(long)]
        hat: bool,
        #[arg(short, long, value_enum, default_value = "text")]
        format: RenderFormat,
    },
    /// Play a map with text commands from a script or stdin.
    ///
    /// Besides the intent commands, `w`/`a`/`s`/`d` press keys,
    /// `up`/`left`/`down`/`right` press the direction pad and `mode` toggles
    /// whether the pad moves blocks.
    Play {
        map: PathBuf,
        /// Read commands from this file instead of stdin
        #[arg(short, long)]
        script: Option<PathBuf>,
        /// Print the view after every command
        #[arg(long)]
        show: bool,
    },
    /// Load a map and report what it contains
    Validate { map: PathBuf },
    /// Convert a map between text and JSON (picked by extension)
    Convert { input: PathBuf, output: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ViewConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("blockworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", blockworld_kernel::crate_info());
            println!("persist: {}", blockworld_persist::crate_info());
            println!("render: {}", blockworld_render::crate_info());
            println!("input: {}", blockworld_input::crate_info());
            println!("control: {}", blockworld_control::crate_info());
            println!(
                "view: radius={} ({} cells)",
                config.radius,
                config.windower().cell_count()
            );
        }
        Commands::Render { map, hat, format } => {
            let world = load_world(&map).with_context(|| format!("loading {}", map.display()))?;
            let variant = if hat {
                BuilderVariant::Hat
            } else {
                BuilderVariant::Plain
            };
            let view = RenderView::new(world.builder_position()).with_variant(variant);
            match format {
                RenderFormat::Text => {
                    print!("{}", DebugTextRenderer::new(config.windower()).render(&world, &view));
                }
                RenderFormat::Draws => {
                    let list = SpriteRenderer::new(config).render(&world, &view);
                    for draw in list.iter() {
                        println!("{} {} {}", draw.rect.x, draw.rect.y, draw.sprite.name());
                    }
                }
            }
        }
        Commands::Play { map, script, show } => {
            let input: Box<dyn BufRead> = match &script {
                Some(path) => Box::new(BufReader::new(
                    std::fs::File::open(path)
                        .with_context(|| format!("opening script {}", path.display()))?,
                )),
                None => Box::new(std::io::stdin().lock()),
            };
            play(config, map, input, show)?;
        }
        Commands::Validate { map } => {
            let world = load_world(&map).with_context(|| format!("loading {}", map.display()))?;
            println!("Map: {} ({:?})", map.display(), MapFormat::from_path(&map));
            println!("Builder: {} at {}", world.builder().name, world.builder_position());
            println!("Tiles: {}", world.tile_count());
            let inventory: Vec<String> = world.inventory().iter().map(|k| k.to_string()).collect();
            println!("Inventory: [{}]", inventory.join(", "));
            println!("State hash: {:#018x}", world.state_hash());
        }
        Commands::Convert { input, output } => {
            let world =
                load_world(&input).with_context(|| format!("loading {}", input.display()))?;
            save_world(&world, &output).with_context(|| format!("saving {}", output.display()))?;
            println!(
                "Converted {} -> {} ({} tiles)",
                input.display(),
                output.display(),
                world.tile_count()
            );
        }
    }

    Ok(())
}

fn read_config(path: &Path) -> anyhow::Result<ViewConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ViewConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(radius = config.radius, "view config loaded");
    Ok(config)
}

fn play(config: ViewConfig, map: PathBuf, input: impl BufRead, show: bool) -> anyhow::Result<()> {
    let text_view = DebugTextRenderer::new(config.windower());
    let mut controller = Controller::new(config);
    let mut mapper = InputMapper::new();

    let loaded = controller.handle(Intent::Load(map));
    println!("{loaded}");
    if let Some(notice) = controller.take_notice() {
        anyhow::bail!("{}: {}", notice.title, notice.detail);
    }

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let command = line.trim().to_ascii_lowercase();
        if command == "mode" {
            let on = mapper.toggle_move_block_mode();
            println!("Pad moves {}", if on { "blocks" } else { "the builder" });
            continue;
        }
        let pressed = pad_button(&command)
            .map(|button| mapper.button(button))
            .or_else(|| key(&command).map(|key| mapper.key(key)));
        let intent: Intent = match pressed {
            Some(intent) => intent,
            None => match line.parse() {
                Ok(intent) => intent,
                Err(e) => {
                    println!("? {e}");
                    continue;
                }
            },
        };
        let outcome = controller.handle(intent);
        println!("> {line}\n{outcome}");
        if let Some(notice) = controller.take_notice() {
            println!("[{}] {}", notice.title, notice.body);
        }
        if show {
            print_view(&controller, &text_view);
        }
    }

    print_view(&controller, &text_view);
    Ok(())
}

fn pad_button(command: &str) -> Option<PadButton> {
    match command {
        "up" => Some(PadButton::Up),
        "left" => Some(PadButton::Left),
        "down" => Some(PadButton::Down),
        "right" => Some(PadButton::Right),
        _ => None,
    }
}

fn key(command: &str) -> Option<Key> {
    let mut chars = command.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Key::from_char(c),
        _ => None,
    }
}

fn print_view(controller: &Controller, renderer: &DebugTextRenderer) {
    let (Some(session), Some(panel)) = (controller.dispatcher().session(), controller.panel())
    else {
        return;
    };
    let view = RenderView::new(session.center).with_variant(controller.variant());
    print!("{}", renderer.render(&session.world, &view));
    let slots: Vec<String> = panel
        .inventory
        .iter()
        .map(|e| format!("{}:{}", e.index, e.kind))
        .collect();
    println!("Inventory: [{}]", slots.join(", "));
    println!("{}", panel.selection_label);
    println!("{}", panel.status);
}
