use clap::{Args, Parser, Subcommand};
use rand::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yggdrasil::export::{self, ExportFormat};
use yggdrasil::presets::{self, PRESETS};
use yggdrasil::settings::Settings;
use yggdrasil::terminal::Terminal;
use yggdrasil::{engine, schemes, Result, Scene, TreeConfig};

#[derive(Parser)]
#[command(name = "yggdrasil")]
#[command(version)]
#[command(about = "Procedural fractal trees rendered to PNG, SVG and the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a tree to a PNG or SVG file
    Render {
        #[command(flatten)]
        tree: TreeArgs,

        /// Output format: png-1x, png-2x, png-4x or svg
        #[arg(short, long, default_value = "png-1x")]
        format: String,

        /// Output file (defaults to yggdrasil-tree-<format> in the configured output dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a tree to the terminal
    Print {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// List available color schemes
    Schemes,

    /// List tree presets
    Presets,
}

#[derive(Args)]
struct TreeArgs {
    /// TOML or JSON tree config; missing fields take defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset to apply on top of the config (see `presets`)
    #[arg(short, long)]
    preset: Option<String>,

    /// Color scheme name (see `schemes`)
    #[arg(long)]
    scheme: Option<String>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum render depth
    #[arg(short, long)]
    depth: Option<u32>,

    /// Minimum branch length in pixels
    #[arg(short = 'm', long)]
    min_length: Option<f64>,

    /// Base branch angle in degrees
    #[arg(short, long)]
    angle: Option<f64>,

    /// Zoom level around the canvas center
    #[arg(short, long)]
    zoom: Option<f64>,

    /// Show pruned branches as faded dashes
    #[arg(long)]
    pruning: bool,

    /// Use the bushier alternative branching and survival tables
    #[arg(long)]
    alternative: bool,

    /// Shrink branches faster at shallow depth
    #[arg(long)]
    accelerated: bool,

    /// Hide node circles
    #[arg(long)]
    no_nodes: bool,

    /// Plain trunk without bark texture
    #[arg(long)]
    no_texture: bool,
}

impl TreeArgs {
    fn build_config(&self, settings: &Settings) -> Result<TreeConfig> {
        let mut config = match &self.config {
            Some(path) => TreeConfig::load(path)?,
            None => TreeConfig::default(),
        };

        if self.config.is_none() {
            if let Some(scheme) = &settings.default_scheme {
                config.color_scheme = scheme.clone();
            }
        }
        if self.alternative {
            config = config.with_alternative_tables();
        }
        if let Some(name) = &self.preset {
            presets::find(name)?.apply(&mut config);
        }
        if let Some(scheme) = &self.scheme {
            config.color_scheme = scheme.clone();
        }
        if let Some(depth) = self.depth {
            config.max_depth_render = depth;
        }
        if let Some(min_length) = self.min_length {
            config.min_branch_length = min_length;
        }
        if let Some(angle) = self.angle {
            config.base_angle = angle;
        }
        if let Some(zoom) = self.zoom {
            config.zoom_level = zoom;
        }
        config.show_pruning |= self.pruning;
        config.accelerated_decay |= self.accelerated;
        if self.no_nodes {
            config.show_nodes = false;
        }
        if self.no_texture {
            config.trunk_texture = false;
        }

        Ok(config)
    }

    fn render(&self, settings: &Settings) -> Result<Scene> {
        let config = self.build_config(settings)?;
        let seed = self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0) // Fallback seed for misconfigured system clocks
        });
        info!(seed, scheme = %config.color_scheme, depth = config.max_depth_render, "rendering tree");

        let mut rng = StdRng::seed_from_u64(seed);
        Ok(engine::render(&config, &settings.scheme_book(), &mut rng))
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load();

    match cli.command {
        Commands::Render { tree, format, output } => {
            let format: ExportFormat = format.parse()?;
            let scene = tree.render(&settings)?;
            let path = output.unwrap_or_else(|| {
                settings
                    .output_dir
                    .clone()
                    .unwrap_or_default()
                    .join(format.default_file_name())
            });
            export::write(&scene, format, &path)?;
            println!("{}", path.display());
        }
        Commands::Print { tree } => {
            let scene = tree.render(&settings)?;
            let mut term = Terminal::new()?;
            term.draw_scene(&scene)?;
            term.print_to_stdout()?;
        }
        Commands::Schemes => {
            let book = settings.scheme_book();
            for (name, scheme) in book.iter() {
                let stops: Vec<String> = scheme.gradient.iter().map(|s| s.color.to_string()).collect();
                match schemes::custom_label(name) {
                    Some(label) => println!("{:<12} {} ({})", name, stops.join(" "), label),
                    None => println!("{:<12} {}", name, stops.join(" ")),
                }
            }
        }
        Commands::Presets => {
            for preset in PRESETS {
                println!(
                    "{:<16} scheme={:<8} stem={} initial={} decay={} angle={}",
                    preset.slug(),
                    preset.scheme,
                    preset.stem_length,
                    preset.initial_length,
                    preset.length_decay,
                    preset.base_angle
                );
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("yggdrasil=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
