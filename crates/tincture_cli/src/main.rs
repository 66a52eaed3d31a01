//! Tincture CLI
//!
//! Inspect the theme catalog, generate runtime themes from an accent color
//! and try out the OS sync rules from the command line.

mod commands;
mod config;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tincture_core::Color;
use tincture_theme::ThemeSyncMode;
use tracing_subscriber::EnvFilter;

use crate::commands::SyncOverrides;
use crate::config::TinctureConfig;

#[derive(Parser, Debug)]
#[command(name = "tincture")]
#[command(about = "Inspect, generate, and sync tincture themes")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./tincture.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every theme in the catalog
    List {
        /// Only high contrast themes
        #[arg(long)]
        high_contrast: bool,
    },

    /// List the known base color schemes and color schemes
    Schemes,

    /// Show a theme's metadata
    Show {
        /// Theme name, e.g. Dark.Green
        name: String,

        #[arg(long)]
        high_contrast: bool,

        /// Also print every library's resources
        #[arg(short, long)]
        resources: bool,
    },

    /// Print the theme with the opposite base color scheme
    Inverse {
        name: String,

        #[arg(long)]
        high_contrast: bool,
    },

    /// Generate a theme from an accent color
    Generate {
        /// Base color scheme (Light or Dark)
        base: String,

        /// Accent color, #RRGGBB or #AARRGGBB
        accent: Color,

        #[arg(long)]
        high_contrast: bool,

        /// Derive accent shades with HSL tinting
        #[arg(long)]
        hsl: bool,
    },

    /// Lighten (positive) or darken (negative) a color in HSL space
    Tint {
        color: Color,

        /// Amount between -1.0 and 1.0
        #[arg(allow_hyphen_values = true)]
        amount: f64,
    },

    /// Apply the theme the OS settings select
    Sync {
        /// Sync mode, e.g. SyncAll or "SyncWithAppMode | SyncWithAccent"
        #[arg(long)]
        mode: Option<ThemeSyncMode>,

        /// Override the OS base color scheme
        #[arg(long)]
        base: Option<String>,

        /// Override the OS accent color
        #[arg(long)]
        accent: Option<Color>,

        /// Pretend the OS is in high contrast mode
        #[arg(long)]
        high_contrast: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = TinctureConfig::discover(cli.config.as_deref())?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::List { high_contrast } => commands::list(&config, high_contrast, &mut out),
        Commands::Schemes => commands::schemes(&config, &mut out),
        Commands::Show {
            name,
            high_contrast,
            resources,
        } => commands::show(&config, &name, high_contrast, resources, &mut out),
        Commands::Inverse {
            name,
            high_contrast,
        } => commands::inverse(&config, &name, high_contrast, &mut out),
        Commands::Generate {
            base,
            accent,
            high_contrast,
            hsl,
        } => {
            config.generator.use_hsl |= hsl;
            commands::generate(&config, &base, accent, high_contrast, &mut out)
        }
        Commands::Tint { color, amount } => commands::tint(color, amount, &mut out),
        Commands::Sync {
            mode,
            base,
            accent,
            high_contrast,
        } => commands::sync(
            &config,
            SyncOverrides {
                mode,
                base_color_scheme: base,
                accent,
                high_contrast,
            },
            &mut out,
        ),
    }
}
