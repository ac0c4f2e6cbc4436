//! Keyclack - mechanical keyboard sound simulator for Linux
//!
//! Run with `keyclack` or `keyclack daemon` to start the daemon.
//! Use `keyclack packs` to list or add sound packs.
//! Use `keyclack config` to show the effective settings.

use clap::{Parser, Subcommand};
use keyclack::config::{self, Settings, DEFAULT_CONFIG};
use keyclack::daemon::Daemon;
use keyclack::soundpack::SoundPackRegistry;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keyclack")]
#[command(author, version, about = "Mechanical keyboard sound simulator for Linux")]
#[command(long_about = "
Keyclack plays a mechanical-keyboard sound for every key you press,
system-wide, using samples from installed sound packs.

SETUP:
  1. Add yourself to the input group: sudo usermod -aG input $USER
  2. Log out and back in
  3. Run: keyclack (to start the daemon)
  4. Optionally: keyclack packs add <dir> (to install a sound pack)

A pack is a directory of wav files: space.wav, delete.wav, key1.wav,
key2.wav. Any subset may be present; missing roles are silent.
")]
struct Cli {
    /// Path to settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    quiet: bool,

    /// Override the active sound theme
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    /// Override the master volume (0.0 to 1.0)
    #[arg(long, value_name = "LEVEL")]
    volume: Option<f32>,

    /// Start with sounds disabled
    #[arg(long)]
    muted: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as daemon (default if no command specified)
    Daemon,

    /// Show current configuration
    Config,

    /// Manage sound packs
    Packs {
        #[command(subcommand)]
        action: PacksAction,
    },
}

#[derive(Subcommand)]
enum PacksAction {
    /// List installed sound packs
    List,

    /// Add a sound pack from a directory (moves its wav files)
    Add {
        /// Path to the source directory; its base name becomes the pack name
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    let mut settings = config::load_settings(cli.config.as_deref());

    // CLI overrides (highest priority)
    if let Some(theme) = cli.theme {
        settings.theme = theme;
    }
    if let Some(volume) = cli.volume {
        settings.volume = volume.clamp(0.0, 1.0);
    }
    if cli.muted {
        settings.enabled = false;
    }

    match cli.command {
        None | Some(Commands::Daemon) => {
            let settings_path = cli.config.clone().or_else(Settings::default_path);
            let mut daemon = Daemon::new(settings, settings_path)?;
            daemon.run().await?;
        }

        Some(Commands::Config) => {
            let path = cli.config.clone().or_else(Settings::default_path);
            match path {
                Some(ref p) if p.exists() => {
                    println!("# {}", p.display());
                    println!("{}", toml::to_string_pretty(&settings)?);
                }
                _ => {
                    println!("# No settings file found; defaults shown");
                    println!("{}", DEFAULT_CONFIG);
                }
            }
        }

        Some(Commands::Packs { action }) => {
            let mut registry = SoundPackRegistry::discover(settings.packs_dir())?;
            match action {
                PacksAction::List => {
                    println!("Sound packs in {}:", registry.base_dir().display());
                    for name in registry.names() {
                        let marker = if name == settings.theme { " (active)" } else { "" };
                        println!("  {}{}", name, marker);
                    }
                }
                PacksAction::Add { dir } => {
                    let pack = registry.add_pack(&dir)?;
                    println!(
                        "Added pack '{}' -> {}",
                        pack.name(),
                        pack.dir().display()
                    );
                }
            }
        }
    }

    Ok(())
}
