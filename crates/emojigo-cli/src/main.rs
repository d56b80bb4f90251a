use std::io::IsTerminal;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

mod commands;

#[derive(Parser)]
#[command(name = "emojigo-cli", version, about = "EmojiGo headless CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session against a scripted classifier
    Play(commands::play::PlayArgs),
    /// Configuration management
    Config {
        /// Config file to operate on (defaults to ~/.config/emojigo/config.toml)
        #[arg(long, global = true)]
        file: Option<std::path::PathBuf>,
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// List emotion labels planks can show
    Vocab {
        /// Include all five plank textures
        #[arg(long)]
        extended: bool,
    },
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Config { file, action } => commands::config::run(file, action),
        Commands::Vocab { extended } => commands::vocab::run(extended),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
