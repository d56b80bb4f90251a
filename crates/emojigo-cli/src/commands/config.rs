use std::path::PathBuf;

use clap::Subcommand;
use emojigo_core::GameConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "session_secs", "vocabulary")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value; lists may be comma separated ("fear,happy")
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset {
        /// Use the original 20 second, five-emotion preset
        #[arg(long)]
        classic: bool,
    },
    /// Print the config file location
    Path,
}

fn resolve(file: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match file {
        Some(path) => Ok(path),
        None => Ok(GameConfig::path()?),
    }
}

/// Missing file reads as defaults without writing anything.
fn load(path: &PathBuf) -> Result<GameConfig, Box<dyn std::error::Error>> {
    if path.exists() {
        Ok(GameConfig::load_from(path)?)
    } else {
        Ok(GameConfig::default())
    }
}

pub fn run(file: Option<PathBuf>, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = resolve(file)?;
    match action {
        ConfigAction::Get { key } => {
            let config = load(&path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load(&path)?;
            config.set(&key, &value)?;
            config.save_to(&path)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = load(&path)?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset { classic } => {
            let config = if classic {
                GameConfig::classic()
            } else {
                GameConfig::default()
            };
            config.save_to(&path)?;
            println!("config reset to defaults");
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
