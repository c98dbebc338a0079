//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "picker.max_results")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    #[arg(requires = "key")]
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,

    /// List the keys that can be read and set
    #[arg(long)]
    pub keys: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.keys {
        for key in Config::available_keys() {
            println!("{}", key);
        }
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    let Some(key) = args.key else {
        print!("{}", render(&config)?);
        return Ok(());
    };

    match args.value {
        Some(value) => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }
        None => {
            let value = config.get(&key).ok_or_else(|| unknown_key(&key))?;
            println!("{}", value);
        }
    }

    Ok(())
}

/// The whole config as it would be written to disk
fn render(config: &Config) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {} (available: {})",
        key,
        Config::available_keys().join(", ")
    ))
}
