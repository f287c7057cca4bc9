//! Subcommands. Each takes its parsed arguments and the loaded configuration.

pub mod history;
pub mod refresh;
pub mod serve;
pub mod verify;

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use vidtrend_config::Config;
use vidtrend_history::Database;
use vidtrend_source::{Category, Credential, Region, YouTubeSource};

/// Open (creating if needed) the configured history database.
async fn open_database(config: &Config) -> Result<Database> {
    if let Some(parent) = config.database.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).or_raise(|| ErrorKind::Database)?;
    }
    Database::connect(&config.database).await.or_raise(|| ErrorKind::Database)
}

fn source(config: &Config) -> Result<YouTubeSource> {
    YouTubeSource::new(config.source.options()).or_raise(|| ErrorKind::Source)
}

/// `--api-key` when given, otherwise the configured key.
fn credential(api_key: Option<&str>, config: &Config) -> Result<Credential> {
    match api_key.map(str::trim).filter(|key| !key.is_empty()) {
        Some(key) => Credential::new(key).or_raise(|| ErrorKind::Input("API key")),
        None => config.source.credential().ok_or_raise(|| ErrorKind::MissingCredential),
    }
}

fn pair(region: &str, category: &str) -> Result<(Region, Category)> {
    let region = region.parse::<Region>().or_raise(|| ErrorKind::Input("region"))?;
    let category = category.parse::<Category>().or_raise(|| ErrorKind::Input("category"))?;
    Ok((region, category))
}
