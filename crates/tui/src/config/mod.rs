use clap::Parser;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";
const ENV_PREFIX: &str = "REEVE_DASHBOARD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the indexer API, without the `/api/v1` suffix.
    pub base_url: String,
    /// Organisation selected at startup; `None` lists every organisation.
    pub organisation_id: Option<String>,
    pub page_size: usize,
    pub explorer_url: String,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            organisation_id: None,
            page_size: 10,
            explorer_url: "https://explorer.cardano.org".to_string(),
            log_file: "reeve_dashboard.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "reeve_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://localhost:9000).
    #[arg(long)]
    base_url: Option<String>,
    /// Organisation to select at startup.
    #[arg(long)]
    organisation_id: Option<String>,
    /// Rows per page.
    #[arg(long)]
    page_size: Option<usize>,
    /// Block explorer used for transaction links.
    #[arg(long)]
    explorer_url: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_with(Args::parse())
}

fn load_with(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(organisation_id) = args.organisation_id {
        settings.organisation_id = Some(organisation_id);
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(explorer_url) = args.explorer_url {
        settings.explorer_url = explorer_url;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    settings.page_size = settings.page_size.max(1);
    settings.organisation_id = settings
        .organisation_id
        .filter(|id| !id.trim().is_empty());

    Ok(settings)
}
