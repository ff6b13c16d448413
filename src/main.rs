use anyhow::{Context, Result};
use clap::Parser;
use schooldesk::backend::{create_backend, create_token_store};
use schooldesk::config::Config;
use schooldesk::constants::{CONFIG_GENERATED, ENV_CONFIG_PATH, SUCCESS_LOGGED_OUT};
use schooldesk::logger::init_logging;
use schooldesk::notify::ChannelNotifier;
use schooldesk::ui::{self, UiOptions};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "schooldesk", version, about = "Terminal administration console for the school platform")]
struct Cli {
    /// Configuration file (defaults to ./schooldesk.toml, then the user config dir)
    #[arg(long, env = ENV_CONFIG_PATH)]
    config: Option<PathBuf>,

    /// Backend origin, e.g. https://api.school.example (overrides SCHOOLDESK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Store this bearer token before starting
    #[arg(long)]
    token: Option<String>,

    /// Clear the stored token and exit
    #[arg(long)]
    logout: bool,

    /// Write a default configuration file and exit
    #[arg(long)]
    generate_config: bool,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.trim().to_string();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::get_default_config_path()?,
        };
        Config::generate_default_config(&path)?;
        println!("{}: {}", CONFIG_GENERATED, path.display());
        return Ok(());
    }

    let config = load_config(&cli)?;
    if let Some(log_path) = init_logging(&config.logging)? {
        log::info!("Logging to {}", log_path.display());
    }

    let tokens = create_token_store(&config)?;

    if cli.logout {
        tokens.remove_token().context("Failed to clear stored token")?;
        println!("{}", SUCCESS_LOGGED_OUT);
        return Ok(());
    }

    if let Some(token) = &cli.token {
        tokens.set_token(token.trim()).context("Failed to store token")?;
    }

    let (notifier, notifications) = ChannelNotifier::new();
    let backend = create_backend(&config, tokens, Arc::new(notifier))?;

    let options = UiOptions {
        initial_view: config.default_view(),
        page_size: config.api.page_size,
        sidebar_width: config.ui.sidebar_width,
    };

    ui::run_app(backend, notifications, options).await
}
