mod api;
mod cli;
mod config;
mod controller;
mod errors;
mod ui;
mod utils;

use std::sync::Arc;

use clap::Parser;
use log::info;

use crate::api::client::{HttpVideoApi, VideoApi};
use crate::cli::{Cli, Command};
use crate::controller::DownloadController;
use crate::ui::{ConsolePresenter, Presenter};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();

    let mut config = match config::AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            config::AppConfig::default()
        }
    };
    if let Some(api_base) = cli.api_base {
        config.api_base_url = api_base;
    }
    if let Some(output_dir) = cli.output_dir {
        config.download_path = output_dir;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }
    info!("Using service at {}", config.api_base_url);

    let api: Arc<dyn VideoApi> = match HttpVideoApi::new(&config.api_base_url, config.proxy.as_deref())
    {
        Ok(api) => Arc::new(api),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    let presenter: Arc<dyn Presenter> = Arc::new(ConsolePresenter::new());
    let controller = DownloadController::new(api, presenter, config.download_path.clone());

    let outcome = match cli.command {
        Command::Info { url } => controller.fetch_formats(&url).await.map(|_| ()),
        Command::Download { url, format_id } => {
            // Look the video up first so the saved name carries its
            // real title instead of the placeholder.
            match controller.fetch_formats(&url).await {
                Ok(_) => controller.download_format(&url, &format_id).await.map(|_| ()),
                Err(e) => Err(e),
            }
        }
    };

    if outcome.is_err() {
        std::process::exit(1);
    }
}
