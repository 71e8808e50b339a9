mod api;
mod bot;
mod config;
mod format;
mod models;
mod pipeline;
mod state;
mod window;
mod workers;

use std::sync::Arc;

use anyhow::Result;
use teloxide::dptree;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tokio::sync::RwLock;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::FootballApiClient;
use crate::bot::handlers::{handle_callback, handle_command};
use crate::bot::Command;
use crate::config::Config;
use crate::state::{AppState, Settings};
use crate::workers::AutoSendWorker;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fixture_signal=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting fixture-signal");

    // Load configuration; missing secrets abort here
    let config = Config::from_env()?;
    info!("Configuration loaded");

    let client = Arc::new(FootballApiClient::new(&config.api_base_url, &config.api_key)?);
    info!("API client initialized");

    // League catalog is best-effort at startup; /liga retries later
    let catalog = match client.fetch_leagues(config.season).await {
        Ok(leagues) => {
            info!("League catalog loaded: {} leagues", leagues.len());
            leagues
        }
        Err(e) => {
            warn!("League catalog unavailable at startup: {}", e);
            Vec::new()
        }
    };

    let bot = Bot::new(config.telegram_token.clone());
    let settings = Settings::new(&config);

    let state = AppState {
        config: Arc::new(config),
        client,
        settings: Arc::new(RwLock::new(settings)),
        catalog: Arc::new(RwLock::new(catalog)),
    };

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {}", e);
    }

    // Recurring odds report; checks the enabled flag on every firing
    let auto_sender = AutoSendWorker::new(bot.clone(), state.clone());
    tokio::spawn(async move { auto_sender.run().await });

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    info!("Dispatcher started, polling for updates");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Shutting down fixture-signal");
    Ok(())
}
