//! matchday-bot: weekly pickup-football signups in a Telegram group.
//!
//! An admin opens the window with /begin, players answer "in" or "out",
//! and /end deals everyone into random six-a-side teams. Commands:
//!
//!   /begin /end /status /reset          — admin session control
//!   /addme                              — become the first admin
//!   /addadmin /removeadmin /listadmins  — admin delegation (reply-based)
//!   in / out                            — join or skip this week
//!
//! Requires TELEGRAM_BOT_TOKEN.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, ensure};
use clap::Parser;
use matchday_core::{DEFAULT_TEAM_SIZE, Engine, store::JsonStore};

use matchday_bot::commands;
use matchday_bot::health;
use matchday_bot::telegram::TelegramClient;

#[derive(Parser)]
#[command(name = "matchday-bot", about = "Random team picker for Telegram groups")]
struct Args {
    /// Telegram bot token (or set TELEGRAM_BOT_TOKEN env var)
    #[arg(long, env = "TELEGRAM_BOT_TOKEN")]
    token: String,

    /// Bot API base URL
    #[arg(long, default_value = "https://api.telegram.org")]
    api_url: String,

    /// Path of the persisted state document
    #[arg(long, default_value = "players.json")]
    data_file: PathBuf,

    /// Players per team
    #[arg(long, default_value_t = DEFAULT_TEAM_SIZE)]
    team_size: usize,

    /// Health endpoint listen address
    #[arg(long, default_value = "0.0.0.0:8080")]
    health_addr: String,

    /// Long-poll timeout in seconds
    #[arg(long, default_value_t = 30)]
    poll_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchday_bot=info,matchday_core=info".into()),
        )
        .init();

    let args = Args::parse();
    ensure!(args.team_size > 0, "--team-size must be at least 1");

    let engine = Engine::new(JsonStore::new(&args.data_file), args.team_size);
    let client = TelegramClient::new(&args.api_url, &args.token);

    let me = client.get_me().await?;
    let bot_username = me.username.clone();
    tracing::info!(
        bot = %bot_username.as_deref().unwrap_or(me.first_name.as_str()),
        data_file = %args.data_file.display(),
        team_size = args.team_size,
        "Starting matchday-bot"
    );

    // Liveness probe runs as its own task, no shared state with the engine
    let health_addr = args.health_addr.clone();
    tokio::spawn(async move {
        if let Err(e) = health::serve(&health_addr).await {
            tracing::error!(error = %e, "Health endpoint failed");
        }
    });

    // A restart should not replay commands queued while we were down
    let mut offset = client.drop_pending_updates().await?;

    tracing::info!("Bot running. Ctrl+C to stop.");

    loop {
        let updates = match client.get_updates(offset, args.poll_timeout).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "Polling failed, retrying");
                tokio::time::sleep(Duration::from_secs(3)).await;
                continue;
            }
        };

        for update in &updates {
            offset = Some(update.update_id + 1);
            if let Err(e) =
                commands::handle_update(&client, &engine, bot_username.as_deref(), update).await
            {
                tracing::error!(error = %e, update_id = update.update_id, "Update handler error");
            }
        }
    }
}
