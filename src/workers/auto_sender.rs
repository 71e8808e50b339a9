use std::time::Duration;

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::time;
use tracing::{debug, error, info};

use crate::pipeline;
use crate::state::AppState;

/// Worker that periodically pushes the odds report to the configured chat.
///
/// The timer always keeps firing; the enabled flag is checked at each
/// firing, and a failed send never stops the schedule.
pub struct AutoSendWorker {
    bot: Bot,
    state: AppState,
    chat_id: ChatId,
    interval: Duration,
}

impl AutoSendWorker {
    pub fn new(bot: Bot, state: AppState) -> Self {
        let chat_id = ChatId(state.config.chat_id);
        let interval = Duration::from_secs(state.config.auto_send_interval);

        Self {
            bot,
            state,
            chat_id,
            interval,
        }
    }

    /// Run the worker loop
    pub async fn run(&self) {
        info!("Auto sender started (interval: {:?})", self.interval);

        let mut interval = time::interval(self.interval);
        interval.tick().await; // First send happens one full period after startup

        loop {
            interval.tick().await;
            self.fire().await;
        }
    }

    /// One timer firing
    async fn fire(&self) {
        let report = match self.tick().await {
            Some(report) => report,
            None => {
                debug!("Auto send disabled, skipping firing");
                return;
            }
        };

        match self
            .bot
            .send_message(self.chat_id, report)
            .parse_mode(ParseMode::Markdown)
            .await
        {
            Ok(_) => info!("Auto report sent to chat {}", self.chat_id),
            Err(e) => error!("Auto send to chat {} failed: {}", self.chat_id, e),
        }
    }

    /// Build the report for one firing, or None when auto send is off.
    /// The enabled check runs before any fetch, so a disabled firing
    /// produces no outbound traffic at all.
    async fn tick(&self) -> Option<String> {
        let settings = self.state.settings.read().await.clone();
        if !settings.auto_enabled {
            return None;
        }

        Some(
            pipeline::odds_view(
                &self.state.client,
                &settings,
                &self.state.config,
                Utc::now(),
            )
            .await,
        )
    }
}
