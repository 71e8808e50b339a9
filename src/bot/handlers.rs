//! Command and callback-query handlers.
//!
//! Every command replies with some text, even when upstream data is
//! unavailable; the pipeline guarantees a renderable message and the
//! league menu answers every callback it receives.

use chrono::Utc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{info, warn};

use crate::bot::commands::{Command, ConfigAction};
use crate::bot::menu::{self, MenuAction};
use crate::format;
use crate::pipeline;
use crate::state::AppState;

const LIGA_PROMPT: &str = "🔍 *Filtrar ligas* (toque para selecionar):";

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: AppState,
) -> ResponseResult<()> {
    let chat_id = msg.chat.id;
    info!("Handling {:?} from chat {}", cmd, chat_id);

    match cmd {
        Command::Start | Command::Ajuda => {
            send(&bot, chat_id, format::help_text()).await?;
        }
        Command::Jogos => {
            let settings = state.settings.read().await.clone();
            let text = pipeline::live_view(&state.client, &settings, &state.config).await;
            send(&bot, chat_id, text).await?;
        }
        Command::Proximos => {
            let settings = state.settings.read().await.clone();
            let text =
                pipeline::upcoming_view(&state.client, &settings, &state.config, Utc::now()).await;
            send(&bot, chat_id, text).await?;
        }
        Command::Tendencias => {
            let settings = state.settings.read().await.clone();
            let text = pipeline::trend_view(&state.client, &settings, &state.config).await;
            send(&bot, chat_id, text).await?;
        }
        Command::Odds => {
            let settings = state.settings.read().await.clone();
            let text =
                pipeline::odds_view(&state.client, &settings, &state.config, Utc::now()).await;
            send(&bot, chat_id, text).await?;
        }
        Command::Config(args) => {
            handle_config(&bot, chat_id, &args, &state).await?;
        }
        Command::Liga => {
            handle_liga(&bot, chat_id, &state).await?;
        }
    }

    Ok(())
}

async fn handle_config(
    bot: &Bot,
    chat_id: ChatId,
    args: &str,
    state: &AppState,
) -> ResponseResult<()> {
    match ConfigAction::parse(args) {
        ConfigAction::Show => {
            let settings = state.settings.read().await.clone();
            let catalog = state.catalog.read().await;
            send(bot, chat_id, format::settings_report(&settings, &catalog)).await?;
        }
        ConfigAction::SetWindow(hours) => {
            state.settings.write().await.window_hours = hours;
            send(bot, chat_id, format!("Janela ajustada para {}h", hours)).await?;
        }
        ConfigAction::SetAuto(enabled) => {
            state.settings.write().await.auto_enabled = enabled;
            let text = if enabled {
                "Auto envio ativado"
            } else {
                "Auto envio desativado"
            };
            send(bot, chat_id, text.to_string()).await?;
        }
        ConfigAction::Usage => {
            send(
                bot,
                chat_id,
                "Uso: `/config [janela <h> | auto on/off]`".to_string(),
            )
            .await?;
        }
    }

    Ok(())
}

async fn handle_liga(bot: &Bot, chat_id: ChatId, state: &AppState) -> ResponseResult<()> {
    // The catalog loads at startup; retry here if that failed
    if state.catalog.read().await.is_empty() {
        match state.client.fetch_leagues(state.config.season).await {
            Ok(leagues) if !leagues.is_empty() => {
                info!("League catalog loaded: {} leagues", leagues.len());
                *state.catalog.write().await = leagues;
            }
            Ok(_) => {}
            Err(e) => warn!("League catalog fetch failed: {}", e),
        }
    }

    let catalog = state.catalog.read().await;
    if catalog.is_empty() {
        send(bot, chat_id, "_Catálogo de ligas indisponível._".to_string()).await?;
        return Ok(());
    }

    let selected = state.settings.read().await.leagues.clone();
    let keyboard = menu::league_keyboard(&catalog, &selected, 0);

    bot.send_message(chat_id, LIGA_PROMPT)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

pub async fn handle_callback(bot: Bot, query: CallbackQuery, state: AppState) -> ResponseResult<()> {
    let action = query.data.as_deref().and_then(MenuAction::decode);

    let page = match action {
        Some(MenuAction::Toggle { page, league_id }) => {
            // Only catalog IDs may enter the filter, whatever the payload says
            let known = {
                let catalog = state.catalog.read().await;
                catalog.iter().any(|l| l.id == league_id)
            };

            let answer_text = if known {
                state.settings.write().await.toggle_league(league_id);

                let settings = state.settings.read().await;
                let catalog = state.catalog.read().await;
                format!("Ligas: {}", selected_names(&settings, &catalog))
            } else {
                warn!("Toggle for unknown league {}", league_id);
                "Liga desconhecida".to_string()
            };

            bot.answer_callback_query(query.id.clone())
                .text(answer_text)
                .await?;
            Some(page)
        }
        Some(MenuAction::Navigate { page }) => {
            bot.answer_callback_query(query.id.clone()).await?;
            Some(page)
        }
        None => {
            warn!("Unrecognized callback payload: {:?}", query.data);
            bot.answer_callback_query(query.id.clone()).await?;
            None
        }
    };

    // Re-render the menu in place: same page on toggle, target page on nav
    if let (Some(page), Some(message)) = (page, query.message.as_ref()) {
        let catalog = state.catalog.read().await;
        let selected = state.settings.read().await.leagues.clone();
        let keyboard = menu::league_keyboard(&catalog, &selected, page);

        bot.edit_message_reply_markup(message.chat().id, message.id())
            .reply_markup(keyboard)
            .await?;
    }

    Ok(())
}

fn selected_names(settings: &crate::state::Settings, catalog: &[crate::models::League]) -> String {
    if settings.leagues.is_empty() {
        return "todas".to_string();
    }
    settings
        .leagues
        .iter()
        .map(|id| {
            catalog
                .iter()
                .find(|l| l.id == *id)
                .map(|l| l.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .collect::<Vec<_>>()
        .join(", ")
}

async fn send(bot: &Bot, chat_id: ChatId, text: String) -> ResponseResult<()> {
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Markdown)
        .await?;
    Ok(())
}
