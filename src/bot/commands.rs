use teloxide::utils::command::BotCommands;

/// Chat commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Comandos disponíveis:")]
pub enum Command {
    #[command(description = "boas-vindas")]
    Start,
    #[command(description = "este menu")]
    Ajuda,
    #[command(description = "jogos ao vivo com estatísticas e odds")]
    Jogos,
    #[command(description = "jogos dentro da janela configurada")]
    Proximos,
    #[command(description = "tendências de escanteios")]
    Tendencias,
    #[command(description = "odds de gols e escanteios")]
    Odds,
    #[command(description = "mostrar/ajustar configuração")]
    Config(String),
    #[command(description = "filtrar ligas")]
    Liga,
}

/// A parsed `/config` invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// No arguments: show current settings
    Show,
    /// `janela <hours>`
    SetWindow(u32),
    /// `auto on|off`
    SetAuto(bool),
    /// Anything else: print usage
    Usage,
}

impl ConfigAction {
    pub fn parse(args: &str) -> Self {
        let mut parts = args.split_whitespace();

        match parts.next() {
            None => ConfigAction::Show,
            Some(word) => match (word.to_lowercase().as_str(), parts.next()) {
                ("janela", Some(hours)) => match hours.parse() {
                    Ok(hours) => ConfigAction::SetWindow(hours),
                    Err(_) => ConfigAction::Usage,
                },
                ("auto", Some("on")) => ConfigAction::SetAuto(true),
                ("auto", Some("off")) => ConfigAction::SetAuto(false),
                _ => ConfigAction::Usage,
            },
        }
    }
}
