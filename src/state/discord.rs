use serenity::all::{CreateEmbed, EditMessage, Guild, GuildId};
use serenity::http::{Http, HttpError};
use thiserror::Error;

use super::{BoardHandle, BotState};

#[derive(Debug, Error)]
pub enum BoardMessageError {
    /* The tracked message is not coming back: deleted, channel gone, or our
     * access was revoked. The handle should be dropped. */
    #[error("board message is no longer reachable")]
    Gone,
    #[error("discord call failed: {0}")]
    Transport(serenity::Error),
}

fn classify(error: serenity::Error) -> BoardMessageError {
    match &error {
        /* 404: message or channel deleted. 403: our access was revoked. */
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if matches!(response.status_code.as_u16(), 403 | 404) =>
        {
            BoardMessageError::Gone
        }
        _ => BoardMessageError::Transport(error),
    }
}

pub async fn fetch_message(http: &Http, handle: BoardHandle) -> Result<(), BoardMessageError> {
    handle
        .channel_id
        .message(http, handle.message_id)
        .await
        .map(|_| ())
        .map_err(classify)
}

pub async fn edit_message(
    http: &Http,
    handle: BoardHandle,
    embed: CreateEmbed,
) -> Result<(), BoardMessageError> {
    handle
        .channel_id
        .edit_message(http, handle.message_id, EditMessage::new().embed(embed))
        .await
        .map(|_| ())
        .map_err(classify)
}

impl BotState {
    pub async fn guild_display_name(&self, guild_id: u64) -> String {
        let ctx = { self.0.read().await.discord.clone() };
        let Some(ctx) = ctx else {
            return "Server".to_string();
        };

        let guild_id = GuildId::new(guild_id);
        if let Some(name) = guild_id.name(&ctx.cache) {
            return name;
        }

        /* Not cached; ask Discord directly. */
        match Guild::get(&ctx.http, guild_id).await {
            Ok(guild) => guild.name,
            Err(_) => "Server".to_string(),
        }
    }
}
