use serenity::all::{
    CommandInteraction, Context, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseMessage,
};
use tracing::warn;

use crate::state::{BoardHandle, BotState};

pub async fn run(bot: &BotState, ctx: &Context, command: &CommandInteraction) {
    let Some(guild_id) = command.guild_id else {
        return;
    };
    let guild_id = guild_id.get();

    let embed = match bot.guild_board_embed(guild_id).await {
        Ok(embed) => embed,
        Err(why) => {
            warn!("[{guild_id}] Failed to load stats for the board: {why}");
            let _ = command
                .create_response(
                    &ctx.http,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content("⚠️ Could not load the server stats. Try again later.")
                            .ephemeral(true),
                    ),
                )
                .await;
            return;
        }
    };

    let response = CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new().embed(embed),
    );
    if let Err(why) = command.create_response(&ctx.http, response).await {
        warn!("[{guild_id}] Failed to post the board: {why:?}");
        return;
    }

    /* The interaction response is the new board message; track it so the exp
     * commands can keep editing it in place. */
    match command.get_response(&ctx.http).await {
        Ok(message) => {
            let handle = BoardHandle {
                channel_id: message.channel_id,
                message_id: message.id,
            };
            if let Err(why) = bot.track_board(guild_id, handle).await {
                warn!("[{guild_id}] Failed to persist the board reference: {why}");
            }
        }
        Err(why) => warn!("[{guild_id}] Failed to look up the board response: {why:?}"),
    }
}

pub fn register() -> CreateCommand {
    CreateCommand::new("board")
        .description("Show the current server level status")
        .dm_permission(false)
}
