use serenity::all::{
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateInteractionResponse, CreateInteractionResponseMessage, Permissions,
};
use tracing::warn;

use crate::board;
use crate::state::BotState;
use crate::storage::ExpChange;

pub async fn run(bot: &BotState, ctx: &Context, command: &CommandInteraction) {
    let Some(guild_id) = command.guild_id else {
        return;
    };
    let guild_id = guild_id.get();
    let Some(amount) = super::amount_option(command) else {
        return;
    };

    let content = match bot.apply_exp(guild_id, ExpChange::Add(amount)).await {
        Ok(stats) => format!(
            "✅ Added {} EXP. Current Level: {}",
            board::group_signed(amount),
            stats.level
        ),
        Err(why) => {
            warn!("[{guild_id}] Failed to add experience: {why}");
            "⚠️ Failed to update the server experience.".to_string()
        }
    };

    /* The admin gets their answer no matter what the board refresh does. */
    let _ = command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await;

    bot.refresh_board(guild_id).await;
}

pub fn register() -> CreateCommand {
    CreateCommand::new("expadd")
        .description("Add experience points to the server")
        .add_option(
            CreateCommandOption::new(CommandOptionType::Integer, "amount", "Amount of EXP to add")
                .required(true),
        )
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .dm_permission(false)
}
