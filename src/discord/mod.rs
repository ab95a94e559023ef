use serenity::all::{
    ActivityData, Command, CommandInteraction, GuildId, Interaction, Ready, ResolvedOption,
    ResolvedValue,
};
use serenity::{async_trait, prelude::*};
use tracing::{error, info};

use crate::state::BotState;

mod board;
mod expadd;
mod expremove;
mod expset;

#[async_trait]
impl EventHandler for BotState {
    async fn ready(&self, _: Context, ready: Ready) {
        info!("Connected to Discord as {}", ready.user.name);
    }

    async fn cache_ready(&self, ctx: Context, _guilds: Vec<GuildId>) {
        if !self.set_if_startup().await {
            return;
        }
        self.set_discord(ctx.clone()).await;

        ctx.set_activity(Some(ActivityData::custom("Tracking server progress")));

        /* Register our global commands; the board itself appears wherever /board is used. */
        for command in [
            board::register(),
            expadd::register(),
            expremove::register(),
            expset::register(),
        ] {
            if let Err(why) = Command::create_global_command(&ctx.http, command).await {
                error!("Error creating global command: {why:?}");
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if let Interaction::Command(command) = interaction {
            match command.data.name.as_str() {
                "board" => board::run(self, &ctx, &command).await,
                "expadd" => expadd::run(self, &ctx, &command).await,
                "expremove" => expremove::run(self, &ctx, &command).await,
                "expset" => expset::run(self, &ctx, &command).await,
                _ => {}
            };
        }
    }
}

/* The single required integer option every exp command takes. */
fn amount_option(command: &CommandInteraction) -> Option<i64> {
    match command.data.options().first() {
        Some(ResolvedOption {
            value: ResolvedValue::Integer(amount),
            ..
        }) => Some(*amount),
        _ => None,
    }
}
