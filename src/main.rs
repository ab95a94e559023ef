use std::env;
use std::sync::Arc;

use serenity::all::GatewayIntents;
use serenity::Client;
use tracing::error;

mod board;
mod discord;
mod levels;
mod state;
mod storage;
mod webserver;

#[tokio::main]
async fn main() {
    /* Load, if it exists, from the .env file. This mostly makes development easier. */
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt::init();

    /* Without credentials or a working store there is nothing useful to run;
     * say so and leave instead of panicking. */
    let Ok(discord_token) = env::var("DISCORD_TOKEN") else {
        error!("DISCORD_TOKEN not found in environment variables; not starting the client");
        return;
    };
    let Ok(storage_folder) = env::var("STORAGE_FOLDER") else {
        error!("STORAGE_FOLDER not found in environment variables; not starting the client");
        return;
    };
    let store = match storage::file::FileGuildStore::new(&storage_folder) {
        Ok(store) => store,
        Err(why) => {
            error!("Cannot use {storage_folder} as storage folder: {why}");
            return;
        }
    };

    let bot = state::BotState::new(Arc::new(store));

    /* The hosting platform probes this port to keep the process alive. */
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(8080);
    let web_app = webserver::create_app(bot.clone());
    let web_listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await.unwrap();
    tokio::spawn(async move {
        axum::serve(web_listener, web_app).await.unwrap();
    });

    let intents = GatewayIntents::GUILDS;

    let mut discord_client = Client::builder(&discord_token, intents)
        .event_handler(bot)
        .await
        .expect("Error creating client");

    if let Err(why) = discord_client.start().await {
        error!("Client error: {why:?}");
    }
}
