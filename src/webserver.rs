use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::state::BotState;

/* Liveness probe for the hosting platform; says so once Discord is connected. */
async fn url_status(State(bot): State<BotState>) -> impl IntoResponse {
    if bot.is_connected().await {
        (StatusCode::OK, "Bot is online!")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Bot is starting ...")
    }
}

pub fn create_app(bot: BotState) -> Router {
    Router::new().route("/", get(url_status)).with_state(bot)
}
