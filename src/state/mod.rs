use std::collections::HashMap;
use std::sync::atomic::Ordering;
use std::sync::{atomic::AtomicBool, Arc};

use serenity::all::{ChannelId, Context, MessageId};
use serenity::http::Http;
use tokio::sync::RwLock;

use crate::storage::{ExpChange, GuildStats, GuildStore, StoreError};

mod boards;
mod discord;

/* Channel and message of the board currently shown for a guild. */
#[derive(Clone, Copy, Debug)]
pub struct BoardHandle {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

struct BotStorage {
    startup: AtomicBool,
    discord: Option<Context>,
    store: Arc<dyn GuildStore>,
    active_boards: HashMap<u64, BoardHandle>,
}

pub struct BotState(Arc<RwLock<BotStorage>>);

impl Clone for BotState {
    fn clone(&self) -> Self {
        BotState(self.0.clone())
    }
}

impl BotState {
    pub fn new(store: Arc<dyn GuildStore>) -> Self {
        BotState(Arc::new(RwLock::new(BotStorage {
            startup: AtomicBool::new(true),
            discord: None,
            store,
            active_boards: HashMap::new(),
        })))
    }

    pub async fn set_discord(&self, ctx: Context) {
        let mut this = self.0.write().await;

        this.discord = Some(ctx);
    }

    pub async fn is_connected(&self) -> bool {
        self.0.read().await.discord.is_some()
    }

    pub async fn set_if_startup(&self) -> bool {
        let this = self.0.read().await;

        if !this.startup.load(Ordering::Relaxed) {
            return false;
        }
        this.startup.swap(false, Ordering::Relaxed);

        true
    }

    pub async fn apply_exp(&self, guild_id: u64, change: ExpChange) -> Result<GuildStats, StoreError> {
        self.store().await.apply_exp(guild_id, change).await
    }

    async fn store(&self) -> Arc<dyn GuildStore> {
        self.0.read().await.store.clone()
    }

    async fn http(&self) -> Option<Arc<Http>> {
        let this = self.0.read().await;

        this.discord.as_ref().map(|ctx| ctx.http.clone())
    }
}
