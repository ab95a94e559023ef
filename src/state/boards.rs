use serenity::all::{ChannelId, CreateEmbed, MessageId};
use tracing::{debug, warn};

use crate::board;
use crate::storage::{GuildStats, StoreError};

use super::discord::{edit_message, fetch_message, BoardMessageError};
use super::{BoardHandle, BotState};

impl BotState {
    pub async fn guild_board_embed(&self, guild_id: u64) -> Result<CreateEmbed, StoreError> {
        let stats = self.store().await.get_or_create(guild_id).await?;
        let guild_name = self.guild_display_name(guild_id).await;

        Ok(board::render(&stats, &guild_name))
    }

    /* A new board message was just posted; it supersedes whatever was tracked
     * before. The old message, if any, is abandoned rather than deleted. */
    pub async fn track_board(&self, guild_id: u64, handle: BoardHandle) -> Result<(), StoreError> {
        self.store()
            .await
            .update_message_ref(guild_id, handle.channel_id.get(), handle.message_id.get())
            .await?;
        self.set_board_handle(guild_id, handle).await;

        Ok(())
    }

    /* Best effort: bring the tracked board message in line with the stored
     * stats. The enclosing command already acknowledged, so nothing that
     * happens here is allowed to surface. */
    pub async fn refresh_board(&self, guild_id: u64) {
        let stats = match self.store().await.get_or_create(guild_id).await {
            Ok(stats) => stats,
            Err(why) => {
                warn!("[{guild_id}] Failed to load stats for board refresh: {why}");
                return;
            }
        };

        let handle = match self.board_handle(guild_id).await {
            Some(handle) => Some(handle),
            None => self.recover_board(guild_id, &stats).await,
        };
        let Some(handle) = handle else {
            return;
        };

        let guild_name = self.guild_display_name(guild_id).await;
        let Some(http) = self.http().await else {
            return;
        };

        match edit_message(&http, handle, board::render(&stats, &guild_name)).await {
            Ok(()) => {}
            Err(BoardMessageError::Gone) => {
                debug!("[{guild_id}] Board message went away; dropping the tracked handle");
                self.evict_board_handle(guild_id).await;
            }
            Err(BoardMessageError::Transport(why)) => {
                /* Transient fault; retry once, then give the handle up. */
                warn!("[{guild_id}] Board edit failed, retrying once: {why}");
                if let Err(why) = edit_message(&http, handle, board::render(&stats, &guild_name)).await
                {
                    warn!("[{guild_id}] Board edit failed again: {why}");
                    self.evict_board_handle(guild_id).await;
                }
            }
        }
    }

    /* Restart recovery: the cache is empty, but a previous run may have left
     * the message reference in storage. */
    async fn recover_board(&self, guild_id: u64, stats: &GuildStats) -> Option<BoardHandle> {
        let (channel_id, message_id) = stats.message_ref()?;
        let http = self.http().await?;

        let handle = BoardHandle {
            channel_id: ChannelId::new(channel_id),
            message_id: MessageId::new(message_id),
        };

        match fetch_message(&http, handle).await {
            Ok(()) => {
                self.set_board_handle(guild_id, handle).await;
                Some(handle)
            }
            Err(BoardMessageError::Gone) => {
                debug!("[{guild_id}] Persisted board message no longer exists");
                None
            }
            Err(BoardMessageError::Transport(why)) => {
                warn!("[{guild_id}] Could not look up the persisted board message: {why}");
                None
            }
        }
    }

    async fn board_handle(&self, guild_id: u64) -> Option<BoardHandle> {
        self.0.read().await.active_boards.get(&guild_id).copied()
    }

    async fn set_board_handle(&self, guild_id: u64, handle: BoardHandle) {
        self.0.write().await.active_boards.insert(guild_id, handle);
    }

    async fn evict_board_handle(&self, guild_id: u64) {
        self.0.write().await.active_boards.remove(&guild_id);
    }
}
