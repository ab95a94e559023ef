use serde::{Deserialize, Serialize};
use serenity::async_trait;
use thiserror::Error;

pub mod file;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GuildStats {
    pub level: u32,
    pub current_exp: u64,
    pub last_message_channel_id: Option<u64>,
    pub last_message_id: Option<u64>,
}

impl GuildStats {
    /* Both halves of the reference, or nothing. A zero is not a real snowflake. */
    pub fn message_ref(&self) -> Option<(u64, u64)> {
        match (self.last_message_channel_id, self.last_message_id) {
            (Some(channel_id), Some(message_id)) if channel_id != 0 && message_id != 0 => {
                Some((channel_id, message_id))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ExpChange {
    Add(i64),
    Remove(i64),
    Set(i64),
}

impl ExpChange {
    /* Widened arithmetic so extreme amounts cannot wrap; the result never
     * goes below zero. */
    pub fn apply(self, current_exp: u64) -> u64 {
        let next = match self {
            ExpChange::Add(amount) => current_exp as i128 + amount as i128,
            ExpChange::Remove(amount) => current_exp as i128 - amount as i128,
            ExpChange::Set(amount) => amount as i128,
        };

        next.clamp(0, u64::MAX as i128) as u64
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage record could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait GuildStore: Send + Sync {
    /* Missing or malformed records behave as a fresh guild, never as an error. */
    async fn get_or_create(&self, guild_id: u64) -> Result<GuildStats, StoreError>;

    /* Applies the change and recomputes the level as one atomic step. */
    async fn apply_exp(&self, guild_id: u64, change: ExpChange) -> Result<GuildStats, StoreError>;

    async fn update_message_ref(
        &self,
        guild_id: u64,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changes_clamp_at_zero() {
        assert_eq!(ExpChange::Add(-50).apply(10), 0);
        assert_eq!(ExpChange::Remove(50).apply(10), 0);
        assert_eq!(ExpChange::Remove(1).apply(0), 0);
        assert_eq!(ExpChange::Set(-5).apply(10), 0);
    }

    #[test]
    fn changes_apply_their_amount() {
        assert_eq!(ExpChange::Add(150).apply(0), 150);
        assert_eq!(ExpChange::Add(-40).apply(100), 60);
        assert_eq!(ExpChange::Remove(40).apply(100), 60);
        assert_eq!(ExpChange::Remove(-40).apply(100), 140);
        assert_eq!(ExpChange::Set(60_500).apply(3), 60_500);
    }

    #[test]
    fn extreme_amounts_do_not_wrap() {
        assert_eq!(ExpChange::Add(i64::MAX).apply(u64::MAX), u64::MAX);
        assert_eq!(ExpChange::Remove(i64::MIN).apply(0), 1 << 63);
        assert_eq!(ExpChange::Add(i64::MIN).apply(u64::MAX), u64::MAX - (1 << 63));
    }

    #[test]
    fn message_ref_requires_both_halves() {
        let mut stats = GuildStats::default();
        assert_eq!(stats.message_ref(), None);

        stats.last_message_channel_id = Some(7);
        assert_eq!(stats.message_ref(), None);

        stats.last_message_id = Some(9);
        assert_eq!(stats.message_ref(), Some((7, 9)));

        stats.last_message_id = Some(0);
        assert_eq!(stats.message_ref(), None);
    }
}
