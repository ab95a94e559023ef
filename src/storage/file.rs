use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serenity::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::levels;

use super::{ExpChange, GuildStats, GuildStore, StoreError};

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "version")]
enum Record {
    #[serde(rename = "1")]
    V1(GuildStats),
}

pub struct FileGuildStore {
    storage_folder: PathBuf,
    /* Serializes the read-modify-write cycles across all guilds. */
    write_lock: Mutex<()>,
}

impl FileGuildStore {
    pub fn new(storage_folder: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_folder = storage_folder.into();
        std::fs::create_dir_all(&storage_folder)?;

        Ok(Self {
            storage_folder,
            write_lock: Mutex::new(()),
        })
    }

    fn guild_path(&self, guild_id: u64) -> PathBuf {
        self.storage_folder.join(format!("guild-{guild_id}.json"))
    }

    fn read(&self, guild_id: u64) -> GuildStats {
        let path = self.guild_path(guild_id);

        let Ok(raw) = std::fs::read_to_string(&path) else {
            return GuildStats::default();
        };

        match serde_json::from_str(&raw) {
            Ok(Record::V1(stats)) => stats,
            Err(why) => {
                warn!("Discarding malformed record {}: {why}", path.display());
                GuildStats::default()
            }
        }
    }

    fn write(&self, guild_id: u64, stats: &GuildStats) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&Record::V1(stats.clone()))?;
        std::fs::write(self.guild_path(guild_id), raw)?;

        Ok(())
    }
}

#[async_trait]
impl GuildStore for FileGuildStore {
    async fn get_or_create(&self, guild_id: u64) -> Result<GuildStats, StoreError> {
        let _guard = self.write_lock.lock().await;

        Ok(self.read(guild_id))
    }

    async fn apply_exp(&self, guild_id: u64, change: ExpChange) -> Result<GuildStats, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut stats = self.read(guild_id);
        stats.current_exp = change.apply(stats.current_exp);
        stats.level = levels::resolve(stats.current_exp);
        self.write(guild_id, &stats)?;

        Ok(stats)
    }

    async fn update_message_ref(
        &self,
        guild_id: u64,
        channel_id: u64,
        message_id: u64,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut stats = self.read(guild_id);
        stats.last_message_channel_id = Some(channel_id);
        stats.last_message_id = Some(message_id);
        self.write(guild_id, &stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_access_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGuildStore::new(dir.path()).unwrap();

        let stats = store.get_or_create(42).await.unwrap();
        assert_eq!(stats.level, 0);
        assert_eq!(stats.current_exp, 0);
        assert_eq!(stats.message_ref(), None);
    }

    #[tokio::test]
    async fn apply_exp_keeps_level_in_sync() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGuildStore::new(dir.path()).unwrap();

        let stats = store.apply_exp(42, ExpChange::Add(2_500)).await.unwrap();
        assert_eq!(stats.current_exp, 2_500);
        assert_eq!(stats.level, 3);

        let stats = store.apply_exp(42, ExpChange::Remove(10_000)).await.unwrap();
        assert_eq!(stats.current_exp, 0);
        assert_eq!(stats.level, 0);

        let stats = store.apply_exp(42, ExpChange::Set(60_500)).await.unwrap();
        assert_eq!(stats.current_exp, 60_500);
        assert_eq!(stats.level, 12);
    }

    #[tokio::test]
    async fn records_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileGuildStore::new(dir.path()).unwrap();
            store.apply_exp(42, ExpChange::Add(150)).await.unwrap();
            store.update_message_ref(42, 7, 9).await.unwrap();
        }

        let store = FileGuildStore::new(dir.path()).unwrap();
        let stats = store.get_or_create(42).await.unwrap();
        assert_eq!(stats.current_exp, 150);
        assert_eq!(stats.level, levels::resolve(stats.current_exp));
        assert_eq!(stats.message_ref(), Some((7, 9)));
    }

    #[tokio::test]
    async fn message_ref_leaves_stats_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGuildStore::new(dir.path()).unwrap();

        store.apply_exp(42, ExpChange::Add(100)).await.unwrap();
        store.update_message_ref(42, 7, 9).await.unwrap();

        let stats = store.get_or_create(42).await.unwrap();
        assert_eq!(stats.current_exp, 100);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.message_ref(), Some((7, 9)));
    }

    #[tokio::test]
    async fn malformed_record_is_treated_as_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGuildStore::new(dir.path()).unwrap();

        std::fs::write(dir.path().join("guild-42.json"), "not json at all").unwrap();

        let stats = store.get_or_create(42).await.unwrap();
        assert_eq!(stats.current_exp, 0);
        assert_eq!(stats.level, 0);

        /* The next mutation writes a fresh, valid record. */
        let stats = store.apply_exp(42, ExpChange::Add(100)).await.unwrap();
        assert_eq!(stats.current_exp, 100);
        assert_eq!(stats.level, 1);
    }

    #[tokio::test]
    async fn guilds_do_not_share_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileGuildStore::new(dir.path()).unwrap();

        store.apply_exp(1, ExpChange::Add(500)).await.unwrap();

        let stats = store.get_or_create(2).await.unwrap();
        assert_eq!(stats.current_exp, 0);
    }
}
