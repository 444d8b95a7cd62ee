use std::collections::HashSet;

use async_stream::try_stream;
use clap::builder::styling::AnsiColor;
use futures::future::try_join_all;
use itertools::Itertools;
use log::debug;
use tokio::try_join;
use tokio_stream::Stream;

use crate::{
    entity::{Channel, Entity},
    error::{Error, Result},
    hash_store::HashStore,
    index::{collect_ids, remove_member, OneWayIndex, TwoWayIndex},
    keys,
    store::{Script, ScriptContext, SharedStore},
};

static DELETE_SCRIPT: Script = Script::new("channel-delete", 2, 3, delete_channel);

/// Channels, plus the indexes that place them in guilds and shards.
///
/// | structure           | kind    | maps                                |
/// |---------------------|---------|-------------------------------------|
/// | `channel`           | hash    | channel id -> record                |
/// | `shard-index`       | two-way | shard -> channel ids, and back      |
/// | `guild-index`       | one-way | guild -> channel ids                |
/// | `guild-shard-index` | two-way | shard -> guild ids, and back        |
///
/// This repository is the only writer of these four structures.
#[derive(Debug)]
pub struct ChannelRepository {
    store: SharedStore,
    channels: HashStore<Channel>,
    shard_index: TwoWayIndex,
    guild_index: OneWayIndex,
    guild_shard_index: TwoWayIndex,
}

impl ChannelRepository {
    pub fn new(store: SharedStore, prefix: &str) -> Self {
        let channel_key = keys::table(prefix, Channel::NAME);
        let index_key = |suffix| keys::index(&channel_key, suffix);

        ChannelRepository {
            shard_index: TwoWayIndex::new(store.clone(), index_key(keys::SHARD_INDEX)),
            guild_index: OneWayIndex::new(store.clone(), index_key(keys::GUILD_INDEX)),
            guild_shard_index: TwoWayIndex::new(store.clone(), index_key(keys::GUILD_SHARD_INDEX)),
            channels: HashStore::new(store.clone(), channel_key.clone()),
            store,
        }
    }

    pub async fn save(&self, channel: &Channel, shard_id: u32) -> Result<()> {
        self.save_all(std::slice::from_ref(channel), shard_id).await
    }

    /// Indexes and stores a batch of channels received on one shard.
    ///
    /// The four writes run concurrently and are not one transaction: if one
    /// fails the others may already have landed. Saving the same channels
    /// again converges everything.
    pub async fn save_all(&self, channels: &[Channel], shard_id: u32) -> Result<()> {
        if channels.is_empty() {
            return Ok(());
        }

        let shard = u64::from(shard_id);
        let channel_ids = channels.iter().map(Entity::id).collect::<Vec<_>>();
        let by_guild = channels
            .iter()
            .filter_map(|channel| Some((Entity::guild_id(channel)?, Entity::id(channel))))
            .into_group_map();
        let guild_ids = by_guild.keys().copied().collect::<Vec<_>>();

        let add_to_guild_index = try_join_all(
            by_guild
                .iter()
                .map(|(&guild_id, ids)| self.guild_index.add_elements(guild_id, ids)),
        );

        try_join!(
            self.shard_index.add_elements(shard, &channel_ids),
            add_to_guild_index,
            self.guild_shard_index.add_elements(shard, &guild_ids),
            self.channels
                .put_all(channels.iter().map(|channel| (Entity::id(channel), channel))),
        )?;

        debug!(
            "saved {} {}s across {} guilds in shard {shard_id}",
            channels.len(),
            Channel::NAME,
            guild_ids.len()
        );
        Ok(())
    }

    /// Atomically unindexes and removes one channel, returning 1 if its
    /// record existed and 0 otherwise.
    ///
    /// Without `guild_id` the guild index is left alone.
    pub async fn delete(&self, channel_id: u64, guild_id: Option<u64>) -> Result<u64> {
        let mut script_keys = vec![
            self.channels.key().to_owned(),
            self.shard_index.key().to_owned(),
        ];
        script_keys.extend(guild_id.map(|guild_id| self.guild_index.key(guild_id)));

        let removed = self
            .store
            .eval(&DELETE_SCRIPT, &script_keys, &[keys::id(channel_id)])
            .await?;

        let style = AnsiColor::Yellow.on_default();
        debug!("{style}deleted {}{style:#} {channel_id}", Channel::NAME);
        Ok(u64::try_from(removed).unwrap_or_default())
    }

    /// Removes a guild's channels along with every index entry for the guild.
    pub async fn delete_by_guild_id(&self, guild_id: u64) -> Result<u64> {
        // The member set is the only record of which channels belong to the
        // guild, so it has to be read before the group is dropped.
        let channel_ids = collect_ids(self.guild_index.elements_in_group(guild_id))
            .await?
            .into_iter()
            .collect::<Vec<_>>();
        let guild_ids = [guild_id];

        try_join!(
            self.shard_index.remove_elements(&channel_ids),
            self.guild_index.delete_group(guild_id),
            self.guild_shard_index.remove_elements(&guild_ids),
        )?;

        let removed = self.channels.remove(&channel_ids).await?;

        let style = AnsiColor::Yellow.on_default();
        debug!("{style}deleted guild{style:#} {guild_id}: {removed} {}s", Channel::NAME);
        Ok(removed)
    }

    /// Removes every channel reachable from a shard, directly or through one
    /// of the shard's guilds, and drops the shard from all three indexes.
    pub async fn delete_by_shard_id(&self, shard_id: u32) -> Result<u64> {
        let shard = u64::from(shard_id);

        // Each group is enumerated strictly before it is deleted.
        let take_channel_ids = async {
            let ids = collect_ids(self.shard_index.elements_by_group(shard)).await?;
            self.shard_index.delete_by_group_id(shard).await?;
            Result::Ok(ids)
        };
        let take_guild_ids = async {
            let ids = collect_ids(self.guild_shard_index.elements_by_group(shard)).await?;
            self.guild_shard_index.delete_by_group_id(shard).await?;
            Result::Ok(ids.into_iter().collect::<Vec<_>>())
        };
        let (mut channel_ids, guild_ids) = try_join!(take_channel_ids, take_guild_ids)?;

        let guild_channel_ids =
            collect_ids(self.guild_index.elements_in_groups(guild_ids.clone())).await?;
        self.guild_index.delete_groups(&guild_ids).await?;

        channel_ids.extend(guild_channel_ids);
        let channel_ids = channel_ids.into_iter().collect::<Vec<_>>();
        let removed = self.channels.remove(&channel_ids).await?;

        let style = AnsiColor::Yellow.on_default();
        debug!(
            "{style}deleted shard{style:#} {shard_id}: {} guilds, {removed} {}s",
            guild_ids.len(),
            Channel::NAME
        );
        Ok(removed)
    }

    pub async fn count_channels(&self) -> Result<u64> {
        self.channels.size().await
    }

    pub async fn count_channels_in_guild(&self, guild_id: u64) -> Result<u64> {
        self.guild_index.count_elements_in_group(guild_id).await
    }

    pub async fn count_channels_in_shard(&self, shard_id: u32) -> Result<u64> {
        self.shard_index
            .count_elements_in_group(u64::from(shard_id))
            .await
    }

    pub async fn get_channel_by_id(&self, channel_id: u64) -> Result<Option<Channel>> {
        self.channels.get(channel_id).await
    }

    pub fn get_channels(&self) -> impl Stream<Item = Result<Channel>> + '_ {
        self.channels.values()
    }

    /// Streams the guild's channels. Ids still indexed but without a record
    /// are skipped.
    pub fn get_channels_in_guild(
        &self,
        guild_id: u64,
    ) -> impl Stream<Item = Result<Channel>> + '_ {
        try_stream! {
            let ids = collect_ids(self.guild_index.elements_in_group(guild_id)).await?;
            let ids = ids.into_iter().collect::<Vec<_>>();
            for channel in self.channels.multi_get(&ids).await? {
                yield channel;
            }
        }
    }

    pub async fn get_shard_of_channel(&self, channel_id: u64) -> Result<Option<u32>> {
        let maybe_shard = self.shard_index.group_of(channel_id).await?;
        maybe_shard
            .map(|shard| u32::try_from(shard).map_err(|_| Error::InvalidId(shard.to_string())))
            .transpose()
    }

    pub async fn get_guild_ids_in_shard(&self, shard_id: u32) -> Result<HashSet<u64>> {
        collect_ids(self.guild_shard_index.elements_by_group(u64::from(shard_id))).await
    }
}

// KEYS: channel table, shard index, guild index group (optional); ARGV: channel id
fn delete_channel(
    ctx: &mut dyn ScriptContext,
    script_keys: &[String],
    args: &[String],
) -> Result<i64> {
    let Some(channel_id) = args.first() else {
        return Ok(0);
    };

    remove_member(ctx, &script_keys[1], channel_id);

    if let Some(guild_key) = script_keys.get(2) {
        ctx.srem(guild_key, channel_id);
    }

    Ok(i64::from(ctx.hdel(&script_keys[0], channel_id)))
}
