use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    entity::Channel,
    error::{Error, Result},
    repository::ChannelRepository,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildCreate {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// A gateway event, tagged by `"type"` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatewayEvent {
    ChannelCreate { shard: u32, channel: Channel },
    ChannelUpdate { shard: u32, channel: Channel },
    ChannelDelete { shard: u32, channel: Channel },
    GuildCreate { shard: u32, guild: GuildCreate },
    GuildDelete { shard: u32, guild_id: u64 },
    ShardInvalidate { shard: u32 },
}

impl GatewayEvent {
    pub fn from_json(line: usize, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| Error::InvalidEvent {
            line,
            reason: err.to_string(),
        })
    }

    pub fn shard(&self) -> u32 {
        match self {
            GatewayEvent::ChannelCreate { shard, .. }
            | GatewayEvent::ChannelUpdate { shard, .. }
            | GatewayEvent::ChannelDelete { shard, .. }
            | GatewayEvent::GuildCreate { shard, .. }
            | GatewayEvent::GuildDelete { shard, .. }
            | GatewayEvent::ShardInvalidate { shard } => *shard,
        }
    }
}

/// Turns gateway events into channel repository writes.
#[derive(Debug)]
pub struct Updater {
    channels: Arc<ChannelRepository>,
}

impl Updater {
    pub fn new(channels: Arc<ChannelRepository>) -> Self {
        Updater { channels }
    }

    pub async fn apply(&self, event: GatewayEvent) -> Result<()> {
        match event {
            GatewayEvent::ChannelCreate { shard, channel }
            | GatewayEvent::ChannelUpdate { shard, channel } => {
                self.channels.save(&channel, shard).await
            }
            GatewayEvent::ChannelDelete { channel, .. } => {
                self.channels.delete(channel.id, channel.guild_id).await?;
                Ok(())
            }
            GatewayEvent::GuildCreate { shard, guild } => {
                // Channels inside a guild payload come without a guild id.
                let channels = guild
                    .channels
                    .into_iter()
                    .map(|channel| Channel {
                        guild_id: channel.guild_id.or(Some(guild.id)),
                        ..channel
                    })
                    .collect::<Vec<_>>();
                debug!("guild {} arrived with {} channels", guild.id, channels.len());
                self.channels.save_all(&channels, shard).await
            }
            GatewayEvent::GuildDelete { guild_id, .. } => {
                self.channels.delete_by_guild_id(guild_id).await?;
                Ok(())
            }
            GatewayEvent::ShardInvalidate { shard } => {
                self.channels.delete_by_shard_id(shard).await?;
                Ok(())
            }
        }
    }
}
