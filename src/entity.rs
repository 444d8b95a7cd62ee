use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// A cached record with a stable numeric identity.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync {
    const NAME: &'static str;

    fn id(&self) -> u64;

    fn guild_id(&self) -> Option<u64> {
        None
    }
}

/// A guild or private channel, replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub guild_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub last_message_id: Option<u64>,
    #[serde(default)]
    pub nsfw: Option<bool>,
}

impl Channel {
    pub fn new(id: u64, kind: u8) -> Self {
        Channel {
            id,
            kind,
            guild_id: None,
            name: None,
            topic: None,
            position: None,
            parent_id: None,
            last_message_id: None,
            nsfw: None,
        }
    }

    #[must_use]
    pub fn with_guild(mut self, guild_id: u64) -> Self {
        self.guild_id = Some(guild_id);
        self
    }

    #[must_use]
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Entity for Channel {
    const NAME: &'static str = "channel";

    fn id(&self) -> u64 {
        self.id
    }

    fn guild_id(&self) -> Option<u64> {
        self.guild_id
    }
}
