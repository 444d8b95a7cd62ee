use std::fmt::Display;

use crate::error::{Error, Result};

pub const DEFAULT_PREFIX: &str = "guildcache";
pub const SEPARATOR: char = ':';

pub const SHARD_INDEX: &str = "shard-index";
pub const GUILD_INDEX: &str = "guild-index";
pub const GUILD_SHARD_INDEX: &str = "guild-shard-index";

const REVERSE_SUFFIX: &str = "members";

pub fn table(prefix: &str, name: &str) -> String {
    format!("{prefix}{SEPARATOR}{name}")
}

pub fn index(table_key: &str, suffix: &str) -> String {
    format!("{table_key}{SEPARATOR}{suffix}")
}

pub fn group<T: Display>(index_key: &str, group_id: T) -> String {
    format!("{index_key}{SEPARATOR}{group_id}")
}

pub fn reverse(index_key: &str) -> String {
    format!("{index_key}{SEPARATOR}{REVERSE_SUFFIX}")
}

pub fn id(id: u64) -> String {
    id.to_string()
}

pub fn ids<'a, I: IntoIterator<Item = &'a u64>>(ids: I) -> Vec<String> {
    ids.into_iter().copied().map(id).collect()
}

pub fn parse_id(s: &str) -> Result<u64> {
    s.parse().map_err(|_| Error::InvalidId(s.to_owned()))
}

pub fn parse_id_bytes(bytes: &[u8]) -> Result<u64> {
    let s = std::str::from_utf8(bytes)
        .map_err(|_| Error::InvalidId(String::from_utf8_lossy(bytes).into_owned()))?;
    parse_id(s)
}
