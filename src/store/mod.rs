mod memory;
mod script;
mod stats;
#[cfg(test)]
mod tests;

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;

use crate::error::Result;

pub use self::{
    memory::MemoryStore,
    script::{Script, ScriptBody, ScriptContext},
    stats::StoreStats,
};

pub const SCAN_PAGE_SIZE: usize = 100;

pub type SharedStore = Arc<dyn Store + Send + Sync + 'static>;

/// One page of a cursor-based hash scan.
///
/// A `None` cursor means the scan is complete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub cursor: Option<String>,
    pub entries: Vec<(String, Vec<u8>)>,
}

/// Hash, set and scripting commands of a remote key-value store.
///
/// Every method is a single request. Each request is atomic for the keys it
/// touches; anything spanning several requests must go through [`Store::eval`].
#[async_trait]
pub trait Store: Debug {
    async fn hget(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>>;
    async fn hmget(&self, key: &str, fields: &[String]) -> Result<Vec<Option<Vec<u8>>>>;
    async fn hset(&self, key: &str, entries: Vec<(String, Vec<u8>)>) -> Result<()>;
    async fn hdel(&self, key: &str, fields: &[String]) -> Result<u64>;
    async fn hlen(&self, key: &str) -> Result<u64>;
    async fn hscan(&self, key: &str, cursor: Option<String>, count: usize) -> Result<ScanPage>;

    async fn sadd(&self, key: &str, members: &[String]) -> Result<u64>;
    async fn srem(&self, key: &str, members: &[String]) -> Result<u64>;
    async fn smembers(&self, key: &str) -> Result<Vec<String>>;
    async fn scard(&self, key: &str) -> Result<u64>;

    async fn del(&self, keys: &[String]) -> Result<u64>;

    /// Runs `script` server-side with no other command interleaved.
    async fn eval(&self, script: &Script, keys: &[String], args: &[String]) -> Result<i64>;

    fn stats(&self) -> StoreStats;
}
