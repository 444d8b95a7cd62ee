use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    ops::Bound,
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use log::trace;
use tokio::{
    sync::{Mutex, MutexGuard},
    time::sleep,
};

use crate::error::{Error, Result};

use super::{stats::StatsCounter, ScanPage, Script, ScriptContext, Store, StoreStats};

#[derive(Debug, Default)]
struct Tables {
    hashes: HashMap<String, BTreeMap<String, Vec<u8>>>,
    sets: HashMap<String, BTreeSet<String>>,
}

impl ScriptContext for Tables {
    fn hget(&mut self, key: &str, field: &str) -> Option<Vec<u8>> {
        self.hashes.get(key)?.get(field).cloned()
    }

    fn hset(&mut self, key: &str, field: &str, value: Vec<u8>) {
        self.hashes
            .entry(key.to_owned())
            .or_default()
            .insert(field.to_owned(), value);
    }

    fn hdel(&mut self, key: &str, field: &str) -> bool {
        let Some(hash) = self.hashes.get_mut(key) else {
            return false;
        };

        let removed = hash.remove(field).is_some();
        if hash.is_empty() {
            self.hashes.remove(key);
        }

        removed
    }

    fn sadd(&mut self, key: &str, member: &str) -> bool {
        self.sets
            .entry(key.to_owned())
            .or_default()
            .insert(member.to_owned())
    }

    fn srem(&mut self, key: &str, member: &str) -> bool {
        let Some(set) = self.sets.get_mut(key) else {
            return false;
        };

        let removed = set.remove(member);
        if set.is_empty() {
            self.sets.remove(key);
        }

        removed
    }

    fn smembers(&mut self, key: &str) -> Vec<String> {
        self.sets
            .get(key)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn del(&mut self, key: &str) -> bool {
        let hash_removed = self.hashes.remove(key).is_some();
        let set_removed = self.sets.remove(key).is_some();
        hash_removed || set_removed
    }
}

/// In-process store with the semantics of a remote hash/set server.
///
/// Every request optionally sleeps for a fixed latency before it is served,
/// so concurrent callers interleave the way they would over a network.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    latency: Option<Duration>,
    offline: AtomicBool,
    stats: StatsCounter,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn with_latency(latency: Option<Duration>) -> Self {
        MemoryStore {
            latency,
            ..MemoryStore::default()
        }
    }

    /// While offline, every request fails with [`Error::StoreUnavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    async fn connect(&self) -> Result<MutexGuard<'_, Tables>> {
        if let Some(latency) = self.latency {
            sleep(latency).await;
        }

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::StoreUnavailable("connection refused".to_owned()));
        }

        Ok(self.tables.lock().await)
    }

    async fn read(&self) -> Result<MutexGuard<'_, Tables>> {
        self.stats.add_read();
        self.connect().await
    }

    async fn write(&self) -> Result<MutexGuard<'_, Tables>> {
        self.stats.add_write();
        self.connect().await
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn hget(&self, key: &str, field: &str) -> Result<Option<Vec<u8>>> {
        let mut tables = self.read().await?;
        Ok(tables.hget(key, field))
    }

    async fn hmget(&self, key: &str, fields: &[String]) -> Result<Vec<Option<Vec<u8>>>> {
        let mut tables = self.read().await?;
        let values = fields.iter().map(|field| tables.hget(key, field)).collect();
        Ok(values)
    }

    async fn hset(&self, key: &str, entries: Vec<(String, Vec<u8>)>) -> Result<()> {
        let mut tables = self.write().await?;
        for (field, value) in entries {
            tables.hset(key, &field, value);
        }

        Ok(())
    }

    async fn hdel(&self, key: &str, fields: &[String]) -> Result<u64> {
        let mut tables = self.write().await?;
        let count = fields.iter().filter(|field| tables.hdel(key, field)).count();
        Ok(count as u64)
    }

    async fn hlen(&self, key: &str) -> Result<u64> {
        let tables = self.read().await?;
        let len = tables.hashes.get(key).map_or(0, BTreeMap::len);
        Ok(len as u64)
    }

    async fn hscan(&self, key: &str, cursor: Option<String>, count: usize) -> Result<ScanPage> {
        let tables = self.read().await?;
        let Some(hash) = tables.hashes.get(key) else {
            return Ok(ScanPage::default());
        };

        let count = count.max(1);
        let start = cursor.map_or(Bound::Unbounded, Bound::Excluded);
        let entries = hash
            .range((start, Bound::Unbounded))
            .take(count)
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect::<Vec<_>>();

        let cursor = if entries.len() < count {
            None
        } else {
            entries.last().map(|(field, _)| field.clone())
        };

        Ok(ScanPage { cursor, entries })
    }

    async fn sadd(&self, key: &str, members: &[String]) -> Result<u64> {
        let mut tables = self.write().await?;
        let count = members
            .iter()
            .filter(|member| tables.sadd(key, member))
            .count();
        Ok(count as u64)
    }

    async fn srem(&self, key: &str, members: &[String]) -> Result<u64> {
        let mut tables = self.write().await?;
        let count = members
            .iter()
            .filter(|member| tables.srem(key, member))
            .count();
        Ok(count as u64)
    }

    async fn smembers(&self, key: &str) -> Result<Vec<String>> {
        let mut tables = self.read().await?;
        Ok(tables.smembers(key))
    }

    async fn scard(&self, key: &str) -> Result<u64> {
        let tables = self.read().await?;
        let len = tables.sets.get(key).map_or(0, BTreeSet::len);
        Ok(len as u64)
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        let mut tables = self.write().await?;
        let count = keys.iter().filter(|key| tables.del(key)).count();
        Ok(count as u64)
    }

    async fn eval(&self, script: &Script, keys: &[String], args: &[String]) -> Result<i64> {
        self.stats.add_script();
        let mut tables = self.connect().await?;
        trace!("eval {} keys={keys:?} args={args:?}", script.name());
        script.run(&mut *tables, keys, args)
    }

    fn stats(&self) -> StoreStats {
        self.stats.snapshot()
    }
}
