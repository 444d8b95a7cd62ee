use std::marker::PhantomData;

use async_stream::try_stream;
use serde::{de::DeserializeOwned, Serialize};
use tokio_stream::Stream;

use crate::{
    error::Result,
    keys,
    serde::{deserialize, serialize},
    store::{SharedStore, SCAN_PAGE_SIZE},
};

/// A table of records keyed by numeric id, stored as one hash.
#[derive(Debug)]
pub struct HashStore<V> {
    store: SharedStore,
    key: String,
    marker: PhantomData<fn() -> V>,
}

impl<V: Serialize + DeserializeOwned> HashStore<V> {
    pub fn new(store: SharedStore, key: String) -> Self {
        HashStore {
            store,
            key,
            marker: PhantomData,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn get(&self, id: u64) -> Result<Option<V>> {
        let maybe_bytes = self.store.hget(&self.key, &keys::id(id)).await?;
        maybe_bytes.as_deref().map(deserialize).transpose()
    }

    /// Fetches every record present among `ids`; missing ids are skipped.
    pub async fn multi_get(&self, ids: &[u64]) -> Result<Vec<V>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let fields = keys::ids(ids);
        let values = self.store.hmget(&self.key, &fields).await?;
        values
            .into_iter()
            .flatten()
            .map(|bytes| deserialize(&bytes))
            .collect()
    }

    pub async fn put(&self, id: u64, value: &V) -> Result<()> {
        self.put_all([(id, value)]).await
    }

    pub async fn put_all<'a, I>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (u64, &'a V)>,
        V: 'a,
    {
        let entries = entries
            .into_iter()
            .map(|(id, value)| Ok((keys::id(id), serialize(value)?)))
            .collect::<Result<Vec<_>>>()?;

        if entries.is_empty() {
            return Ok(());
        }

        self.store.hset(&self.key, entries).await
    }

    /// Returns how many of `ids` were actually present.
    pub async fn remove(&self, ids: &[u64]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        self.store.hdel(&self.key, &keys::ids(ids)).await
    }

    pub async fn size(&self) -> Result<u64> {
        self.store.hlen(&self.key).await
    }

    /// Streams every record through a live scan of the table.
    ///
    /// Records written or removed while the scan is running may or may not
    /// show up.
    pub fn values(&self) -> impl Stream<Item = Result<V>> + '_ {
        try_stream! {
            let mut cursor = None;
            loop {
                let page = self.store.hscan(&self.key, cursor, SCAN_PAGE_SIZE).await?;
                for (_, bytes) in page.entries {
                    yield deserialize::<V>(&bytes)?;
                }

                cursor = page.cursor;
                if cursor.is_none() {
                    break;
                }
            }
        }
    }
}
