use tokio_stream::Stream;

use crate::{error::Result, keys, store::SharedStore};

use super::{group_members, groups_members};

/// Maps a group to its members, with no way back from member to group.
///
/// Removing members therefore needs the caller to name the group.
#[derive(Debug)]
pub struct OneWayIndex {
    store: SharedStore,
    key: String,
}

impl OneWayIndex {
    pub fn new(store: SharedStore, key: String) -> Self {
        OneWayIndex { store, key }
    }

    /// Key of the member set for `group_id`.
    pub fn key(&self, group_id: u64) -> String {
        keys::group(&self.key, group_id)
    }

    pub async fn add_elements(&self, group_id: u64, member_ids: &[u64]) -> Result<()> {
        if member_ids.is_empty() {
            return Ok(());
        }

        self.store
            .sadd(&self.key(group_id), &keys::ids(member_ids))
            .await?;
        Ok(())
    }

    pub async fn remove_elements(&self, group_id: u64, member_ids: &[u64]) -> Result<u64> {
        if member_ids.is_empty() {
            return Ok(0);
        }

        self.store
            .srem(&self.key(group_id), &keys::ids(member_ids))
            .await
    }

    pub fn elements_in_group(&self, group_id: u64) -> impl Stream<Item = Result<u64>> + '_ {
        group_members(&self.store, self.key(group_id))
    }

    /// Union of the members of every group in `group_ids`, each id once.
    pub fn elements_in_groups<I>(&self, group_ids: I) -> impl Stream<Item = Result<u64>> + '_
    where
        I: IntoIterator<Item = u64>,
    {
        let group_keys = group_ids.into_iter().map(|id| self.key(id)).collect();
        groups_members(&self.store, group_keys)
    }

    pub async fn count_elements_in_group(&self, group_id: u64) -> Result<u64> {
        self.store.scard(&self.key(group_id)).await
    }

    /// Drops the whole member set. Read the members first if they matter:
    /// once the set is gone they cannot be recovered.
    pub async fn delete_group(&self, group_id: u64) -> Result<()> {
        self.delete_groups(&[group_id]).await
    }

    pub async fn delete_groups(&self, group_ids: &[u64]) -> Result<()> {
        if group_ids.is_empty() {
            return Ok(());
        }

        let group_keys = group_ids.iter().map(|&id| self.key(id)).collect::<Vec<_>>();
        self.store.del(&group_keys).await?;
        Ok(())
    }
}
