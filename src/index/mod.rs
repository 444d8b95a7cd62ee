//! Group membership indexes.
//!
//! A group index maps a group id to the set of member ids stored under
//! `{index}:{group}`. The two-way variant additionally keeps a reverse hash
//! under `{index}:members` mapping each member to its one current group.

mod one_way;
mod two_way;

use std::collections::HashSet;

use async_stream::try_stream;
use tokio_stream::{Stream, StreamExt};

use crate::{error::Result, keys, store::SharedStore};

pub use self::{one_way::OneWayIndex, two_way::TwoWayIndex};

pub(crate) use self::two_way::remove_member;

fn group_members(store: &SharedStore, key: String) -> impl Stream<Item = Result<u64>> + '_ {
    try_stream! {
        let members = store.smembers(&key).await?;
        for member in members {
            yield keys::parse_id(&member)?;
        }
    }
}

fn groups_members(
    store: &SharedStore,
    group_keys: Vec<String>,
) -> impl Stream<Item = Result<u64>> + '_ {
    try_stream! {
        let mut seen = HashSet::new();
        for key in group_keys {
            for member in store.smembers(&key).await? {
                let id = keys::parse_id(&member)?;
                if seen.insert(id) {
                    yield id;
                }
            }
        }
    }
}

/// Drains a membership stream into a set.
pub async fn collect_ids<S: Stream<Item = Result<u64>>>(stream: S) -> Result<HashSet<u64>> {
    let ids: Vec<u64> = stream.collect::<Result<Vec<_>>>().await?;
    Ok(ids.into_iter().collect())
}

fn script_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
