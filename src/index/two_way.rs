use log::trace;
use tokio_stream::Stream;

use crate::{
    error::Result,
    keys,
    store::{Script, ScriptContext, SharedStore},
};

use super::{group_members, groups_members, script_count};

static ADD_SCRIPT: Script = Script::new("two-way-add", 1, 1, add_members);
static REMOVE_SCRIPT: Script = Script::new("two-way-remove", 1, 1, remove_members);
static DELETE_GROUP_SCRIPT: Script = Script::new("two-way-delete-group", 1, 1, delete_group);

/// Maps a group to its members and each member back to its single group.
///
/// Both directions are only ever changed together, inside one script, so a
/// member resolves to at most one group and is always in that group's set.
#[derive(Debug)]
pub struct TwoWayIndex {
    store: SharedStore,
    key: String,
    reverse_key: String,
}

impl TwoWayIndex {
    pub fn new(store: SharedStore, key: String) -> Self {
        let reverse_key = keys::reverse(&key);
        TwoWayIndex {
            store,
            key,
            reverse_key,
        }
    }

    /// Base key of the index, as expected by [`remove_member`] inside a
    /// caller's own script.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key of the hash mapping members to their group.
    pub fn reverse_key(&self) -> &str {
        &self.reverse_key
    }

    pub fn group_key(&self, group_id: u64) -> String {
        keys::group(&self.key, group_id)
    }

    /// Puts every member into `group_id`, moving it out of any group it was
    /// in before.
    pub async fn add_elements(&self, group_id: u64, member_ids: &[u64]) -> Result<()> {
        if member_ids.is_empty() {
            return Ok(());
        }

        let mut args = Vec::with_capacity(member_ids.len() + 1);
        args.push(keys::id(group_id));
        args.extend(keys::ids(member_ids));

        let added = self.eval(&ADD_SCRIPT, &args).await?;
        trace!("{}: {added} new members in group {group_id}", self.key);
        Ok(())
    }

    /// Removes each member from whatever group it is currently in.
    pub async fn remove_elements(&self, member_ids: &[u64]) -> Result<u64> {
        if member_ids.is_empty() {
            return Ok(0);
        }

        let removed = self.eval(&REMOVE_SCRIPT, &keys::ids(member_ids)).await?;
        Ok(script_count(removed))
    }

    pub fn elements_by_group(&self, group_id: u64) -> impl Stream<Item = Result<u64>> + '_ {
        group_members(&self.store, self.group_key(group_id))
    }

    pub fn elements_in_groups<I>(&self, group_ids: I) -> impl Stream<Item = Result<u64>> + '_
    where
        I: IntoIterator<Item = u64>,
    {
        let group_keys = group_ids.into_iter().map(|id| self.group_key(id)).collect();
        groups_members(&self.store, group_keys)
    }

    pub async fn count_elements_in_group(&self, group_id: u64) -> Result<u64> {
        self.store.scard(&self.group_key(group_id)).await
    }

    pub async fn group_of(&self, member_id: u64) -> Result<Option<u64>> {
        let maybe_group = self
            .store
            .hget(&self.reverse_key, &keys::id(member_id))
            .await?;
        maybe_group.as_deref().map(keys::parse_id_bytes).transpose()
    }

    /// Drops the group and the reverse entries of its members, returning how
    /// many members it had.
    pub async fn delete_by_group_id(&self, group_id: u64) -> Result<u64> {
        let removed = self.eval(&DELETE_GROUP_SCRIPT, &[keys::id(group_id)]).await?;
        Ok(script_count(removed))
    }

    async fn eval(&self, script: &Script, args: &[String]) -> Result<i64> {
        self.store.eval(script, &[self.key.clone()], args).await
    }
}

/// Removes `member` from its group and clears its reverse entry.
///
/// Meant to run inside a script; `index_key` is [`TwoWayIndex::key`].
pub(crate) fn remove_member(ctx: &mut dyn ScriptContext, index_key: &str, member: &str) -> bool {
    let reverse_key = keys::reverse(index_key);
    let Some(group) = ctx.hget(&reverse_key, member) else {
        return false;
    };

    ctx.srem(&keys::group(index_key, String::from_utf8_lossy(&group)), member);
    ctx.hdel(&reverse_key, member)
}

// KEYS: index; ARGV: group, members...
fn add_members(
    ctx: &mut dyn ScriptContext,
    script_keys: &[String],
    args: &[String],
) -> Result<i64> {
    let index_key = &script_keys[0];
    let Some((group, members)) = args.split_first() else {
        return Ok(0);
    };

    let reverse_key = keys::reverse(index_key);
    let group_key = keys::group(index_key, group);
    let mut added = 0;

    for member in members {
        if let Some(previous) = ctx.hget(&reverse_key, member) {
            if previous != group.as_bytes() {
                let previous_key = keys::group(index_key, String::from_utf8_lossy(&previous));
                ctx.srem(&previous_key, member);
            }
        }

        if ctx.sadd(&group_key, member) {
            added += 1;
        }
        ctx.hset(&reverse_key, member, group.as_bytes().to_vec());
    }

    Ok(added)
}

// KEYS: index; ARGV: members...
fn remove_members(
    ctx: &mut dyn ScriptContext,
    script_keys: &[String],
    args: &[String],
) -> Result<i64> {
    let index_key = &script_keys[0];
    let mut removed = 0;
    for member in args {
        if remove_member(ctx, index_key, member) {
            removed += 1;
        }
    }

    Ok(removed)
}

// KEYS: index; ARGV: group
fn delete_group(
    ctx: &mut dyn ScriptContext,
    script_keys: &[String],
    args: &[String],
) -> Result<i64> {
    let index_key = &script_keys[0];
    let Some(group) = args.first() else {
        return Ok(0);
    };

    let reverse_key = keys::reverse(index_key);
    let group_key = keys::group(index_key, group);
    let members = ctx.smembers(&group_key);

    for member in &members {
        if ctx.hget(&reverse_key, member).as_deref() == Some(group.as_bytes()) {
            ctx.hdel(&reverse_key, member);
        }
    }

    ctx.del(&group_key);
    Ok(i64::try_from(members.len()).unwrap_or(i64::MAX))
}
