use crate::error::{Error, Result};

use super::{MemoryStore, Script, ScriptContext, Store};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn entry(field: &str, value: &str) -> (String, Vec<u8>) {
    (field.to_owned(), value.as_bytes().to_vec())
}

#[tokio::test]
async fn hash_upsert_replaces() {
    let store = MemoryStore::new();
    store.hset("h", vec![entry("1", "a")]).await.unwrap();
    store.hset("h", vec![entry("1", "b"), entry("2", "c")]).await.unwrap();

    assert_eq!(store.hget("h", "1").await.unwrap(), Some(b"b".to_vec()));
    assert_eq!(store.hlen("h").await.unwrap(), 2);
    assert_eq!(store.hget("h", "3").await.unwrap(), None);
    assert_eq!(store.hget("missing", "1").await.unwrap(), None);
}

#[tokio::test]
async fn hash_multi_get_keeps_positions() {
    let store = MemoryStore::new();
    store.hset("h", vec![entry("1", "a"), entry("3", "c")]).await.unwrap();

    let values = store.hmget("h", &strings(&["1", "2", "3"])).await.unwrap();
    assert_eq!(values, vec![Some(b"a".to_vec()), None, Some(b"c".to_vec())]);
}

#[tokio::test]
async fn hash_delete_counts_and_drops_empty_key() {
    let store = MemoryStore::new();
    store.hset("h", vec![entry("1", "a"), entry("2", "b")]).await.unwrap();

    assert_eq!(store.hdel("h", &strings(&["1", "9"])).await.unwrap(), 1);
    assert_eq!(store.hdel("h", &strings(&["2"])).await.unwrap(), 1);
    assert_eq!(store.hlen("h").await.unwrap(), 0);
    assert_eq!(store.del(&strings(&["h"])).await.unwrap(), 0);
}

#[tokio::test]
async fn hash_scan_pages_through_everything() {
    let store = MemoryStore::new();
    let entries = (0..25).map(|i| entry(&format!("{i:02}"), "x")).collect();
    store.hset("h", entries).await.unwrap();

    let mut cursor = None;
    let mut seen = vec![];
    loop {
        let page = store.hscan("h", cursor, 10).await.unwrap();
        assert!(page.entries.len() <= 10);
        seen.extend(page.entries.into_iter().map(|(field, _)| field));
        cursor = page.cursor;
        if cursor.is_none() {
            break;
        }
    }

    assert_eq!(seen.len(), 25);
    assert_eq!(seen.first().map(String::as_str), Some("00"));
    assert_eq!(seen.last().map(String::as_str), Some("24"));
}

#[tokio::test]
async fn set_semantics() {
    let store = MemoryStore::new();
    assert_eq!(store.sadd("s", &strings(&["a", "b", "a"])).await.unwrap(), 2);
    assert_eq!(store.sadd("s", &strings(&["b", "c"])).await.unwrap(), 1);
    assert_eq!(store.scard("s").await.unwrap(), 3);
    assert_eq!(store.smembers("s").await.unwrap(), strings(&["a", "b", "c"]));

    assert_eq!(store.srem("s", &strings(&["a", "z"])).await.unwrap(), 1);
    assert_eq!(store.del(&strings(&["s", "nope"])).await.unwrap(), 1);
    assert!(store.smembers("s").await.unwrap().is_empty());
    assert_eq!(store.scard("s").await.unwrap(), 0);
}

fn move_member(ctx: &mut dyn ScriptContext, keys: &[String], args: &[String]) -> Result<i64> {
    let (from, to) = (&keys[0], &keys[1]);
    let mut moved = 0;
    for member in args {
        if ctx.srem(from, member) {
            ctx.sadd(to, member);
            moved += 1;
        }
    }

    Ok(moved)
}

static MOVE_SCRIPT: Script = Script::new("move", 2, 2, move_member);

#[tokio::test]
async fn script_runs_against_store() {
    let store = MemoryStore::new();
    store.sadd("from", &strings(&["a", "b"])).await.unwrap();

    let moved = store
        .eval(&MOVE_SCRIPT, &strings(&["from", "to"]), &strings(&["a", "x"]))
        .await
        .unwrap();

    assert_eq!(moved, 1);
    assert_eq!(store.smembers("from").await.unwrap(), strings(&["b"]));
    assert_eq!(store.smembers("to").await.unwrap(), strings(&["a"]));
    assert_eq!(store.stats().script_requests, 1);
}

#[tokio::test]
async fn script_checks_key_count() {
    let store = MemoryStore::new();
    let result = store.eval(&MOVE_SCRIPT, &strings(&["from"]), &[]).await;
    assert_eq!(
        result,
        Err(Error::ScriptArity {
            script: "move",
            min: 2,
            max: 2,
            actual: 1
        })
    );
}

#[tokio::test]
async fn offline_store_is_unavailable() {
    let store = MemoryStore::new();
    store.hset("h", vec![entry("1", "a")]).await.unwrap();
    store.set_offline(true);

    let err = store.hget("h", "1").await.unwrap_err();
    assert!(err.is_unavailable());
    assert!(store.sadd("s", &strings(&["a"])).await.is_err());

    store.set_offline(false);
    assert_eq!(store.hget("h", "1").await.unwrap(), Some(b"a".to_vec()));
}

#[tokio::test]
async fn stats_count_requests() {
    let store = MemoryStore::new();
    store.hset("h", vec![entry("1", "a")]).await.unwrap();
    store.hget("h", "1").await.unwrap();
    store.smembers("s").await.unwrap();

    let stats = store.stats();
    assert_eq!(stats.write_requests, 1);
    assert_eq!(stats.read_requests, 2);
    assert_eq!(stats.total_requests(), 3);
}
