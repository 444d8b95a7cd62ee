use std::fmt;

use crate::error::{Error, Result};

/// Synchronous view of the store handed to a running [`Script`].
pub trait ScriptContext {
    fn hget(&mut self, key: &str, field: &str) -> Option<Vec<u8>>;
    fn hset(&mut self, key: &str, field: &str, value: Vec<u8>);
    fn hdel(&mut self, key: &str, field: &str) -> bool;
    fn sadd(&mut self, key: &str, member: &str) -> bool;
    fn srem(&mut self, key: &str, member: &str) -> bool;
    fn smembers(&mut self, key: &str) -> Vec<String>;
    fn del(&mut self, key: &str) -> bool;
}

pub type ScriptBody = fn(&mut dyn ScriptContext, &[String], &[String]) -> Result<i64>;

/// A named server-side script taking keys and string arguments and returning
/// an integer, in the style of `EVAL`.
#[derive(Clone, Copy)]
pub struct Script {
    name: &'static str,
    min_keys: usize,
    max_keys: usize,
    body: ScriptBody,
}

impl Script {
    pub const fn new(name: &'static str, min_keys: usize, max_keys: usize, body: ScriptBody) -> Self {
        Script {
            name,
            min_keys,
            max_keys,
            body,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn check_keys(&self, keys: &[String]) -> Result<()> {
        let count = keys.len();
        if count < self.min_keys || count > self.max_keys {
            return Err(Error::ScriptArity {
                script: self.name,
                min: self.min_keys,
                max: self.max_keys,
                actual: count,
            });
        }

        Ok(())
    }

    pub fn run(&self, ctx: &mut dyn ScriptContext, keys: &[String], args: &[String]) -> Result<i64> {
        self.check_keys(keys)?;
        (self.body)(ctx, keys, args)
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("name", &self.name)
            .field("keys", &(self.min_keys..=self.max_keys))
            .finish_non_exhaustive()
    }
}
