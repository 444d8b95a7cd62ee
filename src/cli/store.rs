use std::{
    env::{self, VarError},
    ffi::OsStr,
    sync::Arc,
};

use humantime::parse_duration;

use crate::{
    error::{Error, Result},
    keys,
    store::MemoryStore,
};

use super::args::GlobalArgs;

const ENV_VAR_PREFIX: &str = "GUILDCACHE_PREFIX";
const ENV_VAR_LATENCY: &str = "GUILDCACHE_LATENCY";

#[derive(Debug)]
pub struct StoreConfig {
    pub prefix: String,
    pub store: Arc<MemoryStore>,
}

/// Builds the store from arguments, falling back to the environment for
/// anything not given on the command line.
pub fn create_store(args: &GlobalArgs) -> Result<StoreConfig> {
    let prefix = match &args.prefix {
        Some(prefix) => prefix.clone(),
        None => get_env_var(ENV_VAR_PREFIX)?.unwrap_or_else(|| keys::DEFAULT_PREFIX.to_owned()),
    };
    if prefix.is_empty() || prefix.contains(keys::SEPARATOR) {
        return Err(Error::Cli(format!(
            "key prefix `{prefix}` must be non-empty and can't contain `{}`",
            keys::SEPARATOR
        )));
    }

    let latency = match args.latency {
        Some(latency) => Some(latency),
        None => get_env_var(ENV_VAR_LATENCY)?
            .as_deref()
            .map(parse_duration)
            .transpose()?,
    };

    Ok(StoreConfig {
        prefix,
        store: Arc::new(MemoryStore::with_latency(latency)),
    })
}

fn get_env_var<T: AsRef<OsStr>>(name: T) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::error::Error;

    use super::{
        super::args::{GlobalArgs, LoggerArgs},
        create_store,
    };

    fn args(prefix: &str) -> GlobalArgs {
        GlobalArgs {
            prefix: Some(prefix.to_owned()),
            latency: Some(Duration::from_millis(1)),
            stats: false,
            logger: LoggerArgs {
                verbose: 0,
                quiet: 0,
            },
        }
    }

    #[test]
    fn arguments_take_precedence() {
        let config = create_store(&args("test")).unwrap();
        assert_eq!(config.prefix, "test");
    }

    #[test]
    fn rejects_bad_prefix() {
        assert!(matches!(create_store(&args("")), Err(Error::Cli(_))));
        assert!(matches!(create_store(&args("a:b")), Err(Error::Cli(_))));
    }
}
