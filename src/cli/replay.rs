use std::{sync::Arc, time::Instant};

use clap::builder::styling::AnsiColor;
use humantime::format_duration;
use log::{debug, info};
use tokio::{
    fs::File,
    io::{AsyncBufReadExt, BufReader},
};
use tokio_stream::StreamExt;

use crate::{
    error::Result,
    repository::ChannelRepository,
    store::{SharedStore, Store},
    updater::{GatewayEvent, Updater},
};

use super::{args::ReplayArgs, print_stat, store::create_store};

pub async fn main(cli: ReplayArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = create_store(&cli.global)?;
    let store: SharedStore = config.store.clone();
    let channels = Arc::new(ChannelRepository::new(store, &config.prefix));
    let updater = Updater::new(channels.clone());

    let file = File::open(&cli.file).await?;
    let mut lines = BufReader::new(file).lines();
    let mut line_number = 0;
    let mut applied = 0;
    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let event = GatewayEvent::from_json(line_number, &line)?;
        debug!("line {line_number}: shard {}", event.shard());
        updater.apply(event).await?;
        applied += 1;
    }

    info!("applied {applied} events");
    info!("{} channels cached", channels.count_channels().await?);

    if let Some(guild_id) = cli.guild {
        let mut guild_channels = channels
            .get_channels_in_guild(guild_id)
            .collect::<Result<Vec<_>>>()
            .await?;
        guild_channels.sort_by_key(|channel| (channel.position, channel.id));

        let id_style = AnsiColor::Blue.on_default();
        for channel in &guild_channels {
            let name = channel.name.as_deref().unwrap_or("");
            info!("{id_style}{}{id_style:#} {name}", channel.id);
        }
    }

    if cli.global.stats {
        let stats = config.store.stats();
        print_stat("read requests", stats.read_requests);
        print_stat("write requests", stats.write_requests);
        print_stat("script requests", stats.script_requests);
        print_stat("elapsed time", format_duration(start_time.elapsed()));
    }

    Ok(())
}
