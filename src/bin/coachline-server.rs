// ABOUTME: Coachline HTTP server binary
// ABOUTME: Loads configuration, opens the database, starts the delivery worker and serves the API
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Coachline Server Binary
//!
//! Serves availability slots, appointments and notification sends over HTTP.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use coachline_server::{
    config::ServerConfig,
    database::Database,
    logging,
    notifications::{ChannelSenders, MpscDeliveryQueue},
    resources::ServerResources,
    server,
};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "coachline-server")]
#[command(about = "Coachline - coach availability slots and notification fan-out")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    logging::init_from_env()?;
    info!("{}", config.summary());

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized");

    let senders = ChannelSenders::from_config(&config.delivery);
    let (queue, worker) = MpscDeliveryQueue::spawn(config.delivery.queue_capacity, senders);

    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(
        database,
        Arc::new(config),
        Arc::new(queue),
    ));

    let served = server::run_http_server(resources, port).await;
    if let Err(ref e) = served {
        error!(error = %e, "Server stopped with an error");
    }

    // Every queue handle lives in the resources dropped above, so the worker
    // drains its backlog and exits.
    if let Err(e) = worker.await {
        warn!(error = %e, "Delivery worker did not shut down cleanly");
    }
    info!("Coachline server shut down");
    served
}
