//!  Roamwise Trip Planner
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Web Form Entry Point
//!
//! Serves the trip form on a local address until Ctrl-C.

use anyhow::{Context, Error, Result};
use clap::Parser;
use roamwise_trip_planner::config::{
    DEFAULT_BOOKING_BASE_URL, DEFAULT_FLIGHT_SEARCH_BASE_URL, DEFAULT_GENERATIVE_BASE_URL,
    DEFAULT_GENERATIVE_MODEL, DEFAULT_TIMEOUT_SECS,
};
use roamwise_trip_planner::{Planner, PlannerConfig, web};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "roamwise-web")]
#[command(author, version, about = "Local web form for AI trip planning")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value = "8080")]
    port: u16,

    /// Generative API base URL
    #[arg(long, default_value = DEFAULT_GENERATIVE_BASE_URL)]
    generative_base_url: String,

    #[arg(long, default_value = DEFAULT_GENERATIVE_MODEL)]
    model: String,

    /// Flight-search API base URL
    #[arg(long, default_value = DEFAULT_FLIGHT_SEARCH_BASE_URL)]
    flight_search_base_url: String,

    /// Where "Book" links point
    #[arg(long, default_value = DEFAULT_BOOKING_BASE_URL)]
    booking_base_url: String,

    /// HTTP timeout in seconds for outgoing API calls
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".to_string().into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();
    tracing::debug!("Parsed args: {:?}", args);

    let config = PlannerConfig {
        generative_base_url: args.generative_base_url,
        generative_model: args.model,
        flight_search_base_url: args.flight_search_base_url,
        booking_base_url: args.booking_base_url,
        timeout_secs: args.timeout,
    };
    let planner = Arc::new(Planner::new(&config).context("Failed to create planner")?);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host:port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, shutting down");
        }
        on_signal.cancel();
    });

    web::serve(listener, planner, shutdown)
        .await
        .context("HTTP server error")?;
    Ok(())
}
