// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sends one page view and one event using configuration from
//! `LOOM_BEACON_*` variables and an optional TOML file.
//!
//! ```text
//! LOOM_BEACON_ACCOUNT=MO-1234567-1 LOOM_BEACON_DOMAIN=example.com \
//!     RUST_LOG=loom_beacon=debug cargo run -p loom-beacon --example track -- beacon.toml
//! ```

use std::path::PathBuf;

use loom_beacon::{BeaconClientBuilder, BeaconConfig, Event, Scope, TrackOptions};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let path = std::env::args().nth(1).map(PathBuf::from);
	let config = BeaconConfig::load(path.as_deref())?;
	let mut client = BeaconClientBuilder::from_config(config).build()?;

	client.set_custom_variable(1, "example", "track", Scope::Page)?;
	client
		.track_page_view("Example", "/example", TrackOptions::sync())
		.await?;
	client
		.track_event(
			Event::new("example", "run").with_value(1),
			TrackOptions::sync(),
		)
		.await?;

	tracing::info!("beacons delivered");
	Ok(())
}
