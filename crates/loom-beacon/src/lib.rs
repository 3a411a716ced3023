// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Rust SDK for Loom pixel-beacon tracking.
//!
//! This crate sends page views, events, transactions and line items from a
//! server to a collector speaking the `__utm.gif` beacon protocol. Each
//! tracking call becomes one HTTP GET whose query string carries the hit;
//! only the response status matters.
//!
//! # Quick Start
//!
//! ```ignore
//! use loom_beacon::{BeaconClient, Event, Scope, TrackOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = BeaconClient::builder()
//!         .account("MO-1234567-1")
//!         .domain("example.com")
//!         .build()?;
//!
//!     client.set_custom_variable(1, "plan", "pro", Scope::Visitor)?;
//!
//!     // Fire-and-forget: returns once the GET is spawned.
//!     client.track_page_view("Home", "/index.html", TrackOptions::new()).await?;
//!
//!     // Sync: waits for the collector and reports a bad status.
//!     client
//!         .track_event(
//!             Event::new("video", "play").with_label("intro"),
//!             TrackOptions::sync().with_client_ip("203.0.113.9"),
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Dispatch Modes
//!
//! | Mode | Returns | Network failures |
//! |------|---------|------------------|
//! | [`DispatchMode::FireAndForget`] (default) | immediately | reported to the [`DispatchHook`] only |
//! | [`DispatchMode::Sync`] | after the collector answers | returned as [`BeaconSdkError`] |
//!
//! Fire-and-forget needs a running tokio runtime. Beacons are never retried.
//!
//! # Configuration
//!
//! [`BeaconConfig::load`] layers a TOML file and `LOOM_BEACON_*` environment
//! variables over the defaults; feed the result to
//! [`BeaconClientBuilder::from_config`].
//!
//! # Error Handling
//!
//! ```ignore
//! use loom_beacon::{BeaconError, BeaconSdkError};
//!
//! match client.track_page_view("Home", "/", TrackOptions::sync()).await {
//!     Ok(()) => {}
//!     Err(BeaconSdkError::Invalid(BeaconError::MissingAccount)) => {
//!         eprintln!("no account configured");
//!     }
//!     Err(e) if e.is_network_error() => eprintln!("collector unreachable: {e}"),
//!     Err(e) => eprintln!("tracking failed: {e}"),
//! }
//! ```

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod hook;
pub mod transport;

pub use client::{BeaconClient, BeaconClientBuilder, ClientConfig, TrackOptions};
pub use config::{BeaconConfig, BeaconConfigLayer};
pub use dispatch::{DispatchMode, Dispatcher, Endpoint};
pub use error::{BeaconSdkError, Result};
pub use hook::{
	ChannelDispatchHook, DispatchHook, DispatchOutcome, NoOpDispatchHook, SharedDispatchHook,
	TracingDispatchHook,
};
pub use transport::{BeaconTransport, ReqwestTransport};

// Re-export types from loom-beacon-core that users may need
pub use loom_beacon_core::{
	BeaconError, BeaconParams, BeaconRequest, CustomVariables, Event, LineItem, PageView, Scope,
	TrackerIdentity, TrackingEvent, Transaction,
};
