// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Observation of dispatch outcomes.
//!
//! Every beacon the dispatcher sends, in either [`DispatchMode`], ends with a
//! call to [`DispatchHook::on_dispatch`]. In fire-and-forget mode the hook is
//! the only place a failure becomes visible to the application.
//!
//! # Example
//!
//! ```ignore
//! use loom_beacon::{BeaconClient, ChannelDispatchHook};
//!
//! let (hook, mut outcomes) = ChannelDispatchHook::new();
//! let mut client = BeaconClient::builder()
//!     .account("MO-1234567-1")
//!     .domain("example.com")
//!     .dispatch_hook(hook)
//!     .build()?;
//!
//! client.track_page_view("Home", "/", Default::default()).await?;
//! let outcome = outcomes.recv().await;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::dispatch::DispatchMode;

/// Result of one beacon send.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
	/// The full request URL, query string included.
	pub url: String,
	pub mode: DispatchMode,
	/// HTTP status, when the collector answered at all.
	pub status: Option<u16>,
	/// Rendered error, when the send failed.
	pub error: Option<String>,
	pub timestamp: DateTime<Utc>,
}

impl DispatchOutcome {
	pub fn success(url: impl Into<String>, mode: DispatchMode, status: u16) -> Self {
		Self {
			url: url.into(),
			mode,
			status: Some(status),
			error: None,
			timestamp: Utc::now(),
		}
	}

	pub fn failure(
		url: impl Into<String>,
		mode: DispatchMode,
		status: Option<u16>,
		error: impl Into<String>,
	) -> Self {
		Self {
			url: url.into(),
			mode,
			status,
			error: Some(error.into()),
			timestamp: Utc::now(),
		}
	}

	pub fn is_success(&self) -> bool {
		self.error.is_none()
	}
}

/// Receives the outcome of every dispatched beacon.
///
/// Called on the task that performed the send. Keep implementations cheap;
/// a slow hook delays sync-mode tracking calls.
#[async_trait]
pub trait DispatchHook: Send + Sync + 'static {
	async fn on_dispatch(&self, outcome: DispatchOutcome);
}

/// Type alias for a shared dispatch hook.
pub type SharedDispatchHook = Arc<dyn DispatchHook>;

/// Logs outcomes through `tracing`. This is the default hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDispatchHook;

#[async_trait]
impl DispatchHook for TracingDispatchHook {
	async fn on_dispatch(&self, outcome: DispatchOutcome) {
		match &outcome.error {
			None => debug!(
				status = ?outcome.status,
				mode = %outcome.mode,
				url_len = outcome.url.len(),
				"Beacon delivered"
			),
			Some(error) => warn!(
				status = ?outcome.status,
				mode = %outcome.mode,
				error = %error,
				"Beacon dispatch failed"
			),
		}
	}
}

/// Forwards outcomes to an unbounded channel, for callers that need
/// completion signals from fire-and-forget sends.
#[derive(Debug, Clone)]
pub struct ChannelDispatchHook {
	sender: mpsc::UnboundedSender<DispatchOutcome>,
}

impl ChannelDispatchHook {
	/// Creates the hook together with the receiving end of its channel.
	pub fn new() -> (Self, mpsc::UnboundedReceiver<DispatchOutcome>) {
		let (sender, receiver) = mpsc::unbounded_channel();
		(Self { sender }, receiver)
	}
}

#[async_trait]
impl DispatchHook for ChannelDispatchHook {
	async fn on_dispatch(&self, outcome: DispatchOutcome) {
		// Receiver gone means nobody is listening any more.
		let _ = self.sender.send(outcome);
	}
}

/// Discards all outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpDispatchHook;

#[async_trait]
impl DispatchHook for NoOpDispatchHook {
	async fn on_dispatch(&self, _outcome: DispatchOutcome) {}
}
