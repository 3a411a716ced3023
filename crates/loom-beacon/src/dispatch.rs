// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Beacon dispatch: URL construction, status validation and fire-and-forget
//! sending.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use loom_beacon_core::BeaconRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BeaconSdkError, Result};
use crate::hook::{DispatchOutcome, SharedDispatchHook};
use crate::transport::BeaconTransport;

pub const DEFAULT_COLLECTOR_URL: &str = "https://www.google-analytics.com";
pub const DEFAULT_BEACON_PATH: &str = "/__utm.gif";

/// Where beacons are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
	base_url: String,
	path: String,
}

impl Endpoint {
	/// Creates an endpoint. A trailing slash on `base_url` is dropped and a
	/// leading slash on `path` is added when missing.
	pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
		let base_url = base_url.into().trim_end_matches('/').to_string();
		let path = path.into();
		let path = if path.starts_with('/') {
			path
		} else {
			format!("/{path}")
		};
		Self { base_url, path }
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// Full request URL for an already escaped query string.
	pub fn url_for(&self, query: &str) -> String {
		format!("{}{}?{}", self.base_url, self.path, query)
	}
}

impl Default for Endpoint {
	fn default() -> Self {
		Self::new(DEFAULT_COLLECTOR_URL, DEFAULT_BEACON_PATH)
	}
}

/// Whether a tracking call waits for the collector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
	/// Await the GET and surface its failure to the caller.
	Sync,
	/// Spawn the GET onto the current tokio runtime and return at once.
	#[default]
	FireAndForget,
}

impl DispatchMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			DispatchMode::Sync => "sync",
			DispatchMode::FireAndForget => "fire_and_forget",
		}
	}
}

impl fmt::Display for DispatchMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for DispatchMode {
	type Err = BeaconSdkError;

	fn from_str(s: &str) -> Result<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"sync" | "blocking" => Ok(DispatchMode::Sync),
			"fire_and_forget" | "fire-and-forget" | "async" => Ok(DispatchMode::FireAndForget),
			other => Err(BeaconSdkError::Config(format!(
				"unknown dispatch mode '{other}'"
			))),
		}
	}
}

/// Sends beacons through a [`BeaconTransport`] and reports every outcome to
/// the dispatch hook.
///
/// Cloning is cheap; clones share the transport and hook.
#[derive(Clone)]
pub struct Dispatcher {
	transport: Arc<dyn BeaconTransport>,
	endpoint: Endpoint,
	hook: SharedDispatchHook,
}

impl Dispatcher {
	pub fn new(
		transport: Arc<dyn BeaconTransport>,
		endpoint: Endpoint,
		hook: SharedDispatchHook,
	) -> Self {
		Self {
			transport,
			endpoint,
			hook,
		}
	}

	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	/// Full request URL for `request`.
	pub fn url_for(&self, request: &BeaconRequest) -> String {
		self.endpoint.url_for(&request.query_string())
	}

	/// Performs the GET and validates the status. Only exactly 200 counts as
	/// success. Does not report to the hook.
	pub async fn send(&self, request: &BeaconRequest) -> Result<u16> {
		let url = self.url_for(request);
		debug!(url_len = url.len(), "Sending beacon");

		let status = self
			.transport
			.get(&url, &request.user_agent_header())
			.await?;

		if status != 200 {
			return Err(BeaconSdkError::UnexpectedStatus { status });
		}
		Ok(status)
	}

	/// Sends `request` in the given mode.
	///
	/// In [`DispatchMode::Sync`] send errors are returned. In
	/// [`DispatchMode::FireAndForget`] this returns as soon as the send is
	/// spawned; see [`Dispatcher::spawn`].
	pub async fn dispatch(&self, request: BeaconRequest, mode: DispatchMode) -> Result<()> {
		match mode {
			DispatchMode::Sync => {
				let url = self.url_for(&request);
				let result = self.send(&request).await;
				self.report(url, mode, &result).await;
				result.map(|_| ())
			}
			DispatchMode::FireAndForget => self.spawn(request),
		}
	}

	/// Spawns the send onto the current tokio runtime. The outcome reaches
	/// the hook only. Fails with [`BeaconSdkError::NoRuntime`] outside a
	/// runtime.
	pub fn spawn(&self, request: BeaconRequest) -> Result<()> {
		let handle = tokio::runtime::Handle::try_current().map_err(|_| BeaconSdkError::NoRuntime)?;
		let dispatcher = self.clone();

		handle.spawn(async move {
			let url = dispatcher.url_for(&request);
			let result = dispatcher.send(&request).await;
			dispatcher
				.report(url, DispatchMode::FireAndForget, &result)
				.await;
		});
		Ok(())
	}

	async fn report(&self, url: String, mode: DispatchMode, result: &Result<u16>) {
		let outcome = match result {
			Ok(status) => DispatchOutcome::success(url, mode, *status),
			Err(e) => {
				let status = match e {
					BeaconSdkError::UnexpectedStatus { status } => Some(*status),
					_ => None,
				};
				DispatchOutcome::failure(url, mode, status, e.to_string())
			}
		};
		self.hook.on_dispatch(outcome).await;
	}
}

impl fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatcher")
			.field("endpoint", &self.endpoint)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hook::{ChannelDispatchHook, NoOpDispatchHook};
	use crate::transport::mock::MockTransport;
	use loom_beacon_core::BeaconParams;

	fn request() -> BeaconRequest {
		BeaconRequest::new(
			BeaconParams::new()
				.insert("utmac", "MO-1234567-1")
				.insert("utmp", "/index.html"),
			"Loom Beacon/1.0",
		)
	}

	fn dispatcher(transport: Arc<MockTransport>) -> Dispatcher {
		Dispatcher::new(
			transport,
			Endpoint::new("https://collector.test/", "__utm.gif"),
			Arc::new(NoOpDispatchHook),
		)
	}

	#[test]
	fn test_endpoint_normalizes_slashes() {
		let endpoint = Endpoint::new("https://collector.test/", "__utm.gif");
		assert_eq!(endpoint.base_url(), "https://collector.test");
		assert_eq!(endpoint.path(), "/__utm.gif");
		assert_eq!(
			endpoint.url_for("a=1"),
			"https://collector.test/__utm.gif?a=1"
		);
	}

	#[test]
	fn test_default_endpoint() {
		assert_eq!(
			Endpoint::default().url_for("x=y"),
			"https://www.google-analytics.com/__utm.gif?x=y"
		);
	}

	#[test]
	fn test_dispatch_mode_parsing() {
		assert_eq!("sync".parse::<DispatchMode>().unwrap(), DispatchMode::Sync);
		assert_eq!(
			"Fire-And-Forget".parse::<DispatchMode>().unwrap(),
			DispatchMode::FireAndForget
		);
		assert!("sometimes".parse::<DispatchMode>().is_err());
		assert_eq!(DispatchMode::default(), DispatchMode::FireAndForget);
		assert_eq!(DispatchMode::FireAndForget.to_string(), "fire_and_forget");
	}

	#[test]
	fn test_send_builds_url_and_escapes_user_agent() {
		let transport = Arc::new(MockTransport::new(200));
		let dispatcher = dispatcher(transport.clone());

		let status = tokio_test::block_on(dispatcher.send(&request())).unwrap();
		assert_eq!(status, 200);

		let requests = transport.requests();
		assert_eq!(requests.len(), 1);
		assert_eq!(
			requests[0].0,
			"https://collector.test/__utm.gif?utmac=MO-1234567-1&utmp=%2Findex.html"
		);
		assert_eq!(requests[0].1, "Loom%20Beacon%2F1.0");
	}

	#[test]
	fn test_send_rejects_non_200() {
		for status in [201, 204, 302, 404, 500] {
			let transport = Arc::new(MockTransport::new(status));
			let dispatcher = dispatcher(transport);
			let err = tokio_test::block_on(dispatcher.send(&request())).unwrap_err();
			assert!(
				matches!(err, BeaconSdkError::UnexpectedStatus { status: s } if s == status),
				"status {status} should be rejected"
			);
		}
	}

	#[test]
	fn test_spawn_outside_runtime_fails() {
		let transport = Arc::new(MockTransport::new(200));
		let dispatcher = dispatcher(transport.clone());
		let err = dispatcher.spawn(request()).unwrap_err();
		assert!(matches!(err, BeaconSdkError::NoRuntime));
		assert!(transport.requests().is_empty());
	}

	#[tokio::test]
	async fn test_sync_dispatch_reports_and_propagates() {
		let (hook, mut outcomes) = ChannelDispatchHook::new();
		let dispatcher = Dispatcher::new(
			Arc::new(MockTransport::new(500)),
			Endpoint::default(),
			Arc::new(hook),
		);

		let err = dispatcher
			.dispatch(request(), DispatchMode::Sync)
			.await
			.unwrap_err();
		assert!(err.is_network_error());

		let outcome = outcomes.recv().await.unwrap();
		assert!(!outcome.is_success());
		assert_eq!(outcome.status, Some(500));
		assert_eq!(outcome.mode, DispatchMode::Sync);
	}

	#[tokio::test]
	async fn test_fire_and_forget_returns_before_send_completes() {
		let transport = Arc::new(MockTransport::gated(200));
		let (hook, mut outcomes) = ChannelDispatchHook::new();
		let dispatcher = Dispatcher::new(transport.clone(), Endpoint::default(), Arc::new(hook));

		dispatcher
			.dispatch(request(), DispatchMode::FireAndForget)
			.await
			.unwrap();
		assert!(outcomes.try_recv().is_err());

		transport.release();
		let outcome = outcomes.recv().await.unwrap();
		assert!(outcome.is_success());
		assert_eq!(outcome.mode, DispatchMode::FireAndForget);
		assert_eq!(transport.requests().len(), 1);
	}

	#[tokio::test]
	async fn test_fire_and_forget_failure_only_reaches_hook() {
		let (hook, mut outcomes) = ChannelDispatchHook::new();
		let dispatcher = Dispatcher::new(
			Arc::new(MockTransport::new(503)),
			Endpoint::default(),
			Arc::new(hook),
		);

		assert!(dispatcher
			.dispatch(request(), DispatchMode::FireAndForget)
			.await
			.is_ok());

		let outcome = outcomes.recv().await.unwrap();
		assert_eq!(outcome.status, Some(503));
		assert_eq!(
			outcome.error.as_deref(),
			Some("collector returned unexpected status 503")
		);
	}
}
