// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP transport for beacon requests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;

use crate::error::{BeaconSdkError, Result};

/// Performs the beacon GET and reports the response status.
///
/// The response body is never inspected. Implementations must not retry.
#[async_trait]
pub trait BeaconTransport: Send + Sync + 'static {
	/// Issues `GET url` with the given (already escaped) user agent and
	/// returns the HTTP status code.
	async fn get(&self, url: &str, user_agent: &str) -> Result<u16>;
}

/// Transport backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
	http_client: Client,
}

impl ReqwestTransport {
	/// Creates a transport whose requests time out after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self> {
		let http_client = Client::builder()
			.timeout(timeout)
			.build()
			.map_err(BeaconSdkError::RequestFailed)?;
		Ok(Self { http_client })
	}

	/// Wraps an existing client, keeping its timeout and TLS settings.
	pub fn with_client(http_client: Client) -> Self {
		Self { http_client }
	}
}

#[async_trait]
impl BeaconTransport for ReqwestTransport {
	async fn get(&self, url: &str, user_agent: &str) -> Result<u16> {
		let response = self
			.http_client
			.get(url)
			.header(USER_AGENT, user_agent)
			.header(ACCEPT, "*/*")
			.send()
			.await?;

		Ok(response.status().as_u16())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_transport_builds_with_timeout() {
		assert!(ReqwestTransport::new(Duration::from_secs(1)).is_ok());
	}

	#[tokio::test]
	async fn test_unreachable_host_is_network_error() {
		let transport = ReqwestTransport::new(Duration::from_millis(500)).unwrap();
		let err = transport
			.get("http://127.0.0.1:1/__utm.gif", "ua")
			.await
			.unwrap_err();
		assert!(err.is_network_error());
	}
}
