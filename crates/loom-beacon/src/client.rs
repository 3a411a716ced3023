// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Beacon client for tracking page views, events and e-commerce hits.

use std::sync::Arc;
use std::time::Duration;

use loom_beacon_core::keys;
use loom_beacon_core::{
	build_request, BeaconError, BeaconParams, BeaconRequest, CustomVariables, Event, LineItem,
	PageView, Scope, TrackerIdentity, TrackingEvent, Transaction,
};
use tracing::{debug, info};

use crate::config::{BeaconConfig, DEFAULT_TIMEOUT_SECS};
use crate::dispatch::{DispatchMode, Dispatcher, Endpoint};
use crate::error::Result;
use crate::hook::{DispatchHook, SharedDispatchHook, TracingDispatchHook};
use crate::transport::{BeaconTransport, ReqwestTransport};

/// Configuration for the beacon client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
	/// Timeout for the beacon GET.
	pub request_timeout: Duration,
	/// Mode used when a call does not choose one.
	pub dispatch_mode: DispatchMode,
	/// Collector base URL and beacon path.
	pub endpoint: Endpoint,
}

impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
			dispatch_mode: DispatchMode::default(),
			endpoint: Endpoint::default(),
		}
	}
}

/// Per-call additions to a tracking hit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackOptions {
	/// Extra protocol parameters; these win over every derived field.
	pub overrides: BeaconParams,
	/// User agent for this hit only.
	pub user_agent: Option<String>,
	/// End user's IP address, sent as `utmip`.
	pub client_ip: Option<String>,
	/// Dispatch mode for this hit only.
	pub dispatch_mode: Option<DispatchMode>,
}

impl TrackOptions {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an override parameter (builder pattern).
	pub fn with_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
		self.overrides.set(key, value);
		self
	}

	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}

	pub fn with_client_ip(mut self, client_ip: impl Into<String>) -> Self {
		self.client_ip = Some(client_ip.into());
		self
	}

	pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
		self.dispatch_mode = Some(mode);
		self
	}

	/// Shorthand for waiting on the collector for this hit.
	pub fn sync() -> Self {
		Self::new().with_dispatch_mode(DispatchMode::Sync)
	}
}

/// Builder for constructing a [`BeaconClient`].
pub struct BeaconClientBuilder {
	account: Option<String>,
	domain: Option<String>,
	user_agent: Option<String>,
	language: Option<String>,
	config: ClientConfig,
	hook: Option<SharedDispatchHook>,
	transport: Option<Arc<dyn BeaconTransport>>,
}

impl BeaconClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			account: None,
			domain: None,
			user_agent: None,
			language: None,
			config: ClientConfig::default(),
			hook: None,
			transport: None,
		}
	}

	/// Creates a builder pre-populated from resolved configuration.
	pub fn from_config(config: BeaconConfig) -> Self {
		Self {
			account: config.account,
			domain: config.domain,
			user_agent: config.user_agent,
			language: config.language,
			config: ClientConfig {
				request_timeout: config.request_timeout,
				dispatch_mode: config.dispatch_mode,
				endpoint: config.endpoint,
			},
			hook: None,
			transport: None,
		}
	}

	/// Sets the account token, in the form `MO-<digits>-<digits>`.
	pub fn account(mut self, account: impl Into<String>) -> Self {
		self.account = Some(account.into());
		self
	}

	/// Sets the tracked domain (`utmhn`).
	pub fn domain(mut self, domain: impl Into<String>) -> Self {
		self.domain = Some(domain.into());
		self
	}

	pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = Some(user_agent.into());
		self
	}

	pub fn language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	/// Sets the collector base URL.
	///
	/// Example: `https://collector.example.com`
	pub fn collector_url(mut self, url: impl Into<String>) -> Self {
		let path = self.config.endpoint.path().to_string();
		self.config.endpoint = Endpoint::new(url, path);
		self
	}

	/// Sets the beacon path on the collector (default `/__utm.gif`).
	pub fn beacon_path(mut self, path: impl Into<String>) -> Self {
		let base_url = self.config.endpoint.base_url().to_string();
		self.config.endpoint = Endpoint::new(base_url, path);
		self
	}

	/// Sets the HTTP request timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.config.request_timeout = timeout;
		self
	}

	/// Sets the default dispatch mode.
	pub fn dispatch_mode(mut self, mode: DispatchMode) -> Self {
		self.config.dispatch_mode = mode;
		self
	}

	/// Sets the hook notified of every dispatch outcome.
	pub fn dispatch_hook<H: DispatchHook>(mut self, hook: H) -> Self {
		self.hook = Some(Arc::new(hook));
		self
	}

	/// Replaces the HTTP transport. The request timeout is then the
	/// transport's responsibility.
	pub fn transport<T: BeaconTransport>(mut self, transport: T) -> Self {
		self.transport = Some(Arc::new(transport));
		self
	}

	/// Builds the client.
	///
	/// Account and domain are validated when given. Leaving them out is
	/// allowed; tracking then fails until they are set.
	pub fn build(self) -> Result<BeaconClient> {
		let mut identity = TrackerIdentity::unconfigured();
		if let Some(account) = &self.account {
			identity.set_account(account)?;
		}
		if let Some(domain) = &self.domain {
			identity.set_domain(domain)?;
		}
		if let Some(user_agent) = self.user_agent {
			identity = identity.with_user_agent(user_agent);
		}
		if let Some(language) = self.language {
			identity = identity.with_language(language);
		}

		let transport: Arc<dyn BeaconTransport> = match self.transport {
			Some(transport) => transport,
			None => Arc::new(ReqwestTransport::new(self.config.request_timeout)?),
		};
		let hook = self
			.hook
			.unwrap_or_else(|| Arc::new(TracingDispatchHook));
		let dispatcher = Dispatcher::new(transport, self.config.endpoint.clone(), hook);

		info!(
			endpoint = %self.config.endpoint.base_url(),
			dispatch_mode = %self.config.dispatch_mode,
			configured = identity.require_configured().is_ok(),
			"Beacon client initialized"
		);

		Ok(BeaconClient {
			identity,
			custom_vars: CustomVariables::new(),
			dispatcher,
			config: self.config,
		})
	}
}

impl Default for BeaconClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Client that encodes tracking calls as `__utm.gif` beacons and sends them
/// to the collector.
///
/// One client holds one visitor identity: its visitor id and cookie are
/// reused for every hit. Use one client per end-user session.
///
/// # Example
///
/// ```ignore
/// use loom_beacon::{BeaconClient, Event, TrackOptions};
///
/// let mut client = BeaconClient::builder()
///     .account("MO-1234567-1")
///     .domain("example.com")
///     .build()?;
///
/// client.track_page_view("Home", "/index.html", TrackOptions::new()).await?;
/// client
///     .track_event(Event::new("video", "play").with_label("intro"), TrackOptions::sync())
///     .await?;
/// ```
#[derive(Debug)]
pub struct BeaconClient {
	identity: TrackerIdentity,
	custom_vars: CustomVariables,
	dispatcher: Dispatcher,
	config: ClientConfig,
}

impl BeaconClient {
	/// Creates a new builder for constructing a BeaconClient.
	pub fn builder() -> BeaconClientBuilder {
		BeaconClientBuilder::new()
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn identity(&self) -> &TrackerIdentity {
		&self.identity
	}

	pub fn custom_variables(&self) -> &CustomVariables {
		&self.custom_vars
	}

	/// Tracks a page view.
	pub async fn track_page_view(
		&mut self,
		title: &str,
		page: &str,
		options: TrackOptions,
	) -> Result<()> {
		self.track(PageView::new(title, page), options).await
	}

	/// Tracks a custom event.
	pub async fn track_event(&mut self, event: Event, options: TrackOptions) -> Result<()> {
		self.track(event, options).await
	}

	/// Tracks an e-commerce transaction.
	pub async fn track_transaction(
		&mut self,
		transaction: Transaction,
		options: TrackOptions,
	) -> Result<()> {
		self.track(transaction, options).await
	}

	/// Tracks one line item of a transaction.
	pub async fn track_line_item(&mut self, item: LineItem, options: TrackOptions) -> Result<()> {
		self.track(item, options).await
	}

	/// Builds and dispatches one hit.
	///
	/// Validation errors are returned before any network activity. Network
	/// errors are returned only in [`DispatchMode::Sync`].
	pub async fn track(
		&mut self,
		event: impl Into<TrackingEvent>,
		options: TrackOptions,
	) -> Result<()> {
		let event = event.into();
		let mode = options.dispatch_mode.unwrap_or(self.config.dispatch_mode);
		let request = self.request_for(&event, &options)?;

		debug!(hit_type = event.kind(), mode = %mode, "Tracking beacon");
		self.dispatcher.dispatch(request, mode).await
	}

	/// Builds the request for `event` without sending it.
	pub fn request_for(
		&mut self,
		event: &TrackingEvent,
		options: &TrackOptions,
	) -> Result<BeaconRequest> {
		let mut overrides = options.overrides.clone();
		if let Some(client_ip) = &options.client_ip {
			overrides.set(keys::CLIENT_IP, client_ip);
		}

		let params = build_request(&mut self.identity, &self.custom_vars, event, overrides)?;
		let user_agent = options
			.user_agent
			.clone()
			.unwrap_or_else(|| self.identity.user_agent.clone());

		Ok(BeaconRequest::new(params, user_agent))
	}

	/// Full collector URL for a request built by [`BeaconClient::request_for`].
	pub fn url_for(&self, request: &BeaconRequest) -> String {
		self.dispatcher.url_for(request)
	}

	/// Stores custom variable `index` (1 to 50). `scope` is a [`Scope`] or
	/// its protocol code.
	pub fn set_custom_variable<S>(
		&mut self,
		index: usize,
		name: impl Into<String>,
		value: impl Into<String>,
		scope: S,
	) -> Result<()>
	where
		S: TryInto<Scope>,
		BeaconError: From<S::Error>,
	{
		Ok(self.custom_vars.set(index, name, value, scope)?)
	}

	pub fn delete_custom_variable(&mut self, index: usize) -> Result<()> {
		Ok(self.custom_vars.delete(index)?)
	}

	pub fn set_account(&mut self, account: &str) -> Result<()> {
		Ok(self.identity.set_account(account)?)
	}

	pub fn set_domain(&mut self, domain: &str) -> Result<()> {
		Ok(self.identity.set_domain(domain)?)
	}

	/// Uses the end user's real `__utma` / `__utmz` cookies instead of a
	/// synthesized identity.
	pub fn identify_user(&mut self, utma: &str, utmz: Option<&str>) {
		self.identity.identify_user(utma, utmz);
	}

	/// Replaces the whole `utmcc` cookie value.
	pub fn set_cookie(&mut self, cookie: impl Into<String>) {
		self.identity.set_cookie(cookie);
	}
}
