// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The fully assembled beacon handed to the dispatcher.

use crate::escape::escape;
use crate::params::BeaconParams;

/// Final parameters of one hit plus the user agent to send them with.
///
/// Built fresh for every tracking call and consumed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeaconRequest {
	pub params: BeaconParams,
	pub user_agent: String,
}

impl BeaconRequest {
	pub fn new(params: BeaconParams, user_agent: impl Into<String>) -> Self {
		Self {
			params,
			user_agent: user_agent.into(),
		}
	}

	/// The escaped query string, in parameter order.
	pub fn query_string(&self) -> String {
		self.params.to_query_string()
	}

	/// The `User-Agent` header value, escaped like a query value.
	pub fn user_agent_header(&self) -> String {
		escape(&self.user_agent).into_owned()
	}
}
