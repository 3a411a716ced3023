// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the beacon SDK.

use loom_beacon_core::BeaconError;
use thiserror::Error;

/// Beacon SDK errors.
#[derive(Debug, Error)]
pub enum BeaconSdkError {
	/// The tracking call or client configuration was rejected before any
	/// network activity.
	#[error(transparent)]
	Invalid(#[from] BeaconError),

	/// The collector answered with something other than 200.
	#[error("collector returned unexpected status {status}")]
	UnexpectedStatus { status: u16 },

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Fire-and-forget dispatch was requested outside a tokio runtime.
	#[error("fire-and-forget dispatch requires a running tokio runtime")]
	NoRuntime,

	/// Configuration could not be loaded.
	#[error("configuration error: {0}")]
	Config(String),
}

impl BeaconSdkError {
	/// True for failures of the beacon GET itself (bad status or transport).
	pub fn is_network_error(&self) -> bool {
		matches!(
			self,
			BeaconSdkError::UnexpectedStatus { .. } | BeaconSdkError::RequestFailed(_)
		)
	}

	/// The underlying validation error, if this is one.
	pub fn as_invalid(&self) -> Option<&BeaconError> {
		match self {
			BeaconSdkError::Invalid(e) => Some(e),
			_ => None,
		}
	}
}

/// Result type alias for beacon SDK operations.
pub type Result<T> = std::result::Result<T, BeaconSdkError>;
