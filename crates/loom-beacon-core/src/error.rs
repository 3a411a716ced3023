// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for beacon encoding and tracker identity.

use thiserror::Error;

/// Validation errors raised while configuring a tracker or encoding a hit.
///
/// All of these are raised synchronously at the offending call; none are
/// deferred to dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeaconError {
	#[error("invalid account token '{0}': expected MO-<digits>-<digits>")]
	InvalidAccount(String),

	#[error("no account token configured")]
	MissingAccount,

	#[error("no tracked domain configured")]
	MissingDomain,

	#[error("custom variable index {0} out of range (1..=50)")]
	InvalidIndex(usize),

	#[error("invalid custom variable scope {0}: expected 1 (visitor), 2 (session) or 3 (page)")]
	InvalidScope(u8),

	#[error("required field '{0}' is empty")]
	MissingField(&'static str),
}

impl From<std::convert::Infallible> for BeaconError {
	fn from(never: std::convert::Infallible) -> Self {
		match never {}
	}
}

/// A specialized `Result` type for beacon core operations.
pub type Result<T> = std::result::Result<T, BeaconError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_account_message_includes_token() {
		let err = BeaconError::InvalidAccount("UA-1".to_string());
		assert!(err.to_string().contains("UA-1"));
	}

	#[test]
	fn test_invalid_index_message_includes_index() {
		let err = BeaconError::InvalidIndex(51);
		assert!(err.to_string().contains("51"));
	}
}
