// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered client configuration.
//!
//! Layers are merged in order of precedence: built-in defaults, then a TOML
//! file, then `LOOM_BEACON_*` environment variables.
//!
//! ```toml
//! account = "MO-1234567-1"
//! domain = "example.com"
//! collector_url = "https://collector.example.com"
//! timeout_secs = 5
//! dispatch_mode = "sync"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dispatch::{DispatchMode, Endpoint, DEFAULT_BEACON_PATH, DEFAULT_COLLECTOR_URL};
use crate::error::{BeaconSdkError, Result};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One partial configuration source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BeaconConfigLayer {
	pub account: Option<String>,
	pub domain: Option<String>,
	pub user_agent: Option<String>,
	pub language: Option<String>,
	pub collector_url: Option<String>,
	pub beacon_path: Option<String>,
	pub timeout_secs: Option<u64>,
	pub dispatch_mode: Option<DispatchMode>,
}

impl BeaconConfigLayer {
	/// Overlays `other` onto `self`; fields set in `other` win.
	pub fn merge(&mut self, other: Self) {
		if other.account.is_some() {
			self.account = other.account;
		}
		if other.domain.is_some() {
			self.domain = other.domain;
		}
		if other.user_agent.is_some() {
			self.user_agent = other.user_agent;
		}
		if other.language.is_some() {
			self.language = other.language;
		}
		if other.collector_url.is_some() {
			self.collector_url = other.collector_url;
		}
		if other.beacon_path.is_some() {
			self.beacon_path = other.beacon_path;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
		if other.dispatch_mode.is_some() {
			self.dispatch_mode = other.dispatch_mode;
		}
	}

	pub fn finalize(self) -> BeaconConfig {
		BeaconConfig {
			account: self.account,
			domain: self.domain,
			user_agent: self.user_agent,
			language: self.language,
			endpoint: Endpoint::new(
				self
					.collector_url
					.unwrap_or_else(|| DEFAULT_COLLECTOR_URL.to_string()),
				self
					.beacon_path
					.unwrap_or_else(|| DEFAULT_BEACON_PATH.to_string()),
			),
			request_timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
			dispatch_mode: self.dispatch_mode.unwrap_or_default(),
		}
	}

	pub fn from_toml_str(content: &str) -> Result<Self> {
		toml::from_str(content).map_err(|e| BeaconSdkError::Config(format!("invalid TOML: {e}")))
	}

	/// Reads a TOML file. A missing file yields an empty layer.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		if !path.exists() {
			debug!(path = %path.display(), "config file not found, skipping");
			return Ok(Self::default());
		}

		debug!(path = %path.display(), "loading config file");
		let content = std::fs::read_to_string(path).map_err(|e| {
			BeaconSdkError::Config(format!("failed to read {}: {e}", path.display()))
		})?;
		Self::from_toml_str(&content)
	}

	/// Reads `LOOM_BEACON_*` variables from the process environment.
	pub fn from_env() -> Result<Self> {
		Self::from_env_with(|name| std::env::var(name).ok())
	}

	/// Reads `LOOM_BEACON_*` variables through `lookup`. Empty values count
	/// as unset.
	pub fn from_env_with<F>(lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

		let timeout_secs = match var("LOOM_BEACON_TIMEOUT_SECS") {
			Some(v) => Some(v.parse::<u64>().map_err(|_| {
				BeaconSdkError::Config(format!(
					"LOOM_BEACON_TIMEOUT_SECS: invalid u64 value '{v}'"
				))
			})?),
			None => None,
		};
		let dispatch_mode = var("LOOM_BEACON_DISPATCH_MODE")
			.map(|v| v.parse::<DispatchMode>())
			.transpose()?;

		Ok(Self {
			account: var("LOOM_BEACON_ACCOUNT"),
			domain: var("LOOM_BEACON_DOMAIN"),
			user_agent: var("LOOM_BEACON_USER_AGENT"),
			language: var("LOOM_BEACON_LANGUAGE"),
			collector_url: var("LOOM_BEACON_COLLECTOR_URL"),
			beacon_path: var("LOOM_BEACON_BEACON_PATH"),
			timeout_secs,
			dispatch_mode,
		})
	}
}

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconConfig {
	pub account: Option<String>,
	pub domain: Option<String>,
	pub user_agent: Option<String>,
	pub language: Option<String>,
	pub endpoint: Endpoint,
	pub request_timeout: Duration,
	pub dispatch_mode: DispatchMode,
}

impl BeaconConfig {
	/// Defaults, overlaid by `path` when given, overlaid by the environment.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let mut layer = BeaconConfigLayer::default();
		if let Some(path) = path {
			layer.merge(BeaconConfigLayer::from_file(path)?);
		}
		layer.merge(BeaconConfigLayer::from_env()?);
		Ok(layer.finalize())
	}
}

impl Default for BeaconConfig {
	fn default() -> Self {
		BeaconConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;
	use std::io::Write;

	fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = vars
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name: &str| map.get(name).cloned()
	}

	#[test]
	fn test_default_layer_finalizes_to_defaults() {
		let config = BeaconConfigLayer::default().finalize();
		assert!(config.account.is_none());
		assert!(config.domain.is_none());
		assert_eq!(config.endpoint, Endpoint::default());
		assert_eq!(config.request_timeout, Duration::from_secs(10));
		assert_eq!(config.dispatch_mode, DispatchMode::FireAndForget);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = BeaconConfigLayer {
			account: Some("MO-1-1".to_string()),
			timeout_secs: Some(3),
			..Default::default()
		};
		base.merge(BeaconConfigLayer {
			account: Some("MO-2-2".to_string()),
			..Default::default()
		});
		assert_eq!(base.account.as_deref(), Some("MO-2-2"));
		assert_eq!(base.timeout_secs, Some(3));
	}

	#[test]
	fn test_merge_preserves_base_when_none() {
		let mut base = BeaconConfigLayer {
			domain: Some("example.com".to_string()),
			dispatch_mode: Some(DispatchMode::Sync),
			..Default::default()
		};
		base.merge(BeaconConfigLayer::default());
		assert_eq!(base.domain.as_deref(), Some("example.com"));
		assert_eq!(base.dispatch_mode, Some(DispatchMode::Sync));
	}

	#[test]
	fn test_from_toml_str() {
		let layer = BeaconConfigLayer::from_toml_str(
			r#"
account = "MO-1234567-1"
domain = "example.com"
collector_url = "http://localhost:9000/"
beacon_path = "collect.gif"
timeout_secs = 2
dispatch_mode = "sync"
"#,
		)
		.unwrap();
		let config = layer.finalize();
		assert_eq!(config.account.as_deref(), Some("MO-1234567-1"));
		assert_eq!(config.endpoint.url_for("a=1"), "http://localhost:9000/collect.gif?a=1");
		assert_eq!(config.request_timeout, Duration::from_secs(2));
		assert_eq!(config.dispatch_mode, DispatchMode::Sync);
	}

	#[test]
	fn test_from_toml_str_rejects_unknown_mode() {
		let err = BeaconConfigLayer::from_toml_str(r#"dispatch_mode = "eventually""#).unwrap_err();
		assert!(matches!(err, BeaconSdkError::Config(_)));
	}

	#[test]
	fn test_deserialize_empty() {
		let layer = BeaconConfigLayer::from_toml_str("").unwrap();
		assert_eq!(layer, BeaconConfigLayer::default());
	}

	#[test]
	fn test_serde_roundtrip() {
		let layer = BeaconConfigLayer {
			account: Some("MO-1-1".to_string()),
			dispatch_mode: Some(DispatchMode::FireAndForget),
			timeout_secs: Some(7),
			..Default::default()
		};
		let toml_str = toml::to_string(&layer).unwrap();
		assert_eq!(BeaconConfigLayer::from_toml_str(&toml_str).unwrap(), layer);
	}

	#[test]
	fn test_from_file_missing_returns_empty() {
		let layer = BeaconConfigLayer::from_file("/nonexistent/beacon.toml").unwrap();
		assert_eq!(layer, BeaconConfigLayer::default());
	}

	#[test]
	fn test_from_file_reads_toml() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "domain = \"example.org\"").unwrap();
		let layer = BeaconConfigLayer::from_file(file.path()).unwrap();
		assert_eq!(layer.domain.as_deref(), Some("example.org"));
	}

	#[test]
	fn test_from_env_with() {
		let layer = BeaconConfigLayer::from_env_with(env(&[
			("LOOM_BEACON_ACCOUNT", "MO-42-7"),
			("LOOM_BEACON_DOMAIN", ""),
			("LOOM_BEACON_TIMEOUT_SECS", "4"),
			("LOOM_BEACON_DISPATCH_MODE", "sync"),
		]))
		.unwrap();
		assert_eq!(layer.account.as_deref(), Some("MO-42-7"));
		assert!(layer.domain.is_none());
		assert_eq!(layer.timeout_secs, Some(4));
		assert_eq!(layer.dispatch_mode, Some(DispatchMode::Sync));
	}

	#[test]
	fn test_from_env_with_invalid_timeout() {
		let err = BeaconConfigLayer::from_env_with(env(&[("LOOM_BEACON_TIMEOUT_SECS", "soon")]))
			.unwrap_err();
		assert!(err.to_string().contains("LOOM_BEACON_TIMEOUT_SECS"));
	}

	#[test]
	fn test_env_wins_over_file() {
		let mut layer = BeaconConfigLayer::from_toml_str(
			"account = \"MO-1-1\"\ndomain = \"file.example\"",
		)
		.unwrap();
		layer.merge(
			BeaconConfigLayer::from_env_with(env(&[("LOOM_BEACON_DOMAIN", "env.example")])).unwrap(),
		);
		let config = layer.finalize();
		assert_eq!(config.account.as_deref(), Some("MO-1-1"));
		assert_eq!(config.domain.as_deref(), Some("env.example"));
	}
}
