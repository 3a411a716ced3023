// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracker identity: account token, tracked domain and cookie identity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BeaconError, Result};
use crate::id::{random_id, session_component};

/// Protocol version reported in `utmwv`.
pub const DEFAULT_PROTOCOL_VERSION: &str = "4.4sh";
/// Character set reported in `utmcs`.
pub const DEFAULT_CHARSET: &str = "UTF-8";
/// Language tag reported in `utmul`.
pub const DEFAULT_LANGUAGE: &str = "en-us";
/// User agent sent when the caller does not supply one.
pub const DEFAULT_USER_AGENT: &str = concat!("loom-beacon/", env!("CARGO_PKG_VERSION"));

/// Campaign marker of a synthesized `__utmz` cookie (direct traffic).
pub const DIRECT_CAMPAIGN: &str = "utmcsr=(direct)|utmccn=(direct)|utmcmd=(none)";

/// A validated account token of the form `MO-<digits>-<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
	/// Parses and validates an account token.
	pub fn parse(token: &str) -> Result<Self> {
		if validate_account(token) {
			Ok(Self(token.to_string()))
		} else {
			Err(BeaconError::InvalidAccount(token.to_string()))
		}
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl FromStr for AccountId {
	type Err = BeaconError;

	fn from_str(s: &str) -> Result<Self> {
		Self::parse(s)
	}
}

impl TryFrom<String> for AccountId {
	type Error = BeaconError;

	fn try_from(s: String) -> Result<Self> {
		Self::parse(&s)
	}
}

impl From<AccountId> for String {
	fn from(id: AccountId) -> Self {
		id.0
	}
}

impl fmt::Display for AccountId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Validates an account token against `^MO-\d+-\d+$`.
pub fn validate_account(token: &str) -> bool {
	let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

	token
		.strip_prefix("MO-")
		.and_then(|rest| rest.split_once('-'))
		.map(|(property, profile)| is_digits(property) && is_digits(profile))
		.unwrap_or(false)
}

/// Builds the `utmcc` cookie string for a visitor with no real browser cookie.
///
/// `visitor` and `session` default to fresh identifiers and `now` to the
/// current time. The timestamp appears three times: first visit and previous
/// visit in `__utma`, campaign time in `__utmz`.
pub fn synthesize_cookie(
	visitor: Option<u64>,
	session: Option<u64>,
	now: Option<DateTime<Utc>>,
) -> String {
	let visitor = visitor.unwrap_or_else(random_id);
	let session = session.unwrap_or_else(session_component);
	let ts = now.unwrap_or_else(Utc::now).timestamp();
	let utma = format!("1.{visitor}00145214523.{session}.{ts}.{ts}.15");
	let utmz = format!("1.{ts}.1.1.{DIRECT_CAMPAIGN}");
	format_cookie(&utma, &utmz)
}

fn format_cookie(utma: &str, utmz: &str) -> String {
	format!("__utma={utma};+__utmz={utmz};")
}

/// Per-client tracker configuration.
///
/// Account and domain are optional so a tracker can be assembled before they
/// are known; [`TrackerIdentity::require_configured`] reports the missing
/// one. The cookie is computed on first use and reused for every later hit.
#[derive(Debug, Clone)]
pub struct TrackerIdentity {
	account: Option<AccountId>,
	domain: Option<String>,
	pub version: String,
	pub charset: String,
	pub language: String,
	pub user_agent: String,
	visitor_id: u64,
	cookie: Option<String>,
}

impl TrackerIdentity {
	/// Creates an identity for `account` on `domain`.
	pub fn new(account: &str, domain: &str) -> Result<Self> {
		let mut identity = Self::unconfigured();
		identity.set_account(account)?;
		identity.set_domain(domain)?;
		Ok(identity)
	}

	/// Creates an identity with no account or domain yet.
	pub fn unconfigured() -> Self {
		Self {
			account: None,
			domain: None,
			version: DEFAULT_PROTOCOL_VERSION.to_string(),
			charset: DEFAULT_CHARSET.to_string(),
			language: DEFAULT_LANGUAGE.to_string(),
			user_agent: DEFAULT_USER_AGENT.to_string(),
			visitor_id: random_id(),
			cookie: None,
		}
	}

	/// Sets the user agent (builder pattern).
	pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
		self.user_agent = user_agent.into();
		self
	}

	/// Sets the language tag (builder pattern).
	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = language.into();
		self
	}

	pub fn set_account(&mut self, account: &str) -> Result<()> {
		self.account = Some(AccountId::parse(account)?);
		Ok(())
	}

	pub fn set_domain(&mut self, domain: &str) -> Result<()> {
		if domain.trim().is_empty() {
			return Err(BeaconError::MissingDomain);
		}
		self.domain = Some(domain.to_string());
		Ok(())
	}

	pub fn account(&self) -> Option<&AccountId> {
		self.account.as_ref()
	}

	pub fn domain(&self) -> Option<&str> {
		self.domain.as_deref()
	}

	/// Identifier generated at construction, sent as `utmn`.
	pub fn visitor_id(&self) -> u64 {
		self.visitor_id
	}

	/// Returns account and domain, or the error naming the missing one.
	pub fn require_configured(&self) -> Result<(&AccountId, &str)> {
		let account = self.account.as_ref().ok_or(BeaconError::MissingAccount)?;
		let domain = self.domain.as_deref().ok_or(BeaconError::MissingDomain)?;
		Ok((account, domain))
	}

	/// Returns the cookie string, synthesizing and caching it on first use.
	pub fn cookie(&mut self) -> &str {
		self.cookie.get_or_insert_with(|| synthesize_cookie(None, None, None))
	}

	/// Uses the end user's real `__utma` / `__utmz` cookie values.
	///
	/// Without `utmz` the direct-traffic campaign marker is used.
	pub fn identify_user(&mut self, utma: &str, utmz: Option<&str>) {
		let utmz = match utmz {
			Some(utmz) => utmz.to_string(),
			None => format!("1.{}.1.1.{DIRECT_CAMPAIGN}", Utc::now().timestamp()),
		};
		self.cookie = Some(format_cookie(utma, &utmz));
	}

	/// Replaces the whole `utmcc` value.
	pub fn set_cookie(&mut self, cookie: impl Into<String>) {
		self.cookie = Some(cookie.into());
	}

	/// Drops the cached cookie so the next hit synthesizes a fresh one.
	pub fn reset_cookie(&mut self) {
		self.cookie = None;
	}
}
