// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query-value escaping for the beacon protocol.
//!
//! Everything outside the RFC 3986 unreserved set (`A-Z a-z 0-9 - _ . ~`) is
//! percent-encoded byte by byte. Space becomes `%20`, never `+`, which is what
//! the collector expects.

use std::borrow::Cow;

/// Percent-escapes a query value.
pub fn escape(value: &str) -> Cow<'_, str> {
	urlencoding::encode(value)
}

/// Returns true if `s` contains at least one word character (`[A-Za-z0-9_]`).
pub fn has_word_char(s: &str) -> bool {
	s.chars().any(|c| c.is_ascii_alphanumeric() || c == '_')
}
