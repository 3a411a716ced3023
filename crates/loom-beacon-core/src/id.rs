// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Opaque numeric identifiers for visitors, hits and cookie components.
//!
//! Backed by `fastrand`'s thread-local generator, so callers on any thread can
//! draw identifiers without coordination. Uniqueness is best-effort only.

use std::ops::RangeInclusive;

/// Range of identifiers returned by [`random_id`].
pub const ID_RANGE: RangeInclusive<u64> = 1_000_000_000..=9_999_999_999;

/// Range of the session component embedded in synthesized cookies.
pub const SESSION_RANGE: RangeInclusive<u64> = 1_000_000_000..=2_147_483_646;

/// Returns a pseudo-random identifier in [`ID_RANGE`].
pub fn random_id() -> u64 {
	fastrand::u64(ID_RANGE)
}

/// Returns a pseudo-random session component in [`SESSION_RANGE`].
pub fn session_component() -> u64 {
	fastrand::u64(SESSION_RANGE)
}
