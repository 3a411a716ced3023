// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Ordered builder for beacon query parameters.

use crate::escape::escape;

/// An ordered mapping of protocol keys to string values.
///
/// Keys keep the position of their first insertion. Inserting a key that is
/// already present replaces its value in place, so merging layers with
/// [`BeaconParams::merge`] gives "later layer wins" semantics while the wire
/// order stays deterministic.
///
/// # Example
///
/// ```
/// use loom_beacon_core::BeaconParams;
///
/// let params = BeaconParams::new()
///     .insert("utmdt", "Home")
///     .insert("utmp", "/index.html");
///
/// assert_eq!(params.to_query_string(), "utmdt=Home&utmp=%2Findex.html");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeaconParams {
	entries: Vec<(String, String)>,
}

impl BeaconParams {
	/// Creates a new empty parameter set.
	pub fn new() -> Self {
		Self {
			entries: Vec::new(),
		}
	}

	/// Inserts a key-value pair (builder pattern).
	pub fn insert<K, V>(mut self, key: K, value: V) -> Self
	where
		K: Into<String>,
		V: ToString,
	{
		self.set(key, value);
		self
	}

	/// Inserts a key-value pair only when `value` is present (builder pattern).
	pub fn insert_opt<K, V>(mut self, key: K, value: Option<V>) -> Self
	where
		K: Into<String>,
		V: ToString,
	{
		if let Some(value) = value {
			self.set(key, value);
		}
		self
	}

	/// Sets a key, replacing the value in place if the key already exists.
	pub fn set<K, V>(&mut self, key: K, value: V)
	where
		K: Into<String>,
		V: ToString,
	{
		let key = key.into();
		let value = value.to_string();
		match self.entries.iter_mut().find(|(k, _)| *k == key) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((key, value)),
		}
	}

	/// Removes a key, returning its value if it was present.
	pub fn remove(&mut self, key: &str) -> Option<String> {
		let pos = self.entries.iter().position(|(k, _)| k == key)?;
		Some(self.entries.remove(pos).1)
	}

	/// Merges `other` on top of this set.
	///
	/// On key collision the value from `other` wins; the key keeps its
	/// original position.
	pub fn merge(mut self, other: BeaconParams) -> Self {
		for (k, v) in other.entries {
			self.set(k, v);
		}
		self
	}

	/// Gets a value by key.
	pub fn get(&self, key: &str) -> Option<&str> {
		self
			.entries
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns true if the key is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	/// Returns true if there are no parameters.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns the number of parameters.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Iterates over the parameters in wire order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Serializes to `key=escaped(value)` pairs joined with `&`.
	///
	/// Keys are protocol identifiers and are written verbatim.
	pub fn to_query_string(&self) -> String {
		self
			.entries
			.iter()
			.map(|(k, v)| format!("{k}={}", escape(v)))
			.collect::<Vec<_>>()
			.join("&")
	}
}

impl<K, V> FromIterator<(K, V)> for BeaconParams
where
	K: Into<String>,
	V: ToString,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = BeaconParams::new();
		for (k, v) in iter {
			params.set(k, v);
		}
		params
	}
}
