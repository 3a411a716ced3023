// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Custom variables and their compact `utme` encoding.
//!
//! A tracker holds up to [`MAX_CUSTOM_VARIABLES`] slots, each a
//! `(name, value, scope)` triple. Slots are validated when they are set and
//! filtered when they are rendered, so a slot holding an unusable value is
//! kept but never sent.
//!
//! The rendered form is three parenthesized groups tagged `8`, `9` and `11`
//! carrying names, values and scopes joined with `*`:
//!
//! ```text
//! 8(a*2!b)9(1*2!2)11(1*2!3)
//! ```
//!
//! A slot that does not directly follow the previously rendered one carries an
//! explicit `<position>!` prefix, where position is the zero-based slot index.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{BeaconError, Result};
use crate::escape::{escape, has_word_char};

/// Number of custom variable slots; valid indices are `1..=MAX_CUSTOM_VARIABLES`.
pub const MAX_CUSTOM_VARIABLES: usize = 50;

/// The lifetime a custom variable is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
	/// Long-lived, attached to the visitor.
	Visitor = 1,
	/// Attached to the current session.
	Session = 2,
	/// Attached to a single page view.
	Page = 3,
}

impl Scope {
	/// Returns the numeric protocol code.
	pub fn code(self) -> u8 {
		self as u8
	}
}

impl TryFrom<u8> for Scope {
	type Error = BeaconError;

	fn try_from(code: u8) -> Result<Self> {
		match code {
			1 => Ok(Scope::Visitor),
			2 => Ok(Scope::Session),
			3 => Ok(Scope::Page),
			other => Err(BeaconError::InvalidScope(other)),
		}
	}
}

impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.code())
	}
}

/// One stored custom variable slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomVariable {
	pub name: String,
	pub value: String,
	pub scope: Scope,
}

impl CustomVariable {
	/// Returns true if this slot survives rendering.
	pub fn is_renderable(&self) -> bool {
		has_word_char(&self.name) && has_word_char(&self.value)
	}
}

/// Fixed-size, index-addressed collection of custom variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomVariables {
	slots: BTreeMap<usize, CustomVariable>,
}

impl CustomVariables {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores or overwrites the slot at `index`.
	///
	/// Accepts a [`Scope`] or a raw protocol code (`u8`).
	pub fn set<S>(
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
		check_index(index)?;
		let scope = scope.try_into()?;
		self.slots.insert(
			index,
			CustomVariable {
				name: name.into(),
				value: value.into(),
				scope,
			},
		);
		Ok(())
	}

	/// Removes the slot at `index`. Removing an empty slot is a no-op.
	pub fn delete(&mut self, index: usize) -> Result<()> {
		check_index(index)?;
		self.slots.remove(&index);
		Ok(())
	}

	pub fn get(&self, index: usize) -> Option<&CustomVariable> {
		self.slots.get(&index)
	}

	/// Number of stored slots, renderable or not.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	pub fn clear(&mut self) {
		self.slots.clear();
	}

	/// Renders the stored slots into the compact `8(..)9(..)11(..)` form.
	///
	/// Returns `None` when no slot is renderable.
	pub fn render(&self) -> Option<String> {
		let mut names = Vec::new();
		let mut values = Vec::new();
		let mut scopes = Vec::new();
		let mut expected = 0;

		for (&index, var) in &self.slots {
			if !var.is_renderable() {
				continue;
			}

			let position = index - 1;
			let prefix = if position != expected {
				format!("{position}!")
			} else {
				String::new()
			};
			expected = position + 1;

			names.push(format!("{prefix}{}", escape(&var.name)));
			values.push(format!("{prefix}{}", escape(&var.value)));
			scopes.push(format!("{prefix}{}", var.scope));
		}

		if names.is_empty() {
			return None;
		}

		Some(format!(
			"8({})9({})11({})",
			names.join("*"),
			values.join("*"),
			scopes.join("*")
		))
	}
}

fn check_index(index: usize) -> Result<()> {
	if (1..=MAX_CUSTOM_VARIABLES).contains(&index) {
		Ok(())
	} else {
		Err(BeaconError::InvalidIndex(index))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_scope_codes() {
		assert_eq!(Scope::Visitor.code(), 1);
		assert_eq!(Scope::Session.code(), 2);
		assert_eq!(Scope::Page.code(), 3);
		assert_eq!(Scope::try_from(2).unwrap(), Scope::Session);
		assert_eq!(Scope::try_from(4), Err(BeaconError::InvalidScope(4)));
		assert_eq!(Scope::try_from(0), Err(BeaconError::InvalidScope(0)));
	}

	#[test]
	fn test_set_rejects_out_of_range_index() {
		let mut vars = CustomVariables::new();
		assert_eq!(
			vars.set(0, "a", "1", Scope::Visitor),
			Err(BeaconError::InvalidIndex(0))
		);
		assert_eq!(
			vars.set(51, "a", "1", Scope::Visitor),
			Err(BeaconError::InvalidIndex(51))
		);
		assert!(vars.set(50, "a", "1", Scope::Visitor).is_ok());
	}

	#[test]
	fn test_set_rejects_invalid_scope_code() {
		let mut vars = CustomVariables::new();
		assert_eq!(vars.set(1, "a", "1", 7u8), Err(BeaconError::InvalidScope(7)));
		assert!(vars.is_empty());
		assert!(vars.set(1, "a", "1", 3u8).is_ok());
		assert_eq!(vars.get(1).unwrap().scope, Scope::Page);
	}

	#[test]
	fn test_set_overwrites_slot() {
		let mut vars = CustomVariables::new();
		vars.set(1, "a", "1", Scope::Visitor).unwrap();
		vars.set(1, "b", "2", Scope::Session).unwrap();
		assert_eq!(vars.len(), 1);
		assert_eq!(vars.render().as_deref(), Some("8(b)9(2)11(2)"));
	}

	#[test]
	fn test_delete_validates_index_and_tolerates_missing_slot() {
		let mut vars = CustomVariables::new();
		assert_eq!(vars.delete(0), Err(BeaconError::InvalidIndex(0)));
		assert!(vars.delete(5).is_ok());
	}

	#[test]
	fn test_delete_removes_from_render() {
		let mut vars = CustomVariables::new();
		vars.set(1, "a", "1", Scope::Visitor).unwrap();
		vars.set(2, "b", "2", Scope::Page).unwrap();
		vars.delete(1).unwrap();
		assert_eq!(vars.render().as_deref(), Some("8(1!b)9(1!2)11(1!3)"));
		vars.delete(2).unwrap();
		assert_eq!(vars.render(), None);
	}

	#[test]
	fn test_render_empty_is_none() {
		assert_eq!(CustomVariables::new().render(), None);
	}

	#[test]
	fn test_render_contiguous_slots_without_prefix() {
		let mut vars = CustomVariables::new();
		vars.set(1, "a", "1", Scope::Visitor).unwrap();
		vars.set(2, "b", "2", Scope::Session).unwrap();
		assert_eq!(vars.render().as_deref(), Some("8(a*b)9(1*2)11(1*2)"));
	}

	#[test]
	fn test_render_prefixes_first_slot_after_gap() {
		let mut vars = CustomVariables::new();
		vars.set(1, "a", "1", Scope::Visitor).unwrap();
		vars.set(3, "b", "2", Scope::Page).unwrap();
		assert_eq!(
			vars.render().as_deref(),
			Some("8(a*2!b)9(1*2!2)11(1*2!3)")
		);
	}

	#[test]
	fn test_render_resets_baseline_after_prefix() {
		let mut vars = CustomVariables::new();
		vars.set(3, "a", "1", Scope::Visitor).unwrap();
		vars.set(4, "b", "2", Scope::Visitor).unwrap();
		vars.set(7, "c", "3", Scope::Visitor).unwrap();
		assert_eq!(
			vars.render().as_deref(),
			Some("8(2!a*b*6!c)9(2!1*2*6!3)11(2!1*1*6!1)")
		);
	}

	#[test]
	fn test_render_skips_slots_without_word_characters() {
		let mut vars = CustomVariables::new();
		vars.set(1, "", "1", Scope::Visitor).unwrap();
		vars.set(2, "b", "", Scope::Visitor).unwrap();
		vars.set(3, "***", "1", Scope::Visitor).unwrap();
		vars.set(4, "d", "!!", Scope::Visitor).unwrap();
		assert_eq!(vars.len(), 4);
		assert_eq!(vars.render(), None);

		vars.set(5, "e", "5", Scope::Session).unwrap();
		assert_eq!(vars.render().as_deref(), Some("8(4!e)9(4!5)11(4!2)"));
	}

	#[test]
	fn test_render_percent_escapes_tokens() {
		let mut vars = CustomVariables::new();
		vars.set(1, "plan type", "pro/annual", Scope::Visitor).unwrap();
		assert_eq!(
			vars.render().as_deref(),
			Some("8(plan%20type)9(pro%2Fannual)11(1)")
		);
	}

	proptest! {
		#[test]
		fn test_render_has_three_groups(
			slots in proptest::collection::btree_map(1usize..=50, ("[a-z]{1,8}", "[a-z0-9]{1,8}", 1u8..=3), 1..10),
		) {
			let mut vars = CustomVariables::new();
			for (index, (name, value, scope)) in &slots {
				vars.set(*index, name.clone(), value.clone(), *scope).unwrap();
			}
			let rendered = vars.render().unwrap();
			prop_assert!(rendered.starts_with("8("));
			prop_assert!(rendered.contains(")9("));
			prop_assert!(rendered.contains(")11("));
			prop_assert!(rendered.ends_with(')'));

			let names = rendered
				.trim_start_matches("8(")
				.split(")9(")
				.next()
				.unwrap()
				.split('*')
				.count();
			prop_assert_eq!(names, slots.len());
		}

		#[test]
		fn test_out_of_range_index_always_rejected(index in 51usize..10_000) {
			let mut vars = CustomVariables::new();
			prop_assert_eq!(
				vars.set(index, "a", "1", Scope::Visitor),
				Err(BeaconError::InvalidIndex(index))
			);
		}
	}
}
