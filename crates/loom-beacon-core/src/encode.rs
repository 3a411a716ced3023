// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mapping of tracking calls onto protocol parameters.
//!
//! A beacon is assembled from three layers, later layers winning on key
//! collision:
//!
//! 1. [`default_fields`]: identity of the tracker (account, domain, cookie).
//! 2. The fields derived from the [`TrackingEvent`].
//! 3. Caller-supplied overrides (for example `utmip`).

use crate::custom_var::CustomVariables;
use crate::error::{BeaconError, Result};
use crate::event::{Event, LineItem, PageView, TrackingEvent, Transaction};
use crate::id::random_id;
use crate::identity::TrackerIdentity;
use crate::keys::{self, hit_types};
use crate::params::BeaconParams;

/// Compact `utme` encoding of an event: `5(category*action[*label])[(value)]`.
pub fn event_encoding(
	category: &str,
	action: &str,
	label: Option<&str>,
	value: Option<i64>,
) -> Result<String> {
	require("category", category)?;
	require("action", action)?;

	let mut data = match label {
		Some(label) => format!("5({category}*{action}*{label})"),
		None => format!("5({category}*{action})"),
	};
	if let Some(value) = value {
		data.push_str(&format!("({value})"));
	}
	Ok(data)
}

pub fn page_view_fields(view: &PageView, custom_vars: Option<&str>) -> BeaconParams {
	BeaconParams::new()
		.insert(keys::PAGE_TITLE, &view.title)
		.insert(keys::PAGE_PATH, &view.page)
		.insert_opt(keys::EXTENSIBLE, custom_vars)
}

/// Event fields; the custom-variable rendering, when present, is appended
/// directly to the event encoding.
pub fn event_fields(event: &Event, custom_vars: Option<&str>) -> Result<BeaconParams> {
	let mut utme = event_encoding(
		&event.category,
		&event.action,
		event.label.as_deref(),
		event.value,
	)?;
	if let Some(custom_vars) = custom_vars {
		utme.push_str(custom_vars);
	}

	Ok(BeaconParams::new()
		.insert(keys::HIT_TYPE, hit_types::EVENT)
		.insert(keys::EXTENSIBLE, utme))
}

pub fn transaction_fields(tx: &Transaction, hit_id: u64) -> Result<BeaconParams> {
	require("order_id", &tx.order_id)?;

	Ok(BeaconParams::new()
		.insert(keys::HIT_TYPE, hit_types::TRANSACTION)
		.insert(keys::SESSION_HIT_ID, hit_id)
		.insert(keys::ORDER_ID, &tx.order_id)
		.insert_opt(keys::STORE_NAME, tx.store_name.as_ref())
		.insert(keys::TOTAL, tx.total)
		.insert_opt(keys::TAX, tx.tax)
		.insert_opt(keys::SHIPPING, tx.shipping)
		.insert_opt(keys::CITY, tx.city.as_ref())
		.insert_opt(keys::REGION, tx.region.as_ref())
		.insert_opt(keys::COUNTRY, tx.country.as_ref()))
}

pub fn line_item_fields(item: &LineItem) -> Result<BeaconParams> {
	require("order_id", &item.order_id)?;
	require("sku", &item.sku)?;

	Ok(BeaconParams::new()
		.insert(keys::HIT_TYPE, hit_types::ITEM)
		.insert(keys::ORDER_ID, &item.order_id)
		.insert(keys::ITEM_SKU, &item.sku)
		.insert_opt(keys::ITEM_NAME, item.name.as_ref())
		.insert_opt(keys::ITEM_VARIATION, item.category.as_ref())
		.insert(keys::ITEM_PRICE, item.price)
		.insert(keys::ITEM_QUANTITY, item.quantity))
}

/// Fields derived from the event alone. Transactions draw a fresh `utmhid`.
pub fn event_kind_fields(event: &TrackingEvent, custom_vars: Option<&str>) -> Result<BeaconParams> {
	match event {
		TrackingEvent::PageView(view) => Ok(page_view_fields(view, custom_vars)),
		TrackingEvent::Event(event) => event_fields(event, custom_vars),
		TrackingEvent::Transaction(tx) => transaction_fields(tx, random_id()),
		TrackingEvent::LineItem(item) => line_item_fields(item),
	}
}

/// Identity fields sent with every hit.
///
/// Synthesizes and caches the cookie on the identity if none has been set.
pub fn default_fields(identity: &mut TrackerIdentity) -> Result<BeaconParams> {
	let (account, domain) = identity.require_configured()?;
	let account = account.to_string();
	let domain = domain.to_string();

	let params = BeaconParams::new()
		.insert(keys::VERSION, &identity.version)
		.insert(keys::HIT_ID, identity.visitor_id())
		.insert(keys::DOMAIN, domain)
		.insert(keys::CHARSET, &identity.charset)
		.insert(keys::LANGUAGE, &identity.language)
		.insert(keys::ACCOUNT, account);

	Ok(params.insert(keys::COOKIE, identity.cookie()))
}

/// Assembles the final parameters for one hit.
///
/// Precedence: defaults < event fields < `overrides`. Custom variables are
/// rendered fresh on every call.
pub fn build_request(
	identity: &mut TrackerIdentity,
	custom_vars: &CustomVariables,
	event: &TrackingEvent,
	overrides: BeaconParams,
) -> Result<BeaconParams> {
	let defaults = default_fields(identity)?;
	let rendered = custom_vars.render();
	let derived = event_kind_fields(event, rendered.as_deref())?;
	Ok(defaults.merge(derived).merge(overrides))
}

fn require(field: &'static str, value: &str) -> Result<()> {
	if value.is_empty() {
		Err(BeaconError::MissingField(field))
	} else {
		Ok(())
	}
}
