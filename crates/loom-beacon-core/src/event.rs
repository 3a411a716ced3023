// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed tracking calls.
//!
//! Each hit sent to the collector is one [`TrackingEvent`]. Optional fields
//! that are left unset are omitted from the beacon rather than sent empty.

use serde::{Deserialize, Serialize};

/// A page view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageView {
	/// Title of the page (`utmdt`).
	pub title: String,
	/// Path of the page (`utmp`).
	pub page: String,
}

impl PageView {
	pub fn new(title: impl Into<String>, page: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			page: page.into(),
		}
	}
}

/// A custom event. Category and action are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
	pub category: String,
	pub action: String,
	pub label: Option<String>,
	pub value: Option<i64>,
}

impl Event {
	pub fn new(category: impl Into<String>, action: impl Into<String>) -> Self {
		Self {
			category: category.into(),
			action: action.into(),
			label: None,
			value: None,
		}
	}

	/// Sets the event label (builder pattern).
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Sets the numeric event value (builder pattern).
	pub fn with_value(mut self, value: i64) -> Self {
		self.value = Some(value);
		self
	}
}

/// An e-commerce transaction. Order ID and total are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
	pub order_id: String,
	pub total: f64,
	pub store_name: Option<String>,
	pub tax: Option<f64>,
	pub shipping: Option<f64>,
	pub city: Option<String>,
	pub region: Option<String>,
	pub country: Option<String>,
}

impl Transaction {
	pub fn new(order_id: impl Into<String>, total: f64) -> Self {
		Self {
			order_id: order_id.into(),
			total,
			store_name: None,
			tax: None,
			shipping: None,
			city: None,
			region: None,
			country: None,
		}
	}

	/// Sets the store name or affiliation (builder pattern).
	pub fn with_store_name(mut self, store_name: impl Into<String>) -> Self {
		self.store_name = Some(store_name.into());
		self
	}

	pub fn with_tax(mut self, tax: f64) -> Self {
		self.tax = Some(tax);
		self
	}

	pub fn with_shipping(mut self, shipping: f64) -> Self {
		self.shipping = Some(shipping);
		self
	}

	/// Sets the billing city, region and country (builder pattern).
	pub fn with_location(
		mut self,
		city: impl Into<String>,
		region: impl Into<String>,
		country: impl Into<String>,
	) -> Self {
		self.city = Some(city.into());
		self.region = Some(region.into());
		self.country = Some(country.into());
		self
	}
}

/// A line item belonging to a transaction. Order ID, SKU, price and
/// quantity are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
	pub order_id: String,
	pub sku: String,
	pub price: f64,
	pub quantity: u32,
	pub name: Option<String>,
	pub category: Option<String>,
}

impl LineItem {
	pub fn new(order_id: impl Into<String>, sku: impl Into<String>, price: f64, quantity: u32) -> Self {
		Self {
			order_id: order_id.into(),
			sku: sku.into(),
			price,
			quantity,
			name: None,
			category: None,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Sets the item category or variation (builder pattern).
	pub fn with_category(mut self, category: impl Into<String>) -> Self {
		self.category = Some(category.into());
		self
	}
}

/// One tracked interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackingEvent {
	PageView(PageView),
	Event(Event),
	Transaction(Transaction),
	LineItem(LineItem),
}

impl TrackingEvent {
	/// Short name of the hit kind, for logging.
	pub fn kind(&self) -> &'static str {
		match self {
			TrackingEvent::PageView(_) => "page_view",
			TrackingEvent::Event(_) => "event",
			TrackingEvent::Transaction(_) => "transaction",
			TrackingEvent::LineItem(_) => "line_item",
		}
	}
}

impl From<PageView> for TrackingEvent {
	fn from(v: PageView) -> Self {
		TrackingEvent::PageView(v)
	}
}

impl From<Event> for TrackingEvent {
	fn from(v: Event) -> Self {
		TrackingEvent::Event(v)
	}
}

impl From<Transaction> for TrackingEvent {
	fn from(v: Transaction) -> Self {
		TrackingEvent::Transaction(v)
	}
}

impl From<LineItem> for TrackingEvent {
	fn from(v: LineItem) -> Self {
		TrackingEvent::LineItem(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_event_builder() {
		let event = Event::new("video", "play").with_label("intro").with_value(3);
		assert_eq!(event.category, "video");
		assert_eq!(event.action, "play");
		assert_eq!(event.label.as_deref(), Some("intro"));
		assert_eq!(event.value, Some(3));
	}

	#[test]
	fn test_transaction_builder() {
		let tx = Transaction::new("1234", 11.99)
			.with_store_name("Acme Clothing")
			.with_tax(1.29)
			.with_shipping(5.0)
			.with_location("San Jose", "California", "USA");
		assert_eq!(tx.order_id, "1234");
		assert_eq!(tx.store_name.as_deref(), Some("Acme Clothing"));
		assert_eq!(tx.country.as_deref(), Some("USA"));
	}

	#[test]
	fn test_line_item_builder() {
		let item = LineItem::new("1234", "DD44", 11.99, 1)
			.with_name("T-Shirt")
			.with_category("Green Medium");
		assert_eq!(item.sku, "DD44");
		assert_eq!(item.quantity, 1);
		assert_eq!(item.name.as_deref(), Some("T-Shirt"));
	}

	#[test]
	fn test_tracking_event_kind() {
		assert_eq!(TrackingEvent::from(PageView::new("Home", "/")).kind(), "page_view");
		assert_eq!(TrackingEvent::from(Event::new("a", "b")).kind(), "event");
		assert_eq!(TrackingEvent::from(Transaction::new("1", 1.0)).kind(), "transaction");
		assert_eq!(
			TrackingEvent::from(LineItem::new("1", "s", 1.0, 1)).kind(),
			"line_item"
		);
	}

	#[test]
	fn test_tracking_event_serde_is_tagged() {
		let event = TrackingEvent::from(Event::new("video", "play"));
		let json = serde_json::to_value(&event).unwrap();
		assert_eq!(json["type"], "event");
		assert_eq!(json["category"], "video");
		let parsed: TrackingEvent = serde_json::from_value(json).unwrap();
		assert_eq!(parsed, event);
	}
}
