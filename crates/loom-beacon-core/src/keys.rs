// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Query parameter names understood by the collector.

pub const VERSION: &str = "utmwv";
pub const HIT_ID: &str = "utmn";
pub const DOMAIN: &str = "utmhn";
pub const CHARSET: &str = "utmcs";
pub const LANGUAGE: &str = "utmul";
pub const ACCOUNT: &str = "utmac";
pub const COOKIE: &str = "utmcc";
pub const PAGE_TITLE: &str = "utmdt";
pub const PAGE_PATH: &str = "utmp";
pub const HIT_TYPE: &str = "utmt";
pub const EXTENSIBLE: &str = "utme";
pub const ORDER_ID: &str = "utmtid";
pub const STORE_NAME: &str = "utmtst";
pub const TOTAL: &str = "utmtto";
pub const TAX: &str = "utmttx";
pub const SHIPPING: &str = "utmtsp";
pub const CITY: &str = "utmtci";
pub const REGION: &str = "utmtrg";
pub const COUNTRY: &str = "utmtco";
pub const ITEM_SKU: &str = "utmipc";
pub const ITEM_NAME: &str = "utmipn";
pub const ITEM_VARIATION: &str = "utmiva";
pub const ITEM_PRICE: &str = "utmipr";
pub const ITEM_QUANTITY: &str = "utmiqt";
pub const SESSION_HIT_ID: &str = "utmhid";
pub const CLIENT_IP: &str = "utmip";

/// Values of [`HIT_TYPE`].
pub mod hit_types {
	pub const EVENT: &str = "event";
	pub const TRANSACTION: &str = "tran";
	pub const ITEM: &str = "item";
}
