// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for Loom pixel-beacon tracking.
//!
//! This crate turns typed tracking calls into the flat, escaped query strings
//! of the `__utm.gif` beacon protocol. It performs no I/O; the client SDK
//! (`loom-beacon`) owns dispatch.
//!
//! # Overview
//!
//! - [`TrackerIdentity`]: account token, tracked domain and cookie identity
//! - [`CustomVariables`]: up to 50 scoped name/value slots
//! - [`TrackingEvent`]: page views, events, transactions and line items
//! - [`encode`]: mapping of events onto protocol keys
//! - [`BeaconParams`]: ordered parameter builder with override semantics
//!
//! # Example
//!
//! ```
//! use loom_beacon_core::{
//!     build_request, BeaconParams, CustomVariables, PageView, Scope, TrackerIdentity,
//! };
//!
//! let mut identity = TrackerIdentity::new("MO-1234567-1", "example.com")?;
//! let mut vars = CustomVariables::new();
//! vars.set(1, "plan", "pro", Scope::Visitor)?;
//!
//! let params = build_request(
//!     &mut identity,
//!     &vars,
//!     &PageView::new("Home", "/index.html").into(),
//!     BeaconParams::new().insert("utmip", "203.0.113.9"),
//! )?;
//!
//! assert!(params.to_query_string().contains("utmp=%2Findex.html"));
//! # Ok::<(), loom_beacon_core::BeaconError>(())
//! ```

pub mod custom_var;
pub mod encode;
pub mod error;
pub mod escape;
pub mod event;
pub mod id;
pub mod identity;
pub mod keys;
pub mod params;
pub mod request;

pub use custom_var::{CustomVariable, CustomVariables, Scope, MAX_CUSTOM_VARIABLES};
pub use encode::{
	build_request, default_fields, event_encoding, event_fields, event_kind_fields,
	line_item_fields, page_view_fields, transaction_fields,
};
pub use error::{BeaconError, Result};
pub use escape::escape;
pub use event::{Event, LineItem, PageView, TrackingEvent, Transaction};
pub use id::{random_id, session_component};
pub use identity::{
	synthesize_cookie, validate_account, AccountId, TrackerIdentity, DEFAULT_CHARSET,
	DEFAULT_LANGUAGE, DEFAULT_PROTOCOL_VERSION, DEFAULT_USER_AGENT,
};
pub use params::BeaconParams;
pub use request::BeaconRequest;
