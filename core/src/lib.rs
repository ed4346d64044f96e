//! Checkout gateway client for the `/api/checkout/pub` backend surface.
//!
//! # Overview
//! Translates checkout operations (order form, items, coupons, attachments,
//! simulation, cancellation) into HTTP requests and normalizes every failure
//! into a `DomainError`. The network round-trip is delegated to an injected
//! `Transport`, keeping this crate deterministic and easy to test.
//!
//! # Design
//! - `routes::Route` resolves paths as a pure function of its identifiers.
//! - `context` derives the session cookie, identity header, and `?sc=`
//!   qualifier from an immutable per-call `RequestContext`.
//! - `RequestDispatcher` implements the generic verbs, split into pure
//!   `prepare` / `finish` halves around `Transport::send`.
//! - `CheckoutClient` wires each named operation to a route, payload shape,
//!   and verb.

pub mod client;
pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod routes;
pub mod types;

pub use client::CheckoutClient;
pub use config::ClientConfig;
pub use context::RequestContext;
pub use dispatcher::{Call, RequestDispatcher};
pub use error::{DomainError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use routes::Route;
pub use types::{OrderForm, Quantity, RawResponse, SimulationItem, SimulationRequest};
