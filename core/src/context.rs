//! Per-call request context, sales-channel qualification, and header
//! composition.
//!
//! # Design
//! `RequestContext` is an immutable value the caller passes into every
//! operation. Nothing in this crate stores or mutates it; the session cookie
//! and channel query string are derived from it on each call.

use serde::Deserialize;

/// Name of the checkout cookie that pins an order form to the session.
pub const CHECKOUT_COOKIE: &str = "checkout.vtex.com";

/// Header carrying the store user's authentication token.
pub const IDENTITY_HEADER: &str = "VtexIdclientAutCookie";

/// Ambient identity and session facets for one checkout call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub session_token: Option<String>,
    pub segment_token: Option<String>,
    pub store_user_auth_token: Option<String>,
    pub sales_channel: Option<String>,
    pub order_form_id: Option<String>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    pub fn with_segment_token(mut self, token: impl Into<String>) -> Self {
        self.segment_token = Some(token.into());
        self
    }

    pub fn with_store_user_auth_token(mut self, token: impl Into<String>) -> Self {
        self.store_user_auth_token = Some(token.into());
        self
    }

    pub fn with_sales_channel(mut self, channel: impl Into<String>) -> Self {
        self.sales_channel = Some(channel.into());
        self
    }

    pub fn with_order_form_id(mut self, id: impl Into<String>) -> Self {
        self.order_form_id = Some(id.into());
        self
    }
}

/// `?sc=<channel>` when the context names a non-empty sales channel,
/// otherwise the empty string.
pub fn channel_query(ctx: &RequestContext) -> String {
    match ctx.sales_channel.as_deref() {
        Some(channel) if !channel.is_empty() => format!("?sc={channel}"),
        _ => String::new(),
    }
}

/// Cookie value naming an order form, e.g. `checkout.vtex.com=__ofid=abc;`.
pub fn checkout_cookie(order_form_id: &str) -> String {
    format!("{CHECKOUT_COOKIE}=__ofid={order_form_id};")
}

/// Build the session `Cookie` header for one call.
///
/// The order-form segment is omitted when the context has no order form id
/// (or an empty one). The segment and session markers are always present,
/// with empty values when the tokens are missing.
pub fn compose_headers(ctx: &RequestContext) -> Vec<(String, String)> {
    let order_form = match ctx.order_form_id.as_deref() {
        Some(id) if !id.is_empty() => checkout_cookie(id),
        _ => String::new(),
    };
    let segment = ctx.segment_token.as_deref().unwrap_or_default();
    let session = ctx.session_token.as_deref().unwrap_or_default();
    vec![(
        "Cookie".to_string(),
        format!("{order_form}vtex_segment={segment};vtex_session={session};"),
    )]
}

/// Identity header derived once, at client construction.
pub fn identity_header(ctx: &RequestContext) -> Option<(String, String)> {
    ctx.store_user_auth_token
        .as_ref()
        .filter(|token| !token.is_empty())
        .map(|token| (IDENTITY_HEADER.to_string(), token.clone()))
}
