//! Generic verb layer between checkout operations and the transport.
//!
//! # Design
//! Each verb is `prepare` (pure: URL, merged headers, JSON body), one
//! `Transport::send`, then `finish` (pure: status check and decode). Both
//! halves are public so a host can drive the round-trip itself. Failures of
//! any kind leave this module as `DomainError` only.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::config::ClientConfig;
use crate::context::{compose_headers, identity_header, RequestContext};
use crate::error::{translate, DomainError, Failure};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::RawResponse;

/// One dispatch: who is calling, which operation, where, and any explicit
/// headers from the call site.
#[derive(Debug, Clone)]
pub struct Call<'a> {
    pub ctx: &'a RequestContext,
    /// Stable operation name, recorded on the tracing span.
    pub operation: &'static str,
    pub path: String,
    pub headers: &'a [(String, String)],
}

impl<'a> Call<'a> {
    pub fn new(ctx: &'a RequestContext, operation: &'static str, path: String) -> Self {
        Self {
            ctx,
            operation,
            path,
            headers: &[],
        }
    }

    pub fn with_headers(mut self, headers: &'a [(String, String)]) -> Self {
        self.headers = headers;
        self
    }
}

/// Verb-level client over an injected transport.
///
/// Holds only construction-time configuration; safe to share across threads
/// whenever the transport is.
#[derive(Debug, Clone)]
pub struct RequestDispatcher<T> {
    config: ClientConfig,
    identity: Option<(String, String)>,
    transport: T,
}

impl<T: Transport> RequestDispatcher<T> {
    /// The identity header is taken from `ctx` here, once, and sent with
    /// every later request.
    pub fn new(config: ClientConfig, transport: T, ctx: &RequestContext) -> Self {
        Self {
            config,
            identity: identity_header(ctx),
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fetch<R: DeserializeOwned>(&self, call: Call<'_>) -> Result<R, DomainError> {
        let response = self.execute(&call, HttpMethod::Get, None)?;
        self.finish(&response)
    }

    pub fn create<B, R>(&self, call: Call<'_>, body: &B) -> Result<R, DomainError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode(body)?;
        let response = self.execute(&call, HttpMethod::Post, Some(body))?;
        self.finish(&response)
    }

    /// Like [`Self::create`], keeping the response status and headers.
    pub fn create_raw<B, R>(&self, call: Call<'_>, body: &B) -> Result<RawResponse<R>, DomainError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode(body)?;
        let response = self.execute(&call, HttpMethod::Post, Some(body))?;
        let data = self.finish(&response)?;
        Ok(RawResponse {
            status: response.status,
            headers: response.headers,
            data,
        })
    }

    pub fn replace<B, R>(&self, call: Call<'_>, body: &B) -> Result<R, DomainError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode(body)?;
        let response = self.execute(&call, HttpMethod::Put, Some(body))?;
        self.finish(&response)
    }

    pub fn patch<B, R>(&self, call: Call<'_>, body: &B) -> Result<R, DomainError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = encode(body)?;
        let response = self.execute(&call, HttpMethod::Patch, Some(body))?;
        self.finish(&response)
    }

    /// DELETE, optionally carrying a JSON body.
    pub fn remove<B, R>(&self, call: Call<'_>, body: Option<&B>) -> Result<R, DomainError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = body.map(encode).transpose()?;
        let response = self.execute(&call, HttpMethod::Delete, body)?;
        self.finish(&response)
    }

    /// Build the request for `call` without sending it.
    ///
    /// Header layers, lowest first: configured defaults, identity, session
    /// cookie, content type, then the call's explicit headers. A later layer
    /// replaces an earlier header of the same name (case-insensitive).
    pub fn prepare(&self, call: &Call<'_>, method: HttpMethod, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        for (name, value) in &self.config.headers {
            set_header(&mut headers, name, value);
        }
        if let Some((name, value)) = &self.identity {
            set_header(&mut headers, name, value);
        }
        for (name, value) in compose_headers(call.ctx) {
            set_header(&mut headers, &name, &value);
        }
        if body.is_some() {
            set_header(&mut headers, "content-type", "application/json");
        }
        for (name, value) in call.headers {
            set_header(&mut headers, name, value);
        }
        HttpRequest {
            method,
            url: self.config.url(&call.path),
            headers,
            body,
        }
    }

    /// Check the status and decode the body. An empty 2xx body decodes as
    /// JSON `null`.
    pub fn finish<R: DeserializeOwned>(&self, response: &HttpResponse) -> Result<R, DomainError> {
        if !response.is_success() {
            return Err(translate(Failure::Response(response)));
        }
        let body = response.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        serde_json::from_str(body).map_err(|e| translate(Failure::Decode(response, e)))
    }

    fn execute(
        &self,
        call: &Call<'_>,
        method: HttpMethod,
        body: Option<String>,
    ) -> Result<HttpResponse, DomainError> {
        let request = self.prepare(call, method, body);
        let span = debug_span!(
            "checkout",
            operation = call.operation,
            method = %method,
            url = %request.url
        );
        let _enter = span.enter();

        let response = match self.transport.send(&request) {
            Ok(response) => response,
            Err(err) => {
                let err = translate(Failure::Transport(err));
                warn!(kind = %err.kind, error = %err.message, "checkout request failed");
                return Err(err);
            }
        };
        if !response.is_success() {
            let err = translate(Failure::Response(&response));
            warn!(kind = %err.kind, status = response.status, error = %err.message, "checkout request rejected");
            return Err(err);
        }
        debug!(status = response.status, "checkout request succeeded");
        Ok(response)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<String, DomainError> {
    serde_json::to_string(body).map_err(|e| translate(Failure::Encode(e)))
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
        Some(entry) => *entry = (name.to_string(), value.to_string()),
        None => headers.push((name.to_string(), value.to_string())),
    }
}
