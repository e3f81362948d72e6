//! Route admission control
//!
//! Two independent checkpoints hide the platform's generic content API:
//! [`RouteGate::decide`] runs before dispatch and rejects any path that is
//! either on the exact blocked list or under the reserved prefix without an
//! allow-list match; [`auth_gate`] runs at the authentication stage and
//! replaces non-error responses for legacy discovery URIs with a 404.
//! Both are observation points only: idempotent, no request mutation,
//! evaluated on every request. Paths are compared exactly as received,
//! with no normalization.

use anyhow::{Context, Result};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use regex::Regex;
use std::sync::Arc;

use crate::api::AppState;
use crate::config::GateConfig;

/// Admission decision for an inbound path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Pass through to normal dispatch, unchanged
    Admit,
    /// 404, empty body, no further processing
    Reject,
}

/// Pre-dispatch route gate, compiled once from config
#[derive(Debug)]
pub struct RouteGate {
    blocked: Vec<String>,
    allowed: Vec<Regex>,
    reserved_prefix: String,
}

impl RouteGate {
    /// Compile the gate from policy data
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        let allowed = config
            .allowed_patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("invalid allow pattern '{}'", p)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            blocked: config.blocked_routes.clone(),
            allowed,
            reserved_prefix: config.reserved_prefix.clone(),
        })
    }

    /// Decide admission for a request path.
    ///
    /// The blocked list wins over everything, including the allow list.
    pub fn decide(&self, path: &str) -> Admission {
        if self.blocked.iter().any(|b| b == path) {
            return Admission::Reject;
        }

        if path.starts_with(&self.reserved_prefix) {
            if self.allowed.iter().any(|re| re.is_match(path)) {
                return Admission::Admit;
            }
            return Admission::Reject;
        }

        Admission::Admit
    }
}

/// Pre-dispatch middleware wrapping [`RouteGate::decide`]
pub async fn route_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    match state.gate.decide(path) {
        Admission::Admit => next.run(request).await,
        Admission::Reject => {
            tracing::debug!("Route gate rejected {}", path);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Authentication-stage gate
///
/// Inspects the raw request URI for the configured legacy discovery
/// fragments. On a match, any non-error result from further in is replaced
/// with a 404; an error already produced downstream passes through
/// unmodified.
pub async fn auth_gate(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().to_string();
    let hit = state
        .config
        .gate
        .blocked_uri_fragments
        .iter()
        .any(|f| uri.contains(f.as_str()));

    let response = next.run(request).await;

    if hit && !response.status().is_client_error() && !response.status().is_server_error() {
        tracing::debug!("Auth gate rejected {}", uri);
        return StatusCode::NOT_FOUND.into_response();
    }

    response
}
