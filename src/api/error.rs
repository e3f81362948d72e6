//! Resolver error taxonomy
//!
//! Deliberately narrow: a missing or invalid resource is a 404 with the
//! fixed sentinel body, a gate rejection is a bare 404 produced by the
//! middleware itself, and anything the store fails on surfaces as an
//! unhandled upstream fault. The wire response never distinguishes
//! "blocked" from "absent".

use thiserror::Error;

/// Errors a resolver can produce
#[derive(Debug, Error)]
pub enum ApiError {
    /// Empty/invalid input or no matching item
    #[error("no matching content")]
    NotFound,

    /// Content store failure, propagated as-is
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}
