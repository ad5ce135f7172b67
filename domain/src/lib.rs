//! Domain layer for gadget security tokens.
//!
//! Sits between the service configuration and the `token_auth` codec so that callers work
//! with domain errors and configured token stores rather than raw codec plumbing.

pub use token_auth::{ClaimSet, ClaimSetBuilder};

pub mod error;
pub mod security_token;
