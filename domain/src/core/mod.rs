//! Core domain concepts shared across all subdomains.
//!
//! - [`role::Role`] — the seven fixed council domains
//! - [`context::EvalContext`] — shared numeric/string context for a round
//! - [`error::DomainError`] — domain-level errors

pub mod context;
pub mod error;
pub mod role;
