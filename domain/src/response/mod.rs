//! Per-role verdict value objects.
//!
//! These types represent what a single domain returns for one round:
//! - [`level::AgreementLevel`] - the closed set of agreement buckets
//! - [`domain_response::DomainMetrics`] - per-role metric snapshot
//! - [`domain_response::DomainResponse`] - a role's full verdict

pub mod domain_response;
pub mod level;

pub use domain_response::{DomainMetrics, DomainResponse};
pub use level::AgreementLevel;
