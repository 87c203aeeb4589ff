//! Progress notification port
//!
//! Defines the interface for reporting progress while a round fans out
//! across the seven domains. Implementations live in the presentation
//! layer and can display progress in various ways (console, logs, etc.)

use council_domain::Role;

/// Callback for progress updates during a council round
pub trait CouncilProgress: Send + Sync {
    /// Called when a round starts, with the number of domains consulted
    fn on_round_start(&self, total_roles: usize);

    /// Called as each domain's evaluation completes
    fn on_role_complete(&self, role: Role, success: bool);

    /// Called after the barrier join, before aggregation
    fn on_round_complete(&self);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl CouncilProgress for NoProgress {
    fn on_round_start(&self, _total_roles: usize) {}
    fn on_role_complete(&self, _role: Role, _success: bool) {}
    fn on_round_complete(&self) {}
}
