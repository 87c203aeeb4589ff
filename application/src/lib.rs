//! Application layer for wellbeing-council
//!
//! This crate contains the council orchestrator use case and the ports
//! implemented by infrastructure and presentation (progress notification,
//! round journaling).

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::journal::{JournalEvent, NoJournal, RoundJournal};
pub use ports::progress::{CouncilProgress, NoProgress};
pub use use_cases::run_council::{Council, CouncilStatus};
