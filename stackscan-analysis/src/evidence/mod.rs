//! Evidence storage and intake.

pub mod intake;
pub mod store;

pub use store::{EvidenceStore, StoreSummary};
