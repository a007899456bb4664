//! False-positive mitigation.

pub mod mitigator;

pub use mitigator::{FalsePositiveMitigator, MitigationOutcome};
