//! Technology aggregation — categories, versions, usage, groups, stacks.

pub mod aggregator;
pub mod version;

pub use aggregator::TechnologyAggregator;
