//! Data model for the stackscan pipeline.

pub mod collections;
pub mod evidence;
pub mod inputs;
pub mod technology;
