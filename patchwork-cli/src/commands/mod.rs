//! Command implementations for PatchWork CLI

pub mod align;
pub mod convert;
