//! Snapshot persistence contracts.

pub mod snapshot;
