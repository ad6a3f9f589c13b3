//! Virtual filesystem contracts: path resolution, node models, errors, and the service trait.

pub mod error;
pub mod path;
pub mod service;
pub mod types;
