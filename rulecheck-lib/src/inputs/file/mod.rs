//! Inputs read from the local filesystem

mod provider;

pub use provider::Provider;
