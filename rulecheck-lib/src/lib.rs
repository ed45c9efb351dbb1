#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for rulecheck
//!
//! This library holds all functionality of the rulecheck tool, which evaluates
//! a single declarative compliance rule against live cluster and file data.
//!
//! # Module Organization
//!
//! - [`rule`]: Rule documents and their loader
//! - [`inputs`]: Collection of rule inputs from clusters and files
//! - [`expr`]: Expression evaluation and outcome classification
//! - [`reports`]: Rendering of outcomes
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod expr;
#[cfg(not(any(debug_assertions, test)))]
mod expr;

#[cfg(any(debug_assertions, test))]
pub mod inputs;
#[cfg(not(any(debug_assertions, test)))]
mod inputs;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod rule;
#[cfg(not(any(debug_assertions, test)))]
mod rule;

pub use crate::commands::{FATAL_EXIT_CODE, Host, run};
pub use crate::inputs::{CancelHandle, CancelSignal, cancel_pair};
