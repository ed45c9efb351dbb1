//! Input collection for rules
//!
//! A rule names its data sources as typed inputs. This module fetches each of
//! them and hands back a uniform [`CollectedValue`] per input name.
//!
//! # Implementation Model
//!
//! The [`Collector`] walks a rule's inputs in document order and dispatches
//! each one to the provider for its type:
//! - **Cluster resources**: read through a [`ClusterClient`], either one named
//!   object or every object of a kind.
//! - **Files**: read from the local filesystem.
//!
//! Input types the build doesn't know are skipped or rejected according to the
//! [`UnrecognizedInputPolicy`]. The first failing input aborts the run with a
//! [`CollectionError`] naming it. A [`CancelSignal`] can abandon a fetch that
//! is in flight.

mod cancel;
pub mod cluster;
mod collected_value;
mod collector;
pub mod file;
mod provider;

pub use cancel::{CancelHandle, CancelSignal, cancel_pair};
pub use cluster::{ClusterClient, GroupVersionResource, HttpClusterClient};
pub use collected_value::{CollectedInputs, CollectedValue, Object};
pub use collector::{CollectionError, Collector, UnrecognizedInputPolicy, needs_cluster};
pub use provider::{FetchError, InputProvider};
