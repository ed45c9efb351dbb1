//! Rule model and loader
//!
//! A rule is a YAML document naming a set of inputs and a boolean CEL
//! expression over them. Loading is strictly field-level: whether the
//! expression only references declared inputs is left to the expression
//! engine, which reports it when the rule is evaluated.
//!
//! Input types form a closed set ([`InputSource`]). Types this build doesn't
//! know about are kept as [`InputSource::Unrecognized`] rather than rejected,
//! so the collector can apply its configured policy to them.

mod input;
mod loader;
mod rule_doc;

pub use input::{CLUSTER_RESOURCE_TYPE, FILE_TYPE, FileLocator, Input, InputSource, ResourceLocator};
pub use loader::{LoadError, load};
pub use rule_doc::{CheckType, Rule};
