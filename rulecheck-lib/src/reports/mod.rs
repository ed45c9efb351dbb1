//! Rendering of rule outcomes
//!
//! Two renderers are provided, each through a `generate` function:
//! - **Console**: the verdict line for humans, with optional ANSI colors.
//!   Warnings and errors are written to a separate stream.
//! - **JSON**: one machine-readable object per run.
//!
//! Both operate on a [`ReportableRule`], which pairs an [`Outcome`](crate::expr::Outcome)
//! with the rule's title, expression, and source path.

mod console;
mod json;
mod reportable_rule;

pub use console::generate as generate_console;
pub use json::generate as generate_json;
pub use reportable_rule::ReportableRule;
