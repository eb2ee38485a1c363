//! # adpilot-domain
//!
//! Pure domain model for adpilot, the advertising budget automation job.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **automation settings** and normalize stored settings into them
//! - Define **campaign snapshots** and the performance ratios derived from them
//! - Define the **budget rules** (scale up / scale down) and their **decisions**
//! - Define the **automation log** entry and its approval state machine
//! - Define the **run summary** reported by each evaluation run
//! - Define **keywords** and the bid optimizer that targets an ACoS
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod campaign;
pub mod decision;
pub mod keyword;
pub mod log_entry;
pub mod metrics;
pub mod rules;
pub mod run;
pub mod settings;
