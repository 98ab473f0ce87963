#![deny(missing_docs)]
//! # permit-dimension — Dimension Resolution
//!
//! Computes the physical limits that apply to a vehicle combination.
//!
//! ## Modules
//!
//! - **Size** (`size.rs`): size dimension selection by commodity, power unit
//!   and sizing trailer, positional modifiers, and most-restrictive merging
//!   across travelled regions.
//!
//! - **Weight** (`weight.rs`): three-tier default weight lookup (vehicle
//!   type, category, global) and per-axle-unit selection with axle-count and
//!   inter-axle spacing modifiers.
//!
//! - **Bridge** (`bridge.rs`): the bridge formula over every contiguous axle
//!   group.
//!
//! ## Design
//!
//! Every operation is a pure function of the policy definition and its
//! arguments. Modifier matching for size and weight shares one notion of a
//! vehicle's relatives (first, last, before, after) within the sequence.

pub mod bridge;
pub mod size;
pub mod weight;

pub use bridge::{calculate_bridge, validate_axle_configuration, BridgeCalculationResult};
pub use size::{most_restrictive, size_dimension};
pub use weight::{default_power_unit_weight, default_trailer_weight, select_weight_dimension};
