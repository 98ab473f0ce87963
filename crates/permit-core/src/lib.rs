#![deny(missing_docs)]
//! # permit-core — Foundational Types for the Permit Policy Engine
//!
//! This crate defines the data model shared by every other crate in the
//! workspace: the policy configuration document, the permit application,
//! the validation result document, special authorizations, engine version
//! compatibility and the error hierarchy. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **The policy document is immutable.** Once an engine is built from a
//!    [`PolicyDefinition`], nothing mutates it. All queries are pure
//!    functions over it.
//!
//! 2. **Sum types for polymorphic records.** Weight dimensions are either
//!    power-unit or trailer shaped ([`WeightDimension`]); display codes are
//!    either steer/drive pairs or a single glyph ([`VehicleDisplayCode`]).
//!    Field selection is an exhaustive `match`.
//!
//! 3. **Ordered candidate lists.** Dimension candidates are resolved first
//!    match wins, in document order.
//!
//! 4. **Caller errors vs. findings.** API misuse is a [`PolicyError`]; a
//!    non-compliant application is a set of [`ValidationResults`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `permit-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod application;
pub mod authorization;
pub mod axle;
pub mod dimension;
pub mod error;
pub mod policy;
pub mod result;
pub mod rule;
pub mod vehicle;
pub mod version;

#[cfg(feature = "fixtures")]
pub mod fixtures;

// Re-export primary types for ergonomic imports.
pub use application::{parse_date, PermitApplication, PermitData};
pub use authorization::{lcv_allowed, SpecialAuthorizations};
pub use axle::AxleConfiguration;
pub use dimension::{
    AxleUnitWeight, DimensionModifier, ModifierPosition, PowerUnitWeightDimension,
    RegionSizeOverride, SizeDimension, TrailerWeightDimension, WeightDimension,
};
pub use error::{AxleConfigurationError, PolicyError, PolicyResult};
pub use policy::{
    BridgeCalculationConstants, Commodity, CommodityTrailer, CommodityVehicles,
    DisplayCodeDefaults, PermitType, PolicyDefinition, RangeMatrix,
};
pub use result::{ValidationResult, ValidationResultType, ValidationResults};
pub use rule::{Condition, ConditionRequirement, CostRule, FactCondition, Operator, Rule};
pub use vehicle::{VehicleCategoryKind, VehicleType, VehicleTypes, BOOSTER, JEEP};
pub use version::{check_compatibility, ENGINE_VERSION};
