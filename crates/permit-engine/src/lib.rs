#![deny(missing_docs)]
//! # permit-engine — Commercial Vehicle Permit Policy Engine
//!
//! Evaluates permit applications against a policy document and answers the
//! questions a permit front end asks while an application is being filled
//! in: which vehicles are permittable, what comes next in a combination,
//! which size and weight limits apply, whether the axle loads pass the
//! bridge formula and how the combination is written as a display code.
//!
//! ## Usage
//!
//! ```ignore
//! let policy = Policy::from_json_str(&document, None)?;
//! let results = policy.validate(&application);
//! if results.is_valid() {
//!     println!("fee: {}", results.total_cost());
//! }
//! ```
//!
//! ## Modules
//!
//! - **Policy** (`policy.rs`): the [`Policy`] facade.
//! - **Display** (`display.rs`): the standard and universal display-code
//!   encodings.
//!
//! ## Crate Dependencies
//!
//! - `permit-core`: data model, errors, version gate.
//! - `permit-state`: vehicle catalog and configuration automaton.
//! - `permit-dimension`: size, weight and bridge formula.
//! - `permit-rules`: rule sets, facts and cost facts.

pub mod display;
pub mod policy;

pub use display::{standard_code, universal_code, vehicle_display_code, DisplayEncoding};
pub use policy::{PermitCondition, Policy};

pub use permit_core::{
    PermitApplication, PolicyDefinition, PolicyError, PolicyResult, SpecialAuthorizations,
    ValidationResult, ValidationResultType, ValidationResults,
};
pub use permit_dimension::BridgeCalculationResult;
pub use permit_state::PermittableVehicles;
