#![deny(missing_docs)]
//! # permit-state — Vehicle Configuration Automaton
//!
//! Decides which vehicle combinations a permit type admits.
//!
//! ## Modules
//!
//! - **Catalog** (`catalog.rs`): permittable power units and trailers per
//!   permit type and commodity, following the size/weight list rule; permit
//!   type and commodity catalogs.
//!
//! - **Validator** (`validator.rs`): the configuration automaton
//!   (`AwaitingPowerUnit → AwaitingJeepOrTrailer → AwaitingTrailer →
//!   AwaitingBoosterOrDone`), run over a commodity's vehicle tables or a
//!   permit type's vehicle allow-list.
//!
//! ## Design
//!
//! Accessory sequencing is an explicit transition table over named states
//! rather than a set of booleans threaded through a loop. Illegal positions
//! of jeeps and boosters have no transition and reject the sequence.

pub mod catalog;
pub mod validator;

pub use catalog::{
    allow_list_power_units, allow_list_trailers, commodities, permit_types,
    permittable_vehicle_types, power_unit_candidates, resolve_commodity_permit,
    trailer_candidates, ListRule, PermittableVehicles, TrailerCandidate,
};
pub use validator::{ConfigurationState, ConfigurationValidator, WalkOutcome};
