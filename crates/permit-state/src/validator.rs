//! # Vehicle Configuration Automaton
//!
//! Decides whether an ordered list of vehicle type ids is a legal
//! combination for a permit type and commodity, and which vehicles may
//! legally follow a partial combination.
//!
//! ## States
//!
//! ```text
//!                     power unit              trailer
//! AwaitingPowerUnit ─────────────▶ AwaitingJeepOrTrailer ─────────────▶ AwaitingBoosterOrDone ─┐
//!                                        │                                  ▲            booster │
//!                                   jeep │         ┌── jeep                 │ trailer            │
//!                                        ▼         ▼                        │                    │
//!                                   AwaitingTrailer ────────────────────────┘          ◀─────────┘
//! ```
//!
//! Alongside the state, the automaton carries the additional-axle pseudo
//! type expected next. Accepting a vehicle with an `additionalAxleSubType`
//! sets it; the pseudo token is then accepted once, immediately, without
//! changing state. Any other accepted token replaces the expectation.
//!
//! Entering `AwaitingTrailer` narrows the trailer candidates to those that
//! permit jeeps. Only `AwaitingBoosterOrDone` is a complete combination.
//!
//! ## Candidate Sources
//!
//! Commodity-driven permit types draw power units and trailers from the
//! commodity's size/weight tables. Permit types with a fixed vehicle
//! allow-list run the same automaton over the listed vehicles, split by
//! category; jeeps and boosters are admitted there only when listed.
//!
//! ## LCV Gating
//!
//! A sequence containing any long combination vehicle is rejected outright
//! unless LCVs are authorized.

use std::collections::BTreeSet;

use permit_core::policy::{Commodity, PermitType};
use permit_core::{PolicyDefinition, PolicyResult, BOOSTER, JEEP};

use crate::catalog::{
    allow_list_power_units, allow_list_trailers, power_unit_candidates,
    resolve_commodity_permit, trailer_candidates, TrailerCandidate,
};

// ─── Configuration State ─────────────────────────────────────────────

/// State of the configuration automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationState {
    /// Nothing placed yet.
    AwaitingPowerUnit,
    /// Power unit placed; a jeep or the trailer may follow.
    AwaitingJeepOrTrailer {
        /// The placed power unit.
        power_unit: String,
        /// Trailers permittable behind it.
        candidates: Vec<TrailerCandidate>,
    },
    /// One or more jeeps placed; only the trailer (or another jeep) may
    /// follow.
    AwaitingTrailer {
        /// The placed power unit.
        power_unit: String,
        /// Trailers permittable behind it that allow jeeps.
        candidates: Vec<TrailerCandidate>,
    },
    /// Trailer placed; boosters may follow when the trailer allows them.
    AwaitingBoosterOrDone {
        /// The placed trailer.
        trailer: String,
        /// The trailer permits boosters.
        booster_allowed: bool,
    },
}

impl ConfigurationState {
    /// Whether a complete combination has been formed.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::AwaitingBoosterOrDone { .. })
    }

    /// Whether a jeep may be placed next.
    pub fn jeep_allowed(&self) -> bool {
        match self {
            Self::AwaitingJeepOrTrailer { candidates, .. } => candidates.iter().any(|c| c.jeep),
            Self::AwaitingTrailer { .. } => true,
            _ => false,
        }
    }

    /// Whether a booster may be placed next.
    pub fn booster_allowed(&self) -> bool {
        matches!(self, Self::AwaitingBoosterOrDone { booster_allowed: true, .. })
    }

    fn trailer_candidates(&self) -> &[TrailerCandidate] {
        match self {
            Self::AwaitingJeepOrTrailer { candidates, .. }
            | Self::AwaitingTrailer { candidates, .. } => candidates,
            _ => &[],
        }
    }
}

impl std::fmt::Display for ConfigurationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AwaitingPowerUnit => "AWAITING_POWER_UNIT",
            Self::AwaitingJeepOrTrailer { .. } => "AWAITING_JEEP_OR_TRAILER",
            Self::AwaitingTrailer { .. } => "AWAITING_TRAILER",
            Self::AwaitingBoosterOrDone { .. } => "AWAITING_BOOSTER_OR_DONE",
        };
        f.write_str(s)
    }
}

/// Where a walk over a sequence ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// Every token was accepted.
    Accepted {
        /// State after the last token.
        state: ConfigurationState,
        /// Additional-axle pseudo type expected next, if any.
        expected_axle: Option<String>,
    },
    /// A token was not permitted in the state reached before it.
    Rejected {
        /// 0-based position of the offending token.
        position: usize,
        /// The offending vehicle id.
        vehicle: String,
    },
}

// ─── Validator ───────────────────────────────────────────────────────

/// Where power unit and trailer candidates come from.
#[derive(Debug, Clone, Copy)]
enum VehicleSource<'a> {
    Commodity(&'a Commodity),
    AllowList,
}

/// Configuration validator bound to one permit type and its vehicle
/// source.
#[derive(Debug, Clone)]
pub struct ConfigurationValidator<'a> {
    policy: &'a PolicyDefinition,
    permit_type: &'a PermitType,
    source: VehicleSource<'a>,
    lcv_allowed: bool,
}

impl<'a> ConfigurationValidator<'a> {
    /// Bind a validator to a commodity-driven permit type.
    ///
    /// # Errors
    ///
    /// Unknown permit type or commodity, or a permit type that does not use
    /// commodity selection.
    pub fn new(
        policy: &'a PolicyDefinition,
        permit_type_id: &str,
        commodity_id: &str,
        lcv_allowed: bool,
    ) -> PolicyResult<Self> {
        let (permit_type, commodity) =
            resolve_commodity_permit(policy, permit_type_id, commodity_id)?;
        Ok(Self {
            policy,
            permit_type,
            source: VehicleSource::Commodity(commodity),
            lcv_allowed,
        })
    }

    /// Bind a validator to a permit type's fixed vehicle allow-list.
    pub fn for_allow_list(
        policy: &'a PolicyDefinition,
        permit_type: &'a PermitType,
        lcv_allowed: bool,
    ) -> Self {
        Self {
            policy,
            permit_type,
            source: VehicleSource::AllowList,
            lcv_allowed,
        }
    }

    /// Whether `sequence` is a valid combination. With `allow_partial`,
    /// any prefix of a valid combination is accepted, including the empty
    /// sequence.
    pub fn is_valid<S: AsRef<str>>(&self, sequence: &[S], allow_partial: bool) -> bool {
        if self.contains_forbidden_lcv(sequence) {
            return false;
        }
        match self.walk(sequence) {
            WalkOutcome::Accepted { state, .. } => allow_partial || state.is_complete(),
            WalkOutcome::Rejected { .. } => false,
        }
    }

    /// Vehicle ids that may legally be appended to `sequence`. Empty when
    /// the sequence is already invalid.
    pub fn next_permittable<S: AsRef<str>>(&self, sequence: &[S]) -> BTreeSet<String> {
        let mut next = BTreeSet::new();
        if self.contains_forbidden_lcv(sequence) {
            return next;
        }
        let WalkOutcome::Accepted {
            state,
            expected_axle,
        } = self.walk(sequence)
        else {
            return next;
        };

        match &state {
            ConfigurationState::AwaitingPowerUnit => {
                next.extend(
                    self.power_units()
                        .into_iter()
                        .filter(|id| !self.is_forbidden_lcv(id)),
                );
            }
            ConfigurationState::AwaitingJeepOrTrailer { candidates, .. }
            | ConfigurationState::AwaitingTrailer { candidates, .. } => {
                next.extend(
                    candidates
                        .iter()
                        .filter(|c| !self.is_forbidden_lcv(&c.id))
                        .map(|c| c.id.clone()),
                );
            }
            ConfigurationState::AwaitingBoosterOrDone { .. } => {}
        }
        if state.jeep_allowed() {
            next.insert(JEEP.to_string());
        }
        if state.booster_allowed() {
            next.insert(BOOSTER.to_string());
        }
        next.extend(expected_axle);
        next
    }

    /// Run the automaton over `sequence`.
    pub fn walk<S: AsRef<str>>(&self, sequence: &[S]) -> WalkOutcome {
        let mut state = ConfigurationState::AwaitingPowerUnit;
        let mut expected_axle: Option<String> = None;

        for (position, item) in sequence.iter().enumerate() {
            let token: &str = item.as_ref();
            if expected_axle.as_deref() == Some(token) {
                expected_axle = None;
                continue;
            }
            match self.step(&state, token) {
                Some(next) => {
                    state = next;
                    expected_axle = self.additional_axle_of(token);
                }
                None => {
                    tracing::debug!(
                        permit_type = %self.permit_type.id,
                        source = self.source_name(),
                        state = %state,
                        position,
                        vehicle = token,
                        "vehicle not permitted in configuration"
                    );
                    return WalkOutcome::Rejected {
                        position,
                        vehicle: token.to_string(),
                    };
                }
            }
        }
        WalkOutcome::Accepted {
            state,
            expected_axle,
        }
    }

    /// The transition table.
    fn step(&self, state: &ConfigurationState, token: &str) -> Option<ConfigurationState> {
        use ConfigurationState::*;

        match state {
            AwaitingPowerUnit => self
                .power_units()
                .iter()
                .any(|p| p == token)
                .then(|| AwaitingJeepOrTrailer {
                    power_unit: token.to_string(),
                    candidates: self.trailers(token),
                }),
            AwaitingJeepOrTrailer { power_unit, candidates } if token == JEEP => state
                .jeep_allowed()
                .then(|| AwaitingTrailer {
                    power_unit: power_unit.clone(),
                    candidates: candidates.iter().filter(|c| c.jeep).cloned().collect(),
                }),
            AwaitingTrailer { .. } if token == JEEP => Some(state.clone()),
            AwaitingJeepOrTrailer { .. } | AwaitingTrailer { .. } => state
                .trailer_candidates()
                .iter()
                .find(|c| c.id == token)
                .map(|c| AwaitingBoosterOrDone {
                    trailer: c.id.clone(),
                    booster_allowed: c.booster,
                }),
            AwaitingBoosterOrDone { .. } if token == BOOSTER => {
                state.booster_allowed().then(|| state.clone())
            }
            AwaitingBoosterOrDone { .. } => None,
        }
    }

    fn power_units(&self) -> Vec<String> {
        match self.source {
            VehicleSource::Commodity(commodity) => power_unit_candidates(self.permit_type, commodity),
            VehicleSource::AllowList => allow_list_power_units(self.policy, self.permit_type),
        }
    }

    fn trailers(&self, power_unit: &str) -> Vec<TrailerCandidate> {
        match self.source {
            VehicleSource::Commodity(commodity) => {
                trailer_candidates(self.permit_type, commodity, power_unit)
            }
            VehicleSource::AllowList => allow_list_trailers(self.policy, self.permit_type),
        }
    }

    fn source_name(&self) -> &str {
        match self.source {
            VehicleSource::Commodity(commodity) => &commodity.id,
            VehicleSource::AllowList => "allowedVehicles",
        }
    }

    fn additional_axle_of(&self, vehicle: &str) -> Option<String> {
        self.policy
            .vehicle_types
            .find(vehicle)
            .and_then(|v| v.additional_axle_sub_type.clone())
    }

    fn is_forbidden_lcv(&self, vehicle: &str) -> bool {
        !self.lcv_allowed && self.policy.vehicle_types.find(vehicle).is_some_and(|v| v.is_lcv)
    }

    fn contains_forbidden_lcv<S: AsRef<str>>(&self, sequence: &[S]) -> bool {
        sequence.iter().any(|v| self.is_forbidden_lcv(v.as_ref()))
    }
}
