//! # Weight Dimension Lookup and Selection
//!
//! ## Default Lookup
//!
//! Default weight candidates come from three tiers, most specific first:
//!
//! 1. the vehicle type's own `defaultWeightDimensions`,
//! 2. its category's `defaultWeightDimensions`,
//! 3. the global defaults.
//!
//! Each tier is filtered to the requested axle counts; the first tier with
//! any match wins. A tier may yield several candidates, distinguished by
//! their modifiers.
//!
//! ## Selection
//!
//! Axle units map onto vehicles as follows: units 0 and 1 (steer and drive)
//! belong to the power unit, and every later unit belongs to the next
//! vehicle not ignored for axle calculation. Relatives (`first`, `last`,
//! `before`, `after`) are taken over that same list of vehicles.
//!
//! For `before`/`after`, a modifier may additionally constrain the
//! neighbouring axle unit: its axle count, and the spacing between it and
//! the unit being resolved. A missing neighbour or spacing disqualifies the
//! candidate. `first`/`last` modifiers match on type/category alone.

use permit_core::dimension::{DimensionModifier, ModifierPosition};
use permit_core::{
    AxleConfiguration, AxleUnitWeight, PolicyDefinition, PolicyResult, WeightDimension,
};

use crate::size::Relatives;

// ---------------------------------------------------------------------------
// Default lookup
// ---------------------------------------------------------------------------

/// Default weight candidates of a power unit with the given steer and
/// drive axle counts.
///
/// # Errors
///
/// Unknown vehicle type.
pub fn default_power_unit_weight(
    policy: &PolicyDefinition,
    sub_type: &str,
    steer_axles: u32,
    drive_axles: u32,
) -> PolicyResult<Vec<WeightDimension>> {
    three_tier(policy, sub_type, &policy.global_weight_defaults.power_unit, |d| {
        matches!(d, WeightDimension::PowerUnit(p)
            if p.steer_axles == steer_axles && p.drive_axles == drive_axles)
    })
}

/// Default weight candidates of a towed unit with the given axle count.
///
/// # Errors
///
/// Unknown vehicle type.
pub fn default_trailer_weight(
    policy: &PolicyDefinition,
    sub_type: &str,
    axles: u32,
) -> PolicyResult<Vec<WeightDimension>> {
    three_tier(policy, sub_type, &policy.global_weight_defaults.trailer, |d| {
        matches!(d, WeightDimension::Trailer(t) if t.axles == axles)
    })
}

fn three_tier(
    policy: &PolicyDefinition,
    sub_type: &str,
    global: &[WeightDimension],
    keep: impl Fn(&WeightDimension) -> bool,
) -> PolicyResult<Vec<WeightDimension>> {
    let vehicle = policy.vehicle_type(sub_type)?;
    let category = policy
        .vehicle_category(vehicle.category)
        .map(|c| c.default_weight_dimensions.as_slice())
        .unwrap_or_default();

    let tiers: [(&str, &[WeightDimension]); 3] = [
        ("vehicle type", &vehicle.default_weight_dimensions),
        ("category", category),
        ("global", global),
    ];
    for (tier, dimensions) in tiers {
        let found: Vec<WeightDimension> = dimensions.iter().filter(|d| keep(*d)).cloned().collect();
        if !found.is_empty() {
            tracing::debug!(sub_type, tier, candidates = found.len(), "default weight resolved");
            return Ok(found);
        }
    }
    Ok(Vec::new())
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Select the legal/permittable weight of the axle unit at `axle_index`
/// among `candidates`.
///
/// The first candidate whose modifier matches wins; otherwise the first
/// unmodified candidate. Candidates that do not apply to the axle unit
/// (power-unit records beyond the drive unit) are skipped. Returns `None`
/// when nothing applies or when `axle_index` has no owning vehicle.
pub fn select_weight_dimension<S: AsRef<str>>(
    policy: &PolicyDefinition,
    candidates: &[WeightDimension],
    sequence: &[S],
    axle_config: &[AxleConfiguration],
    axle_index: usize,
) -> Option<AxleUnitWeight> {
    let vehicles: Vec<&str> = sequence
        .iter()
        .map(|s| s.as_ref())
        .filter(|id| {
            !policy
                .vehicle_types
                .find(id)
                .is_some_and(|v| v.ignore_for_axle_calculation)
        })
        .collect();
    let vehicle_index = axle_index.saturating_sub(1);
    if vehicle_index >= vehicles.len() {
        return None;
    }
    let unit = AxleUnit {
        relatives: Relatives::around(&vehicles, vehicle_index),
        axle_config,
        axle_index,
    };

    let applicable = || {
        candidates
            .iter()
            .filter_map(|c| c.axle_unit_weight(axle_index).map(|w| (c.modifier(), w)))
    };
    applicable()
        .find(|(m, _)| m.is_some_and(|m| unit.matches(policy, m)))
        .or_else(|| applicable().find(|(m, _)| m.is_none()))
        .map(|(_, w)| w)
}

/// The axle unit being resolved and its surroundings.
struct AxleUnit<'a> {
    relatives: Relatives<'a>,
    axle_config: &'a [AxleConfiguration],
    axle_index: usize,
}

impl AxleUnit<'_> {
    fn matches(&self, policy: &PolicyDefinition, modifier: &DimensionModifier) -> bool {
        if !self.relatives.matches(policy, modifier) {
            return false;
        }
        let (neighbour, spacing) = match modifier.position {
            ModifierPosition::First | ModifierPosition::Last => return true,
            ModifierPosition::Before => {
                let Some(prev) = self.axle_index.checked_sub(1) else {
                    return !modifier.has_axle_constraints();
                };
                let unit = self.axle_config.get(prev);
                (unit, unit.and_then(|u| u.spacing_to_next))
            }
            ModifierPosition::After => (
                self.axle_config.get(self.axle_index + 1),
                self.axle_config
                    .get(self.axle_index)
                    .and_then(|u| u.spacing_to_next),
            ),
        };

        if let Some(axles) = modifier.axles {
            if neighbour.map(|n| n.number_of_axles) != Some(axles) {
                return false;
            }
        }
        if modifier.min_inter_axle_spacing.is_some() || modifier.max_inter_axle_spacing.is_some() {
            let Some(spacing) = spacing else {
                return false;
            };
            if modifier.min_inter_axle_spacing.is_some_and(|min| spacing < min)
                || modifier.max_inter_axle_spacing.is_some_and(|max| spacing > max)
            {
                return false;
            }
        }
        true
    }
}
