//! # Size Dimension Resolution
//!
//! Selects the size limits applying to a complete vehicle combination.
//!
//! ## Algorithm
//!
//! 1. The combination must be valid and complete for the permit type and
//!    commodity; otherwise the query is a caller error.
//! 2. The *sizing trailer* is the last vehicle after the power unit that is
//!    not ignored for size dimensions (jeeps and boosters are skipped).
//! 3. Its candidates come from the commodity's size table, under the power
//!    unit. The first candidate whose modifier matches its relatives wins;
//!    otherwise the first unmodified candidate; otherwise there is no
//!    configured limit.
//! 4. The chosen candidate is narrowed across the regions travelled.
//!
//! ## Most Restrictive Region
//!
//! Each axis is narrowed independently: the result takes, per axis, the
//! minimum over the travelled regions of that region's override, or the
//! base value when the region does not override the axis. This is the
//! meet of the regional limits, so different axes may take their minimum
//! from different regions.

use permit_core::{
    PolicyDefinition, PolicyError, PolicyResult, SizeDimension, VehicleCategoryKind,
};
use permit_core::dimension::{DimensionModifier, ModifierPosition, RegionSizeOverride};
use permit_state::ConfigurationValidator;

/// Resolve the size limits of a combination.
///
/// `regions` lists the regions travelled; `None` or an empty list means
/// every configured region. Returns `Ok(None)` when no candidate applies.
///
/// # Errors
///
/// Unknown permit type, commodity or vehicle type; a permit type without
/// commodity selection; or a sequence that is not a valid complete
/// combination ([`PolicyError::InvalidConfiguration`]).
pub fn size_dimension<S: AsRef<str>>(
    policy: &PolicyDefinition,
    permit_type_id: &str,
    commodity_id: &str,
    sequence: &[S],
    regions: Option<&[&str]>,
    lcv_allowed: bool,
) -> PolicyResult<Option<SizeDimension>> {
    let validator = ConfigurationValidator::new(policy, permit_type_id, commodity_id, lcv_allowed)?;
    if !validator.is_valid(sequence, false) {
        return Err(PolicyError::InvalidConfiguration(describe(sequence)));
    }
    let ids: Vec<&str> = sequence.iter().map(|s| s.as_ref()).collect();

    let mut sizing_index = None;
    for (i, id) in ids.iter().enumerate().skip(1) {
        if !policy.vehicle_type(id)?.ignore_for_size_dimensions {
            sizing_index = Some(i);
        }
    }
    let Some(trailer_index) = sizing_index else {
        return Ok(None);
    };

    let commodity = policy.commodity(commodity_id)?;
    let Some(entry) = commodity.size.trailer(ids[0], ids[trailer_index]) else {
        return Ok(None);
    };

    let relatives = Relatives::around(&ids, trailer_index);
    let chosen = entry
        .size_dimensions
        .iter()
        .find(|d| {
            d.modifier
                .as_ref()
                .is_some_and(|m| relatives.matches(policy, m))
        })
        .or_else(|| entry.size_dimensions.iter().find(|d| d.modifier.is_none()));

    let Some(chosen) = chosen else {
        tracing::debug!(
            trailer = ids[trailer_index],
            commodity = commodity_id,
            "no size dimension candidate applies"
        );
        return Ok(None);
    };

    let travelled: Vec<&str> = match regions {
        Some(r) if !r.is_empty() => r.to_vec(),
        _ => policy.region_ids().collect(),
    };
    Ok(Some(most_restrictive(chosen, &travelled)))
}

/// Narrow `dimension` across `regions`, taking the per-axis minimum of
/// override-or-base values. With no regions the base values are returned.
/// The result carries no region overrides.
pub fn most_restrictive(dimension: &SizeDimension, regions: &[&str]) -> SizeDimension {
    let overrides: Vec<Option<&RegionSizeOverride>> = regions
        .iter()
        .map(|r| dimension.region_override(r))
        .collect();

    let axis = |base: Option<f64>, pick: fn(&RegionSizeOverride) -> Option<f64>| -> Option<f64> {
        if overrides.is_empty() {
            return base;
        }
        overrides
            .iter()
            .filter_map(|o| o.and_then(pick).or(base))
            .reduce(f64::min)
    };

    SizeDimension {
        modifier: dimension.modifier.clone(),
        fp: axis(dimension.fp, |o| o.fp),
        rp: axis(dimension.rp, |o| o.rp),
        w: axis(dimension.w, |o| o.w),
        h: axis(dimension.h, |o| o.h),
        l: axis(dimension.l, |o| o.l),
        regions: Vec::new(),
    }
}

/// The vehicles surrounding the one being resolved.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Relatives<'s> {
    pub first: Option<&'s str>,
    pub last: Option<&'s str>,
    pub before: Option<&'s str>,
    pub after: Option<&'s str>,
}

impl<'s> Relatives<'s> {
    /// Relatives of `ids[index]`.
    pub(crate) fn around(ids: &[&'s str], index: usize) -> Self {
        Self {
            first: ids.first().copied(),
            last: ids.last().copied(),
            before: index.checked_sub(1).and_then(|i| ids.get(i)).copied(),
            after: ids.get(index + 1).copied(),
        }
    }

    /// The relative at `position`.
    pub(crate) fn at(&self, position: ModifierPosition) -> Option<&'s str> {
        match position {
            ModifierPosition::First => self.first,
            ModifierPosition::Last => self.last,
            ModifierPosition::Before => self.before,
            ModifierPosition::After => self.after,
        }
    }

    /// Whether the relative named by the modifier has its type / category.
    pub(crate) fn matches(&self, policy: &PolicyDefinition, modifier: &DimensionModifier) -> bool {
        self.at(modifier.position)
            .and_then(|id| category_of(policy, id).map(|c| (id, c)))
            .is_some_and(|(id, category)| modifier.matches_vehicle(id, category))
    }
}

fn category_of(policy: &PolicyDefinition, id: &str) -> Option<VehicleCategoryKind> {
    policy.vehicle_types.find(id).map(|v| v.category)
}

fn describe<S: AsRef<str>>(sequence: &[S]) -> String {
    let ids: Vec<&str> = sequence.iter().map(|s| s.as_ref()).collect();
    format!("[{}]", ids.join(", "))
}
