//! # Permittable Vehicle Catalog
//!
//! Which power units and trailers a permit type admits, either through a
//! commodity's size/weight tables or through the permit type's fixed
//! allow-list.
//!
//! ## List Rule
//!
//! A commodity declares two tables, `size` and `weight`. Which of them a
//! vehicle must appear in depends on the permit type:
//!
//! | `sizeDimensionRequired` | `weightDimensionRequired` | Permittable when in |
//! |---|---|---|
//! | yes | yes | both tables |
//! | yes | no | size table |
//! | no | yes | weight table |
//! | no | no | either table |
//!
//! Candidate order follows the size table, then any weight-only entries.
//! Jeep/booster flags are taken from the size entry when both exist.

use std::collections::{BTreeMap, HashSet};

use permit_core::policy::{Commodity, CommodityVehicles, PermitType};
use permit_core::{PolicyDefinition, PolicyError, PolicyResult, VehicleCategoryKind};

// ─── List Rule ───────────────────────────────────────────────────────

/// Which commodity tables a vehicle must appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRule {
    /// Size and weight tables.
    Both,
    /// Size table only.
    SizeOnly,
    /// Weight table only.
    WeightOnly,
    /// Either table.
    Either,
}

impl ListRule {
    /// The rule applying to `permit_type`.
    pub fn for_permit_type(permit_type: &PermitType) -> Self {
        match (
            permit_type.size_dimension_required,
            permit_type.weight_dimension_required,
        ) {
            (true, true) => Self::Both,
            (true, false) => Self::SizeOnly,
            (false, true) => Self::WeightOnly,
            (false, false) => Self::Either,
        }
    }

    /// Combine candidates drawn from the size and weight tables.
    fn combine<T>(self, size: Vec<T>, weight: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
        match self {
            Self::SizeOnly => size,
            Self::WeightOnly => weight,
            Self::Both => {
                let in_weight: HashSet<&str> = weight.iter().map(&key).collect();
                let keep: Vec<bool> = size.iter().map(|s| in_weight.contains(key(s))).collect();
                size.into_iter()
                    .zip(keep)
                    .filter_map(|(s, k)| k.then_some(s))
                    .collect()
            }
            Self::Either => {
                let in_size: HashSet<String> = size.iter().map(|s| key(s).to_string()).collect();
                let mut out = size;
                out.extend(weight.into_iter().filter(|w| !in_size.contains(key(w))));
                out
            }
        }
    }
}

// ─── Candidates ──────────────────────────────────────────────────────

/// A trailer that may follow a power unit, with its accessory flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailerCandidate {
    /// Trailer type id.
    pub id: String,
    /// Jeeps may precede this trailer.
    pub jeep: bool,
    /// Boosters may follow this trailer.
    pub booster: bool,
}

fn power_unit_ids(vehicles: &CommodityVehicles) -> Vec<String> {
    vehicles
        .power_units
        .iter()
        .map(|p| p.power_unit_type.clone())
        .collect()
}

fn trailer_entries(vehicles: &CommodityVehicles, power_unit: &str) -> Vec<TrailerCandidate> {
    vehicles
        .power_unit(power_unit)
        .map(|p| {
            p.trailers
                .iter()
                .map(|t| TrailerCandidate {
                    id: t.trailer_type.clone(),
                    jeep: t.jeep,
                    booster: t.booster,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Power units permittable for a commodity under `permit_type`.
pub fn power_unit_candidates(permit_type: &PermitType, commodity: &Commodity) -> Vec<String> {
    ListRule::for_permit_type(permit_type).combine(
        power_unit_ids(&commodity.size),
        power_unit_ids(&commodity.weight),
        |id| id.as_str(),
    )
}

/// Trailers permittable behind `power_unit` for a commodity under
/// `permit_type`.
pub fn trailer_candidates(
    permit_type: &PermitType,
    commodity: &Commodity,
    power_unit: &str,
) -> Vec<TrailerCandidate> {
    ListRule::for_permit_type(permit_type).combine(
        trailer_entries(&commodity.size, power_unit),
        trailer_entries(&commodity.weight, power_unit),
        |t| t.id.as_str(),
    )
}

/// Power units on a permit type's vehicle allow-list, in list order.
pub fn allow_list_power_units(policy: &PolicyDefinition, permit_type: &PermitType) -> Vec<String> {
    permit_type
        .allowed_vehicles
        .iter()
        .filter(|id| {
            policy
                .vehicle_types
                .find(id)
                .is_some_and(|v| v.category == VehicleCategoryKind::PowerUnit)
        })
        .cloned()
        .collect()
}

/// Trailers on a permit type's vehicle allow-list, in list order.
/// Additional-axle pseudo types are not trailers. Jeeps and boosters are
/// admitted when the list names them.
pub fn allow_list_trailers(
    policy: &PolicyDefinition,
    permit_type: &PermitType,
) -> Vec<TrailerCandidate> {
    let axle_types: HashSet<&str> = policy
        .vehicle_types
        .power_unit_types
        .iter()
        .filter_map(|p| p.additional_axle_sub_type.as_deref())
        .collect();
    let jeep = permit_type.allows_vehicle(permit_core::JEEP);
    let booster = permit_type.allows_vehicle(permit_core::BOOSTER);
    permit_type
        .allowed_vehicles
        .iter()
        .filter(|id| !axle_types.contains(id.as_str()))
        .filter(|id| {
            policy.vehicle_types.find(id).is_some_and(|v| {
                matches!(v.category, VehicleCategoryKind::Trailer | VehicleCategoryKind::Pseudo)
            })
        })
        .map(|id| TrailerCandidate {
            id: id.clone(),
            jeep,
            booster,
        })
        .collect()
}

// ─── Catalog Queries ─────────────────────────────────────────────────

/// Permittable vehicle types, keyed by id with their names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermittableVehicles {
    /// Power units.
    pub power_units: BTreeMap<String, String>,
    /// Trailers, jeeps, boosters and pseudo types.
    pub trailers: BTreeMap<String, String>,
}

/// Every permit type, keyed by id with its name.
pub fn permit_types(policy: &PolicyDefinition) -> BTreeMap<String, String> {
    policy
        .permit_types
        .iter()
        .map(|p| (p.id.clone(), p.name.clone()))
        .collect()
}

/// Commodities keyed by id with their names.
///
/// Without a permit type every commodity is returned. A permit type that
/// does not use commodity selection offers none; otherwise its
/// `allowedCommodities` list applies (empty offers all).
pub fn commodities(
    policy: &PolicyDefinition,
    permit_type_id: Option<&str>,
) -> PolicyResult<BTreeMap<String, String>> {
    let permit_type = permit_type_id.map(|id| policy.permit_type(id)).transpose()?;
    Ok(policy
        .commodities
        .iter()
        .filter(|c| permit_type.map_or(true, |pt| pt.offers_commodity(&c.id)))
        .map(|c| (c.id.clone(), c.name.clone()))
        .collect())
}

/// Vehicle types permittable under a permit type.
///
/// Permit types with a fixed allow-list return it, split by taxonomy, and
/// ignore `commodity_id`. Commodity-driven permit types return the vehicles
/// of the given commodity, or of every offered commodity when none is
/// given; jeeps and boosters are included when some permittable trailer
/// allows them. LCV power units are omitted unless `lcv_allowed`.
pub fn permittable_vehicle_types(
    policy: &PolicyDefinition,
    permit_type_id: &str,
    commodity_id: Option<&str>,
    lcv_allowed: bool,
) -> PolicyResult<PermittableVehicles> {
    let permit_type = policy.permit_type(permit_type_id)?;
    let ids: Vec<String> = if permit_type.commodity_required {
        let selected: Vec<&Commodity> = match commodity_id {
            Some(id) => vec![policy.commodity(id)?],
            None => policy
                .commodities
                .iter()
                .filter(|c| permit_type.offers_commodity(&c.id))
                .collect(),
        };
        commodity_vehicle_ids(permit_type, &selected)
    } else {
        permit_type.allowed_vehicles.clone()
    };

    let mut out = PermittableVehicles::default();
    let mut additional_axles = Vec::new();
    for id in ids {
        let vehicle = policy.vehicle_type(&id)?;
        if vehicle.is_lcv && !lcv_allowed {
            continue;
        }
        let bucket = if vehicle.category == VehicleCategoryKind::PowerUnit {
            &mut out.power_units
        } else {
            &mut out.trailers
        };
        bucket.insert(vehicle.id.clone(), vehicle.name.clone());
        additional_axles.extend(vehicle.additional_axle_sub_type.iter().cloned());
    }
    for id in additional_axles {
        let pseudo = policy.vehicle_type(&id)?;
        out.trailers.insert(pseudo.id.clone(), pseudo.name.clone());
    }
    Ok(out)
}

fn commodity_vehicle_ids(permit_type: &PermitType, commodities: &[&Commodity]) -> Vec<String> {
    let mut ids = Vec::new();
    for commodity in commodities {
        for power_unit in power_unit_candidates(permit_type, commodity) {
            let trailers = trailer_candidates(permit_type, commodity, &power_unit);
            if trailers.iter().any(|t| t.jeep) {
                ids.push(permit_core::JEEP.to_string());
            }
            if trailers.iter().any(|t| t.booster) {
                ids.push(permit_core::BOOSTER.to_string());
            }
            ids.extend(trailers.into_iter().map(|t| t.id));
            ids.push(power_unit);
        }
    }
    ids
}

/// Resolve the permit type and commodity of a commodity-driven query.
///
/// Fails when either id is unknown, or when the permit type does not use
/// commodity selection.
pub fn resolve_commodity_permit<'a>(
    policy: &'a PolicyDefinition,
    permit_type_id: &str,
    commodity_id: &str,
) -> PolicyResult<(&'a PermitType, &'a Commodity)> {
    let permit_type = policy.permit_type(permit_type_id)?;
    if !permit_type.commodity_required {
        return Err(PolicyError::CommodityNotRequired(permit_type_id.to_string()));
    }
    let commodity = policy.commodity(commodity_id)?;
    Ok((permit_type, commodity))
}
