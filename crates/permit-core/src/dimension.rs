//! # Size and Weight Dimensions
//!
//! Dimension records of the policy document. Each record may be guarded by a
//! [`DimensionModifier`], a relative-position predicate that selects among
//! several candidate values for the same vehicle.
//!
//! ## Ordering Invariant
//!
//! Candidate lists are ordered. Resolution takes the **first** candidate
//! whose modifier is satisfied, falling back to the first unmodified
//! candidate. Priority is never re-derived from how specific a modifier is;
//! authors control precedence through list order.
//!
//! ## Weight Variants
//!
//! Power units carry steer-axle and drive-axle values in one record, while
//! towed units carry a single legal/permittable pair. [`WeightDimension`] is
//! a sum type over the two shapes so that axle-unit field selection is an
//! exhaustive `match` rather than a probe of optional fields.

use serde::{Deserialize, Serialize};

use crate::vehicle::VehicleCategoryKind;

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Where the related vehicle sits relative to the vehicle being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierPosition {
    /// The first vehicle of the combination (the power unit).
    First,
    /// The last vehicle of the combination.
    Last,
    /// The vehicle immediately before the one being resolved.
    Before,
    /// The vehicle immediately after the one being resolved.
    After,
}

/// Relative-position predicate guarding a dimension record.
///
/// The related vehicle matches when its type id equals `type` and/or its
/// category equals `category` (both must hold when both are given). Axle
/// and spacing bounds apply only to weight resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionModifier {
    /// Position of the related vehicle.
    pub position: ModifierPosition,
    /// Vehicle type id the related vehicle must have.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Category the related vehicle must belong to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<VehicleCategoryKind>,
    /// Number of axles the neighbouring axle unit must have.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axles: Option<u32>,
    /// Minimum inter-axle spacing to the neighbouring axle unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_inter_axle_spacing: Option<f64>,
    /// Maximum inter-axle spacing to the neighbouring axle unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_inter_axle_spacing: Option<f64>,
}

impl DimensionModifier {
    /// Whether the modifier names the given vehicle type / category.
    ///
    /// A modifier naming neither a type nor a category never matches.
    pub fn matches_vehicle(&self, vehicle_type: &str, category: VehicleCategoryKind) -> bool {
        if self.vehicle_type.is_none() && self.category.is_none() {
            return false;
        }
        let type_ok = self
            .vehicle_type
            .as_deref()
            .map_or(true, |t| t == vehicle_type);
        let category_ok = self.category.map_or(true, |c| c == category);
        type_ok && category_ok
    }

    /// Whether the modifier constrains the neighbouring axle unit.
    pub fn has_axle_constraints(&self) -> bool {
        self.axles.is_some()
            || self.min_inter_axle_spacing.is_some()
            || self.max_inter_axle_spacing.is_some()
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// Region-specific override of a size dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSizeOverride {
    /// Geographic region id.
    pub region: String,
    /// Front projection override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fp: Option<f64>,
    /// Rear projection override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp: Option<f64>,
    /// Width override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    /// Height override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// Length override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,
}

/// Maximum size permitted for a vehicle configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeDimension {
    /// Optional guard selecting this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<DimensionModifier>,
    /// Front projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fp: Option<f64>,
    /// Rear projection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp: Option<f64>,
    /// Width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub w: Option<f64>,
    /// Height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    /// Length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,
    /// Per-region overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regions: Vec<RegionSizeOverride>,
}

impl SizeDimension {
    /// The override declared for `region`, if any.
    pub fn region_override(&self, region: &str) -> Option<&RegionSizeOverride> {
        self.regions.iter().find(|r| r.region == region)
    }
}

// ---------------------------------------------------------------------------
// Weight
// ---------------------------------------------------------------------------

/// Default weights of a power unit, keyed by steer and drive axle counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerUnitWeightDimension {
    /// Number of axles in the steer axle unit.
    pub steer_axles: u32,
    /// Number of axles in the drive axle unit.
    pub drive_axles: u32,
    /// Legal steer axle weight.
    pub sa_legal: f64,
    /// Permittable steer axle weight.
    pub sa_permittable: f64,
    /// Legal drive axle weight.
    pub da_legal: f64,
    /// Permittable drive axle weight.
    pub da_permittable: f64,
    /// Optional guard selecting this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<DimensionModifier>,
}

/// Default weights of a towed unit, keyed by axle count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerWeightDimension {
    /// Number of axles in the axle unit.
    pub axles: u32,
    /// Legal weight.
    pub legal: f64,
    /// Permittable weight.
    pub permittable: f64,
    /// Optional guard selecting this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<DimensionModifier>,
}

/// A weight dimension record, either power-unit or trailer shaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightDimension {
    /// Steer/drive weights of a power unit.
    PowerUnit(PowerUnitWeightDimension),
    /// Legal/permittable weights of a towed unit.
    Trailer(TrailerWeightDimension),
}

impl WeightDimension {
    /// The guard of this record, if any.
    pub fn modifier(&self) -> Option<&DimensionModifier> {
        match self {
            Self::PowerUnit(d) => d.modifier.as_ref(),
            Self::Trailer(d) => d.modifier.as_ref(),
        }
    }

    /// Resolve the legal/permittable pair for the axle unit at `axle_index`.
    ///
    /// Power-unit records yield steer values for axle unit 0 and drive
    /// values for axle unit 1; they do not apply to any later axle unit.
    /// Trailer records apply to any axle unit.
    pub fn axle_unit_weight(&self, axle_index: usize) -> Option<AxleUnitWeight> {
        match self {
            Self::PowerUnit(d) => match axle_index {
                0 => Some(AxleUnitWeight {
                    legal: d.sa_legal,
                    permittable: d.sa_permittable,
                }),
                1 => Some(AxleUnitWeight {
                    legal: d.da_legal,
                    permittable: d.da_permittable,
                }),
                _ => None,
            },
            Self::Trailer(d) => Some(AxleUnitWeight {
                legal: d.legal,
                permittable: d.permittable,
            }),
        }
    }
}

/// Resolved legal and permittable weight of a single axle unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxleUnitWeight {
    /// Legal weight.
    pub legal: f64,
    /// Permittable weight.
    pub permittable: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modifier(vehicle_type: Option<&str>, category: Option<VehicleCategoryKind>) -> DimensionModifier {
        DimensionModifier {
            position: ModifierPosition::Before,
            vehicle_type: vehicle_type.map(str::to_string),
            category,
            axles: None,
            min_inter_axle_spacing: None,
            max_inter_axle_spacing: None,
        }
    }

    #[test]
    fn modifier_matches_by_type_or_category() {
        let by_type = modifier(Some("JEEPSRT"), None);
        assert!(by_type.matches_vehicle("JEEPSRT", VehicleCategoryKind::Accessory));
        assert!(!by_type.matches_vehicle("BOOSTER", VehicleCategoryKind::Accessory));

        let by_category = modifier(None, Some(VehicleCategoryKind::Accessory));
        assert!(by_category.matches_vehicle("BOOSTER", VehicleCategoryKind::Accessory));
        assert!(!by_category.matches_vehicle("SEMITRL", VehicleCategoryKind::Trailer));
    }

    #[test]
    fn modifier_with_both_requires_both() {
        let both = modifier(Some("JEEPSRT"), Some(VehicleCategoryKind::Trailer));
        assert!(!both.matches_vehicle("JEEPSRT", VehicleCategoryKind::Accessory));
    }

    #[test]
    fn empty_modifier_never_matches() {
        assert!(!modifier(None, None).matches_vehicle("X", VehicleCategoryKind::Trailer));
    }

    #[test]
    fn weight_dimension_deserializes_by_shape() {
        let pu: WeightDimension = serde_json::from_str(
            r#"{"steerAxles":1,"driveAxles":2,"saLegal":6000,"saPermittable":9100,"daLegal":17000,"daPermittable":23000}"#,
        )
        .unwrap();
        assert!(matches!(pu, WeightDimension::PowerUnit(_)));

        let tr: WeightDimension =
            serde_json::from_str(r#"{"axles":3,"legal":24000,"permittable":28000}"#).unwrap();
        assert!(matches!(tr, WeightDimension::Trailer(_)));
    }

    #[test]
    fn power_unit_fields_selected_by_axle_index() {
        let pu = WeightDimension::PowerUnit(PowerUnitWeightDimension {
            steer_axles: 1,
            drive_axles: 2,
            sa_legal: 6000.0,
            sa_permittable: 9100.0,
            da_legal: 17000.0,
            da_permittable: 23000.0,
            modifier: None,
        });
        assert_eq!(pu.axle_unit_weight(0).unwrap().legal, 6000.0);
        assert_eq!(pu.axle_unit_weight(1).unwrap().permittable, 23000.0);
        assert!(pu.axle_unit_weight(2).is_none());
    }
}
