//! # Policy Configuration Document
//!
//! Typed representation of the policy document: permit types, vehicle
//! taxonomy, commodities with their size/weight tables, range matrices,
//! bridge constants and display-code settings.
//!
//! ## Design
//!
//! The document is pure data and is never mutated once an engine has been
//! built from it. Cross references (permit type ids, commodity ids, vehicle
//! type ids) are not checked at load time; they surface lazily as
//! [`PolicyError`] values from the lookup helpers below, the first time a
//! query touches them.
//!
//! Sections omitted from the document fall back to `Default`, so a minimal
//! document containing only `minPEVersion` and a handful of permit types is
//! accepted.

use serde::{Deserialize, Serialize};

use crate::dimension::{SizeDimension, WeightDimension};
use crate::error::{PolicyError, PolicyResult};
use crate::rule::{ConditionRequirement, CostRule, Rule};
use crate::vehicle::{VehicleCategory, VehicleCategoryKind, VehicleType, VehicleTypes};

// ---------------------------------------------------------------------------
// Document root
// ---------------------------------------------------------------------------

/// The whole policy configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDefinition {
    /// Document version (informational).
    #[serde(default)]
    pub version: String,
    /// Minimum engine version able to evaluate this document.
    #[serde(rename = "minPEVersion", default, skip_serializing_if = "Option::is_none")]
    pub min_pe_version: Option<String>,
    /// Regions a vehicle may travel through.
    #[serde(default)]
    pub geographic_regions: Vec<GeographicRegion>,
    /// Permit products.
    #[serde(default)]
    pub permit_types: Vec<PermitType>,
    /// Rules applied to every permit type, ahead of its own rules.
    #[serde(default)]
    pub common_rules: Vec<Rule>,
    /// Power unit and trailer taxonomies.
    #[serde(default)]
    pub vehicle_types: VehicleTypes,
    /// Category-level defaults.
    #[serde(default)]
    pub vehicle_categories: Vec<VehicleCategory>,
    /// Commodities with their permittable vehicles and size tables.
    #[serde(default)]
    pub commodities: Vec<Commodity>,
    /// Last tier of the default weight lookup.
    #[serde(default)]
    pub global_weight_defaults: GlobalWeightDefaults,
    /// Size limits applying when no commodity-specific limit is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_size_defaults: Option<SizeDimension>,
    /// Lookup tables for `rangeMatrixLookup` cost rules.
    #[serde(default)]
    pub range_matrices: Vec<RangeMatrix>,
    /// Bridge formula constants.
    #[serde(default)]
    pub bridge_calculation_constants: BridgeCalculationConstants,
    /// Display-code glyphs and thresholds.
    #[serde(default)]
    pub vehicle_display_code_defaults: DisplayCodeDefaults,
}

impl PolicyDefinition {
    /// Parse a policy document from JSON text.
    pub fn from_json_str(json: &str) -> PolicyResult<Self> {
        serde_json::from_str(json).map_err(|e| PolicyError::Deserialization(e.to_string()))
    }

    /// Parse a policy document from an already-decoded JSON value.
    pub fn from_json_value(value: serde_json::Value) -> PolicyResult<Self> {
        serde_json::from_value(value).map_err(|e| PolicyError::Deserialization(e.to_string()))
    }

    /// Look up a permit type by id.
    pub fn permit_type(&self, id: &str) -> PolicyResult<&PermitType> {
        self.permit_types
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| PolicyError::UnknownPermitType(id.to_string()))
    }

    /// Look up a commodity by id.
    pub fn commodity(&self, id: &str) -> PolicyResult<&Commodity> {
        self.commodities
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| PolicyError::UnknownCommodity(id.to_string()))
    }

    /// Look up a vehicle type (power unit or trailer) by id.
    pub fn vehicle_type(&self, id: &str) -> PolicyResult<&VehicleType> {
        self.vehicle_types
            .find(id)
            .ok_or_else(|| PolicyError::UnknownVehicleType(id.to_string()))
    }

    /// Look up category-level defaults.
    pub fn vehicle_category(&self, kind: VehicleCategoryKind) -> Option<&VehicleCategory> {
        self.vehicle_categories.iter().find(|c| c.id == kind)
    }

    /// Look up a range matrix by id.
    pub fn range_matrix(&self, id: &str) -> Option<&RangeMatrix> {
        self.range_matrices.iter().find(|m| m.id == id)
    }

    /// Ids of every configured geographic region, in document order.
    pub fn region_ids(&self) -> impl Iterator<Item = &str> {
        self.geographic_regions.iter().map(|r| r.id.as_str())
    }
}

/// A geographic region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicRegion {
    /// Region id, e.g. `LMN`.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
}

// ---------------------------------------------------------------------------
// Permit types
// ---------------------------------------------------------------------------

/// A permit product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitType {
    /// Permit type id, e.g. `TROS`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// A route must be supplied.
    #[serde(default)]
    pub routing_required: bool,
    /// Vehicles must be weight-permittable for the commodity.
    #[serde(default)]
    pub weight_dimension_required: bool,
    /// Vehicles must be size-permittable for the commodity.
    #[serde(default)]
    pub size_dimension_required: bool,
    /// The applicant selects a commodity, which drives vehicle selection.
    #[serde(default)]
    pub commodity_required: bool,
    /// Vehicle ids allowed when commodity selection is not required.
    #[serde(default)]
    pub allowed_vehicles: Vec<String>,
    /// Commodity ids offered for this permit type. Empty offers all.
    #[serde(default)]
    pub allowed_commodities: Vec<String>,
    /// Rules specific to this permit type.
    #[serde(default)]
    pub rules: Vec<Rule>,
    /// Fee computations.
    #[serde(default)]
    pub cost_rules: Vec<CostRule>,
    /// Permit conditions attached to issued permits.
    #[serde(default)]
    pub conditions: Vec<ConditionRequirement>,
}

impl PermitType {
    /// Whether `vehicle_id` is on the fixed allow-list.
    pub fn allows_vehicle(&self, vehicle_id: &str) -> bool {
        self.allowed_vehicles.iter().any(|v| v == vehicle_id)
    }

    /// Whether `commodity_id` is offered for this permit type.
    pub fn offers_commodity(&self, commodity_id: &str) -> bool {
        self.commodity_required
            && (self.allowed_commodities.is_empty()
                || self.allowed_commodities.iter().any(|c| c == commodity_id))
    }
}

// ---------------------------------------------------------------------------
// Commodities
// ---------------------------------------------------------------------------

/// A commodity and the vehicles permittable to carry it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commodity {
    /// Commodity id, e.g. `EMPTYXX`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Size-permittable vehicle combinations.
    #[serde(default)]
    pub size: CommodityVehicles,
    /// Weight-permittable vehicle combinations.
    #[serde(default)]
    pub weight: CommodityVehicles,
}

/// Power units permittable for a commodity and, per power unit, the
/// trailers that may follow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityVehicles {
    /// Permittable power units.
    #[serde(default)]
    pub power_units: Vec<CommodityPowerUnit>,
}

impl CommodityVehicles {
    /// The entry for `power_unit`, if permittable.
    pub fn power_unit(&self, power_unit: &str) -> Option<&CommodityPowerUnit> {
        self.power_units.iter().find(|p| p.power_unit_type == power_unit)
    }

    /// The entry for `trailer` behind `power_unit`, if permittable.
    pub fn trailer(&self, power_unit: &str, trailer: &str) -> Option<&CommodityTrailer> {
        self.power_unit(power_unit)?
            .trailers
            .iter()
            .find(|t| t.trailer_type == trailer)
    }
}

/// A power unit permittable for a commodity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityPowerUnit {
    /// Power unit type id.
    #[serde(rename = "type")]
    pub power_unit_type: String,
    /// Trailers permittable behind this power unit.
    #[serde(default)]
    pub trailers: Vec<CommodityTrailer>,
}

/// A trailer permittable behind a given power unit for a commodity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityTrailer {
    /// Trailer type id.
    #[serde(rename = "type")]
    pub trailer_type: String,
    /// Jeeps may precede this trailer.
    #[serde(default)]
    pub jeep: bool,
    /// Boosters may follow this trailer.
    #[serde(default)]
    pub booster: bool,
    /// The applicant may self-issue with this trailer.
    #[serde(default)]
    pub self_issue: bool,
    /// Ordered size candidates (first match wins).
    #[serde(default)]
    pub size_dimensions: Vec<SizeDimension>,
}

// ---------------------------------------------------------------------------
// Defaults, tables and constants
// ---------------------------------------------------------------------------

/// Global default weight dimensions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalWeightDefaults {
    /// Power unit defaults.
    #[serde(default)]
    pub power_unit: Vec<WeightDimension>,
    /// Trailer defaults.
    #[serde(default)]
    pub trailer: Vec<WeightDimension>,
}

/// A table mapping numeric ranges to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMatrix {
    /// Matrix id referenced by cost rules.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Ordered ranges.
    #[serde(default)]
    pub matrix: Vec<RangeMatrixEntry>,
}

impl RangeMatrix {
    /// Value of the first entry whose inclusive range contains `x`.
    pub fn lookup(&self, x: f64) -> Option<f64> {
        self.matrix.iter().find(|e| e.contains(x)).map(|e| e.value)
    }
}

/// One range of a [`RangeMatrix`]. Open-ended when a bound is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeMatrixEntry {
    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Value for this range.
    pub value: f64,
}

impl RangeMatrixEntry {
    /// Whether `x` lies within this range.
    pub fn contains(&self, x: f64) -> bool {
        self.min.map_or(true, |min| x >= min) && self.max.map_or(true, |max| x <= max)
    }
}

/// Constants of the bridge formula
/// `maxBridge = multiplier * wheelbase + minWeight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeCalculationConstants {
    /// Weight allowed per unit of wheelbase.
    pub multiplier: f64,
    /// Weight allowed at zero wheelbase.
    pub min_weight: f64,
}

impl Default for BridgeCalculationConstants {
    fn default() -> Self {
        Self {
            multiplier: 30.0,
            min_weight: 18000.0,
        }
    }
}

/// Glyphs and thresholds of the vehicle display code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayCodeDefaults {
    /// Largest axle count per unit the standard encoding accepts.
    pub max_standard_axles: u32,
    /// Glyph repeated once per axle above the first in a unit.
    pub padding: String,
    /// Prefix for axle-unit indices of 9 and above.
    pub index_prefix: String,
    /// Axle count at which the universal encoding switches to the
    /// compound form.
    pub universal_threshold: u32,
    /// Compound-form marker following the threshold count.
    pub over_axles: String,
    /// Compound-form glyph for each axle beyond the threshold, less one.
    pub extra_axle: String,
    /// Compound-form terminator.
    pub end: String,
    /// Spacing glyph for spacings below `small_spacing_max`.
    pub small_spacing: String,
    /// Spacing glyph for spacings above `large_spacing_min`.
    pub large_spacing: String,
    /// Spacing glyph otherwise, and when the spacing is unknown.
    pub default_spacing: String,
    /// Upper bound (exclusive) of a small spacing.
    pub small_spacing_max: f64,
    /// Lower bound (exclusive) of a large spacing.
    pub large_spacing_min: f64,
}

impl Default for DisplayCodeDefaults {
    fn default() -> Self {
        Self {
            max_standard_axles: 4,
            padding: "_".into(),
            index_prefix: "#".into(),
            universal_threshold: 5,
            over_axles: "+".into(),
            extra_axle: "*".into(),
            end: "]".into(),
            small_spacing: ".".into(),
            large_spacing: ":".into(),
            default_spacing: "-".into(),
            small_spacing_max: 300.0,
            large_spacing_min: 1000.0,
        }
    }
}
