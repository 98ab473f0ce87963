//! # Vehicle Taxonomy
//!
//! Vehicle types and categories as declared in the policy document. A
//! vehicle combination is a sequence of vehicle type ids: one power unit,
//! an optional run of jeeps, one trailer (possibly the "none" pseudo
//! trailer), and an optional run of boosters.
//!
//! Jeeps and boosters are identified by fixed ids ([`JEEP`], [`BOOSTER`])
//! rather than by category, since the `accessory` category also covers
//! units that are never sequenced.

use serde::{Deserialize, Serialize};

use crate::dimension::WeightDimension;

/// Vehicle type id of the jeep accessory (precedes the trailer).
pub const JEEP: &str = "JEEPSRT";

/// Vehicle type id of the booster accessory (follows the trailer).
pub const BOOSTER: &str = "BOOSTER";

/// The category a vehicle type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleCategoryKind {
    /// Lead powered vehicle (truck, tractor).
    #[serde(rename = "powerunit")]
    PowerUnit,
    /// Towed unit.
    #[serde(rename = "trailer")]
    Trailer,
    /// Jeeps, boosters and similar frame units.
    #[serde(rename = "accessory")]
    Accessory,
    /// Placeholder types (the "none" trailer, additional axle groups).
    #[serde(rename = "pseudo")]
    Pseudo,
}

impl VehicleCategoryKind {
    /// The configuration document spelling of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PowerUnit => "powerunit",
            Self::Trailer => "trailer",
            Self::Accessory => "accessory",
            Self::Pseudo => "pseudo",
        }
    }
}

impl std::fmt::Display for VehicleCategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-code glyphs registered for a vehicle type.
///
/// Power units occupy two axle units (steer and drive) and therefore carry
/// one glyph for each; every other vehicle carries a single glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleDisplayCode {
    /// Steer and drive glyphs of a power unit.
    PowerUnit {
        /// Glyph of the steer axle unit.
        steer: String,
        /// Glyph of the drive axle unit.
        drive: String,
    },
    /// Glyph of a towed or pseudo unit.
    Single(String),
}

/// A power unit or trailer type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleType {
    /// Vehicle type id, e.g. `TRKTRAC`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Category of this vehicle type.
    pub category: VehicleCategoryKind,
    /// Type-level default weight dimensions (first tier of the fallback).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_weight_dimensions: Vec<WeightDimension>,
    /// Long combination vehicle, gated by special authorization.
    #[serde(default)]
    pub is_lcv: bool,
    /// Skipped when locating the trailer that determines size dimensions.
    #[serde(default)]
    pub ignore_for_size_dimensions: bool,
    /// Contributes no axle unit to the axle configuration.
    #[serde(default)]
    pub ignore_for_axle_calculation: bool,
    /// Pseudo vehicle type representing an extra axle group attached to
    /// this vehicle. When set, that pseudo type may immediately follow this
    /// vehicle in a combination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_axle_sub_type: Option<String>,
    /// Registered display-code glyphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_code: Option<VehicleDisplayCode>,
}

/// Category-level defaults (second tier of the weight fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCategory {
    /// The category these defaults apply to.
    pub id: VehicleCategoryKind,
    /// Human-readable name.
    pub name: String,
    /// Category default weight dimensions.
    #[serde(default)]
    pub default_weight_dimensions: Vec<WeightDimension>,
}

/// Power unit and trailer taxonomies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleTypes {
    /// Power unit types.
    #[serde(default)]
    pub power_unit_types: Vec<VehicleType>,
    /// Trailer, accessory and pseudo types.
    #[serde(default)]
    pub trailer_types: Vec<VehicleType>,
}

impl VehicleTypes {
    /// Find a vehicle type by id across both taxonomies.
    pub fn find(&self, id: &str) -> Option<&VehicleType> {
        self.power_unit_types
            .iter()
            .chain(self.trailer_types.iter())
            .find(|v| v.id == id)
    }

    /// Find a power unit type by id.
    pub fn power_unit(&self, id: &str) -> Option<&VehicleType> {
        self.power_unit_types.iter().find(|v| v.id == id)
    }

    /// Find a trailer type by id.
    pub fn trailer(&self, id: &str) -> Option<&VehicleType> {
        self.trailer_types.iter().find(|v| v.id == id)
    }
}
