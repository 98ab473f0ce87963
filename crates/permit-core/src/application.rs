//! # Permit Application
//!
//! The application document submitted for validation. Fields the engine
//! reads directly are typed; everything else is preserved in `extra` maps
//! so that rules can address any field of the submitted document by path.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::axle::AxleConfiguration;

/// A permit application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitApplication {
    /// Permit type id.
    pub permit_type: String,
    /// Application body.
    #[serde(default)]
    pub permit_data: PermitData,
    /// Any other top-level fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The body of a permit application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitData {
    /// First day of the permit, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Permit duration in days. Whole-valued floats (`30.0`) are accepted.
    #[serde(
        default,
        deserialize_with = "whole_days",
        skip_serializing_if = "Option::is_none"
    )]
    pub permit_duration: Option<i64>,
    /// Last day of the permit, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    /// Commodity carried, for commodity-driven permit types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permitted_commodity: Option<PermittedCommodity>,
    /// The power unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_details: Option<VehicleDetails>,
    /// Trailers and axle layout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_configuration: Option<VehicleConfiguration>,
    /// Route travelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permitted_route: Option<PermittedRoute>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Commodity selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermittedCommodity {
    /// Commodity id.
    #[serde(default)]
    pub commodity_type: String,
    /// Free-text description of the load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_description: Option<String>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Details of the power unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    /// Broad vehicle kind, e.g. `powerUnit`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    /// Power unit type id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_sub_type: Option<String>,
    /// Any other fields (plate, licensed GVW, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Trailers and axle layout of the combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleConfiguration {
    /// Towed units in order, including jeeps, boosters and pseudo types.
    #[serde(default)]
    pub trailers: Vec<TrailerDetails>,
    /// Axle units of the whole combination.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub axle_configuration: Vec<AxleConfiguration>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One towed unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrailerDetails {
    /// Trailer type id.
    pub vehicle_sub_type: String,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Route travelled under the permit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermittedRoute {
    /// Manually entered route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_route: Option<ManualRoute>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Manually entered route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualRoute {
    /// Total distance in kilometres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_distance: Option<f64>,
    /// Any other fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PermitApplication {
    /// An application of the given permit type with an empty body.
    pub fn new(permit_type: impl Into<String>) -> Self {
        Self {
            permit_type: permit_type.into(),
            ..Self::default()
        }
    }

    /// The vehicle combination: the power unit followed by every trailer.
    ///
    /// A missing power unit contributes nothing, so an application without
    /// vehicle details yields only its trailers.
    pub fn vehicle_sequence(&self) -> Vec<String> {
        let data = &self.permit_data;
        data.vehicle_details
            .as_ref()
            .and_then(|d| d.vehicle_sub_type.clone())
            .into_iter()
            .chain(
                data.vehicle_configuration
                    .iter()
                    .flat_map(|c| c.trailers.iter().map(|t| t.vehicle_sub_type.clone())),
            )
            .collect()
    }

    /// The selected commodity id, if any.
    pub fn commodity(&self) -> Option<&str> {
        self.permit_data
            .permitted_commodity
            .as_ref()
            .map(|c| c.commodity_type.as_str())
            .filter(|c| !c.is_empty())
    }

    /// The permit start date, when present and well-formed.
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.permit_data.start_date.as_deref().and_then(parse_date)
    }

    /// Total route distance, when a manual route was supplied.
    pub fn total_distance(&self) -> Option<f64> {
        self.permit_data
            .permitted_route
            .as_ref()?
            .manual_route
            .as_ref()?
            .total_distance
    }

    /// The application as a JSON document, the shape rules address.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn whole_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(days) if days.is_finite() && days.fract() == 0.0 && days.abs() < 1e15 => {
            Ok(Some(days as i64))
        }
        Some(days) => Err(D::Error::custom(format!(
            "permitDuration must be a whole number of days, got {days}"
        ))),
    }
}

/// Parse a calendar date from `YYYY-MM-DD`, ignoring any time suffix
/// (`2024-03-01T08:00:00Z` parses as `2024-03-01`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
