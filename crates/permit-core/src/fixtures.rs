//! # Test Fixtures
//!
//! A sample policy document and an application builder shared by the
//! workspace tests. Enabled with the `fixtures` feature.
//!
//! The sample document defines regions `LMN`, `KTN` and `PCE`; permit types
//! `TROS`, `TROW` (fixed vehicle allow-lists) and `STOS`, `STOW`, `STWS`
//! (commodity driven); commodities `EMPTYXX` and `IMCONTN`; and a vehicle
//! taxonomy with a jeep/booster capable float trailer, a boom truck with an
//! additional axle group and an LCV power unit.

use serde_json::Value;

use crate::application::{
    ManualRoute, PermitApplication, PermittedCommodity, PermittedRoute, TrailerDetails,
    VehicleConfiguration, VehicleDetails,
};
use crate::axle::AxleConfiguration;
use crate::error::PolicyResult;
use crate::policy::PolicyDefinition;

/// The sample policy document as JSON text.
pub const POLICY_JSON: &str = include_str!("../testdata/policy.json");

/// The sample policy document.
pub fn sample_policy() -> PolicyResult<PolicyDefinition> {
    PolicyDefinition::from_json_str(POLICY_JSON)
}

/// Builder for permit applications.
#[derive(Debug, Clone)]
pub struct ApplicationBuilder {
    app: PermitApplication,
}

impl ApplicationBuilder {
    /// Start an application of the given permit type, with a company name
    /// so that the common "company name required" rule is satisfied.
    pub fn new(permit_type: &str) -> Self {
        let mut app = PermitApplication::new(permit_type);
        app.permit_data
            .extra
            .insert("companyName".into(), Value::from("Acme Hauling Ltd."));
        Self { app }
    }

    /// Set the start date (`YYYY-MM-DD`).
    pub fn start_date(mut self, date: &str) -> Self {
        self.app.permit_data.start_date = Some(date.into());
        self
    }

    /// Set the expiry date (`YYYY-MM-DD`).
    pub fn expiry_date(mut self, date: &str) -> Self {
        self.app.permit_data.expiry_date = Some(date.into());
        self
    }

    /// Set the duration in days.
    pub fn duration(mut self, days: i64) -> Self {
        self.app.permit_data.permit_duration = Some(days);
        self
    }

    /// Set the commodity.
    pub fn commodity(mut self, commodity: &str) -> Self {
        self.app.permit_data.permitted_commodity = Some(PermittedCommodity {
            commodity_type: commodity.into(),
            ..PermittedCommodity::default()
        });
        self
    }

    /// Set the load description. Requires a commodity to have been set.
    pub fn load_description(mut self, description: &str) -> Self {
        if let Some(c) = self.app.permit_data.permitted_commodity.as_mut() {
            c.load_description = Some(description.into());
        }
        self
    }

    /// Set the vehicle combination: power unit followed by trailers.
    pub fn vehicles(mut self, sequence: &[&str]) -> Self {
        let (power_unit, trailers) = match sequence.split_first() {
            Some((pu, rest)) => (Some(pu.to_string()), rest),
            None => (None, sequence),
        };
        self.app.permit_data.vehicle_details = Some(VehicleDetails {
            vehicle_type: Some("powerUnit".into()),
            vehicle_sub_type: power_unit,
            ..VehicleDetails::default()
        });
        let config = self
            .app
            .permit_data
            .vehicle_configuration
            .get_or_insert_with(VehicleConfiguration::default);
        config.trailers = trailers
            .iter()
            .map(|t| TrailerDetails {
                vehicle_sub_type: t.to_string(),
                ..TrailerDetails::default()
            })
            .collect();
        self
    }

    /// Set the axle configuration.
    pub fn axles(mut self, axles: Vec<AxleConfiguration>) -> Self {
        self.app
            .permit_data
            .vehicle_configuration
            .get_or_insert_with(VehicleConfiguration::default)
            .axle_configuration = axles;
        self
    }

    /// Set the manual route distance in kilometres.
    pub fn distance(mut self, km: f64) -> Self {
        self.app
            .permit_data
            .permitted_route
            .get_or_insert_with(PermittedRoute::default)
            .manual_route = Some(ManualRoute {
            total_distance: Some(km),
            ..ManualRoute::default()
        });
        self
    }

    /// Set an arbitrary field of the route.
    pub fn route_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.app
            .permit_data
            .permitted_route
            .get_or_insert_with(PermittedRoute::default)
            .extra
            .insert(key.into(), value.into());
        self
    }

    /// Set an arbitrary field of the power unit details.
    pub fn vehicle_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.app
            .permit_data
            .vehicle_details
            .get_or_insert_with(VehicleDetails::default)
            .extra
            .insert(key.into(), value.into());
        self
    }

    /// Set an arbitrary field of the application body.
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.app.permit_data.extra.insert(key.into(), value.into());
        self
    }

    /// Remove a field of the application body.
    pub fn without_field(mut self, key: &str) -> Self {
        self.app.permit_data.extra.remove(key);
        self
    }

    /// Finish the application.
    pub fn build(self) -> PermitApplication {
        self.app
    }
}
