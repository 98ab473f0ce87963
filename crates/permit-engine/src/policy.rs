//! # Policy Facade
//!
//! [`Policy`] binds a policy document to an optional set of special
//! authorizations and exposes every engine operation.
//!
//! Construction checks the document's minimum engine version and compiles
//! one rule set per permit type. After that the document is never mutated:
//! `validate` takes `&self` and builds a fresh fact environment per call, so
//! a `Policy` can be shared across threads. Replacing the special
//! authorizations takes `&mut self`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use permit_core::{
    check_compatibility, AxleConfiguration, AxleUnitWeight, PermitApplication, PolicyDefinition,
    PolicyError, PolicyResult, SizeDimension, SpecialAuthorizations, ValidationResult,
    ValidationResults, WeightDimension,
};
use permit_dimension::BridgeCalculationResult;
use permit_rules::{CompiledRuleSet, Facts};
use permit_state::{ConfigurationValidator, PermittableVehicles};

use crate::display::vehicle_display_code;

/// A permit condition applying to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermitCondition {
    /// Condition code, e.g. `CVSE-1000`.
    pub condition: String,
    /// Description shown on the permit.
    pub description: String,
    /// Link to the full condition text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_link: Option<String>,
}

/// The policy engine.
#[derive(Debug, Clone)]
pub struct Policy {
    definition: PolicyDefinition,
    rule_sets: BTreeMap<String, CompiledRuleSet>,
    special_authorizations: Option<SpecialAuthorizations>,
}

impl Policy {
    /// Build an engine from a policy document.
    ///
    /// # Errors
    ///
    /// [`PolicyError::MalformedPolicyVersion`] when `minPEVersion` is missing
    /// or malformed; [`PolicyError::UnsupportedPolicyVersion`] when it
    /// requires a newer major version than this engine.
    pub fn new(
        definition: PolicyDefinition,
        special_authorizations: Option<SpecialAuthorizations>,
    ) -> PolicyResult<Self> {
        check_compatibility(definition.min_pe_version.as_deref())?;
        let rule_sets = CompiledRuleSet::compile_all(&definition);
        tracing::debug!(
            version = %definition.version,
            permit_types = rule_sets.len(),
            "policy engine ready"
        );
        Ok(Self {
            definition,
            rule_sets,
            special_authorizations,
        })
    }

    /// Build an engine from a policy document in JSON.
    ///
    /// # Errors
    ///
    /// As [`Policy::new`], plus [`PolicyError::Deserialization`].
    pub fn from_json_str(
        json: &str,
        special_authorizations: Option<SpecialAuthorizations>,
    ) -> PolicyResult<Self> {
        Self::new(PolicyDefinition::from_json_str(json)?, special_authorizations)
    }

    /// The policy document this engine evaluates against.
    pub fn definition(&self) -> &PolicyDefinition {
        &self.definition
    }

    /// The special authorizations applied to every call, if any.
    pub fn special_authorizations(&self) -> Option<&SpecialAuthorizations> {
        self.special_authorizations.as_ref()
    }

    /// Replace the special authorizations applied to later calls.
    pub fn set_special_authorizations(&mut self, special_authorizations: Option<SpecialAuthorizations>) {
        self.special_authorizations = special_authorizations;
    }

    fn lcv_allowed(&self) -> bool {
        permit_core::lcv_allowed(self.special_authorizations.as_ref())
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Validate `application` as of today (UTC).
    pub fn validate(&self, application: &PermitApplication) -> ValidationResults {
        self.validate_on(application, today())
    }

    /// Validate `application` as of `validation_date`. Never fails: an
    /// unknown permit type is reported as a single violation.
    pub fn validate_on(
        &self,
        application: &PermitApplication,
        validation_date: NaiveDate,
    ) -> ValidationResults {
        let id = application.permit_type.as_str();
        let (Some(rule_set), Ok(permit_type)) =
            (self.rule_sets.get(id), self.definition.permit_type(id))
        else {
            tracing::debug!(permit_type = %id, "validation requested for unknown permit type");
            let mut results = ValidationResults::new();
            results.push(
                ValidationResult::violation(
                    "field-validation-error",
                    format!("Permit type {id} unknown"),
                )
                .with_field_reference("permitType"),
            );
            return results;
        };
        let facts = Facts::new(
            &self.definition,
            permit_type,
            application,
            validation_date,
            self.lcv_allowed(),
        );
        let no_fee_type = self
            .special_authorizations
            .as_ref()
            .and_then(|a| a.no_fee_type.as_deref());
        rule_set.evaluate(&facts, no_fee_type)
    }

    /// Permit conditions applying to `application` as of today (UTC).
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownPermitType`].
    pub fn conditions_for_permit(
        &self,
        application: &PermitApplication,
    ) -> PolicyResult<Vec<PermitCondition>> {
        self.conditions_for_permit_on(application, today())
    }

    /// Permit conditions applying to `application` as of `validation_date`,
    /// in document order.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownPermitType`].
    pub fn conditions_for_permit_on(
        &self,
        application: &PermitApplication,
        validation_date: NaiveDate,
    ) -> PolicyResult<Vec<PermitCondition>> {
        let id = application.permit_type.as_str();
        let permit_type = self.definition.permit_type(id)?;
        let rule_set = self
            .rule_sets
            .get(id)
            .ok_or_else(|| PolicyError::UnknownPermitType(id.to_string()))?;
        let facts = Facts::new(
            &self.definition,
            permit_type,
            application,
            validation_date,
            self.lcv_allowed(),
        );
        Ok(rule_set
            .applicable_conditions(&facts)
            .into_iter()
            .map(|c| PermitCondition {
                condition: c.condition.clone(),
                description: c.description.clone(),
                condition_link: c.condition_link.clone(),
            })
            .collect())
    }

    // ── Catalog ──────────────────────────────────────────────────────

    /// Permit types keyed by id, with their names.
    pub fn permit_types(&self) -> BTreeMap<String, String> {
        permit_state::permit_types(&self.definition)
    }

    /// Commodities keyed by id, with their names, optionally restricted to
    /// those offered by a permit type.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownPermitType`].
    pub fn commodities(&self, permit_type_id: Option<&str>) -> PolicyResult<BTreeMap<String, String>> {
        permit_state::commodities(&self.definition, permit_type_id)
    }

    /// Power units and trailers permittable under a permit type.
    ///
    /// # Errors
    ///
    /// Unknown permit type, commodity or vehicle type.
    pub fn permittable_vehicle_types(
        &self,
        permit_type_id: &str,
        commodity_id: Option<&str>,
    ) -> PolicyResult<PermittableVehicles> {
        permit_state::permittable_vehicle_types(
            &self.definition,
            permit_type_id,
            commodity_id,
            self.lcv_allowed(),
        )
    }

    /// Power units permittable under a permit type.
    ///
    /// # Errors
    ///
    /// As [`Policy::permittable_vehicle_types`].
    pub fn permittable_power_unit_types(
        &self,
        permit_type_id: &str,
        commodity_id: Option<&str>,
    ) -> PolicyResult<BTreeMap<String, String>> {
        Ok(self
            .permittable_vehicle_types(permit_type_id, commodity_id)?
            .power_units)
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Whether `sequence` is a valid vehicle combination.
    ///
    /// # Errors
    ///
    /// Unknown permit type or commodity, or a permit type without
    /// commodity selection.
    pub fn is_configuration_valid<S: AsRef<str>>(
        &self,
        permit_type_id: &str,
        commodity_id: &str,
        sequence: &[S],
        allow_partial: bool,
    ) -> PolicyResult<bool> {
        Ok(self
            .validator(permit_type_id, commodity_id)?
            .is_valid(sequence, allow_partial))
    }

    /// Vehicle types that may be appended to `sequence`.
    ///
    /// # Errors
    ///
    /// As [`Policy::is_configuration_valid`].
    pub fn next_permittable_vehicles<S: AsRef<str>>(
        &self,
        permit_type_id: &str,
        commodity_id: &str,
        sequence: &[S],
    ) -> PolicyResult<BTreeSet<String>> {
        Ok(self
            .validator(permit_type_id, commodity_id)?
            .next_permittable(sequence))
    }

    fn validator(
        &self,
        permit_type_id: &str,
        commodity_id: &str,
    ) -> PolicyResult<ConfigurationValidator<'_>> {
        ConfigurationValidator::new(
            &self.definition,
            permit_type_id,
            commodity_id,
            self.lcv_allowed(),
        )
    }

    // ── Dimensions ───────────────────────────────────────────────────

    /// Size dimension of a complete combination, narrowed across
    /// `regions` (all configured regions when `None`). `Ok(None)` when no
    /// size dimension is configured for it.
    ///
    /// # Errors
    ///
    /// As [`Policy::is_configuration_valid`], plus
    /// [`PolicyError::InvalidConfiguration`] for an invalid or incomplete
    /// combination.
    pub fn size_dimension<S: AsRef<str>>(
        &self,
        permit_type_id: &str,
        commodity_id: &str,
        sequence: &[S],
        regions: Option<&[&str]>,
    ) -> PolicyResult<Option<SizeDimension>> {
        permit_dimension::size_dimension(
            &self.definition,
            permit_type_id,
            commodity_id,
            sequence,
            regions,
            self.lcv_allowed(),
        )
    }

    /// The document's global size defaults.
    pub fn global_size_defaults(&self) -> Option<&SizeDimension> {
        self.definition.global_size_defaults.as_ref()
    }

    /// Default weight candidates of a power unit.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownVehicleType`].
    pub fn default_power_unit_weight(
        &self,
        sub_type: &str,
        steer_axles: u32,
        drive_axles: u32,
    ) -> PolicyResult<Vec<WeightDimension>> {
        permit_dimension::default_power_unit_weight(&self.definition, sub_type, steer_axles, drive_axles)
    }

    /// Default weight candidates of a towed unit.
    ///
    /// # Errors
    ///
    /// [`PolicyError::UnknownVehicleType`].
    pub fn default_trailer_weight(&self, sub_type: &str, axles: u32) -> PolicyResult<Vec<WeightDimension>> {
        permit_dimension::default_trailer_weight(&self.definition, sub_type, axles)
    }

    /// The weight applying to the axle unit at `axle_index`.
    pub fn select_weight_dimension<S: AsRef<str>>(
        &self,
        candidates: &[WeightDimension],
        sequence: &[S],
        axle_config: &[AxleConfiguration],
        axle_index: usize,
    ) -> Option<AxleUnitWeight> {
        permit_dimension::select_weight_dimension(
            &self.definition,
            candidates,
            sequence,
            axle_config,
            axle_index,
        )
    }

    /// Bridge formula results for every axle group.
    ///
    /// # Errors
    ///
    /// [`PolicyError::InvalidAxleConfiguration`].
    pub fn calculate_bridge(
        &self,
        axle_config: &[AxleConfiguration],
    ) -> PolicyResult<Vec<BridgeCalculationResult>> {
        Ok(permit_dimension::calculate_bridge(
            axle_config,
            &self.definition.bridge_calculation_constants,
        )?)
    }

    /// Display code of a combination on its axle layout.
    pub fn vehicle_display_code<S: AsRef<str>>(
        &self,
        sequence: &[S],
        axle_config: &[AxleConfiguration],
    ) -> String {
        vehicle_display_code(&self.definition, sequence, axle_config).0
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
