//! # Fact Environment
//!
//! The facts a rule condition can name, resolved for one evaluation:
//!
//! | Fact                   | Value                                                        |
//! |------------------------|--------------------------------------------------------------|
//! | `validationDate`       | the evaluation date, `YYYY-MM-DD`                            |
//! | `daysInPermitYear`     | days from the start date to the same date a year later       |
//! | `endOfQuarter`         | last day of the calendar quarter of the evaluation date      |
//! | `configurationIsValid` | whether the application's vehicle combination is permitted   |
//! | cost fact names        | the computed cost for the condition's `params`               |
//! | any other name         | the application field of that name, or `null`                |
//!
//! A [`Facts`] value is built per evaluation and dropped with it. Nothing
//! here is shared between evaluations.

use chrono::{Datelike, Months, NaiveDate};
use serde_json::{Map, Value};

use permit_core::{PermitApplication, PermitType, PolicyDefinition};
use permit_state::ConfigurationValidator;

use crate::cost::CostFact;

/// Name of the evaluation date fact.
pub const VALIDATION_DATE: &str = "validationDate";
/// Name of the permit-year length fact.
pub const DAYS_IN_PERMIT_YEAR: &str = "daysInPermitYear";
/// Name of the end-of-quarter fact.
pub const END_OF_QUARTER: &str = "endOfQuarter";
/// Name of the configuration validity fact.
pub const CONFIGURATION_IS_VALID: &str = "configurationIsValid";

/// Facts resolved for one evaluation of one application.
#[derive(Debug, Clone)]
pub struct Facts<'p> {
    policy: &'p PolicyDefinition,
    application: Value,
    validation_date: NaiveDate,
    days_in_permit_year: i64,
    end_of_quarter: NaiveDate,
    configuration_is_valid: bool,
}

impl<'p> Facts<'p> {
    /// Resolve the runtime facts for `application` evaluated on
    /// `validation_date` under `permit_type`.
    pub fn new(
        policy: &'p PolicyDefinition,
        permit_type: &PermitType,
        application: &PermitApplication,
        validation_date: NaiveDate,
        lcv_allowed: bool,
    ) -> Self {
        let year_start = application.start_date().unwrap_or(validation_date);
        Self {
            policy,
            application: application.to_value(),
            validation_date,
            days_in_permit_year: days_in_permit_year(year_start),
            end_of_quarter: end_of_quarter(validation_date),
            configuration_is_valid: configuration_is_valid(
                policy,
                permit_type,
                application,
                lcv_allowed,
            ),
        }
    }

    /// Resolve the fact `name`. `params` are passed to cost facts.
    pub fn value(&self, name: &str, params: Option<&Map<String, Value>>) -> Value {
        match name {
            VALIDATION_DATE => Value::from(self.validation_date.to_string()),
            DAYS_IN_PERMIT_YEAR => Value::from(self.days_in_permit_year),
            END_OF_QUARTER => Value::from(self.end_of_quarter.to_string()),
            CONFIGURATION_IS_VALID => Value::from(self.configuration_is_valid),
            _ => match CostFact::from_name(name) {
                Some(cost_fact) => {
                    let empty = Map::new();
                    Value::from(cost_fact.compute(params.unwrap_or(&empty), self))
                }
                None => self
                    .application
                    .get(name)
                    .cloned()
                    .unwrap_or(Value::Null),
            },
        }
    }

    /// The policy the facts were resolved against.
    pub fn policy(&self) -> &'p PolicyDefinition {
        self.policy
    }

    /// The application as a JSON document.
    pub fn application(&self) -> &Value {
        &self.application
    }

    /// The evaluation date.
    pub fn validation_date(&self) -> NaiveDate {
        self.validation_date
    }

    /// Length in days of the permit year starting at the start date.
    pub fn days_in_permit_year(&self) -> i64 {
        self.days_in_permit_year
    }

    /// Last day of the quarter containing the evaluation date.
    pub fn end_of_quarter(&self) -> NaiveDate {
        self.end_of_quarter
    }

    /// Whether the vehicle combination is a complete, permitted one.
    pub fn configuration_is_valid(&self) -> bool {
        self.configuration_is_valid
    }
}

/// Days from `start` to the same calendar date one year later: 366 when
/// the year spans a 29 February, 365 otherwise.
pub fn days_in_permit_year(start: NaiveDate) -> i64 {
    start
        .checked_add_months(Months::new(12))
        .map(|end| (end - start).num_days())
        .unwrap_or(365)
}

/// Last day of the calendar quarter containing `date`.
pub fn end_of_quarter(date: NaiveDate) -> NaiveDate {
    let last_month = (date.month0() / 3) * 3 + 3;
    let next_quarter_start = if last_month == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), last_month + 1, 1)
    };
    next_quarter_start
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

/// Whether the application's vehicle combination is a complete, permitted
/// combination. The configuration automaton runs over the commodity's
/// vehicle tables, or over the vehicle allow-list for permit types without
/// commodity selection. Lookup failures count as an invalid configuration.
fn configuration_is_valid(
    policy: &PolicyDefinition,
    permit_type: &PermitType,
    application: &PermitApplication,
    lcv_allowed: bool,
) -> bool {
    let sequence = application.vehicle_sequence();
    if !permit_type.commodity_required {
        return ConfigurationValidator::for_allow_list(policy, permit_type, lcv_allowed)
            .is_valid(&sequence, false);
    }
    let commodity = application.commodity().unwrap_or_default();
    match ConfigurationValidator::new(policy, &permit_type.id, commodity, lcv_allowed) {
        Ok(validator) => validator.is_valid(&sequence, false),
        Err(err) => {
            tracing::warn!(
                permit_type = %permit_type.id,
                commodity = %commodity,
                error = %err,
                "configuration validity check failed, treating as invalid"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_core::fixtures::{sample_policy, ApplicationBuilder};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ── Calendar facts ───────────────────────────────────────────────

    #[test]
    fn permit_year_length() {
        assert_eq!(days_in_permit_year(date(2025, 3, 1)), 365);
        assert_eq!(days_in_permit_year(date(2023, 3, 1)), 366);
        assert_eq!(days_in_permit_year(date(2024, 1, 15)), 366);
        assert_eq!(days_in_permit_year(date(2024, 3, 1)), 365);
    }

    #[test]
    fn quarter_ends() {
        assert_eq!(end_of_quarter(date(2025, 1, 1)), date(2025, 3, 31));
        assert_eq!(end_of_quarter(date(2025, 5, 20)), date(2025, 6, 30));
        assert_eq!(end_of_quarter(date(2025, 9, 30)), date(2025, 9, 30));
        assert_eq!(end_of_quarter(date(2025, 12, 31)), date(2025, 12, 31));
    }

    // ── Fact resolution ──────────────────────────────────────────────

    #[test]
    fn named_facts_and_application_fields() {
        let policy = sample_policy().unwrap();
        let tros = policy.permit_type("TROS").unwrap();
        let app = ApplicationBuilder::new("TROS")
            .start_date("2024-01-15")
            .vehicles(&["TRKTRAC", "SEMITRL"])
            .build();
        let facts = Facts::new(&policy, tros, &app, date(2024, 1, 10), false);

        assert_eq!(facts.value(VALIDATION_DATE, None), Value::from("2024-01-10"));
        assert_eq!(facts.value(DAYS_IN_PERMIT_YEAR, None), Value::from(366));
        assert_eq!(facts.value(END_OF_QUARTER, None), Value::from("2024-03-31"));
        assert_eq!(facts.value(CONFIGURATION_IS_VALID, None), Value::from(true));
        assert_eq!(facts.value("permitType", None), Value::from("TROS"));
        assert_eq!(
            facts.value("permitData", None)["companyName"],
            Value::from("Acme Hauling Ltd.")
        );
        assert_eq!(facts.value("unknownFact", None), Value::Null);
    }

    #[test]
    fn permit_year_falls_back_to_validation_date() {
        let policy = sample_policy().unwrap();
        let tros = policy.permit_type("TROS").unwrap();
        let app = ApplicationBuilder::new("TROS").build();
        let facts = Facts::new(&policy, tros, &app, date(2023, 6, 1), false);
        assert_eq!(facts.days_in_permit_year(), 366);
    }

    #[test]
    fn cost_facts_are_callable_with_params() {
        let policy = sample_policy().unwrap();
        let tros = policy.permit_type("TROS").unwrap();
        let app = ApplicationBuilder::new("TROS").build();
        let facts = Facts::new(&policy, tros, &app, date(2025, 1, 1), false);
        let mut params = Map::new();
        params.insert("cost".into(), Value::from(42));
        assert_eq!(facts.value("fixedCost", Some(&params)), Value::from(42.0));
        assert_eq!(facts.value("fixedCost", None), Value::from(0.0));
    }

    // ── Configuration validity ───────────────────────────────────────

    #[test]
    fn allow_list_governs_non_commodity_permit_types() {
        let policy = sample_policy().unwrap();
        let tros = policy.permit_type("TROS").unwrap();
        let ok = ApplicationBuilder::new("TROS")
            .vehicles(&["TRKTRAC", "FLOATTR"])
            .build();
        let bad = ApplicationBuilder::new("TROS")
            .vehicles(&["BOOMTRK", "SEMITRL"])
            .build();
        let day = date(2025, 1, 1);
        assert!(Facts::new(&policy, tros, &ok, day, false).configuration_is_valid());
        assert!(!Facts::new(&policy, tros, &bad, day, false).configuration_is_valid());
    }

    #[test]
    fn allow_listed_vehicles_must_still_be_ordered() {
        let policy = sample_policy().unwrap();
        let tros = policy.permit_type("TROS").unwrap();
        let day = date(2025, 1, 1);
        let sequences: [&[&str]; 4] = [
            &["SEMITRL", "TRKTRAC"],
            &["TRKTRAC", "SEMITRL", "FLOATTR", "POLETRL"],
            &["TRKTRAC"],
            &[],
        ];
        for sequence in sequences {
            let app = ApplicationBuilder::new("TROS").vehicles(sequence).build();
            assert!(
                !Facts::new(&policy, tros, &app, day, false).configuration_is_valid(),
                "{sequence:?}"
            );
        }
    }

    #[test]
    fn automaton_governs_commodity_permit_types() {
        let policy = sample_policy().unwrap();
        let stos = policy.permit_type("STOS").unwrap();
        let day = date(2025, 1, 1);

        let ok = ApplicationBuilder::new("STOS")
            .commodity("EMPTYXX")
            .vehicles(&["TRKTRAC", "JEEPSRT", "FLOATTR", "BOOSTER"])
            .build();
        assert!(Facts::new(&policy, stos, &ok, day, false).configuration_is_valid());

        let out_of_order = ApplicationBuilder::new("STOS")
            .commodity("EMPTYXX")
            .vehicles(&["TRKTRAC", "FLOATTR", "JEEPSRT"])
            .build();
        assert!(!Facts::new(&policy, stos, &out_of_order, day, false).configuration_is_valid());
    }

    #[test]
    fn lookup_failure_degrades_to_invalid() {
        let policy = sample_policy().unwrap();
        let stos = policy.permit_type("STOS").unwrap();
        let app = ApplicationBuilder::new("STOS")
            .commodity("NOSUCHX")
            .vehicles(&["TRKTRAC", "SEMITRL"])
            .build();
        let facts = Facts::new(&policy, stos, &app, date(2025, 1, 1), false);
        assert!(!facts.configuration_is_valid());

        let no_commodity = ApplicationBuilder::new("STOS")
            .vehicles(&["TRKTRAC", "SEMITRL"])
            .build();
        let facts = Facts::new(&policy, stos, &no_commodity, date(2025, 1, 1), false);
        assert!(!facts.configuration_is_valid());
    }
}
