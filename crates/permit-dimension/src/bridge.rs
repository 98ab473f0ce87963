//! # Bridge Formula
//!
//! Evaluates the bridge formula over every contiguous group of axle units.
//! For the group spanning units `i..=j` (1-based, `i < j`):
//!
//! ```text
//! actualWeight = Σ weight(i..=j)
//! wheelbase    = Σ spread(i..=j) + Σ spacingToNext(i..j)
//! maxBridge    = multiplier · wheelbase + minWeight
//! success      = actualWeight ≤ maxBridge
//! ```
//!
//! Single-axle units contribute no spread. A configuration of `n` units
//! yields `n·(n-1)/2` results, ordered by start unit then end unit.
//!
//! The whole configuration is validated before any group is computed; the
//! first offending unit is reported.

use serde::{Deserialize, Serialize};

use permit_core::{AxleConfiguration, AxleConfigurationError, BridgeCalculationConstants};

/// Bridge formula outcome for one axle group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeCalculationResult {
    /// First axle unit of the group (1-based).
    pub start_axle_unit: usize,
    /// Last axle unit of the group (1-based).
    pub end_axle_unit: usize,
    /// Total weight carried by the group.
    pub actual_weight: f64,
    /// Maximum weight the bridge formula permits for the group.
    pub max_bridge: f64,
    /// `actual_weight <= max_bridge`.
    pub success: bool,
}

/// Evaluate the bridge formula over every axle group of `axle_config`.
///
/// # Errors
///
/// See [`validate_axle_configuration`].
pub fn calculate_bridge(
    axle_config: &[AxleConfiguration],
    constants: &BridgeCalculationConstants,
) -> Result<Vec<BridgeCalculationResult>, AxleConfigurationError> {
    validate_axle_configuration(axle_config)?;

    let n = axle_config.len();
    let mut results = Vec::with_capacity(n * (n - 1) / 2);
    for start in 0..n - 1 {
        let mut actual_weight = axle_config[start].weight;
        let mut wheelbase = axle_config[start].effective_spread();
        for end in start + 1..n {
            let unit = &axle_config[end];
            actual_weight += unit.weight;
            wheelbase += axle_config[end - 1].spacing_to_next.unwrap_or(0.0) + unit.effective_spread();
            let max_bridge = constants.multiplier * wheelbase + constants.min_weight;
            results.push(BridgeCalculationResult {
                start_axle_unit: start + 1,
                end_axle_unit: end + 1,
                actual_weight,
                max_bridge,
                success: actual_weight <= max_bridge,
            });
        }
    }
    Ok(results)
}

/// Check an axle configuration before bridge calculation.
///
/// # Errors
///
/// - fewer than 2 axle units;
/// - a unit with no axles;
/// - a unit with a non-positive (or non-finite) weight;
/// - a multi-axle unit without a spread, or with a negative one;
/// - a single-axle unit with a negative spread;
/// - a unit other than the last without a positive spacing to the next.
pub fn validate_axle_configuration(
    axle_config: &[AxleConfiguration],
) -> Result<(), AxleConfigurationError> {
    if axle_config.len() < 2 {
        return Err(AxleConfigurationError::TooFewAxleUnits {
            found: axle_config.len(),
        });
    }
    let last = axle_config.len() - 1;
    for (i, unit) in axle_config.iter().enumerate() {
        let number = i + 1;
        if unit.number_of_axles == 0 {
            return Err(AxleConfigurationError::NonPositiveAxleCount { unit: number });
        }
        if !(unit.weight.is_finite() && unit.weight > 0.0) {
            return Err(AxleConfigurationError::NonPositiveWeight { unit: number });
        }
        match unit.spread {
            None if unit.number_of_axles > 1 => {
                return Err(AxleConfigurationError::MissingSpread { unit: number });
            }
            Some(spread) if spread < 0.0 => {
                return Err(AxleConfigurationError::NegativeSpread { unit: number });
            }
            _ => {}
        }
        if i < last && !unit.spacing_to_next.is_some_and(|s| s > 0.0) {
            return Err(AxleConfigurationError::MissingSpacing { unit: number });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constants() -> BridgeCalculationConstants {
        BridgeCalculationConstants {
            multiplier: 30.0,
            min_weight: 18000.0,
        }
    }

    fn three_units() -> Vec<AxleConfiguration> {
        vec![
            AxleConfiguration::new(1, 6700.0).with_spacing_to_next(350.0),
            AxleConfiguration::new(2, 12000.0)
                .with_spread(160.0)
                .with_spacing_to_next(700.0),
            AxleConfiguration::new(3, 22000.0).with_spread(220.0),
        ]
    }

    // ── Formula ──────────────────────────────────────────────────────

    #[test]
    fn reference_three_unit_configuration() {
        let results = calculate_bridge(&three_units(), &constants()).unwrap();
        assert_eq!(results.len(), 3);

        let r12 = results[0];
        assert_eq!((r12.start_axle_unit, r12.end_axle_unit), (1, 2));
        assert_eq!(r12.actual_weight, 18700.0);
        assert_eq!(r12.max_bridge, 33300.0);
        assert!(r12.success);

        let r13 = results[1];
        assert_eq!((r13.start_axle_unit, r13.end_axle_unit), (1, 3));
        assert_eq!(r13.actual_weight, 40700.0);
        assert_eq!(r13.max_bridge, 60900.0);
        assert!(r13.success);

        let r23 = results[2];
        assert_eq!((r23.start_axle_unit, r23.end_axle_unit), (2, 3));
        assert_eq!(r23.actual_weight, 34000.0);
        assert_eq!(r23.max_bridge, 50400.0);
        assert!(r23.success);
    }

    #[test]
    fn overweight_group_fails() {
        let mut units = three_units();
        units[2].weight = 45000.0;
        let results = calculate_bridge(&units, &constants()).unwrap();
        // (2,3): 57000 > 50400
        assert!(!results[2].success);
        // (1,3): 63700 > 60900
        assert!(!results[1].success);
        assert!(results[0].success);
    }

    #[test]
    fn single_axle_spread_is_ignored() {
        let mut units = three_units();
        units[0].spread = Some(500.0);
        let results = calculate_bridge(&units, &constants()).unwrap();
        assert_eq!(results[0].max_bridge, 33300.0);
    }

    #[test]
    fn serialized_field_names() {
        let results = calculate_bridge(&three_units(), &constants()).unwrap();
        let json = serde_json::to_value(results[0]).unwrap();
        assert_eq!(json["startAxleUnit"], 1);
        assert_eq!(json["maxBridge"], 33300.0);
    }

    // ── Validation ───────────────────────────────────────────────────

    #[test]
    fn too_few_units() {
        let err = calculate_bridge(&three_units()[..1], &constants()).unwrap_err();
        assert_eq!(err, AxleConfigurationError::TooFewAxleUnits { found: 1 });
        assert!(calculate_bridge(&[], &constants()).is_err());
    }

    #[test]
    fn zero_axles() {
        let mut units = three_units();
        units[1].number_of_axles = 0;
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::NonPositiveAxleCount { unit: 2 }
        );
    }

    #[test]
    fn non_positive_weight_on_first_or_last() {
        let mut units = three_units();
        units[0].weight = 0.0;
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::NonPositiveWeight { unit: 1 }
        );
        let mut units = three_units();
        units[2].weight = -1.0;
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::NonPositiveWeight { unit: 3 }
        );
    }

    #[test]
    fn spread_rules() {
        let mut units = three_units();
        units[0].spread = Some(-1.0);
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::NegativeSpread { unit: 1 }
        );

        let mut units = three_units();
        units[2].spread = None;
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::MissingSpread { unit: 3 }
        );

        let mut units = three_units();
        units[1].spread = Some(-5.0);
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::NegativeSpread { unit: 2 }
        );
    }

    #[test]
    fn spacing_required_except_last() {
        let mut units = three_units();
        units[1].spacing_to_next = None;
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::MissingSpacing { unit: 2 }
        );

        let mut units = three_units();
        units[0].spacing_to_next = Some(0.0);
        assert_eq!(
            calculate_bridge(&units, &constants()).unwrap_err(),
            AxleConfigurationError::MissingSpacing { unit: 1 }
        );

        let mut units = three_units();
        units[2].spacing_to_next = None;
        assert!(calculate_bridge(&units, &constants()).is_ok());
    }
}
