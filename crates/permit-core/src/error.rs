//! # Error Hierarchy
//!
//! Defines the error types raised by the policy engine. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! Two error classes are kept apart:
//!
//! - **Caller errors** (this module): an unknown permit type or commodity, a
//!   configuration query against a permit type that does not use commodity
//!   selection, a malformed axle configuration, an incompatible policy
//!   document. These mean the API was misused and are returned as `Err`.
//! - **Applicant findings**: a non-compliant permit application is never an
//!   error. It is reported as typed entries in
//!   [`ValidationResults`](crate::result::ValidationResults).

use thiserror::Error;

/// Top-level error type for the policy engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// The permit type id is not defined in the policy document.
    #[error("unknown permit type: {0}")]
    UnknownPermitType(String),

    /// The commodity id is not defined in the policy document.
    #[error("unknown commodity: {0}")]
    UnknownCommodity(String),

    /// The vehicle type id is not defined in the policy document.
    #[error("unknown vehicle type: {0}")]
    UnknownVehicleType(String),

    /// Configuration validation was requested for a permit type that does
    /// not require commodity selection.
    #[error("permit type {0} does not require commodity selection")]
    CommodityNotRequired(String),

    /// The vehicle sequence is not a valid complete configuration.
    #[error("invalid vehicle configuration: {0}")]
    InvalidConfiguration(String),

    /// The axle configuration failed validation.
    #[error("invalid axle configuration: {0}")]
    InvalidAxleConfiguration(#[from] AxleConfigurationError),

    /// The policy document's minimum engine version is missing or malformed.
    #[error("malformed minimum engine version: {0:?}")]
    MalformedPolicyVersion(String),

    /// The policy document requires a newer engine major version.
    #[error("policy requires engine version {required}, running {engine}")]
    UnsupportedPolicyVersion {
        /// Minimum version declared by the document.
        required: String,
        /// Version of this engine.
        engine: String,
    },

    /// The policy document could not be deserialized.
    #[error("policy document could not be parsed: {0}")]
    Deserialization(String),
}

/// Validation failure of an axle configuration.
///
/// Axle unit numbers are 1-based, matching the numbering used in bridge
/// calculation results and vehicle display codes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AxleConfigurationError {
    /// Fewer than two axle units were supplied.
    #[error("at least 2 axle units are required, found {found}")]
    TooFewAxleUnits {
        /// Number of axle units supplied.
        found: usize,
    },

    /// An axle unit has zero axles.
    #[error("axle unit {unit}: numberOfAxles must be positive")]
    NonPositiveAxleCount {
        /// 1-based axle unit.
        unit: usize,
    },

    /// An axle unit has a zero, negative or non-finite weight.
    #[error("axle unit {unit}: weight must be positive")]
    NonPositiveWeight {
        /// 1-based axle unit.
        unit: usize,
    },

    /// A multi-axle unit is missing its spread.
    #[error("axle unit {unit}: spread is required when numberOfAxles > 1")]
    MissingSpread {
        /// 1-based axle unit.
        unit: usize,
    },

    /// An axle unit has a negative spread.
    #[error("axle unit {unit}: spread must not be negative")]
    NegativeSpread {
        /// 1-based axle unit.
        unit: usize,
    },

    /// A non-final axle unit is missing a positive spacing to the next unit.
    #[error("axle unit {unit}: spacingToNext must be positive for all but the last unit")]
    MissingSpacing {
        /// 1-based axle unit.
        unit: usize,
    },
}

/// Convenience alias for results carrying a [`PolicyError`].
pub type PolicyResult<T> = Result<T, PolicyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axle_errors_name_unit_and_field() {
        let err = AxleConfigurationError::MissingSpread { unit: 3 };
        assert_eq!(
            err.to_string(),
            "axle unit 3: spread is required when numberOfAxles > 1"
        );
    }

    #[test]
    fn axle_error_converts_into_policy_error() {
        let err: PolicyError = AxleConfigurationError::TooFewAxleUnits { found: 1 }.into();
        assert!(matches!(
            err,
            PolicyError::InvalidAxleConfiguration(AxleConfigurationError::TooFewAxleUnits {
                found: 1
            })
        ));
        assert!(err.to_string().contains("at least 2 axle units"));
    }

    #[test]
    fn version_error_display() {
        let err = PolicyError::UnsupportedPolicyVersion {
            required: "2.0.0".into(),
            engine: "1.0.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "policy requires engine version 2.0.0, running 1.0.0"
        );
    }
}
