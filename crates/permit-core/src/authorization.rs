//! # Special Authorizations
//!
//! Per-client overrides applied uniformly to every evaluation run under
//! them: long combination vehicle (LCV) allowance and fee waiver.

use serde::{Deserialize, Serialize};

/// Per-client overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialAuthorizations {
    /// LCV power units may be used.
    #[serde(default)]
    pub is_lcv_allowed: bool,
    /// Fee waiver category. Any value waives all fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_fee_type: Option<String>,
}

impl SpecialAuthorizations {
    /// Authorizations allowing LCVs.
    pub fn lcv_allowed() -> Self {
        Self {
            is_lcv_allowed: true,
            no_fee_type: None,
        }
    }

    /// Authorizations waiving fees under `no_fee_type`.
    pub fn no_fee(no_fee_type: impl Into<String>) -> Self {
        Self {
            is_lcv_allowed: false,
            no_fee_type: Some(no_fee_type.into()),
        }
    }

    /// Whether fees are waived.
    pub fn is_no_fee(&self) -> bool {
        self.no_fee_type.is_some()
    }
}

/// Whether LCVs are allowed under optional authorizations.
pub fn lcv_allowed(auth: Option<&SpecialAuthorizations>) -> bool {
    auth.is_some_and(|a| a.is_lcv_allowed)
}
