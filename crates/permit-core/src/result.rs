//! # Validation Results
//!
//! The result document of a `validate` call. Findings are typed by
//! severity and partitioned into buckets:
//!
//! ```json
//! { "violations": [], "requirements": [], "warnings": [], "information": [], "cost": [] }
//! ```
//!
//! A non-compliant application is reported here, never as an error.

use serde::{Deserialize, Serialize};

/// Finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationResultType {
    /// The application cannot be approved as submitted.
    Violation,
    /// The application is acceptable but something deserves attention.
    Warning,
    /// Something must be satisfied before the permit is issued.
    Requirement,
    /// Informational note.
    Information,
    /// A computed fee.
    Cost,
}

impl ValidationResultType {
    /// Parse a rule event type. Returns `None` for unrecognized types.
    pub fn from_event_type(event_type: &str) -> Option<Self> {
        match event_type {
            "violation" => Some(Self::Violation),
            "warning" => Some(Self::Warning),
            "requirement" => Some(Self::Requirement),
            "information" => Some(Self::Information),
            "cost" => Some(Self::Cost),
            _ => None,
        }
    }

    /// The document spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Violation => "violation",
            Self::Warning => "warning",
            Self::Requirement => "requirement",
            Self::Information => "information",
            Self::Cost => "cost",
        }
    }
}

impl std::fmt::Display for ValidationResultType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Severity.
    #[serde(rename = "type")]
    pub result_type: ValidationResultType,
    /// Machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Application field the finding refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_reference: Option<String>,
    /// Amount, for cost findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl ValidationResult {
    /// A finding of the given type.
    pub fn new(
        result_type: ValidationResultType,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            result_type,
            code: code.into(),
            message: message.into(),
            field_reference: None,
            cost: None,
        }
    }

    /// A violation.
    pub fn violation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationResultType::Violation, code, message)
    }

    /// An informational note.
    pub fn information(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ValidationResultType::Information, code, message)
    }

    /// A cost finding carrying `amount`.
    pub fn cost(code: impl Into<String>, message: impl Into<String>, amount: f64) -> Self {
        Self {
            cost: Some(amount),
            ..Self::new(ValidationResultType::Cost, code, message)
        }
    }

    /// Attach a field reference.
    pub fn with_field_reference(mut self, field: impl Into<String>) -> Self {
        self.field_reference = Some(field.into());
        self
    }
}

/// Findings of one validation, partitioned by severity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResults {
    /// Violations.
    #[serde(default)]
    pub violations: Vec<ValidationResult>,
    /// Requirements.
    #[serde(default)]
    pub requirements: Vec<ValidationResult>,
    /// Warnings.
    #[serde(default)]
    pub warnings: Vec<ValidationResult>,
    /// Informational notes.
    #[serde(default)]
    pub information: Vec<ValidationResult>,
    /// Cost findings.
    #[serde(default)]
    pub cost: Vec<ValidationResult>,
}

impl ValidationResults {
    /// An empty result document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding to the bucket matching its type.
    pub fn push(&mut self, result: ValidationResult) {
        let bucket = match result.result_type {
            ValidationResultType::Violation => &mut self.violations,
            ValidationResultType::Warning => &mut self.warnings,
            ValidationResultType::Requirement => &mut self.requirements,
            ValidationResultType::Information => &mut self.information,
            ValidationResultType::Cost => &mut self.cost,
        };
        bucket.push(result);
    }

    /// No violations were found.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Sum of every cost finding.
    pub fn total_cost(&self) -> f64 {
        self.cost.iter().filter_map(|c| c.cost).sum()
    }
}
