#![deny(missing_docs)]
//! # permit-rules — Rule Evaluation
//!
//! Evaluates the declarative rules of a policy document against a permit
//! application.
//!
//! ## Modules
//!
//! - **Engine** (`engine.rs`): per-permit-type compiled rule sets, event
//!   routing into result buckets, cost findings and the no-fee waiver.
//!
//! - **Facts** (`facts.rs`): the call-scoped fact environment: evaluation
//!   date, permit-year length, end of quarter, configuration validity and
//!   application fields.
//!
//! - **Cost** (`cost.rs`): the named fee computations.
//!
//! - **Condition** (`condition.rs`), **Operators** (`operators.rs`) and
//!   **Path** (`path.rs`): condition tree evaluation over JSON values.
//!
//! ## Design
//!
//! Compiled rule sets hold no runtime state. Everything that varies per
//! evaluation (today's date, facts derived from the application) lives in a
//! [`Facts`] value owned by the caller, so one compiled set serves any
//! number of concurrent evaluations.

pub mod condition;
pub mod cost;
pub mod engine;
pub mod facts;
pub mod operators;
pub mod path;

pub use condition::holds;
pub use cost::{billable_months, CostFact};
pub use engine::{waive_fees, CompiledCostRule, CompiledRuleSet, COST_CODE, COST_MESSAGE, NO_FEE_CODE};
pub use facts::{days_in_permit_year, end_of_quarter, Facts};
