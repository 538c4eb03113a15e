#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Pure authorization decisions.
//!
//! This crate knows nothing about tokens, storage or transports. It answers
//! one question: given an (optional) [`Subject`] and an operation, is the
//! caller allowed? Decisions come from two immutable [`PolicyTable`]s, one
//! consulted before the business call (operation level) and one consulted
//! against the concrete request object (object level).

pub mod checker;
pub mod error;
pub mod evaluator;
pub mod operation;
pub mod policy_table;
pub mod subject;
pub mod target;

pub use checker::{Builtin, Checker, ObjectChecker};
pub use error::{PolicyError, PolicyLevel};
pub use evaluator::PermissionEvaluator;
pub use operation::OperationId;
pub use policy_table::{ObjectPolicy, OperationPolicy, PolicyTable, PolicyTableBuilder};
pub use subject::Subject;
pub use target::{ResourceKind, Target};
