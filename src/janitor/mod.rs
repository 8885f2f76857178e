//! Branch lifecycle engine
//!
//! Stateless predicates (`patterns`, `staleness`, `deskcheck`) feed the
//! reconciler, which hands deletions to `delete` and escalations to
//! `approval`.

mod approval;
mod delete;
mod deskcheck;
mod patterns;
mod reconcile;
mod staleness;
mod summary;

pub use approval::{
    ApprovalOutcome, ApprovalReport, ApprovalWorkflow, DEFAULT_POLL_INTERVAL, Decision,
    approval_body, approval_title, report_body, resolve_decision,
};
pub use delete::BranchDeleter;
pub use deskcheck::DeskCheck;
pub use patterns::PatternSet;
pub use reconcile::{BranchReconciler, DeletionRoute, PrAction, ReconcileReport};
pub use staleness::Staleness;
pub use summary::Summary;
