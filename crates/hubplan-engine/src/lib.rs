//! Upgrade decision engine for hubplan.
//!
//! Maps the paths changed by a commit or pull request to the helm upgrades
//! they require:
//! - Classification of each path against an ordered rule table
//! - Resolution of the resulting implications against the catalog
//! - Merging into deduplicated support, staging and prod job lists

pub mod diagnostic;
pub mod engine;
pub mod rules;

pub use diagnostic::{Diagnostic, Reference, Severity};
pub use engine::{Decision, DecisionEngine, DecisionOptions, decide, normalize_paths};
pub use rules::{Implication, RULES, Rule, Scope, classify};
