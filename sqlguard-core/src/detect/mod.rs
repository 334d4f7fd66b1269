//! Detection engine - a fixed registry of independent, stateless rules.
//!
//! Every rule is a pure function over (fragment, file context); there is no
//! shared state and no ordering dependency between rules, so the engine is
//! deterministic: the same fragment list yields the same issue list.

mod joins;
mod performance;
mod relationships;
mod safety;
mod traits;
mod types;

pub use traits::{is_test_path, AnalyzedFragment, FileContext, Rule};
pub use types::{IssueLocation, ReportIssue, Severity, Technique};

use joins::{JoinWithoutCondition, PotentialCartesianJoin};
use performance::{
    CountWithoutLimit, InefficientLikePattern, MultipleOrConditions, OrderByWithoutLimit,
    PotentialMissingIndex, SelectStarUsage,
};
use relationships::{
    EagerCollectionFetch, JoinWithoutFetch, ModifyingWithoutTransactional, NPlusOneRisk,
};
use safety::{MissingWhereClause, SqlInjectionRisk, UnparameterizedNativeQuery};

/// The full rule catalog, in evaluation order.
pub fn registry() -> &'static [&'static dyn Rule] {
    static RULES: &[&dyn Rule] = &[
        // Safety
        &SqlInjectionRisk,
        &MissingWhereClause,
        &UnparameterizedNativeQuery,
        // Performance
        &SelectStarUsage,
        &InefficientLikePattern,
        &CountWithoutLimit,
        &OrderByWithoutLimit,
        &MultipleOrConditions,
        &PotentialMissingIndex,
        // Joins
        &PotentialCartesianJoin,
        &JoinWithoutCondition,
        // Relationships (structural candidates only)
        &NPlusOneRisk,
        &EagerCollectionFetch,
        &JoinWithoutFetch,
        &ModifyingWithoutTransactional,
    ];
    RULES
}

/// Runs every rule against one fragment.
pub fn detect(fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
    registry()
        .iter()
        .flat_map(|rule| rule.detect(fragment, ctx))
        .collect()
}
