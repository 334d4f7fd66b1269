//! Relationship rules - operate on structural candidates from the ORM scan.

use crate::extract::StructuralKind;

use super::traits::{AnalyzedFragment, FileContext, Rule};
use super::types::{ReportIssue, Severity, Technique};

/// Marker that makes a mutating annotated query transactional.
const TRANSACTIONAL_MARKER: &str = "@Transactional";

pub struct NPlusOneRisk;

impl Rule for NPlusOneRisk {
    fn technique(&self) -> Technique {
        Technique::NPlusOneRisk
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Structural(candidate) = fragment else {
            return Vec::new();
        };
        let StructuralKind::RelationshipNoFetch { collection } = candidate.kind else {
            return Vec::new();
        };

        let (confidence, description) = if collection {
            (
                0.8,
                "Collection relationship without an explicit fetch strategy; iterating parents triggers one query per row",
            )
        } else {
            (
                0.7,
                "To-one relationship without an explicit fetch strategy; default eager loading widens every query",
            )
        };

        vec![ReportIssue::new(
            Severity::Warning,
            self.technique(),
            description,
            "Declare the fetch strategy explicitly and batch-load where needed",
            &candidate.context,
            confidence,
        )
        .with_location(ctx.location(candidate.span))]
    }
}

pub struct EagerCollectionFetch;

impl Rule for EagerCollectionFetch {
    fn technique(&self) -> Technique {
        Technique::EagerCollectionFetch
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Structural(candidate) = fragment else {
            return Vec::new();
        };
        if candidate.kind != StructuralKind::EagerCollection {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Warning,
            self.technique(),
            "Eagerly fetched collection combined with a bulk read loads every child row",
            "Use lazy fetching with an explicit fetch join on the bulk path",
            &candidate.context,
            0.7,
        )
        .with_location(ctx.location(candidate.span))]
    }
}

pub struct JoinWithoutFetch;

impl Rule for JoinWithoutFetch {
    fn technique(&self) -> Technique {
        Technique::JoinWithoutFetch
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Structural(candidate) = fragment else {
            return Vec::new();
        };
        if candidate.kind != StructuralKind::JoinNoFetch {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Info,
            self.technique(),
            "Annotated query joins an association without JOIN FETCH; the association loads separately",
            "Use JOIN FETCH when the association is consumed by the caller",
            &candidate.context,
            0.6,
        )
        .with_location(ctx.location(candidate.span))]
    }
}

pub struct ModifyingWithoutTransactional;

impl Rule for ModifyingWithoutTransactional {
    fn technique(&self) -> Technique {
        Technique::ModifyingWithoutTransactional
    }

    fn detect(&self, fragment: &AnalyzedFragment<'_>, ctx: &FileContext<'_>) -> Vec<ReportIssue> {
        let AnalyzedFragment::Structural(candidate) = fragment else {
            return Vec::new();
        };
        if candidate.kind != StructuralKind::UnmarkedMutation {
            return Vec::new();
        }
        // Full-file check: the marker may sit on the class rather than
        // inside the matched window.
        if ctx.source.contains(TRANSACTIONAL_MARKER) {
            return Vec::new();
        }

        vec![ReportIssue::new(
            Severity::Critical,
            self.technique(),
            "Modifying query without a transactional marker anywhere in the file",
            "Annotate the method or class as transactional",
            &candidate.context,
            0.9,
        )
        .with_location(ctx.location(candidate.span))]
    }
}
