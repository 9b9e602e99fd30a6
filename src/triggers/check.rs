use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::resolution::{ReferenceResolver, Resolution};
use crate::types::*;

/// Reports trigger targets that resolve to no document.
///
/// Each missing target is reported once per file, on the first row naming
/// it. Allow-listed names are exempt.
pub fn check_ghost_targets(
    mappings: &[TriggerMapping],
    resolver: &ReferenceResolver<'_>,
) -> Vec<Diagnostic> {
    let mut reported: HashSet<(&str, TriggerTargetKind, &str)> = HashSet::new();
    let mut diagnostics = Vec::new();

    for mapping in mappings {
        let component_type = mapping.target_kind.component_type();
        if resolver.resolve_name(component_type, &mapping.target) != Resolution::Dangling {
            continue;
        }
        if !reported.insert((
            mapping.source_file.as_str(),
            mapping.target_kind,
            mapping.target.as_str(),
        )) {
            continue;
        }
        diagnostics.push(
            Diagnostic::new(
                rules::GHOST_TRIGGER,
                Severity::Error,
                &mapping.source_file,
                &mapping.target,
                format!(
                    "trigger '{}' routes to {} '{}' which does not exist; create {}",
                    mapping.keyword,
                    mapping.target_kind.as_str(),
                    mapping.target,
                    component_type.expected_path(&mapping.target),
                ),
            )
            .at_line(Some(mapping.line)),
        );
    }

    diagnostics
}

/// Reports keywords that route to more than one distinct target across the
/// corpus.
///
/// One warning per keyword, filed against the first source file in path
/// order. The same keyword routing to the same target from several files is
/// not a conflict.
pub fn detect_conflicts(mappings: &[TriggerMapping]) -> Vec<Diagnostic> {
    let mut by_keyword: BTreeMap<String, Vec<&TriggerMapping>> = BTreeMap::new();
    for mapping in mappings {
        by_keyword
            .entry(mapping.keyword.to_lowercase())
            .or_default()
            .push(mapping);
    }

    let mut diagnostics = Vec::new();
    for (keyword, group) in by_keyword {
        let distinct: BTreeSet<(TriggerTargetKind, &str)> = group
            .iter()
            .map(|m| (m.target_kind, m.target.as_str()))
            .collect();
        if distinct.len() < 2 {
            continue;
        }

        let entries: BTreeSet<(&str, &str, TriggerTargetKind)> = group
            .iter()
            .map(|m| (m.source_file.as_str(), m.target.as_str(), m.target_kind))
            .collect();
        let Some((first_file, _, _)) = entries.iter().next() else {
            continue;
        };
        let listing = entries
            .iter()
            .map(|(file, target, kind)| format!("{} ({}) in {}", target, kind.as_str(), file))
            .collect::<Vec<_>>()
            .join("; ");

        diagnostics.push(Diagnostic::new(
            rules::TRIGGER_CONFLICT,
            Severity::Warning,
            first_file,
            &keyword,
            format!(
                "trigger '{}' routes to {} different targets: {}",
                keyword,
                distinct.len(),
                listing
            ),
        ));
    }

    diagnostics
}
