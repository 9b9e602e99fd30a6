/// Trigger-table parsing.
pub mod table;

/// Ghost-target and conflict checks over parsed trigger tables.
pub mod check;

pub use check::{check_ghost_targets, detect_conflicts};
pub use table::parse_trigger_tables;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::types::{ComponentType, Document, TriggerMapping};

/// Default glob, relative to a skill directory, for auxiliary reference files.
pub const DEFAULT_REFERENCE_GLOB: &str = "references/*.md";

/// An auxiliary file scanned for trigger tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSource {
    pub relative_path: String,
    pub text: String,
}

/// Collects the reference files to scan: every `ReferenceDoc` already in the
/// corpus, plus files matching `reference_glob` under each skill directory
/// when a corpus root is known. Sources are de-duplicated by path and sorted.
///
/// Files that cannot be read are skipped.
pub fn collect_reference_sources(
    docs: &[Document],
    root: Option<&Path>,
    reference_glob: &str,
) -> Vec<ReferenceSource> {
    let mut sources: BTreeMap<String, String> = BTreeMap::new();

    for doc in docs
        .iter()
        .filter(|d| d.component_type == ComponentType::ReferenceDoc)
    {
        sources.insert(doc.relative_path.clone(), doc.raw_text.clone());
    }

    if let Some(root) = root {
        for skill in docs
            .iter()
            .filter(|d| d.component_type == ComponentType::Skill)
        {
            let Some(skill_dir) = Path::new(&skill.relative_path).parent() else {
                continue;
            };
            let pattern = root.join(skill_dir).join(reference_glob);
            let pattern = pattern.to_string_lossy();
            let entries = match glob::glob(&pattern) {
                Ok(entries) => entries,
                Err(e) => {
                    debug!(pattern = %pattern, error = %e, "invalid reference glob");
                    continue;
                }
            };
            for path in entries.flatten() {
                let relative = match path.strip_prefix(root) {
                    Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
                    Err(_) => continue,
                };
                if sources.contains_key(&relative) {
                    continue;
                }
                match std::fs::read_to_string(&path) {
                    Ok(text) => {
                        sources.insert(relative, text);
                    }
                    Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable reference file"),
                }
            }
        }
    }

    sources
        .into_iter()
        .map(|(relative_path, text)| ReferenceSource {
            relative_path,
            text,
        })
        .collect()
}

/// Parses the trigger tables of every source, in source order.
pub fn collect_trigger_mappings(sources: &[ReferenceSource]) -> Vec<TriggerMapping> {
    sources
        .iter()
        .flat_map(|s| parse_trigger_tables(&s.relative_path, &s.text))
        .collect()
}
