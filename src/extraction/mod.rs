mod frontmatter;
/// Pattern-table driven reference extraction.
///
/// Extraction is a pure function of one document and runs in parallel across
/// the corpus; the per-document results are merged in corpus order.
pub mod rules;

pub use rules::{compile_rules, is_static_identifier, CompiledRule, ExtractionRule, DEFAULT_RULES};

use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use rayon::prelude::*;
use tracing::debug;

use crate::errors::Result;
use crate::types::{line_of_offset, ComponentType, Document, ReferenceKind, ReferenceMention};

static DEFAULT_COMPILED: LazyLock<Vec<CompiledRule>> =
    LazyLock::new(|| compile_rules(DEFAULT_RULES).expect("built-in extraction rules compile"));

/// Extracts typed reference mentions from documents.
#[derive(Debug, Clone)]
pub struct MentionExtractor {
    rules: Vec<CompiledRule>,
}

impl MentionExtractor {
    /// Creates an extractor with the built-in rule table.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_COMPILED.clone(),
        }
    }

    /// Creates an extractor from a custom rule table.
    pub fn with_rules(rules: &[ExtractionRule]) -> Result<Self> {
        Ok(Self {
            rules: compile_rules(rules)?,
        })
    }

    /// The compiled rules, in the order they are applied.
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Extracts the mentions of a single document.
    ///
    /// Frontmatter fields are read first, then the body rules in priority
    /// order. Each `(target type, name)` pair is reported once, with the kind
    /// and line of its first occurrence.
    pub fn extract(&self, doc: &Document) -> Vec<ReferenceMention> {
        let mut seen: HashSet<(ComponentType, String)> = HashSet::new();
        let mut found: Vec<ReferenceMention> = Vec::new();

        for field_ref in frontmatter::extract_field_references(doc, &self.rules) {
            if seen.insert((field_ref.target, field_ref.name.clone())) {
                found.push(ReferenceMention {
                    source: doc.relative_path.clone(),
                    target_name: field_ref.name,
                    target_type: field_ref.target,
                    kind: ReferenceKind::FrontmatterField,
                    line: None,
                });
            }
        }

        let mut claimed: Vec<Range<usize>> = Vec::new();
        let mut body: Vec<(usize, ReferenceMention)> = Vec::new();

        for compiled in self
            .rules
            .iter()
            .filter(|c| c.rule.applies_to.contains(&doc.component_type))
        {
            let mut rule_claims = Vec::new();
            for caps in compiled.regex.captures_iter(&doc.raw_text) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                let span = whole.range();
                if claimed.iter().any(|c| overlaps(c, &span)) {
                    continue;
                }
                rule_claims.push(span);

                let name = name.as_str();
                if !is_static_identifier(name) {
                    debug!(
                        rule = compiled.rule.name,
                        file = %doc.relative_path,
                        capture = name,
                        "skipping dynamic reference"
                    );
                    continue;
                }
                body.push((
                    whole.start(),
                    ReferenceMention {
                        source: doc.relative_path.clone(),
                        target_name: name.to_string(),
                        target_type: compiled.rule.target,
                        kind: compiled.rule.kind,
                        line: Some(line_of_offset(&doc.raw_text, whole.start())),
                    },
                ));
            }
            claimed.extend(rule_claims);
        }

        // First-seen order is text order, not rule order.
        body.sort_by_key(|(offset, _)| *offset);
        for (_, mention) in body {
            if seen.insert((mention.target_type, mention.target_name.clone())) {
                found.push(mention);
            }
        }

        found
    }

    /// Extracts mentions from every document of the corpus in parallel,
    /// returning them in corpus order.
    pub fn extract_corpus(&self, docs: &[Document]) -> Vec<ReferenceMention> {
        let per_doc: Vec<Vec<ReferenceMention>> =
            docs.par_iter().map(|doc| self.extract(doc)).collect();
        let mentions: Vec<ReferenceMention> = per_doc.into_iter().flatten().collect();
        debug!(
            documents = docs.len(),
            mentions = mentions.len(),
            "extraction complete"
        );
        mentions
    }
}

impl Default for MentionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
