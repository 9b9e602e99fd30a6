use crate::types::*;

use super::{AllowList, CorpusIndex};

/// Outcome of resolving one mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target exists in the corpus.
    Resolved(NodeKey),
    /// The target is a built-in runtime name.
    AllowListed,
    /// Nothing defines the target.
    Dangling,
}

/// A mention whose source and target are both indexed documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMention {
    pub mention: ReferenceMention,
    pub source: NodeKey,
    pub target: NodeKey,
}

/// Summary of resolving a batch of mentions.
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    pub resolved: Vec<ResolvedMention>,
    pub dangling: Vec<ReferenceMention>,
    pub allow_listed: usize,
    pub total: usize,
}

/// Resolves mentions against the corpus index.
///
/// Resolution is a pure lookup: the index is consulted first, and the
/// allow-list only on a miss, before a name is classified as dangling. A
/// document that shares a built-in name still becomes an edge. Nothing is
/// cached or mutated, so mentions may be resolved in any order.
pub struct ReferenceResolver<'a> {
    index: &'a CorpusIndex<'a>,
    allow_list: &'a AllowList,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(index: &'a CorpusIndex<'a>, allow_list: &'a AllowList) -> Self {
        Self { index, allow_list }
    }

    /// Resolves a single name of the given type.
    pub fn resolve_name(&self, target_type: ComponentType, name: &str) -> Resolution {
        let key = NodeKey::new(target_type, name);
        if self.index.contains(&key) {
            Resolution::Resolved(key)
        } else if self.allow_list.contains(name) {
            Resolution::AllowListed
        } else {
            Resolution::Dangling
        }
    }

    pub fn resolve_one(&self, mention: &ReferenceMention) -> Resolution {
        self.resolve_name(mention.target_type, &mention.target_name)
    }

    /// Resolves a batch of mentions. Mentions whose source document is not
    /// indexed can still be dangling but never become edges.
    pub fn resolve_all(&self, mentions: &[ReferenceMention]) -> ResolutionResult {
        let mut result = ResolutionResult {
            total: mentions.len(),
            ..Default::default()
        };

        for mention in mentions {
            match self.resolve_one(mention) {
                Resolution::AllowListed => result.allow_listed += 1,
                Resolution::Dangling => result.dangling.push(mention.clone()),
                Resolution::Resolved(target) => {
                    if let Some(source) = self.index.key_for_path(&mention.source) {
                        result.resolved.push(ResolvedMention {
                            mention: mention.clone(),
                            source: source.clone(),
                            target,
                        });
                    }
                }
            }
        }

        result
    }

    /// Builds the error reported for an unresolved mention. The message names
    /// the file that would satisfy the reference.
    pub fn dangling_diagnostic(mention: &ReferenceMention) -> Diagnostic {
        let form = match mention.kind {
            ReferenceKind::FrontmatterField => "frontmatter",
            ReferenceKind::FunctionCall => "call",
            ReferenceKind::InlineMarker => "marker",
            ReferenceKind::RoutingCell => "routing table",
        };
        let message = format!(
            "{} '{}' referenced by {} does not exist; create {}",
            mention.target_type,
            mention.target_name,
            form,
            mention.target_type.expected_path(&mention.target_name),
        );
        Diagnostic::new(
            rules::DANGLING_REFERENCE,
            Severity::Error,
            &mention.source,
            &mention.target_name,
            message,
        )
        .at_line(mention.line)
    }
}
