use crate::resolution::{CorpusIndex, ResolvedMention};
use crate::types::*;

/// Reports skills that nothing else in the corpus refers to.
///
/// A skill counts as referenced if it is the target of a resolved mention,
/// or if its name appears as a whole word in any other document's text (plain
/// "see also" prose counts). References from the skill itself, including
/// files inside its own directory, are ignored. Ownership is decided from the
/// path of the file that made the mention, since several reference files may
/// share one graph key.
pub fn find_orphaned_skills(
    resolved: &[ResolvedMention],
    index: &CorpusIndex<'_>,
    docs: &[Document],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for key in index.keys_of(ComponentType::Skill) {
        let Some(skill_doc) = index.get(key) else {
            continue;
        };

        let has_edge = resolved.iter().any(|edge| {
            edge.target == *key && !is_self_reference(key, &edge.source, &edge.mention.source)
        });
        if has_edge {
            continue;
        }

        let has_prose = docs.iter().any(|doc| {
            !is_self_reference(key, &doc.key(), &doc.relative_path)
                && mentions_name(&doc.raw_text, &key.name)
        });
        if has_prose {
            continue;
        }

        diagnostics.push(Diagnostic::new(
            rules::ORPHANED_SKILL,
            Severity::Info,
            &skill_doc.relative_path,
            &key.name,
            format!(
                "skill '{}' has no incoming references; no agent, command, skill or rule mentions it",
                key.name
            ),
        ));
    }

    diagnostics
}

fn is_self_reference(skill: &NodeKey, source: &NodeKey, source_path: &str) -> bool {
    source == skill || owner_skill(source_path) == Some(skill.name.as_str())
}

/// Returns `true` if `name` occurs in `text` delimited by characters that
/// cannot be part of an identifier.
pub fn mentions_name(text: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_';
    text.match_indices(name).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + name.len()..].chars().next();
        !before.map(is_ident).unwrap_or(false) && !after.map(is_ident).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_name_requires_word_boundary() {
        assert!(mentions_name("see also foo for details", "foo"));
        assert!(mentions_name("`foo`", "foo"));
        assert!(mentions_name("skills/foo/SKILL.md", "foo"));
        assert!(!mentions_name("foobar", "foo"));
        assert!(!mentions_name("foo-bar", "foo"));
        assert!(!mentions_name("my_foo", "foo"));
        assert!(!mentions_name("anything", ""));
    }
}
