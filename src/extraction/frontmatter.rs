use crate::types::{ComponentType, Document, ReferenceKind, StringOrArray};

use super::rules::{is_static_identifier, CompiledRule};

/// A reference found in frontmatter, before de-duplication.
pub(super) struct FieldReference {
    pub name: String,
    pub target: ComponentType,
}

/// Frontmatter keys whose entries are scanned for function-call references.
const TOOL_FIELDS: &[&str] = &["tools", "allowed-tools"];

/// Extracts references from the `skills`, `tools` / `allowed-tools` and
/// `agent` frontmatter fields, in that order.
pub(super) fn extract_field_references(
    doc: &Document,
    call_rules: &[CompiledRule],
) -> Vec<FieldReference> {
    let mut refs = Vec::new();

    for name in field_entries(doc, "skills") {
        if is_static_identifier(&name) {
            refs.push(FieldReference {
                name,
                target: ComponentType::Skill,
            });
        }
    }

    for field in TOOL_FIELDS {
        for entry in field_entries(doc, field) {
            for compiled in call_rules
                .iter()
                .filter(|c| c.rule.kind == ReferenceKind::FunctionCall)
            {
                for caps in compiled.regex.captures_iter(&entry) {
                    if let Some(m) = caps.get(1) {
                        if is_static_identifier(m.as_str()) {
                            refs.push(FieldReference {
                                name: m.as_str().to_string(),
                                target: compiled.rule.target,
                            });
                        }
                    }
                }
            }
        }
    }

    for name in field_entries(doc, "agent") {
        if is_static_identifier(&name) {
            refs.push(FieldReference {
                name,
                target: ComponentType::Agent,
            });
        }
    }

    refs
}

/// Normalized entries of a string-or-list frontmatter field. The tool fields
/// are not split on commas since call arguments may contain them.
fn field_entries(doc: &Document, key: &str) -> Vec<String> {
    let Some(value) = doc.frontmatter.get(key) else {
        return Vec::new();
    };
    match StringOrArray::from_value(value) {
        Some(StringOrArray::String(s)) if TOOL_FIELDS.contains(&key) => vec![s],
        Some(v) => v.into_vec(),
        None => Vec::new(),
    }
}
