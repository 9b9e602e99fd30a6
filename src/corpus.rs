use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::{classify_file, validate_patterns, LintConfig};
use crate::errors::{LintError, Result};
use crate::types::{ComponentType, Document, Frontmatter};

/// Splits a leading `---` delimited frontmatter block from the body.
///
/// Returns `None` for the block when the text has no frontmatter or the
/// block is never closed.
pub fn split_frontmatter(text: &str) -> (Option<&str>, &str) {
    let rest = match text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    {
        Some(rest) => rest,
        None => return (None, text),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body = &rest[offset + line.len()..];
            return (Some(&rest[..offset]), body);
        }
        offset += line.len();
    }
    (None, text)
}

/// Parses a YAML frontmatter block into a key-value map.
///
/// Anything that is not a YAML mapping produces an error message.
pub fn parse_frontmatter(block: &str) -> std::result::Result<Frontmatter, String> {
    if block.trim().is_empty() {
        return Ok(Frontmatter::new());
    }
    serde_yaml::from_str::<Frontmatter>(block).map_err(|e| e.to_string())
}

/// Builds a document from its relative path and raw text, parsing the
/// frontmatter. Unparsable frontmatter leaves the map empty.
pub fn document_from_text(
    root: &Path,
    relative_path: &str,
    component_type: ComponentType,
    raw_text: String,
) -> Document {
    let frontmatter = match split_frontmatter(&raw_text).0.map(parse_frontmatter) {
        Some(Ok(map)) => map,
        Some(Err(e)) => {
            warn!(file = relative_path, error = %e, "ignoring unparsable frontmatter");
            Frontmatter::new()
        }
        None => Frontmatter::new(),
    };
    Document {
        path: root.join(relative_path),
        relative_path: relative_path.to_string(),
        component_type,
        raw_text,
        frontmatter,
    }
}

/// Discovers and loads every document under `root`.
///
/// Hidden directories below the root are skipped. Documents are returned
/// sorted by relative path so runs over the same tree are identical.
pub fn load_corpus(root: &Path, config: &LintConfig) -> Result<Vec<Document>> {
    validate_patterns(config)?;

    let mut docs = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable directory entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel_str = relative.to_string_lossy().replace('\\', "/");
        let Some(component_type) = classify_file(&rel_str, config) else {
            continue;
        };

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        if size > config.max_file_size {
            warn!(file = %rel_str, size, "skipping oversized file");
            continue;
        }

        let raw_text = std::fs::read_to_string(entry.path()).map_err(|e| LintError::File {
            message: e.to_string(),
            path: rel_str.clone(),
        })?;
        docs.push(document_from_text(root, &rel_str, component_type, raw_text));
    }

    docs.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!(root = %root.display(), documents = docs.len(), "corpus loaded");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_frontmatter() {
        let (fm, body) = split_frontmatter("---\nname: a\n---\nbody\n");
        assert_eq!(fm, Some("name: a\n"));
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_split_frontmatter_unclosed() {
        let text = "---\nname: a\nbody\n";
        assert_eq!(split_frontmatter(text), (None, text));
    }

    #[test]
    fn test_parse_frontmatter_list_and_string() {
        let fm = parse_frontmatter("skills: [a, b]\ntools: Read, Task(x)\n").unwrap();
        assert_eq!(fm["skills"], serde_json::json!(["a", "b"]));
        assert_eq!(fm["tools"], serde_json::json!("Read, Task(x)"));
    }

    #[test]
    fn test_parse_frontmatter_rejects_scalar() {
        assert!(parse_frontmatter("just text").is_err());
    }
}
