use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Kinds of documents in the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Agent,
    Command,
    Skill,
    Rule,
    ReferenceDoc,
}

#[allow(clippy::should_implement_trait)]
impl ComponentType {
    /// All component types, in discovery order.
    pub const ALL: [ComponentType; 5] = [
        ComponentType::Agent,
        ComponentType::Command,
        ComponentType::Skill,
        ComponentType::Rule,
        ComponentType::ReferenceDoc,
    ];

    /// Returns the string representation of this component type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Agent => "agent",
            ComponentType::Command => "command",
            ComponentType::Skill => "skill",
            ComponentType::Rule => "rule",
            ComponentType::ReferenceDoc => "reference",
        }
    }

    /// Parses a string into a `ComponentType`, returning `None` for unrecognized values.
    pub fn from_str(s: &str) -> Option<ComponentType> {
        match s.to_ascii_lowercase().as_str() {
            "agent" | "agents" => Some(ComponentType::Agent),
            "command" | "commands" => Some(ComponentType::Command),
            "skill" | "skills" => Some(ComponentType::Skill),
            "rule" | "rules" => Some(ComponentType::Rule),
            "reference" | "references" | "reference_doc" => Some(ComponentType::ReferenceDoc),
            _ => None,
        }
    }

    /// The corpus-relative path a document with this type and name is expected at.
    ///
    /// Used in dangling-reference messages so the fix is a single file to create.
    pub fn expected_path(&self, name: &str) -> String {
        match self {
            ComponentType::Agent => format!("agents/{name}.md"),
            ComponentType::Command => format!("commands/{name}.md"),
            ComponentType::Skill => format!("skills/{name}/SKILL.md"),
            ComponentType::Rule => format!("rules/{name}.md"),
            ComponentType::ReferenceDoc => format!("skills/<skill>/references/{name}.md"),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed frontmatter of a document.
pub type Frontmatter = BTreeMap<String, serde_json::Value>;

/// A frontmatter value that may be written either as a single string or as a
/// list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringOrArray {
    String(String),
    Array(Vec<String>),
}

impl StringOrArray {
    /// Reads a frontmatter value, returning `None` for anything that is neither
    /// a string nor an array. Non-string array items are ignored.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(StringOrArray::String(s.clone())),
            serde_json::Value::Array(items) => Some(StringOrArray::Array(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Normalizes to a list of trimmed, non-empty entries. A plain string is
    /// split on commas.
    pub fn into_vec(self) -> Vec<String> {
        let raw = match self {
            StringOrArray::String(s) => s.split(',').map(str::to_string).collect(),
            StringOrArray::Array(items) => items,
        };
        raw.into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// A single document of the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub path: PathBuf,
    pub relative_path: String,
    pub component_type: ComponentType,
    pub raw_text: String,
    pub frontmatter: Frontmatter,
}

impl Document {
    /// Creates a document with an empty frontmatter map. `path` and
    /// `relative_path` are both set to `relative_path`.
    pub fn new(relative_path: &str, component_type: ComponentType, raw_text: &str) -> Self {
        Self {
            path: PathBuf::from(relative_path),
            relative_path: relative_path.to_string(),
            component_type,
            raw_text: raw_text.to_string(),
            frontmatter: Frontmatter::new(),
        }
    }

    /// Replaces the frontmatter map.
    pub fn with_frontmatter(mut self, frontmatter: Frontmatter) -> Self {
        self.frontmatter = frontmatter;
        self
    }

    /// The graph key of this document.
    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.component_type, &self.canonical_name())
    }

    /// Derives the canonical name from the relative path: the directory name
    /// for `SKILL.md` files, otherwise the file stem.
    pub fn canonical_name(&self) -> String {
        let path = Path::new(&self.relative_path);
        let is_skill_file = path
            .file_name()
            .map(|f| f.eq_ignore_ascii_case("SKILL.md"))
            .unwrap_or(false);
        if self.component_type == ComponentType::Skill && is_skill_file {
            if let Some(dir) = path.parent().and_then(|p| p.file_name()) {
                return dir.to_string_lossy().to_string();
            }
        }
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.relative_path.clone())
    }

    /// Name of the skill whose directory contains this document, if any.
    pub fn owner_skill(&self) -> Option<String> {
        owner_skill(&self.relative_path).map(str::to_string)
    }

    /// Number of lines in the raw text.
    pub fn line_count(&self) -> usize {
        self.raw_text.lines().count()
    }
}

/// Identifies a graph node: component type plus canonical name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub component_type: ComponentType,
    pub name: String,
}

impl NodeKey {
    pub fn new(component_type: ComponentType, name: &str) -> Self {
        Self {
            component_type,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.component_type, self.name)
    }
}

/// Syntactic form that produced a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    InlineMarker,
    FunctionCall,
    FrontmatterField,
    RoutingCell,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::InlineMarker => "inline_marker",
            ReferenceKind::FunctionCall => "function_call",
            ReferenceKind::FrontmatterField => "frontmatter_field",
            ReferenceKind::RoutingCell => "routing_cell",
        }
    }
}

/// An extracted, unresolved reference from one document to a named component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMention {
    /// Relative path of the document the mention was found in.
    pub source: String,
    pub target_name: String,
    pub target_type: ComponentType,
    pub kind: ReferenceKind,
    /// 1-based line in the raw text; `None` for frontmatter mentions.
    pub line: Option<u32>,
}

/// Diagnostic severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Suggestion => "suggestion",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source tag attached to every diagnostic produced by the cross-file validator.
pub const CROSSFILE_SOURCE: &str = "crossfile";

/// Stable rule identifiers.
pub mod rules {
    pub const DANGLING_REFERENCE: &str = "dangling-reference";
    pub const REFERENCE_CYCLE: &str = "reference-cycle";
    pub const ORPHANED_SKILL: &str = "orphaned-skill";
    pub const GHOST_TRIGGER: &str = "ghost-trigger";
    pub const TRIGGER_CONFLICT: &str = "trigger-conflict";
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: Option<u32>,
    pub message: String,
    pub severity: Severity,
    pub source: String,
    pub rule: String,
    /// The name or keyword the diagnostic is about; secondary sort key.
    pub subject: String,
}

impl Diagnostic {
    pub fn new(rule: &str, severity: Severity, file: &str, subject: &str, message: String) -> Self {
        Self {
            file: file.to_string(),
            line: None,
            message,
            severity,
            source: CROSSFILE_SOURCE.to_string(),
            rule: rule.to_string(),
            subject: subject.to_string(),
        }
    }

    pub fn at_line(mut self, line: Option<u32>) -> Self {
        self.line = line;
        self
    }

    /// Stable identity of the finding, independent of line numbers and
    /// message wording.
    pub fn fingerprint(&self) -> String {
        let input = format!("{}:{}:{}", self.rule, self.file, self.subject);
        let mut hasher = Sha256::new();
        hasher.update(input.as_bytes());
        hex::encode(hasher.finalize())[..32].to_string()
    }

    /// Sort key giving the deterministic output order.
    pub(crate) fn sort_key(&self) -> (&str, &str, &str, &str) {
        (&self.file, &self.subject, &self.rule, &self.message)
    }
}

/// A closed walk in the reference graph. The walk returns from the last node
/// to the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cycle {
    pub nodes: Vec<NodeKey>,
}

impl Cycle {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Participant types joined by arrows, e.g. `agent → agent → skill`.
    pub fn type_signature(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.component_type.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// Full walk including the closing node, e.g. `a → b → a`.
    pub fn path_display(&self) -> String {
        let mut parts: Vec<String> = self.nodes.iter().map(|n| n.to_string()).collect();
        if let Some(first) = self.nodes.first() {
            parts.push(first.to_string());
        }
        parts.join(" → ")
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        self.nodes.contains(key)
    }
}

/// A node of a forward-reference tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub component_type: ComponentType,
    pub name: String,
    pub line_count: usize,
    pub children: Vec<ChainLink>,
}

impl ChainLink {
    /// Total number of links in the tree, including this one.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ChainLink::size).sum::<usize>()
    }
}

/// Kind of component a trigger routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerTargetKind {
    Skill,
    Agent,
}

impl TriggerTargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerTargetKind::Skill => "skill",
            TriggerTargetKind::Agent => "agent",
        }
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            TriggerTargetKind::Skill => ComponentType::Skill,
            TriggerTargetKind::Agent => ComponentType::Agent,
        }
    }
}

/// One keyword → target row of a trigger table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMapping {
    pub source_file: String,
    pub keyword: String,
    pub target: String,
    pub target_kind: TriggerTargetKind,
    pub line: u32,
}

/// Counts describing one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub document_count: usize,
    pub mention_count: usize,
    pub resolved_count: usize,
    pub allow_listed_count: usize,
    pub dangling_count: usize,
    pub edge_count: usize,
    pub trigger_mapping_count: usize,
}

/// Everything one validation run produces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
    pub cycles: Vec<Cycle>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

/// Name of the skill directory a corpus-relative path lies in, if any.
pub fn owner_skill(relative_path: &str) -> Option<&str> {
    let mut parts = relative_path.split('/');
    while let Some(part) = parts.next() {
        if part == "skills" {
            return parts.next();
        }
    }
    None
}

/// Sorts diagnostics into the deterministic output order.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
}

/// 1-based line number of a byte offset within `text`.
pub fn line_of_offset(text: &str, offset: usize) -> u32 {
    let end = offset.min(text.len());
    text.as_bytes()[..end].iter().filter(|b| **b == b'\n').count() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_canonical_name_is_directory() {
        let doc = Document::new("skills/code-review/SKILL.md", ComponentType::Skill, "");
        assert_eq!(doc.canonical_name(), "code-review");
    }

    #[test]
    fn test_agent_canonical_name_is_stem() {
        let doc = Document::new("agents/nested/planner.md", ComponentType::Agent, "");
        assert_eq!(doc.canonical_name(), "planner");
    }

    #[test]
    fn test_owner_skill() {
        let doc = Document::new(
            "skills/routing/references/triggers.md",
            ComponentType::ReferenceDoc,
            "",
        );
        assert_eq!(doc.owner_skill().as_deref(), Some("routing"));
        let agent = Document::new("agents/a.md", ComponentType::Agent, "");
        assert_eq!(agent.owner_skill(), None);
    }

    #[test]
    fn test_string_or_array_normalizes_both_forms() {
        let s = StringOrArray::from_value(&serde_json::json!("a, b ,c")).unwrap();
        let a = StringOrArray::from_value(&serde_json::json!(["a", " b", "c", 7])).unwrap();
        assert_eq!(s.into_vec(), vec!["a", "b", "c"]);
        assert_eq!(a.into_vec(), vec!["a", "b", "c"]);
        assert!(StringOrArray::from_value(&serde_json::json!(3)).is_none());
    }

    #[test]
    fn test_cycle_signature_and_path() {
        let cycle = Cycle {
            nodes: vec![
                NodeKey::new(ComponentType::Agent, "a"),
                NodeKey::new(ComponentType::Skill, "b"),
            ],
        };
        assert_eq!(cycle.type_signature(), "agent → skill");
        assert_eq!(cycle.path_display(), "agent:a → skill:b → agent:a");
    }

    #[test]
    fn test_fingerprint_ignores_line() {
        let d = Diagnostic::new(
            rules::DANGLING_REFERENCE,
            Severity::Error,
            "agents/a.md",
            "ghost",
            "msg".to_string(),
        );
        let moved = d.clone().at_line(Some(42));
        assert_eq!(d.fingerprint(), moved.fingerprint());
        assert_eq!(d.fingerprint().len(), 32);
    }

    #[test]
    fn test_line_of_offset() {
        let text = "one\ntwo\nthree";
        assert_eq!(line_of_offset(text, 0), 1);
        assert_eq!(line_of_offset(text, 4), 2);
        assert_eq!(line_of_offset(text, 9), 3);
    }
}
