/// Pattern rules used to find references in document bodies.
///
/// Every rule captures the referenced name in group 1. Captures are taken
/// wide on purpose and filtered afterwards by [`is_static_identifier`], so an
/// interpolated argument such as `Task(${agent})` is matched (and its slot
/// consumed) but never reported.
use regex::Regex;

use crate::errors::{LintError, Result};
use crate::types::{ComponentType, ReferenceKind};

/// Component types whose bodies delegate to other components.
const DELEGATING: &[ComponentType] = &[
    ComponentType::Agent,
    ComponentType::Command,
    ComponentType::Skill,
    ComponentType::Rule,
];

/// A data-described extraction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionRule {
    /// Short identifier, used in logs.
    pub name: &'static str,
    pub kind: ReferenceKind,
    pub target: ComponentType,
    /// Lower runs first. Spans matched by a lower-priority-number rule are
    /// not re-matched by later rules.
    pub priority: u8,
    pub pattern: &'static str,
    /// Source component types this rule is applied to.
    pub applies_to: &'static [ComponentType],
}

/// The built-in rule table.
pub const DEFAULT_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "task-call",
        kind: ReferenceKind::FunctionCall,
        target: ComponentType::Agent,
        priority: 10,
        pattern: r#"\bTask\(\s*(?:subagent_type\s*[=:]\s*)?["']?([^"'\s,)]+)["']?\s*[,)]"#,
        applies_to: DELEGATING,
    },
    ExtractionRule {
        name: "skill-call",
        kind: ReferenceKind::FunctionCall,
        target: ComponentType::Skill,
        priority: 10,
        pattern: r#"\bSkill\(\s*(?:skill\s*[=:]\s*)?["']?([^"'\s,)]+)["']?\s*[,)]"#,
        applies_to: DELEGATING,
    },
    ExtractionRule {
        name: "slash-command-call",
        kind: ReferenceKind::FunctionCall,
        target: ComponentType::Command,
        priority: 10,
        pattern: r#"\bSlashCommand\(\s*["']?/?([^"'\s,)]+)[^)\n]*\)"#,
        applies_to: &[
            ComponentType::Agent,
            ComponentType::Command,
            ComponentType::Skill,
        ],
    },
    ExtractionRule {
        name: "subagent-type-marker",
        kind: ReferenceKind::InlineMarker,
        target: ComponentType::Agent,
        priority: 20,
        pattern: r#"\bsubagent_type\s*[=:]\s*["']([^"'\n]+)["']"#,
        applies_to: DELEGATING,
    },
    // A lone lowercase identifier only; prose after `Skill:` is not a reference.
    ExtractionRule {
        name: "skill-marker",
        kind: ReferenceKind::InlineMarker,
        target: ComponentType::Skill,
        priority: 30,
        pattern: r"(?m)^[ \t]*(?:[-*][ \t]+)?\*{0,2}Skill\*{0,2}:\*{0,2}[ \t]*`?([a-z0-9][a-z0-9_-]*)(?:`|[ \t]*[,;(]|\.?[ \t]*\r?$)",
        applies_to: DELEGATING,
    },
];

/// A rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub rule: ExtractionRule,
    pub regex: Regex,
}

/// Compiles a rule table, sorted by priority. Ties keep table order.
pub fn compile_rules(rules: &[ExtractionRule]) -> Result<Vec<CompiledRule>> {
    let mut compiled = rules
        .iter()
        .map(|rule| {
            Regex::new(rule.pattern)
                .map(|regex| CompiledRule { rule: *rule, regex })
                .map_err(|e| LintError::Pattern {
                    message: format!("invalid extraction rule '{}': {}", rule.name, e),
                    pattern: rule.pattern.to_string(),
                })
        })
        .collect::<Result<Vec<_>>>()?;
    compiled.sort_by_key(|c| c.rule.priority);
    Ok(compiled)
}

/// Characters that mark a capture as interpolated or otherwise dynamic.
const DYNAMIC_MARKERS: &[char] = &['.', '[', ']', '{', '}', '$', '<', '>', '%'];

/// Returns `true` if `name` is a literal component identifier that can be
/// checked against the corpus.
pub fn is_static_identifier(name: &str) -> bool {
    if name.is_empty() || name.contains(DYNAMIC_MARKERS) {
        return false;
    }
    let mut chars = name.chars();
    let first_ok = chars.next().map(|c| c.is_ascii_alphanumeric()).unwrap_or(false);
    first_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
