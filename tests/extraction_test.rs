use agentlint::extraction::{ExtractionRule, MentionExtractor};
use agentlint::types::*;

/// Helper: extract mentions from an in-memory document.
fn extract(path: &str, component_type: ComponentType, text: &str) -> Vec<ReferenceMention> {
    MentionExtractor::new().extract(&Document::new(path, component_type, text))
}

/// Helper: `(type, name)` pairs of a mention list, in order.
fn targets(mentions: &[ReferenceMention]) -> Vec<(ComponentType, &str)> {
    mentions
        .iter()
        .map(|m| (m.target_type, m.target_name.as_str()))
        .collect()
}

#[test]
fn test_task_call_quoted_and_unquoted() {
    let text = "First Task(planner).\nThen Task( \"reviewer\" ) and Task('tester', prompt).";
    let mentions = extract("agents/lead.md", ComponentType::Agent, text);
    assert_eq!(
        targets(&mentions),
        vec![
            (ComponentType::Agent, "planner"),
            (ComponentType::Agent, "reviewer"),
            (ComponentType::Agent, "tester"),
        ]
    );
    assert!(mentions.iter().all(|m| m.kind == ReferenceKind::FunctionCall));
    assert_eq!(mentions[0].line, Some(1));
    assert_eq!(mentions[1].line, Some(2));
}

#[test]
fn test_task_call_with_subagent_type_argument() {
    let mentions = extract(
        "commands/ship.md",
        ComponentType::Command,
        r#"Task(subagent_type="deployer")"#,
    );
    assert_eq!(targets(&mentions), vec![(ComponentType::Agent, "deployer")]);
    assert_eq!(mentions[0].kind, ReferenceKind::FunctionCall);
}

#[test]
fn test_subagent_marker_when_not_first_argument() {
    let mentions = extract(
        "commands/ship.md",
        ComponentType::Command,
        r#"Task(description="ship it", subagent_type="deployer")"#,
    );
    assert_eq!(targets(&mentions), vec![(ComponentType::Agent, "deployer")]);
    assert_eq!(mentions[0].kind, ReferenceKind::InlineMarker);
}

#[test]
fn test_skill_call_and_marker() {
    let text = "Use Skill(code-review) first.\n\nSkill: `test-strategy`\n- **Skill**: docs-writer\n";
    let mentions = extract("agents/lead.md", ComponentType::Agent, text);
    assert_eq!(
        targets(&mentions),
        vec![
            (ComponentType::Skill, "code-review"),
            (ComponentType::Skill, "test-strategy"),
            (ComponentType::Skill, "docs-writer"),
        ]
    );
    assert_eq!(mentions[0].kind, ReferenceKind::FunctionCall);
    assert_eq!(mentions[1].kind, ReferenceKind::InlineMarker);
}

#[test]
fn test_skill_marker_ignores_prose_and_accepts_bold_colon() {
    let text = "Skill: Use this agent for planning.\n**Skill:** code-review\n";
    let mentions = extract("agents/lead.md", ComponentType::Agent, text);
    assert_eq!(targets(&mentions), vec![(ComponentType::Skill, "code-review")]);
    assert_eq!(mentions[0].kind, ReferenceKind::InlineMarker);
    assert_eq!(mentions[0].line, Some(2));
}

#[test]
fn test_slash_command_call() {
    let mentions = extract(
        "agents/lead.md",
        ComponentType::Agent,
        "Run SlashCommand(/release patch) when done.",
    );
    assert_eq!(targets(&mentions), vec![(ComponentType::Command, "release")]);
}

#[test]
fn test_interpolated_arguments_are_ignored() {
    let text = "Task(${agent}) Task(config.agent) Task(agents[0]) Task(<agent-name>)";
    let mentions = extract("agents/lead.md", ComponentType::Agent, text);
    assert!(mentions.is_empty(), "got {:?}", mentions);
}

#[test]
fn test_duplicates_keep_first_occurrence() {
    let text = "Task(planner)\nTask(planner)\nsubagent_type: \"planner\"\n";
    let mentions = extract("agents/lead.md", ComponentType::Agent, text);
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].line, Some(1));
}

#[test]
fn test_text_order_is_preserved_across_rules() {
    let text = "Skill: alpha-skill\nTask(beta)\nSkill(gamma-skill)\n";
    let mentions = extract("agents/lead.md", ComponentType::Agent, text);
    assert_eq!(
        targets(&mentions),
        vec![
            (ComponentType::Skill, "alpha-skill"),
            (ComponentType::Agent, "beta"),
            (ComponentType::Skill, "gamma-skill"),
        ]
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let doc = Document::new(
        "agents/lead.md",
        ComponentType::Agent,
        "Task(a) Skill(b-c) subagent_type: 'd'",
    );
    let extractor = MentionExtractor::new();
    assert_eq!(extractor.extract(&doc), extractor.extract(&doc));
}

#[test]
fn test_reference_docs_have_no_body_rules() {
    let mentions = extract(
        "skills/x/references/notes.md",
        ComponentType::ReferenceDoc,
        "Task(planner) Skill(code-review)",
    );
    assert!(mentions.is_empty());
}

#[test]
fn test_frontmatter_string_and_array_normalize_alike() {
    let mut as_list = Frontmatter::new();
    as_list.insert("skills".to_string(), serde_json::json!(["code-review", "docs"]));
    let mut as_string = Frontmatter::new();
    as_string.insert("skills".to_string(), serde_json::json!("code-review, docs"));

    let extractor = MentionExtractor::new();
    let a = extractor.extract(
        &Document::new("agents/a.md", ComponentType::Agent, "").with_frontmatter(as_list),
    );
    let b = extractor.extract(
        &Document::new("agents/a.md", ComponentType::Agent, "").with_frontmatter(as_string),
    );
    assert_eq!(a, b);
    assert_eq!(
        targets(&a),
        vec![(ComponentType::Skill, "code-review"), (ComponentType::Skill, "docs")]
    );
    assert!(a.iter().all(|m| m.kind == ReferenceKind::FrontmatterField && m.line.is_none()));
}

#[test]
fn test_frontmatter_tools_and_agent_fields() {
    let mut fm = Frontmatter::new();
    fm.insert(
        "allowed-tools".to_string(),
        serde_json::json!("Read, Task(planner), Skill(code-review)"),
    );
    fm.insert("agent".to_string(), serde_json::json!("builder"));
    let doc = Document::new("commands/ship.md", ComponentType::Command, "").with_frontmatter(fm);
    let mentions = MentionExtractor::new().extract(&doc);
    assert_eq!(
        targets(&mentions),
        vec![
            (ComponentType::Agent, "planner"),
            (ComponentType::Skill, "code-review"),
            (ComponentType::Agent, "builder"),
        ]
    );
}

#[test]
fn test_frontmatter_mention_wins_over_body_duplicate() {
    let mut fm = Frontmatter::new();
    fm.insert("skills".to_string(), serde_json::json!(["code-review"]));
    let doc = Document::new(
        "agents/a.md",
        ComponentType::Agent,
        "---\nskills: [code-review]\n---\nSkill(code-review)\n",
    )
    .with_frontmatter(fm);
    let mentions = MentionExtractor::new().extract(&doc);
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].kind, ReferenceKind::FrontmatterField);
}

#[test]
fn test_custom_rule_table() {
    const RULES: &[ExtractionRule] = &[ExtractionRule {
        name: "delegate",
        kind: ReferenceKind::InlineMarker,
        target: ComponentType::Agent,
        priority: 1,
        pattern: r"@delegate\(([a-z-]+)\)",
        applies_to: &[ComponentType::Command],
    }];
    let extractor = MentionExtractor::with_rules(RULES).unwrap();
    let doc = Document::new(
        "commands/a.md",
        ComponentType::Command,
        "@delegate(helper) Task(ignored)",
    );
    let mentions = extractor.extract(&doc);
    assert_eq!(targets(&mentions), vec![(ComponentType::Agent, "helper")]);
}

#[test]
fn test_extract_corpus_keeps_corpus_order() {
    let docs: Vec<Document> = (0..20)
        .map(|i| {
            Document::new(
                &format!("agents/a{i}.md"),
                ComponentType::Agent,
                &format!("Task(target-{i})"),
            )
        })
        .collect();
    let mentions = MentionExtractor::new().extract_corpus(&docs);
    let names: Vec<String> = mentions.iter().map(|m| m.target_name.clone()).collect();
    let expected: Vec<String> = (0..20).map(|i| format!("target-{i}")).collect();
    assert_eq!(names, expected);
}
