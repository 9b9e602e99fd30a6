use crate::errors::Result;
use crate::types::*;

/// Formats a report as plain text, one line per diagnostic, followed by a
/// summary line.
pub fn format_report_as_text(report: &ValidationReport) -> String {
    let mut out = String::new();

    for d in &report.diagnostics {
        let location = match d.line {
            Some(line) => format!("{}:{}", d.file, line),
            None => d.file.clone(),
        };
        out.push_str(&format!(
            "{}: {} [{}] {}\n",
            location, d.severity, d.rule, d.message
        ));
    }

    if !report.diagnostics.is_empty() {
        out.push('\n');
    }
    out.push_str(&format!(
        "{} documents, {} references ({} unresolved): {} errors, {} warnings, {} suggestions, {} info\n",
        report.stats.document_count,
        report.stats.mention_count,
        report.stats.dangling_count,
        report.count(Severity::Error),
        report.count(Severity::Warning),
        report.count(Severity::Suggestion),
        report.count(Severity::Info),
    ));

    out
}

/// Formats a report as pretty-printed JSON. Each diagnostic carries its
/// fingerprint.
pub fn format_report_as_json(report: &ValidationReport) -> Result<String> {
    let mut diagnostics: Vec<serde_json::Value> = Vec::with_capacity(report.diagnostics.len());
    for d in &report.diagnostics {
        let mut value = serde_json::to_value(d)?;
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "fingerprint".to_string(),
                serde_json::Value::String(d.fingerprint()),
            );
        }
        diagnostics.push(value);
    }

    let doc = serde_json::json!({
        "diagnostics": diagnostics,
        "cycles": report.cycles,
        "stats": report.stats,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Formats a chain tree as a nested Markdown list.
pub fn format_chain_as_markdown(root: &ChainLink) -> String {
    let mut out = String::new();
    out.push_str(&format!("## Reference Chain: {}\n\n", root.name));
    write_link(&mut out, root, 0);
    out
}

fn write_link(out: &mut String, link: &ChainLink, depth: usize) {
    out.push_str(&format!(
        "{}- **{}** ({}, {} lines)\n",
        "  ".repeat(depth),
        link.name,
        link.component_type,
        link.line_count,
    ));
    for child in &link.children {
        write_link(out, child, depth + 1);
    }
}

/// Formats a cycle list as Markdown.
pub fn format_cycles_as_markdown(cycles: &[Cycle]) -> String {
    let mut out = String::from("## Reference Cycles\n\n");
    if cycles.is_empty() {
        out.push_str("_No cycles found._\n");
        return out;
    }
    for (i, cycle) in cycles.iter().enumerate() {
        out.push_str(&format!(
            "{}. `{}` ({})\n",
            i + 1,
            cycle.path_display(),
            cycle.type_signature()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_report() -> ValidationReport {
        ValidationReport {
            diagnostics: vec![Diagnostic::new(
                rules::DANGLING_REFERENCE,
                Severity::Error,
                "commands/deploy.md",
                "ghost-agent",
                "agent 'ghost-agent' referenced by call does not exist; create agents/ghost-agent.md"
                    .to_string(),
            )
            .at_line(Some(4))],
            cycles: vec![],
            stats: ValidationStats {
                document_count: 1,
                mention_count: 1,
                dangling_count: 1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_text_contains_location_and_summary() {
        let text = format_report_as_text(&make_report());
        assert!(text.contains("commands/deploy.md:4: error [dangling-reference]"));
        assert!(text.contains("1 errors, 0 warnings"));
    }

    #[test]
    fn test_json_includes_fingerprint() {
        let report = make_report();
        let json = format_report_as_json(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["diagnostics"][0]["severity"], "error");
        assert_eq!(
            parsed["diagnostics"][0]["fingerprint"],
            report.diagnostics[0].fingerprint()
        );
        assert_eq!(parsed["stats"]["document_count"], 1);
    }

    #[test]
    fn test_chain_markdown_nests_children() {
        let chain = ChainLink {
            component_type: ComponentType::Command,
            name: "deploy".to_string(),
            line_count: 12,
            children: vec![ChainLink {
                component_type: ComponentType::Agent,
                name: "builder".to_string(),
                line_count: 30,
                children: vec![],
            }],
        };
        let md = format_chain_as_markdown(&chain);
        assert!(md.contains("- **deploy** (command, 12 lines)"));
        assert!(md.contains("  - **builder** (agent, 30 lines)"));
    }

    #[test]
    fn test_cycles_markdown_empty() {
        assert!(format_cycles_as_markdown(&[]).contains("_No cycles found._"));
    }
}
