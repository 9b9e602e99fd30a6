use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::is_static_identifier;
use crate::types::{TriggerMapping, TriggerTargetKind};

static AGENT_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bTask\(\s*(?:subagent_type\s*[=:]\s*)?["']?([^"'\s,)]+)["']?\s*[,)]"#)
        .expect("agent call pattern compiles")
});

static BARE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9][A-Za-z0-9_-]*").expect("bare name pattern compiles"));

static SEPARATOR_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:?-+:?$").expect("separator pattern compiles"));

/// Header keywords marking a routing column.
const ROUTING_HEADERS: &[&str] = &["route", "skill", "agent", "target"];

/// Bare names shorter than this are treated as prose.
const MIN_BARE_NAME_LEN: usize = 4;

/// Extracts keyword → target mappings from every trigger table in `text`.
///
/// A trigger table is a markdown table whose header has a cell containing
/// "trigger" (any case). The first cell of each data row holds the keyword,
/// or a comma-separated list of keywords.
pub fn parse_trigger_tables(source_file: &str, text: &str) -> Vec<TriggerMapping> {
    let lines: Vec<&str> = text.lines().collect();
    let mut mappings = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if !is_table_line(lines[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i < lines.len() && is_table_line(lines[i]) {
            i += 1;
        }
        parse_table_block(source_file, &lines[start..i], start, &mut mappings);
    }

    mappings
}

fn parse_table_block(
    source_file: &str,
    block: &[&str],
    first_line: usize,
    mappings: &mut Vec<TriggerMapping>,
) {
    if block.len() < 3 || !is_separator_row(block[1]) {
        return;
    }
    let header = split_row(block[0]);
    if !header.iter().any(|h| h.to_lowercase().contains("trigger")) {
        return;
    }
    let columns = routing_columns(&header);

    for (offset, row) in block.iter().enumerate().skip(2) {
        let cells = split_row(row);
        let Some(keyword_cell) = cells.first() else {
            continue;
        };
        let keywords = parse_keywords(keyword_cell);
        if keywords.is_empty() {
            continue;
        }
        let line = (first_line + offset + 1) as u32;

        for &col in &columns {
            let Some(cell) = cells.get(col) else {
                continue;
            };
            for (target_kind, target) in extract_cell_targets(cell) {
                for keyword in &keywords {
                    mappings.push(TriggerMapping {
                        source_file: source_file.to_string(),
                        keyword: keyword.clone(),
                        target: target.clone(),
                        target_kind,
                        line,
                    });
                }
            }
        }
    }
}

/// Indices of the routing columns. When no header names a routing column,
/// every column after the keyword column is used. That fallback can pick up
/// hyphenated words from descriptive columns.
pub fn routing_columns(header: &[String]) -> Vec<usize> {
    let named: Vec<usize> = header
        .iter()
        .enumerate()
        .skip(1)
        .filter(|(_, h)| {
            let h = h.to_lowercase();
            ROUTING_HEADERS.iter().any(|k| h.contains(k))
        })
        .map(|(i, _)| i)
        .collect();
    if named.is_empty() {
        (1..header.len()).collect()
    } else {
        named
    }
}

/// Targets named in one routing cell. Agent calls take precedence; bare
/// hyphenated names are only considered when the cell has none.
pub fn extract_cell_targets(cell: &str) -> Vec<(TriggerTargetKind, String)> {
    let mut targets: Vec<(TriggerTargetKind, String)> = Vec::new();

    for caps in AGENT_CALL_RE.captures_iter(cell) {
        if let Some(m) = caps.get(1) {
            let name = m.as_str();
            if is_static_identifier(name) && !targets.iter().any(|(_, t)| t == name) {
                targets.push((TriggerTargetKind::Agent, name.to_string()));
            }
        }
    }
    if !targets.is_empty() {
        return targets;
    }

    for m in BARE_NAME_RE.find_iter(cell) {
        let name = m.as_str().trim_end_matches(['-', '_']);
        if looks_like_identifier(name) && !targets.iter().any(|(_, t)| t == name) {
            targets.push((TriggerTargetKind::Skill, name.to_string()));
        }
    }
    targets
}

fn looks_like_identifier(name: &str) -> bool {
    name.len() >= MIN_BARE_NAME_LEN && name.contains('-') && is_static_identifier(name)
}

fn parse_keywords(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(|k| {
            k.trim()
                .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*'))
                .trim()
                .to_lowercase()
        })
        .filter(|k| !k.is_empty())
        .collect()
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn is_separator_row(line: &str) -> bool {
    let cells = split_row(line);
    !cells.is_empty() && cells.iter().all(|c| SEPARATOR_CELL_RE.is_match(c))
}

/// Splits a table row into trimmed cells, honouring `\|` escapes.
pub fn split_row(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}
