use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::errors::{LintError, Result};
use crate::graph::DEFAULT_MAX_CHAIN_DEPTH;
use crate::triggers::DEFAULT_REFERENCE_GLOB;
use crate::types::ComponentType;

/// Name of the configuration file stored inside the `.agentlint` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory holding agentlint settings.
pub const AGENTLINT_DIR: &str = ".agentlint";

/// Glob patterns, relative to the corpus root, that assign a component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryPatterns {
    pub agents: Vec<String>,
    pub commands: Vec<String>,
    pub skills: Vec<String>,
    pub rules: Vec<String>,
    pub references: Vec<String>,
}

impl DiscoveryPatterns {
    /// Patterns for one component type.
    pub fn for_type(&self, component_type: ComponentType) -> &[String] {
        match component_type {
            ComponentType::Agent => &self.agents,
            ComponentType::Command => &self.commands,
            ComponentType::Skill => &self.skills,
            ComponentType::Rule => &self.rules,
            ComponentType::ReferenceDoc => &self.references,
        }
    }
}

impl Default for DiscoveryPatterns {
    fn default() -> Self {
        Self {
            agents: vec!["agents/**/*.md".to_string()],
            commands: vec!["commands/**/*.md".to_string()],
            skills: vec!["skills/*/SKILL.md".to_string()],
            rules: vec!["rules/**/*.md".to_string()],
            references: vec!["skills/*/references/**/*.md".to_string()],
        }
    }
}

/// Configuration for a lint run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Per-type discovery patterns.
    pub patterns: DiscoveryPatterns,
    /// Glob patterns for files never loaded, checked before `patterns`.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes; larger files are skipped.
    pub max_file_size: u64,
    /// Names added to the built-in allow-list.
    pub extra_builtins: Vec<String>,
    /// Report skills nothing refers to.
    pub check_orphans: bool,
    /// Scan reference files for trigger tables.
    pub check_triggers: bool,
    /// Emit each reference cycle as a warning in the lint output.
    pub report_cycles: bool,
    /// Depth limit for `explain` chains.
    pub max_chain_depth: usize,
    /// Glob, relative to each skill directory, for trigger-table files.
    pub reference_glob: String,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            version: 1,
            patterns: DiscoveryPatterns::default(),
            exclude: vec![
                "**/README.md".to_string(),
                "**/node_modules/**".to_string(),
                ".agentlint/**".to_string(),
            ],
            max_file_size: 1_048_576,
            extra_builtins: Vec::new(),
            check_orphans: true,
            check_triggers: true,
            report_cycles: false,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            reference_glob: DEFAULT_REFERENCE_GLOB.to_string(),
        }
    }
}

/// Returns the path to the `.agentlint` directory within the given root.
pub fn get_agentlint_dir(root: &Path) -> PathBuf {
    root.join(AGENTLINT_DIR)
}

/// Returns the path to the configuration file within the `.agentlint` directory.
pub fn get_config_path(root: &Path) -> PathBuf {
    get_agentlint_dir(root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk, or the defaults when no file exists.
pub fn load_config(root: &Path) -> Result<LintConfig> {
    let config_path = get_config_path(root);

    if !config_path.exists() {
        return Ok(LintConfig::default());
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| LintError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let config: LintConfig = serde_json::from_str(&contents).map_err(|e| LintError::Config {
        message: format!(
            "failed to parse config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
pub fn save_config(root: &Path, config: &LintConfig) -> Result<()> {
    let dir = get_agentlint_dir(root);
    fs::create_dir_all(&dir).map_err(|e| LintError::Config {
        message: format!(
            "failed to create config directory '{}': {}",
            dir.display(),
            e
        ),
    })?;

    let config_path = get_config_path(root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| LintError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| LintError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| LintError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

fn match_options() -> glob::MatchOptions {
    glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    }
}

fn matches_any(file_path: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| {
        Pattern::new(p)
            .map(|pattern| pattern.matches_with(file_path, match_options()))
            .unwrap_or(false)
    })
}

/// Returns `true` if the file matches an exclude pattern.
pub fn is_excluded(file_path: &str, config: &LintConfig) -> bool {
    matches_any(file_path, &config.exclude)
}

/// Determines the component type of a corpus-relative path.
///
/// Exclude patterns win. Types are tried in declaration order, so a path
/// matching both a skill and a reference pattern is a skill.
pub fn classify_file(file_path: &str, config: &LintConfig) -> Option<ComponentType> {
    if is_excluded(file_path, config) {
        return None;
    }
    ComponentType::ALL
        .into_iter()
        .find(|t| matches_any(file_path, config.patterns.for_type(*t)))
}

/// Checks that every configured glob pattern parses.
pub fn validate_patterns(config: &LintConfig) -> Result<()> {
    let all = ComponentType::ALL
        .iter()
        .flat_map(|t| config.patterns.for_type(*t).iter())
        .chain(config.exclude.iter());
    for pattern in all {
        Pattern::new(pattern).map_err(|e| LintError::Pattern {
            message: e.to_string(),
            pattern: pattern.clone(),
        })?;
    }
    Ok(())
}
