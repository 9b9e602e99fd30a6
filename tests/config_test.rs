use agentlint::config::*;
use agentlint::types::ComponentType;
use tempfile::TempDir;

#[test]
fn test_default_config_has_component_patterns() {
    let config = LintConfig::default();
    assert!(config.patterns.agents.iter().any(|p| p == "agents/**/*.md"));
    assert!(config.patterns.skills.iter().any(|p| p == "skills/*/SKILL.md"));
    assert!(config.exclude.iter().any(|p| p == "**/README.md"));
    assert!(config.check_orphans);
    assert!(!config.report_cycles);
}

#[test]
fn test_missing_config_loads_defaults() {
    let dir = TempDir::new().unwrap();
    assert_eq!(load_config(dir.path()).unwrap(), LintConfig::default());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let config = LintConfig {
        extra_builtins: vec!["house-agent".to_string()],
        report_cycles: true,
        ..LintConfig::default()
    };
    save_config(dir.path(), &config).unwrap();
    assert!(get_config_path(dir.path()).exists());
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_agentlint_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), r#"{ "check_orphans": false }"#).unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert!(!loaded.check_orphans);
    assert_eq!(loaded.patterns, DiscoveryPatterns::default());
}

#[test]
fn test_invalid_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(get_agentlint_dir(dir.path())).unwrap();
    std::fs::write(get_config_path(dir.path()), "not json").unwrap();
    let err = load_config(dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn test_classify_file() {
    let config = LintConfig::default();
    assert_eq!(classify_file("agents/lead.md", &config), Some(ComponentType::Agent));
    assert_eq!(
        classify_file("agents/team/lead.md", &config),
        Some(ComponentType::Agent)
    );
    assert_eq!(classify_file("commands/ship.md", &config), Some(ComponentType::Command));
    assert_eq!(
        classify_file("skills/code-review/SKILL.md", &config),
        Some(ComponentType::Skill)
    );
    assert_eq!(classify_file("rules/style.md", &config), Some(ComponentType::Rule));
    assert_eq!(
        classify_file("skills/code-review/references/routes.md", &config),
        Some(ComponentType::ReferenceDoc)
    );
    assert_eq!(classify_file("agents/README.md", &config), None);
    assert_eq!(classify_file("notes/todo.md", &config), None);
}

#[test]
fn test_invalid_pattern_rejected() {
    let mut config = LintConfig::default();
    config.exclude.push("[".to_string());
    assert!(validate_patterns(&config).is_err());
}

#[test]
fn test_agentlint_dir_location() {
    let dir = TempDir::new().unwrap();
    assert!(get_agentlint_dir(dir.path()).ends_with(".agentlint"));
    assert!(get_config_path(dir.path()).ends_with(".agentlint/config.json"));
}
