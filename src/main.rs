use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use tracing_subscriber::EnvFilter;

use agentlint::config::{get_config_path, load_config, save_config, LintConfig};
use agentlint::corpus::load_corpus;
use agentlint::report::{
    format_chain_as_markdown, format_cycles_as_markdown, format_report_as_json,
    format_report_as_text,
};
use agentlint::resolution::AllowList;
use agentlint::types::*;
use agentlint::validator::{CrossFileValidator, ValidatorOptions};

/// Cross-file reference linter for agent, command, skill and rule documents.
#[derive(Parser)]
#[command(name = "agentlint", version, about = "Cross-file reference linter for agent configuration")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint the corpus for dangling references, orphans and trigger conflicts
    Check {
        /// Corpus root (default: current directory, or its .claude/)
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
        /// Skip orphaned-skill detection
        #[arg(long)]
        no_orphans: bool,
        /// Skip trigger-table checks
        #[arg(long)]
        no_triggers: bool,
        /// Report reference cycles as warnings
        #[arg(long)]
        cycles: bool,
    },
    /// List reference cycles
    Cycles {
        /// Corpus root
        path: Option<String>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Show what a component pulls in, or how it reaches another one
    Explain {
        /// Component type (agent, command, skill, rule)
        component_type: String,
        /// Canonical name
        name: String,
        /// Corpus root
        #[arg(short, long)]
        path: Option<String>,
        /// Show the shortest reference path to this component (type:name)
        #[arg(long)]
        to: Option<String>,
        /// Maximum chain depth
        #[arg(short, long)]
        depth: Option<usize>,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Write a default configuration file
    Init {
        /// Corpus root
        path: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "agentlint=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> agentlint::errors::Result<i32> {
    match cli.command {
        Commands::Check {
            path,
            json,
            no_orphans,
            no_triggers,
            cycles,
        } => {
            let root = resolve_root(path)?;
            let mut config = load_config(&root)?;
            config.check_orphans &= !no_orphans;
            config.check_triggers &= !no_triggers;
            config.report_cycles |= cycles;

            let docs = load_corpus(&root, &config)?;
            let report = build_validator(&docs, &root, &config).validate();
            if json {
                println!("{}", format_report_as_json(&report)?);
            } else {
                print!("{}", format_report_as_text(&report));
            }
            return Ok(if report.has_errors() { 1 } else { 0 });
        }
        Commands::Cycles { path, json } => {
            let root = resolve_root(path)?;
            let config = load_config(&root)?;
            let docs = load_corpus(&root, &config)?;
            let cycles = build_validator(&docs, &root, &config).find_cycles();
            if json {
                println!("{}", serde_json::to_string_pretty(&cycles)?);
            } else {
                print!("{}", format_cycles_as_markdown(&cycles));
            }
        }
        Commands::Explain {
            component_type,
            name,
            path,
            to,
            depth,
            json,
        } => {
            let root = resolve_root(path)?;
            let mut config = load_config(&root)?;
            if let Some(depth) = depth {
                config.max_chain_depth = depth;
            }
            let key = parse_key(&component_type, &name)?;
            let docs = load_corpus(&root, &config)?;
            let validator = build_validator(&docs, &root, &config);

            if let Some(target) = to {
                let (target_type, target_name) = target.split_once(':').ok_or_else(|| {
                    agentlint::errors::LintError::Config {
                        message: format!("expected TYPE:NAME for --to, got '{}'", target),
                    }
                })?;
                let target_key = parse_key(target_type, target_name)?;
                match validator.dependency_path(&key, &target_key) {
                    Some(path) => {
                        let parts: Vec<String> = path.iter().map(|k| k.to_string()).collect();
                        println!("{}", parts.join(" → "));
                    }
                    None => println!("{} does not reach {}", key, target_key),
                }
                return Ok(0);
            }

            match validator.trace_chain(&key) {
                Some(chain) if json => println!("{}", serde_json::to_string_pretty(&chain)?),
                Some(chain) => print!("{}", format_chain_as_markdown(&chain)),
                None => println!("No {} named '{}' found", key.component_type, key.name),
            }
        }
        Commands::Init { path } => {
            let root = resolve_root(path)?;
            save_config(&root, &LintConfig::default())?;
            println!("Wrote {}", get_config_path(&root).display());
        }
    }
    Ok(0)
}

fn build_validator<'a>(
    docs: &'a [Document],
    root: &Path,
    config: &LintConfig,
) -> CrossFileValidator<'a> {
    CrossFileValidator::new(docs)
        .with_allow_list(AllowList::builtin().with_extra(&config.extra_builtins))
        .with_options(ValidatorOptions::from(config))
        .with_root(root)
}

fn parse_key(component_type: &str, name: &str) -> agentlint::errors::Result<NodeKey> {
    let component_type =
        ComponentType::from_str(component_type).ok_or_else(|| agentlint::errors::LintError::Config {
            message: format!("unknown component type '{}'", component_type),
        })?;
    Ok(NodeKey::new(component_type, name))
}

/// Resolves an optional path argument to the corpus root.
///
/// Defaults to the current directory; a `.claude` directory inside the
/// chosen path is used as the root when present.
fn resolve_root(path: Option<String>) -> agentlint::errors::Result<PathBuf> {
    let base = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let nested = base.join(".claude");
    Ok(if nested.is_dir() { nested } else { base })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_root_prefers_nested_claude_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = dir.path().to_string_lossy().to_string();
        assert_eq!(resolve_root(Some(base.clone())).unwrap(), dir.path());

        std::fs::create_dir(dir.path().join(".claude")).unwrap();
        assert_eq!(
            resolve_root(Some(base)).unwrap(),
            dir.path().join(".claude")
        );
    }
}
