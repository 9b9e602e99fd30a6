use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::config::LintConfig;
use crate::extraction::MentionExtractor;
use crate::graph::{find_cycles, find_orphaned_skills, ChainTracer, ReferenceGraph, DEFAULT_MAX_CHAIN_DEPTH};
use crate::resolution::{AllowList, CorpusIndex, ReferenceResolver, ResolutionResult};
use crate::triggers::{
    check_ghost_targets, collect_reference_sources, collect_trigger_mappings, detect_conflicts,
    parse_trigger_tables, ReferenceSource, DEFAULT_REFERENCE_GLOB,
};
use crate::types::*;

/// Switches for the optional checks of a validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorOptions {
    pub check_orphans: bool,
    pub check_triggers: bool,
    pub report_cycles: bool,
    pub max_chain_depth: usize,
    pub reference_glob: String,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            check_orphans: true,
            check_triggers: true,
            report_cycles: false,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
            reference_glob: DEFAULT_REFERENCE_GLOB.to_string(),
        }
    }
}

impl From<&LintConfig> for ValidatorOptions {
    fn from(config: &LintConfig) -> Self {
        Self {
            check_orphans: config.check_orphans,
            check_triggers: config.check_triggers,
            report_cycles: config.report_cycles,
            max_chain_depth: config.max_chain_depth,
            reference_glob: config.reference_glob.clone(),
        }
    }
}

/// Extraction and resolution results shared by every check.
pub struct Analysis {
    pub mentions: Vec<ReferenceMention>,
    pub resolution: ResolutionResult,
    pub graph: ReferenceGraph,
}

/// Cross-document reference validator.
///
/// Holds the corpus index for one run. Extraction runs in parallel per
/// document; everything after it is a single pass over the merged mentions.
pub struct CrossFileValidator<'a> {
    docs: &'a [Document],
    index: CorpusIndex<'a>,
    allow_list: AllowList,
    extractor: MentionExtractor,
    options: ValidatorOptions,
    root: Option<PathBuf>,
}

impl<'a> CrossFileValidator<'a> {
    /// Creates a validator with the built-in allow-list and rule table.
    pub fn new(docs: &'a [Document]) -> Self {
        Self {
            docs,
            index: CorpusIndex::build(docs),
            allow_list: AllowList::builtin(),
            extractor: MentionExtractor::new(),
            options: ValidatorOptions::default(),
            root: None,
        }
    }

    pub fn with_allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    pub fn with_extractor(mut self, extractor: MentionExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the corpus root used to glob for reference files under each
    /// skill directory. Without a root only `ReferenceDoc` documents already
    /// in the corpus are scanned for trigger tables.
    pub fn with_root(mut self, root: &Path) -> Self {
        self.root = Some(root.to_path_buf());
        self
    }

    pub fn index(&self) -> &CorpusIndex<'a> {
        &self.index
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// Extracts, de-duplicates and resolves every mention, and builds the
    /// reference graph from the resolved ones.
    pub fn analyze(&self) -> Analysis {
        let mut mentions = self.extractor.extract_corpus(self.docs);
        mentions.extend(self.routing_mentions());
        let mentions = dedup_mentions(mentions);

        let resolver = ReferenceResolver::new(&self.index, &self.allow_list);
        let resolution = resolver.resolve_all(&mentions);
        let graph = ReferenceGraph::build(&self.index, &resolution.resolved);
        debug!(
            mentions = resolution.total,
            resolved = resolution.resolved.len(),
            dangling = resolution.dangling.len(),
            edges = graph.edge_count(),
            "resolution complete"
        );

        Analysis {
            mentions,
            resolution,
            graph,
        }
    }

    /// Runs every enabled check and returns the sorted diagnostics together
    /// with the detected cycles.
    pub fn validate(&self) -> ValidationReport {
        let start = Instant::now();
        let analysis = self.analyze();
        let mut diagnostics: Vec<Diagnostic> = analysis
            .resolution
            .dangling
            .iter()
            .filter(|m| m.kind != ReferenceKind::RoutingCell)
            .map(ReferenceResolver::dangling_diagnostic)
            .collect();

        let cycles = find_cycles(&analysis.graph);
        if self.options.report_cycles {
            diagnostics.extend(cycles.iter().filter_map(|c| self.cycle_diagnostic(c)));
        }

        if self.options.check_orphans {
            diagnostics.extend(find_orphaned_skills(
                &analysis.resolution.resolved,
                &self.index,
                self.docs,
            ));
        }

        let mut trigger_mapping_count = 0;
        if self.options.check_triggers {
            let mappings = collect_trigger_mappings(&self.reference_sources());
            trigger_mapping_count = mappings.len();
            let resolver = ReferenceResolver::new(&self.index, &self.allow_list);
            diagnostics.extend(check_ghost_targets(&mappings, &resolver));
            diagnostics.extend(detect_conflicts(&mappings));
        }

        sort_diagnostics(&mut diagnostics);

        let stats = ValidationStats {
            document_count: self.docs.len(),
            mention_count: analysis.resolution.total,
            resolved_count: analysis.resolution.resolved.len(),
            allow_listed_count: analysis.resolution.allow_listed,
            dangling_count: analysis.resolution.dangling.len(),
            edge_count: analysis.graph.edge_count(),
            trigger_mapping_count,
        };
        info!(
            documents = stats.document_count,
            diagnostics = diagnostics.len(),
            cycles = cycles.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "validation complete"
        );

        ValidationReport {
            diagnostics,
            cycles,
            stats,
        }
    }

    /// All reference cycles of the corpus.
    pub fn find_cycles(&self) -> Vec<Cycle> {
        find_cycles(&self.analyze().graph)
    }

    /// Forward-reference tree rooted at `root`, or `None` if no document
    /// has that key.
    pub fn trace_chain(&self, root: &NodeKey) -> Option<ChainLink> {
        let analysis = self.analyze();
        ChainTracer::new(&analysis.graph)
            .with_max_depth(self.options.max_chain_depth)
            .trace(root)
    }

    /// Shortest chain of references leading from `from` to `to`.
    pub fn dependency_path(&self, from: &NodeKey, to: &NodeKey) -> Option<Vec<NodeKey>> {
        let analysis = self.analyze();
        ChainTracer::new(&analysis.graph).dependency_path(from, to)
    }

    /// Every trigger mapping found in the reference files.
    pub fn trigger_mappings(&self) -> Vec<TriggerMapping> {
        collect_trigger_mappings(&self.reference_sources())
    }

    fn reference_sources(&self) -> Vec<ReferenceSource> {
        collect_reference_sources(
            self.docs,
            self.root.as_deref(),
            &self.options.reference_glob,
        )
    }

    /// Trigger-table rows of indexed reference documents, as mentions from
    /// those documents.
    fn routing_mentions(&self) -> Vec<ReferenceMention> {
        self.docs
            .iter()
            .filter(|d| d.component_type == ComponentType::ReferenceDoc)
            .flat_map(|d| parse_trigger_tables(&d.relative_path, &d.raw_text))
            .map(|m| ReferenceMention {
                source: m.source_file,
                target_name: m.target,
                target_type: m.target_kind.component_type(),
                kind: ReferenceKind::RoutingCell,
                line: Some(m.line),
            })
            .collect()
    }

    fn cycle_diagnostic(&self, cycle: &Cycle) -> Option<Diagnostic> {
        let first = cycle.nodes.first()?;
        let doc = self.index.get(first)?;
        let mut members: Vec<&str> = cycle.nodes.iter().map(|n| n.name.as_str()).collect();
        members.sort_unstable();
        Some(Diagnostic::new(
            rules::REFERENCE_CYCLE,
            Severity::Warning,
            &doc.relative_path,
            &members.join(","),
            format!(
                "reference cycle {} ({})",
                cycle.path_display(),
                cycle.type_signature()
            ),
        ))
    }
}

/// Keeps the first mention of each `(source, target type, target name)`.
fn dedup_mentions(mentions: Vec<ReferenceMention>) -> Vec<ReferenceMention> {
    let mut seen: HashSet<(String, ComponentType, String)> = HashSet::new();
    mentions
        .into_iter()
        .filter(|m| seen.insert((m.source.clone(), m.target_type, m.target_name.clone())))
        .collect()
}
