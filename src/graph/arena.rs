use std::collections::HashMap;

use crate::resolution::{CorpusIndex, ResolvedMention};
use crate::types::NodeKey;

/// Stable integer id of a graph node; an index into the arena.
pub type NodeId = usize;

/// Directed reference graph over indexed documents.
///
/// Every indexed document is a node, ids assigned in corpus order. Edges are
/// resolved mentions only, kept once per `(source, target)` pair in
/// first-seen order. Self-edges are stored like any other edge.
#[derive(Debug, Clone, Default)]
pub struct ReferenceGraph {
    keys: Vec<NodeKey>,
    line_counts: Vec<usize>,
    ids: HashMap<NodeKey, NodeId>,
    outgoing: Vec<Vec<NodeId>>,
    incoming: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl ReferenceGraph {
    pub fn build(index: &CorpusIndex<'_>, resolved: &[ResolvedMention]) -> Self {
        let mut graph = Self::default();
        for key in index.keys() {
            let line_count = index.get(key).map(|d| d.line_count()).unwrap_or(0);
            graph.add_node(key.clone(), line_count);
        }
        for edge in resolved {
            if let (Some(from), Some(to)) = (graph.node_id(&edge.source), graph.node_id(&edge.target))
            {
                graph.add_edge(from, to);
            }
        }
        graph
    }

    fn add_node(&mut self, key: NodeKey, line_count: usize) -> NodeId {
        if let Some(id) = self.ids.get(&key) {
            return *id;
        }
        let id = self.keys.len();
        self.ids.insert(key.clone(), id);
        self.keys.push(key);
        self.line_counts.push(line_count);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    fn add_edge(&mut self, from: NodeId, to: NodeId) {
        if self.outgoing[from].contains(&to) {
            return;
        }
        self.outgoing[from].push(to);
        self.incoming[to].push(from);
        self.edge_count += 1;
    }

    pub fn node_id(&self, key: &NodeKey) -> Option<NodeId> {
        self.ids.get(key).copied()
    }

    pub fn key(&self, id: NodeId) -> &NodeKey {
        &self.keys[id]
    }

    pub fn line_count(&self, id: NodeId) -> usize {
        self.line_counts[id]
    }

    pub fn outgoing(&self, id: NodeId) -> &[NodeId] {
        &self.outgoing[id]
    }

    pub fn incoming(&self, id: NodeId) -> &[NodeId] {
        &self.incoming[id]
    }

    pub fn has_self_edge(&self, id: NodeId) -> bool {
        self.outgoing[id].contains(&id)
    }

    pub fn node_count(&self) -> usize {
        self.keys.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn node_ids(&self) -> std::ops::Range<NodeId> {
        0..self.keys.len()
    }
}
