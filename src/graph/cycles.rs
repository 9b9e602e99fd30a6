use std::collections::HashSet;

use crate::types::Cycle;

use super::arena::{NodeId, ReferenceGraph};

/// Bookkeeping for one depth-first search.
struct CycleSearch<'g> {
    graph: &'g ReferenceGraph,
    visited: Vec<bool>,
    on_stack: Vec<bool>,
    stack: Vec<NodeId>,
}

/// Finds reference cycles.
///
/// A DFS is started from every node in id order. Reaching a node that is on
/// the current path records the path from that node's position onward.
/// Cycles are reported once per distinct member set, so a rotation found
/// from another start node is dropped. Two different cycles over the same
/// members (`a → b → c → a` and `a → c → b → a`) also collapse into one
/// report, the first found. Self-edges are skipped.
///
/// Each start node gets fresh visited state, which is quadratic in the
/// worst case and fine at corpus scale.
pub fn find_cycles(graph: &ReferenceGraph) -> Vec<Cycle> {
    let n = graph.node_count();
    let mut seen_sets: HashSet<Vec<NodeId>> = HashSet::new();
    let mut found: Vec<Vec<NodeId>> = Vec::new();

    for start in graph.node_ids() {
        let mut search = CycleSearch {
            graph,
            visited: vec![false; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
        };
        search.visit(start, &mut seen_sets, &mut found);
    }

    found
        .into_iter()
        .map(|ids| Cycle {
            nodes: ids.into_iter().map(|id| graph.key(id).clone()).collect(),
        })
        .collect()
}

impl CycleSearch<'_> {
    fn visit(
        &mut self,
        node: NodeId,
        seen_sets: &mut HashSet<Vec<NodeId>>,
        found: &mut Vec<Vec<NodeId>>,
    ) {
        self.visited[node] = true;
        self.on_stack[node] = true;
        self.stack.push(node);

        let graph = self.graph;
        for &next in graph.outgoing(node) {
            if next == node {
                continue;
            }
            if self.on_stack[next] {
                if let Some(pos) = self.stack.iter().position(|&id| id == next) {
                    let members = self.stack[pos..].to_vec();
                    let mut set = members.clone();
                    set.sort_unstable();
                    if seen_sets.insert(set) {
                        found.push(members);
                    }
                }
            } else if !self.visited[next] {
                self.visit(next, seen_sets, found);
            }
        }

        self.stack.pop();
        self.on_stack[node] = false;
    }
}
