use std::collections::{HashMap, VecDeque};

use crate::types::{ChainLink, NodeKey};

use super::arena::{NodeId, ReferenceGraph};

/// Default depth limit for chain expansion.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 10;

/// Builds forward-reference trees for "what does X pull in" output.
pub struct ChainTracer<'g> {
    graph: &'g ReferenceGraph,
    max_depth: usize,
}

impl<'g> ChainTracer<'g> {
    pub fn new(graph: &'g ReferenceGraph) -> Self {
        Self {
            graph,
            max_depth: DEFAULT_MAX_CHAIN_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expands the outgoing references of `root` into a tree.
    ///
    /// Returns `None` when the root is not a node of the graph. A node that
    /// is already on the path being expanded is emitted as a leaf, so cyclic
    /// references terminate. Expansion also stops at the depth limit.
    pub fn trace(&self, root: &NodeKey) -> Option<ChainLink> {
        let id = self.graph.node_id(root)?;
        let mut on_path = vec![false; self.graph.node_count()];
        Some(self.expand(id, 0, &mut on_path))
    }

    fn expand(&self, id: NodeId, depth: usize, on_path: &mut [bool]) -> ChainLink {
        let mut link = self.leaf(id);
        if depth >= self.max_depth {
            return link;
        }

        on_path[id] = true;
        for &next in self.graph.outgoing(id) {
            if on_path[next] {
                link.children.push(self.leaf(next));
            } else {
                link.children.push(self.expand(next, depth + 1, on_path));
            }
        }
        on_path[id] = false;

        link
    }

    fn leaf(&self, id: NodeId) -> ChainLink {
        let key = self.graph.key(id);
        ChainLink {
            component_type: key.component_type,
            name: key.name.clone(),
            line_count: self.graph.line_count(id),
            children: Vec::new(),
        }
    }

    /// Finds the shortest chain of outgoing references from `from` to `to`.
    ///
    /// Returns `None` if either node is unknown or `to` is unreachable. A
    /// node trivially reaches itself.
    pub fn dependency_path(&self, from: &NodeKey, to: &NodeKey) -> Option<Vec<NodeKey>> {
        let start = self.graph.node_id(from)?;
        let goal = self.graph.node_id(to)?;
        if start == goal {
            return Some(vec![from.clone()]);
        }

        // child -> parent, for path reconstruction
        let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
        let mut visited = vec![false; self.graph.node_count()];
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        visited[start] = true;
        queue.push_back(start);

        'search: while let Some(current) = queue.pop_front() {
            for &next in self.graph.outgoing(current) {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                parents.insert(next, current);
                if next == goal {
                    break 'search;
                }
                queue.push_back(next);
            }
        }

        if !visited[goal] {
            return None;
        }

        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            current = *parents.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path.into_iter().map(|id| self.graph.key(id).clone()).collect())
    }
}
