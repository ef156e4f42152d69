use std::collections::{BTreeMap, BTreeSet};

/// Index of a vertex, assigned in lexicographic point order.
pub type VertexId = usize;

/// Index of an arc in the arena shared by both operands.
pub type ArcId = usize;

/// Directed graph over vertices whose edges carry the set of arcs joining them.
#[derive(Clone, Debug, Default)]
pub struct ArcGraph {
    edges: BTreeMap<(VertexId, VertexId), BTreeSet<ArcId>>,
    out: BTreeMap<VertexId, BTreeSet<VertexId>>,
    incoming: BTreeMap<VertexId, BTreeSet<VertexId>>,
}

impl ArcGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `arc` to the edge `from -> to`, merging with arcs already there.
    pub fn link(&mut self, from: VertexId, to: VertexId, arc: ArcId) {
        self.edges.entry((from, to)).or_default().insert(arc);
        self.out.entry(from).or_default().insert(to);
        self.incoming.entry(to).or_default().insert(from);
        self.out.entry(to).or_default();
        self.incoming.entry(from).or_default();
    }

    /// Remove `arc` from the edge `from -> to`; the edge goes away with its last arc.
    pub fn unlink(&mut self, from: VertexId, to: VertexId, arc: ArcId) {
        let Some(arcs) = self.edges.get_mut(&(from, to)) else {
            return;
        };
        arcs.remove(&arc);
        if arcs.is_empty() {
            self.edges.remove(&(from, to));
            if let Some(out) = self.out.get_mut(&from) {
                out.remove(&to);
            }
            if let Some(incoming) = self.incoming.get_mut(&to) {
                incoming.remove(&from);
            }
        }
    }

    /// Every vertex touched by an edge at some point.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.out.keys().copied()
    }

    pub fn out(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.out.get(&v).into_iter().flatten().copied()
    }

    pub fn incoming(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.incoming.get(&v).into_iter().flatten().copied()
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.out.get(&v).map_or(0, |s| s.len())
    }

    pub fn in_degree(&self, v: VertexId) -> usize {
        self.incoming.get(&v).map_or(0, |s| s.len())
    }

    pub fn edge(&self, from: VertexId, to: VertexId) -> Option<&BTreeSet<ArcId>> {
        self.edges.get(&(from, to))
    }

    pub fn edges(&self) -> impl Iterator<Item = ((VertexId, VertexId), &BTreeSet<ArcId>)> + '_ {
        self.edges.iter().map(|(k, v)| (*k, v))
    }

    /// Enumerate the simple cycles of the graph.
    ///
    /// Each cycle is listed once, rooted at its smallest vertex, as the closed vertex
    /// sequence `[v0, v1, .., v0]`. Self-loops come out as `[v, v]`.
    pub fn cycles(&self) -> Vec<Vec<VertexId>> {
        let mut cycles = vec![];
        for root in self.vertices() {
            let mut path = vec![root];
            let mut on_path = BTreeSet::from([root]);
            self.extend_cycles(root, root, &mut path, &mut on_path, &mut cycles);
        }
        cycles
    }

    fn extend_cycles(
        &self,
        root: VertexId,
        current: VertexId,
        path: &mut Vec<VertexId>,
        on_path: &mut BTreeSet<VertexId>,
        cycles: &mut Vec<Vec<VertexId>>,
    ) {
        for next in self.out(current) {
            if next == root {
                let mut cycle = path.clone();
                cycle.push(root);
                cycles.push(cycle);
            } else if next > root && !on_path.contains(&next) {
                path.push(next);
                on_path.insert(next);
                self.extend_cycles(root, next, path, on_path, cycles);
                on_path.remove(&next);
                path.pop();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_merges_parallel_arcs() {
        let mut graph = ArcGraph::new();
        graph.link(0, 1, 10);
        graph.link(0, 1, 11);
        graph.link(1, 0, 12);
        assert_eq!(graph.edge(0, 1), Some(&BTreeSet::from([10, 11])));
        assert_eq!(graph.out(0).collect::<Vec<_>>(), vec![1]);
        assert_eq!(graph.incoming(0).collect::<Vec<_>>(), vec![1]);

        graph.unlink(0, 1, 10);
        assert_eq!(graph.edge(0, 1), Some(&BTreeSet::from([11])));
        graph.unlink(0, 1, 11);
        assert_eq!(graph.edge(0, 1), None);
        assert_eq!(graph.out_degree(0), 0);
        assert_eq!(graph.in_degree(1), 0);
        assert_eq!(graph.vertices().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn enumerates_simple_cycles() {
        let mut graph = ArcGraph::new();
        // two triangles sharing the edge 1 -> 2, plus a self-loop
        graph.link(0, 1, 0);
        graph.link(1, 2, 1);
        graph.link(2, 0, 2);
        graph.link(2, 3, 3);
        graph.link(3, 1, 4);
        graph.link(5, 5, 5);
        // a dangling edge closes nothing
        graph.link(3, 4, 6);

        let cycles = graph.cycles();
        assert_eq!(
            cycles,
            vec![vec![0, 1, 2, 0], vec![1, 2, 3, 1], vec![5, 5]]
        );
    }
}
