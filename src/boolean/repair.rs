use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use itertools::Itertools;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::misc::FloatingPoint;

use super::{
    arc::Arc,
    graph::{ArcGraph, ArcId, VertexId},
    options::BooleanOptions,
};

/// Directed graph holding at most one arc, the shortest, per ordered vertex pair.
#[derive(Clone, Debug, Default)]
pub struct SearchGraph {
    edges: BTreeMap<(VertexId, VertexId), ArcId>,
    out: BTreeMap<VertexId, BTreeSet<VertexId>>,
}

impl SearchGraph {
    /// Unused arcs in their own direction, plus the shortest live arc of every
    /// live edge reversed so a path through it retracts it.
    pub fn new<T: FloatingPoint>(
        graph: &ArcGraph,
        unused: impl IntoIterator<Item = ArcId>,
        arcs: &[Arc<T>],
        ends: &[(VertexId, VertexId)],
    ) -> Self {
        let mut search = Self::default();
        for id in unused {
            let (head, tail) = ends[id];
            search.link(head, tail, id, arcs);
        }
        for ((head, tail), live) in graph.edges() {
            let shortest = live
                .iter()
                .copied()
                .min_by(|x, y| compare_length(arcs, *x, *y));
            if let Some(id) = shortest {
                search.link(tail, head, id, arcs);
            }
        }
        search
    }

    fn link<T: FloatingPoint>(&mut self, from: VertexId, to: VertexId, arc: ArcId, arcs: &[Arc<T>]) {
        self.edges
            .entry((from, to))
            .and_modify(|current| {
                if compare_length(arcs, arc, *current).is_lt() {
                    *current = arc;
                }
            })
            .or_insert(arc);
        self.out.entry(from).or_default().insert(to);
        self.out.entry(to).or_default();
    }

    pub fn edge(&self, from: VertexId, to: VertexId) -> Option<ArcId> {
        self.edges.get(&(from, to)).copied()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.out.contains_key(&v)
    }

    /// The arcs traversed by a vertex path.
    pub fn arcs_along(&self, path: &[VertexId]) -> Vec<ArcId> {
        path.iter()
            .tuple_windows()
            .filter_map(|(from, to)| self.edge(*from, *to))
            .collect()
    }

    /// Shortest path, weighted by arc length, from any of `sources` to a vertex accepted by `accept`.
    ///
    /// The path has at least one edge and never returns to its source.
    /// Among sources, the one reaching a target with the smallest distance wins,
    /// ties going to the earlier source.
    pub fn shortest_path<T: FloatingPoint>(
        &self,
        arcs: &[Arc<T>],
        sources: impl IntoIterator<Item = VertexId>,
        accept: impl Fn(VertexId) -> bool,
    ) -> Option<(Vec<VertexId>, T)> {
        sources
            .into_iter()
            .filter(|v| self.contains(*v))
            .filter_map(|origin| self.shortest_path_from(arcs, origin, &accept))
            .fold(None, |best: Option<(Vec<VertexId>, T)>, candidate| match best {
                Some(b) if b.1 <= candidate.1 => Some(b),
                _ => Some(candidate),
            })
    }

    fn shortest_path_from<T: FloatingPoint>(
        &self,
        arcs: &[Arc<T>],
        origin: VertexId,
        accept: &impl Fn(VertexId) -> bool,
    ) -> Option<(Vec<VertexId>, T)> {
        let mut distance = BTreeMap::from([(origin, T::zero())]);
        let mut previous: BTreeMap<VertexId, VertexId> = BTreeMap::new();
        let mut visited = BTreeSet::new();

        loop {
            let (node, d) = distance
                .iter()
                .filter(|(v, _)| !visited.contains(*v))
                .min_by(|x, y| x.1.partial_cmp(y.1).unwrap_or(Ordering::Equal))
                .map(|(v, d)| (*v, *d))?;
            visited.insert(node);

            if node != origin && accept(node) {
                let mut path = vec![node];
                let mut current = node;
                while let Some(prev) = previous.get(&current) {
                    path.push(*prev);
                    current = *prev;
                }
                path.reverse();
                return Some((path, d));
            }

            for next in self.out.get(&node).into_iter().flatten().copied() {
                if next == origin || visited.contains(&next) {
                    continue;
                }
                let Some(arc) = self.edge(node, next) else {
                    continue;
                };
                let candidate = d + arcs[arc].length();
                let better = distance.get(&next).map_or(true, |current| candidate < *current);
                if better {
                    distance.insert(next, candidate);
                    previous.insert(next, node);
                }
            }
        }
    }
}

fn compare_length<T: FloatingPoint>(arcs: &[Arc<T>], a: ArcId, b: ArcId) -> Ordering {
    arcs[a]
        .length()
        .partial_cmp(&arcs[b].length())
        .unwrap_or(Ordering::Equal)
}

fn total_length<T: FloatingPoint>(arcs: &[Arc<T>], paths: &[Vec<ArcId>]) -> T {
    paths.iter().flatten().fold(T::zero(), |acc, id| acc + arcs[*id].length())
}

/// Find arc paths that reconnect the dangling ends of the live graph.
///
/// Each returned path is a sequence of arcs to toggle: arcs already live are retracted,
/// the others inserted. Ends are first paired greedily by shortest path; when that
/// leaves ends on both sides unmatched, every ordering of the open ends is paired
/// greedily instead and the ordering with the smallest total length is kept.
pub fn repair_graph<T: FloatingPoint>(
    graph: &ArcGraph,
    unused: impl IntoIterator<Item = ArcId>,
    arcs: &[Arc<T>],
    ends: &[(VertexId, VertexId)],
    options: &BooleanOptions<T>,
) -> Vec<Vec<ArcId>> {
    let search = SearchGraph::new(graph, unused, arcs, ends);

    let ins: BTreeSet<VertexId> = graph.vertices().filter(|v| graph.in_degree(*v) == 0).collect();
    let outs: BTreeSet<VertexId> = graph.vertices().filter(|v| graph.out_degree(*v) == 0).collect();
    let (mut curr_in, mut curr_out) = (ins.clone(), outs.clone());

    let mut result: Vec<Vec<ArcId>> = vec![];
    while !curr_in.is_empty() && !curr_out.is_empty() {
        let path = search.shortest_path(arcs, curr_out.iter().copied(), |v| ins.contains(&v));
        let Some((path, _)) = path else {
            break;
        };
        let (first, last) = (path[0], path[path.len() - 1]);
        // the target was claimed by an earlier path
        if !curr_in.contains(&last) {
            break;
        }
        curr_out.remove(&first);
        curr_in.remove(&last);
        let arc_path = search.arcs_along(&path);
        if !result.contains(&arc_path) {
            result.push(arc_path);
        }
    }

    if curr_in.is_empty() || curr_out.is_empty() {
        return result;
    }

    log::debug!(
        "greedy repair left {} open ends, trying orderings of {} ends",
        curr_in.len() + curr_out.len(),
        outs.len()
    );

    orderings(&outs.into_iter().collect_vec(), options.max_permutations)
        .into_iter()
        .filter_map(|order| greedy_pairing(&search, arcs, &order, &ins))
        .min_by(|x, y| {
            total_length(arcs, x)
                .partial_cmp(&total_length(arcs, y))
                .unwrap_or(Ordering::Equal)
        })
        .unwrap_or_default()
}

/// Pair each vertex of `order`, in turn, with the nearest unclaimed vertex of `ins`.
/// Returns `None` when some vertex has no path to any unclaimed one.
pub fn greedy_pairing<T: FloatingPoint>(
    search: &SearchGraph,
    arcs: &[Arc<T>],
    order: &[VertexId],
    ins: &BTreeSet<VertexId>,
) -> Option<Vec<Vec<ArcId>>> {
    let mut curr_in = ins.clone();
    let mut result = vec![];
    for v in order {
        // leftovers get another chance on the next repair pass
        if curr_in.is_empty() {
            break;
        }
        let (path, _) = search.shortest_path(arcs, [*v], |x| curr_in.contains(&x))?;
        curr_in.remove(&path[path.len() - 1]);
        result.push(search.arcs_along(&path));
    }
    Some(result)
}

/// Every ordering of `vertices` when there are at most `limit` of them,
/// otherwise `limit` seeded shuffles.
pub fn orderings(vertices: &[VertexId], limit: usize) -> Vec<Vec<VertexId>> {
    let count = (1..=vertices.len()).try_fold(1usize, |acc, k| acc.checked_mul(k));
    match count {
        Some(count) if count <= limit => vertices
            .iter()
            .copied()
            .permutations(vertices.len())
            .collect(),
        _ => {
            let mut rng = StdRng::seed_from_u64(vertices.len() as u64);
            (0..limit)
                .map(|_| {
                    let mut order = vertices.to_vec();
                    order.shuffle(&mut rng);
                    order
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use crate::curve::Curve;

    use super::*;

    fn corner(i: VertexId) -> Point2<f64> {
        [
            Point2::new(0., 0.),
            Point2::new(1., 0.),
            Point2::new(1., 1.),
            Point2::new(0., 1.),
        ][i]
    }

    fn arena(ends: &[(VertexId, VertexId)]) -> Vec<Arc<f64>> {
        ends.iter()
            .map(|(h, t)| Arc::new(vec![Curve::line(corner(*h), corner(*t))]))
            .collect()
    }

    #[test]
    fn repairs_with_the_shortest_arc() {
        // live: 0 -> 1 -> 2, unused: 2 -> 3 -> 0 and the diagonal 2 -> 0
        let ends = vec![(0, 1), (1, 2), (2, 3), (3, 0), (2, 0)];
        let arcs = arena(&ends);
        let mut graph = ArcGraph::new();
        graph.link(0, 1, 0);
        graph.link(1, 2, 1);

        let paths = repair_graph(&graph, [2, 3, 4], &arcs, &ends, &BooleanOptions::default());
        assert_eq!(paths, vec![vec![4]]);
    }

    #[test]
    fn repairs_by_retracting_live_arcs() {
        // live: 0 -> 1 and 3 -> 2, unused: 1 -> 2
        let ends = vec![(0, 1), (3, 2), (1, 2)];
        let arcs = arena(&ends);
        let mut graph = ArcGraph::new();
        graph.link(0, 1, 0);
        graph.link(3, 2, 1);

        let search = SearchGraph::new(&graph, [2], &arcs, &ends);
        assert_eq!(search.edge(2, 3), Some(1));
        assert_eq!(search.edge(1, 2), Some(2));

        // the path 1 -> 2 -> 3 inserts the unused arc and retracts 3 -> 2
        let (path, length) = search
            .shortest_path(&arcs, [1], |v| v == 3)
            .unwrap();
        assert_eq!(path, vec![1, 2, 3]);
        assert_eq!(length, 2.);
        assert_eq!(search.arcs_along(&path), vec![2, 1]);
    }

    #[test]
    fn shortest_path_needs_an_edge() {
        let ends = vec![(0, 1)];
        let arcs = arena(&ends);
        let graph = ArcGraph::new();
        let search = SearchGraph::new(&graph, [0], &arcs, &ends);
        assert!(search.shortest_path(&arcs, [0], |v| v == 0).is_none());
        assert!(search.shortest_path(&arcs, [1], |v| v == 0).is_none());
        assert_eq!(search.shortest_path(&arcs, [0], |_| true).map(|p| p.0), Some(vec![0, 1]));
    }

    #[test]
    fn greedy_pairing_fails_without_a_path() {
        let ends = vec![(0, 1)];
        let arcs = arena(&ends);
        let search = SearchGraph::new(&ArcGraph::new(), [0], &arcs, &ends);
        let ins = BTreeSet::from([1]);
        assert_eq!(greedy_pairing(&search, &arcs, &[0], &ins), Some(vec![vec![0]]));
        assert_eq!(greedy_pairing(&search, &arcs, &[2], &ins), None);
    }

    #[test]
    fn orderings_are_capped() {
        let all = orderings(&[0, 1, 2], 720);
        assert_eq!(all.len(), 6);
        assert_eq!(all.iter().unique().count(), 6);

        let sampled = orderings(&[0, 1, 2, 3, 4, 5, 6], 10);
        assert_eq!(sampled.len(), 10);
        for order in sampled.iter() {
            assert_eq!(order.iter().sorted().copied().collect_vec(), (0..7).collect_vec());
        }
        assert_eq!(sampled, orderings(&[0, 1, 2, 3, 4, 5, 6], 10));
    }
}
