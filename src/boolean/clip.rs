use std::{
    cmp::Ordering,
    collections::{BTreeMap, BTreeSet},
};

use anyhow::Context;
use itertools::Itertools;

use crate::{misc::FloatingPoint, region::Region, ring::Ring};

use super::{
    arc::{partition, Arc},
    classification::classify,
    graph::{ArcGraph, ArcId, VertexId},
    operation::BooleanOperation,
    options::BooleanOptions,
    repair::repair_graph,
    split::split,
    vertex_union::VertexKey,
};

/// Diagnostics of a boolean operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipInfo {
    /// Vertices where the two boundaries meet.
    pub split_vertices: usize,
    /// Arcs selected by classification.
    pub arcs: usize,
    /// Repair passes run after the first cycle extraction.
    pub repair_attempts: usize,
    /// Arcs that could not be closed into a ring.
    pub leftover_arcs: usize,
}

/// Result of a boolean operation.
#[derive(Clone, Debug)]
pub struct Clip<T: FloatingPoint> {
    region: Region<T>,
    info: ClipInfo,
}

impl<T: FloatingPoint> Clip<T> {
    pub fn region(&self) -> &Region<T> {
        &self.region
    }

    pub fn into_region(self) -> Region<T> {
        self.region
    }

    pub fn info(&self) -> &ClipInfo {
        &self.info
    }

    /// Whether every selected arc ended up in a ring.
    /// An incomplete result is missing part of its boundary.
    pub fn is_complete(&self) -> bool {
        self.info.leftover_arcs == 0
    }
}

/// Run a boolean operation between two regions.
///
/// Both regions are cut where their boundaries meet, the cut boundaries are
/// partitioned into arcs, and the arcs the operation keeps are linked into a
/// graph whose cycles become the rings of the result.
/// Dangling arcs left after a cycle extraction are reconnected by graph repair,
/// and arcs remaining after the last repair pass are reported in [`ClipInfo`].
pub fn clip<T: FloatingPoint>(
    a: &Region<T>,
    b: &Region<T>,
    operation: BooleanOperation,
    options: &BooleanOptions<T>,
) -> anyhow::Result<Clip<T>> {
    options.validate()?;
    a.validate().context("Subject region is invalid")?;
    b.validate().context("Clip region is invalid")?;

    let split = split(a, b, options);
    log::debug!("{}: {} split vertices", operation, split.vertices.len());

    let pa = partition(&split.a, &split.vertices);
    let pb = partition(&split.b, &split.vertices);
    let pb = match operation {
        BooleanOperation::Difference => pb.iter().map(|arc| arc.reverse()).collect_vec(),
        _ => pb,
    };
    log::debug!("{}: {} + {} arcs", operation, pa.len(), pb.len());

    let tolerance = options.tolerance();
    let kept = pa
        .iter()
        .map(|arc| {
            let class = classify(&split.b, arc, &tolerance);
            log::trace!("subject arc {:?} -> {:?}: {:?}", arc.head(), arc.tail(), class);
            operation.keeps_subject(class)
        })
        .chain(pb.iter().map(|arc| {
            let class = classify(&split.a, arc, &tolerance);
            log::trace!("clip arc {:?} -> {:?}: {:?}", arc.head(), arc.tail(), class);
            operation.keeps_clip(class)
        }))
        .collect_vec();
    let arcs = pa.into_iter().chain(pb).collect_vec();
    let ends = vertex_ids(&arcs);

    let mut live: BTreeSet<ArcId> = kept.iter().positions(|k| *k).collect();
    let mut consumed: BTreeSet<ArcId> = BTreeSet::new();
    let mut rings = vec![];
    let mut info = ClipInfo {
        split_vertices: split.vertices.len(),
        arcs: live.len(),
        ..Default::default()
    };
    log::debug!("{}: {} arcs kept", operation, live.len());

    for attempt in 0..=options.max_repair_attempts {
        let mut graph = ArcGraph::new();
        for id in live.iter() {
            let (head, tail) = ends[*id];
            graph.link(head, tail, *id);
        }

        if attempt > 0 {
            info.repair_attempts += 1;
            let unused = (0..arcs.len()).filter(|id| !live.contains(id) && !consumed.contains(id));
            for path in repair_graph(&graph, unused, &arcs, &ends, options) {
                for id in path {
                    let (head, tail) = ends[id];
                    if live.remove(&id) {
                        log::trace!("repair retracts arc {}", id);
                        graph.unlink(head, tail, id);
                    } else {
                        log::trace!("repair inserts arc {}", id);
                        graph.link(head, tail, id);
                        live.insert(id);
                    }
                }
            }
        }

        let extracted = extract_rings(&graph, &arcs, &mut consumed, options);
        log::debug!("{}: pass {} emitted {} rings", operation, attempt, extracted.len());
        rings.extend(extracted);

        live.retain(|id| !consumed.contains(id));
        if live.is_empty() {
            break;
        }
    }

    info.leftover_arcs = live.len();
    if !live.is_empty() {
        log::warn!(
            "{}: {} arcs left unconsumed after {} repair attempts",
            operation,
            live.len(),
            info.repair_attempts
        );
    }

    Ok(Clip {
        region: Region::new(rings),
        info,
    })
}

/// Number the end points of every arc in lexicographic point order.
fn vertex_ids<T: FloatingPoint>(arcs: &[Arc<T>]) -> Vec<(VertexId, VertexId)> {
    let ids: BTreeMap<VertexKey<T>, VertexId> = arcs
        .iter()
        .flat_map(|arc| [VertexKey(arc.head()), VertexKey(arc.tail())])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(i, key)| (key, i))
        .collect();
    arcs.iter()
        .map(|arc| (ids[&VertexKey(arc.head())], ids[&VertexKey(arc.tail())]))
        .collect()
}

/// Expand every cycle of the graph into its arc combinations and emit rings,
/// largest first, from combinations sharing no arc with an earlier one.
fn extract_rings<T: FloatingPoint>(
    graph: &ArcGraph,
    arcs: &[Arc<T>],
    consumed: &mut BTreeSet<ArcId>,
    options: &BooleanOptions<T>,
) -> Vec<Ring<T>> {
    let candidates = graph
        .cycles()
        .into_iter()
        .flat_map(|cycle| {
            cycle
                .iter()
                .tuple_windows()
                .map(|(from, to)| {
                    graph
                        .edge(*from, *to)
                        .map(|set| set.iter().copied().collect_vec())
                        .unwrap_or_default()
                })
                .multi_cartesian_product()
                .take(options.max_cycle_combinations)
                .collect_vec()
        })
        .map(|cycle| {
            let area = cycle
                .iter()
                .fold(T::zero(), |acc, id| acc + arcs[*id].signed_area())
                .abs();
            (area, cycle)
        })
        .sorted_by(|x, y| y.0.partial_cmp(&x.0).unwrap_or(Ordering::Equal))
        .collect_vec();

    let mut rings = vec![];
    for (_, cycle) in candidates {
        if cycle.iter().any(|id| consumed.contains(id)) {
            continue;
        }
        consumed.extend(cycle.iter().copied());
        let curves = cycle
            .iter()
            .flat_map(|id| arcs[*id].curves().iter().cloned())
            .collect_vec();
        rings.push(Ring::from_connected(curves));
    }
    rings
}
