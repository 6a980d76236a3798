use tracing::{debug, trace, trace_span};
use ustr::{Ustr, UstrSet};

use super::graph::ConceptGraph;
use crate::progress::ProgressSink;

/// Counters from one resolution pass, mostly for the progress log.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolveStats {
    /// Records that had their chain computed by this pass.
    pub resolved: usize,
    pub roots: usize,
    /// Walks that stopped on a parent identifier absent from the graph.
    pub missing_parents: usize,
    /// Walks that stopped because they came back around to themselves.
    pub cycles: usize,
    /// Walks that stopped early by reusing an already resolved parent chain.
    pub memo_hits: usize,
}

enum WalkEnd {
    Root,
    /// Reached a parent with a known chain; `prefix` goes in front of ours.
    Memoized { prefix: Vec<Ustr>, prefix_depth: u32 },
    MissingParent(Ustr),
    Cycle(Ustr),
}

struct Walk {
    /// Immediate parent first; reversed when assigned.
    nearest_first: Vec<Ustr>,
    depth: u32,
    end: WalkEnd,
}

/// Attach `ancestors` and `depth` to every record in the graph, visiting
/// records in insertion order.
pub fn resolve_hierarchy(graph: &mut ConceptGraph, sink: &mut dyn ProgressSink) -> ResolveStats {
    resolve_hierarchy_in_order(graph, std::iter::empty(), sink)
}

/// Like `resolve_hierarchy`, but records listed in `order` are visited first
/// (unknown identifiers are ignored) and the rest afterwards in insertion
/// order.  For acyclic input the result does not depend on the order.
pub fn resolve_hierarchy_in_order<I>(
    graph: &mut ConceptGraph,
    order: I,
    sink: &mut dyn ProgressSink,
) -> ResolveStats
where
    I: IntoIterator<Item = Ustr>,
{
    let span = trace_span!("resolve_hierarchy", records = graph.len());
    let _span_guard = span.enter();

    let mut stats = ResolveStats::default();

    let requested: Vec<usize> = order
        .into_iter()
        .filter_map(|id| graph.slot_of(id))
        .collect();
    let total = graph.len();

    for slot in requested.into_iter().chain(0..total) {
        if graph.is_resolved(slot) {
            continue;
        }

        let walk = walk_from(graph, slot);
        let origin = graph.record_at(slot).id;

        let mut ancestors = Vec::with_capacity(walk.nearest_first.len());
        let mut depth = walk.depth;
        match walk.end {
            WalkEnd::Root => {
                if graph.record_at(slot).is_root() {
                    stats.roots += 1;
                }
            }
            WalkEnd::Memoized {
                prefix,
                prefix_depth,
            } => {
                stats.memo_hits += 1;
                ancestors.extend(prefix);
                depth += prefix_depth;
            }
            WalkEnd::MissingParent(missing) => {
                stats.missing_parents += 1;
                debug!(concept = %origin, missing = %missing, "parent concept not found");
                sink.warning(&format!(
                    "Parent concept not found: {} (while resolving {})",
                    missing, origin
                ));
            }
            WalkEnd::Cycle(repeated) => {
                stats.cycles += 1;
                debug!(concept = %origin, repeated = %repeated, "parent cycle");
                sink.warning(&format!(
                    "Parent cycle through {} while resolving {}; chain truncated",
                    repeated, origin
                ));
            }
        }
        ancestors.extend(walk.nearest_first.into_iter().rev());

        trace!(concept = %origin, depth, "resolved");
        graph.set_resolution(slot, ancestors, depth);
        stats.resolved += 1;
    }

    stats
}

/// Follow `parent_ref` upward from the record in `origin` until we hit a root,
/// a resolved record, a missing identifier, or an identifier this walk has
/// already seen.  Only reads the graph; the caller assigns the result to the
/// originating record alone.
fn walk_from(graph: &ConceptGraph, origin: usize) -> Walk {
    let mut current = graph.record_at(origin);
    let mut visited = UstrSet::default();
    visited.insert(current.id);

    let mut nearest_first = vec![];
    let mut depth: u32 = 0;

    let end = loop {
        let parent_id = match current.parent_ref {
            Some(parent_id) => parent_id,
            None => break WalkEnd::Root,
        };
        if !visited.insert(parent_id) {
            break WalkEnd::Cycle(parent_id);
        }

        nearest_first.push(parent_id);
        depth += 1;

        let parent_slot = match graph.slot_of(parent_id) {
            Some(parent_slot) => parent_slot,
            None => break WalkEnd::MissingParent(parent_id),
        };
        let parent = graph.record_at(parent_slot);

        if graph.is_resolved(parent_slot) {
            // A memoized chain that runs back through this walk would splice
            // a repeat into our ancestors.
            if let Some(repeated) = parent.ancestors.iter().find(|id| visited.contains(*id)) {
                break WalkEnd::Cycle(*repeated);
            }
            break WalkEnd::Memoized {
                prefix: parent.ancestors.clone(),
                prefix_depth: parent.depth,
            };
        }

        current = parent;
    };

    Walk {
        nearest_first,
        depth,
        end,
    }
}
