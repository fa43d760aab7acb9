//! Root and least-common-ancestor utilities over the class hierarchy.
//!
//! Both are built strictly on top of the hierarchy engine: they add no
//! edge semantics of their own.

use std::collections::{BTreeMap, BTreeSet};

use ontos_graph::{Graph, Term};

use crate::error::OntError;
use crate::hierarchy::{Direction, QueryCtx};

/// Named classes with no named proper superclass anywhere above them.
///
/// The upward walk continues through anonymous composite expressions —
/// an anonymous ancestor never disqualifies a class — but any *named*
/// ancestor other than the universal class does, including mutually
/// equivalent named classes, which disqualify each other.
pub(crate) fn named_hierarchy_roots<G: Graph>(ctx: &QueryCtx<'_, G>) -> BTreeSet<Term> {
    let personality = ctx.personality();
    let top = personality.builtins().universal_class();
    ctx.all_classes()
        .into_iter()
        .filter(|class| class.is_named())
        .filter(|class| !personality.builtins().contains(class))
        .filter(|class| {
            !ctx.list(class, Direction::Up, false).iter().any(|ancestor| {
                ancestor.is_named() && ancestor != class && Some(ancestor) != top
            })
        })
        .collect()
}

/// Breadth-first ancestor enumeration with depth recording, over the
/// cluster-collapsed hierarchy: equivalence steps cost nothing, so a
/// cluster behaves as a single hierarchy node.
///
/// Keys are cluster representatives; the start node sits at depth zero.
fn ancestor_depths<G: Graph>(ctx: &QueryCtx<'_, G>, node: &Term) -> BTreeMap<Term, usize> {
    let clusters = ctx.clusters();
    let representative = |t: &Term| -> Term {
        clusters
            .cluster_of(t)
            .into_iter()
            .next()
            .unwrap_or_else(|| t.clone())
    };

    let mut depths: BTreeMap<Term, usize> = BTreeMap::new();
    depths.insert(representative(node), 0);
    let mut frontier: BTreeSet<Term> = clusters.cluster_of(node);
    let mut depth = 0usize;
    while !frontier.is_empty() {
        depth += 1;
        let mut next: BTreeSet<Term> = BTreeSet::new();
        for member in &frontier {
            for parent in ctx.parents_via_subsumption(member) {
                let rep = representative(&parent);
                if !depths.contains_key(&rep) {
                    depths.insert(rep, depth);
                    next.extend(clusters.cluster_of(&parent));
                }
            }
        }
        frontier = next;
    }
    depths
}

/// The least common ancestor of two classes in the named plus
/// built-in-top hierarchy.
///
/// The common ancestor nearest to both (minimum combined depth) wins;
/// ties break on term order for determinism. The universal class is the
/// fallback answer, so profiles without one cannot answer at all.
pub(crate) fn get_lca<G: Graph>(
    ctx: &QueryCtx<'_, G>,
    a: &Term,
    b: &Term,
) -> Result<Term, OntError> {
    let Some(top) = ctx.personality().builtins().universal_class().cloned() else {
        return Err(OntError::UnsupportedInProfile {
            what: "least common ancestor needs a universal class".to_string(),
            profile: ctx.personality().name().to_string(),
        });
    };

    let mut depths_a = ancestor_depths(ctx, a);
    let mut depths_b = ancestor_depths(ctx, b);

    // the universal class is an ancestor of last resort on both sides
    let fallback_a = depths_a.values().max().copied().unwrap_or(0) + 1;
    let fallback_b = depths_b.values().max().copied().unwrap_or(0) + 1;
    depths_a.entry(top.clone()).or_insert(fallback_a);
    depths_b.entry(top).or_insert(fallback_b);

    let mut best: Option<(usize, Term)> = None;
    for (rep, depth_a) in &depths_a {
        let Some(depth_b) = depths_b.get(rep) else {
            continue;
        };
        let cost = depth_a + depth_b;
        let better = match &best {
            None => true,
            Some((best_cost, best_rep)) => {
                cost < *best_cost || (cost == *best_cost && rep < best_rep)
            }
        };
        if better {
            best = Some((cost, rep.clone()));
        }
    }
    let Some((_, rep)) = best else {
        // unreachable in practice: the top was injected on both sides
        return Err(OntError::NotRecognized {
            term: a.clone(),
            requested: "common ancestor".to_string(),
        });
    };

    // prefer a named member when a cluster won
    let cluster = ctx.clusters().cluster_of(&rep);
    let preferred = cluster
        .iter()
        .find(|t| t.is_named())
        .cloned()
        .unwrap_or(rep);
    Ok(preferred)
}
