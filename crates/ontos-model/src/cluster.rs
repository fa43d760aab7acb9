//! Equivalence clusters: maximal groups of nodes mutually reachable
//! through subsumption/equivalence edges in both directions.
//!
//! Computed as a strongly-connected-components pass over the explicit
//! edge relation before any minimality test runs, so cycles are detected
//! once per query instead of re-discovered during every walk. The
//! traversal is iterative with an explicit stack — never recursion
//! relying on call-stack depth.
//!
//! Clusters are generated on demand and never persisted; a new query over
//! an edited graph recomputes them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ontos_graph::Term;

/// The partition of traversed nodes into equivalence clusters.
#[derive(Debug, Clone, Default)]
pub struct Clusters {
    component_of: HashMap<Term, usize>,
    members: Vec<BTreeSet<Term>>,
}

impl Clusters {
    /// Whether two nodes fall into the same cluster.
    ///
    /// Nodes the pass never saw are singleton clusters of themselves.
    pub fn same(&self, a: &Term, b: &Term) -> bool {
        if a == b {
            return true;
        }
        match (self.component_of.get(a), self.component_of.get(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }

    /// All members of the cluster containing `node`, including itself.
    pub fn cluster_of(&self, node: &Term) -> BTreeSet<Term> {
        match self.component_of.get(node) {
            Some(id) => self.members[*id].clone(),
            None => BTreeSet::from([node.clone()]),
        }
    }

    /// Cluster members other than `node` itself.
    pub fn mates_of(&self, node: &Term) -> BTreeSet<Term> {
        let mut cluster = self.cluster_of(node);
        cluster.remove(node);
        cluster
    }
}

/// Partition the nodes of `adjacency` into strongly connected components.
///
/// Equivalence assertions must already be present as edges in both
/// directions; mutual subsumption cycles need nothing special.
pub fn strongly_connected(adjacency: &BTreeMap<Term, BTreeSet<Term>>) -> Clusters {
    // stable index assignment over every node mentioned anywhere
    let mentioned: BTreeSet<&Term> = adjacency
        .iter()
        .flat_map(|(from, targets)| std::iter::once(from).chain(targets.iter()))
        .collect();
    let terms: Vec<Term> = mentioned.into_iter().cloned().collect();
    let ids: HashMap<&Term, usize> = terms.iter().enumerate().map(|(i, t)| (t, i)).collect();

    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); terms.len()];
    for (from, targets) in adjacency {
        let f = ids[from];
        for to in targets {
            adj[f].push(ids[to]);
        }
    }

    let n = terms.len();
    const UNVISITED: usize = usize::MAX;
    let mut order = vec![UNVISITED; n];
    let mut low = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut counter = 0usize;
    let mut components: Vec<Vec<usize>> = Vec::new();

    for start in 0..n {
        if order[start] != UNVISITED {
            continue;
        }
        let mut frames: Vec<(usize, usize)> = vec![(start, 0)];
        while let Some(frame) = frames.last_mut() {
            let (v, pos) = (frame.0, frame.1);
            if order[v] == UNVISITED {
                order[v] = counter;
                low[v] = counter;
                counter += 1;
                stack.push(v);
                on_stack[v] = true;
            }
            if pos < adj[v].len() {
                let w = adj[v][pos];
                frame.1 += 1;
                if order[w] == UNVISITED {
                    frames.push((w, 0));
                } else if on_stack[w] {
                    low[v] = low[v].min(order[w]);
                }
                continue;
            }
            frames.pop();
            if let Some(parent) = frames.last() {
                let p = parent.0;
                low[p] = low[p].min(low[v]);
            }
            if low[v] == order[v] {
                let mut component = Vec::new();
                while let Some(w) = stack.pop() {
                    on_stack[w] = false;
                    component.push(w);
                    if w == v {
                        break;
                    }
                }
                components.push(component);
            }
        }
    }

    let mut component_of = HashMap::new();
    let mut members = Vec::with_capacity(components.len());
    for (id, component) in components.into_iter().enumerate() {
        let set: BTreeSet<Term> = component.iter().map(|w| terms[*w].clone()).collect();
        for term in &set {
            component_of.insert(term.clone(), id);
        }
        members.push(set);
    }

    Clusters {
        component_of,
        members,
    }
}
