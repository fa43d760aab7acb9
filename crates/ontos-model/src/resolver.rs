//! The entity resolver: admissibility of (node, role) pairs.
//!
//! The algorithm is personality-agnostic; profiles differ only in the
//! registry handed in. The admissibility test runs in a fixed order:
//!
//! 1. built-in nodes are accepted for their role unconditionally;
//! 2. reserved-vocabulary nodes are rejected for every other role;
//! 3. the role's recognizer pattern must match;
//! 4. the punning table must not forbid a role the node already
//!    explicitly holds.
//!
//! Resolution never mutates the graph. A [`ResolveCtx`] memo may be
//! shared across the lookups of one logical operation (one hierarchy
//! walk); it must not outlive the operation.

use std::collections::HashMap;

use ontos_graph::{Graph, Term};

use crate::error::OntError;
use crate::personality::Personality;
use crate::role::{CompositeRole, EntityRole};
use crate::view::TypedView;

/// Query-scoped memo for admissibility checks.
///
/// Keyed by (node, role); never shared across threads or operations.
#[derive(Debug, Default)]
pub struct ResolveCtx {
    memo: HashMap<(Term, EntityRole), bool>,
}

impl ResolveCtx {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Full admissibility test with the typed rejection reason.
fn admit<'p, G: Graph>(
    graph: &G,
    personality: &'p Personality,
    node: &Term,
    role: EntityRole,
) -> Result<&'p crate::personality::RoleSpec, OntError> {
    let Some(spec) = personality.spec_for(role) else {
        return Err(OntError::UnsupportedInProfile {
            what: format!("role {role}"),
            profile: personality.name().to_string(),
        });
    };

    if personality.builtins().is_builtin(node, role) {
        return Ok(spec);
    }

    if personality.reserved().contains(node) {
        return Err(OntError::ReservedConflict {
            term: node.clone(),
            requested: role,
        });
    }

    if !spec.recognizer.matches(graph, node) {
        return Err(OntError::NotRecognized {
            term: node.clone(),
            requested: role.to_string(),
        });
    }

    for held in personality.punnings().forbidden_for(role) {
        let declared = personality
            .spec_for(held)
            .is_some_and(|h| h.recognizer.matches(graph, node));
        if declared {
            return Err(OntError::PunningConflict {
                term: node.clone(),
                requested: role,
                held,
            });
        }
    }

    Ok(spec)
}

/// Resolve `node` as `role`, or report why it cannot present that way.
pub fn resolve<G: Graph>(
    graph: &G,
    personality: &Personality,
    node: &Term,
    role: EntityRole,
) -> Result<TypedView, OntError> {
    let spec = admit(graph, personality, node, role)?;
    Ok(spec.construct(node, graph.revision()))
}

/// Resolve `node` under a composite role, reporting the most specific
/// matching primitive variant.
pub fn resolve_composite<G: Graph>(
    graph: &G,
    personality: &Personality,
    node: &Term,
    composite: CompositeRole,
) -> Result<TypedView, OntError> {
    for role in composite.candidates() {
        if !personality.supports(*role) {
            continue;
        }
        if let Ok(view) = resolve(graph, personality, node, *role) {
            return Ok(view);
        }
    }
    Err(OntError::NotRecognized {
        term: node.clone(),
        requested: composite.to_string(),
    })
}

/// Memoized boolean admissibility, for traversal-time filtering.
pub(crate) fn admissible<G: Graph>(
    graph: &G,
    personality: &Personality,
    ctx: &mut ResolveCtx,
    node: &Term,
    role: EntityRole,
) -> bool {
    if let Some(hit) = ctx.memo.get(&(node.clone(), role)) {
        return *hit;
    }
    let verdict = admit(graph, personality, node, role).is_ok();
    ctx.memo.insert((node.clone(), role), verdict);
    verdict
}

/// Whether any primitive variant of `composite` admits the node.
pub(crate) fn composite_admissible<G: Graph>(
    graph: &G,
    personality: &Personality,
    ctx: &mut ResolveCtx,
    node: &Term,
    composite: CompositeRole,
) -> bool {
    composite
        .candidates()
        .iter()
        .filter(|role| personality.supports(**role))
        .any(|role| admissible(graph, personality, ctx, node, *role))
}
