//! Detection of left-recursive nonterminals.

use crate::{
    grammar::{Expr, Production},
    types::{Map, Set},
};

/// Return every left-recursive nonterminal, in declaration order.
#[tracing::instrument(skip_all)]
pub(super) fn left_recursive(productions: &[Production], nonterminals: &Set<String>) -> Vec<String> {
    // A -> {B | B can appear leftmost in a derivation of A}
    let mut deps: Map<&str, Set<&str>> = Map::default();
    for production in productions {
        let mut leftmost = Set::default();
        collect_leftmost(&production.expr, &mut leftmost);
        leftmost.retain(|name| nonterminals.contains(*name));
        deps.insert(&production.lhs, leftmost);
    }

    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..deps.len() {
            let additions: Vec<&str> = deps[i]
                .iter()
                .filter_map(|dep| deps.get(dep))
                .flatten()
                .copied()
                .filter(|name| !deps[i].contains(name))
                .collect();
            if !additions.is_empty() {
                deps[i].extend(additions);
                changed = true;
            }
        }
    }

    deps.iter()
        .filter(|(name, closure)| closure.contains(*name))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Collect the symbols that may start `expr`, stopping after the first
/// element of a sequence that cannot be skipped.
fn collect_leftmost<'e>(expr: &'e Expr, out: &mut Set<&'e str>) {
    match expr {
        Expr::Identifier(name) => {
            out.insert(name);
        }
        Expr::Sequence(items) => {
            for item in items {
                collect_leftmost(item, out);
                if !is_skippable(item) {
                    break;
                }
            }
        }
        Expr::Alternative(items) => {
            for item in items {
                collect_leftmost(item, out);
            }
        }
        Expr::Many(inner) | Expr::Optional(inner) => collect_leftmost(inner, out),
    }
}

/// Whether `expr` may match nothing, judged from its shape alone.
///
/// Identifiers always count as consuming input, even when they name a
/// nullable nonterminal.
fn is_skippable(expr: &Expr) -> bool {
    match expr {
        Expr::Identifier(..) => false,
        Expr::Sequence(items) => items.iter().all(is_skippable),
        Expr::Alternative(items) => items.iter().any(is_skippable),
        Expr::Many(..) | Expr::Optional(..) => true,
    }
}
