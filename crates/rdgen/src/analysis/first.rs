//! Calculation of FIRST sets.

use super::nullable::is_nullable;
use crate::{
    grammar::{Expr, Production, EPSILON},
    types::{Map, Set},
};

/// Calculate `First(A)` for every nonterminal `A`.
///
/// The epsilon marker is included for nullable symbols.
#[tracing::instrument(skip_all)]
pub(super) fn first_sets(
    productions: &[Production],
    nullables: &Set<String>,
) -> Map<String, Set<String>> {
    let nonterminals: Set<&str> = productions.iter().map(|p| p.lhs.as_str()).collect();

    // For A -> ... the symbols that may start the expression are either
    // terminals, added directly, or nonterminals B, which give rise to
    // the constraint First(A) ⊇ First(B).
    #[derive(Debug)]
    struct Constraint<'g> {
        sup: &'g str,
        sub: &'g str,
    }
    let mut constraints = vec![];
    let mut map: Map<String, Set<String>> = Map::default();
    for production in productions {
        let mut leading = Set::default();
        collect_leading(&production.expr, nullables, &mut leading);

        let mut first = Set::default();
        for symbol in leading {
            if !nonterminals.contains(symbol) {
                first.insert(symbol.to_owned());
            } else if symbol != production.lhs {
                constraints.push(Constraint {
                    sup: &production.lhs,
                    sub: symbol,
                });
            }
        }
        map.insert(production.lhs.clone(), first);
    }

    let mut changed = true;
    let mut iterations = 0;
    while changed {
        changed = false;
        iterations += 1;
        for Constraint { sup, sub } in &constraints {
            let additions: Vec<String> = match (map.get(*sub), map.get(*sup)) {
                (Some(subset), Some(superset)) => subset
                    .iter()
                    .filter(|tok| !superset.contains(*tok))
                    .cloned()
                    .collect(),
                _ => continue,
            };
            if let Some(superset) = map.get_mut(*sup) {
                if !additions.is_empty() {
                    superset.extend(additions);
                    changed = true;
                }
            }
        }
    }
    tracing::trace!(
        "{} constraint(s) resolved after {} iteration(s)",
        constraints.len(),
        iterations
    );

    for (name, first) in &mut map {
        if nullables.contains(name) {
            first.insert(EPSILON.to_owned());
        }
    }

    map
}

/// The symbols that may start `expr`, with nonterminals left unexpanded.
fn collect_leading<'e>(expr: &'e Expr, nullables: &Set<String>, out: &mut Set<&'e str>) {
    match expr {
        Expr::Identifier(name) => {
            out.insert(name);
        }
        Expr::Sequence(items) => {
            for item in items {
                collect_leading(item, nullables, out);
                if !is_nullable(item, nullables) {
                    break;
                }
            }
        }
        Expr::Alternative(items) => {
            for item in items {
                collect_leading(item, nullables, out);
            }
        }
        Expr::Many(inner) | Expr::Optional(inner) => collect_leading(inner, nullables, out),
    }
}

/// Calculate `First(expr)` for an arbitrary expression using the resolved FIRST sets.
///
/// Identifiers without an entry in `firsts` are treated as terminals.
pub fn first(firsts: &Map<String, Set<String>>, expr: &Expr) -> Set<String> {
    match expr {
        Expr::Identifier(name) => match firsts.get(name) {
            Some(first) => first.clone(),
            None => Some(name.clone()).into_iter().collect(),
        },
        Expr::Sequence(items) => first_of_sequence(firsts, items),
        Expr::Alternative(items) => items.iter().flat_map(|item| first(firsts, item)).collect(),
        Expr::Many(inner) | Expr::Optional(inner) => {
            let mut set = first(firsts, inner);
            set.insert(EPSILON.to_owned());
            set
        }
    }
}

/// `First(items[0] items[1] ... items[n-1])`. The empty sequence yields `{ε}`.
pub(super) fn first_of_sequence(firsts: &Map<String, Set<String>>, items: &[Expr]) -> Set<String> {
    let mut set = Set::default();
    for item in items {
        let mut item_first = first(firsts, item);
        let nullable = item_first.shift_remove(EPSILON);
        set.extend(item_first);
        if !nullable {
            return set;
        }
    }
    set.insert(EPSILON.to_owned());
    set
}
