//! Calculation of FOLLOW sets.

use super::first::first_of_sequence;
use crate::{
    grammar::{Expr, Production, END_MARKER, EPSILON},
    types::{Map, Set},
};

/// Calculate `Follow(A)` for every nonterminal `A`.
///
/// Nonterminals that never occur on a right-hand side, other than the
/// start symbol, end up with an empty set.
#[tracing::instrument(skip_all)]
pub(super) fn follow_sets(
    productions: &[Production],
    nonterminals: &Set<String>,
    firsts: &Map<String, Set<String>>,
) -> Map<String, Set<String>> {
    let mut map: Map<String, Set<String>> = nonterminals
        .iter()
        .map(|name| (name.clone(), Set::default()))
        .collect();
    if let Some(start) = productions.first() {
        if let Some(follow) = map.get_mut(&start.lhs) {
            follow.insert(END_MARKER.to_owned());
        }
    }

    // The name of a nonterminal inside a follow set stands for its
    // whole follow set until the constraints below are resolved.
    for production in productions {
        let next: Set<String> = Some(production.lhs.clone()).into_iter().collect();
        walk(&production.expr, &next, firsts, &mut map);
    }

    #[derive(Debug)]
    struct Constraint {
        sup: String,
        sub: String,
    }
    let mut constraints = vec![];
    for (name, follow) in &mut map {
        follow.retain(|symbol| {
            if !nonterminals.contains(symbol) {
                return true;
            }
            if symbol != name {
                constraints.push(Constraint {
                    sup: name.clone(),
                    sub: symbol.clone(),
                });
            }
            false
        });
    }

    let mut changed = true;
    let mut iterations = 0;
    while changed {
        changed = false;
        iterations += 1;
        for Constraint { sup, sub } in &constraints {
            let additions: Vec<String> = match (map.get(sub), map.get(sup)) {
                (Some(subset), Some(superset)) => subset
                    .iter()
                    .filter(|tok| !superset.contains(*tok))
                    .cloned()
                    .collect(),
                _ => continue,
            };
            if let Some(superset) = map.get_mut(sup) {
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

    map
}

/// Propagate `next`, the set of symbols that may follow `expr`, into the
/// follow sets of the nonterminals inside `expr`.
fn walk(
    expr: &Expr,
    next: &Set<String>,
    firsts: &Map<String, Set<String>>,
    map: &mut Map<String, Set<String>>,
) {
    match expr {
        Expr::Identifier(name) => {
            if let Some(follow) = map.get_mut(name) {
                follow.extend(next.iter().filter(|s| *s != EPSILON).cloned());
            }
        }
        Expr::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let rest = &items[i + 1..];
                if rest.is_empty() {
                    walk(item, next, firsts, map);
                    continue;
                }
                let mut rest_first = first_of_sequence(firsts, rest);
                if rest_first.shift_remove(EPSILON) {
                    rest_first.extend(next.iter().cloned());
                }
                walk(item, &rest_first, firsts, map);
            }
        }
        Expr::Alternative(items) => {
            for item in items {
                walk(item, next, firsts, map);
            }
        }
        Expr::Many(inner) | Expr::Optional(inner) => walk(inner, next, firsts, map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        first::first_sets,
        tests::{nonterminals_of, sample, set, t},
    };

    fn follows(productions: &[Production], nullables: &[&str]) -> Map<String, Set<String>> {
        let firsts = first_sets(productions, &set(nullables));
        follow_sets(productions, &nonterminals_of(productions), &firsts)
    }

    #[test]
    fn sample_grammar() {
        let (productions, _, _) = sample();
        let follows = follows(&productions, &["C", "D", "E", "F"]);
        assert_eq!(follows["S"], set(&["$"]));
        assert_eq!(follows["B"], set(&["g", "f", "h"]));
        assert_eq!(follows["C"], set(&["g", "f", "h"]));
        assert_eq!(follows["D"], set(&["h"]));
        assert_eq!(follows["E"], set(&["f", "h"]));
        assert_eq!(follows["F"], set(&["h"]));
    }

    #[test]
    fn start_symbol_is_followed_by_end_marker() {
        let productions = vec![
            Production::new("Program", Expr::seq([t("Item"), t("Program2")])),
            Production::new("Program2", Expr::optional(t("Program"))),
            Production::new("Item", t("x")),
        ];
        let follows = follows(&productions, &["Program2"]);
        assert_eq!(follows["Program"], set(&["$"]));
        assert_eq!(follows["Program2"], set(&["$"]));
        assert_eq!(follows["Item"], set(&["x", "$"]));
    }

    #[test]
    fn unreachable_symbols_have_empty_follow() {
        let productions = vec![
            Production::new("Program", t("x")),
            Production::new("Unused", t("y")),
        ];
        let follows = follows(&productions, &[]);
        assert!(follows["Unused"].is_empty());
    }
}
