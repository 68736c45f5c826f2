//! Detection of LL(1) conflicts.

use super::first::first;
use crate::{
    grammar::{DefinitionError, Expr, Production, EPSILON},
    types::{Map, Set},
};

/// Collect every LL(1) conflict in the productions.
#[tracing::instrument(skip_all)]
pub(super) fn check(
    productions: &[Production],
    firsts: &Map<String, Set<String>>,
) -> Vec<DefinitionError> {
    let mut errors = vec![];
    for production in productions {
        check_expr(&production.lhs, &production.expr, firsts, &mut errors);
    }
    errors
}

fn check_expr(
    name: &str,
    expr: &Expr,
    firsts: &Map<String, Set<String>>,
    errors: &mut Vec<DefinitionError>,
) {
    match expr {
        Expr::Identifier(..) => (),

        Expr::Alternative(items) => {
            let alternatives: Vec<(Expr, Set<String>)> = items
                .iter()
                .map(|item| (item.clone(), first(firsts, item)))
                .collect();
            let overlapping = alternatives.iter().enumerate().any(|(i, (_, a))| {
                alternatives[i + 1..]
                    .iter()
                    .any(|(_, b)| !a.is_disjoint(b))
            });
            if overlapping {
                tracing::trace!("ambiguous alternatives in {}: {}", name, expr);
                errors.push(DefinitionError::AmbiguousAlternatives {
                    name: name.to_owned(),
                    alternatives,
                });
            }
            for item in items {
                check_expr(name, item, firsts, errors);
            }
        }

        Expr::Sequence(items) => {
            for (i, hd) in items.iter().enumerate().take(items.len().saturating_sub(1)) {
                let hd_first = first(firsts, hd);
                if !hd_first.contains(EPSILON) {
                    continue;
                }
                let rest = &items[i + 1..];
                let tl = match rest {
                    [single] => single.clone(),
                    rest => Expr::Sequence(rest.to_vec()),
                };
                let tl_first = first(firsts, &tl);
                let overlapping = hd_first
                    .iter()
                    .any(|symbol| symbol != EPSILON && tl_first.contains(symbol));
                if overlapping {
                    tracing::trace!("ambiguous sequence in {}: {}", name, expr);
                    errors.push(DefinitionError::AmbiguousSequence {
                        name: name.to_owned(),
                        hd: (hd.clone(), hd_first),
                        tl: (tl, tl_first),
                    });
                }
            }
            for item in items {
                check_expr(name, item, firsts, errors);
            }
        }

        Expr::Many(inner) | Expr::Optional(inner) => check_expr(name, inner, firsts, errors),
    }
}
