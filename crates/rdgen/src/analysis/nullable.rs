//! Calculation of the nullable symbols.

use crate::{
    grammar::{Expr, Production},
    types::{Map, Set},
};

/// Calculate the set of nonterminals deriving the empty string.
///
/// Symbols whose nullability never becomes known are treated as non-nullable.
#[tracing::instrument(skip_all)]
pub(super) fn nullables(productions: &[Production], terminals: &Set<String>) -> Set<String> {
    let mut table: Map<&str, bool> = Map::default();

    let mut changed = true;
    let mut iterations = 0;
    while changed {
        changed = false;
        iterations += 1;
        for production in productions {
            if table.contains_key(production.lhs.as_str()) {
                continue;
            }
            if let Some(nullable) = check(&production.expr, terminals, &table) {
                table.insert(&production.lhs, nullable);
                changed = true;
            }
        }
    }
    tracing::trace!("converged after {} iteration(s)", iterations);

    table
        .into_iter()
        .filter_map(|(name, nullable)| nullable.then(|| name.to_owned()))
        .collect()
}

/// Ternary nullability of an expression. `None` means it depends on a
/// symbol that is not resolved yet.
fn check(expr: &Expr, terminals: &Set<String>, table: &Map<&str, bool>) -> Option<bool> {
    match expr {
        Expr::Identifier(name) if terminals.contains(name) => Some(false),
        Expr::Identifier(name) => table.get(name.as_str()).copied(),
        Expr::Sequence(items) => {
            let mut unknown = false;
            for item in items {
                match check(item, terminals, table) {
                    Some(false) => return Some(false),
                    None => unknown = true,
                    Some(true) => (),
                }
            }
            (!unknown).then_some(true)
        }
        Expr::Alternative(items) => {
            let mut unknown = false;
            for item in items {
                match check(item, terminals, table) {
                    Some(true) => return Some(true),
                    None => unknown = true,
                    Some(false) => (),
                }
            }
            (!unknown).then_some(false)
        }
        Expr::Many(..) | Expr::Optional(..) => Some(true),
    }
}

/// Nullability of an expression against the resolved nullable symbols.
pub(super) fn is_nullable(expr: &Expr, nullables: &Set<String>) -> bool {
    match expr {
        Expr::Identifier(name) => nullables.contains(name),
        Expr::Sequence(items) => items.iter().all(|item| is_nullable(item, nullables)),
        Expr::Alternative(items) => items.iter().any(|item| is_nullable(item, nullables)),
        Expr::Many(..) | Expr::Optional(..) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::{sample, set, t};

    #[test]
    fn sample_grammar() {
        let (productions, terminals, _) = sample();
        assert_eq!(nullables(&productions, &terminals), set(&["C", "D", "E", "F"]));
    }

    #[test]
    fn resolves_forward_references() {
        let productions = vec![
            Production::new("A", Expr::seq([t("B"), t("C")])),
            Production::new("B", Expr::alt([t("x"), t("C")])),
            Production::new("C", Expr::many(t("x"))),
        ];
        assert_eq!(
            nullables(&productions, &set(&["x"])),
            set(&["A", "B", "C"])
        );
    }

    #[test]
    fn unresolved_symbols_are_not_nullable() {
        let productions = vec![
            Production::new("A", t("B")),
            Production::new("B", t("A")),
            Production::new("C", Expr::seq([t("A"), t("x")])),
        ];
        let nullables = nullables(&productions, &set(&["x"]));
        assert!(nullables.is_empty());
    }

    #[test]
    fn expression_nullability() {
        let nullables = set(&["N"]);
        assert!(is_nullable(&Expr::seq([t("N"), Expr::many(t("x"))]), &nullables));
        assert!(!is_nullable(&Expr::seq([t("N"), t("x")]), &nullables));
        assert!(is_nullable(&Expr::alt([t("x"), t("N")]), &nullables));
        assert!(is_nullable(&Expr::optional(t("x")), &nullables));
    }
}
