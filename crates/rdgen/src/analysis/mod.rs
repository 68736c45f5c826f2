//! Grammar analysis: nullability, left recursion, FIRST/FOLLOW sets and LL(1) conflicts.

mod first;
mod follow;
mod left_recursion;
mod ll1;
mod nullable;

pub use self::first::first;

use crate::{
    grammar::{DefinitionError, Production},
    types::{Map, Set},
};

/// The results of analyzing a grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub nullables: Set<String>,
    pub firsts: Map<String, Set<String>>,
    pub follows: Map<String, Set<String>>,
}

/// Run every analysis pass over the productions.
///
/// Left recursion is reported before anything else, and no further
/// analysis happens once it is found.
#[tracing::instrument(skip_all)]
pub fn analyze(
    productions: &[Production],
    terminals: &Set<String>,
    nonterminals: &Set<String>,
) -> Result<Analysis, Vec<DefinitionError>> {
    let recursive = left_recursion::left_recursive(productions, nonterminals);
    if !recursive.is_empty() {
        tracing::debug!("left recursive symbols: {:?}", recursive);
        return Err(recursive
            .into_iter()
            .map(|name| DefinitionError::LeftRecursiveGrammar { name })
            .collect());
    }

    let nullables = nullable::nullables(productions, terminals);
    tracing::debug!("nullable symbols: {:?}", nullables);

    let firsts = first::first_sets(productions, &nullables);
    let follows = follow::follow_sets(productions, nonterminals, &firsts);

    let conflicts = ll1::check(productions, &firsts);
    if !conflicts.is_empty() {
        tracing::debug!("{} LL(1) conflict(s) found", conflicts.len());
        return Err(conflicts);
    }

    Ok(Analysis {
        nullables,
        firsts,
        follows,
    })
}
