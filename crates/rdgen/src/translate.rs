//! Translation of a parsed grammar file into a `Definition`.

use crate::{
    grammar::{Definition, DefinitionError, Expr, Production},
    scanner::{ScannerDef, TokenRule},
    syntax::ast,
    types::Set,
};

/// Resolve the symbols of `def` against `scanner` and validate the result.
///
/// Literal strings are replaced by the terminal with the same literal text,
/// which is added to the scanner when it does not exist yet.
#[tracing::instrument(skip_all, fields(uses = %def.uses))]
pub fn translate(
    def: &ast::Definition,
    mut scanner: ScannerDef,
) -> Result<Definition, Vec<DefinitionError>> {
    let mut errors = vec![];

    let mut nonterminals: Set<&str> = Set::default();
    for production in &def.productions {
        if scanner.has_token(&production.name) {
            errors.push(DefinitionError::SymbolDefinedAsTerminal {
                location: Some(production.name_span),
                name: production.name.clone(),
            });
        } else if !nonterminals.insert(&production.name) {
            errors.push(DefinitionError::SymbolDefinedAsNonTerminal {
                location: Some(production.name_span),
                name: production.name.clone(),
            });
        }
    }

    let mut translator = Translator {
        scanner: &mut scanner,
        nonterminals: &nonterminals,
        errors: &mut errors,
    };
    let productions: Vec<Production> = def
        .productions
        .iter()
        .map(|production| Production {
            lhs: production.name.clone(),
            expr: translator.expr(&production.expr),
        })
        .collect();

    if !errors.is_empty() {
        return Err(errors);
    }

    Definition::new(scanner, productions)
}

struct Translator<'t> {
    scanner: &'t mut ScannerDef,
    nonterminals: &'t Set<&'t str>,
    errors: &'t mut Vec<DefinitionError>,
}

impl Translator<'_> {
    fn expr(&mut self, expr: &ast::Expr) -> Expr {
        match expr {
            ast::Expr::Alternative(items) => {
                Expr::Alternative(items.iter().map(|item| self.expr(item)).collect())
            }
            ast::Expr::Sequence(items) => {
                Expr::Sequence(items.iter().map(|item| self.expr(item)).collect())
            }
            ast::Expr::Paren(inner) => self.expr(inner),
            ast::Expr::Many(inner) => Expr::Many(Box::new(self.expr(inner))),
            ast::Expr::Optional(inner) => Expr::Optional(Box::new(self.expr(inner))),
            ast::Expr::Identifier { name, span } => {
                if !self.scanner.has_token(name) && !self.nonterminals.contains(name.as_str()) {
                    self.errors.push(DefinitionError::UnknownSymbol {
                        location: Some(*span),
                        name: name.clone(),
                    });
                }
                Expr::Identifier(name.clone())
            }
            ast::Expr::LiteralString { value, .. } => Expr::Identifier(self.literal(value)),
        }
    }

    fn literal(&mut self, text: &str) -> String {
        if let Some(name) = self.scanner.literal_match(text) {
            return name.to_owned();
        }
        let nonterminals = self.nonterminals;
        let name = self
            .scanner
            .calculate_token_name(text, |name| nonterminals.contains(name));
        tracing::trace!("literal {:?} is named {}", text, name);
        if let Err(err) = self
            .scanner
            .add_token(&name, TokenRule::Literal(text.to_owned()))
        {
            self.errors.push(err.into());
        }
        name
    }
}
