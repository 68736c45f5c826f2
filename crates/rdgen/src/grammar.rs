//! Grammar types.

use crate::{
    analysis::{self, Analysis},
    codegen,
    scanner::{ScannerDef, ScannerDefError},
    syntax::{ParseError, Span},
    types::{Map, Set},
    util::{display_fn, join},
};
use std::fmt;

/// The marker stored in FIRST sets for symbols that derive the empty string.
pub const EPSILON: &str = "";

/// The marker stored in FOLLOW sets for the end of input.
pub const END_MARKER: &str = "$";

/// The right-hand side of a production.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A reference to a terminal or nonterminal symbol.
    Identifier(String),
    /// Concatenation of one or more expressions.
    Sequence(Vec<Expr>),
    /// Choice between one or more expressions.
    Alternative(Vec<Expr>),
    /// Zero or more repetitions.
    Many(Box<Expr>),
    /// Zero or one occurrence.
    Optional(Box<Expr>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Identifier(name.into())
    }

    pub fn seq<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        Self::Sequence(items.into_iter().collect())
    }

    pub fn alt<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Expr>,
    {
        Self::Alternative(items.into_iter().collect())
    }

    pub fn many(inner: Expr) -> Self {
        Self::Many(Box::new(inner))
    }

    pub fn optional(inner: Expr) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Visit every identifier in this expression from left to right.
    pub fn identifiers(&self) -> Vec<&str> {
        fn go<'e>(expr: &'e Expr, out: &mut Vec<&'e str>) {
            match expr {
                Expr::Identifier(name) => out.push(name),
                Expr::Sequence(items) | Expr::Alternative(items) => {
                    items.iter().for_each(|item| go(item, out))
                }
                Expr::Many(inner) | Expr::Optional(inner) => go(inner, out),
            }
        }
        let mut out = vec![];
        go(self, &mut out);
        out
    }

    fn is_empty_composite(&self) -> bool {
        match self {
            Expr::Identifier(..) => false,
            Expr::Sequence(items) | Expr::Alternative(items) => {
                items.is_empty() || items.iter().any(Expr::is_empty_composite)
            }
            Expr::Many(inner) | Expr::Optional(inner) => inner.is_empty_composite(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Identifier(name) => f.write_str(name),
            Expr::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match item {
                        Expr::Alternative(..) => write!(f, "({})", item)?,
                        item => write!(f, "{}", item)?,
                    }
                }
                Ok(())
            }
            Expr::Alternative(items) => write!(f, "{}", join(items, " | ")),
            Expr::Many(inner) => write!(f, "{{{}}}", inner),
            Expr::Optional(inner) => write!(f, "[{}]", inner),
        }
    }
}

/// A production rule `lhs: expr;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    pub lhs: String,
    pub expr: Expr,
}

impl Production {
    pub fn new(lhs: impl Into<String>, expr: Expr) -> Self {
        Self {
            lhs: lhs.into(),
            expr,
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.lhs, self.expr)
    }
}

/// A validated LL(1) grammar together with its FIRST and FOLLOW sets.
#[derive(Debug)]
pub struct Definition {
    scanner: ScannerDef,
    productions: Vec<Production>,
    terminals: Set<String>,
    nonterminals: Set<String>,
    analysis: Analysis,
}

impl Definition {
    /// Read a grammar written in the textual notation and validate it against `scanner`.
    ///
    /// Literal strings in the grammar that the scanner does not know yet are
    /// registered as new literal tokens.
    pub fn from_source(source: &str, scanner: ScannerDef) -> Result<Self, Vec<DefinitionError>> {
        let ast = crate::syntax::parse(source).map_err(|err| vec![err.into()])?;
        crate::translate::translate(&ast, scanner)
    }

    /// Check the symbols used in `productions` and run the grammar analysis.
    ///
    /// The first production is the start symbol.
    pub fn new(
        scanner: ScannerDef,
        productions: Vec<Production>,
    ) -> Result<Self, Vec<DefinitionError>> {
        let terminals: Set<String> = scanner.terminal_names().map(str::to_owned).collect();

        let mut errors = vec![];
        let mut nonterminals = Set::default();
        for production in &productions {
            if terminals.contains(&production.lhs) {
                errors.push(DefinitionError::SymbolDefinedAsTerminal {
                    location: None,
                    name: production.lhs.clone(),
                });
            } else if !nonterminals.insert(production.lhs.clone()) {
                errors.push(DefinitionError::SymbolDefinedAsNonTerminal {
                    location: None,
                    name: production.lhs.clone(),
                });
            }
        }
        for production in &productions {
            if production.expr.is_empty_composite() {
                errors.push(DefinitionError::EmptyExpr {
                    name: production.lhs.clone(),
                });
            }
            for name in production.expr.identifiers() {
                if !terminals.contains(name) && !nonterminals.contains(name) {
                    errors.push(DefinitionError::UnknownSymbol {
                        location: None,
                        name: name.to_owned(),
                    });
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let errors = codegen::check_names(&productions);
        if !errors.is_empty() {
            return Err(errors);
        }

        let analysis = analysis::analyze(&productions, &terminals, &nonterminals)?;

        Ok(Self {
            scanner,
            productions,
            terminals,
            nonterminals,
            analysis,
        })
    }

    pub fn scanner(&self) -> &ScannerDef {
        &self.scanner
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions[..]
    }

    pub fn production(&self, name: &str) -> Option<&Production> {
        self.productions.iter().find(|p| p.lhs == name)
    }

    /// The left-hand side of the first production, if any.
    pub fn start_symbol(&self) -> Option<&str> {
        self.productions.first().map(|p| p.lhs.as_str())
    }

    pub fn terminals(&self) -> &Set<String> {
        &self.terminals
    }

    pub fn nonterminals(&self) -> &Set<String> {
        &self.nonterminals
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals.contains(name)
    }

    pub fn is_nonterminal(&self, name: &str) -> bool {
        self.nonterminals.contains(name)
    }

    pub fn nullables(&self) -> &Set<String> {
        &self.analysis.nullables
    }

    pub fn firsts(&self) -> &Map<String, Set<String>> {
        &self.analysis.firsts
    }

    pub fn follows(&self) -> &Map<String, Set<String>> {
        &self.analysis.follows
    }

    /// `First(expr)` against the resolved FIRST sets of this grammar.
    pub fn first(&self, expr: &Expr) -> Set<String> {
        analysis::first(&self.analysis.firsts, expr)
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## terminals:")?;
        for terminal in &self.terminals {
            writeln!(f, "{}", terminal)?;
        }

        writeln!(f, "\n## productions:")?;
        for production in &self.productions {
            write!(f, "{}", production)?;
            if Some(production.lhs.as_str()) == self.start_symbol() {
                write!(f, " (start)")?;
            }
            writeln!(f)?;
        }

        writeln!(f, "\n## first sets:")?;
        for (name, first) in self.firsts() {
            writeln!(f, "{}: {}", name, first_fn(first))?;
        }

        writeln!(f, "\n## follow sets:")?;
        for (name, follow) in self.follows() {
            writeln!(f, "{}: {}", name, first_fn(follow))?;
        }

        Ok(())
    }
}

/// The errors reported while constructing a `Definition`.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    #[error("syntax error: {}", _0)]
    Syntax(#[from] ParseError),

    #[error(transparent)]
    Scanner(#[from] ScannerDefError),

    #[error("{}unknown symbol `{}'", at(.location), .name)]
    UnknownSymbol {
        location: Option<Span>,
        name: String,
    },

    #[error("{}`{}' is already defined as a terminal", at(.location), .name)]
    SymbolDefinedAsTerminal {
        location: Option<Span>,
        name: String,
    },

    #[error("{}`{}' is already defined as a nonterminal", at(.location), .name)]
    SymbolDefinedAsNonTerminal {
        location: Option<Span>,
        name: String,
    },

    #[error("the production `{}' contains an empty sequence or alternative", .name)]
    EmptyExpr { name: String },

    #[error("`{}' is reserved for the token type of the visitor", .name)]
    ReservedName { name: String },

    #[error("`{}' and `{}' both generate `{}'", .first, .second, .generated)]
    NameCollision {
        first: String,
        second: String,
        generated: String,
    },

    #[error("`{}' is left recursive", .name)]
    LeftRecursiveGrammar { name: String },

    #[error(
        "ambiguous alternatives in `{}': {}",
        .name,
        alternatives_fn(.alternatives)
    )]
    AmbiguousAlternatives {
        name: String,
        alternatives: Vec<(Expr, Set<String>)>,
    },

    #[error(
        "ambiguous sequence in `{}': {} may be skipped, but {} may start with the same token",
        .name,
        pair_fn(.hd),
        pair_fn(.tl)
    )]
    AmbiguousSequence {
        name: String,
        hd: (Expr, Set<String>),
        tl: (Expr, Set<String>),
    },
}

fn at(location: &Option<Span>) -> impl fmt::Display + '_ {
    display_fn(move |f| match location {
        Some(span) => write!(f, "{}: ", span),
        None => Ok(()),
    })
}

fn first_fn(first: &Set<String>) -> impl fmt::Display + '_ {
    display_fn(move |f| {
        let items = first.iter().map(|s| match s.as_str() {
            EPSILON => "ε",
            s => s,
        });
        write!(f, "{{{}}}", join(items, ", "))
    })
}

fn pair_fn((expr, first): &(Expr, Set<String>)) -> impl fmt::Display + '_ {
    display_fn(move |f| write!(f, "`{}' {}", expr, first_fn(first)))
}

fn alternatives_fn(alternatives: &[(Expr, Set<String>)]) -> impl fmt::Display + '_ {
    display_fn(move |f| {
        write!(f, "{}", join(alternatives.iter().map(pair_fn), ", "))
    })
}
