//! Generation of the recursive-descent parser source code.

use crate::{
    grammar::{Definition, DefinitionError, Expr, Production, EPSILON},
    scanner::TokenRule,
    types::{Map, Set},
    util::{escape_ident, to_snake_case},
};
use indexmap::map::Entry;
use std::{cell::Cell, fmt, ptr};

/// The associated type of `Visitor` bound to the scanner's tokens.
pub const TOKEN_TYPE: &str = "Token";

/// Emits Rust source code of a predictive parser for a validated grammar.
///
/// The output consists of:
///
/// * the token kind enum (`TToken` by default), listing every terminal and
///   the end-of-stream kind,
/// * the `Visitor` trait, with one associated type per production and one
///   callback per production (or per branch of a top-level alternative),
/// * one `<Production>Choice<n>` enum per nested alternative,
/// * the `parse_<start>` entry point.
#[derive(Debug)]
pub struct Codegen<'g> {
    def: &'g Definition,
    runtime: String,
    token_kind: String,
    end_of_stream: Option<String>,
    choices: Vec<Choice<'g>>,
}

#[derive(Debug)]
struct Choice<'g> {
    lhs: &'g str,
    index: usize,
    expr: &'g Expr,
    items: &'g [Expr],
}

impl<'g> Codegen<'g> {
    pub fn new(def: &'g Definition) -> Self {
        let choices = choices_of(def.productions());
        tracing::trace!("{} nested alternative(s)", choices.len());

        Self {
            def,
            runtime: "::rdgen_runtime".into(),
            token_kind: "TToken".into(),
            end_of_stream: Some("EOS".into()),
            choices,
        }
    }

    /// Specify the path to the runtime crate, `::rdgen_runtime` by default.
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime = path.into();
        self
    }

    /// Specify the name of the generated token kind enum, `TToken` by default.
    pub fn token_kind(mut self, name: impl Into<String>) -> Self {
        self.token_kind = name.into();
        self
    }

    /// Specify the token kind that the scanner reports at the end of input.
    ///
    /// When a terminal with the same name exists, that terminal is used.
    /// `None` disables the check for the end of input after the start symbol.
    pub fn end_of_stream(mut self, name: Option<&str>) -> Self {
        self.end_of_stream = name.map(str::to_owned);
        self
    }

    fn choice(&self, expr: &Expr) -> Option<&Choice<'g>> {
        self.choices.iter().find(|c| ptr::eq(c.expr, expr))
    }

    fn is_terminal(&self, name: &str) -> bool {
        self.def.is_terminal(name)
    }

    /// The terminals in `set`, in declaration order.
    fn ordered<'s>(&'s self, set: &Set<String>) -> Vec<&'s str> {
        self.def
            .terminals()
            .iter()
            .filter(|t| set.contains(*t))
            .map(String::as_str)
            .collect()
    }

    /// `First(expr) - {ε}`, in declaration order.
    fn guard_set(&self, expr: &Expr) -> Vec<&str> {
        let mut first = self.def.first(expr);
        first.shift_remove(EPSILON);
        self.ordered(&first)
    }

    fn kind(&self, name: &str) -> String {
        format!("{}::{}", self.token_kind, name)
    }

    fn kinds(&self, names: &[&str]) -> String {
        let kinds: Vec<String> = names.iter().map(|name| self.kind(name)).collect();
        format!("&[{}]", kinds.join(", "))
    }

    fn guard(&self, names: &[&str]) -> String {
        match names {
            [name] => format!("self.input.is({})", self.kind(name)),
            names => format!("self.input.is_any({})", self.kinds(names)),
        }
    }

    fn eos_kind(&self) -> Option<&str> {
        self.end_of_stream.as_deref()
    }

    /// The type of the value produced when parsing `expr`.
    fn ty(&self, expr: &Expr, owner: &str) -> String {
        match expr {
            Expr::Identifier(name) if self.is_terminal(name) => format!("{}::{}", owner, TOKEN_TYPE),
            Expr::Identifier(name) => format!("{}::{}", owner, escape_ident(name)),
            Expr::Sequence(items) => match &items[..] {
                [item] => format!("({},)", self.ty(item, owner)),
                items => {
                    let tys: Vec<String> = items.iter().map(|item| self.ty(item, owner)).collect();
                    format!("({})", tys.join(", "))
                }
            },
            Expr::Alternative(..) => match self.choice(expr) {
                Some(choice) => format!("{}<{}>", choice.name(), owner),
                None => "()".into(),
            },
            Expr::Many(inner) => format!("Vec<{}>", self.ty(inner, owner)),
            Expr::Optional(inner) => format!("Option<{}>", self.ty(inner, owner)),
        }
    }

    /// The parameters of a visitor callback for `expr`.
    fn params(&self, expr: &Expr, owner: &str) -> Vec<(String, String)> {
        match expr {
            Expr::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| (format!("a{}", i + 1), self.ty(item, owner)))
                .collect(),
            expr => vec![("a".into(), self.ty(expr, owner))],
        }
    }

    fn fmt_header(&self, out: &mut Out) {
        out.line("// This file is automatically generated by rdgen.");
        out.line("// Do not edit it directly.");
        out.blank();
        out.line("#[allow(unused_imports)]");
        out.line(format!("use {}::_private as __rt;", self.runtime));
    }

    fn fmt_token_kind(&self, out: &mut Out) {
        let scanner = self.def.scanner();
        let eos = self
            .eos_kind()
            .filter(|eos| !scanner.has_token(eos))
            .map(str::to_owned);

        out.blank();
        out.line("/// The kinds of tokens recognized by the parser.");
        out.line("#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]");
        out.open(format!("pub enum {} {{", self.token_kind));
        for (name, rule) in scanner.tokens() {
            let doc = match rule {
                TokenRule::Literal(text) => format!(" `{:?}`", text),
                TokenRule::Pattern(pattern) => format!(" /{}/", pattern),
            };
            out.line(format!("#[doc = {:?}]", doc));
            out.line(format!("{},", name));
        }
        if let Some(eos) = &eos {
            out.line("/// End of input.");
            out.line(format!("{},", eos));
        }
        out.close("}");

        out.blank();
        out.open(format!("impl {} {{", self.token_kind));
        out.line("/// Return the text of a literal token.");
        out.line("#[allow(unreachable_patterns)]");
        out.open("pub fn literal(self) -> Option<&'static str> {");
        out.open("match self {");
        for (name, rule) in scanner.tokens() {
            if let TokenRule::Literal(text) = rule {
                out.line(format!("Self::{} => Some({:?}),", name, text));
            }
        }
        out.line("_ => None,");
        out.close("}");
        out.close("}");
        out.blank();
        out.line("/// Find the literal token with the specified text.");
        out.line("#[allow(unreachable_patterns)]");
        out.open("pub fn from_literal(text: &str) -> Option<Self> {");
        out.open("match text {");
        for (name, rule) in scanner.tokens() {
            if let TokenRule::Literal(text) = rule {
                out.line(format!("{:?} => Some(Self::{}),", text, name));
            }
        }
        out.line("_ => None,");
        out.close("}");
        out.close("}");
        out.close("}");
    }

    fn fmt_visitor(&self, out: &mut Out) {
        out.blank();
        out.line("/// The callbacks invoked when the parser recognizes a production.");
        out.line("#[allow(non_camel_case_types)]");
        out.open("pub trait Visitor {");
        out.line(format!("type {};", TOKEN_TYPE));
        for production in self.def.productions() {
            out.line(format!("type {};", escape_ident(&production.lhs)));
        }
        for production in self.def.productions() {
            for (name, expr) in callbacks(&production.lhs, &production.expr) {
                let params: Vec<String> = self
                    .params(expr, "Self")
                    .into_iter()
                    .map(|(name, ty)| format!("{}: {}", name, ty))
                    .collect();
                out.blank();
                out.line(format!("/// `{}: {}`", production.lhs, expr));
                out.line(format!(
                    "fn {}(&mut self, {}) -> Self::{};",
                    name,
                    params.join(", "),
                    escape_ident(&production.lhs)
                ));
            }
        }
        out.close("}");
    }

    fn fmt_choices(&self, out: &mut Out) {
        for choice in &self.choices {
            out.blank();
            out.line(format!("/// `{}` in `{}`", choice.expr, choice.lhs));
            out.line("#[allow(non_camel_case_types)]");
            out.open(format!("pub enum {}<V: Visitor + ?Sized> {{", choice.name()));
            for (i, item) in choice.items.iter().enumerate() {
                out.line(format!("Alt{}({}),", i + 1, self.ty(item, "V")));
            }
            out.close("}");
        }
    }

    fn fmt_entry(&self, out: &mut Out, start: &str) {
        let error_ty = format!("__rt::SyntaxError<{}, S::Token>", self.token_kind);
        out.blank();
        out.line(format!("/// Parse the whole input as `{}`.", start));
        out.line(format!(
            "pub fn parse_{}<S, V>(scanner: S, visitor: &mut V) -> Result<V::{}, {}>",
            to_snake_case(start),
            escape_ident(start),
            error_ty
        ));
        out.line("where");
        out.line(format!("    S: __rt::Scanner<Kind = {}>,", self.token_kind));
        out.line("    V: Visitor<Token = S::Token> + ?Sized,");
        out.open("{");
        out.open("let mut parser = Parser {");
        out.line("input: __rt::Input::new(scanner),");
        out.line("visitor,");
        out.close("};");
        out.line(format!("let result = parser.{}()?;", method_name(start)));
        if let Some(eos) = self.eos_kind() {
            out.line(format!("parser.input.expect({})?;", self.kind(eos)));
        }
        out.line("Ok(result)");
        out.close("}");
    }

    fn fmt_parser(&self, out: &mut Out) {
        let error_ty = format!("__rt::SyntaxError<{}, S::Token>", self.token_kind);

        out.blank();
        out.open("struct Parser<'v, S, V: ?Sized> {");
        out.line("input: __rt::Input<S>,");
        out.line("visitor: &'v mut V,");
        out.close("}");

        out.blank();
        out.line("#[allow(dead_code, unused_mut)]");
        out.line("impl<S, V> Parser<'_, S, V>");
        out.line("where");
        out.line(format!("    S: __rt::Scanner<Kind = {}>,", self.token_kind));
        out.line("    V: Visitor<Token = S::Token> + ?Sized,");
        out.open("{");
        for (i, production) in self.def.productions().iter().enumerate() {
            if i > 0 {
                out.blank();
            }
            let fresh = Cell::new(0);
            let lhs = &production.lhs;
            out.open(format!(
                "fn {}(&mut self) -> Result<V::{}, {}> {{",
                method_name(lhs),
                escape_ident(lhs),
                error_ty
            ));
            match &production.expr {
                Expr::Alternative(items) => {
                    let branches: Vec<(usize, &Expr)> = items.iter().enumerate().collect();
                    let fallback = items
                        .iter()
                        .position(|item| self.def.first(item).contains(EPSILON));
                    self.fmt_branches(
                        out,
                        ("", ""),
                        &branches,
                        fallback,
                        |out, (i, item)| self.fmt_callback(out, &fresh, lhs, Some(i), item),
                        |out, expected| {
                            out.line(format!("Err(self.input.error({}))", expected));
                        },
                    );
                }
                expr => self.fmt_callback(out, &fresh, lhs, None, expr),
            }
            out.close("}");
        }
        out.close("}");
    }

    /// Emit an if-else chain selecting a branch by its guard set.
    ///
    /// When no guard matches, the nullable branch is taken if there is one,
    /// and `on_error` is emitted otherwise.
    fn fmt_branches<'e, B, E>(
        &self,
        out: &mut Out,
        (prefix, suffix): (&str, &str),
        branches: &[(usize, &'e Expr)],
        fallback: Option<usize>,
        mut body: B,
        on_error: E,
    ) where
        B: FnMut(&mut Out, (usize, &'e Expr)),
        E: FnOnce(&mut Out, &str),
    {
        let mut expected: Vec<&str> = vec![];
        let mut opened = false;
        for &(i, item) in branches {
            let guard = self.guard_set(item);
            if guard.is_empty() {
                continue;
            }
            let cond = self.guard(&guard);
            if opened {
                out.reopen(format!("}} else if {} {{", cond));
            } else {
                out.open(format!("{}if {} {{", prefix, cond));
                opened = true;
            }
            body(out, (i, item));
            for name in guard {
                if !expected.contains(&name) {
                    expected.push(name);
                }
            }
        }
        let expected = self.ordered(&expected.iter().map(|s| s.to_string()).collect());

        if opened {
            out.reopen("} else {");
        } else {
            out.open(format!("{}{{", prefix));
        }
        match fallback.and_then(|i| branches.iter().find(|(j, _)| *j == i)) {
            Some(&(i, item)) => body(out, (i, item)),
            None => on_error(out, &self.kinds(&expected)),
        }
        out.close(format!("}}{}", suffix));
    }

    /// Emit the bindings of the callback arguments followed by the callback.
    fn fmt_callback(
        &self,
        out: &mut Out,
        fresh: &Cell<usize>,
        lhs: &str,
        branch: Option<usize>,
        expr: &Expr,
    ) {
        let args: Vec<String> = match expr {
            Expr::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    let var = format!("a{}", i + 1);
                    self.fmt_bind(out, fresh, &var, item);
                    var
                })
                .collect(),
            expr => {
                self.fmt_bind(out, fresh, "a", expr);
                vec!["a".into()]
            }
        };
        out.line(format!(
            "Ok(self.visitor.{}({}))",
            visit_name(lhs, branch),
            args.join(", ")
        ));
    }

    /// Emit `let <var> = <parse expr>;`.
    fn fmt_bind(&self, out: &mut Out, fresh: &Cell<usize>, var: &str, expr: &Expr) {
        let fresh_var = || {
            let n = fresh.get() + 1;
            fresh.set(n);
            format!("t{}", n)
        };

        match expr {
            Expr::Identifier(name) if self.is_terminal(name) => {
                out.line(format!("let {} = self.input.expect({})?;", var, self.kind(name)));
            }
            Expr::Identifier(name) => {
                out.line(format!("let {} = self.{}()?;", var, method_name(name)));
            }
            Expr::Sequence(items) => {
                out.open(format!("let {} = {{", var));
                let vars: Vec<String> = items
                    .iter()
                    .map(|item| {
                        let item_var = fresh_var();
                        self.fmt_bind(out, fresh, &item_var, item);
                        item_var
                    })
                    .collect();
                match &vars[..] {
                    [single] => out.line(format!("({},)", single)),
                    vars => out.line(format!("({})", vars.join(", "))),
                }
                out.close("};");
            }
            Expr::Alternative(items) => {
                let choice = match self.choice(expr) {
                    Some(choice) => choice,
                    None => return,
                };
                let name = format!("{}::<V>", choice.name());
                let branches: Vec<(usize, &Expr)> = items.iter().enumerate().collect();
                let fallback = items
                    .iter()
                    .position(|item| self.def.first(item).contains(EPSILON));

                let prefix = format!("let {} = ", var);
                self.fmt_branches(
                    out,
                    (&prefix, ";"),
                    &branches,
                    fallback,
                    |out, (i, item)| {
                        let item_var = fresh_var();
                        self.fmt_bind(out, fresh, &item_var, item);
                        out.line(format!("{}::Alt{}({})", name, i + 1, item_var));
                    },
                    |out, expected| {
                        out.line(format!("return Err(self.input.error({}));", expected));
                    },
                );
            }
            Expr::Many(inner) => {
                let guard = self.guard_set(inner);
                if guard.is_empty() {
                    out.line(format!("let {} = Vec::new();", var));
                    return;
                }
                out.line(format!("let mut {} = Vec::new();", var));
                out.open(format!("while {} {{", self.guard(&guard)));
                let item_var = fresh_var();
                self.fmt_bind(out, fresh, &item_var, inner);
                out.line(format!("{}.push({});", var, item_var));
                out.close("}");
            }
            Expr::Optional(inner) => {
                let guard = self.guard_set(inner);
                if guard.is_empty() {
                    out.line(format!("let {} = None;", var));
                    return;
                }
                out.open(format!("let {} = if {} {{", var, self.guard(&guard)));
                let item_var = fresh_var();
                self.fmt_bind(out, fresh, &item_var, inner);
                out.line(format!("Some({})", item_var));
                out.reopen("} else {");
                out.line("None");
                out.close("};");
            }
        }
    }
}

impl Choice<'_> {
    fn name(&self) -> String {
        format!("{}Choice{}", self.lhs, self.index)
    }
}

/// The callback name for a production, or for one branch of it.
fn visit_name(lhs: &str, branch: Option<usize>) -> String {
    match branch {
        Some(i) => format!("visit_{}{}", to_snake_case(lhs), i + 1),
        None => format!("visit_{}", to_snake_case(lhs)),
    }
}

/// The name of the parser method for a production.
fn method_name(lhs: &str) -> String {
    escape_ident(&to_snake_case(lhs))
}

/// The callbacks of a production, paired with the expression they receive.
fn callbacks<'e>(lhs: &str, expr: &'e Expr) -> Vec<(String, &'e Expr)> {
    match expr {
        Expr::Alternative(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (visit_name(lhs, Some(i)), item))
            .collect(),
        expr => vec![(visit_name(lhs, None), expr)],
    }
}

/// Check that every item emitted for `productions` gets a distinct name.
///
/// Associated types and the `<Production>Choice<n>` enums share one
/// namespace here, as do the callbacks and the parser methods.
pub fn check_names(productions: &[Production]) -> Vec<DefinitionError> {
    let mut errors = vec![];
    let mut types: Map<String, &str> = Map::default();
    let mut visits: Map<String, &str> = Map::default();
    let mut methods: Map<String, &str> = Map::default();

    let choices = choices_of(productions);
    for production in productions {
        let lhs = production.lhs.as_str();
        if escape_ident(lhs) == TOKEN_TYPE {
            errors.push(DefinitionError::ReservedName {
                name: lhs.to_owned(),
            });
        } else {
            claim(&mut types, escape_ident(lhs), lhs, &mut errors);
        }
        for choice in choices.iter().filter(|c| c.lhs == lhs) {
            claim(&mut types, choice.name(), lhs, &mut errors);
        }
        for (name, _) in callbacks(lhs, &production.expr) {
            claim(&mut visits, name, lhs, &mut errors);
        }
        claim(&mut methods, method_name(lhs), lhs, &mut errors);
    }
    errors
}

fn claim<'p>(
    names: &mut Map<String, &'p str>,
    generated: String,
    owner: &'p str,
    errors: &mut Vec<DefinitionError>,
) {
    match names.entry(generated) {
        Entry::Occupied(entry) => errors.push(DefinitionError::NameCollision {
            first: entry.get().to_string(),
            second: owner.to_owned(),
            generated: entry.key().clone(),
        }),
        Entry::Vacant(entry) => {
            entry.insert(owner);
        }
    }
}

fn choices_of(productions: &[Production]) -> Vec<Choice<'_>> {
    let mut choices = vec![];
    for production in productions {
        let lhs = production.lhs.as_str();
        let mut index = 0;
        match &production.expr {
            Expr::Alternative(items) => {
                for item in items {
                    collect_choices(lhs, item, &mut index, &mut choices);
                }
            }
            expr => collect_choices(lhs, expr, &mut index, &mut choices),
        }
    }
    choices
}

fn collect_choices<'g>(
    lhs: &'g str,
    expr: &'g Expr,
    index: &mut usize,
    choices: &mut Vec<Choice<'g>>,
) {
    match expr {
        Expr::Identifier(..) => (),
        Expr::Alternative(items) => {
            *index += 1;
            choices.push(Choice {
                lhs,
                index: *index,
                expr,
                items,
            });
            for item in items {
                collect_choices(lhs, item, index, choices);
            }
        }
        Expr::Sequence(items) => {
            for item in items {
                collect_choices(lhs, item, index, choices);
            }
        }
        Expr::Many(inner) | Expr::Optional(inner) => collect_choices(lhs, inner, index, choices),
    }
}

impl fmt::Display for Codegen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = Out::default();
        self.fmt_header(&mut out);
        self.fmt_token_kind(&mut out);
        self.fmt_visitor(&mut out);
        self.fmt_choices(&mut out);
        if let Some(start) = self.def.start_symbol() {
            self.fmt_entry(&mut out, start);
            self.fmt_parser(&mut out);
        }
        f.write_str(&out.buf)
    }
}

/// Line-oriented writer keeping track of the indentation.
#[derive(Debug, Default)]
struct Out {
    buf: String,
    depth: usize,
}

impl Out {
    fn line(&mut self, line: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.buf.push_str("    ");
        }
        self.buf.push_str(line.as_ref());
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Write a line ending with an opening brace.
    fn open(&mut self, line: impl AsRef<str>) {
        self.line(line);
        self.indent();
    }

    /// Write a line starting with a closing brace.
    fn close(&mut self, line: impl AsRef<str>) {
        self.dedent();
        self.line(line);
    }

    /// Write a line like `} else {`.
    fn reopen(&mut self, line: impl AsRef<str>) {
        self.dedent();
        self.line(line);
        self.indent();
    }
}
