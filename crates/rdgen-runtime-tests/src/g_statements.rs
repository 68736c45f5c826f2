mod p {
    include!(concat!(env!("OUT_DIR"), "/statements.rs"));
}

use crate::words::Words;
use p::{ExprChoice1, TToken, Visitor};
use std::collections::HashMap;

fn classify(word: &str) -> TToken {
    if let Some(kind) = TToken::from_literal(word) {
        return kind;
    }
    if word.bytes().all(|b| b.is_ascii_digit()) {
        TToken::Number
    } else if word.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') {
        TToken::Ident
    } else {
        TToken::Unknown
    }
}

fn scan(text: &str) -> Words<TToken> {
    Words::new(text, classify, TToken::EOS)
}

/// Evaluates straight-line programs while they are being parsed.
#[derive(Default)]
struct Interpreter {
    env: HashMap<String, i64>,
    output: Vec<String>,
    returned: Option<Option<i64>>,
}

impl Visitor for Interpreter {
    type Token = String;
    type Program = ();
    type Statement = ();
    type Block = ();
    type ReturnValue = Option<i64>;
    type Expr = i64;
    type Term = i64;

    fn visit_program(&mut self, _: Vec<()>) {}

    fn visit_statement1(&mut self, _: String, a2: String, _: String, a4: i64, _: String) {
        self.env.insert(a2, a4);
    }

    fn visit_statement2(&mut self, _: String, a2: i64, a3: Vec<(String, i64)>, _: String) {
        let mut line = a2.to_string();
        for (_, value) in a3 {
            line += &format!(" {}", value);
        }
        self.output.push(line);
    }

    fn visit_statement3(&mut self, _: String, a2: Option<i64>, _: String) {
        self.returned = Some(a2);
    }

    fn visit_statement4(&mut self, _: ()) {}

    fn visit_block(&mut self, _: String, _: Vec<()>, _: String) {}

    fn visit_return_value1(&mut self, a: i64) -> Option<i64> {
        Some(a)
    }

    fn visit_return_value2(&mut self, _: Option<String>) -> Option<i64> {
        None
    }

    fn visit_expr(&mut self, a1: i64, a2: Vec<(ExprChoice1<Self>, i64)>) -> i64 {
        a2.into_iter().fold(a1, |acc, (op, value)| match op {
            ExprChoice1::Alt1(_) => acc + value,
            ExprChoice1::Alt2(_) => acc - value,
        })
    }

    fn visit_term1(&mut self, a: String) -> i64 {
        a.parse().unwrap()
    }

    fn visit_term2(&mut self, a: String) -> i64 {
        self.env.get(&a).copied().unwrap_or(0)
    }

    fn visit_term3(&mut self, _: String, a2: i64, _: String) -> i64 {
        a2
    }
}

/// Records the callbacks in the order they are invoked.
#[derive(Default)]
struct Trace(Vec<&'static str>);

impl Visitor for Trace {
    type Token = String;
    type Program = ();
    type Statement = ();
    type Block = ();
    type ReturnValue = ();
    type Expr = ();
    type Term = ();

    fn visit_program(&mut self, _: Vec<()>) {
        self.0.push("program");
    }

    fn visit_statement1(&mut self, _: String, _: String, _: String, _: (), _: String) {
        self.0.push("statement1");
    }

    fn visit_statement2(&mut self, _: String, _: (), _: Vec<(String, ())>, _: String) {
        self.0.push("statement2");
    }

    fn visit_statement3(&mut self, _: String, _: (), _: String) {
        self.0.push("statement3");
    }

    fn visit_statement4(&mut self, _: ()) {
        self.0.push("statement4");
    }

    fn visit_block(&mut self, _: String, _: Vec<()>, _: String) {
        self.0.push("block");
    }

    fn visit_return_value1(&mut self, _: ()) {
        self.0.push("return_value1");
    }

    fn visit_return_value2(&mut self, a: Option<String>) {
        self.0.push(match a {
            Some(..) => "return_value2(void)",
            None => "return_value2",
        });
    }

    fn visit_expr(&mut self, _: (), _: Vec<(ExprChoice1<Self>, ())>) {
        self.0.push("expr");
    }

    fn visit_term1(&mut self, _: String) {
        self.0.push("term1");
    }

    fn visit_term2(&mut self, _: String) {
        self.0.push("term2");
    }

    fn visit_term3(&mut self, _: String, _: (), _: String) {
        self.0.push("term3");
    }
}

#[test]
fn interpreter() {
    let mut interp = Interpreter::default();
    p::parse_program(
        scan(
            "let x = 1 + 2 ;
             print x , x - 1 ;
             { let y = ( x + 1 ) - 4 ; print y , 10 - y - 2 ; }
             return x + 1 ;",
        ),
        &mut interp,
    )
    .unwrap();
    assert_eq!(interp.output, ["3 2", "0 8"]);
    assert_eq!(interp.env["y"], 0);
    assert_eq!(interp.returned, Some(Some(4)));
}

#[test]
fn empty_program() {
    let mut interp = Interpreter::default();
    p::parse_program(scan(""), &mut interp).unwrap();
    assert!(interp.output.is_empty());
    assert_eq!(interp.returned, None);
}

#[test]
fn callback_order() {
    let mut trace = Trace::default();
    p::parse_program(scan("{ print ( a ) ; } let b = 2 ;"), &mut trace).unwrap();
    assert_eq!(
        trace.0,
        [
            "term2",
            "expr",
            "term3",
            "expr",
            "statement2",
            "block",
            "statement4",
            "term1",
            "expr",
            "statement1",
            "program",
        ]
    );
}

#[test]
fn optional_branch_without_lookahead() {
    let mut trace = Trace::default();
    p::parse_program(scan("return ; return void ;"), &mut trace).unwrap();
    assert_eq!(
        trace.0,
        [
            "return_value2",
            "statement3",
            "return_value2(void)",
            "statement3",
            "program",
        ]
    );

    let mut interp = Interpreter::default();
    p::parse_program(scan("return ;"), &mut interp).unwrap();
    assert_eq!(interp.returned, Some(None));
}

#[test]
fn fallback_reports_the_next_token() {
    let err = p::parse_program(scan("return ) ;"), &mut Trace::default()).unwrap_err();
    assert_eq!(err.found, ")");
    assert_eq!(err.expected, [TToken::Semicolon]);
}

#[test]
fn missing_identifier() {
    let err = p::parse_program(scan("let = 1 ;"), &mut Trace::default()).unwrap_err();
    assert_eq!(err.found, "=");
    assert_eq!(err.expected, [TToken::Ident]);
}

#[test]
fn missing_operand() {
    let err = p::parse_program(scan("print 1 + ;"), &mut Trace::default()).unwrap_err();
    assert_eq!(err.found, ";");
    assert_eq!(err.expected, [TToken::Number, TToken::Ident, TToken::LParen]);
}

#[test]
fn unbalanced_block() {
    let err = p::parse_program(scan("{ print 1 ; } }"), &mut Trace::default()).unwrap_err();
    assert_eq!(err.found, "}");
    assert_eq!(err.expected, [TToken::EOS]);

    let err = p::parse_program(scan("{ print 1 ;"), &mut Trace::default()).unwrap_err();
    assert_eq!(err.found, "");
    assert_eq!(err.expected, [TToken::RCurly]);
}
