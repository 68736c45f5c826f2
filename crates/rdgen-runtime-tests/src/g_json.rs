mod p {
    include!(concat!(env!("OUT_DIR"), "/json.rs"));
}

use crate::words::Words;
use p::{TToken, Visitor};

fn classify(word: &str) -> TToken {
    if let Some(kind) = TToken::from_literal(word) {
        return kind;
    }
    if word.starts_with('"') {
        TToken::String
    } else if word.parse::<f64>().is_ok() {
        TToken::Number
    } else {
        TToken::Unknown
    }
}

fn scan(text: &str) -> Words<TToken> {
    Words::new(text, classify, TToken::EOS)
}

type List<T> = Option<(T, Vec<(String, T)>)>;

fn flatten<T>(list: List<T>) -> Vec<T> {
    match list {
        Some((first, rest)) => std::iter::once(first)
            .chain(rest.into_iter().map(|(_, item)| item))
            .collect(),
        None => vec![],
    }
}

#[derive(Debug, PartialEq)]
enum Json {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Json>),
    Object(Vec<(String, Json)>),
}

/// Builds the document tree.
struct Builder;

impl Visitor for Builder {
    type Token = String;
    type Value = Json;
    type Object = Json;
    type Member = (String, Json);
    type Array = Json;

    fn visit_value1(&mut self, a: Json) -> Json {
        a
    }

    fn visit_value2(&mut self, a: Json) -> Json {
        a
    }

    fn visit_value3(&mut self, a: String) -> Json {
        Json::String(a.trim_matches('"').to_owned())
    }

    fn visit_value4(&mut self, a: String) -> Json {
        Json::Number(a.parse().unwrap())
    }

    fn visit_value5(&mut self, _: String) -> Json {
        Json::Bool(true)
    }

    fn visit_value6(&mut self, _: String) -> Json {
        Json::Bool(false)
    }

    fn visit_value7(&mut self, _: String) -> Json {
        Json::Null
    }

    fn visit_object(&mut self, _: String, a2: List<(String, Json)>, _: String) -> Json {
        Json::Object(flatten(a2))
    }

    fn visit_member(&mut self, a1: String, _: String, a3: Json) -> (String, Json) {
        (a1.trim_matches('"').to_owned(), a3)
    }

    fn visit_array(&mut self, _: String, a2: List<Json>, _: String) -> Json {
        Json::Array(flatten(a2))
    }
}

/// Writes the document back without whitespace, counting the callbacks.
#[derive(Default)]
struct Minify {
    calls: usize,
}

impl Minify {
    fn join(&mut self, open: String, list: List<String>, close: String) -> String {
        self.calls += 1;
        let mut out = open;
        if let Some((first, rest)) = list {
            out += &first;
            for (comma, item) in rest {
                out += &comma;
                out += &item;
            }
        }
        out + &close
    }

    fn token(&mut self, a: String) -> String {
        self.calls += 1;
        a
    }
}

impl Visitor for Minify {
    type Token = String;
    type Value = String;
    type Object = String;
    type Member = String;
    type Array = String;

    fn visit_value1(&mut self, a: String) -> String {
        self.token(a)
    }

    fn visit_value2(&mut self, a: String) -> String {
        self.token(a)
    }

    fn visit_value3(&mut self, a: String) -> String {
        self.token(a)
    }

    fn visit_value4(&mut self, a: String) -> String {
        self.token(a)
    }

    fn visit_value5(&mut self, a: String) -> String {
        self.token(a)
    }

    fn visit_value6(&mut self, a: String) -> String {
        self.token(a)
    }

    fn visit_value7(&mut self, a: String) -> String {
        self.token(a)
    }

    fn visit_object(&mut self, a1: String, a2: List<String>, a3: String) -> String {
        self.join(a1, a2, a3)
    }

    fn visit_member(&mut self, a1: String, a2: String, a3: String) -> String {
        self.calls += 1;
        a1 + &a2 + &a3
    }

    fn visit_array(&mut self, a1: String, a2: List<String>, a3: String) -> String {
        self.join(a1, a2, a3)
    }
}

const DOCUMENT: &str = r#"
{ "name" : "rdgen" ,
  "tags" : [ "parser" , "ll1" ] ,
  "version" : 1.5 ,
  "stable" : false ,
  "extra" : { } ,
  "owner" : null }
"#;

#[test]
fn builds_document_tree() {
    let doc = p::parse_value(scan(DOCUMENT), &mut Builder).unwrap();
    assert_eq!(
        doc,
        Json::Object(vec![
            ("name".into(), Json::String("rdgen".into())),
            (
                "tags".into(),
                Json::Array(vec![
                    Json::String("parser".into()),
                    Json::String("ll1".into()),
                ])
            ),
            ("version".into(), Json::Number(1.5)),
            ("stable".into(), Json::Bool(false)),
            ("extra".into(), Json::Object(vec![])),
            ("owner".into(), Json::Null),
        ])
    );
}

#[test]
fn scalars() {
    assert_eq!(p::parse_value(scan("true"), &mut Builder).unwrap(), Json::Bool(true));
    assert_eq!(p::parse_value(scan("42"), &mut Builder).unwrap(), Json::Number(42.0));
    assert_eq!(p::parse_value(scan("[ ]"), &mut Builder).unwrap(), Json::Array(vec![]));
}

#[test]
fn same_parser_different_visitor() {
    let mut minify = Minify::default();
    let out = p::parse_value(scan(r#"[ 1 , { "a" : [ ] } , null ]"#), &mut minify).unwrap();
    assert_eq!(out, r#"[1,{"a":[]},null]"#);
    // value4, array, value2, member, object, value1, value7, array, value2
    assert_eq!(minify.calls, 9);
}

#[test]
fn borrowed_scanner() {
    let mut words = scan("null extra");
    assert!(p::parse_value(&mut words, &mut Builder).is_err());
}

#[test]
fn missing_colon() {
    let err = p::parse_value(scan(r#"{ "a" 1 }"#), &mut Builder).unwrap_err();
    assert_eq!(err.found, "1");
    assert_eq!(err.expected, [TToken::Colon]);
}

#[test]
fn trailing_comma() {
    let err = p::parse_value(scan("[ 1 , ]"), &mut Builder).unwrap_err();
    assert_eq!(err.found, "]");
    assert_eq!(
        err.expected,
        [
            TToken::String,
            TToken::Number,
            TToken::True,
            TToken::False,
            TToken::Null,
            TToken::LCurly,
            TToken::LBracket,
        ]
    );
}

#[test]
fn trailing_input() {
    let err = p::parse_value(scan("1 2"), &mut Builder).unwrap_err();
    assert_eq!(err.found, "2");
    assert_eq!(err.expected, [TToken::EOS]);
}

#[test]
fn empty_input() {
    let err = p::parse_value(scan(""), &mut Builder).unwrap_err();
    assert_eq!(err.found, "");
    assert_eq!(err.expected.len(), 7);
}

#[test]
fn unknown_token() {
    let err = p::parse_value(scan("[ @ ]"), &mut Builder).unwrap_err();
    assert_eq!(err.found, "@");
    assert!(err.to_string().starts_with("unexpected token \"@\", expected one of"));
}

#[test]
fn token_literals() {
    assert_eq!(TToken::LCurly.literal(), Some("{"));
    assert_eq!(TToken::Null.literal(), Some("null"));
    assert_eq!(TToken::String.literal(), None);
    assert_eq!(TToken::from_literal(":"), Some(TToken::Colon));
    assert_eq!(TToken::from_literal("nil"), None);
}
