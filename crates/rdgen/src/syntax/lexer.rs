//! Lexer implementation.

use lexgen_util::Loc;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Token<'input> {
    Uses,
    Colon,
    Semicolon,
    Bar,
    LParen,
    RParen,
    LCurly,
    RCurly,
    LBracket,
    RBracket,
    /// A quoted string, including the quotes and escapes.
    LiteralString(&'input str),
    Identifier(&'input str),
}

pub type Spanned<'input> = (Loc, Token<'input>, Loc);

#[derive(Debug, Default)]
pub struct LexerState {
    comment_depth: usize,
}

lexgen::lexer! {
    pub Lexer(LexerState) -> Token<'input>;

    let whitespace = [' ' '\t' '\n' '\r'];
    let newline = '\r'* '\n' | '\r';
    let ident = $$XID_Start $$XID_Continue*;
    let string_char = _ # ['"' '\\'];

    rule Init {
        $whitespace+,
        "//" => |lexer| {
            lexer.switch(LexerRule::LineComment)
        },
        "/*" => |lexer| {
            lexer.state().comment_depth += 1;
            lexer.switch(LexerRule::BlockComment)
        },
        ":" = Token::Colon,
        ";" = Token::Semicolon,
        "|" = Token::Bar,
        "(" = Token::LParen,
        ")" = Token::RParen,
        "{" = Token::LCurly,
        "}" = Token::RCurly,
        "[" = Token::LBracket,
        "]" = Token::RBracket,
        "uses" = Token::Uses,
        '"' ('\\' _ | $string_char)* '"' => |lexer| {
            let token = Token::LiteralString(lexer.match_());
            lexer.return_(token)
        },
        $ident => |lexer| {
            let token = Token::Identifier(lexer.match_());
            lexer.return_(token)
        },
    }

    rule LineComment {
        $newline => |lexer| {
            lexer.switch(LexerRule::Init)
        },
        _,
    }

    rule BlockComment {
        "/*" => |lexer| {
            lexer.state().comment_depth += 1;
            lexer.continue_()
        },
        "*/" => |lexer| {
            let depth = &mut lexer.state().comment_depth;
            if *depth == 1 {
                *depth = 0;
                lexer.switch(LexerRule::Init)
            } else {
                *depth -= 1;
                lexer.continue_()
            }
        },
        _,
    }
}

/// Decode the escape sequences of a quoted literal, dropping the quotes.
pub fn unescape(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some(ch) => out.push(ch),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use Token::*;

    #[test]
    fn smoketest() {
        let input = r#"
uses "scanner.ll"; // line comment /* not a block */
/* block comment /* nested */ */
Program: {Item} ;
Item: "(" [Value] ")" | ｔｒｕｅ | "\"";
"#;
        let lexer = Lexer::new(input);
        let tokens = lexer
            .map(|res| res.map(|(_, t, _)| t))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(
            tokens,
            [
                Uses,
                LiteralString("\"scanner.ll\""),
                Semicolon,
                Identifier("Program"),
                Colon,
                LCurly,
                Identifier("Item"),
                RCurly,
                Semicolon,
                Identifier("Item"),
                Colon,
                LiteralString("\"(\""),
                LBracket,
                Identifier("Value"),
                RBracket,
                LiteralString("\")\""),
                Bar,
                Identifier("ｔｒｕｅ"),
                Bar,
                LiteralString(r#""\"""#),
                Semicolon,
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_an_identifier() {
        let tokens = Lexer::new("uses usesX")
            .map(|res| res.map(|(_, t, _)| t))
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tokens, [Uses, Identifier("usesX")]);
    }

    #[test]
    fn unrecognized_character() {
        let err = Lexer::new("Program: @;")
            .collect::<Result<Vec<_>, _>>()
            .unwrap_err();
        assert_eq!(err.location.col, 9);
    }

    #[test]
    fn unescaping() {
        assert_eq!(unescape(r#""+""#), "+");
        assert_eq!(unescape(r#""\"\\\n""#), "\"\\\n");
        assert_eq!(unescape(r#""a\qb""#), "aqb");
    }
}
