//! The description of the external scanner that supplies terminal symbols.

use crate::{types::Map, util::verify_ident};
use std::borrow::Cow;

/// How a terminal symbol is recognized by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenRule {
    /// The token matches exactly the given text.
    Literal(String),
    /// The token matches a pattern interpreted by the scanner implementation.
    Pattern(String),
}

/// The terminal symbols offered by a scanner, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ScannerDef {
    tokens: Map<String, TokenRule>,
}

impl ScannerDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a scanner using the specified function.
    pub fn define<F>(f: F) -> Result<Self, ScannerDefError>
    where
        F: FnOnce(&mut Self) -> Result<(), ScannerDefError>,
    {
        let mut def = Self::new();
        f(&mut def)?;
        Ok(def)
    }

    /// Declare a terminal symbol recognized by the given rule.
    pub fn add_token(&mut self, name: &str, rule: TokenRule) -> Result<(), ScannerDefError> {
        if !verify_ident(name) {
            return Err(ScannerDefError::InvalidName {
                name: name.to_owned(),
            });
        }
        if self.tokens.contains_key(name) {
            return Err(ScannerDefError::Duplicate {
                name: name.to_owned(),
            });
        }
        tracing::trace!("add token {} = {:?}", name, rule);
        self.tokens.insert(name.to_owned(), rule);
        Ok(())
    }

    pub fn literal(&mut self, name: &str, text: &str) -> Result<(), ScannerDefError> {
        self.add_token(name, TokenRule::Literal(text.to_owned()))
    }

    pub fn pattern(&mut self, name: &str, pattern: &str) -> Result<(), ScannerDefError> {
        self.add_token(name, TokenRule::Pattern(pattern.to_owned()))
    }

    pub fn has_token(&self, name: &str) -> bool {
        self.tokens.contains_key(name)
    }

    /// Find the terminal whose rule is exactly the literal `text`.
    pub fn literal_match(&self, text: &str) -> Option<&str> {
        self.tokens.iter().find_map(|(name, rule)| match rule {
            TokenRule::Literal(literal) if literal == text => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn terminal_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.keys().map(String::as_str)
    }

    pub fn tokens(&self) -> impl Iterator<Item = (&str, &TokenRule)> + '_ {
        self.tokens.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Derive a terminal name for a literal string appearing in a grammar.
    ///
    /// Each character is spelled out (`+` becomes `Plus`, `(` becomes `LParen`),
    /// and a numeric suffix is appended when the name is already used by this
    /// scanner or is rejected by `taken`.
    pub fn calculate_token_name<F>(&self, text: &str, taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let mut name: String = text.chars().map(char_name).collect();
        if name.is_empty() {
            name.push_str("Empty");
        }
        if name.starts_with(|ch: char| ch.is_ascii_digit()) {
            name.insert(0, 'H');
        } else if name.starts_with(|ch: char| ch.is_lowercase()) {
            let mut chars = name.chars();
            if let Some(first) = chars.next() {
                name = first.to_uppercase().chain(chars).collect();
            }
        }

        let available = |candidate: &str| {
            verify_ident(candidate) && !self.has_token(candidate) && !taken(candidate)
        };
        if available(&name) {
            return name;
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}{}", name, suffix);
            if available(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn char_name(ch: char) -> Cow<'static, str> {
    let name = match ch {
        ' ' => "Space",
        '!' => "Bang",
        '"' => "Quote",
        '#' => "Hash",
        '$' => "Dollar",
        '%' => "Percent",
        '&' => "Ampersand",
        '\'' => "Tick",
        '(' => "LParen",
        ')' => "RParen",
        '*' => "Star",
        '+' => "Plus",
        ',' => "Comma",
        '-' => "Dash",
        '.' => "Period",
        '/' => "Slash",
        ':' => "Colon",
        ';' => "Semicolon",
        '<' => "LessThan",
        '=' => "Equal",
        '>' => "GreaterThan",
        '?' => "Question",
        '@' => "At",
        '[' => "LBracket",
        '\\' => "Backslash",
        ']' => "RBracket",
        '^' => "Cap",
        '_' => "Underscore",
        '`' => "Backtick",
        '{' => "LCurly",
        '|' => "Bar",
        '}' => "RCurly",
        '~' => "Tilde",
        ch if ch.is_ascii_alphanumeric() => return Cow::Owned(ch.to_string()),
        ch => return Cow::Owned(format!("H{}", ch as u32)),
    };
    Cow::Borrowed(name)
}

#[derive(Debug, thiserror::Error)]
pub enum ScannerDefError {
    #[error("`{}' is not a valid token name", name)]
    InvalidName { name: String },

    #[error("the token `{}' has already been declared", name)]
    Duplicate { name: String },
}
