use std::fmt;

pub fn display_fn<F>(f: F) -> impl fmt::Display
where
    F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
{
    struct DisplayFn<F> {
        f: F,
    }
    impl<F> fmt::Display for DisplayFn<F>
    where
        F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
    {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            (self.f)(formatter)
        }
    }
    DisplayFn { f }
}

/// Write the items separated by `sep`.
pub fn join<'a, I, T>(items: I, sep: &'a str) -> impl fmt::Display + 'a
where
    I: IntoIterator<Item = T> + Clone + 'a,
    T: fmt::Display,
{
    display_fn(move |f| {
        for (i, item) in items.clone().into_iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    })
}

/// Check if the string is usable as a Rust identifier.
///
/// Keywords and reserved words are rejected, and so are raw identifiers.
pub fn verify_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first == '_' || unicode_ident::is_xid_start(first)) {
        return false;
    }
    if !chars.all(unicode_ident::is_xid_continue) {
        return false;
    }
    s != "_" && !is_keyword(s)
}

/// Return whether the string is a strict or reserved keyword in Rust 2021.
pub fn is_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "break" | "const" | "continue" | "crate" | "else" | "enum" | "extern"
        | "false" | "fn" | "for" | "if" | "impl" | "in" | "let" | "loop" | "match" | "mod"
        | "move" | "mut" | "pub" | "ref" | "return" | "self" | "Self" | "static" | "struct"
        | "super" | "trait" | "true" | "type" | "unsafe" | "use" | "where" | "while"
        | "async" | "await" | "dyn"
        // reserved
        | "abstract" | "become" | "box" | "do" | "final" | "macro" | "override" | "priv"
        | "typeof" | "unsized" | "virtual" | "yield" | "try"
    )
}

/// Make a keyword usable as an identifier in generated code.
pub fn escape_ident(s: &str) -> String {
    match s {
        "crate" | "self" | "Self" | "super" => format!("{}_", s),
        s if is_keyword(s) => format!("r#{}", s),
        s => s.to_owned(),
    }
}

/// Convert a `CamelCase` symbol name into `snake_case`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p == '_' => false,
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map_or(false, |n| n.is_lowercase()),
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
