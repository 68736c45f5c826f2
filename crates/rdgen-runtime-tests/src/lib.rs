//! Parsers generated at build time from the grammars in `grammars/`.

#[cfg(test)]
mod words;

#[cfg(test)]
mod g_json;
#[cfg(test)]
mod g_statements;
