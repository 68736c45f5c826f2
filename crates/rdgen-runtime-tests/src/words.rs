use rdgen_runtime::Scanner;
use std::fmt;

/// A scanner over whitespace-separated words.
pub struct Words<K> {
    words: Vec<String>,
    pos: usize,
    classify: fn(&str) -> K,
    end: K,
}

impl<K> Words<K> {
    pub fn new(text: &str, classify: fn(&str) -> K, end: K) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_owned).collect(),
            pos: 0,
            classify,
            end,
        }
    }
}

impl<K: Copy + PartialEq + fmt::Debug> Scanner for Words<K> {
    type Kind = K;
    type Token = String;

    fn kind(&self) -> K {
        match self.words.get(self.pos) {
            Some(word) => (self.classify)(word),
            None => self.end,
        }
    }

    fn advance(&mut self) -> String {
        match self.words.get(self.pos) {
            Some(word) => {
                self.pos += 1;
                word.clone()
            }
            None => String::new(),
        }
    }
}
