use std::fmt;

/// A sanitized phrase: lowercase word tokens made of `a`-`z` and `'`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Phrase {
    tokens: Vec<String>,
}

impl Phrase {
    /// Lowercases `raw`, keeps only ASCII lowercase letters, spaces and
    /// apostrophes, then splits on whitespace. Never fails; any input maps to
    /// a (possibly empty) phrase.
    pub fn sanitize(raw: &str) -> Self {
        let filtered: String = raw
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || *c == ' ' || *c == '\'')
            .collect();

        Self {
            tokens: filtered.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The phrase as used for the playlist description.
    pub fn description(&self) -> String {
        self.tokens.join(" ")
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}
