use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

pub const DEFAULT_LANGUAGE: &str = "ru";
pub const SUMMARY_SENTENCES: usize = 3;
pub const MAX_CATEGORIES: usize = 5;
pub const MAX_AMBIGUOUS_OPTIONS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub limit: u32,
    pub total_results: usize,
    pub results: Vec<String>,
}

impl SearchResult {
    pub fn new(query: impl Into<String>, limit: SearchLimit, results: Vec<String>) -> Self {
        Self {
            query: query.into(),
            limit: limit.get(),
            total_results: results.len(),
            results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub categories: Vec<String>,
}

/// A resolved article as reported by a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub url: String,
    pub summary: String,
    pub categories: Vec<String>,
}

/// Number of search results to request, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchLimit(u32);

impl SearchLimit {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 50;
    pub const DEFAULT: u32 = 10;

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u32)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

/// Wiki language code such as `ru`, `en` or `zh-min-nan`.
///
/// The code ends up in the upstream host name, so only lowercase ASCII
/// letters, digits and `-` are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Language(String);

impl Language {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Language {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        let valid_len = (2..=12).contains(&code.len());
        let starts_with_letter = code.chars().next().map_or(false, |c| c.is_ascii_lowercase());
        let valid_chars = code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if valid_len && starts_with_letter && valid_chars {
            Ok(Self(code))
        } else {
            Err(Error::InvalidLanguage(s.to_string()))
        }
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the leading `count` sentences of `text`.
///
/// A sentence ends at `.`, `!`, `?` or `…` followed by whitespace or the end
/// of the text.
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    if count == 0 {
        return String::new();
    }

    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?' | '…') {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if at_boundary {
            seen += 1;
            if seen == count {
                return text[..idx + c.len_utf8()].to_string();
            }
        }
    }

    text.to_string()
}
