//! # Version Precedence
//!
//! Maven-style version ordering, used to sort versions found on disk and
//! to pick `latest` for generated metadata.
//!
//! A version is split into tokens at `.` and `-` and wherever digits meet
//! letters. Numeric tokens compare as numbers. Qualifiers rank
//!
//! ```text
//! alpha < beta < milestone < rc < snapshot < "" (release) < sp < other
//! ```
//!
//! and a number always outranks a qualifier. A missing token compares as
//! `0` against numbers and as a release against qualifiers, so `1`, `1.0`
//! and `1.0.0` are equal and `1.0-alpha < 1.0 < 1.0-sp < 1.0.1`.

use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Number(u64),
    Qualifier(String),
}

/// A parsed version string with Maven ordering.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    raw: String,
    tokens: Vec<Token>,
}

impl MavenVersion {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            tokens: tokenize(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut digits = false;

    let lower = raw.to_ascii_lowercase();
    let chars: Vec<char> = lower.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '.' || c == '-' {
            push_token(&mut tokens, &mut current, digits, chars.get(i + 1));
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != digits {
            push_token(&mut tokens, &mut current, digits, Some(&c));
        }
        digits = is_digit;
        current.push(c);
    }
    push_token(&mut tokens, &mut current, digits, None);
    tokens
}

fn push_token(tokens: &mut Vec<Token>, current: &mut String, digits: bool, next: Option<&char>) {
    if current.is_empty() {
        return;
    }
    let text = std::mem::take(current);
    if digits {
        // Overlong numbers saturate; they still sort above any shorter one.
        tokens.push(Token::Number(text.parse().unwrap_or(u64::MAX)));
        return;
    }
    let followed_by_digit = next.is_some_and(|c| c.is_ascii_digit());
    let qualifier = match text.as_str() {
        "a" if followed_by_digit => "alpha",
        "b" if followed_by_digit => "beta",
        "m" if followed_by_digit => "milestone",
        "cr" => "rc",
        "ga" | "final" | "release" => "",
        other => other,
    };
    tokens.push(Token::Qualifier(qualifier.to_string()));
}

fn qualifier_rank(qualifier: &str) -> Option<u8> {
    match qualifier {
        "alpha" => Some(0),
        "beta" => Some(1),
        "milestone" => Some(2),
        "rc" => Some(3),
        "snapshot" => Some(4),
        "" => Some(5),
        "sp" => Some(6),
        _ => None,
    }
}

fn compare_qualifiers(a: &str, b: &str) -> Ordering {
    match (qualifier_rank(a), qualifier_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn compare_tokens(a: Option<&Token>, b: Option<&Token>) -> Ordering {
    match (a, b) {
        (Some(Token::Number(x)), Some(Token::Number(y))) => x.cmp(y),
        (Some(Token::Qualifier(x)), Some(Token::Qualifier(y))) => compare_qualifiers(x, y),
        (Some(Token::Number(_)), Some(Token::Qualifier(_))) => Ordering::Greater,
        (Some(Token::Qualifier(_)), Some(Token::Number(_))) => Ordering::Less,
        (Some(Token::Number(x)), None) => x.cmp(&0),
        (None, Some(Token::Number(y))) => 0.cmp(y),
        (Some(Token::Qualifier(x)), None) => compare_qualifiers(x, ""),
        (None, Some(Token::Qualifier(y))) => compare_qualifiers("", y),
        (None, None) => Ordering::Equal,
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.tokens.len().max(other.tokens.len());
        for i in 0..len {
            let ordering = compare_tokens(self.tokens.get(i), other.tokens.get(i));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
