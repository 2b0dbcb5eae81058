use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

lazy_static! {
    static ref MODIFIER_SYMBOLS: HashSet<char> = ['!', '^', '+', '#', '<', '>'].into_iter().collect();
}

const SIDE_MARKERS: [char; 2] = ['<', '>'];
const PATTERN_MARKERS: [char; 3] = ['*', '?', '-'];

/// A registered key: optional modifier prefix plus a literal, wildcard or range body.
///
/// The body is compiled once when the pattern is built, so matching an input
/// never touches the regex compiler.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    raw: String,
    modifiers: String,
    body: Body,
}

#[derive(Debug, Clone)]
enum Body {
    Literal(String),
    Wildcard(Regex),
    Range(char, char),
    Invalid,
}

impl KeyPattern {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let (modifiers, body) = split_modifiers(&raw);
        let modifiers = modifiers.to_string();
        let body = parse_body(body);
        KeyPattern { raw, modifiers, body }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the key lands in the wildcard/range tier of a chord.
    pub fn is_pattern(&self) -> bool {
        is_pattern_key(&self.raw)
    }

    pub fn matches(&self, input: &str) -> bool {
        if self.raw == input {
            return true;
        }
        let (input_modifiers, input_body) = split_modifiers(input);
        if !modifiers_match(&self.modifiers, input_modifiers) {
            return false;
        }
        match &self.body {
            Body::Literal(body) => body == input_body,
            Body::Wildcard(regex) => regex.is_match(input_body),
            Body::Range(start, end) => {
                let mut chars = input_body.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => (*start..=*end).contains(&c),
                    _ => false,
                }
            }
            Body::Invalid => false,
        }
    }
}

impl PartialEq for KeyPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for KeyPattern {}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Matches a captured input string against a pattern string.
pub fn matches(pattern: &str, input: &str) -> bool {
    KeyPattern::new(pattern).matches(input)
}

pub fn is_pattern_key(key: &str) -> bool {
    key.contains(PATTERN_MARKERS)
}

/// Drops `<`/`>` from the modifier prefix of an input, keeping the body intact.
pub fn strip_sides(input: &str) -> String {
    let (modifiers, body) = split_modifiers(input);
    let mut unsided: String = modifiers.chars().filter(|c| !SIDE_MARKERS.contains(c)).collect();
    unsided.push_str(body);
    unsided
}

/// Splits off the greedy modifier prefix. A string made only of modifier
/// symbols keeps its last symbol as the body, so `^+` is ctrl and the plus key.
fn split_modifiers(input: &str) -> (&str, &str) {
    let prefix_len = input
        .char_indices()
        .find(|(_, c)| !MODIFIER_SYMBOLS.contains(c))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    if prefix_len == input.len() {
        if let Some((last, _)) = input.char_indices().last() {
            return input.split_at(last);
        }
    }
    input.split_at(prefix_len)
}

fn modifiers_match(pattern: &str, input: &str) -> bool {
    let keep_sides = pattern.contains(SIDE_MARKERS);
    normalize_modifiers(pattern, keep_sides) == normalize_modifiers(input, keep_sides)
}

fn normalize_modifiers(modifiers: &str, keep_sides: bool) -> Vec<char> {
    let mut chars: Vec<char> = modifiers
        .chars()
        .filter(|c| keep_sides || !SIDE_MARKERS.contains(c))
        .collect();
    chars.sort_unstable();
    chars
}

fn parse_body(body: &str) -> Body {
    if body.contains(['*', '?']) {
        let mut expr = String::from("^");
        let mut buf = [0u8; 4];
        for c in body.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                c => expr.push_str(&regex::escape(c.encode_utf8(&mut buf))),
            }
        }
        expr.push('$');
        return Regex::new(&expr).map(Body::Wildcard).unwrap_or(Body::Invalid);
    }
    if body.contains('-') {
        let parts: Vec<&str> = body.split('-').collect();
        return match parts.as_slice() {
            [start, end] => match (single_char(start), single_char(end)) {
                // start > end is an empty range and never matches
                (Some(start), Some(end)) => Body::Range(start, end),
                _ => Body::Invalid,
            },
            _ => Body::Invalid,
        };
    }
    Body::Literal(body.to_string())
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
