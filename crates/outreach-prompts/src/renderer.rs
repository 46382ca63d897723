//! Placeholder substitution for stage prompts.
//!
//! Syntax:
//! - `{name}` where `name` is `[A-Za-z_][A-Za-z0-9_]*` is a placeholder
//! - `{{` and `}}` render as literal `{` and `}`
//! - any other brace is copied through unchanged

use std::collections::BTreeMap;

use crate::TemplateError;

/// Placeholder name to value mapping for one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Variables::new();
        for (name, value) in iter {
            vars.insert(name, value);
        }
        vars
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// A template split into literal text and placeholders
#[derive(Debug, Clone)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    pub fn parse(source: &'a str) -> Self {
        Template {
            segments: scan(source),
        }
    }

    /// Placeholder names in order of first appearance
    pub fn placeholders(&self) -> Vec<&'a str> {
        let mut names: Vec<&'a str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(name) {
                    names.push(*name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder. Fails on the first name absent
    /// from `vars` and returns no partial output.
    pub fn render(&self, vars: &Variables) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = vars.get(name).ok_or_else(|| TemplateError::MissingPlaceholder {
                        name: (*name).to_string(),
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

/// Render a template string in one call
pub fn render(template: &str, vars: &Variables) -> Result<String, TemplateError> {
    Template::parse(template).render(vars)
}

/// Names referenced by a template string
pub fn placeholders(template: &str) -> Vec<&str> {
    Template::parse(template).placeholders()
}

fn scan(source: &str) -> Vec<Segment<'_>> {
    let bytes = source.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                // Doubled brace: keep one, drop the other.
                push_literal(&mut segments, &source[literal_start..=i]);
                i += 2;
                literal_start = i;
            }
            b'{' => match placeholder_len(&bytes[i + 1..]) {
                Some(len) => {
                    push_literal(&mut segments, &source[literal_start..i]);
                    segments.push(Segment::Placeholder(&source[i + 1..i + 1 + len]));
                    i += len + 2;
                    literal_start = i;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    push_literal(&mut segments, &source[literal_start..]);
    segments
}

/// Length of the identifier before a closing `}`, if `rest` starts with one
fn placeholder_len(rest: &[u8]) -> Option<usize> {
    let first = rest.first()?;
    if !(first.is_ascii_alphabetic() || *first == b'_') {
        return None;
    }
    let len = rest
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || *b == b'_'))?;
    (rest[len] == b'}').then_some(len)
}

fn push_literal<'a>(segments: &mut Vec<Segment<'a>>, text: &'a str) {
    if !text.is_empty() {
        segments.push(Segment::Literal(text));
    }
}
