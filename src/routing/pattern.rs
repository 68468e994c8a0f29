//! Path pattern compilation and matching.

use std::ops::Index;
use regex::Regex;

use crate::parser::percent_decode;
use crate::routing::error::Error;

/// Values captured from a request path, in pattern order.
///
/// Captures are addressable by position and by name. Captures inside an
/// optional group that did not participate in the match are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a capture by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a capture by position.
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(_, v)| v.as_str())
    }

    /// Captured values in pattern order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, name: String, value: String) {
        self.0.push((name, value));
    }
}

impl Index<usize> for PathParams {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.0[index].1
    }
}

/// A compiled route pattern.
///
/// Syntax:
/// - `/users` matches the literal path
/// - `/users/:id` captures one segment as `id`
/// - `/files/*path` captures the rest of the path, slashes included
/// - `/users(/:id)` makes the parenthesised part optional
///
/// Matching is anchored at both ends and case-sensitive. Captured values are
/// percent-decoded.
///
/// # Example
///
/// ```
/// use microroute_rs::PathPattern;
///
/// let pattern = PathPattern::parse("/posts/:id/comments/:comment_id").unwrap();
/// let params = pattern.match_path("/posts/123/comments/456").unwrap();
/// assert_eq!(params.get("id"), Some("123"));
/// assert_eq!(&params[1], "456");
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    names: Vec<String>,
}

impl PathPattern {
    /// Compile a pattern string.
    pub fn parse(pattern: &str) -> Result<Self, Error> {
        let invalid = |reason: String| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if !pattern.starts_with('/') {
            return Err(invalid("pattern must start with '/'".to_string()));
        }

        let mut regex_str = String::from("^");
        let mut names: Vec<String> = Vec::new();
        let mut open_groups = 0usize;
        let mut chars = pattern.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                ':' | '*' => {
                    let mut name = String::new();
                    while let Some(&(_, next)) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            name.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }

                    if name.is_empty() {
                        return Err(invalid(format!("unnamed capture at offset {offset}")));
                    }
                    if names.contains(&name) {
                        return Err(invalid(format!("duplicate capture name {name:?}")));
                    }

                    regex_str.push_str(if c == ':' { "([^/]+)" } else { "(.*?)" });
                    names.push(name);
                }
                '(' => {
                    open_groups += 1;
                    regex_str.push_str("(?:");
                }
                ')' => {
                    if open_groups == 0 {
                        return Err(invalid(format!("unbalanced ')' at offset {offset}")));
                    }
                    open_groups -= 1;
                    regex_str.push_str(")?");
                }
                literal => {
                    let mut buf = [0u8; 4];
                    regex_str.push_str(&regex::escape(literal.encode_utf8(&mut buf)));
                }
            }
        }

        if open_groups != 0 {
            return Err(invalid("unclosed '('".to_string()));
        }

        regex_str.push('$');
        let regex = Regex::new(&regex_str).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            names,
        })
    }

    /// Match a request path, returning the captures on success.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;

        let mut params = PathParams::new();
        for (i, name) in self.names.iter().enumerate() {
            if let Some(value) = caps.get(i + 1) {
                params.push(name.clone(), percent_decode(value.as_str()));
            }
        }

        Some(params)
    }

    /// The pattern string this matcher was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Capture names in declaration order.
    pub fn param_names(&self) -> &[String] {
        &self.names
    }
}
