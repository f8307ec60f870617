//! # Header parameters.
//!
//! Splits a structured header value such as
//! `type=p; to=alice@example.org; key=xsBN...` into its parameters.
//! Entries are separated by `;`, each entry is `name` or `name=value`,
//! values may be double-quoted with backslash escapes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Parameter names are MIME tokens.
static PARAM_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9!#$%&'*+.^_`|~-]+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("unterminated quoted string")]
    UnterminatedQuote,

    #[error("invalid parameter name {0:?}")]
    InvalidName(String),

    #[error("malformed value for parameter {0:?}")]
    MalformedValue(String),
}

/// One parameter as written in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParam {
    pub name: String,
    /// Empty for entries written without `=`.
    pub value: String,
}

/// Parameters of a single header value, in the order they were written.
///
/// Names are unique; if a name is repeated the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderParams {
    params: Vec<HeaderParam>,
}

impl HeaderParams {
    /// Parses one raw header value.
    ///
    /// Fails on the first malformed entry, the value then contributes
    /// no parameters at all.
    pub fn parse(value: &str) -> Result<Self, ParamError> {
        let mut params = HeaderParams::default();
        for entry in split_unquoted(value, ';')? {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let (name, value) = match split_once_unquoted(entry, '=') {
                Some((name, value)) => (name.trim(), unquote(name.trim(), value.trim())?),
                None => (entry, String::new()),
            };
            if !PARAM_NAME_REGEX.is_match(name) {
                return Err(ParamError::InvalidName(name.to_string()));
            }
            params.insert(name.to_string(), value);
        }
        Ok(params)
    }

    fn insert(&mut self, name: String, value: String) {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(param) => param.value = value,
            None => self.params.push(HeaderParam { name, value }),
        }
    }

    #[cfg(test)]
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Removes a parameter and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.params.iter().position(|p| p.name == name)?;
        Some(self.params.remove(pos).value)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.params.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HeaderParam> {
        self.params.iter()
    }
}

impl IntoIterator for HeaderParams {
    type Item = HeaderParam;
    type IntoIter = std::vec::IntoIter<HeaderParam>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.into_iter()
    }
}

/// Splits `s` at every `sep` outside of double quotes.
fn split_unquoted(s: &str, sep: char) -> Result<Vec<&str>, ParamError> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if in_quotes && c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            parts.push(s.get(start..i).unwrap_or_default());
            start = i + c.len_utf8();
        }
    }
    if in_quotes {
        return Err(ParamError::UnterminatedQuote);
    }
    parts.push(s.get(start..).unwrap_or_default());
    Ok(parts)
}

/// Splits at the first `sep` outside of double quotes.
fn split_once_unquoted(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if in_quotes && c == '\\' {
            escaped = true;
        } else if c == '"' {
            in_quotes = !in_quotes;
        } else if c == sep && !in_quotes {
            return Some((s.get(..i)?, s.get(i + c.len_utf8()..)?));
        }
    }
    None
}

/// Removes surrounding quotes and resolves escapes.
///
/// A value is either entirely quoted or contains no quotes at all.
fn unquote(name: &str, value: &str) -> Result<String, ParamError> {
    let inner = match value.strip_prefix('"') {
        Some(rest) => match rest.strip_suffix('"') {
            Some(inner) => inner,
            None => return Err(ParamError::MalformedValue(name.to_string())),
        },
        None if value.contains('"') => {
            return Err(ParamError::MalformedValue(name.to_string()));
        }
        None => return Ok(value.to_string()),
    };

    let mut res = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => res.push(escaped),
                None => return Err(ParamError::MalformedValue(name.to_string())),
            },
            '"' => return Err(ParamError::MalformedValue(name.to_string())),
            c => res.push(c),
        }
    }
    Ok(res)
}
