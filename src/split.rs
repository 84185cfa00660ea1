//! Splitters break text into borrowed pieces for the parsers in
//! [`crate::parse`].

use crate::error::ParseError;
use regex::Regex;
use tracing::trace;

pub trait Splitter {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError>;
}

impl<S: Splitter + ?Sized> Splitter for &S {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        (**self).split(s)
    }
}

/// One piece per line; `\r\n` line ends are accepted.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lines;

impl Splitter for Lines {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        Ok(s.lines().collect())
    }
}

/// Paragraphs separated by one or more blank lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blocks;

impl Splitter for Blocks {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        let mut blocks = Vec::new();
        let mut start = None;
        let mut end = 0;
        let mut at = 0;
        for line in s.split_inclusive('\n') {
            let body = line.trim_end_matches(['\n', '\r']);
            if body.trim().is_empty() {
                if let Some(start) = start.take() {
                    blocks.push(&s[start..end]);
                }
            } else {
                start.get_or_insert(at);
                end = at + body.len();
            }
            at += line.len();
        }
        if let Some(start) = start {
            blocks.push(&s[start..end]);
        }
        Ok(blocks)
    }
}

/// Runs of non-whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fields;

impl Splitter for Fields {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        Ok(s.split_whitespace().collect())
    }
}

/// Every occurrence of a separator. Empty input has no pieces.
#[derive(Clone, Copy, Debug)]
pub struct On<'p>(pub &'p str);

impl Splitter for On<'_> {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        if s.is_empty() {
            return Ok(Vec::new());
        }
        Ok(s.split(self.0).collect())
    }
}

/// At most `n` pieces; the last one keeps any further separators.
#[derive(Clone, Copy, Debug)]
pub struct SplitN<'p>(pub &'p str, pub usize);

impl Splitter for SplitN<'_> {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        Ok(s.splitn(self.1, self.0).collect())
    }
}

/// Capture groups of a regular expression that has to match the whole
/// input. Groups that did not participate yield empty pieces.
#[derive(Clone, Debug)]
pub struct Regexp {
    pattern: String,
    re: Regex,
}

impl Regexp {
    pub fn new(pattern: &str) -> Result<Self, ParseError> {
        let re = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| ParseError::Pattern {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        })?;
        trace!(pattern, groups = re.captures_len() - 1, "compiled splitter");
        Ok(Self {
            pattern: pattern.to_owned(),
            re,
        })
    }
}

impl Splitter for Regexp {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        let caps = self
            .re
            .captures(s)
            .ok_or_else(|| ParseError::mismatch(format!("a match for /{}/", self.pattern), s))?;
        Ok(caps
            .iter()
            .skip(1)
            .map(|m| m.map_or("", |m| m.as_str()))
            .collect())
    }
}

/// One piece per byte. Only ASCII input can be split this way.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bytes;

impl Splitter for Bytes {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        if !s.is_ascii() {
            return Err(ParseError::mismatch("ASCII text", s));
        }
        Ok((0..s.len()).map(|i| &s[i..i + 1]).collect())
    }
}

/// Splits on whichever separator matches first at each position, trying
/// them in the order given.
#[derive(Clone, Copy, Debug)]
pub struct Any<'p>(pub &'p [&'p str]);

impl Splitter for Any<'_> {
    fn split<'a>(&self, s: &'a str) -> Result<Vec<&'a str>, ParseError> {
        if s.is_empty() {
            return Ok(Vec::new());
        }
        let mut pieces = Vec::new();
        let mut start = 0;
        let mut at = 0;
        while at < s.len() {
            match self.0.iter().find(|sep| !sep.is_empty() && s[at..].starts_with(**sep)) {
                Some(sep) => {
                    pieces.push(&s[start..at]);
                    at += sep.len();
                    start = at;
                }
                None => at += s[at..].chars().next().map_or(1, char::len_utf8),
            }
        }
        pieces.push(&s[start..]);
        Ok(pieces)
    }
}
