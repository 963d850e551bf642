//! Format engine
//!
//! A template is scanned left to right. At each position the longest token
//! symbol that matches wins, so `MS` is milliseconds rather than `M`
//! followed by a literal `S`, and `Mo` is a month name rather than `M` then
//! `o`. Anything that is not a token is copied through unchanged.

use crate::date::DateIo;
use crate::field::Token;
use std::fmt;
use std::sync::OnceLock;

/// Template used when none is given
pub const DEFAULT_FORMAT: &str = "Y-M-D H:I:S";

/// Every token, longest symbol first
fn lexicon() -> &'static [Token] {
    static LEXICON: OnceLock<Vec<Token>> = OnceLock::new();
    LEXICON.get_or_init(|| {
        let mut tokens = Token::ALL.to_vec();
        tokens.sort_by_key(|token| std::cmp::Reverse(token.symbol().len()));
        tokens
    })
}

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Token(Token),
    Literal(String),
}

/// A template split into tokens and literal text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(c) = rest.chars().next() {
            match lexicon().iter().find(|token| rest.starts_with(token.symbol())) {
                Some(&token) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Token(token));
                    rest = &rest[token.symbol().len()..];
                }
                None => {
                    literal.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn render(&self, date: &DateIo) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Token(token) => out.push_str(&date.get(*token).to_string()),
                Segment::Literal(text) => out.push_str(text),
            }
        }
        out
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::parse(DEFAULT_FORMAT)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Token(token) => write!(f, "{}", token)?,
                Segment::Literal(text) => f.write_str(text)?,
            }
        }
        Ok(())
    }
}

impl DateIo {
    /// Render with a template; an empty template means [`DEFAULT_FORMAT`]
    pub fn format(&self, template: &str) -> String {
        let template = if template.is_empty() { DEFAULT_FORMAT } else { template };
        Template::parse(template).render(self)
    }
}
