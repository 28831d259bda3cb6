//! Parser for `RefinedMatches` match reports.
//!
//! A report is a sequence of blocks, each a bracketed list of match entries:
//!
//! ```text
//! RefinedMatches([NULL,[1,2,181.5,200.0,10..20,15..25,181]]);
//! ```
//!
//! An entry is either `NULL` or
//! `[entry1, entry2, score, pam_distance, range1, range2, pam_variance (, int)?]`.
//! Only the two entries, the two ranges, and the integer part of the score are
//! kept. `NULL` entries yield no record.
//!
//! Parsing is a single left-to-right pass with one token of lookahead. Records
//! are produced lazily through [`RefinedMatches`]; the first grammar violation
//! is yielded as an error and ends the sequence.

use std::iter::FusedIterator;
use thiserror::Error;

use crate::core::record::{MatchRecord, Range};

/// Location of a lexical fragment in the parsed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// Byte offset from the start of the text
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 1-based column (in bytes)
    pub column: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected '{fragment}' at {position}: expected {expected}")]
    UnexpectedToken {
        fragment: String,
        expected: &'static str,
        position: Position,
    },

    #[error("Unexpected end of input at {position}: expected {expected}")]
    UnexpectedEnd {
        expected: &'static str,
        position: Position,
    },

    #[error("Unrecognized input '{fragment}' at {position}")]
    UnrecognizedInput { fragment: String, position: Position },

    #[error("Number '{fragment}' at {position} is out of range")]
    NumberOutOfRange { fragment: String, position: Position },
}

impl ParseError {
    /// The offending text; empty at end of input
    #[must_use]
    pub fn fragment(&self) -> &str {
        match self {
            Self::UnexpectedToken { fragment, .. }
            | Self::UnrecognizedInput { fragment, .. }
            | Self::NumberOutOfRange { fragment, .. } => fragment,
            Self::UnexpectedEnd { .. } => "",
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEnd { position, .. }
            | Self::UnrecognizedInput { position, .. }
            | Self::NumberOutOfRange { position, .. } => *position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    /// `RefinedMatches(`
    Open,
    /// `)`
    Close,
    LBracket,
    RBracket,
    Comma,
    /// `..`
    RangeSep,
    /// `:` or `;`
    Terminator,
    Null,
    Int,
    Real,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: TokenKind,
    text: &'a str,
    position: Position,
}

struct Lexer<'a> {
    text: &'a str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn peek_byte(&self, ahead: usize) -> Option<u8> {
        self.text.as_bytes().get(self.offset + ahead).copied()
    }

    // Callers only advance over ASCII, so offsets stay on char boundaries.
    fn bump(&mut self, len: usize) {
        for &b in &self.text.as_bytes()[self.offset..self.offset + len] {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += len;
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte(0) {
            if matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0c') {
                self.bump(1);
            } else {
                break;
            }
        }
    }

    fn count_while(&self, from: usize, pred: impl Fn(u8) -> bool) -> usize {
        self.text.as_bytes()[self.offset + from..]
            .iter()
            .take_while(|&&b| pred(b))
            .count()
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        self.skip_whitespace();
        let position = self.position();
        let Some(first) = self.peek_byte(0) else {
            return Ok(None);
        };

        let (kind, len) = match first {
            b'[' => (TokenKind::LBracket, 1),
            b']' => (TokenKind::RBracket, 1),
            b',' => (TokenKind::Comma, 1),
            b')' => (TokenKind::Close, 1),
            b':' | b';' => (TokenKind::Terminator, 1),
            b'.' if self.peek_byte(1) == Some(b'.') => (TokenKind::RangeSep, 2),
            b'0'..=b'9' => {
                let int_len = self.count_while(0, |b| b.is_ascii_digit());
                let has_fraction = self.peek_byte(int_len) == Some(b'.')
                    && self.peek_byte(int_len + 1).is_some_and(|b| b.is_ascii_digit());
                if has_fraction {
                    let frac_len = self.count_while(int_len + 1, |b| b.is_ascii_digit());
                    (TokenKind::Real, int_len + 1 + frac_len)
                } else {
                    (TokenKind::Int, int_len)
                }
            }
            b if b.is_ascii_alphabetic() => {
                let word_len = self.count_while(0, |b| b.is_ascii_alphanumeric() || b == b'_');
                let word = &self.text[self.offset..self.offset + word_len];
                match word {
                    "NULL" => (TokenKind::Null, word_len),
                    "RefinedMatches" if self.peek_byte(word_len) == Some(b'(') => {
                        (TokenKind::Open, word_len + 1)
                    }
                    _ => {
                        return Err(ParseError::UnrecognizedInput {
                            fragment: word.to_string(),
                            position,
                        })
                    }
                }
            }
            _ => {
                let fragment = self.text[self.offset..]
                    .chars()
                    .next()
                    .map(String::from)
                    .unwrap_or_default();
                return Err(ParseError::UnrecognizedInput { fragment, position });
            }
        };

        let text = &self.text[self.offset..self.offset + len];
        self.bump(len);
        Ok(Some(Token {
            kind,
            text,
            position,
        }))
    }
}

/// One parsed list entry, before the `NULL` filter is applied
#[derive(Debug, Clone, Copy, PartialEq)]
enum Entry {
    Null,
    Match(RawMatch),
}

/// Every field of a bracketed entry as written in the report
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(dead_code)] // pam_distance, pam_variance and extra are parsed but not retained
struct RawMatch {
    entry1: u64,
    entry2: u64,
    score: u64,
    pam_distance: f64,
    range1: Range,
    range2: Range,
    pam_variance: f64,
    extra: Option<u64>,
}

impl Entry {
    fn into_record(self) -> Option<MatchRecord> {
        match self {
            Self::Null => None,
            Self::Match(raw) => Some(raw.into_record()),
        }
    }
}

impl RawMatch {
    fn into_record(self) -> MatchRecord {
        MatchRecord::new(self.entry1, self.entry2, self.range1, self.range2, self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between blocks
    Document,
    /// Just after the opening `[` of a list
    ListStart,
    /// Expecting an entry
    ListItem,
    /// After an entry, expecting `,` or `]`
    ListSeparator,
    Done,
}

/// Lazy, single-pass sequence of the records in one report.
///
/// Yields `Err` at most once, after which the sequence is exhausted. To read
/// the same report again, create a new parser over its text.
pub struct RefinedMatches<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token<'a>>,
    state: State,
}

/// Parse the text of one report into a lazy sequence of records.
///
/// Comment lines must already be removed.
#[must_use]
pub fn parse_refined_matches(text: &str) -> RefinedMatches<'_> {
    RefinedMatches {
        lexer: Lexer::new(text),
        peeked: None,
        state: State::Document,
    }
}

/// Parse the text of one report and collect every record.
///
/// # Errors
///
/// Returns the first `ParseError` encountered if the text does not follow the
/// `RefinedMatches` grammar.
pub fn parse_refined_matches_text(text: &str) -> Result<Vec<MatchRecord>, ParseError> {
    parse_refined_matches(text).collect()
}

impl<'a> RefinedMatches<'a> {
    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn peek_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked)
    }

    fn expect_any(&mut self, expected: &'static str) -> Result<Token<'a>, ParseError> {
        self.next_token()?.ok_or_else(|| ParseError::UnexpectedEnd {
            expected,
            position: self.lexer.position(),
        })
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token<'a>, ParseError> {
        let token = self.expect_any(expected)?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected(token, expected))
        }
    }

    fn expect_int(&mut self) -> Result<u64, ParseError> {
        let token = self.expect(TokenKind::Int, "integer")?;
        token.text.parse().map_err(|_| ParseError::NumberOutOfRange {
            fragment: token.text.to_string(),
            position: token.position,
        })
    }

    fn expect_real(&mut self) -> Result<f64, ParseError> {
        let token = self.expect_any("number")?;
        match token.kind {
            TokenKind::Int | TokenKind::Real => {
                token.text.parse().map_err(|_| ParseError::NumberOutOfRange {
                    fragment: token.text.to_string(),
                    position: token.position,
                })
            }
            _ => Err(unexpected(token, "number")),
        }
    }

    /// A real truncated to its integer part, which must fit in a `u64`
    fn expect_score(&mut self) -> Result<u64, ParseError> {
        let token = self.expect_any("number")?;
        match token.kind {
            TokenKind::Int | TokenKind::Real => {
                let integer_part = token.text.split('.').next().unwrap_or(token.text);
                integer_part.parse().map_err(|_| ParseError::NumberOutOfRange {
                    fragment: token.text.to_string(),
                    position: token.position,
                })
            }
            _ => Err(unexpected(token, "number")),
        }
    }

    fn expect_comma(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Comma, "','").map(|_| ())
    }

    fn parse_range(&mut self) -> Result<Range, ParseError> {
        let start = self.expect_int()?;
        self.expect(TokenKind::RangeSep, "'..'")?;
        let end = self.expect_int()?;
        Ok(Range::new(start, end))
    }

    fn parse_entry(&mut self) -> Result<Entry, ParseError> {
        let token = self.expect_any("'NULL' or '['")?;
        match token.kind {
            TokenKind::Null => Ok(Entry::Null),
            TokenKind::LBracket => self.parse_match().map(Entry::Match),
            _ => Err(unexpected(token, "'NULL' or '['")),
        }
    }

    fn parse_match(&mut self) -> Result<RawMatch, ParseError> {
        let entry1 = self.expect_int()?;
        self.expect_comma()?;
        let entry2 = self.expect_int()?;
        self.expect_comma()?;
        let score = self.expect_score()?;
        self.expect_comma()?;
        let pam_distance = self.expect_real()?;
        self.expect_comma()?;
        let range1 = self.parse_range()?;
        self.expect_comma()?;
        let range2 = self.parse_range()?;
        self.expect_comma()?;
        let pam_variance = self.expect_real()?;

        let token = self.expect_any("',' or ']'")?;
        let extra = match token.kind {
            TokenKind::RBracket => None,
            TokenKind::Comma => {
                let value = self.expect_int()?;
                self.expect(TokenKind::RBracket, "']'")?;
                Some(value)
            }
            _ => return Err(unexpected(token, "',' or ']'")),
        };

        Ok(RawMatch {
            entry1,
            entry2,
            score,
            pam_distance,
            range1,
            range2,
            pam_variance,
            extra,
        })
    }

    fn finish_block(&mut self) -> Result<(), ParseError> {
        self.expect(TokenKind::Close, "')'")?;
        self.expect(TokenKind::Terminator, "':' or ';'")?;
        Ok(())
    }

    /// Drive the grammar until the next record or the end of the document.
    fn advance(&mut self) -> Result<Option<MatchRecord>, ParseError> {
        loop {
            match self.state {
                State::Document => match self.next_token()? {
                    None => return Ok(None),
                    Some(token) if token.kind == TokenKind::Open => {
                        self.expect(TokenKind::LBracket, "'['")?;
                        self.state = State::ListStart;
                    }
                    Some(token) => return Err(unexpected(token, "'RefinedMatches('")),
                },
                State::ListStart => {
                    let closes = self
                        .peek_token()?
                        .is_some_and(|token| token.kind == TokenKind::RBracket);
                    if closes {
                        self.next_token()?;
                        self.finish_block()?;
                        self.state = State::Document;
                    } else {
                        self.state = State::ListItem;
                    }
                }
                State::ListItem => {
                    let entry = self.parse_entry()?;
                    self.state = State::ListSeparator;
                    if let Some(record) = entry.into_record() {
                        return Ok(Some(record));
                    }
                }
                State::ListSeparator => {
                    let token = self.expect_any("',' or ']'")?;
                    match token.kind {
                        TokenKind::Comma => self.state = State::ListItem,
                        TokenKind::RBracket => {
                            self.finish_block()?;
                            self.state = State::Document;
                        }
                        _ => return Err(unexpected(token, "',' or ']'")),
                    }
                }
                State::Done => return Ok(None),
            }
        }
    }
}

fn unexpected(token: Token<'_>, expected: &'static str) -> ParseError {
    ParseError::UnexpectedToken {
        fragment: token.text.to_string(),
        expected,
        position: token.position,
    }
}

impl Iterator for RefinedMatches<'_> {
    type Item = Result<MatchRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::Done {
            return None;
        }
        match self.advance() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(e) => {
                self.state = State::Done;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for RefinedMatches<'_> {}
