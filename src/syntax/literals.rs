//! Leaf parsers for keywords, identifiers, numbers, booleans, strings,
//! variable names, and whitespace.
//!
//! Each parser works inside its own transaction: on failure the reader is
//! left where the parser found it. Failures here are hard failures once the
//! calling rule has committed to its shape.

use crate::errors::{describe_byte, ErrorKind, ErrorReporting, ParseError};
use crate::syntax::reader::{is_whitespace, Reader};
use crate::syntax::{
    Bool, Exact, Identifier, Number, Section, StringLiteral, VariableName, Whitespace, Word,
};

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn at_boundary(reader: &Reader) -> bool {
    reader.at_eof() || is_whitespace(reader.peek())
}

pub fn is_identifier_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}

/// Criteria keys such as `window_role` also allow `_`.
fn is_criterion_key_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Consumes exactly `keyword.len()` bytes, failing unless they spell `keyword`.
pub fn parse_exact(reader: &mut Reader, keyword: &'static str) -> Result<Exact, ParseError> {
    let mut tx = reader.begin_tx();
    let start = tx.start();
    let found = match tx.peek_n(keyword.len()) {
        Some(bytes) if bytes == keyword.as_bytes() => None,
        Some(bytes) => Some(lossy(bytes)),
        None => Some(lossy(tx.peek_until(b""))),
    };
    if let Some(found) = found {
        let span = Section::new(start, keyword.len().min(tx.source().len() - start));
        let found = if found.is_empty() { "EOF".into() } else { found };
        return Err(tx.report(
            ErrorKind::ExpectedKeyword {
                expected: keyword,
                found,
            },
            span,
        ));
    }
    tx.advance(keyword.len());
    Ok(Exact {
        section: tx.commit(),
        value: keyword,
    })
}

/// A keyword that stands alone as a word. `None` means some other word is
/// here (`settings` is not `set`), and nothing was consumed.
pub fn parse_keyword(reader: &mut Reader, keyword: &'static str) -> Option<Exact> {
    if reader.peek_n(keyword.len())? != keyword.as_bytes() {
        return None;
    }
    let mut tx = reader.begin_tx();
    tx.advance(keyword.len());
    if !at_boundary(&tx) {
        return None;
    }
    Some(Exact {
        section: tx.commit(),
        value: keyword,
    })
}

/// One or more ASCII letters or digits.
pub fn parse_identifier(reader: &mut Reader) -> Result<Identifier, ParseError> {
    read_identifier(reader, is_identifier_byte)
}

/// The key of a `key="value"` window criterion.
pub fn parse_criterion_key(reader: &mut Reader) -> Result<Identifier, ParseError> {
    read_identifier(reader, is_criterion_key_byte)
}

fn read_identifier(reader: &mut Reader, accept: fn(u8) -> bool) -> Result<Identifier, ParseError> {
    let mut tx = reader.begin_tx();
    let value = lossy(tx.read_while(accept));
    if value.is_empty() {
        return Err(tx.report_here(ErrorKind::InvalidIdentifier {
            found: describe_byte(tx.peek()),
        }));
    }
    Ok(Identifier {
        section: tx.commit(),
        value,
    })
}

/// Digits with at most one non-leading `.`, followed by whitespace or the
/// end of input.
pub fn parse_number(reader: &mut Reader) -> Result<Number, ParseError> {
    let mut tx = reader.begin_tx();
    let start = tx.start();
    let mut seen_dot = false;
    loop {
        let byte = tx.peek();
        if byte.is_ascii_digit() {
            tx.advance(1);
        } else if byte == b'.' && !seen_dot && tx.offset() > start {
            seen_dot = true;
            tx.advance(1);
        } else {
            break;
        }
    }

    let text = lossy(&tx.source()[start..tx.offset()]);
    if text.is_empty() || !at_boundary(&tx) {
        return Err(tx.report_here(ErrorKind::InvalidNumber {
            found: describe_byte(tx.peek()),
        }));
    }
    let span = Section::new(start, text.len());
    let value: f64 = text
        .parse()
        .map_err(|_| tx.report(ErrorKind::InvalidNumber { found: text.clone() }, span))?;
    if !value.is_finite() {
        return Err(tx.report(ErrorKind::NumberOutOfRange { value: text }, span));
    }
    Ok(Number {
        section: tx.commit(),
        value,
    })
}

/// `on` or `off` as a whole word.
pub fn parse_bool(reader: &mut Reader) -> Result<Bool, ParseError> {
    let mut tx = reader.begin_tx();
    let word = lossy(tx.read_word());
    let value = match word.as_str() {
        "on" => true,
        "off" => false,
        _ => {
            let span = Section::new(tx.start(), word.len());
            return Err(tx.report(ErrorKind::InvalidBool { value: word }, span));
        }
    };
    Ok(Bool {
        section: tx.commit(),
        value,
    })
}

/// A double-quoted string. A backslash makes the following byte literal;
/// the backslash itself is dropped and no escape sequences are decoded.
pub fn parse_string(reader: &mut Reader) -> Result<StringLiteral, ParseError> {
    let mut tx = reader.begin_tx();
    let quote = tx.peek();
    if quote != b'"' {
        return Err(tx.unexpected_byte("\"", quote));
    }
    tx.advance(1);

    let mut value = Vec::new();
    loop {
        if tx.at_eof() {
            let span = Section::new(tx.start(), tx.offset() - tx.start());
            return Err(tx.report(ErrorKind::UnterminatedString, span));
        }
        match tx.read_byte() {
            b'\\' => {
                if tx.at_eof() {
                    continue;
                }
                value.push(tx.read_byte());
            }
            byte if byte == quote => break,
            byte => value.push(byte),
        }
    }
    Ok(StringLiteral {
        section: tx.commit(),
        value: lossy(&value),
    })
}

/// A word starting with `$`.
pub fn parse_variable_name(reader: &mut Reader) -> Result<VariableName, ParseError> {
    let mut tx = reader.begin_tx();
    let word = lossy(tx.read_word());
    if word.is_empty() {
        return Err(tx.report_here(ErrorKind::MissingVariableName));
    }
    if !word.starts_with('$') {
        let span = Section::new(tx.start(), word.len());
        return Err(tx.report(ErrorKind::InvalidVariableName { value: word }, span));
    }
    Ok(VariableName {
        section: tx.commit(),
        value: word,
    })
}

/// A run of spaces, tabs, and newlines. An empty run is not a match.
pub fn parse_whitespace(reader: &mut Reader) -> Option<Whitespace> {
    let mut tx = reader.begin_tx();
    tx.skip_whitespace();
    if tx.offset() == tx.start() {
        return None;
    }
    Some(Whitespace {
        section: tx.commit(),
    })
}

/// A bare word ending at whitespace or end of input.
pub fn parse_word(reader: &mut Reader) -> Word {
    let mut tx = reader.begin_tx();
    let value = lossy(tx.read_word());
    Word {
        section: tx.commit(),
        value,
    }
}

/// One or more spaces, tabs, or newlines between the parts of a statement.
pub fn require_whitespace(reader: &mut Reader) -> Result<(), ParseError> {
    if reader.at_eof() || !is_whitespace(reader.peek()) {
        return Err(reader.report_here(ErrorKind::ExpectedWhitespace {
            found: describe_byte(reader.peek()),
        }));
    }
    reader.skip_whitespace();
    Ok(())
}

/// Consumes `expected` or fails naming the byte that was found instead.
pub fn expect_byte(reader: &mut Reader, expected: u8) -> Result<(), ParseError> {
    let found = reader.peek();
    if reader.at_eof() || found != expected {
        return Err(reader.unexpected_byte(&describe_byte(expected), found));
    }
    reader.advance(1);
    Ok(())
}
