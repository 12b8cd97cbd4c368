//! Byte cursor over a configuration source.
//!
//! The reader tracks line and column as it advances and hands out scoped
//! [`Transaction`]s: a transaction snapshots the cursor and restores it when
//! dropped unless it was committed. Transactions nest, since a transaction
//! dereferences to the reader it borrows.

use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::sync::Arc;

use miette::NamedSource;

use crate::errors::{ErrorKind, ErrorReporting, Location, ParseError};
use crate::syntax::Section;

/// Returned by [`Reader::peek`] and [`Reader::read_byte`] at end of input.
/// 0xFF never occurs in UTF-8 text; use [`Reader::at_eof`] where raw bytes
/// may contain it.
pub const EOF: u8 = 0xff;

const WHITESPACE: &[u8] = b" \t\n";

pub fn is_whitespace(byte: u8) -> bool {
    WHITESPACE.contains(&byte)
}

pub fn is_inline_whitespace(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Cursor state. `line` and `column` start at 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    const START: Cursor = Cursor {
        offset: 0,
        line: 1,
        column: 1,
    };
}

#[derive(Debug, Clone)]
pub struct Reader {
    file: String,
    source: Vec<u8>,
    cursor: Cursor,
    /// Shared with every error built from this reader.
    named: Arc<NamedSource<String>>,
}

impl Reader {
    pub fn new(file: impl Into<String>, source: impl Into<Vec<u8>>) -> Self {
        let file = file.into();
        let source = source.into();
        let text = String::from_utf8_lossy(&source).into_owned();
        Self {
            named: Arc::new(NamedSource::new(file.clone(), text)),
            file,
            source,
            cursor: Cursor::START,
        }
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let source = std::fs::read(path)?;
        Ok(Self::new(path.display().to_string(), source))
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn source(&self) -> &[u8] {
        &self.source
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn offset(&self) -> usize {
        self.cursor.offset
    }

    pub fn line(&self) -> usize {
        self.cursor.line
    }

    pub fn column(&self) -> usize {
        self.cursor.column
    }

    pub fn at_eof(&self) -> bool {
        self.cursor.offset >= self.source.len()
    }

    fn rest(&self) -> &[u8] {
        &self.source[self.cursor.offset..]
    }

    pub fn peek(&self) -> u8 {
        self.rest().first().copied().unwrap_or(EOF)
    }

    pub fn read_byte(&mut self) -> u8 {
        let byte = self.peek();
        self.advance(1);
        byte
    }

    /// The next `length` bytes, or `None` if fewer remain.
    pub fn peek_n(&self, length: usize) -> Option<&[u8]> {
        self.rest().get(..length)
    }

    pub fn read_n(&mut self, length: usize) -> Option<&[u8]> {
        let start = self.cursor.offset;
        self.peek_n(length)?;
        self.advance(length);
        Some(&self.source[start..start + length])
    }

    /// The longest prefix containing no byte of `set`.
    pub fn peek_until(&self, set: &[u8]) -> &[u8] {
        let rest = self.rest();
        let end = rest
            .iter()
            .position(|b| set.contains(b))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    pub fn read_until(&mut self, set: &[u8]) -> &[u8] {
        let length = self.peek_until(set).len();
        self.take(length)
    }

    pub fn read_while(&mut self, accept: impl Fn(u8) -> bool) -> &[u8] {
        let length = self.rest().iter().take_while(|b| accept(**b)).count();
        self.take(length)
    }

    pub fn peek_word(&self) -> &[u8] {
        self.peek_until(WHITESPACE)
    }

    pub fn read_word(&mut self) -> &[u8] {
        self.read_until(WHITESPACE)
    }

    pub fn peek_line(&self) -> &[u8] {
        self.peek_until(b"\n")
    }

    pub fn skip_whitespace(&mut self) {
        self.read_while(is_whitespace);
    }

    pub fn skip_inline_whitespace(&mut self) {
        self.read_while(is_inline_whitespace);
    }

    fn take(&mut self, length: usize) -> &[u8] {
        let start = self.cursor.offset;
        self.advance(length);
        &self.source[start..self.cursor.offset]
    }

    /// Moves forward `count` bytes (stopping at end of input), keeping line
    /// and column in step with the bytes passed over.
    pub fn advance(&mut self, count: usize) {
        let count = count.min(self.source.len() - self.cursor.offset);
        let start = self.cursor.offset;
        for &byte in &self.source[start..start + count] {
            if byte == b'\n' {
                self.cursor.line += 1;
                self.cursor.column = 1;
            } else {
                self.cursor.column += 1;
            }
        }
        self.cursor.offset += count;
    }

    pub fn begin_tx(&mut self) -> Transaction<'_> {
        Transaction {
            snapshot: self.cursor,
            reader: self,
            committed: false,
        }
    }

    /// Line and column of an arbitrary offset, counted the same way as
    /// [`Reader::advance`] counts them. Only the bytes between the offset and
    /// the cursor, plus the start of the offset's line, are scanned.
    pub fn location_of(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let here = self.cursor.offset;
        let line = if offset <= here {
            self.cursor.line - count_newlines(&self.source[offset..here])
        } else {
            self.cursor.line + count_newlines(&self.source[here..offset])
        };
        let line_start = self.source[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |newline| newline + 1);
        (line, offset - line_start + 1)
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

impl ErrorReporting for Reader {
    fn report(&self, kind: ErrorKind, span: Section) -> ParseError {
        let (line, column) = self.location_of(span.pos());
        let location = Location {
            file: self.file.clone(),
            line,
            column,
        };
        ParseError::new(kind, location, Arc::clone(&self.named), span)
    }

    fn here(&self) -> Section {
        let length = if self.at_eof() { 0 } else { 1 };
        Section::new(self.cursor.offset, length)
    }
}

/// A cursor snapshot. Dropping an uncommitted transaction rolls the reader
/// back to the snapshot.
#[derive(Debug)]
pub struct Transaction<'r> {
    reader: &'r mut Reader,
    snapshot: Cursor,
    committed: bool,
}

impl Transaction<'_> {
    /// Offset where the transaction began.
    pub fn start(&self) -> usize {
        self.snapshot.offset
    }

    /// Keeps everything consumed since the snapshot and returns its extent.
    pub fn commit(mut self) -> Section {
        self.committed = true;
        Section::new(
            self.snapshot.offset,
            self.reader.cursor.offset - self.snapshot.offset,
        )
    }

    /// Discards everything consumed since the snapshot.
    pub fn rollback(self) {}
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.reader.cursor = self.snapshot;
        }
    }
}

impl Deref for Transaction<'_> {
    type Target = Reader;

    fn deref(&self) -> &Reader {
        self.reader
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Reader {
        self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &str) -> Reader {
        Reader::new("test", text)
    }

    #[test]
    fn peek_returns_eof_sentinel_at_end() {
        let mut r = reader("a");
        assert_eq!(r.peek(), b'a');
        assert_eq!(r.read_byte(), b'a');
        assert!(r.at_eof());
        assert_eq!(r.peek(), EOF);
        assert_eq!(r.read_byte(), EOF);
        assert_eq!(r.offset(), 1);
    }

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut r = reader("ab\ncd");
        r.advance(2);
        assert_eq!((r.line(), r.column()), (1, 3));
        r.advance(1);
        assert_eq!((r.line(), r.column()), (2, 1));
        r.advance(10);
        assert_eq!((r.offset(), r.line(), r.column()), (5, 2, 3));
    }

    #[test]
    fn peek_n_is_bounds_checked() {
        let mut r = reader("set");
        assert_eq!(r.peek_n(3), Some(&b"set"[..]));
        assert_eq!(r.peek_n(4), None);
        assert_eq!(r.read_n(4), None);
        assert_eq!(r.offset(), 0);
        assert_eq!(r.read_n(2), Some(&b"se"[..]));
        assert_eq!(r.offset(), 2);
    }

    #[test]
    fn until_stops_at_any_delimiter_or_end() {
        let mut r = reader("gaps inner\t10");
        assert_eq!(r.peek_word(), b"gaps");
        assert_eq!(r.read_word(), b"gaps");
        r.skip_whitespace();
        assert_eq!(r.read_until(b"\t"), b"inner");
        r.skip_whitespace();
        assert_eq!(r.read_word(), b"10");
        assert_eq!(r.read_word(), b"");
    }

    #[test]
    fn peek_line_excludes_newline() {
        let r = reader("] broken\nnext");
        assert_eq!(r.peek_line(), b"] broken");
    }

    #[test]
    fn skip_inline_whitespace_keeps_newlines() {
        let mut r = reader(" \t\n x");
        r.skip_inline_whitespace();
        assert_eq!(r.peek(), b'\n');
        r.skip_whitespace();
        assert_eq!(r.peek(), b'x');
        assert_eq!((r.line(), r.column()), (2, 2));
    }

    #[test]
    fn commit_reports_consumed_section() {
        let mut r = reader("smart_gaps on");
        r.advance(1);
        let mut tx = r.begin_tx();
        tx.read_word();
        let section = tx.commit();
        assert_eq!(section, Section::new(1, 9));
        assert_eq!(r.offset(), 10);
    }

    #[test]
    fn dropped_transaction_rolls_back() {
        let mut r = reader("one\ntwo");
        {
            let mut tx = r.begin_tx();
            tx.advance(5);
            assert_eq!(tx.line(), 2);
        }
        assert_eq!(r.cursor(), Cursor::START);
    }

    #[test]
    fn nested_rollback_restores_each_snapshot() {
        let mut r = reader("a\nb\nc\nd");
        let mut outer = r.begin_tx();
        outer.advance(2);
        let after_outer = outer.cursor();
        {
            let mut middle = outer.begin_tx();
            middle.advance(2);
            {
                let mut inner = middle.begin_tx();
                inner.advance(3);
                assert_eq!(inner.line(), 4);
                inner.rollback();
            }
            assert_eq!(middle.cursor().line, 3);
        }
        assert_eq!(outer.cursor(), after_outer);
        outer.rollback();
        assert_eq!(r.cursor(), Cursor::START);
    }

    #[test]
    fn committed_inner_survives_until_outer_rolls_back() {
        let mut r = reader("abcdef");
        {
            let mut outer = r.begin_tx();
            let mut inner = outer.begin_tx();
            inner.advance(3);
            assert_eq!(inner.commit(), Section::new(0, 3));
            assert_eq!(outer.offset(), 3);
        }
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn location_of_matches_advance() {
        let mut r = reader("x\n\tyz\n");
        for offset in 0..=r.source().len() {
            assert_eq!(r.location_of(offset), (r.line(), r.column()));
            r.advance(1);
        }
    }

    #[test]
    fn location_of_works_on_either_side_of_the_cursor() {
        let mut r = reader("ab\ncd\nef");
        r.advance(4);
        assert_eq!(r.location_of(1), (1, 2));
        assert_eq!(r.location_of(3), (2, 1));
        assert_eq!(r.location_of(7), (3, 2));
        assert_eq!(r.location_of(100), (3, 3));
    }

    #[test]
    fn errors_share_the_readers_source() {
        let r = reader("set $mod");
        let first = r.report_here(ErrorKind::MissingVariableName);
        let second = r.report_here(ErrorKind::UnterminatedString);
        assert!(Arc::ptr_eq(
            &first.source_info.source,
            &second.source_info.source
        ));
    }

    #[test]
    fn errors_are_located_at_span_start() {
        let mut r = reader("gaps\n  oops");
        r.advance(7);
        let err = r.report_here(ErrorKind::InvalidIdentifier { found: "o".into() });
        assert_eq!((err.line(), err.column()), (2, 3));
        assert_eq!(err.file(), "test");
    }
}
