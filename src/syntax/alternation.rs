//! Ordered alternation: try grammar rules in a fixed order at one cursor
//! position and take the first that applies.

use crate::errors::ParseError;
use crate::syntax::reader::Reader;

/// Result of trying one grammar rule.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The rule applied; the node is positioned and the input consumed.
    Match(T),
    /// The rule's leading tokens did not apply. The reader is untouched.
    WrongRule,
    /// The rule's leading tokens applied but its body is malformed.
    Failure(ParseError),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Match(value) => Outcome::Match(f(value)),
            Outcome::WrongRule => Outcome::WrongRule,
            Outcome::Failure(err) => Outcome::Failure(err),
        }
    }
}

impl<T> From<Result<T, ParseError>> for Outcome<T> {
    fn from(result: Result<T, ParseError>) -> Self {
        match result {
            Ok(value) => Outcome::Match(value),
            Err(err) => Outcome::Failure(err),
        }
    }
}

/// A grammar rule tried by [`next_node`].
pub type Rule<T> = fn(&mut Reader) -> Outcome<T>;

/// Tries each rule in order at the current position.
///
/// Returns the first match, `Ok(None)` when every rule declined (the reader is
/// then exactly where it was), or the first hard failure.
pub fn next_node<T>(reader: &mut Reader, rules: &[Rule<T>]) -> Result<Option<T>, ParseError> {
    for &rule in rules {
        let before = reader.cursor();
        match rule(reader) {
            Outcome::Match(node) => return Ok(Some(node)),
            Outcome::WrongRule => {
                debug_assert_eq!(reader.cursor(), before, "declining rule moved the cursor");
            }
            Outcome::Failure(err) => return Err(err),
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorKind, ErrorReporting};

    fn letter_a(reader: &mut Reader) -> Outcome<char> {
        if reader.peek() != b'a' {
            return Outcome::WrongRule;
        }
        reader.advance(1);
        Outcome::Match('a')
    }

    fn letter_b(reader: &mut Reader) -> Outcome<char> {
        let mut tx = reader.begin_tx();
        if tx.read_byte() != b'b' {
            return Outcome::WrongRule;
        }
        if tx.peek() == b'!' {
            return Outcome::Failure(tx.report_here(ErrorKind::UnexpectedContent {
                content: "!".into(),
            }));
        }
        tx.commit();
        Outcome::Match('b')
    }

    fn anything(reader: &mut Reader) -> Outcome<char> {
        Outcome::Match(reader.read_byte() as char)
    }

    #[test]
    fn first_applicable_rule_wins() {
        let mut reader = Reader::new("test", "ba");
        let rules: &[Rule<char>] = &[letter_a, letter_b, anything];
        assert_eq!(next_node(&mut reader, rules).unwrap(), Some('b'));
        assert_eq!(next_node(&mut reader, rules).unwrap(), Some('a'));
        assert_eq!(reader.offset(), 2);
    }

    #[test]
    fn no_match_leaves_reader_untouched() {
        let mut reader = Reader::new("test", "c\nd");
        reader.advance(2);
        let before = reader.cursor();
        let rules: &[Rule<char>] = &[letter_a, letter_b];
        assert_eq!(next_node(&mut reader, rules).unwrap(), None);
        assert_eq!(reader.cursor(), before);
    }

    #[test]
    fn hard_failure_stops_alternation() {
        let mut reader = Reader::new("test", "b!");
        let rules: &[Rule<char>] = &[letter_b, anything];
        let err = next_node(&mut reader, rules).unwrap_err();
        assert_eq!(err.column(), 2);
        assert_eq!(reader.offset(), 0);
    }

    #[test]
    fn outcome_converts_from_result() {
        let matched = Outcome::from(Ok::<_, ParseError>(1)).map(|n| n + 1);
        assert!(matches!(matched, Outcome::Match(2)));
        let reader = Reader::new("test", "");
        let failed: Outcome<i32> = Err(reader.report_here(ErrorKind::UnterminatedString)).into();
        assert!(matches!(failed, Outcome::Failure(_)));
    }
}
