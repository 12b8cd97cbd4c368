//! yabai3 Parser
//!
//! Composite grammar rules and the document loop. Each statement rule opens a
//! transaction, matches its keyword, and then either commits a positioned
//! node or fails hard; a rule whose keyword is absent declines so the next
//! rule can try the same position.

use std::path::Path;

use crate::errors::{describe_byte, ErrorKind, ErrorReporting, LoadError, ParseError};
use crate::syntax::alternation::{next_node, Outcome, Rule};
use crate::syntax::literals::{
    expect_byte, is_identifier_byte, parse_bool, parse_criterion_key, parse_identifier,
    parse_keyword, parse_number, parse_string, parse_variable_name, parse_whitespace, parse_word,
    require_whitespace,
};
use crate::syntax::reader::{Reader, Transaction};
use crate::syntax::{
    Argument, Block, Command, Comment, Condition, Conditions, Document, Exact, ForWindow, GapKind,
    Gaps, Identifier, Mode, Node, Section, SmartGaps, StringLiteral, Variable,
};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse configuration text. `name` is used as the file in error locations.
pub fn parse_str(name: &str, text: &str) -> Result<Document, ParseError> {
    parse_bytes(name, text.as_bytes())
}

pub fn parse_bytes(name: &str, source: &[u8]) -> Result<Document, ParseError> {
    let mut reader = Reader::new(name, source);
    parse_document(&mut reader)
}

/// Read and parse a configuration file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Document, LoadError> {
    let path = path.as_ref();
    let mut reader = Reader::from_file(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_document(&mut reader)?)
}

// ============================================================================
// GRAMMAR TABLES
// ============================================================================

macro_rules! statement_rule {
    ($($rule:ident => $parser:ident as $variant:ident),* $(,)?) => {
        $(
            fn $rule(reader: &mut Reader) -> Outcome<Node> {
                $parser(reader).map(Node::$variant)
            }
        )*
    };
}

statement_rule!(
    variable_rule => parse_variable as Variable,
    gaps_rule => parse_gaps as Gaps,
    smart_gaps_rule => parse_smart_gaps as SmartGaps,
    for_window_rule => parse_for_window as ForWindow,
    mode_rule => parse_mode as Mode,
    block_rule => parse_block as Block,
    comment_rule => parse_comment as Comment,
    command_rule => parse_command as Command,
);

fn whitespace_rule(reader: &mut Reader) -> Outcome<Node> {
    match parse_whitespace(reader) {
        Some(whitespace) => Outcome::Match(Node::Whitespace(whitespace)),
        None => Outcome::WrongRule,
    }
}

/// Top-level statements, in the order they are tried. `command_rule` accepts
/// any line starting with a word, so it comes last.
const DOCUMENT_RULES: &[Rule<Node>] = &[
    variable_rule,
    gaps_rule,
    smart_gaps_rule,
    for_window_rule,
    mode_rule,
    block_rule,
    whitespace_rule,
    comment_rule,
    command_rule,
];

/// Statements allowed inside a `mode { ... }` block. Modes do not nest.
const MODE_RULES: &[Rule<Node>] = &[
    variable_rule,
    gaps_rule,
    smart_gaps_rule,
    for_window_rule,
    block_rule,
    whitespace_rule,
    comment_rule,
    command_rule,
];

/// Statements allowed inside a named block such as `bar { ... }`.
const BLOCK_RULES: &[Rule<Node>] = &[block_rule, whitespace_rule, comment_rule, command_rule];

// ============================================================================
// DOCUMENT
// ============================================================================

/// Parses statements until no rule applies. Anything left over is a syntax
/// error reported at the current position.
pub fn parse_document(reader: &mut Reader) -> Result<Document, ParseError> {
    let mut children = Vec::new();
    while let Some(child) = next_node(reader, DOCUMENT_RULES)? {
        children.push(child);
    }

    if !reader.at_eof() {
        let content = String::from_utf8_lossy(reader.peek_line()).into_owned();
        return Err(reader.report_here(ErrorKind::UnexpectedContent { content }));
    }

    Ok(Document {
        section: Section::new(0, reader.source().len()),
        children,
    })
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// Succeeds when only inline whitespace remains before the newline or end of
/// input. The whitespace itself is left for the caller's next rule.
fn expect_line_end(reader: &mut Reader) -> Result<(), ParseError> {
    let mut tx = reader.begin_tx();
    tx.skip_inline_whitespace();
    if tx.at_eof() || tx.peek() == b'\n' {
        return Ok(());
    }
    Err(tx.unexpected_byte("end of line", tx.peek()))
}

/// `set $name value`
pub fn parse_variable(reader: &mut Reader) -> Outcome<Variable> {
    let mut tx = reader.begin_tx();
    let Some(set) = parse_keyword(&mut tx, "set") else {
        return Outcome::WrongRule;
    };
    variable_body(tx, set).into()
}

fn variable_body(mut tx: Transaction<'_>, set: Exact) -> Result<Variable, ParseError> {
    require_whitespace(&mut tx)?;
    let name = parse_variable_name(&mut tx)?;
    require_whitespace(&mut tx)?;
    let value = parse_identifier(&mut tx)?;
    expect_line_end(&mut tx)?;
    Ok(Variable {
        section: tx.commit(),
        set,
        name,
        value,
    })
}

/// `gaps inner|outer <width>`
pub fn parse_gaps(reader: &mut Reader) -> Outcome<Gaps> {
    let mut tx = reader.begin_tx();
    let Some(gaps) = parse_keyword(&mut tx, "gaps") else {
        return Outcome::WrongRule;
    };
    gaps_body(tx, gaps).into()
}

fn gaps_body(mut tx: Transaction<'_>, gaps: Exact) -> Result<Gaps, ParseError> {
    require_whitespace(&mut tx)?;
    let target = parse_identifier(&mut tx)?;
    let kind = match target.value.as_str() {
        "inner" => GapKind::Inner,
        "outer" => GapKind::Outer,
        other => {
            let kind = ErrorKind::InvalidGapType {
                value: other.to_string(),
            };
            return Err(tx.report(kind, target.section));
        }
    };
    require_whitespace(&mut tx)?;
    let width = parse_number(&mut tx)?;
    expect_line_end(&mut tx)?;
    Ok(Gaps {
        section: tx.commit(),
        gaps,
        target,
        kind,
        width,
    })
}

/// `smart_gaps on|off`
pub fn parse_smart_gaps(reader: &mut Reader) -> Outcome<SmartGaps> {
    let mut tx = reader.begin_tx();
    let Some(smart_gaps) = parse_keyword(&mut tx, "smart_gaps") else {
        return Outcome::WrongRule;
    };
    smart_gaps_body(tx, smart_gaps).into()
}

fn smart_gaps_body(mut tx: Transaction<'_>, smart_gaps: Exact) -> Result<SmartGaps, ParseError> {
    require_whitespace(&mut tx)?;
    let value = parse_bool(&mut tx)?;
    expect_line_end(&mut tx)?;
    Ok(SmartGaps {
        section: tx.commit(),
        smart_gaps,
        value,
    })
}

/// `[key="value" ...]`
pub fn parse_conditions(reader: &mut Reader) -> Result<Conditions, ParseError> {
    let mut tx = reader.begin_tx();
    expect_byte(&mut tx, b'[')?;

    let mut conditions = Vec::new();
    loop {
        tx.skip_whitespace();
        if tx.at_eof() || tx.peek() == b']' {
            break;
        }
        let key = parse_criterion_key(&mut tx)?;
        tx.skip_whitespace();
        expect_byte(&mut tx, b'=')?;
        tx.skip_whitespace();
        let value = parse_string(&mut tx)?;
        conditions.push(Condition { key, value });
    }
    expect_byte(&mut tx, b']')?;

    Ok(Conditions {
        section: tx.commit(),
        conditions,
    })
}

/// `for_window [conditions] command`
pub fn parse_for_window(reader: &mut Reader) -> Outcome<ForWindow> {
    let mut tx = reader.begin_tx();
    let Some(for_window) = parse_keyword(&mut tx, "for_window") else {
        return Outcome::WrongRule;
    };
    for_window_body(tx, for_window).into()
}

fn for_window_body(mut tx: Transaction<'_>, for_window: Exact) -> Result<ForWindow, ParseError> {
    require_whitespace(&mut tx)?;
    let conditions = parse_conditions(&mut tx)?;
    tx.skip_whitespace();
    let command = match parse_command(&mut tx) {
        Outcome::Match(command) => command,
        Outcome::Failure(err) => return Err(err),
        Outcome::WrongRule => {
            let found = describe_byte(tx.peek());
            return Err(tx.report_here(ErrorKind::MissingCommand { found }));
        }
    };
    Ok(ForWindow {
        section: tx.commit(),
        for_window,
        conditions,
        command,
    })
}

/// A command line: a name starting with a letter or digit, then bare or
/// quoted arguments up to the end of the line.
pub fn parse_command(reader: &mut Reader) -> Outcome<Command> {
    if reader.at_eof() || !reader.peek().is_ascii_alphanumeric() {
        return Outcome::WrongRule;
    }
    command_body(reader).into()
}

fn command_body(reader: &mut Reader) -> Result<Command, ParseError> {
    let mut tx = reader.begin_tx();
    let name = parse_word(&mut tx);
    let mut arguments = Vec::new();
    loop {
        // Trailing whitespace stays outside the command.
        let mut next = tx.begin_tx();
        next.skip_inline_whitespace();
        if next.at_eof() || next.peek() == b'\n' {
            break;
        }
        let argument = if next.peek() == b'"' {
            Argument::Quoted(parse_string(&mut next)?)
        } else {
            Argument::Word(parse_word(&mut next))
        };
        next.commit();
        arguments.push(argument);
    }

    let section = tx.commit();
    let text = String::from_utf8_lossy(section.slice(reader.source())).into_owned();
    Ok(Command {
        section,
        name,
        arguments,
        text,
    })
}

/// `# ...` to the end of the line.
pub fn parse_comment(reader: &mut Reader) -> Outcome<Comment> {
    if reader.at_eof() || reader.peek() != b'#' {
        return Outcome::WrongRule;
    }
    let mut tx = reader.begin_tx();
    let line = String::from_utf8_lossy(tx.read_until(b"\n")).into_owned();
    Outcome::Match(Comment {
        section: tx.commit(),
        text: line.trim_start_matches('#').trim().to_string(),
    })
}

/// `mode "name" { statements }`. Without the opening brace this is not a
/// block, and the line is left to the command rule.
pub fn parse_mode(reader: &mut Reader) -> Outcome<Mode> {
    let mut tx = reader.begin_tx();
    let Some(mode) = parse_keyword(&mut tx, "mode") else {
        return Outcome::WrongRule;
    };
    tx.skip_inline_whitespace();
    if tx.peek() != b'"' {
        return Outcome::WrongRule;
    }
    let name = match parse_string(&mut tx) {
        Ok(name) => name,
        Err(err) => return Outcome::Failure(err),
    };
    tx.skip_inline_whitespace();
    if tx.peek() != b'{' {
        return Outcome::WrongRule;
    }
    tx.advance(1);
    mode_body(tx, mode, name).into()
}

fn mode_body(
    mut tx: Transaction<'_>,
    mode: Exact,
    name: StringLiteral,
) -> Result<Mode, ParseError> {
    let children = block_children(&mut tx, MODE_RULES)?;
    Ok(Mode {
        section: tx.commit(),
        mode,
        name,
        children,
    })
}

/// `name { statements }`, for sections like `bar` and `colors`. Without
/// the opening brace the line is left to the command rule.
pub fn parse_block(reader: &mut Reader) -> Outcome<Block> {
    if reader.at_eof() || !is_identifier_byte(reader.peek()) {
        return Outcome::WrongRule;
    }
    let mut tx = reader.begin_tx();
    let name = match parse_identifier(&mut tx) {
        Ok(name) => name,
        Err(err) => return Outcome::Failure(err),
    };
    tx.skip_inline_whitespace();
    if tx.peek() != b'{' {
        return Outcome::WrongRule;
    }
    tx.advance(1);
    block_body(tx, name).into()
}

fn block_body(mut tx: Transaction<'_>, name: Identifier) -> Result<Block, ParseError> {
    let children = block_children(&mut tx, BLOCK_RULES)?;
    Ok(Block {
        section: tx.commit(),
        name,
        children,
    })
}

/// Statements up to and including the closing `}`.
fn block_children(reader: &mut Reader, rules: &[Rule<Node>]) -> Result<Vec<Node>, ParseError> {
    let mut children = Vec::new();
    while let Some(child) = next_node(reader, rules)? {
        children.push(child);
    }
    expect_byte(reader, b'}')?;
    Ok(children)
}
