//! Syntax module for yabai3 configuration files
//!
//! This module provides the syntax tree types produced by the parser. Every
//! node holds a [`Section`] by composition, so "which bytes does this span" is
//! answered the same way for every construct through [`Positioned`].

use serde::Serialize;

pub mod alternation;
pub mod literals;
pub mod parser;
pub mod reader;

pub use parser::{parse_bytes, parse_file, parse_str};

/// A byte range in the source: `start` plus `length`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Section {
    pub start: usize,
    pub length: usize,
}

impl Section {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Position of the first byte belonging to the section.
    pub fn pos(&self) -> usize {
        self.start
    }

    /// Position of the first byte immediately after the section.
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The bytes of `source` covered by this section.
    pub fn slice<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.start..self.end()]
    }
}

impl From<Section> for miette::SourceSpan {
    fn from(section: Section) -> Self {
        miette::SourceSpan::from(section.start..section.end())
    }
}

/// Uniform position addressing shared by every node.
pub trait Positioned {
    fn section(&self) -> Section;

    fn pos(&self) -> usize {
        self.section().pos()
    }

    fn end(&self) -> usize {
        self.section().end()
    }
}

macro_rules! positioned {
    ($($node:ty),* $(,)?) => {
        $(
            impl Positioned for $node {
                fn section(&self) -> Section {
                    self.section
                }
            }
        )*
    };
}

// ============================================================================
// LEAF NODES
// ============================================================================

/// A keyword matched verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exact {
    pub section: Section,
    pub value: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub section: Section,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Number {
    pub section: Section,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bool {
    pub section: Section,
    pub value: bool,
}

/// A double-quoted string. `value` holds the contents with the quotes and
/// escaping backslashes removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub section: Section,
    pub value: String,
}

/// A `$`-prefixed variable name, including the `$`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableName {
    pub section: Section,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Whitespace {
    pub section: Section,
}

/// A bare, whitespace-delimited word in a command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Word {
    pub section: Section,
    pub value: String,
}

// ============================================================================
// STATEMENTS
// ============================================================================

/// `set $name value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub section: Section,
    pub set: Exact,
    pub name: VariableName,
    pub value: Identifier,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    Inner,
    Outer,
}

/// `gaps inner|outer <width>`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gaps {
    pub section: Section,
    pub gaps: Exact,
    pub target: Identifier,
    pub kind: GapKind,
    pub width: Number,
}

/// `smart_gaps on|off`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmartGaps {
    pub section: Section,
    pub smart_gaps: Exact,
    pub value: Bool,
}

/// One `key="value"` window criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    pub key: Identifier,
    pub value: StringLiteral,
}

impl Positioned for Condition {
    fn section(&self) -> Section {
        Section::new(self.key.pos(), self.value.end() - self.key.pos())
    }
}

/// `[key="value" ...]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    pub section: Section,
    pub conditions: Vec<Condition>,
}

impl Conditions {
    /// Value of the first condition with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.conditions
            .iter()
            .find(|c| c.key.value == key)
            .map(|c| c.value.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Argument {
    Word(Word),
    Quoted(StringLiteral),
}

impl Argument {
    pub fn value(&self) -> &str {
        match self {
            Argument::Word(word) => &word.value,
            Argument::Quoted(string) => &string.value,
        }
    }
}

impl Positioned for Argument {
    fn section(&self) -> Section {
        match self {
            Argument::Word(word) => word.section,
            Argument::Quoted(string) => string.section,
        }
    }
}

/// Broad classification of a command by its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Border,
    Floating,
    Exec,
    ExecAlways,
    Bindsym,
    Workspace,
    StatusCommand,
    Other(String),
}

/// An opaque window-manager command: a name followed by arguments on one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    pub section: Section,
    pub name: Word,
    pub arguments: Vec<Argument>,
    /// The command exactly as written in the source.
    pub text: String,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self.name.value.as_str() {
            "border" => CommandKind::Border,
            "floating" => CommandKind::Floating,
            "exec" => CommandKind::Exec,
            "exec_always" => CommandKind::ExecAlways,
            "bindsym" => CommandKind::Bindsym,
            "workspace" => CommandKind::Workspace,
            "status_command" => CommandKind::StatusCommand,
            other => CommandKind::Other(other.to_string()),
        }
    }
}

/// `for_window [conditions] command`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForWindow {
    pub section: Section,
    pub for_window: Exact,
    pub conditions: Conditions,
    pub command: Command,
}

/// `# text` up to the end of the line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub section: Section,
    pub text: String,
}

/// `mode "name" { ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mode {
    pub section: Section,
    pub mode: Exact,
    pub name: StringLiteral,
    pub children: Vec<Node>,
}

/// `name { ... }`, such as `bar` or its nested `colors`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub section: Section,
    pub name: Identifier,
    pub children: Vec<Node>,
}

positioned!(
    Exact,
    Identifier,
    Number,
    Bool,
    StringLiteral,
    VariableName,
    Whitespace,
    Word,
    Variable,
    Gaps,
    SmartGaps,
    Conditions,
    Command,
    ForWindow,
    Comment,
    Mode,
    Block,
);

/// A statement inside a document or mode block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    Variable(Variable),
    Gaps(Gaps),
    SmartGaps(SmartGaps),
    ForWindow(ForWindow),
    Mode(Mode),
    Block(Block),
    Whitespace(Whitespace),
    Comment(Comment),
    Command(Command),
}

impl Node {
    /// Whitespace and comments carry no configuration.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Node::Whitespace(_) | Node::Comment(_))
    }
}

impl Positioned for Node {
    fn section(&self) -> Section {
        match self {
            Node::Variable(n) => n.section,
            Node::Gaps(n) => n.section,
            Node::SmartGaps(n) => n.section,
            Node::ForWindow(n) => n.section,
            Node::Mode(n) => n.section,
            Node::Block(n) => n.section,
            Node::Whitespace(n) => n.section,
            Node::Comment(n) => n.section,
            Node::Command(n) => n.section,
        }
    }
}

/// The root of a parse: every top-level statement in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub section: Section,
    pub children: Vec<Node>,
}

impl Document {
    /// Children that are not whitespace or comments.
    pub fn statements(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|node| !node.is_trivia())
    }
}

positioned!(Document);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_addresses_bytes() {
        let section = Section::new(4, 3);
        assert_eq!(section.pos(), 4);
        assert_eq!(section.end(), 7);
        assert_eq!(section.slice(b"set $mod mod4"), b"$mo");
        assert!(Section::new(2, 0).is_empty());
    }

    #[test]
    fn condition_spans_key_through_value() {
        let condition = Condition {
            key: Identifier {
                section: Section::new(1, 3),
                value: "app".into(),
            },
            value: StringLiteral {
                section: Section::new(5, 8),
                value: "Finder".into(),
            },
        };
        assert_eq!(condition.section(), Section::new(1, 12));
    }

    #[test]
    fn command_kind_classifies_name() {
        let command = Command {
            section: Section::new(0, 6),
            name: Word {
                section: Section::new(0, 6),
                value: "border".into(),
            },
            arguments: vec![],
            text: "border".into(),
        };
        assert_eq!(command.kind(), CommandKind::Border);
    }
}
