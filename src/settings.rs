//! Settings extraction.
//!
//! Walks a parsed [`Document`] and collects what a window manager needs from
//! it: gap sizes, the smart-gaps flag, window rules, variable and key
//! bindings, workspace outputs, programs to exec, the bar's status command,
//! leftover commands, and named modes. Nothing is executed and `$name`
//! tokens are left exactly as written.

use serde::Serialize;

use crate::syntax::{Argument, Command, CommandKind, Document, ForWindow, GapKind, Node};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GapSettings {
    pub inner: Option<u32>,
    pub outer: Option<u32>,
}

/// A single `key="value"` match criterion of a window rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Criterion {
    pub key: String,
    pub value: String,
}

/// A `for_window` rule reduced to its criteria and command text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowRule {
    pub criteria: Vec<Criterion>,
    pub command: String,
}

impl From<&ForWindow> for WindowRule {
    fn from(rule: &ForWindow) -> Self {
        let criteria = rule
            .conditions
            .conditions
            .iter()
            .map(|condition| Criterion {
                key: condition.key.value.clone(),
                value: condition.value.value.clone(),
            })
            .collect();
        Self {
            criteria,
            command: rule.command.text.clone(),
        }
    }
}

/// A `set $name value` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableBinding {
    pub name: String,
    pub value: String,
}

/// A `bindsym`: the key combination and the commands it runs. Commands are
/// split at `;`, each one a list of its words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyBinding {
    pub keys: String,
    pub commands: Vec<Vec<String>>,
}

impl KeyBinding {
    fn from_arguments(arguments: &[Argument]) -> Option<Self> {
        let (keys, rest) = arguments.split_first()?;
        Some(Self {
            keys: keys.value().to_string(),
            commands: split_commands(rest),
        })
    }
}

/// `workspace <name> output <output>...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceAssignment {
    pub workspace: String,
    pub outputs: Vec<String>,
}

impl WorkspaceAssignment {
    fn from_arguments(arguments: &[Argument]) -> Option<Self> {
        match arguments {
            [workspace, keyword, outputs @ ..]
                if keyword.value() == "output" && !outputs.is_empty() =>
            {
                Some(Self {
                    workspace: workspace.value().to_string(),
                    outputs: outputs.iter().map(|o| o.value().to_string()).collect(),
                })
            }
            _ => None,
        }
    }
}

/// Settings from a `bar { ... }` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BarSettings {
    pub status_command: Option<String>,
}

impl BarSettings {
    fn from_nodes(nodes: &[Node]) -> Self {
        let mut bar = BarSettings::default();
        for node in nodes {
            if let Node::Command(command) = node {
                if command.kind() == CommandKind::StatusCommand {
                    bar.status_command = Some(join_values(&command.arguments));
                }
            }
        }
        bar
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeSettings {
    pub name: String,
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Settings {
    pub gaps: GapSettings,
    pub smart_gaps: bool,
    pub window_rules: Vec<WindowRule>,
    pub variables: Vec<VariableBinding>,
    pub bindings: Vec<KeyBinding>,
    pub workspaces: Vec<WorkspaceAssignment>,
    pub exec: Vec<String>,
    pub exec_always: Vec<String>,
    pub bar: Option<BarSettings>,
    /// Commands not captured by any field above, as written.
    pub commands: Vec<String>,
    pub modes: Vec<ModeSettings>,
}

impl Settings {
    pub fn from_document(document: &Document) -> Self {
        Self::from_nodes(&document.children)
    }

    /// Later statements override earlier ones for gaps, smart gaps and the
    /// bar; lists keep source order.
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut settings = Settings::default();
        for node in nodes {
            match node {
                Node::Variable(variable) => settings.variables.push(VariableBinding {
                    name: variable.name.value.clone(),
                    value: variable.value.value.clone(),
                }),
                Node::Gaps(gaps) => {
                    let width = gap_width(gaps.width.value);
                    match gaps.kind {
                        GapKind::Inner => settings.gaps.inner = Some(width),
                        GapKind::Outer => settings.gaps.outer = Some(width),
                    }
                }
                Node::SmartGaps(smart) => settings.smart_gaps = smart.value.value,
                Node::ForWindow(rule) => settings.window_rules.push(WindowRule::from(rule)),
                Node::Mode(mode) => settings.modes.push(ModeSettings {
                    name: mode.name.value.clone(),
                    settings: Settings::from_nodes(&mode.children),
                }),
                Node::Block(block) if block.name.value == "bar" => {
                    settings.bar = Some(BarSettings::from_nodes(&block.children));
                }
                Node::Command(command) => settings.add_command(command),
                Node::Block(_) | Node::Whitespace(_) | Node::Comment(_) => {}
            }
        }
        settings
    }

    fn add_command(&mut self, command: &Command) {
        let arguments = command.arguments.as_slice();
        match command.kind() {
            CommandKind::Bindsym => {
                if let Some(binding) = KeyBinding::from_arguments(arguments) {
                    self.bindings.push(binding);
                    return;
                }
            }
            CommandKind::Workspace => {
                if let Some(assignment) = WorkspaceAssignment::from_arguments(arguments) {
                    self.workspaces.push(assignment);
                    return;
                }
            }
            CommandKind::Exec => {
                if let Some(program) = exec_program(arguments) {
                    self.exec.push(program);
                    return;
                }
            }
            CommandKind::ExecAlways => {
                if let Some(program) = exec_program(arguments) {
                    self.exec_always.push(program);
                    return;
                }
            }
            _ => {}
        }
        self.commands.push(command.text.clone());
    }

    /// The value bound to `name` by the last `set` for it.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .rev()
            .find(|binding| binding.name == name)
            .map(|binding| binding.value.as_str())
    }

    pub fn mode(&self, name: &str) -> Option<&Settings> {
        self.modes
            .iter()
            .find(|mode| mode.name == name)
            .map(|mode| &mode.settings)
    }
}

/// Splits bindsym arguments into commands at `;`, whether it stands alone or
/// ends a word. Quoted arguments are never split.
fn split_commands(arguments: &[Argument]) -> Vec<Vec<String>> {
    let mut commands = vec![Vec::new()];
    for argument in arguments {
        match argument {
            Argument::Quoted(string) => push_word(&mut commands, &string.value),
            Argument::Word(word) => {
                for (i, piece) in word.value.split(';').enumerate() {
                    if i > 0 {
                        commands.push(Vec::new());
                    }
                    if !piece.is_empty() {
                        push_word(&mut commands, piece);
                    }
                }
            }
        }
    }
    commands.retain(|command| !command.is_empty());
    commands
}

fn push_word(commands: &mut [Vec<String>], word: &str) {
    if let Some(current) = commands.last_mut() {
        current.push(word.to_string());
    }
}

/// The program an `exec` line runs: its arguments after any leading `--`
/// flags such as `--no-startup-id`.
fn exec_program(arguments: &[Argument]) -> Option<String> {
    let start = arguments
        .iter()
        .position(|argument| !matches!(argument, Argument::Word(w) if w.value.starts_with("--")))?;
    Some(join_values(&arguments[start..]))
}

fn join_values(arguments: &[Argument]) -> String {
    arguments
        .iter()
        .map(Argument::value)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Widths are rounded to whole pixels. Numbers are always finite, and widths
/// beyond `u32::MAX` saturate to it.
fn gap_width(value: f64) -> u32 {
    value.round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_str;

    #[test]
    fn gap_width_rounds_to_pixels() {
        assert_eq!(gap_width(10.0), 10);
        assert_eq!(gap_width(2.5), 3);
        assert_eq!(gap_width(0.4), 0);
    }

    #[test]
    fn huge_widths_saturate() {
        assert_eq!(gap_width(1e12), u32::MAX);
    }

    #[test]
    fn empty_document_has_default_settings() {
        assert_eq!(Settings::from_nodes(&[]), Settings::default());
    }

    fn arguments(line: &str) -> Vec<Argument> {
        let document = parse_str("test", line).unwrap();
        match &document.children[0] {
            Node::Command(command) => command.arguments.clone(),
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn commands_split_at_semicolons() {
        let args = arguments("bindsym x resize grow; mode \"a;b\" ; focus left;");
        assert_eq!(
            split_commands(&args[1..]),
            [vec!["resize", "grow"], vec!["mode", "a;b"], vec!["focus", "left"]]
        );
    }

    #[test]
    fn exec_program_skips_leading_flags() {
        let args = arguments("exec --no-startup-id firefox --new-window");
        assert_eq!(exec_program(&args).as_deref(), Some("firefox --new-window"));
        let args = arguments("exec --no-startup-id");
        assert_eq!(exec_program(&args), None);
    }

    #[test]
    fn workspace_needs_output_keyword() {
        let args = arguments("workspace 2 output HDMI-1 eDP-1");
        let assignment = WorkspaceAssignment::from_arguments(&args);
        assert_eq!(
            assignment,
            Some(WorkspaceAssignment {
                workspace: "2".into(),
                outputs: vec!["HDMI-1".into(), "eDP-1".into()],
            })
        );
        let args = arguments("workspace 2 gaps inner 0");
        assert_eq!(WorkspaceAssignment::from_arguments(&args), None);
    }
}
