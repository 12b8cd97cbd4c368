// tests/settings_tests.rs

use yabai3::settings::{BarSettings, Criterion, GapSettings, KeyBinding, WorkspaceAssignment};
use yabai3::{parse_file, parse_str, Settings};

fn settings(source: &str) -> Settings {
    let document = parse_str("test.conf", source).expect("parse should succeed");
    Settings::from_document(&document)
}

fn words(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn test_sample_fixture_settings() {
    let document = parse_file("tests/fixtures/sample.conf").expect("fixture should parse");
    let settings = Settings::from_document(&document);

    assert_eq!(
        settings.gaps,
        GapSettings {
            inner: Some(10),
            outer: Some(5)
        }
    );
    assert!(settings.smart_gaps);
    assert_eq!(settings.variables.len(), 2);
    assert_eq!(settings.variable("$term"), Some("alacritty"));

    assert_eq!(settings.window_rules.len(), 2);
    assert_eq!(
        settings.window_rules[0].criteria,
        [
            Criterion {
                key: "app".into(),
                value: "Finder".into()
            },
            Criterion {
                key: "title".into(),
                value: "Info".into()
            },
        ]
    );
    assert_eq!(settings.window_rules[1].command, "floating enable");

    assert_eq!(
        settings.bindings,
        [
            KeyBinding {
                keys: "$mod+Return".into(),
                commands: vec![words(&["exec", "$term"])],
            },
            KeyBinding {
                keys: "$mod+r".into(),
                commands: vec![words(&["mode", "resize"])],
            },
        ]
    );
    assert_eq!(
        settings.workspaces,
        [WorkspaceAssignment {
            workspace: "1".into(),
            outputs: words(&["HDMI-1", "eDP-1"]),
        }]
    );
    assert_eq!(settings.exec, ["nm-applet"]);
    assert_eq!(settings.exec_always, ["$HOME/.config/polybar/launch.sh"]);
    assert_eq!(
        settings.bar,
        Some(BarSettings {
            status_command: Some("i3status --config ~/.i3status.conf".into())
        })
    );
    assert_eq!(settings.commands, ["floating_modifier $mod"]);

    let resize = settings.mode("resize").expect("resize mode");
    assert_eq!(resize.bindings.len(), 2);
    assert_eq!(
        resize.bindings[1].commands,
        [words(&["mode", "default"]), words(&["focus", "left"])]
    );
    assert!(resize.commands.is_empty());
    assert!(settings.mode("default").is_none());
}

#[test]
fn test_later_statements_override_earlier() {
    let settings = settings("gaps inner 4\nset $a one\ngaps inner 8\nset $a two\nsmart_gaps on\nsmart_gaps off\n");
    assert_eq!(settings.gaps.inner, Some(8));
    assert_eq!(settings.gaps.outer, None);
    assert!(!settings.smart_gaps);
    assert_eq!(settings.variable("$a"), Some("two"));
    assert_eq!(settings.variables.len(), 2);
}

#[test]
fn test_mode_settings_do_not_leak_into_top_level() {
    let settings = settings("mode \"gap\" {\n    gaps outer 3\n}\n");
    assert_eq!(settings.gaps, GapSettings::default());
    assert_eq!(settings.mode("gap").map(|m| m.gaps.outer), Some(Some(3)));
}

#[test]
fn test_unrecognized_shapes_stay_as_commands() {
    let settings = settings("workspace 3 gaps inner 0\nexec --no-startup-id\nbindsym\nborder pixel 2\n");
    assert!(settings.workspaces.is_empty());
    assert!(settings.exec.is_empty());
    assert!(settings.bindings.is_empty());
    assert_eq!(
        settings.commands,
        [
            "workspace 3 gaps inner 0",
            "exec --no-startup-id",
            "bindsym",
            "border pixel 2"
        ]
    );
}

#[test]
fn test_bar_without_status_command_and_other_blocks() {
    let settings = settings("bar {\n    position top\n    colors {\n        background #000000\n    }\n}\n");
    assert_eq!(settings.bar, Some(BarSettings::default()));
    assert!(settings.commands.is_empty());
}
