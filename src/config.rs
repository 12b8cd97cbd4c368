//! Locating the configuration file when none is given explicitly.

use std::env;
use std::path::PathBuf;

use crate::errors::LoadError;

const CONFIG_SUFFIX: &str = "i3/config";

/// Candidate paths in search order: `$XDG_CONFIG_HOME/i3/config`, then
/// `$HOME/.config/i3/config`.
pub fn config_candidates() -> Vec<PathBuf> {
    candidates_from(env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME"))
}

fn candidates_from(
    xdg_config_home: Option<std::ffi::OsString>,
    home: Option<std::ffi::OsString>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = xdg_config_home.filter(|dir| !dir.is_empty()) {
        candidates.push(PathBuf::from(dir).join(CONFIG_SUFFIX));
    }
    if let Some(home) = home.filter(|home| !home.is_empty()) {
        let path = PathBuf::from(home).join(".config").join(CONFIG_SUFFIX);
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    }
    candidates
}

/// The first candidate that exists. Missing candidates are skipped.
pub fn discover_config() -> Result<PathBuf, LoadError> {
    first_existing(config_candidates())
}

fn first_existing(candidates: Vec<PathBuf>) -> Result<PathBuf, LoadError> {
    match candidates.iter().find(|path| path.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(LoadError::NotFound {
            searched: candidates,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_config_home_is_searched_first() {
        let candidates = candidates_from(Some("/xdg".into()), Some("/home/me".into()));
        assert_eq!(
            candidates,
            [
                PathBuf::from("/xdg/i3/config"),
                PathBuf::from("/home/me/.config/i3/config"),
            ]
        );
    }

    #[test]
    fn duplicate_and_empty_locations_are_skipped() {
        let candidates = candidates_from(Some("/home/me/.config".into()), Some("/home/me".into()));
        assert_eq!(candidates, [PathBuf::from("/home/me/.config/i3/config")]);
        assert!(candidates_from(Some("".into()), None).is_empty());
    }

    #[test]
    fn missing_candidates_report_not_found() {
        let searched = vec![PathBuf::from("/definitely/not/here/i3/config")];
        let err = first_existing(searched.clone()).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { searched: s } if s == searched));
    }
}
