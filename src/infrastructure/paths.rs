//! Path helpers for configuration values.
//!
//! Configuration files name the catalog and trace file with `~`-relative
//! paths; these are resolved against `$HOME` here.

use std::path::{Path, PathBuf};

/// Expands a leading `~` against `$HOME`.
///
/// # Examples
///
/// ```
/// use dishlist::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/srv/catalog.json"), PathBuf::from("/srv/catalog.json"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

/// Expands a leading `~` against `home`.
///
/// `~user` forms are left alone, as is everything when `home` is unknown.
#[must_use]
pub fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Directory for files the CLI writes by default.
///
/// `$XDG_DATA_HOME/dishlist`, falling back to `~/.local/share/dishlist` and
/// finally to `./.dishlist`.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("dishlist");
    }
    home_dir().map_or_else(
        || PathBuf::from(".dishlist"),
        |home| home.join(".local").join("share").join("dishlist"),
    )
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_home_prefix() {
        let home = Path::new("/home/ada");
        assert_eq!(
            expand_tilde_with("~/dishes/catalog.json", Some(home)),
            PathBuf::from("/home/ada/dishes/catalog.json")
        );
        assert_eq!(expand_tilde_with("~", Some(home)), PathBuf::from("/home/ada"));
    }

    #[test]
    fn test_leaves_other_paths_alone() {
        let home = Path::new("/home/ada");
        assert_eq!(expand_tilde_with("/etc/x", Some(home)), PathBuf::from("/etc/x"));
        assert_eq!(expand_tilde_with("~bob/x", Some(home)), PathBuf::from("~bob/x"));
        assert_eq!(expand_tilde_with("~/x", None), PathBuf::from("~/x"));
    }
}
