//! Shared CLI helpers — banner, status marks, path display.

use std::path::{Path, PathBuf};

use colored::Colorize;

/// Print the banner shown by every command.
pub fn print_banner(subtitle: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!(
        "{}  v{}  {}",
        "💬 slackgpt".cyan().bold(),
        version.dimmed(),
        subtitle
    );
    println!();
}

/// `✓ <detail>` when `ok`, a dimmed "not configured" otherwise.
pub fn status_mark(ok: bool, detail: &str) -> String {
    if ok {
        format!("{} {}", "✓".green(), detail)
    } else {
        format!("{}", "· not configured".dimmed())
    }
}

/// Show `path` with the home directory collapsed to `~`.
pub fn display_path(path: &Path) -> String {
    collapse_home(path, dirs_next::home_dir())
}

fn collapse_home(path: &Path, home: Option<PathBuf>) -> String {
    match home.and_then(|h| path.strip_prefix(&h).ok().map(Path::to_path_buf)) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_home_inside() {
        let home = PathBuf::from("/home/ada");
        let shown = collapse_home(Path::new("/home/ada/.slackgpt/config.json"), Some(home));
        assert_eq!(shown, "~/.slackgpt/config.json");
    }

    #[test]
    fn collapse_home_exact() {
        let home = PathBuf::from("/home/ada");
        assert_eq!(collapse_home(Path::new("/home/ada"), Some(home)), "~");
    }

    #[test]
    fn collapse_home_outside() {
        let home = PathBuf::from("/home/ada");
        assert_eq!(
            collapse_home(Path::new("/etc/slackgpt.json"), Some(home)),
            "/etc/slackgpt.json"
        );
        assert_eq!(collapse_home(Path::new("/tmp/x"), None), "/tmp/x");
    }

    #[test]
    fn status_mark_variants() {
        assert!(status_mark(true, "(key set)").contains("(key set)"));
        assert!(status_mark(false, "(key set)").contains("not configured"));
    }
}
