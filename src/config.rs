//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--all`, `--log-file`)
//! 2. `--config <file>`
//! 3. `$DIRPANE_CONFIG` environment variable (path to config file)
//! 4. Project-local `.dirpane.toml` in the current working directory
//! 5. Global `~/.config/dirpane/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

// ── Section configs ──────────────────────────────────────────────────────────

/// General settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Starting directory (overridden by CLI positional arg).
    pub default_path: Option<String>,
    /// Include dotfiles in listings.
    pub show_hidden: Option<bool>,
    /// Color scheme: `"dark"` or `"light"`.
    pub theme: Option<String>,
}

/// Programs started from the tag line.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LauncherConfig {
    /// Terminal started by `Win`.
    pub terminal: Option<String>,
    /// Explorer started by `Xplor`.
    pub explorer: Option<String>,
}

/// Where activated files are sent.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ActivationConfig {
    /// The plumb executable.
    pub plumber: Option<String>,
    /// Source name attached to plumb messages.
    pub source: Option<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LogConfig {
    /// Log file path, or a directory to place the log file in.
    pub file: Option<String>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub launcher: LauncherConfig,
    pub activation: ActivationConfig,
    pub log: LogConfig,
}

// ── Default constants ────────────────────────────────────────────────────────

/// Name used for the window, plumb source, and config/log directories.
pub const APP_NAME: &str = "dirpane";
/// Default plumb executable.
pub const DEFAULT_PLUMBER: &str = "plumb";
/// Terminal used when `$PLAN9` is not set.
pub const FALLBACK_TERMINAL: &str = "x-terminal-emulator";

// ── Config file locator ──────────────────────────────────────────────────────

/// Return the list of candidate config file paths in priority order.
///
/// Does NOT include the CLI `--config` path; `load` applies it separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var("DIRPANE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".dirpane.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join("config.toml"));
    }

    paths
}

/// Try to read and parse a TOML config file. Returns `None` if the file
/// doesn't exist or can't be parsed (with a warning printed to stderr).
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return None,
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            eprintln!(
                "Warning: failed to parse config file {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Merge `other` on top of `self`: `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                default_path: other
                    .general
                    .default_path
                    .clone()
                    .or(self.general.default_path),
                show_hidden: other.general.show_hidden.or(self.general.show_hidden),
                theme: other.general.theme.clone().or(self.general.theme),
            },
            launcher: LauncherConfig {
                terminal: other.launcher.terminal.clone().or(self.launcher.terminal),
                explorer: other.launcher.explorer.clone().or(self.launcher.explorer),
            },
            activation: ActivationConfig {
                plumber: other.activation.plumber.clone().or(self.activation.plumber),
                source: other.activation.source.clone().or(self.activation.source),
            },
            log: LogConfig {
                file: other.log.file.clone().or(self.log.file),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Walk in reverse so that highest-priority (env var) overwrites lower.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    /// Whether dotfiles are listed at startup.
    pub fn show_hidden(&self) -> bool {
        self.general.show_hidden.unwrap_or(false)
    }

    /// Configured color scheme name, if any.
    pub fn theme(&self) -> Option<&str> {
        self.general.theme.as_deref()
    }

    /// Configured starting directory, if any.
    pub fn default_path(&self) -> Option<PathBuf> {
        self.general.default_path.as_ref().map(PathBuf::from)
    }

    /// Terminal program for `Win`: `$PLAN9/bin/win` when plan9port is
    /// installed, otherwise a generic terminal emulator.
    pub fn terminal(&self) -> PathBuf {
        if let Some(terminal) = &self.launcher.terminal {
            return PathBuf::from(terminal);
        }
        match std::env::var_os("PLAN9") {
            Some(plan9) => PathBuf::from(plan9).join("bin").join("win"),
            None => PathBuf::from(FALLBACK_TERMINAL),
        }
    }

    /// Explorer program for `Xplor`; defaults to this executable.
    pub fn explorer(&self) -> PathBuf {
        if let Some(explorer) = &self.launcher.explorer {
            return PathBuf::from(explorer);
        }
        std::env::current_exe().unwrap_or_else(|_| PathBuf::from(APP_NAME))
    }

    /// The plumb executable.
    pub fn plumber(&self) -> &str {
        self.activation.plumber.as_deref().unwrap_or(DEFAULT_PLUMBER)
    }

    /// Source name on plumb messages.
    pub fn plumb_source(&self) -> &str {
        self.activation.source.as_deref().unwrap_or(APP_NAME)
    }

    /// Configured log file location, if any.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.log.file.as_ref().map(PathBuf::from)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_values() {
        let cfg = AppConfig::default();
        assert!(!cfg.show_hidden());
        assert_eq!(cfg.default_path(), None);
        assert_eq!(cfg.plumber(), "plumb");
        assert_eq!(cfg.plumb_source(), "dirpane");
        assert_eq!(cfg.log_file(), None);
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml = r#"
[general]
default_path = "/srv"
show_hidden = true
theme = "light"

[launcher]
terminal = "/usr/bin/foot"
explorer = "/usr/local/bin/dirpane"

[activation]
plumber = "/opt/plan9/bin/plumb"
source = "explorer"

[log]
file = "/tmp/dirpane.log"
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.show_hidden());
        assert_eq!(cfg.default_path(), Some(PathBuf::from("/srv")));
        assert_eq!(cfg.theme(), Some("light"));
        assert_eq!(cfg.terminal(), PathBuf::from("/usr/bin/foot"));
        assert_eq!(cfg.explorer(), PathBuf::from("/usr/local/bin/dirpane"));
        assert_eq!(cfg.plumber(), "/opt/plan9/bin/plumb");
        assert_eq!(cfg.plumb_source(), "explorer");
        assert_eq!(cfg.log_file(), Some(PathBuf::from("/tmp/dirpane.log")));
    }

    #[test]
    fn test_toml_parsing_partial() {
        let toml = r#"
[general]
show_hidden = true
"#;
        let cfg: AppConfig = toml::from_str(toml).expect("parse failed");
        assert!(cfg.show_hidden());
        assert_eq!(cfg.plumber(), "plumb");
    }

    #[test]
    fn test_toml_parsing_empty() {
        let cfg: AppConfig = toml::from_str("").expect("parse failed");
        assert!(!cfg.show_hidden());
    }

    #[test]
    fn test_merge_overrides() {
        let base = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(false),
                default_path: Some("/home".into()),
                theme: None,
            },
            activation: ActivationConfig {
                plumber: Some("plumb".into()),
                source: Some("base".into()),
            },
            ..Default::default()
        };

        let over = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(true),
                ..Default::default()
            },
            activation: ActivationConfig {
                source: Some("over".into()),
                ..Default::default()
            },
            ..Default::default()
        };

        let merged = base.merge(&over);
        assert!(merged.show_hidden());
        assert_eq!(merged.default_path(), Some(PathBuf::from("/home")));
        assert_eq!(merged.plumber(), "plumb");
        assert_eq!(merged.plumb_source(), "over");
    }

    #[test]
    fn test_merge_none_does_not_clear_some() {
        let base = AppConfig {
            launcher: LauncherConfig {
                terminal: Some("xterm".into()),
                explorer: None,
            },
            ..Default::default()
        };
        let merged = base.merge(&AppConfig::default());
        assert_eq!(merged.terminal(), PathBuf::from("xterm"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("test-config.toml");
        let mut f = std::fs::File::create(&cfg_path).expect("create");
        writeln!(
            f,
            r#"
[general]
show_hidden = true

[activation]
source = "from-file"
"#
        )
        .expect("write");

        let cfg = load_file(&cfg_path).expect("load");
        assert!(cfg.show_hidden());
        assert_eq!(cfg.plumb_source(), "from-file");
        assert_eq!(cfg.plumber(), "plumb");
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_file(Path::new("/nonexistent/config.toml")).is_none());
    }

    #[test]
    fn test_load_invalid_toml_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("bad.toml");
        std::fs::write(&cfg_path, "this is { not valid toml").expect("write");
        assert!(load_file(&cfg_path).is_none());
    }

    #[test]
    fn test_load_with_cli_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg_path = dir.path().join("config.toml");
        std::fs::write(
            &cfg_path,
            r#"
[general]
show_hidden = false

[log]
file = "/var/log/dirpane.log"
"#,
        )
        .expect("write");

        let cli_overrides = AppConfig {
            general: GeneralConfig {
                show_hidden: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let cfg = AppConfig::load(Some(&cfg_path), Some(&cli_overrides));
        assert!(cfg.show_hidden());
        assert_eq!(cfg.log_file(), Some(PathBuf::from("/var/log/dirpane.log")));
    }
}
