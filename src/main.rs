mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod host;
mod logging;
mod projection;
mod session;
mod theme;
mod tui;
mod ui;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use tracing::info;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig};
use crate::error::AppError;
use crate::event::{Event, EventHandler};
use crate::host::plumb::{CommandLauncher, PlumbSink};
use crate::host::scratch::ScratchBuffer;
use crate::session::{Session, SessionOptions};
use crate::tui::{install_panic_hook, Tui};

/// Browse a directory tree as an indented text buffer.
#[derive(Parser, Debug)]
#[command(name = "dirpane", version, about)]
struct Cli {
    /// Root directory to display (defaults to the current directory)
    path: Option<PathBuf>,

    /// Show dotfiles
    #[arg(short = 'a', long = "all")]
    all: bool,

    /// Config file to load on top of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file path, or a directory to write the log into
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Config values set on the command line.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                show_hidden: self.all.then_some(true),
                ..Default::default()
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().into_owned()),
            },
            ..Default::default()
        }
    }
}

/// Canonical form of the requested root, which must be a directory.
fn resolve_root(path: &Path) -> error::Result<PathBuf> {
    let root = path
        .canonicalize()
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", path.display())))?;
    if !root.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    Ok(root)
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let requested = cli
        .path
        .clone()
        .or_else(|| config.default_path())
        .unwrap_or_else(|| PathBuf::from("."));
    let root = resolve_root(&requested)?;

    let log = logging::init(config.log_file())?;
    info!(root = %root.display(), log = %log.log_file.display(), "starting");

    let mut session = Session::new(
        ScratchBuffer::new(),
        &root,
        SessionOptions {
            show_hidden: config.show_hidden(),
            terminal: config.terminal(),
            explorer: config.explorer(),
        },
        Box::new(PlumbSink::new(config.plumber(), config.plumb_source())),
        Box::new(CommandLauncher),
    );
    session.refresh()?;

    install_panic_hook();

    let mut tui = Tui::new()?;
    let mut app = App::new(session, theme::resolve_theme(config.theme()));
    app.select_first();
    let mut events = EventHandler::new(Duration::from_millis(250));

    loop {
        tui.terminal_mut().draw(|frame| {
            ui::render(&mut app, frame);
        })?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    info!("exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn root_must_exist() {
        let err = resolve_root(Path::new("/nonexistent/dirpane-root")).unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap();
        let err = resolve_root(&file).unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
    }

    #[test]
    fn root_is_canonicalized() {
        let dir = TempDir::new().unwrap();
        let dotted = dir.path().join(".");
        assert_eq!(
            resolve_root(&dotted).unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn all_flag_overrides_show_hidden() {
        let cli = Cli::parse_from(["dirpane", "-a", "/srv"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.general.show_hidden, Some(true));
        assert_eq!(cli.path, Some(PathBuf::from("/srv")));

        let cli = Cli::parse_from(["dirpane"]);
        assert_eq!(cli.overrides().general.show_hidden, None);
    }

    #[test]
    fn log_file_flag_is_forwarded() {
        let cli = Cli::parse_from(["dirpane", "--log-file", "/tmp/d.log"]);
        assert_eq!(
            cli.overrides().log_file(),
            Some(PathBuf::from("/tmp/d.log"))
        );
    }
}
