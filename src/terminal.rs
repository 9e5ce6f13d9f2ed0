//! Line-oriented front end: stdin commands become page events, page changes
//! are printed as plain text.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::controller::{ClickTarget, CortexApp, UiEvent, UiMsg};
use crate::dom::markup::to_plain_text;
use crate::dom::render::{FILE_ITEM_CLASS, PLUGIN_TOGGLE_CLASS};
use crate::dom::{Change, ids};
use crate::error::startup::StartupError;
use crate::notify::Severity;

const HELP: &str = "\
commands:
  <text>                 send a chat message
  /model <id>            select a model
  /theme <id>            select a theme
  /run <language> <file> execute a source file
  /upload <file>         upload a file
  /files                 list files
  /open <name>           preview a file
  /plugins               list plugins
  /toggle <name>         enable or disable a plugin
  /snapshot              write the page snapshot now
  /help                  show this help
  /quit                  exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Say(String),
    Model(String),
    Theme(String),
    Run { language: String, path: PathBuf },
    Upload(PathBuf),
    Files,
    Open(String),
    Plugins,
    Toggle(String),
    Snapshot,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Some(Command::Say(line.to_string()));
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    let command = match (name, arg) {
        ("quit" | "exit", _) => Command::Quit,
        ("files", _) => Command::Files,
        ("plugins", _) => Command::Plugins,
        ("snapshot", _) => Command::Snapshot,
        ("model", m) if !m.is_empty() => Command::Model(m.to_string()),
        ("theme", t) if !t.is_empty() => Command::Theme(t.to_string()),
        ("upload", p) if !p.is_empty() => Command::Upload(PathBuf::from(p)),
        ("open", f) if !f.is_empty() => Command::Open(f.to_string()),
        ("toggle", p) if !p.is_empty() => Command::Toggle(p.to_string()),
        ("run", args) => match args.split_once(char::is_whitespace) {
            Some((language, path)) if !path.trim().is_empty() => Command::Run {
                language: language.to_string(),
                path: PathBuf::from(path.trim()),
            },
            _ => Command::Help,
        },
        _ => Command::Help,
    };
    Some(command)
}

/// Drive the controller until stdin closes, `/quit`, or Ctrl-C.
pub async fn run(mut app: CortexApp, snapshot: Option<PathBuf>) {
    spawn_input(app.sender());

    app.init();
    present(&mut app);

    while let Some(msg) = app.next_msg().await {
        match msg {
            UiMsg::Shutdown => break,
            UiMsg::Input(line) => match parse_command(&line) {
                Some(Command::Quit) => break,
                Some(Command::Help) => println!("{HELP}"),
                Some(Command::Snapshot) => match &snapshot {
                    Some(path) => match write_snapshot(&app, path).await {
                        Ok(()) => println!("snapshot written to {}", path.display()),
                        Err(e) => println!("{e}"),
                    },
                    None => println!("no snapshot path configured (use --snapshot)"),
                },
                Some(command) => apply(&mut app, command).await,
                None => {}
            },
            other => app.handle_msg(other),
        }

        present(&mut app);
        if let Some(path) = &snapshot {
            if let Err(e) = write_snapshot(&app, path).await {
                tracing::warn!(error = %e, "snapshot not written");
            }
        }
    }

    app.shutdown();
}

async fn apply(app: &mut CortexApp, command: Command) {
    match command {
        Command::Say(text) => {
            app.document_mut().set_value(ids::MESSAGE_INPUT, &text);
            app.dispatch(UiEvent::Submit { form: ids::CHAT_FORM.to_string() });
        }
        Command::Model(model) => app.dispatch(change(ids::MODEL_SELECT, model)),
        Command::Theme(theme) => app.dispatch(change(ids::THEME_SELECT, theme)),
        Command::Run { language, path } => match tokio::fs::read_to_string(&path).await {
            Ok(code) => {
                app.document_mut().set_value(ids::CODE_EDITOR, &code);
                app.document_mut().set_value(ids::LANGUAGE_SELECT, &language);
                app.dispatch(click(ids::EXECUTE_CODE, None));
            }
            Err(e) => {
                tracing::debug!(error = %e, path = %path.display(), "source file unreadable");
                app.show_notification(
                    &format!("Could not read {}", path.display()),
                    Severity::Error,
                );
            }
        },
        Command::Upload(path) => {
            app.dispatch(change(ids::FILE_INPUT, path.display().to_string()));
        }
        Command::Files => app.load_files(),
        Command::Open(name) => app.dispatch(click(
            ids::FILES_CONTAINER,
            Some(ClickTarget { class: FILE_ITEM_CLASS.to_string(), data: name }),
        )),
        Command::Plugins => app.load_plugins(),
        Command::Toggle(name) => app.dispatch(click(
            ids::PLUGINS_CONTAINER,
            Some(ClickTarget { class: PLUGIN_TOGGLE_CLASS.to_string(), data: name }),
        )),
        Command::Snapshot | Command::Help | Command::Quit => {}
    }
}

fn change(element: &str, value: String) -> UiEvent {
    UiEvent::Change { element: element.to_string(), value }
}

fn click(element: &str, target: Option<ClickTarget>) -> UiEvent {
    UiEvent::Click { element: element.to_string(), target }
}

fn spawn_input(tx: mpsc::UnboundedSender<UiMsg>) {
    let stdin_tx = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if stdin_tx.send(UiMsg::Input(line)).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stdin closed");
                    break;
                }
            }
        }
        let _ = stdin_tx.send(UiMsg::Shutdown);
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(UiMsg::Shutdown);
        }
    });
}

fn present(app: &mut CortexApp) {
    for change in app.document_mut().take_changes() {
        if let Some(text) = describe(&change) {
            println!("{text}");
        }
    }
}

fn describe(change: &Change) -> Option<String> {
    match change {
        Change::Appended { element, markup } if element == ids::CHAT_CONTAINER => {
            Some(format!("\n{}", to_plain_text(markup)))
        }
        Change::Appended { element, markup } | Change::Replaced { element, markup } => {
            Some(format!("[{element}]\n{}", to_plain_text(markup)))
        }
        Change::Notified(n) => Some(format!("({}) {}", n.severity.as_str(), n.message)),
        Change::StylesheetLinked(href) => {
            tracing::debug!(%href, "theme stylesheet linked");
            None
        }
        Change::Dismissed(_) => None,
    }
}

async fn write_snapshot(app: &CortexApp, path: &Path) -> Result<(), StartupError> {
    tokio::fs::write(path, app.document().to_html())
        .await
        .map_err(|source| StartupError::Snapshot {
            path: path.display().to_string(),
            source,
        })
}
