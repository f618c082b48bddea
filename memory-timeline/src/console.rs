//! Line-oriented terminal front end.
//!
//! Each input line is one command. Form and timeline commands become
//! controller events; `list`, `form` and `clock` read a state snapshot.

use crate::controller::ControllerHandle;
use crate::render;
use crate::timeline::{AppEvent, DraftField, PendingUpload};
use crate::view::Notice;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const HELP: &str = "\
Commands:
  list                       show the timeline
  add                        open (or close) the form for a new memory
  edit <id>                  open the form pre-filled from a memory
  set <field> <value>        field is date, title, note or photo
  file <path>                pick a local image to upload on save
  form                       show the form
  save                       save the form
  close                      close the form and discard it
  reload                     fetch all memories again
  clock                      show the time-together counter
  help                       show this help
  quit                       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Add,
    Edit(String),
    Set(DraftField, String),
    File(PathBuf),
    Form,
    Save,
    Close,
    Reload,
    Clock,
    Help,
    Quit,
}

impl ConsoleCommand {
    /// The controller event this command stands for, if it mutates state.
    pub fn to_event(&self) -> Option<AppEvent> {
        match self {
            ConsoleCommand::Add => Some(AppEvent::FormToggled),
            ConsoleCommand::Edit(id) => Some(AppEvent::EditRequested(id.clone())),
            ConsoleCommand::Set(field, value) => Some(AppEvent::FieldChanged(*field, value.clone())),
            ConsoleCommand::File(path) => Some(AppEvent::FileSelected(PendingUpload::new(path.clone()))),
            ConsoleCommand::Save => Some(AppEvent::SubmitRequested),
            ConsoleCommand::Close => Some(AppEvent::FormClosed),
            ConsoleCommand::Reload => Some(AppEvent::LoadRequested),
            ConsoleCommand::List
            | ConsoleCommand::Form
            | ConsoleCommand::Clock
            | ConsoleCommand::Help
            | ConsoleCommand::Quit => None,
        }
    }
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let cmd = match word.to_lowercase().as_str() {
        "list" | "ls" => ConsoleCommand::List,
        "add" | "new" => ConsoleCommand::Add,
        "edit" => {
            if rest.is_empty() {
                return Err("Usage: edit <id>".to_string());
            }
            ConsoleCommand::Edit(rest.trim_start_matches('#').to_string())
        }
        "set" => {
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let field: DraftField = name.parse()?;
            ConsoleCommand::Set(field, value.trim().to_string())
        }
        "file" => {
            if rest.is_empty() {
                return Err("Usage: file <path>".to_string());
            }
            ConsoleCommand::File(PathBuf::from(rest))
        }
        "form" => ConsoleCommand::Form,
        "save" => ConsoleCommand::Save,
        "close" => ConsoleCommand::Close,
        "reload" => ConsoleCommand::Reload,
        "clock" => ConsoleCommand::Clock,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(format!("Unknown command '{}', try `help`", other)),
    };
    Ok(Some(cmd))
}

/// Read commands from stdin until `quit` or end of input.
pub async fn run(handle: ControllerHandle) {
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("[CONSOLE] Failed to read input: {}", e);
                break;
            }
        };

        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(msg) => {
                println!("{}", render::render_notice(&Notice::failure(msg)));
                continue;
            }
        };

        if cmd == ConsoleCommand::Quit {
            break;
        }
        if let Some(event) = cmd.to_event() {
            handle.dispatch(event);
            continue;
        }

        let Some(state) = handle.snapshot().await else {
            log::warn!("[CONSOLE] Controller stopped, leaving");
            break;
        };
        match cmd {
            ConsoleCommand::List => println!("{}", render::render_timeline(&state.timeline)),
            ConsoleCommand::Form => println!("{}", render::render_form(state.form.as_ref())),
            ConsoleCommand::Clock => println!("{}", render::render_counter(&state.live_time)),
            _ => println!("{}", HELP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ConsoleCommand {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("list"), ConsoleCommand::List);
        assert_eq!(parse("  ADD "), ConsoleCommand::Add);
        assert_eq!(parse("save"), ConsoleCommand::Save);
        assert_eq!(parse("exit"), ConsoleCommand::Quit);
    }

    #[test]
    fn test_edit_accepts_hash_prefix() {
        assert_eq!(parse("edit #665f1c"), ConsoleCommand::Edit("665f1c".to_string()));
        assert!(parse_command("edit").is_err());
    }

    #[test]
    fn test_set_keeps_spaces_in_value() {
        assert_eq!(
            parse("set note We watched  the rain"),
            ConsoleCommand::Set(DraftField::Note, "We watched  the rain".to_string())
        );
        assert_eq!(
            parse("set year 2025-06-05"),
            ConsoleCommand::Set(DraftField::Date, "2025-06-05".to_string())
        );
        assert!(parse_command("set colour red").is_err());
    }

    #[test]
    fn test_file_path() {
        assert_eq!(
            parse("file /home/me/My Pictures/beach.jpg"),
            ConsoleCommand::File(PathBuf::from("/home/me/My Pictures/beach.jpg"))
        );
        assert!(parse_command("file").is_err());
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("dance").unwrap_err();
        assert!(err.contains("dance"));
    }

    #[test]
    fn test_events_for_mutating_commands() {
        assert!(matches!(parse("add").to_event(), Some(AppEvent::FormToggled)));
        assert!(matches!(parse("reload").to_event(), Some(AppEvent::LoadRequested)));
        assert!(matches!(
            parse("file a.png").to_event(),
            Some(AppEvent::FileSelected(u)) if u.file_name == "a.png"
        ));
        assert!(parse("list").to_event().is_none());
        assert!(parse("clock").to_event().is_none());
    }
}
