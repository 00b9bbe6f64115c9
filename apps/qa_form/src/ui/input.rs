use std::path::PathBuf;

use crate::controller::reducer::UserAction;

pub const HELP_TEXT: &str = "\
Commands:
  ask [question]     set the question (optional) and submit it
  question <text>    set the question without submitting
  keyword [text]     set or clear the keyword hint
  select <pdf>       select an uploaded PDF by name
  file [path]        choose or clear the file to upload
  upload             upload the chosen file
  refresh            reload the PDF list
  show               print the form
  help               print this help
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    Actions(Vec<UserAction>),
    Show,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_line(line: &str) -> InputCommand {
    let line = line.trim();
    if line.is_empty() {
        return InputCommand::Empty;
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "ask" if rest.is_empty() => InputCommand::Actions(vec![UserAction::Submit]),
        "ask" => InputCommand::Actions(vec![
            UserAction::SetQuestion(rest.to_string()),
            UserAction::Submit,
        ]),
        "question" => InputCommand::Actions(vec![UserAction::SetQuestion(rest.to_string())]),
        "keyword" => InputCommand::Actions(vec![UserAction::SetKeyword(rest.to_string())]),
        "select" if rest.is_empty() => InputCommand::Unknown("usage: select <pdf name>".into()),
        "select" => InputCommand::Actions(vec![UserAction::SelectDocument(rest.to_string())]),
        "file" if rest.is_empty() => InputCommand::Actions(vec![UserAction::ChooseFile(None)]),
        "file" => InputCommand::Actions(vec![UserAction::ChooseFile(Some(PathBuf::from(rest)))]),
        "upload" => InputCommand::Actions(vec![UserAction::Upload]),
        "refresh" => InputCommand::Actions(vec![UserAction::Refresh]),
        "show" => InputCommand::Show,
        "help" | "?" => InputCommand::Help,
        "quit" | "exit" => InputCommand::Quit,
        other => InputCommand::Unknown(format!("unknown command '{other}'; type 'help'")),
    }
}
