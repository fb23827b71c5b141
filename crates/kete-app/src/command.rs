//! Parsing of terminal input lines.

/// What the user asked for on one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text to send as a query.
    Submit(String),
    /// Dismiss the order modal.
    Close,
    /// Confirm the order in the modal.
    Confirm,
    /// List the displayed results.
    Results,
    /// Print the transcript.
    History,
    Help,
    Quit,
    Unknown(String),
}

/// Interpret a line of input. Lines starting with `/` are commands,
/// everything else is a query.
pub fn parse(line: &str) -> Command {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return Command::Submit(line.to_string());
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "/close" | "/dismiss" => Command::Close,
        "/confirm" => Command::Confirm,
        "/results" => Command::Results,
        "/history" => Command::History,
        "/help" | "/?" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

pub const HELP: &str = "\
Type a question to search the collection.
  /close    dismiss the order dialog
  /confirm  confirm the order shown in the dialog
  /results  list the displayed results
  /history  print the conversation so far
  /quit     leave";
