//! Interactive search shell
//!
//! Line syntax:
//! - `<text>` searches for a destination from the current origin
//! - `from <text> | to <text>` geocodes both ends
//! - `:locate` requests the device position again
//! - `:help` lists the commands
//! - `:quit` exits after confirmation

use domain::SearchQuery;

/// Parsed shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Run a search
    Search(SearchQuery),
    /// Re-acquire the origin
    Locate,
    /// Print usage
    Help,
    /// Leave the shell (after confirmation)
    Quit,
    /// Blank line
    Empty,
    /// Unrecognized `:` command
    Unknown(String),
}

pub const HELP: &str = "\
Commands:
  <place>                   route from your position to <place>
  from <place> | to <place> route between two typed places
  :locate                   look up your position again
  :help                     show this help
  :quit                     exit";

/// Parse one input line
pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    if line.is_empty() {
        return ShellCommand::Empty;
    }

    if let Some(command) = line.strip_prefix(':') {
        return match command.trim().to_lowercase().as_str() {
            "locate" | "l" => ShellCommand::Locate,
            "help" | "h" | "?" => ShellCommand::Help,
            "quit" | "q" | "exit" => ShellCommand::Quit,
            other => ShellCommand::Unknown(other.to_string()),
        };
    }

    ShellCommand::Search(parse_query(line))
}

fn parse_query(line: &str) -> SearchQuery {
    if let Some((from, to)) = line.split_once('|')
        && let Some(origin) = strip_keyword(from, "from")
        && let Some(destination) = strip_keyword(to, "to")
    {
        return SearchQuery::to(destination).from_origin(origin);
    }
    SearchQuery::to(line)
}

/// Text after a leading `keyword`; a bare keyword yields blank text
fn strip_keyword<'a>(part: &'a str, keyword: &str) -> Option<&'a str> {
    let part = part.trim();
    let (head, rest) = part.split_once(char::is_whitespace).unwrap_or((part, ""));
    head.eq_ignore_ascii_case(keyword).then(|| rest.trim())
}

/// Whether the answer to an exit prompt confirms it
pub fn confirms_exit(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
