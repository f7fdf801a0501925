//! Reopening the file the previous typist was working on.

use crate::error::SessionError;

const LAST_FILE_MARKER: &str = "lastFile:";
const SPACE_PLACEHOLDER: &str = "&spc&";

/// Why a wip commit message names no usable file.
#[derive(Debug, PartialEq, Eq)]
pub enum LastFile {
    Found(String),
    /// The commit message has no `lastFile:` line.
    Missing,
    /// The marker appears more than once.
    Ambiguous,
    /// The marker is there but names nothing.
    Empty,
}

/// The `lastFile:` line written into wip commit bodies.
pub fn last_file_trailer(path: &str) -> String {
    format!("\n\n{LAST_FILE_MARKER}{path}")
}

pub fn last_file(commit_message: &str) -> LastFile {
    let mut parts = commit_message.split(LAST_FILE_MARKER);
    parts.next();
    let Some(rest) = parts.next() else {
        return LastFile::Missing;
    };
    if parts.next().is_some() {
        return LastFile::Ambiguous;
    }
    let line = rest.lines().next().unwrap_or("").trim();
    let file = line
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(line);
    if file.is_empty() {
        LastFile::Empty
    } else {
        LastFile::Found(file.to_string())
    }
}

/// Program and arguments for opening `path` with `open_command`.
///
/// `open_command` may hold one `%s` for the path; without one the path is
/// appended. Spaces inside the path survive the whitespace split.
pub fn command_for(open_command: &str, path: &str) -> Result<Option<(String, Vec<String>)>, SessionError> {
    if open_command.trim().is_empty() {
        return Ok(None);
    }
    let escaped = path.replace(' ', SPACE_PLACEHOLDER);
    let placeholders = open_command.matches("%s").count();
    let command = match placeholders {
        0 => format!("{open_command} {escaped}"),
        1 => open_command.replace("%s", &escaped),
        n => return Err(SessionError::OpenCommandPlaceholders(n, open_command.to_string())),
    };
    let mut parts = command
        .split(' ')
        .filter(|p| !p.is_empty())
        .map(|p| p.replace(SPACE_PLACEHOLDER, " "));
    let Some(program) = parts.next() else {
        return Ok(None);
    };
    Ok(Some((program, parts.collect())))
}
