//! Editors used while folding wip commits into the manual commits after
//! them. Git invokes `mob squash-wip --git-sequence-editor <todo>` and
//! `mob squash-wip --git-editor <message>` during the interactive rebase.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::Configuration;

/// Rewrite a rebase todo list: every pick following a wip pick is squashed
/// into it, or fixed up when only wip commits remain.
pub fn mark_post_wip_commits(todo: &str, config: &Configuration) -> String {
    let lines: Vec<&str> = todo.split('\n').collect();
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| mark_line(&lines, idx, config))
        .collect::<Vec<_>>()
        .join("\n")
}

fn mark_line(lines: &[&str], idx: usize, config: &Configuration) -> String {
    let line = lines[idx];
    let follows_wip = idx > 0 && is_wip_pick(lines[idx - 1], config);
    let Some(rest) = line.strip_prefix("pick ") else {
        return line.to_string();
    };
    if !follows_wip {
        return line.to_string();
    }
    let only_wip_left = lines[idx..]
        .iter()
        .all(|l| !is_pick(l) || is_wip_pick(l, config));
    if only_wip_left {
        format!("fixup {rest}")
    } else {
        format!("squash {rest}")
    }
}

fn is_pick(line: &str) -> bool {
    line.starts_with("pick ")
}

fn is_wip_pick(line: &str, config: &Configuration) -> bool {
    let Some(rest) = line.strip_prefix("pick ") else {
        return false;
    };
    let subject = rest.split_once(' ').map_or("", |(_, s)| s);
    let subject = subject.strip_prefix("# ").unwrap_or(subject);
    config.is_wip_commit_message(subject)
}

/// Comment out the wip messages in a combined squash commit message, so
/// only the manual commit messages remain.
pub fn comment_wip_commits(message: &str, config: &Configuration) -> String {
    let lines: Vec<&str> = message.split('\n').collect();
    let mut ignoring = false;
    let mut result = Vec::with_capacity(lines.len());
    for (idx, line) in lines.iter().enumerate() {
        if config.is_wip_commit_message(line) {
            ignoring = true;
        } else if line.is_empty() && next_line_is_comment(&lines, idx) {
            ignoring = false;
        }
        if ignoring {
            result.push(format!("# {line}"));
        } else {
            result.push(line.to_string());
        }
    }
    result.join("\n")
}

fn next_line_is_comment(lines: &[&str], idx: usize) -> bool {
    lines.get(idx + 1).is_some_and(|l| l.starts_with('#'))
}

/// Apply `edit` to the file git handed us, in place.
pub fn edit_file(path: &Path, edit: impl FnOnce(&str) -> String) -> Result<()> {
    let input =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    fs::write(path, edit(&input)).with_context(|| format!("writing {}", path.display()))
}
