//! `Co-authored-by:` trailers for the squash commit that ends a session.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

const SQUASH_MSG: &str = "SQUASH_MSG";

/// Distinct authors other than `finalizer_email`, shortest `Name <email>`
/// first. Authors of equal length keep the order they were first seen in.
pub fn aggregate<S: AsRef<str>>(authors: &[S], finalizer_email: &str) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for author in authors {
        let author = author.as_ref().trim();
        if author.is_empty() || email_of(author) == Some(finalizer_email) {
            continue;
        }
        if !result.iter().any(|a| a == author) {
            result.push(author.to_string());
        }
    }
    result.sort_by_key(String::len);
    result
}

/// The trailer block appended to the squash message.
pub fn trailer_block(coauthors: &[String]) -> String {
    let mut block = String::from("\n\n");
    block.push_str("# automatically added all co-authors from WIP commits\n");
    block.push_str("# add missing co-authors manually\n");
    for coauthor in coauthors {
        block.push_str(&format!("Co-authored-by: {coauthor}\n"));
    }
    block
}

/// Authors listed in a squash message written by `git merge --squash`.
pub fn parse_squash_authors(squash_msg: &str) -> Vec<String> {
    squash_msg
        .lines()
        .filter_map(|line| line.strip_prefix("Author:"))
        .map(|author| author.trim().to_string())
        .filter(|author| !author.is_empty())
        .collect()
}

/// Append co-author trailers to `<git_dir>/SQUASH_MSG`.
///
/// Returns the co-authors that were added. A missing squash message (the
/// wip commits were merged without squashing) is not an error.
pub fn append_to_squash_msg(git_dir: &Path, finalizer_email: &str) -> Result<Vec<String>> {
    let path = git_dir.join(SQUASH_MSG);
    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no squash message, skipping co-authors");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
    };

    let coauthors = aggregate(&parse_squash_authors(&contents), finalizer_email);
    if coauthors.is_empty() {
        return Ok(coauthors);
    }

    let mut file = OpenOptions::new()
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;
    file.write_all(trailer_block(&coauthors).as_bytes())
        .with_context(|| format!("appending co-authors to {}", path.display()))?;
    Ok(coauthors)
}

fn email_of(author: &str) -> Option<&str> {
    let start = author.rfind('<')?;
    let end = author[start..].find('>')? + start;
    Some(&author[start + 1..end])
}

#[cfg(test)]
mod tests;
