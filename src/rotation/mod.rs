//! Guessing who types next from the authors of the wip commits.
//!
//! The input is the author of every commit on the wip branch, newest
//! first. A *round* is the run of distinct other authors between two of
//! the current user's commits. The person who has waited longest in the
//! latest round is next, unless someone joined after that round and has
//! not had a turn yet.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prediction {
    /// `None` when there is nothing to infer.
    pub next: Option<String>,
    /// The last completed round, oldest first and ending with the current
    /// user. Empty when the latest round is still open.
    pub history: Vec<String>,
}

pub fn predict<S: AsRef<str>>(authors: &[S], me: &str) -> Prediction {
    let authors: Vec<&str> = authors.iter().map(|a| a.as_ref()).collect();

    // Skip my own latest commits.
    let mut idx = 0;
    while idx < authors.len() && authors[idx] == me {
        idx += 1;
    }

    let mut round: Vec<&str> = Vec::new();
    let mut closed = false;
    while idx < authors.len() {
        let author = authors[idx];
        idx += 1;
        if author == me {
            closed = true;
            break;
        }
        if !round.contains(&author) {
            round.push(author);
        }
    }

    let Some(&overdue) = round.last() else {
        return Prediction::default();
    };
    if !closed {
        return Prediction {
            next: Some(overdue.to_string()),
            history: Vec::new(),
        };
    }

    let history = round
        .iter()
        .rev()
        .copied()
        .chain(std::iter::once(me))
        .map(String::from)
        .collect();

    // Look past the closed round for people who joined later, but only as
    // far back as one round is long.
    let cap = round.len();
    let mut newcomers: Vec<&str> = Vec::new();
    while idx < authors.len() && newcomers.len() < cap {
        let author = authors[idx];
        idx += 1;
        if author == me {
            break;
        }
        if !round.contains(&author) && !newcomers.contains(&author) {
            newcomers.push(author);
        }
    }

    let next = newcomers.last().copied().unwrap_or(overdue);
    Prediction {
        next: Some(next.to_string()),
        history,
    }
}

#[cfg(test)]
mod tests;
