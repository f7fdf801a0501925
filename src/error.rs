use thiserror::Error;

use crate::git::VcsError;

/// Why a session command stopped.
///
/// Precondition failures are reported before anything is changed. `Vcs`
/// covers git failures that leave nothing sensible to continue with.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot start; clean working tree required")]
    UncommittedChanges,
    #[error("remote wip branch {0} is missing")]
    MissingRemoteWipBranch(String),
    #[error("remote branch {0} is missing")]
    MissingRemoteBranch(String),
    #[error("cannot start; unpushed changes on base branch must be pushed upstream")]
    UnpushedBaseCommits,
    #[error("cannot start; current working dir is an uncommitted subdir")]
    UncommittedSubdir,
    #[error("commit message required")]
    CommitMessageRequired,
    #[error("too many placeholders ({0}) in open command: {1}")]
    OpenCommandPlaceholders(usize, String),
    #[error(transparent)]
    Vcs(#[from] VcsError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
