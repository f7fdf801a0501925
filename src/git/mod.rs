//! Access to the repository.
//!
//! Queries go through `git2` on a freshly opened repository each time, so
//! they always see what the previous `git` subprocess left behind.
//! Anything that touches the network or rewrites the working tree runs the
//! `git` binary, the same way a user would.

use regex::Regex;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::LazyLock;
use thiserror::Error;

use crate::branch::Branch;
use crate::say;

pub const MINIMUM_VERSION: GitVersion = GitVersion {
    major: 2,
    minor: 13,
    patch: 0,
};

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed ({status}): {}", .output.trim())]
    Exit {
        command: String,
        output: String,
        status: ExitStatus,
    },
    #[error("{action}: {source}")]
    Repository {
        action: String,
        #[source]
        source: git2::Error,
    },
}

impl VcsError {
    /// Captured output of a failed command, empty for other failures.
    pub fn output(&self) -> &str {
        match self {
            VcsError::Exit { output, .. } => output,
            _ => "",
        }
    }
}

fn repo_err(action: impl Into<String>) -> impl FnOnce(git2::Error) -> VcsError {
    let action = action.into();
    move |source| VcsError::Repository { action, source }
}

/// A commit author as recorded in the commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// Everything the session commands need from version control.
///
/// Revision arguments accept anything `git rev-parse` does, e.g.
/// `refs/heads/main` or `origin/mob/main`.
pub trait Vcs {
    fn current_branch(&self) -> Result<Branch, VcsError>;
    fn local_branches(&self) -> Result<Vec<String>, VcsError>;
    /// Remote-tracking branches as `<remote>/<name>`.
    fn remote_branches(&self) -> Result<Vec<String>, VcsError>;
    /// Untracked files count; ignored files do not.
    fn has_uncommitted_changes(&self) -> Result<bool, VcsError>;
    /// Paths added or modified in the index.
    fn staged_files(&self) -> Result<Vec<String>, VcsError>;
    fn untracked_files(&self) -> Result<Vec<String>, VcsError>;
    /// Object id a reference points at, `None` if it does not exist.
    fn ref_target(&self, refname: &str) -> Result<Option<String>, VcsError>;
    /// Number of commits reachable from `local` but not from `upstream`.
    fn ahead_count(&self, local: &str, upstream: &str) -> Result<usize, VcsError>;
    /// Whether `ancestor` is `successor` or one of its ancestors.
    fn is_ancestor(&self, ancestor: &str, successor: &str) -> Result<bool, VcsError>;
    /// Authors of the commits in `since..until`, newest first.
    fn commit_authors(&self, since: &str, until: &str) -> Result<Vec<Author>, VcsError>;
    fn last_commit_message(&self) -> Result<Option<String>, VcsError>;
    fn user_name(&self) -> Option<String>;
    fn user_email(&self) -> Result<String, VcsError>;
    fn root_dir(&self) -> &Path;
    fn git_dir(&self) -> Result<PathBuf, VcsError>;

    /// Run a git command with extra environment, echoing it to the user.
    fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Result<String, VcsError>;
    /// Run a git command without echoing it; returns trimmed output.
    fn silent(&self, args: &[&str]) -> Result<String, VcsError>;

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        self.run_with_env(args, &[])
    }
}

/// The repository containing the working directory.
///
/// Commands run in the directory the user invoked us from.
pub struct Git {
    root: PathBuf,
    cwd: PathBuf,
}

impl Git {
    pub fn discover(cwd: &Path) -> Result<Self, VcsError> {
        let repo = git2::Repository::discover(cwd)
            .map_err(repo_err(format!("finding git repo from {}", cwd.display())))?;
        let root = repo
            .workdir()
            .ok_or_else(|| VcsError::Repository {
                action: "opening repository".into(),
                source: git2::Error::from_str("repository is bare, no working directory"),
            })?
            .to_path_buf();
        Ok(Self {
            root,
            cwd: cwd.to_path_buf(),
        })
    }

    /// Output of `git --version`, `None` if git is not on the PATH.
    pub fn version() -> Option<String> {
        let output = Command::new("git").arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn has_commits(&self) -> Result<bool, VcsError> {
        let repo = self.repo()?;
        Ok(repo.head().is_ok_and(|h| h.peel_to_commit().is_ok()))
    }

    fn repo(&self) -> Result<git2::Repository, VcsError> {
        git2::Repository::open(&self.root)
            .map_err(repo_err(format!("opening {}", self.root.display())))
    }

    fn resolve(repo: &git2::Repository, rev: &str) -> Result<git2::Oid, VcsError> {
        repo.revparse_single(rev)
            .and_then(|o| o.peel_to_commit())
            .map(|c| c.id())
            .map_err(repo_err(format!("resolving {rev}")))
    }

    fn statuses(&self, untracked_dirs: bool) -> Result<Vec<(String, git2::Status)>, VcsError> {
        let repo = self.repo()?;
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .include_ignored(false)
            .recurse_untracked_dirs(untracked_dirs);
        let statuses = repo
            .statuses(Some(&mut opts))
            .map_err(repo_err("checking git status"))?;
        Ok(statuses
            .iter()
            .filter_map(|s| s.path().map(|p| (p.to_string(), s.status())))
            .collect())
    }

    fn branch_names(&self, kind: git2::BranchType) -> Result<Vec<String>, VcsError> {
        let repo = self.repo()?;
        let branches = repo
            .branches(Some(kind))
            .map_err(repo_err("listing branches"))?;
        let mut names = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(repo_err("listing branches"))?;
            if let Ok(Some(name)) = branch.name() {
                if !name.ends_with("/HEAD") {
                    names.push(name.to_string());
                }
            }
        }
        Ok(names)
    }

    fn execute(&self, args: &[&str], env: &[(&str, &str)]) -> Result<String, VcsError> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!(%command, cwd = %self.cwd.display(), "running");
        let output = Command::new("git")
            .args(args)
            .envs(env.iter().copied())
            .current_dir(&self.cwd)
            .output()
            .map_err(|source| VcsError::Spawn {
                command: command.clone(),
                source,
            })?;
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        tracing::debug!(output = %combined.trim_end(), "finished");
        if output.status.success() {
            Ok(combined.trim().to_string())
        } else {
            Err(VcsError::Exit {
                command,
                output: combined,
                status: output.status,
            })
        }
    }
}

impl Vcs for Git {
    fn current_branch(&self) -> Result<Branch, VcsError> {
        let repo = self.repo()?;
        let head = repo.head().map_err(repo_err("reading HEAD"))?;
        Ok(Branch::new(head.shorthand().unwrap_or("HEAD")))
    }

    fn local_branches(&self) -> Result<Vec<String>, VcsError> {
        self.branch_names(git2::BranchType::Local)
    }

    fn remote_branches(&self) -> Result<Vec<String>, VcsError> {
        self.branch_names(git2::BranchType::Remote)
    }

    fn has_uncommitted_changes(&self) -> Result<bool, VcsError> {
        Ok(!self.statuses(false)?.is_empty())
    }

    fn staged_files(&self) -> Result<Vec<String>, VcsError> {
        let staged = git2::Status::INDEX_NEW | git2::Status::INDEX_MODIFIED;
        Ok(self
            .statuses(false)?
            .into_iter()
            .filter(|(_, status)| status.intersects(staged))
            .map(|(path, _)| path)
            .collect())
    }

    fn untracked_files(&self) -> Result<Vec<String>, VcsError> {
        Ok(self
            .statuses(true)?
            .into_iter()
            .filter(|(_, status)| status.contains(git2::Status::WT_NEW))
            .map(|(path, _)| path)
            .collect())
    }

    fn ref_target(&self, refname: &str) -> Result<Option<String>, VcsError> {
        let repo = self.repo()?;
        match repo.refname_to_id(refname) {
            Ok(oid) => Ok(Some(oid.to_string())),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(repo_err(format!("reading {refname}"))(e)),
        }
    }

    fn ahead_count(&self, local: &str, upstream: &str) -> Result<usize, VcsError> {
        let repo = self.repo()?;
        let local_oid = Self::resolve(&repo, local)?;
        let upstream_oid = Self::resolve(&repo, upstream)?;
        let (ahead, _behind) = repo
            .graph_ahead_behind(local_oid, upstream_oid)
            .map_err(repo_err(format!("comparing {local} with {upstream}")))?;
        Ok(ahead)
    }

    fn is_ancestor(&self, ancestor: &str, successor: &str) -> Result<bool, VcsError> {
        let repo = self.repo()?;
        let ancestor_oid = Self::resolve(&repo, ancestor)?;
        let successor_oid = Self::resolve(&repo, successor)?;
        if ancestor_oid == successor_oid {
            return Ok(true);
        }
        repo.graph_descendant_of(successor_oid, ancestor_oid)
            .map_err(repo_err(format!("checking {ancestor} is an ancestor of {successor}")))
    }

    fn commit_authors(&self, since: &str, until: &str) -> Result<Vec<Author>, VcsError> {
        let repo = self.repo()?;
        let since_oid = Self::resolve(&repo, since)?;
        let until_oid = Self::resolve(&repo, until)?;
        let walk_err = || repo_err(format!("walking {since}..{until}"));
        let mut walk = repo.revwalk().map_err(walk_err())?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(walk_err())?;
        walk.push(until_oid).map_err(walk_err())?;
        walk.hide(since_oid).map_err(walk_err())?;

        let mut authors = Vec::new();
        for oid in walk {
            let commit = oid
                .and_then(|oid| repo.find_commit(oid))
                .map_err(repo_err(format!("reading commits of {until}")))?;
            let author = commit.author();
            authors.push(Author {
                name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
                email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
            });
        }
        Ok(authors)
    }

    fn last_commit_message(&self) -> Result<Option<String>, VcsError> {
        let repo = self.repo()?;
        let Ok(commit) = repo.head().and_then(|h| h.peel_to_commit()) else {
            return Ok(None);
        };
        Ok(commit.message().map(String::from))
    }

    fn user_name(&self) -> Option<String> {
        let config = self.repo().ok()?.config().ok()?;
        config
            .get_string("user.name")
            .ok()
            .filter(|name| !name.trim().is_empty())
    }

    fn user_email(&self) -> Result<String, VcsError> {
        let repo = self.repo()?;
        let config = repo.config().map_err(repo_err("reading git config"))?;
        config
            .get_string("user.email")
            .map_err(repo_err("reading user.email"))
    }

    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn git_dir(&self) -> Result<PathBuf, VcsError> {
        Ok(self.repo()?.path().to_path_buf())
    }

    fn run_with_env(&self, args: &[&str], env: &[(&str, &str)]) -> Result<String, VcsError> {
        say::indented(&format!("git {}", args.join(" ")));
        self.execute(args, env)
    }

    fn silent(&self, args: &[&str]) -> Result<String, VcsError> {
        self.execute(args, &[])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GitVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:git)?(?: version )?(?P<major>\d+)(?:\.(?P<minor>\d+)(?:\.(?P<patch>\d+))?)?")
        .unwrap_or_else(|e| unreachable!("version pattern is valid: {e}"))
});

impl GitVersion {
    /// Parse `git --version` output. Vendor suffixes such as
    /// `2.38.1.windows.1` are ignored; missing parts are zero.
    pub fn parse(version: &str) -> GitVersion {
        let Some(caps) = VERSION_RE.captures(version) else {
            return GitVersion::default();
        };
        let part = |name: &str| {
            caps.name(name)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        GitVersion {
            major: part("major"),
            minor: part("minor"),
            patch: part("patch"),
        }
    }
}

impl fmt::Display for GitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
