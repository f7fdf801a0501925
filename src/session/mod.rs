use std::fs;
use std::process::{Command, Stdio};
use std::time::SystemTime;

use crate::branch::{Branch, BranchPair, LEGACY_WIP_BRANCH};
use crate::coauthors;
use crate::config::{Configuration, DoneSquash, UncommittedChanges};
use crate::error::SessionError;
use crate::git::{Vcs, VcsError};
use crate::open::{self, LastFile};
use crate::rotation;
use crate::say;

const LAST_COMMITS_SHOWN: usize = 5;

type Result<T, E = SessionError> = std::result::Result<T, E>;

/// The start/next/done protocol on top of a repository.
///
/// Nothing about the session is stored: every command re-derives the
/// base/wip pair from the checked-out branch and the remote branches.
pub struct Session<V: Vcs> {
    pub vcs: V,
    pub config: Configuration,
}

impl<V: Vcs> Session<V> {
    pub fn new(vcs: V, config: Configuration) -> Self {
        Self { vcs, config }
    }

    // ---------------------------------------------------------------
    // Branch helpers
    // ---------------------------------------------------------------

    fn remote(&self) -> &str {
        &self.config.remote_name
    }

    /// The checked-out branch and the pair it belongs to.
    fn branches(&self) -> Result<(Branch, BranchPair)> {
        let current = self.vcs.current_branch()?;
        let local = self.vcs.local_branches()?;
        let pair = BranchPair::resolve(&current, &local, &self.config.naming());
        Ok((current, pair))
    }

    /// Whether the checked-out branch is a wip branch.
    pub fn is_mob_programming(&self) -> Result<bool> {
        let (current, pair) = self.branches()?;
        Ok(pair.is_wip_current(&current))
    }

    fn has_remote_branch(&self, branch: &Branch) -> Result<bool> {
        let remote_branch = branch.remote(self.remote());
        Ok(self
            .vcs
            .remote_branches()?
            .iter()
            .any(|b| *b == remote_branch))
    }

    fn has_local_branch(&self, branch: &Branch) -> Result<bool> {
        Ok(branch.exists_in(&self.vcs.local_branches()?))
    }

    /// Local and remote-tracking branch point at different commits.
    fn has_local_commits(&self, branch: &Branch) -> Result<bool> {
        let local = self.vcs.ref_target(&format!("refs/heads/{branch}"))?;
        let remote = self
            .vcs
            .ref_target(&format!("refs/remotes/{}", branch.remote(self.remote())))?;
        Ok(local != remote)
    }

    fn has_unpushed_commits(&self, branch: &Branch) -> Result<bool> {
        let count = self.vcs.ahead_count(
            &format!("refs/heads/{branch}"),
            &format!("refs/remotes/{}", branch.remote(self.remote())),
        )?;
        if count > 0 {
            say::info(&format!(
                "there are {count} unpushed commits on local base branch <{branch}>"
            ));
        }
        Ok(count > 0)
    }

    fn is_orphan_wip_branch(&self, branch: &Branch) -> Result<bool> {
        Ok(branch.is_wip(&self.config.naming()) && !self.has_remote_branch(branch)?)
    }

    /// Remote wip branches that were started from `base`.
    fn wip_branches_for_base(&self, base: &Branch) -> Result<Vec<String>> {
        let naming = self.config.naming();
        let unqualified = Branch::new(&format!("{}{base}", naming.prefix));
        let with_qualifier = match &naming.qualifier {
            Some(q) => Branch::new(&format!("{unqualified}{}{q}", naming.separator)),
            None => unqualified.clone(),
        };
        let with_qualifier = with_qualifier.remote(self.remote());
        let without_qualifier = if base.is("master") {
            LEGACY_WIP_BRANCH.to_string()
        } else {
            unqualified.remote(self.remote())
        };
        Ok(self
            .vcs
            .remote_branches()?
            .into_iter()
            .filter(|b| b.contains(&with_qualifier) || b.contains(&without_qualifier))
            .collect())
    }

    fn push_args<'a>(&'a self, extra: &[&'a str]) -> Vec<&'a str> {
        let mut args = vec!["push"];
        args.extend(self.config.hooks_option());
        args.extend_from_slice(extra);
        args
    }

    // ---------------------------------------------------------------
    // start
    // ---------------------------------------------------------------

    pub fn start(&self) -> Result<()> {
        let uncommitted = self.vcs.has_uncommitted_changes()?;
        let policy = self.config.handle_uncommitted_changes;
        if uncommitted && policy == UncommittedChanges::FailWithError {
            say::info("cannot start; clean working tree required");
            self.say_unstaged_changes()?;
            self.say_untracked_files()?;
            self.say_fix_uncommitted_changes();
            return Err(SessionError::UncommittedChanges);
        }

        let remote = self.remote();
        self.vcs.run(&["fetch", remote, "--prune"])?;
        let (_, pair) = self.branches()?;

        let remote_wip_exists = self.has_remote_branch(&pair.wip)?;
        if !remote_wip_exists && self.config.start_join {
            return Err(SessionError::MissingRemoteWipBranch(pair.wip.remote(remote)));
        }

        let remote_base_exists = self.has_remote_branch(&pair.base)?;
        if !remote_base_exists && !self.config.start_create {
            say::fix("To start and create the remote branch", &self.config.mob("start --create"));
            return Err(SessionError::MissingRemoteBranch(pair.base.remote(remote)));
        }
        if self.config.start_create {
            if remote_base_exists {
                say::info(&format!(
                    "Remote branch {} already exists",
                    pair.base.remote(remote)
                ));
            } else {
                self.vcs
                    .run(&["push", remote, &pair.base.name, "--set-upstream"])?;
            }
        }

        if self.has_local_branch(&pair.base)? && self.has_unpushed_commits(&pair.base)? {
            say::fix(
                "to fix this, push those commits and try again",
                &format!("git push {remote} {}", pair.base),
            );
            return Err(SessionError::UnpushedBaseCommits);
        }

        let mut stashed = false;
        if uncommitted {
            match policy {
                UncommittedChanges::DiscardChanges => {
                    self.vcs.run(&["reset", "--hard"])?;
                }
                UncommittedChanges::IncludeChanges => {
                    let tracked = self
                        .vcs
                        .silent(&["ls-tree", "-r", "HEAD", "--full-name", "--name-only", "."])?;
                    if tracked.is_empty() {
                        say::fix("to fix this, go to the parent directory and try again", "cd ..");
                        return Err(SessionError::UncommittedSubdir);
                    }
                    self.vcs.run(&[
                        "stash",
                        "push",
                        "--include-untracked",
                        "--message",
                        &self.config.stash_name,
                    ])?;
                    say::info(
                        "uncommitted changes were stashed. If an error occurs later on, \
                         you can recover them with 'git stash pop'.",
                    );
                    stashed = true;
                }
                UncommittedChanges::FailWithError => {}
            }
        }

        if !self.is_mob_programming()? {
            let remote_base = pair.base.remote(remote);
            self.vcs.run(&["merge", &remote_base, "--ff-only"])?;
        }

        if remote_wip_exists {
            self.join_session(&pair)?;
        } else {
            self.warn_for_active_wip_branches(&pair.base)?;
            self.start_new_session(&pair)?;
        }

        if stashed {
            let stashes = self.vcs.silent(&["stash", "list"])?;
            match find_stash(&stashes, &self.config.stash_name) {
                Some(stash) => {
                    self.vcs.run(&["stash", "pop", stash])?;
                }
                None => say::warning(&format!(
                    "could not find stash '{}'; restore your changes with 'git stash pop'",
                    self.config.stash_name
                )),
            }
        }

        say::info(&format!(
            "you are on wip branch '{}' (base branch '{}')",
            pair.wip, pair.base
        ));
        self.say_last_commits(&pair)?;
        self.open_last_modified_file()?;
        Ok(())
    }

    fn join_session(&self, pair: &BranchPair) -> Result<()> {
        let remote_wip = pair.wip.remote(self.remote());
        let remote_base = pair.base.remote(self.remote());
        say::info(&format!("joining existing session from {remote_wip}"));
        if self.has_local_branch(&pair.wip)?
            && !self.vcs.is_ancestor(&remote_base, &pair.wip.name)?
        {
            say::warning(&format!(
                "Careful, your wip branch ({}) diverges from your main branch ({remote_base}) !",
                pair.wip
            ));
        }
        self.vcs
            .run(&["checkout", "-B", &pair.wip.name, &remote_wip])?;
        let upstream = format!("--set-upstream-to={remote_wip}");
        self.vcs.run(&["branch", &upstream, &pair.wip.name])?;
        Ok(())
    }

    fn start_new_session(&self, pair: &BranchPair) -> Result<()> {
        let remote_base = pair.base.remote(self.remote());
        say::info(&format!("starting new session from {remote_base}"));
        self.vcs
            .run(&["checkout", "-B", &pair.wip.name, &remote_base])?;

        let refspec = format!("{0}:{0}", pair.wip);
        let mut args = vec!["push"];
        if self.config.skip_ci_push_option_enabled {
            args.extend(["--push-option", "ci.skip"]);
        }
        args.extend(self.config.hooks_option());
        args.extend(["--set-upstream", self.remote(), refspec.as_str()]);
        self.vcs.run(&args)?;
        Ok(())
    }

    fn warn_for_active_wip_branches(&self, base: &Branch) -> Result<()> {
        if self.is_mob_programming()? || !self.config.wip_branch_qualifier.is_empty() {
            return Ok(());
        }
        let existing = self.wip_branches_for_base(base)?;
        if !existing.is_empty() {
            say::warning(
                "Creating a new wip branch even though preexisting wip branches have been detected.",
            );
            for wip in &existing {
                say::with_prefix(wip, "  - ");
            }
        }
        Ok(())
    }

    fn say_unstaged_changes(&self) -> Result<()> {
        let unstaged = self.vcs.silent(&["diff", "--stat"])?;
        if !unstaged.is_empty() {
            say::info("unstaged changes present:");
            say::indented(&unstaged);
        }
        Ok(())
    }

    fn say_untracked_files(&self) -> Result<()> {
        let untracked = self.vcs.untracked_files()?;
        if !untracked.is_empty() {
            say::info("untracked files present:");
            say::indented(&untracked.join("\n"));
        }
        Ok(())
    }

    fn say_fix_uncommitted_changes(&self) {
        let create = if self.config.start_create { " --create" } else { "" };
        let branch = if self.config.wip_branch_qualifier.is_empty() {
            String::new()
        } else {
            format!(" --branch {}", self.config.wip_branch_qualifier)
        };
        let (include, discard) = if self.config.start_create {
            (
                "To start, including uncommitted changes and create the remote branch, use",
                "To start, discarding uncommitted changes and create the remote branch, use",
            )
        } else {
            (
                "To start, including uncommitted changes, use",
                "To start, discarding uncommitted changes, use",
            )
        };
        let start = self.config.mob(&format!("start{create}{branch}"));
        say::fix(include, &format!("{start} --include-uncommitted-changes"));
        say::fix(discard, &format!("{start} --discard-uncommitted-changes"));
    }

    // ---------------------------------------------------------------
    // next
    // ---------------------------------------------------------------

    pub fn next(&self) -> Result<()> {
        let (current, pair) = self.branches()?;
        if !pair.is_wip_current(&current) {
            say::fix("to start working together, use", &self.config.mob("start"));
            return Ok(());
        }

        let uncommitted = self.vcs.has_uncommitted_changes()?;
        if uncommitted
            && self.config.require_commit_message
            && !self.config.custom_commit_message
        {
            return Err(SessionError::CommitMessageRequired);
        }

        if uncommitted {
            self.make_wip_commit()?;
            self.vcs.run(&self.push_args(&[self.remote(), &pair.wip.name]))?;
        } else if self.has_local_commits(&pair.wip)? {
            self.vcs.run(&self.push_args(&[self.remote(), &pair.wip.name]))?;
        } else {
            say::info("nothing was done, so nothing to commit");
        }

        self.show_next(&pair)?;

        if !self.config.next_stay {
            self.vcs.run(&["checkout", &pair.base.name])?;
        }
        Ok(())
    }

    fn make_wip_commit(&self) -> Result<()> {
        self.vcs.run(&["add", "--all"])?;
        let message = self.wip_commit_message()?;
        let mut args = vec!["commit", "--message", message.as_str()];
        args.extend(self.config.hooks_option());
        self.vcs.run(&args)?;
        if let Ok(stat) = self.vcs.silent(&["diff", "HEAD^1", "--stat"]) {
            say::indented(&stat);
        }
        if let Ok(hash) = self.vcs.silent(&["rev-parse", "HEAD"]) {
            say::indented(&hash);
        }
        Ok(())
    }

    fn wip_commit_message(&self) -> Result<String> {
        let mut message = self.config.wip_commit_message.clone();
        if let Some(path) = self.last_modified_file()? {
            message.push_str(&open::last_file_trailer(&path));
        }
        Ok(message)
    }

    /// The staged file with the newest modification time.
    fn last_modified_file(&self) -> Result<Option<String>> {
        let files = self.vcs.staged_files()?;
        if files.len() == 1 {
            return Ok(files.into_iter().next());
        }
        let root = self.vcs.root_dir();
        let mut newest: Option<(SystemTime, String)> = None;
        for file in files {
            let modified = match fs::metadata(root.join(&file)).and_then(|m| m.modified()) {
                Ok(t) => t,
                Err(e) => {
                    tracing::debug!(%file, error = %e, "no modification time");
                    continue;
                }
            };
            if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
                newest = Some((modified, file));
            }
        }
        Ok(newest.map(|(_, file)| file))
    }

    /// Report who is (probably) next. Best effort: without a user name or a
    /// readable log there is simply nothing to report.
    fn show_next(&self, pair: &BranchPair) -> Result<()> {
        let Some(me) = self.vcs.user_name() else {
            say::warning("failed to detect who's next because you haven't set your git user name");
            say::fix("To fix, use", "git config --global user.name \"Your Name Here\"");
            return Ok(());
        };

        let remote_base = pair.base.remote(self.remote());
        let authors = self
            .vcs
            .commit_authors(&pair.base.name, &pair.wip.name)
            .or_else(|_| self.vcs.commit_authors(&remote_base, &pair.wip.name));
        let authors: Vec<String> = match authors {
            Ok(authors) => authors
                .into_iter()
                .inspect(|a| tracing::debug!(name = %a.name, email = %a.email, "wip commit author"))
                .map(|a| a.name)
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read wip commit authors");
                return Ok(());
            }
        };
        tracing::debug!(changes = authors.len(), user = %me, "determining next typist");

        let prediction = rotation::predict(&authors, &me);
        if let Some(next) = prediction.next {
            if !prediction.history.is_empty() {
                say::info(&format!(
                    "Committers after your last commit: {}",
                    prediction.history.join(", ")
                ));
            }
            say::info(&format!("***{next}*** is (probably) next."));
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // done
    // ---------------------------------------------------------------

    pub fn done(&self) -> Result<()> {
        let (current, pair) = self.branches()?;
        if !pair.is_wip_current(&current) {
            say::fix("to start working together, use", &self.config.mob("start"));
            return Ok(());
        }

        let remote = self.remote();
        self.vcs.run(&["fetch", remote, "--prune"])?;
        let remote_base = pair.base.remote(remote);

        if !self.has_remote_branch(&pair.wip)? {
            self.vcs.run(&["checkout", &pair.base.name])?;
            self.vcs.run(&["branch", "-D", &pair.wip.name])?;
            self.vcs.run(&["merge", &remote_base, "--ff-only"])?;
            say::info("someone else already ended your session");
            return Ok(());
        }

        let squash = self.config.done_squash;
        if squash == DoneSquash::SquashWip {
            let remote_wip = pair.wip.remote(remote);
            self.vcs.run(&["merge", &remote_wip, "--ff-only"])?;
            self.squash_wip(&pair)?;
        }

        let uncommitted = self.vcs.has_uncommitted_changes()?;
        if uncommitted {
            self.make_wip_commit()?;
        }
        self.vcs.run(&self.push_args(&[remote, &pair.wip.name]))?;

        self.vcs.run(&["checkout", &pair.base.name])?;
        self.vcs.run(&["merge", &remote_base, "--ff-only"])?;

        let mode = if squash == DoneSquash::Squash { "--squash" } else { "--commit" };
        if let Err(e) = self.vcs.run(&["merge", mode, "--ff", &pair.wip.name]) {
            say::indented(e.output());
            say::warning(&format!(
                "Skipped deleting {} because of merge conflicts.",
                pair.wip
            ));
            say::warning(&format!(
                "To fix this, solve the merge conflict manually, commit, push, and afterwards delete {}",
                pair.wip
            ));
            return Ok(());
        }

        self.vcs.run(&["branch", "-D", &pair.wip.name])?;

        // Leave the last change staged so the final commit can be named.
        if uncommitted && squash != DoneSquash::Squash {
            self.vcs.run(&["reset", "--soft", "HEAD^"])?;
        }

        if let Err(e) = self
            .vcs
            .run(&self.push_args(&[remote, "--delete", &pair.wip.name]))
        {
            say::warning(&format!(
                "could not delete remote branch {}: {e}",
                pair.wip.remote(remote)
            ));
        }

        let cached = self.vcs.silent(&["diff", "--cached", "--stat"])?;
        if !cached.is_empty() {
            say::indented(&cached);
        }

        self.append_coauthors();

        if self.vcs.has_uncommitted_changes()? {
            say::fix("To finish, use", "git commit");
        } else if squash == DoneSquash::Squash {
            say::info("nothing was done, so nothing to commit");
        }
        Ok(())
    }

    fn append_coauthors(&self) {
        let result = self
            .vcs
            .user_email()
            .map_err(anyhow::Error::from)
            .and_then(|email| {
                let git_dir = self.vcs.git_dir()?;
                coauthors::append_to_squash_msg(&git_dir, &email)
            });
        match result {
            Ok(added) => tracing::debug!(count = added.len(), "appended co-authors"),
            Err(e) => say::warning(&format!("could not add co-authors: {e:#}")),
        }
    }

    /// Fold wip commits into the manual commits that follow them, then
    /// force-push the rewritten wip branch.
    fn squash_wip(&self, pair: &BranchPair) -> Result<()> {
        if self.vcs.has_uncommitted_changes()? {
            self.make_wip_commit()?;
        }
        let remote_base = pair.base.remote(self.remote());
        let merge_base = self.vcs.silent(&["merge-base", &remote_base, "HEAD"])?;

        let exe = std::env::current_exe()
            .map_err(|e| SessionError::Other(anyhow::Error::new(e).context("locating mob binary")))?;
        let exe = exe.display().to_string();
        let editor = format!("'{exe}' squash-wip --git-editor");
        let sequence_editor = format!("'{exe}' squash-wip --git-sequence-editor");

        say::info(&format!(
            "rewriting history of '{}': squashing wip commits while keeping manual commits.",
            pair.wip
        ));
        self.vcs.run_with_env(
            &["rebase", "--interactive", "--keep-empty", &merge_base],
            &[
                ("GIT_EDITOR", editor.as_str()),
                ("GIT_SEQUENCE_EDITOR", sequence_editor.as_str()),
            ],
        )?;

        say::info("resulting history is:");
        let range = format!("{remote_base}..{}", pair.wip);
        let log = self.vcs.silent(&[
            "--no-pager",
            "log",
            &range,
            "--reverse",
            "--pretty=format:%h %cr <%an> %s",
            "--abbrev-commit",
        ])?;
        say::say(&log);

        let last_is_wip = self
            .vcs
            .last_commit_message()?
            .is_some_and(|m| self.config.is_wip_commit_message(m.lines().next().unwrap_or("")));
        if last_is_wip {
            say::info("undoing the final wip commit and staging its changes:");
            self.vcs.run(&["reset", "--soft", "HEAD^"])?;
        }

        self.vcs
            .run(&self.push_args(&["--force", self.remote(), &pair.wip.name]))?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Other commands
    // ---------------------------------------------------------------

    pub fn fetch(&self) -> Result<()> {
        self.vcs.run(&["fetch", self.remote(), "--prune"])?;
        Ok(())
    }

    /// Delete the wip branch locally and remotely, for everyone.
    pub fn reset(&self) -> Result<()> {
        if !self.config.reset_delete_remote_wip_branch {
            say::fix(
                "Executing this command deletes the mob branch for everyone. If you're sure you want that, use",
                &self.config.mob("reset --delete-remote-wip-branch"),
            );
            return Ok(());
        }

        let remote = self.remote();
        self.vcs.run(&["fetch", remote])?;
        let (_, pair) = self.branches()?;
        self.vcs.run(&["checkout", &pair.base.name])?;
        if self.has_local_branch(&pair.wip)? {
            self.vcs
                .run(&["branch", "--delete", "--force", &pair.wip.name])?;
        }
        if self.has_remote_branch(&pair.wip)? {
            self.vcs
                .run(&self.push_args(&[remote, "--delete", &pair.wip.name]))?;
        }
        say::info(&format!(
            "Branches {} and {} deleted",
            pair.wip,
            pair.wip.remote(remote)
        ));
        Ok(())
    }

    /// Remove local wip branches whose remote counterpart is gone.
    pub fn clean(&self) -> Result<()> {
        self.vcs.run(&["fetch", self.remote(), "--prune"])?;
        let (current, pair) = self.branches()?;
        let local = self.vcs.local_branches()?;

        if self.is_orphan_wip_branch(&current)? {
            say::info(&format!("Current branch {current} is an orphan"));
            let target = if pair.base.exists_in(&local) {
                pair.base.name.as_str()
            } else if Branch::new("main").exists_in(&local) {
                "main"
            } else {
                "master"
            };
            self.vcs.run(&["checkout", target])?;
        }

        for name in &local {
            let branch = Branch::new(name);
            if self.is_orphan_wip_branch(&branch)? {
                say::info(&format!("Removing orphan wip branch {branch}"));
                self.vcs.run(&["branch", "-D", &branch.name])?;
            }
        }
        Ok(())
    }

    /// Remote wip branches, including the legacy `mob-session`.
    pub fn wip_branches(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/{}", self.remote(), self.config.wip_branch_prefix);
        let legacy = Branch::new(LEGACY_WIP_BRANCH).remote(self.remote());
        Ok(self
            .vcs
            .remote_branches()?
            .into_iter()
            .filter(|b| b.starts_with(&prefix) || *b == legacy)
            .collect())
    }

    pub fn status(&self) -> Result<()> {
        let (current, pair) = self.branches()?;
        if pair.is_wip_current(&current) {
            say::info(&format!(
                "you are on wip branch {} (base branch {})",
                pair.wip, pair.base
            ));
            return self.say_last_commits(&pair);
        }

        say::info(&format!("you are on base branch '{}'", pair.base));
        let active = self.wip_branches_for_base(&pair.base)?;
        if !active.is_empty() {
            say::info("remote wip branches detected:");
            for wip in &active {
                let age = self
                    .vcs
                    .silent(&["log", "-1", "--pretty=format:(%ar)", wip])
                    .unwrap_or_default();
                say::with_prefix(&format!("{wip} {age}"), "  - ");
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Reporting
    // ---------------------------------------------------------------

    fn say_last_commits(&self, pair: &BranchPair) -> Result<()> {
        let log = |since: &str| -> std::result::Result<String, VcsError> {
            let range = format!("{since}..{}", pair.wip);
            self.vcs.silent(&[
                "--no-pager",
                "log",
                &range,
                "--pretty=format:%h %cr <%an>",
                "--abbrev-commit",
            ])
        };
        let output = match log(&pair.base.name) {
            Ok(output) => output,
            Err(_) => log(&pair.base.remote(self.remote()))?,
        };

        let mut lines: Vec<&str> = output.lines().filter(|l| !l.is_empty()).collect();
        if lines.len() > LAST_COMMITS_SHOWN {
            say::info(&format!(
                "wip branch '{}' contains {} commits. The last {LAST_COMMITS_SHOWN} were:",
                pair.wip,
                lines.len()
            ));
            lines.truncate(LAST_COMMITS_SHOWN);
        }
        lines.reverse();
        say::say(&lines.join("\n"));
        Ok(())
    }

    fn open_last_modified_file(&self) -> Result<()> {
        if self.config.open_command.trim().is_empty() {
            tracing::debug!("no open command configured");
            return Ok(());
        }
        let Some(message) = self.vcs.last_commit_message()? else {
            return Ok(());
        };
        if !self
            .config
            .is_wip_commit_message(message.lines().next().unwrap_or(""))
        {
            tracing::debug!("last commit is not a wip commit");
            return Ok(());
        }

        let file = match open::last_file(&message) {
            LastFile::Found(file) => file,
            LastFile::Missing => {
                say::warning("Couldn't find last modified file in commit message!");
                return Ok(());
            }
            LastFile::Ambiguous => {
                say::warning(
                    "Could not determine last modified file from commit message, separator was used multiple times!",
                );
                return Ok(());
            }
            LastFile::Empty => {
                tracing::debug!("commit message names no last modified file");
                return Ok(());
            }
        };

        let path = self.vcs.root_dir().join(&file);
        let Some((program, args)) =
            open::command_for(&self.config.open_command, &path.display().to_string())?
        else {
            return Ok(());
        };
        let spawned = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => tracing::debug!(path = %path.display(), "opened last modified file"),
            Err(e) => {
                say::warning(&format!(
                    "Couldn't open last modified file on your system ({})",
                    std::env::consts::OS
                ));
                say::warning(&e.to_string());
            }
        }
        Ok(())
    }
}

/// The `stash@{n}` reference of the stash named `name`.
fn find_stash<'a>(stashes: &'a str, name: &str) -> Option<&'a str> {
    stashes
        .lines()
        .find(|line| line.contains(name))
        .and_then(|line| line.split_once(':'))
        .map(|(stash, _)| stash)
}
