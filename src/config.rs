use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::branch::Naming;

const FILENAME: &str = ".mob.toml";

/// What `done` does with the commits of the wip branch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DoneSquash {
    /// Squash everything into the index; the user writes the final commit.
    Squash,
    /// Merge the wip commits as they are.
    NoSquash,
    /// Fold wip commits into the manual commits that follow them.
    SquashWip,
}

/// What `start` does when the working tree is dirty.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UncommittedChanges {
    FailWithError,
    IncludeChanges,
    DiscardChanges,
}

/// Settings for one invocation, layered from defaults, `~/.mob.toml`,
/// `<repo root>/.mob.toml` and `MOB_*` environment variables, in that order.
///
/// ```toml
/// remote_name = "upstream"
/// wip_branch_qualifier = "green"
/// done_squash = "no-squash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Name used in fix-it hints, e.g. `mob start`.
    pub cli_name: String,
    pub remote_name: String,
    pub wip_commit_message: String,
    /// Refuse `next` with uncommitted changes unless `--message` is given.
    pub require_commit_message: bool,
    /// Run client-side hooks; when off, commits and pushes pass `--no-verify`.
    pub git_hooks_enabled: bool,
    /// Send `--push-option ci.skip` when the remote wip branch is created.
    pub skip_ci_push_option_enabled: bool,
    pub wip_branch_prefix: String,
    pub wip_branch_qualifier: String,
    pub wip_branch_qualifier_separator: String,
    pub done_squash: DoneSquash,
    /// Editor command for reopening the last modified file; `%s` is the path.
    pub open_command: String,
    pub next_stay: bool,
    pub stash_name: String,
    pub handle_uncommitted_changes: UncommittedChanges,
    pub start_create: bool,
    pub start_join: bool,
    pub reset_delete_remote_wip_branch: bool,
    /// Set when `next --message` supplied a custom commit message.
    #[serde(skip)]
    pub custom_commit_message: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            cli_name: "mob".into(),
            remote_name: "origin".into(),
            wip_commit_message: "mob next [ci-skip] [ci skip] [skip ci]".into(),
            require_commit_message: false,
            git_hooks_enabled: false,
            skip_ci_push_option_enabled: true,
            wip_branch_prefix: "mob/".into(),
            wip_branch_qualifier: String::new(),
            wip_branch_qualifier_separator: "-".into(),
            done_squash: DoneSquash::Squash,
            open_command: String::new(),
            next_stay: false,
            stash_name: "mob-stash-name".into(),
            handle_uncommitted_changes: UncommittedChanges::FailWithError,
            start_create: false,
            start_join: false,
            reset_delete_remote_wip_branch: false,
            custom_commit_message: false,
        }
    }
}

impl Configuration {
    /// Load the layered configuration. `project_root` is `None` outside a
    /// repository, in which case only the user file and environment apply.
    pub fn load(project_root: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Configuration::default()));
        if let Some(home) = dirs::home_dir() {
            figment = figment.merge(Toml::file(home.join(FILENAME)));
        }
        if let Some(root) = project_root {
            figment = figment.merge(Toml::file(root.join(FILENAME)));
        }
        let config: Configuration = figment
            .merge(Env::prefixed("MOB_"))
            .extract()
            .context("loading mob configuration")?;
        if config.wip_branch_prefix.is_empty() {
            bail!("wip_branch_prefix must not be empty");
        }
        Ok(config)
    }

    /// Render the effective configuration, as printed by `mob config`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("serializing configuration")
    }

    pub fn naming(&self) -> Naming {
        Naming {
            prefix: self.wip_branch_prefix.clone(),
            qualifier: (!self.wip_branch_qualifier.is_empty())
                .then(|| self.wip_branch_qualifier.clone()),
            separator: self.wip_branch_qualifier_separator.clone(),
        }
    }

    /// A fix-it command line, e.g. `mob start --create`.
    pub fn mob(&self, command: &str) -> String {
        format!("{} {command}", self.cli_name)
    }

    /// `--no-verify` unless hooks are enabled.
    pub fn hooks_option(&self) -> Option<&'static str> {
        (!self.git_hooks_enabled).then_some("--no-verify")
    }

    /// Whether a commit subject or todo-list line is a wip commit.
    pub fn is_wip_commit_message(&self, line: &str) -> bool {
        let message = self.wip_commit_message.trim();
        !message.is_empty() && line.trim().starts_with(message)
    }
}
