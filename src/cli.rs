use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Configuration, DoneSquash, UncommittedChanges};

#[derive(Parser)]
#[command(name = "mob", version, about = "Fast git handover for remote mob programming")]
pub struct Cli {
    /// Print diagnostic logging to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start or join a session on the wip branch
    #[command(alias = "s")]
    Start(StartArgs),
    /// Hand over to the next person
    #[command(alias = "n")]
    Next(NextArgs),
    /// Finish the session and bring its changes to the base branch
    #[command(alias = "d")]
    Done(DoneArgs),
    /// Delete the wip branch locally and remotely
    Reset(ResetArgs),
    /// Remove local wip branches whose remote branch is gone
    Clean,
    /// List remote wip branches
    #[command(alias = "b")]
    Branch,
    /// Fetch the remote, pruning deleted branches
    Fetch,
    /// Show the current session state
    Status,
    /// Print the effective configuration
    Config,
    /// Print version information
    Version,
    /// Editor hooks git calls while squashing wip commits
    #[command(hide = true)]
    SquashWip(SquashWipArgs),
}

#[derive(Args, Default)]
pub struct StartArgs {
    /// Push the base branch first if it is missing on the remote
    #[arg(long)]
    pub create: bool,
    /// Only join an existing session, never start a new one
    #[arg(long)]
    pub join: bool,
    /// Wip branch qualifier, for several sessions on one base branch
    #[arg(short, long)]
    pub branch: Option<String>,
    /// Carry uncommitted changes over into the session
    #[arg(short = 'i', long, conflicts_with = "discard_uncommitted_changes")]
    pub include_uncommitted_changes: bool,
    /// Throw away uncommitted changes before starting
    #[arg(long)]
    pub discard_uncommitted_changes: bool,
}

#[derive(Args, Default)]
pub struct NextArgs {
    /// Stay on the wip branch afterwards
    #[arg(long)]
    pub stay: bool,
    /// Commit message for the wip commit
    #[arg(short, long)]
    pub message: Option<String>,
    #[arg(short, long)]
    pub branch: Option<String>,
}

#[derive(Args, Default)]
pub struct DoneArgs {
    /// Squash all wip commits into staged changes (default)
    #[arg(long, group = "squash_mode")]
    pub squash: bool,
    /// Merge the wip commits as they are
    #[arg(long, group = "squash_mode")]
    pub no_squash: bool,
    /// Fold wip commits into the manual commits that follow them
    #[arg(long, group = "squash_mode")]
    pub squash_wip: bool,
    #[arg(short, long)]
    pub branch: Option<String>,
}

#[derive(Args, Default)]
pub struct ResetArgs {
    /// Confirm deleting the remote wip branch for everyone
    #[arg(long)]
    pub delete_remote_wip_branch: bool,
    #[arg(short, long)]
    pub branch: Option<String>,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SquashWipArgs {
    /// Commit message file to rewrite
    #[arg(long)]
    pub git_editor: Option<PathBuf>,
    /// Rebase todo list to rewrite
    #[arg(long)]
    pub git_sequence_editor: Option<PathBuf>,
}

fn set_qualifier(config: &mut Configuration, branch: &Option<String>) {
    if let Some(qualifier) = branch {
        config.wip_branch_qualifier = qualifier.clone();
    }
}

impl Command {
    /// Fold this invocation's flags into the loaded configuration.
    pub fn apply_to(&self, config: &mut Configuration) {
        match self {
            Command::Start(args) => {
                config.start_create |= args.create;
                config.start_join |= args.join;
                set_qualifier(config, &args.branch);
                if args.include_uncommitted_changes {
                    config.handle_uncommitted_changes = UncommittedChanges::IncludeChanges;
                } else if args.discard_uncommitted_changes {
                    config.handle_uncommitted_changes = UncommittedChanges::DiscardChanges;
                }
            }
            Command::Next(args) => {
                config.next_stay |= args.stay;
                set_qualifier(config, &args.branch);
                if let Some(message) = &args.message {
                    config.wip_commit_message = message.clone();
                    config.custom_commit_message = true;
                }
            }
            Command::Done(args) => {
                set_qualifier(config, &args.branch);
                if args.squash {
                    config.done_squash = DoneSquash::Squash;
                } else if args.no_squash {
                    config.done_squash = DoneSquash::NoSquash;
                } else if args.squash_wip {
                    config.done_squash = DoneSquash::SquashWip;
                }
            }
            Command::Reset(args) => {
                config.reset_delete_remote_wip_branch |= args.delete_remote_wip_branch;
                set_qualifier(config, &args.branch);
            }
            _ => {}
        }
    }
}
