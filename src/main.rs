mod branch;
mod cli;
mod coauthors;
mod config;
mod error;
mod git;
mod open;
mod rotation;
mod say;
mod session;
mod squash_wip;

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command, SquashWipArgs};
use config::Configuration;
use git::{Git, GitVersion, MINIMUM_VERSION, Vcs};
use session::Session;

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("warn,mob=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn check_git_version() -> Result<GitVersion> {
    let Some(output) = Git::version() else {
        bail!(
            "'git' command was not found in PATH. It may be not installed. \
             To learn how to install 'git' refer to https://git-scm.com/book/en/v2/Getting-Started-Installing-Git."
        );
    };
    let version = GitVersion::parse(&output);
    if version < MINIMUM_VERSION {
        bail!(
            "'git' command version '{version}' is lower than the required minimum version ({MINIMUM_VERSION}). \
             Please update your 'git' installation!"
        );
    }
    Ok(version)
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("reading current directory")
}

/// The repository root, if we are inside one.
fn project_root(cwd: &Path) -> Option<PathBuf> {
    Git::discover(cwd).ok().map(|git| git.root_dir().to_path_buf())
}

fn rewrite_for_rebase(args: &SquashWipArgs, config: &Configuration) -> Result<()> {
    if let Some(todo) = &args.git_sequence_editor {
        squash_wip::edit_file(todo, |input| squash_wip::mark_post_wip_commits(input, config))?;
    }
    if let Some(message) = &args.git_editor {
        squash_wip::edit_file(message, |input| squash_wip::comment_wip_commits(input, config))?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let cwd = current_dir()?;

    match &cli.command {
        Command::Version => {
            println!("mob v{}", env!("CARGO_PKG_VERSION"));
            if let Some(git) = Git::version() {
                println!("{git}");
            }
            return Ok(());
        }
        Command::Config => {
            let config = Configuration::load(project_root(&cwd).as_deref())?;
            print!("{}", config.to_toml()?);
            return Ok(());
        }
        Command::SquashWip(args) => {
            let config = Configuration::load(project_root(&cwd).as_deref())?;
            return rewrite_for_rebase(args, &config);
        }
        _ => {}
    }

    let version = check_git_version()?;
    tracing::debug!(%version, "git version");

    let git = Git::discover(&cwd).context("not in a git repository")?;
    if !git.has_commits()? {
        bail!("Git repository does not have any commits yet. Please create an initial commit.");
    }

    let mut config = Configuration::load(Some(git.root_dir()))?;
    cli.command.apply_to(&mut config);
    tracing::debug!(?config, "effective configuration");

    let session = Session::new(git, config);
    match cli.command {
        Command::Start(_) => {
            session.start()?;
            if session.is_mob_programming()? {
                say::info("Happy collaborating! :)");
            }
        }
        Command::Next(_) => session.next()?,
        Command::Done(_) => session.done()?,
        Command::Reset(_) => session.reset()?,
        Command::Clean => session.clean()?,
        Command::Branch => {
            for branch in session.wip_branches()? {
                say::say(&branch);
            }
        }
        Command::Fetch => session.fetch()?,
        Command::Status => session.status()?,
        Command::Version | Command::Config | Command::SquashWip(_) => {}
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let message = format!("{err:#}");
        say::error(&message);
        if message.contains("does not support push options") {
            say::fix(
                "Disable the push option ci.skip with",
                "export MOB_SKIP_CI_PUSH_OPTION_ENABLED=false",
            );
        }
        process::exit(1);
    }
}
