#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

/// Output of one `mob` invocation: exit code, stdout, stderr.
pub struct Run {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run the binary in `dir` with a private HOME and no system git config.
pub fn run_mob(dir: &Path, home: &Path, args: &[&str]) -> Run {
    let output = Command::new(env!("CARGO_BIN_EXE_mob"))
        .args(args)
        .current_dir(dir)
        .env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("MOB_SKIP_CI_PUSH_OPTION_ENABLED", "false")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to spawn binary");
    Run {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

fn git(dir: &Path, home: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init_main(path: &Path, bare: bool) -> git2::Repository {
    let mut opts = git2::RepositoryInitOptions::new();
    opts.initial_head("main").bare(bare);
    git2::Repository::init_opts(path, &opts).unwrap()
}

/// A bare remote on `main` with one commit, and a clone per participant.
/// The `TempDir` must be kept alive for the duration of the test.
pub struct Team {
    pub dir: tempfile::TempDir,
    pub remote: PathBuf,
    pub home: PathBuf,
}

impl Team {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let remote = dir.path().join("remote.git");
        let home = dir.path().join("home");
        std::fs::create_dir(&home).unwrap();
        init_main(&remote, true);

        let seed = dir.path().join("seed");
        let repo = init_main(&seed, false);
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "seed").unwrap();
        config.set_str("user.email", "seed@example.com").unwrap();
        std::fs::write(seed.join("README.md"), "# project\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();
        repo.remote("origin", remote.to_str().unwrap()).unwrap();
        git(&seed, &home, &["push", "origin", "main"]);

        Self { dir, remote, home }
    }

    /// Clone the remote into `<tmp>/<name>` with `name` as the git identity.
    pub fn clone(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        git(
            self.dir.path(),
            &self.home,
            &["clone", self.remote.to_str().unwrap(), name],
        );
        let repo = git2::Repository::open(&path).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", name).unwrap();
        config
            .set_str("user.email", &format!("{name}@example.com"))
            .unwrap();
        path
    }

    pub fn mob(&self, dir: &Path, args: &[&str]) -> Run {
        run_mob(dir, &self.home, args)
    }

    /// `mob` that must succeed.
    pub fn ok(&self, dir: &Path, args: &[&str]) -> Run {
        let run = self.mob(dir, args);
        assert_eq!(
            run.code, 0,
            "mob {args:?} failed\nstdout:\n{}\nstderr:\n{}",
            run.stdout, run.stderr
        );
        run
    }

    pub fn remote_has_branch(&self, name: &str) -> bool {
        let repo = git2::Repository::open_bare(&self.remote).unwrap();
        repo.find_branch(name, git2::BranchType::Local).is_ok()
    }
}

pub fn current_branch(dir: &Path) -> String {
    let repo = git2::Repository::open(dir).unwrap();
    repo.head().unwrap().shorthand().unwrap().to_string()
}

pub fn local_branch_exists(dir: &Path, name: &str) -> bool {
    let repo = git2::Repository::open(dir).unwrap();
    repo.find_branch(name, git2::BranchType::Local).is_ok()
}

/// Paths staged in the index relative to HEAD.
pub fn staged(dir: &Path) -> Vec<String> {
    let repo = git2::Repository::open(dir).unwrap();
    let statuses = repo.statuses(None).unwrap();
    let mut paths: Vec<String> = statuses
        .iter()
        .filter(|s| {
            s.status()
                .intersects(git2::Status::INDEX_NEW | git2::Status::INDEX_MODIFIED)
        })
        .filter_map(|s| s.path().map(String::from))
        .collect();
    paths.sort();
    paths
}
