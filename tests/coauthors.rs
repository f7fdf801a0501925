mod common;

use common::Team;
use std::fs;

#[test]
fn done_credits_everyone_but_the_finisher() {
    let team = Team::new();
    let turns = ["alice", "local", "localother", "alice", "bob"];
    let clones: Vec<_> = ["alice", "local", "localother", "bob"]
        .iter()
        .map(|name| (*name, team.clone(name)))
        .collect();
    let dir_of = |name: &str| {
        clones
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, dir)| dir.clone())
            .unwrap()
    };

    for (turn, name) in turns.iter().enumerate() {
        let dir = dir_of(name);
        team.ok(&dir, &["start"]);
        fs::write(dir.join(format!("{name}-{turn}.txt")), "work\n").unwrap();
        team.ok(&dir, &["next"]);
    }

    let local = dir_of("local");
    team.ok(&local, &["start"]);
    team.ok(&local, &["done"]);

    let squash_msg = fs::read_to_string(local.join(".git").join("SQUASH_MSG")).unwrap();
    assert!(
        squash_msg.ends_with(
            "\n\n# automatically added all co-authors from WIP commits\n\
             # add missing co-authors manually\n\
             Co-authored-by: bob <bob@example.com>\n\
             Co-authored-by: alice <alice@example.com>\n\
             Co-authored-by: localother <localother@example.com>\n"
        ),
        "{squash_msg}"
    );
    assert!(!squash_msg.contains("Co-authored-by: local <"));
}

#[test]
fn no_squash_leaves_no_trailer() {
    let team = Team::new();
    let alice = team.clone("alice");
    let bob = team.clone("bob");

    team.ok(&alice, &["start"]);
    fs::write(alice.join("a.txt"), "a\n").unwrap();
    team.ok(&alice, &["next"]);

    team.ok(&bob, &["start"]);
    team.ok(&bob, &["done", "--no-squash"]);
    assert!(!bob.join(".git").join("SQUASH_MSG").exists());

    let repo = git2::Repository::open(&bob).unwrap();
    let head = repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(head.author().name(), Some("alice"));
}
