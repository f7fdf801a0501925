use super::*;

fn check(authors: &[&str], next: Option<&str>, history: &[&str]) {
    let prediction = predict(authors, "alice");
    assert_eq!(prediction.next.as_deref(), next, "next for {authors:?}");
    assert_eq!(prediction.history, history, "history for {authors:?}");
}

#[test]
fn no_commits() {
    check(&[], None, &[]);
}

#[test]
fn only_my_own_commits() {
    check(&["alice"], None, &[]);
    check(&["alice", "alice"], None, &[]);
    check(&["alice", "alice", "alice"], None, &[]);
}

#[test]
fn alternating_with_one_other_person() {
    check(&["alice", "bob", "alice", "bob", "alice"], Some("bob"), &["bob", "alice"]);
}

#[test]
fn open_first_round_picks_earliest_committer() {
    check(&["alice", "bob", "craig"], Some("craig"), &[]);
}

#[test]
fn open_round_ignores_repeats() {
    check(&["alice", "bob", "craig", "bob"], Some("craig"), &[]);
}

#[test]
fn my_repeated_commits_collapse() {
    check(&["alice", "alice", "bob", "alice"], Some("bob"), &["bob", "alice"]);
}

#[test]
fn closed_round_of_three() {
    check(
        &["alice", "bob", "craig", "alice"],
        Some("craig"),
        &["craig", "bob", "alice"],
    );
}

#[test]
fn closed_round_ignores_repeats() {
    check(
        &["alice", "bob", "craig", "craig", "alice"],
        Some("craig"),
        &["craig", "bob", "alice"],
    );
}

#[test]
fn newcomer_before_the_round_goes_next() {
    check(
        &["alice", "bob", "craig", "alice", "bob", "dan"],
        Some("dan"),
        &["craig", "bob", "alice"],
    );
}

#[test]
fn newcomer_window_is_capped_at_round_size() {
    check(
        &["alice", "bob", "craig", "alice", "bob", "dan", "erik", "fin"],
        Some("erik"),
        &["craig", "bob", "alice"],
    );
}

#[test]
fn newcomer_behind_my_earlier_commit_is_ignored() {
    check(
        &["alice", "bob", "craig", "alice", "craig", "bob", "alice", "fin"],
        Some("craig"),
        &["craig", "bob", "alice"],
    );
}

#[test]
fn newcomer_window_closed_by_me_still_favors_newcomer() {
    check(
        &["alice", "bob", "craig", "alice", "dan", "alice", "erik"],
        Some("dan"),
        &["craig", "bob", "alice"],
    );
}

#[test]
fn someone_else_committed_last() {
    // The current user has not committed yet in this run of commits.
    check(&["bob", "craig", "alice", "bob"], Some("craig"), &["craig", "bob", "alice"]);
}

#[test]
fn accepts_owned_strings() {
    let authors = vec!["alice".to_string(), "bob".to_string()];
    assert_eq!(predict(&authors, "alice").next.as_deref(), Some("bob"));
}
