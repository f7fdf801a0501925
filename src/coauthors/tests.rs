use super::*;

const SQUASH: &str = "Squashed commit of the following:

commit 5b1e7c0d9a
Author: bob <bob@example.com>
Date:   Mon Oct 19 10:14:02 2026 +0200

    mob next [ci-skip] [ci skip] [skip ci]

    lastFile:file5.txt

commit 9c2f11aa03
Author: alice <alice@example.com>
Date:   Mon Oct 19 10:12:40 2026 +0200

    mob next [ci-skip] [ci skip] [skip ci]

commit 0d41e9b7c2
Author: localother <localother@example.com>
Date:   Mon Oct 19 10:10:11 2026 +0200

    mob next [ci-skip] [ci skip] [skip ci]

commit 77e0a9d1f5
Author: local <local@example.com>
Date:   Mon Oct 19 10:08:55 2026 +0200

    mob next [ci-skip] [ci skip] [skip ci]

commit 3a9b6f2e18
Author: alice <alice@example.com>
Date:   Mon Oct 19 10:06:30 2026 +0200

    mob next [ci-skip] [ci skip] [skip ci]
";

#[test]
fn parses_authors_from_squash_message() {
    assert_eq!(
        parse_squash_authors(SQUASH),
        vec![
            "bob <bob@example.com>",
            "alice <alice@example.com>",
            "localother <localother@example.com>",
            "local <local@example.com>",
            "alice <alice@example.com>",
        ]
    );
}

#[test]
fn excludes_finalizer_and_duplicates() {
    let authors = parse_squash_authors(SQUASH);
    assert_eq!(
        aggregate(&authors, "local@example.com"),
        vec![
            "bob <bob@example.com>",
            "alice <alice@example.com>",
            "localother <localother@example.com>",
        ]
    );
}

#[test]
fn finalizer_email_must_match_exactly() {
    let authors = ["local <local@example.com>", "localother <localother@example.com>"];
    assert_eq!(
        aggregate(&authors, "localother@example.com"),
        vec!["local <local@example.com>"]
    );
}

#[test]
fn orders_by_length_then_first_seen() {
    let authors = [
        "carol <c@x.io>",
        "ann <a@x.io>",
        "dave <d@x.io>",
        "ann <a@x.io>",
    ];
    assert_eq!(
        aggregate(&authors, "me@x.io"),
        vec!["ann <a@x.io>", "dave <d@x.io>", "carol <c@x.io>"]
    );
}

#[test]
fn only_the_finalizer_yields_nothing() {
    let authors = ["me <me@x.io>", "me <me@x.io>"];
    assert!(aggregate(&authors, "me@x.io").is_empty());
}

#[test]
fn trailer_block_format() {
    let block = trailer_block(&["bob <bob@example.com>".into(), "alice <alice@example.com>".into()]);
    assert_eq!(
        block,
        "\n\n# automatically added all co-authors from WIP commits\n\
         # add missing co-authors manually\n\
         Co-authored-by: bob <bob@example.com>\n\
         Co-authored-by: alice <alice@example.com>\n"
    );
}

#[test]
fn appends_to_existing_squash_message() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("SQUASH_MSG"), SQUASH).unwrap();

    let added = append_to_squash_msg(dir.path(), "local@example.com").unwrap();
    assert_eq!(added.len(), 3);

    let contents = fs::read_to_string(dir.path().join("SQUASH_MSG")).unwrap();
    assert!(contents.starts_with(SQUASH), "original message must be kept");
    assert!(contents.ends_with(
        "\nCo-authored-by: bob <bob@example.com>\n\
         Co-authored-by: alice <alice@example.com>\n\
         Co-authored-by: localother <localother@example.com>\n"
    ));
    assert!(!contents.contains("Co-authored-by: local <local@example.com>"));
}

#[test]
fn missing_squash_message_is_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let added = append_to_squash_msg(dir.path(), "local@example.com").unwrap();
    assert!(added.is_empty());
    assert!(!dir.path().join("SQUASH_MSG").exists());
}
