use crate::common::command::{init_repository_dir, run_twig_command, stage_file, twig_commit};
use crate::common::file::read_file;
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

/// History:
///
///        A         (1.txt, a/2.txt)
///       / \
///      B   C       B: edit 1.txt on master   C: add 3.txt on side
///  master   side
///
/// Expected: a two-parent merge commit on master whose tree carries both
/// sides' work.
#[rstest]
fn divergent_edits_to_different_paths_merge_cleanly(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();

    // Commit B on master
    stage_file(dir.path(), "1.txt", "master line");
    twig_commit(dir.path(), "Master edit").assert().success();

    // Commit C on side
    run_twig_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();
    stage_file(dir.path(), "3.txt", "side file");
    twig_commit(dir.path(), "Side edit").assert().success();

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout("");

    // Both sides' work is present
    assert_eq!(read_file(&dir.path().join("1.txt")), "master line");
    assert_eq!(read_file(&dir.path().join("3.txt")), "side file");

    // The merge commit sits on top and records both parents
    run_twig_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Merged side into master.")
                .and(predicate::str::is_match(r"Merge: [0-9a-f]{7} [0-9a-f]{7}").unwrap()),
        );

    // Side's own commit is reachable through the second parent only
    run_twig_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Side edit").not());
    run_twig_command(dir.path(), &["global-log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Side edit"));
}
