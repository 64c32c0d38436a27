use crate::common::command::{
    head_commit_id, init_repository_dir, log_commit_ids, run_twig_command, stage_file, twig_commit,
};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

/// History:
///
///   A            master
///    \
///     B - C      side
///
/// Expected: merging side moves master straight onto C. No merge commit is
/// created and the history stays linear.
#[rstest]
fn merging_a_descendant_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["branch", "side"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["checkout", "side"])
        .assert()
        .success();

    // Commits B and C on side
    stage_file(dir.path(), "3.txt", "three");
    twig_commit(dir.path(), "Commit B").assert().success();
    stage_file(dir.path(), "4.txt", "four");
    twig_commit(dir.path(), "Commit C").assert().success();
    let side_head = head_commit_id(dir.path());

    run_twig_command(dir.path(), &["checkout", "master"])
        .assert()
        .success();
    run_twig_command(dir.path(), &["merge", "side"])
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    // master now sits on C and has its files
    assert_eq!(head_commit_id(dir.path()), side_head);
    assert!(dir.path().join("3.txt").exists());
    assert!(dir.path().join("4.txt").exists());

    assert_eq!(log_commit_ids(dir.path()).len(), 4);
    run_twig_command(dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merge:").not());
}
